//! A small slotmap-style keyed collection.
//!
//! The core uses dense, append-only tables keyed by a newtype index for
//! publications, inputs, endpoints, filters and federates. [`TinyMap`] owns
//! its values; [`TinySecondaryMap`] associates auxiliary data with keys
//! minted by a (possibly foreign) `TinyMap`.

mod map;
mod secondary_map;

pub use map::TinyMap;
pub use secondary_map::TinySecondaryMap;

/// A key into a [`TinyMap`] or [`TinySecondaryMap`].
pub trait Key: From<usize> + Copy + Eq + std::hash::Hash + Ord {
    fn index(&self) -> usize;
}

/// Define a newtype key for use with [`TinyMap`]/[`TinySecondaryMap`].
#[macro_export]
macro_rules! key_type {
    ($(#[$outer:meta])* $vis:vis $name:ident) => {
        $(#[$outer])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        $vis struct $name(u32);

        impl $crate::Key for $name {
            fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl From<usize> for $name {
            fn from(value: usize) -> Self {
                Self(value as u32)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    key_type! { pub TestKey }

    #[test]
    fn test_key_roundtrip() {
        let k = TestKey::from(3usize);
        assert_eq!(crate::Key::index(&k), 3);
    }
}
