use std::{fmt::Debug, marker::PhantomData};

use crate::Key;

/// A sparse map associating auxiliary data with keys minted elsewhere (e.g. by a [`crate::TinyMap`]).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct TinySecondaryMap<K: Key, V> {
    data: Vec<Option<V>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    _k: PhantomData<K>,
}

impl<K: Key + Debug, V: Debug> Debug for TinySecondaryMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Key, V> Default for TinySecondaryMap<K, V> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            _k: PhantomData,
        }
    }
}

impl<K: Key, V> Clone for TinySecondaryMap<K, V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            _k: PhantomData,
        }
    }
}

impl<K: Key, V> std::ops::Index<K> for TinySecondaryMap<K, V> {
    type Output = V;

    fn index(&self, key: K) -> &Self::Output {
        self.data[key.index()].as_ref().expect("no entry for key")
    }
}

impl<K: Key, V> std::ops::IndexMut<K> for TinySecondaryMap<K, V> {
    fn index_mut(&mut self, key: K) -> &mut Self::Output {
        self.data[key.index()].as_mut().expect("no entry for key")
    }
}

impl<K: Key, V> TinySecondaryMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let idx = key.index();
        if idx >= self.data.len() {
            self.data.resize_with(idx + 1, || None);
        }
        self.data[idx].replace(value)
    }

    pub fn remove(&mut self, key: K) -> Option<V> {
        self.data.get_mut(key.index()).and_then(|slot| slot.take())
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.data.get(key.index()).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.data
            .get_mut(key.index())
            .and_then(|slot| slot.as_mut())
    }

    pub fn contains_key(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.data.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.is_some().then(|| K::from(i)))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.data.iter().filter_map(|slot| slot.as_ref())
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.data.iter_mut().filter_map(|slot| slot.as_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (K::from(i), v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut V)> {
        self.data
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|v| (K::from(i), v)))
    }
}

impl<K: Key, V> IntoIterator for TinySecondaryMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.data
            .into_iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|v| (K::from(i), v)))
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl<K: Key, V> FromIterator<(K, V)> for TinySecondaryMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::key_type! { pub K }

    #[test]
    fn test_sparse_insert_remove() {
        let mut m: TinySecondaryMap<K, i32> = TinySecondaryMap::new();
        let k5 = K::from(5usize);
        m.insert(k5, 42);
        assert_eq!(m.get(k5), Some(&42));
        assert_eq!(m.len(), 1);
        assert_eq!(m.remove(k5), Some(42));
        assert!(m.get(k5).is_none());
    }
}
