//! Self-describing binary value codec, per spec.md §4.1 "ValueCodec".
//!
//! Converts between typed host [`Value`]s and the bit-exact wire buffer
//! (§6 "Binary value wire format"), performs cross-type coercion when a
//! reader's declared type differs from a writer's, and implements the
//! format-level change detection `Publication`/`Input` rely on for
//! `only_transmit_on_change`/`only_update_on_change`.

pub mod codec;
pub mod coerce;
pub mod value;

pub use codec::{decode, encode, TypeTag};
pub use coerce::{changed, coerce, TargetType};
pub use value::{NamedPoint, Value};
