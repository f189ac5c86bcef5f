//! 81-trit fields: tags and nonces.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::hash::{deserialize_trytes, write_trytes};
use crate::ternary::{self, fixed_from_trits, fixed_trits, pad_trytes, Trit};
use crate::EncodingError;

pub const TAG_TRITS: usize = 81;
pub const TAG_TRYTES: usize = TAG_TRITS / 3;
pub const NONCE_TRITS: usize = 81;

/// A 27-tryte tag. Parsing right-pads shorter input with `9`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag([Trit; TAG_TRITS]);

impl Tag {
    pub const EMPTY: Self = Self([0; TAG_TRITS]);

    pub fn from_trits(trits: &[Trit]) -> Result<Self, EncodingError> {
        fixed_from_trits(trits).map(Self)
    }

    pub fn as_trits(&self) -> &[Trit; TAG_TRITS] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == [0; TAG_TRITS]
    }

    /// Adds one, wrapping at the field width. Used to re-roll a bundle hash.
    pub fn increment(&mut self) {
        ternary::add_assign(&mut self.0, 1);
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl FromStr for Tag {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fixed_trits(&pad_trytes(s, TAG_TRYTES)?).map(Self)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_trytes(f, &self.0)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_trytes(deserializer)
    }
}

/// The proof-of-work field at the end of a transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nonce([Trit; NONCE_TRITS]);

impl Nonce {
    pub const ZERO: Self = Self([0; NONCE_TRITS]);

    pub fn new(trits: [Trit; NONCE_TRITS]) -> Self {
        Self(trits)
    }

    pub fn from_trits(trits: &[Trit]) -> Result<Self, EncodingError> {
        fixed_from_trits(trits).map(Self)
    }

    pub fn as_trits(&self) -> &[Trit; NONCE_TRITS] {
        &self.0
    }
}

impl Default for Nonce {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FromStr for Nonce {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fixed_trits(s).map(Self)
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_trytes(f, &self.0)
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({self})")
    }
}

impl Serialize for Nonce {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Nonce {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_trytes(deserializer)
    }
}
