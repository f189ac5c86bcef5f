//! 243-trit hashes: bundle hashes, transaction hashes, trunk and branch tips.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::ternary::{self, fixed_from_trits, fixed_trits, Trit};
use crate::EncodingError;

pub const HASH_TRITS: usize = 243;
pub const HASH_TRYTES: usize = HASH_TRITS / 3;

/// A Curl-P output of 243 trits, written as 81 trytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash([Trit; HASH_TRITS]);

impl Hash {
    /// The all-`9` hash used for unset references.
    pub const NULL: Self = Self([0; HASH_TRITS]);

    pub fn new(trits: [Trit; HASH_TRITS]) -> Self {
        Self(trits)
    }

    pub fn from_trits(trits: &[Trit]) -> Result<Self, EncodingError> {
        fixed_from_trits(trits).map(Self)
    }

    pub fn as_trits(&self) -> &[Trit; HASH_TRITS] {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0; HASH_TRITS]
    }

    /// Count of zero trits at the end of the hash (its proof-of-work weight).
    pub fn trailing_zeros(&self) -> usize {
        ternary::trailing_zeros(&self.0)
    }

    pub fn to_trytes(&self) -> String {
        self.to_string()
    }
}

impl Default for Hash {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_trytes(f, &self.0)
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trytes = self.to_string();
        write!(f, "Hash({}…)", &trytes[..9])
    }
}

impl FromStr for Hash {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fixed_trits(s).map(Self)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_trytes(deserializer)
    }
}

/// Writes trits as trytes without an intermediate allocation.
///
/// Only called on arrays already validated at construction, so every chunk
/// is a full tryte.
pub(crate) fn write_trytes(f: &mut fmt::Formatter<'_>, trits: &[Trit]) -> fmt::Result {
    use fmt::Write;
    for chunk in trits.chunks(3) {
        let value = chunk.iter().rev().fold(0i8, |acc, &t| acc * 3 + t);
        f.write_char(ternary::tryte_char(value))?;
    }
    Ok(())
}

/// Shared `Deserialize` body for the tryte-string newtypes.
pub(crate) fn deserialize_trytes<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let trytes = String::deserialize(deserializer)?;
    trytes.parse().map_err(de::Error::custom)
}
