//! Ledger addresses.
//!
//! An address is a 243-trit hash, optionally followed by a 9-tryte checksum.
//! This type only carries the checksum; computing and verifying it needs the
//! sponge and lives in `tangle-crypto`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::hash::{deserialize_trytes, write_trytes, Hash, HASH_TRYTES};
use crate::ternary::{fixed_from_trits, fixed_trits, Trit};
use crate::EncodingError;

pub const CHECKSUM_TRYTES: usize = 9;
pub const CHECKSUM_TRITS: usize = CHECKSUM_TRYTES * 3;

/// Nine trytes appended to an address to catch typing errors.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Checksum([Trit; CHECKSUM_TRITS]);

impl Checksum {
    pub fn new(trits: [Trit; CHECKSUM_TRITS]) -> Self {
        Self(trits)
    }

    pub fn from_trits(trits: &[Trit]) -> Result<Self, EncodingError> {
        fixed_from_trits(trits).map(Self)
    }

    pub fn as_trits(&self) -> &[Trit; CHECKSUM_TRITS] {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_trytes(f, &self.0)
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({self})")
    }
}

/// A ledger address.
///
/// Equality and hashing look at the address trits only, so the same address
/// with and without a checksum compares equal.
#[derive(Clone, Copy)]
pub struct Address {
    hash: Hash,
    checksum: Option<Checksum>,
}

impl Address {
    pub fn new(hash: Hash) -> Self {
        Self {
            hash,
            checksum: None,
        }
    }

    pub fn from_trits(trits: &[Trit]) -> Result<Self, EncodingError> {
        Hash::from_trits(trits).map(Self::new)
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    pub fn as_trits(&self) -> &[Trit] {
        self.hash.as_trits()
    }

    pub fn checksum(&self) -> Option<&Checksum> {
        self.checksum.as_ref()
    }

    pub fn with_checksum(self, checksum: Checksum) -> Self {
        Self {
            hash: self.hash,
            checksum: Some(checksum),
        }
    }

    pub fn without_checksum(self) -> Self {
        Self::new(self.hash)
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Address {}

impl std::hash::Hash for Address {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::hash::Hash::hash(&self.hash, state);
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::new(Hash::NULL)
    }
}

impl From<Hash> for Address {
    fn from(hash: Hash) -> Self {
        Self::new(hash)
    }
}

/// Accepts 81 trytes, or 90 trytes with an unverified checksum.
impl FromStr for Address {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        match len {
            HASH_TRYTES => s.parse().map(Self::new),
            n if n == HASH_TRYTES + CHECKSUM_TRYTES => {
                let split = s.char_indices().nth(HASH_TRYTES).map_or(s.len(), |(i, _)| i);
                let (body, checksum) = s.split_at(split);
                Ok(Self {
                    hash: body.parse()?,
                    checksum: Some(Checksum(fixed_trits(checksum)?)),
                })
            }
            actual => Err(EncodingError::WrongLength {
                expected: HASH_TRYTES,
                actual,
            }),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hash)?;
        if let Some(checksum) = &self.checksum {
            write!(f, "{checksum}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_trytes(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str =
        "D9XCNSCCAJGLWSQOQAQNFWANPYKYMCQ9VCOMROLDVLONPPLDFVPIZNAPVZLQMPFYJPAHUKIAEKNCQIYJZ";

    #[test]
    fn parses_bare_address() {
        let address: Address = BODY.parse().unwrap();
        assert!(address.checksum().is_none());
        assert_eq!(address.to_string(), BODY);
    }

    #[test]
    fn parses_checksummed_address() {
        let full = format!("{BODY}NPTPRAPDW");
        let address: Address = full.parse().unwrap();
        assert_eq!(address.checksum().unwrap().to_string(), "NPTPRAPDW");
        assert_eq!(address.to_string(), full);
        assert_eq!(address, BODY.parse::<Address>().unwrap());
        assert_eq!(address.without_checksum().to_string(), BODY);
    }

    #[test]
    fn rejects_other_lengths() {
        assert!(matches!(
            "ABC".parse::<Address>(),
            Err(EncodingError::WrongLength { actual: 3, .. })
        ));
        assert!(format!("{BODY}NPTP").parse::<Address>().is_err());
    }
}
