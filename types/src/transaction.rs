//! The 2673-tryte transaction and its wire layout.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::address::Address;
use crate::hash::{deserialize_trytes, write_trytes, Hash};
use crate::tag::{Nonce, Tag};
use crate::ternary::{self, fixed_from_trits, fixed_trits, pad_trytes, Trit};
use crate::EncodingError;

pub const TRANSACTION_TRITS: usize = 8019;
pub const TRANSACTION_TRYTES: usize = TRANSACTION_TRITS / 3;
pub const FRAGMENT_TRITS: usize = 6561;
pub const FRAGMENT_TRYTES: usize = FRAGMENT_TRITS / 3;
pub const ESSENCE_TRITS: usize = 486;

/// Largest absolute value that fits the 33 significant trits of the value field.
pub const MAX_VALUE: i64 = 2_779_530_283_277_761;

/// Upper attachment bound written by the attacher, `(3^27 - 1) / 2`.
pub const MAX_TIMESTAMP: i64 = 3_812_798_742_493;

/// Trit ranges of every transaction field.
pub mod layout {
    use std::ops::Range;

    pub const FRAGMENT: Range<usize> = 0..6561;
    pub const ADDRESS: Range<usize> = 6561..6804;
    pub const VALUE: Range<usize> = 6804..6885;
    pub const OBSOLETE_TAG: Range<usize> = 6885..6966;
    pub const TIMESTAMP: Range<usize> = 6966..6993;
    pub const CURRENT_INDEX: Range<usize> = 6993..7020;
    pub const LAST_INDEX: Range<usize> = 7020..7047;
    pub const BUNDLE: Range<usize> = 7047..7290;
    pub const TRUNK: Range<usize> = 7290..7533;
    pub const BRANCH: Range<usize> = 7533..7776;
    pub const TAG: Range<usize> = 7776..7857;
    pub const ATTACHMENT_TIMESTAMP: Range<usize> = 7857..7884;
    pub const ATTACHMENT_LOWER: Range<usize> = 7884..7911;
    pub const ATTACHMENT_UPPER: Range<usize> = 7911..7938;
    pub const NONCE: Range<usize> = 7938..8019;

    /// Address through last index: the part covered by the bundle hash.
    pub const ESSENCE: Range<usize> = 6561..7047;
}

/// The signature or message carried by a transaction.
#[derive(Clone, PartialEq, Eq)]
pub struct Fragment(Box<[Trit; FRAGMENT_TRITS]>);

impl Fragment {
    pub fn empty() -> Self {
        Self(Box::new([0; FRAGMENT_TRITS]))
    }

    pub fn from_trits(trits: &[Trit]) -> Result<Self, EncodingError> {
        fixed_from_trits(trits).map(|t| Self(Box::new(t)))
    }

    /// Builds a fragment from up to 2187 trytes, padding with `9`.
    pub fn from_trytes(trytes: &str) -> Result<Self, EncodingError> {
        fixed_trits(&pad_trytes(trytes, FRAGMENT_TRYTES)?).map(|t| Self(Box::new(t)))
    }

    pub fn as_trits(&self) -> &[Trit; FRAGMENT_TRITS] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&t| t == 0)
    }
}

impl From<Box<[Trit; FRAGMENT_TRITS]>> for Fragment {
    fn from(trits: Box<[Trit; FRAGMENT_TRITS]>) -> Self {
        Self(trits)
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromStr for Fragment {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_trytes(s)
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_trytes(f, &self.0[..])
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Fragment(empty)")
        } else {
            let trytes = self.to_string();
            write!(f, "Fragment({}…)", &trytes[..9])
        }
    }
}

impl Serialize for Fragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fragment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_trytes(deserializer)
    }
}

/// A single ledger transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub signature_message_fragment: Fragment,
    pub address: Address,
    pub value: i64,
    pub obsolete_tag: Tag,
    /// Issuance time in seconds.
    pub timestamp: u64,
    pub current_index: usize,
    pub last_index: usize,
    pub bundle: Hash,
    pub trunk: Hash,
    pub branch: Hash,
    pub tag: Tag,
    /// Attachment time in milliseconds.
    pub attachment_timestamp: i64,
    pub attachment_timestamp_lower_bound: i64,
    pub attachment_timestamp_upper_bound: i64,
    pub nonce: Nonce,
}

impl Transaction {
    pub fn is_tail(&self) -> bool {
        self.current_index == 0
    }

    /// Writes the fields hashed into the bundle hash.
    pub fn write_essence(&self, out: &mut [Trit]) -> Result<(), EncodingError> {
        debug_assert_eq!(out.len(), ESSENCE_TRITS);
        let base = layout::ESSENCE.start;
        let shift = |r: std::ops::Range<usize>| r.start - base..r.end - base;
        out[shift(layout::ADDRESS)].copy_from_slice(self.address.as_trits());
        write_value(self.value, &mut out[shift(layout::VALUE)])?;
        out[shift(layout::OBSOLETE_TAG)].copy_from_slice(self.obsolete_tag.as_trits());
        ternary::write_int(self.timestamp as i128, &mut out[shift(layout::TIMESTAMP)])?;
        ternary::write_int(self.current_index as i128, &mut out[shift(layout::CURRENT_INDEX)])?;
        ternary::write_int(self.last_index as i128, &mut out[shift(layout::LAST_INDEX)])?;
        Ok(())
    }

    pub fn essence_trits(&self) -> Result<[Trit; ESSENCE_TRITS], EncodingError> {
        let mut essence = [0; ESSENCE_TRITS];
        self.write_essence(&mut essence)?;
        Ok(essence)
    }

    pub fn to_trits(&self) -> Result<Vec<Trit>, EncodingError> {
        let mut trits = vec![0; TRANSACTION_TRITS];
        trits[layout::FRAGMENT].copy_from_slice(self.signature_message_fragment.as_trits());
        self.write_essence(&mut trits[layout::ESSENCE])?;
        trits[layout::BUNDLE].copy_from_slice(self.bundle.as_trits());
        trits[layout::TRUNK].copy_from_slice(self.trunk.as_trits());
        trits[layout::BRANCH].copy_from_slice(self.branch.as_trits());
        trits[layout::TAG].copy_from_slice(self.tag.as_trits());
        ternary::write_int(
            self.attachment_timestamp as i128,
            &mut trits[layout::ATTACHMENT_TIMESTAMP],
        )?;
        ternary::write_int(
            self.attachment_timestamp_lower_bound as i128,
            &mut trits[layout::ATTACHMENT_LOWER],
        )?;
        ternary::write_int(
            self.attachment_timestamp_upper_bound as i128,
            &mut trits[layout::ATTACHMENT_UPPER],
        )?;
        trits[layout::NONCE].copy_from_slice(self.nonce.as_trits());
        Ok(trits)
    }

    pub fn to_trytes(&self) -> Result<String, EncodingError> {
        ternary::trits_to_trytes(&self.to_trits()?)
    }

    pub fn from_trits(trits: &[Trit]) -> Result<Self, EncodingError> {
        if trits.len() != TRANSACTION_TRITS {
            return Err(EncodingError::WrongLength {
                expected: TRANSACTION_TRITS,
                actual: trits.len(),
            });
        }
        let value = ternary::trits_to_int(&trits[layout::VALUE])?;
        if value.unsigned_abs() > MAX_VALUE as u64 {
            return Err(EncodingError::OutOfRange {
                field: "value",
                value: value as i128,
            });
        }
        Ok(Self {
            signature_message_fragment: Fragment::from_trits(&trits[layout::FRAGMENT])?,
            address: Address::from_trits(&trits[layout::ADDRESS])?,
            value,
            obsolete_tag: Tag::from_trits(&trits[layout::OBSOLETE_TAG])?,
            timestamp: read_unsigned(trits, layout::TIMESTAMP, "timestamp")?,
            current_index: read_unsigned(trits, layout::CURRENT_INDEX, "current index")? as usize,
            last_index: read_unsigned(trits, layout::LAST_INDEX, "last index")? as usize,
            bundle: Hash::from_trits(&trits[layout::BUNDLE])?,
            trunk: Hash::from_trits(&trits[layout::TRUNK])?,
            branch: Hash::from_trits(&trits[layout::BRANCH])?,
            tag: Tag::from_trits(&trits[layout::TAG])?,
            attachment_timestamp: ternary::trits_to_int(&trits[layout::ATTACHMENT_TIMESTAMP])?,
            attachment_timestamp_lower_bound: ternary::trits_to_int(
                &trits[layout::ATTACHMENT_LOWER],
            )?,
            attachment_timestamp_upper_bound: ternary::trits_to_int(
                &trits[layout::ATTACHMENT_UPPER],
            )?,
            nonce: Nonce::from_trits(&trits[layout::NONCE])?,
        })
    }

    pub fn from_trytes(trytes: &str) -> Result<Self, EncodingError> {
        let actual = trytes.chars().count();
        if actual != TRANSACTION_TRYTES {
            return Err(EncodingError::WrongLength {
                expected: TRANSACTION_TRYTES,
                actual,
            });
        }
        Self::from_trits(&ternary::trytes_to_trits(trytes)?)
    }
}

fn write_value(value: i64, out: &mut [Trit]) -> Result<(), EncodingError> {
    if value.unsigned_abs() > MAX_VALUE as u64 {
        return Err(EncodingError::OutOfRange {
            field: "value",
            value: value as i128,
        });
    }
    ternary::write_int(value as i128, out)
}

fn read_unsigned(
    trits: &[Trit],
    range: std::ops::Range<usize>,
    field: &'static str,
) -> Result<u64, EncodingError> {
    let value = ternary::trits_to_int(&trits[range])?;
    u64::try_from(value).map_err(|_| EncodingError::OutOfRange {
        field,
        value: value as i128,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction {
            signature_message_fragment: Fragment::from_trytes("HELLO").unwrap(),
            address: "A".repeat(81).parse().unwrap(),
            value: -42,
            obsolete_tag: "OBSOLETE".parse().unwrap(),
            timestamp: 1_700_000_000,
            current_index: 1,
            last_index: 3,
            bundle: "B".repeat(81).parse().unwrap(),
            trunk: "C".repeat(81).parse().unwrap(),
            branch: "D".repeat(81).parse().unwrap(),
            tag: "TAG".parse().unwrap(),
            attachment_timestamp: 1_700_000_000_123,
            attachment_timestamp_lower_bound: 0,
            attachment_timestamp_upper_bound: MAX_TIMESTAMP,
            nonce: "N".repeat(27).parse().unwrap(),
        }
    }

    #[test]
    fn layout_is_contiguous() {
        let ranges = [
            layout::FRAGMENT,
            layout::ADDRESS,
            layout::VALUE,
            layout::OBSOLETE_TAG,
            layout::TIMESTAMP,
            layout::CURRENT_INDEX,
            layout::LAST_INDEX,
            layout::BUNDLE,
            layout::TRUNK,
            layout::BRANCH,
            layout::TAG,
            layout::ATTACHMENT_TIMESTAMP,
            layout::ATTACHMENT_LOWER,
            layout::ATTACHMENT_UPPER,
            layout::NONCE,
        ];
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(layout::NONCE.end, TRANSACTION_TRITS);
        assert_eq!(layout::ESSENCE.len(), ESSENCE_TRITS);
    }

    #[test]
    fn trytes_round_trip() {
        let tx = sample();
        let trytes = tx.to_trytes().unwrap();
        assert_eq!(trytes.len(), TRANSACTION_TRYTES);
        assert_eq!(Transaction::from_trytes(&trytes).unwrap(), tx);
    }

    #[test]
    fn field_positions_in_trytes() {
        let trytes = sample().to_trytes().unwrap();
        assert!(trytes.starts_with("HELLO9"));
        assert_eq!(&trytes[2187..2268], "A".repeat(81));
        assert_eq!(&trytes[2646..], "N".repeat(27));
    }

    #[test]
    fn essence_matches_wire_slice() {
        let tx = sample();
        let trits = tx.to_trits().unwrap();
        assert_eq!(tx.essence_trits().unwrap()[..], trits[layout::ESSENCE]);
    }

    #[test]
    fn rejects_value_outside_33_trits() {
        let mut tx = sample();
        tx.value = MAX_VALUE + 1;
        assert!(matches!(
            tx.to_trits(),
            Err(EncodingError::OutOfRange { field: "value", .. })
        ));

        let mut trits = sample().to_trits().unwrap();
        trits[layout::VALUE.start + 40] = 1;
        assert!(Transaction::from_trits(&trits).is_err());
    }

    #[test]
    fn max_value_round_trips() {
        let mut tx = sample();
        tx.value = -MAX_VALUE;
        let trytes = tx.to_trytes().unwrap();
        assert_eq!(Transaction::from_trytes(&trytes).unwrap().value, -MAX_VALUE);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Transaction::from_trytes("").is_err());
        assert!(Transaction::from_trytes(&"9".repeat(2672)).is_err());
        let mut trits = sample().to_trits().unwrap();
        trits[layout::CURRENT_INDEX.start] = -1;
        trits[layout::CURRENT_INDEX.start + 1] = 0;
        assert!(matches!(
            Transaction::from_trits(&trits),
            Err(EncodingError::OutOfRange { field: "current index", .. })
        ));
    }

    #[test]
    fn empty_transaction_is_all_nines() {
        let trytes = Transaction::default().to_trytes().unwrap();
        assert_eq!(trytes, "9".repeat(TRANSACTION_TRYTES));
    }
}
