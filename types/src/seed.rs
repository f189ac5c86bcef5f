//! The wallet seed and security levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ternary::{fixed_from_trits, fixed_trits, pad_trytes, tryte_trits, Trit};
use crate::ternary::{MIN_TRYTE_VALUE, TRITS_PER_TRYTE};
use crate::EncodingError;

pub const SEED_TRITS: usize = 243;
pub const SEED_TRYTES: usize = SEED_TRITS / 3;

/// The 243-trit secret every address and key is derived from.
///
/// This type intentionally does not implement `Debug`, `Serialize`, or `Clone`
/// to prevent accidental exposure. Seed trits are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed([Trit; SEED_TRITS]);

impl Seed {
    /// Parses a seed, right-padding anything shorter than 81 trytes with `9`.
    pub fn from_trytes(trytes: &str) -> Result<Self, EncodingError> {
        let mut padded = pad_trytes(trytes, SEED_TRYTES)?;
        let seed = fixed_trits(&padded).map(Self);
        padded.zeroize();
        seed
    }

    pub fn from_trits(trits: &[Trit]) -> Result<Self, EncodingError> {
        fixed_from_trits(trits).map(Self)
    }

    /// Draws a uniformly random seed from the operating system.
    pub fn generate() -> Result<Self, getrandom::Error> {
        let mut seed = Self([0; SEED_TRITS]);
        let mut buf = [0u8; 128];
        let mut filled = 0;
        while filled < SEED_TRYTES {
            getrandom::getrandom(&mut buf)?;
            // 243 is the largest multiple of 27 below 256.
            for &byte in buf.iter().filter(|&&b| b < 243) {
                if filled == SEED_TRYTES {
                    break;
                }
                let value = (byte % 27) as i8 + MIN_TRYTE_VALUE;
                let start = filled * TRITS_PER_TRYTE;
                seed.0[start..start + TRITS_PER_TRYTE].copy_from_slice(&tryte_trits(value));
                filled += 1;
            }
        }
        buf.zeroize();
        Ok(seed)
    }

    pub fn as_trits(&self) -> &[Trit; SEED_TRITS] {
        &self.0
    }
}

/// Number of 2187-tryte key fragments per address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum SecurityLevel {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl SecurityLevel {
    pub fn fragments(self) -> usize {
        self as usize
    }
}

impl Default for SecurityLevel {
    fn default() -> Self {
        Self::Medium
    }
}

impl TryFrom<u8> for SecurityLevel {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            other => Err(EncodingError::OutOfRange {
                field: "security level",
                value: other as i128,
            }),
        }
    }
}

impl From<SecurityLevel> for u8 {
    fn from(level: SecurityLevel) -> Self {
        level as u8
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}
