//! Balanced-ternary codec.
//!
//! Trits are `i8` values in `-1..=1`. Three trits form a tryte, written as one
//! of 27 symbols: `9` is zero, `A..=M` are 1..=13 and `N..=Z` are -13..=-1.
//! Every multi-trit number in this crate is little-endian.
//!
//! Bytes use the `b1t6` mapping: a byte, read as `i8`, is split into two
//! trytes `t0 + 27 * t1`, so one byte always occupies six trits.

use crate::EncodingError;

/// A single balanced ternary digit.
pub type Trit = i8;

pub const TRITS_PER_TRYTE: usize = 3;
pub const TRITS_PER_BYTE: usize = 6;
pub const TRYTE_ALPHABET: &[u8; 27] = b"9ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const MIN_TRYTE_VALUE: i8 = -13;
pub const MAX_TRYTE_VALUE: i8 = 13;

/// Numeric value of a tryte symbol.
pub fn tryte_value(c: char) -> Result<i8, EncodingError> {
    match c {
        '9' => Ok(0),
        'A'..='M' => Ok((c as u8 - b'A') as i8 + 1),
        'N'..='Z' => Ok((c as u8 - b'N') as i8 + MIN_TRYTE_VALUE),
        _ => Err(EncodingError::InvalidTryte(c)),
    }
}

/// Tryte symbol for a value in `-13..=13`.
pub fn tryte_char(value: i8) -> char {
    debug_assert!((MIN_TRYTE_VALUE..=MAX_TRYTE_VALUE).contains(&value));
    TRYTE_ALPHABET[value.rem_euclid(27) as usize] as char
}

/// Writes `value` as balanced ternary into `out`, returning the carry that did
/// not fit.
fn write_balanced(mut value: i128, out: &mut [Trit]) -> i128 {
    for trit in out.iter_mut() {
        let digit = (value + 1).rem_euclid(3) - 1;
        *trit = digit as Trit;
        value = (value - digit) / 3;
    }
    value
}

/// The three trits of a tryte value in `-13..=13`.
pub fn tryte_trits(value: i8) -> [Trit; TRITS_PER_TRYTE] {
    let mut trits = [0; TRITS_PER_TRYTE];
    write_balanced(value as i128, &mut trits);
    trits
}

fn check_trit(trit: Trit) -> Result<Trit, EncodingError> {
    if (-1..=1).contains(&trit) {
        Ok(trit)
    } else {
        Err(EncodingError::InvalidTrit(trit))
    }
}

fn tryte_of(chunk: &[Trit]) -> Result<i8, EncodingError> {
    let mut value = 0i8;
    for &trit in chunk.iter().rev() {
        value = value * 3 + check_trit(trit)?;
    }
    Ok(value)
}

/// Expands a tryte string into trits.
pub fn trytes_to_trits(trytes: &str) -> Result<Vec<Trit>, EncodingError> {
    let mut trits = Vec::with_capacity(trytes.len() * TRITS_PER_TRYTE);
    for c in trytes.chars() {
        trits.extend_from_slice(&tryte_trits(tryte_value(c)?));
    }
    Ok(trits)
}

/// Packs trits into a tryte string. The trit count must be a multiple of 3.
pub fn trits_to_trytes(trits: &[Trit]) -> Result<String, EncodingError> {
    if trits.len() % TRITS_PER_TRYTE != 0 {
        return Err(EncodingError::InvalidLength {
            len: trits.len(),
            multiple: TRITS_PER_TRYTE,
        });
    }
    trits
        .chunks(TRITS_PER_TRYTE)
        .map(|chunk| tryte_of(chunk).map(tryte_char))
        .collect()
}

/// Encodes bytes as trits, six trits per byte.
pub fn bytes_to_trits(bytes: &[u8]) -> Vec<Trit> {
    let mut trits = vec![0; bytes.len() * TRITS_PER_BYTE];
    for (byte, out) in bytes.iter().zip(trits.chunks_mut(TRITS_PER_BYTE)) {
        let value = *byte as i8 as i128;
        let low = (value - MIN_TRYTE_VALUE as i128).rem_euclid(27) + MIN_TRYTE_VALUE as i128;
        let high = (value - low) / 27;
        write_balanced(low, &mut out[..TRITS_PER_TRYTE]);
        write_balanced(high, &mut out[TRITS_PER_TRYTE..]);
    }
    trits
}

/// Decodes trits produced by [`bytes_to_trits`].
///
/// Fails when the trit count is not a multiple of 6 or a tryte pair does not
/// describe a value in the `i8` range.
pub fn trits_to_bytes(trits: &[Trit]) -> Result<Vec<u8>, EncodingError> {
    if trits.len() % TRITS_PER_BYTE != 0 {
        return Err(EncodingError::InvalidLength {
            len: trits.len(),
            multiple: TRITS_PER_BYTE,
        });
    }
    trits
        .chunks(TRITS_PER_BYTE)
        .map(|chunk| {
            let low = tryte_of(&chunk[..TRITS_PER_TRYTE])? as i16;
            let high = tryte_of(&chunk[TRITS_PER_TRYTE..])? as i16;
            let value = low + 27 * high;
            i8::try_from(value)
                .map(|v| v as u8)
                .map_err(|_| EncodingError::ByteOutOfRange(value))
        })
        .collect()
}

/// Writes a signed integer into a fixed-width trit field.
pub fn write_int(value: i128, out: &mut [Trit]) -> Result<(), EncodingError> {
    if write_balanced(value, out) != 0 {
        return Err(EncodingError::Overflow {
            value,
            width: out.len(),
        });
    }
    Ok(())
}

/// Encodes a signed integer as exactly `width` trits.
pub fn int_to_trits(value: i64, width: usize) -> Result<Vec<Trit>, EncodingError> {
    let mut trits = vec![0; width];
    write_int(value as i128, &mut trits)?;
    Ok(trits)
}

/// Decodes a little-endian trit field into an `i64`.
pub fn trits_to_int(trits: &[Trit]) -> Result<i64, EncodingError> {
    let mut acc: i128 = 0;
    for &trit in trits.iter().rev() {
        acc = acc * 3 + check_trit(trit)? as i128;
        // Magnitude only grows from here on, so overflow is final.
        if acc.abs() > i64::MAX as i128 {
            return Err(EncodingError::Overflow {
                value: acc,
                width: trits.len(),
            });
        }
    }
    Ok(acc as i64)
}

/// Adds `value` to a little-endian trit number in place, wrapping on overflow.
pub fn add_assign(trits: &mut [Trit], value: u64) {
    let mut carry = value as i128;
    for trit in trits.iter_mut() {
        if carry == 0 {
            break;
        }
        let sum = *trit as i128 + carry;
        let digit = (sum + 1).rem_euclid(3) - 1;
        *trit = digit as Trit;
        carry = (sum - digit) / 3;
    }
}

/// Number of consecutive zero trits at the end of `trits`.
pub fn trailing_zeros(trits: &[Trit]) -> usize {
    trits.iter().rev().take_while(|&&t| t == 0).count()
}

/// Right-pads a tryte string with `9` up to `len` trytes.
///
/// Fails if the input is already longer than `len` or contains a symbol
/// outside the tryte alphabet.
pub fn pad_trytes(trytes: &str, len: usize) -> Result<String, EncodingError> {
    if let Some(c) = trytes.chars().find(|&c| tryte_value(c).is_err()) {
        return Err(EncodingError::InvalidTryte(c));
    }
    let actual = trytes.chars().count();
    if actual > len {
        return Err(EncodingError::WrongLength {
            expected: len,
            actual,
        });
    }
    let mut padded = String::with_capacity(len);
    padded.push_str(trytes);
    padded.extend(std::iter::repeat('9').take(len - actual));
    Ok(padded)
}

/// Parses exactly `N / 3` trytes into a trit array.
pub(crate) fn fixed_trits<const N: usize>(trytes: &str) -> Result<[Trit; N], EncodingError> {
    let actual = trytes.chars().count();
    if actual * TRITS_PER_TRYTE != N {
        return Err(EncodingError::WrongLength {
            expected: N / TRITS_PER_TRYTE,
            actual,
        });
    }
    fixed_from_trits(&trytes_to_trits(trytes)?)
}

/// Copies exactly `N` valid trits into an array.
pub(crate) fn fixed_from_trits<const N: usize>(trits: &[Trit]) -> Result<[Trit; N], EncodingError> {
    if trits.len() != N {
        return Err(EncodingError::WrongLength {
            expected: N,
            actual: trits.len(),
        });
    }
    let mut out = [0; N];
    for (dst, &src) in out.iter_mut().zip(trits) {
        *dst = check_trit(src)?;
    }
    Ok(out)
}
