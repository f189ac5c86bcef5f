//! Text messages as trytes.
//!
//! Each ASCII byte becomes two tryte symbols indexed by `byte % 27` and
//! `byte / 27`. Unlike [`bytes_to_trits`](crate::bytes_to_trits) this works on
//! alphabet positions, not balanced values, so `A` (65) encodes to `KB`.

use crate::ternary::TRYTE_ALPHABET;
use crate::EncodingError;

fn alphabet_index(c: char) -> Result<usize, EncodingError> {
    TRYTE_ALPHABET
        .iter()
        .position(|&a| a as char == c)
        .ok_or(EncodingError::InvalidTryte(c))
}

pub fn ascii_to_trytes(text: &str) -> Result<String, EncodingError> {
    let mut trytes = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if !c.is_ascii() {
            return Err(EncodingError::NonAscii(c));
        }
        let byte = c as usize;
        trytes.push(TRYTE_ALPHABET[byte % 27] as char);
        trytes.push(TRYTE_ALPHABET[byte / 27] as char);
    }
    Ok(trytes)
}

/// Decodes a message written by [`ascii_to_trytes`].
///
/// `9` padding decodes to NUL characters; callers that read fixed-size
/// message fragments usually want [`trytes_to_ascii_trimmed`].
pub fn trytes_to_ascii(trytes: &str) -> Result<String, EncodingError> {
    let symbols: Vec<char> = trytes.chars().collect();
    if symbols.len() % 2 != 0 {
        return Err(EncodingError::InvalidLength {
            len: symbols.len(),
            multiple: 2,
        });
    }
    symbols
        .chunks(2)
        .map(|pair| {
            let value = alphabet_index(pair[0])? + 27 * alphabet_index(pair[1])?;
            if value > 0x7F {
                return Err(EncodingError::ByteOutOfRange(value as i16));
            }
            Ok(value as u8 as char)
        })
        .collect()
}

/// Decodes a message and strips the trailing NUL padding.
pub fn trytes_to_ascii_trimmed(trytes: &str) -> Result<String, EncodingError> {
    let mut text = trytes_to_ascii(trytes)?;
    let len = text.trim_end_matches('\0').len();
    text.truncate(len);
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_known_text() {
        assert_eq!(ascii_to_trytes("A").unwrap(), "KB");
        assert_eq!(ascii_to_trytes("").unwrap(), "");
        assert_eq!(ascii_to_trytes("Hello").unwrap().len(), 10);
    }

    #[test]
    fn decodes_what_it_encodes() {
        let text = "{\"amount\": 5, \"note\": \"coffee\"}";
        let trytes = ascii_to_trytes(text).unwrap();
        assert_eq!(trytes_to_ascii(&trytes).unwrap(), text);
    }

    #[test]
    fn rejects_non_ascii() {
        assert_eq!(ascii_to_trytes("café"), Err(EncodingError::NonAscii('é')));
    }

    #[test]
    fn rejects_odd_length_and_high_values() {
        assert!(matches!(
            trytes_to_ascii("KBA"),
            Err(EncodingError::InvalidLength { len: 3, multiple: 2 })
        ));
        // 'Z' is index 26: 26 + 27 * 26 = 728.
        assert_eq!(trytes_to_ascii("ZZ"), Err(EncodingError::ByteOutOfRange(728)));
    }

    #[test]
    fn trims_fragment_padding() {
        let mut trytes = ascii_to_trytes("hi").unwrap();
        trytes.push_str("999999");
        assert_eq!(trytes_to_ascii(&trytes).unwrap(), "hi\0\0\0");
        assert_eq!(trytes_to_ascii_trimmed(&trytes).unwrap(), "hi");
    }
}
