//! Ternary cryptography for the tangle client.
//!
//! - **Curl-P** sponge (81 and 27 rounds) for every hash
//! - **Winternitz one-time signatures** over normalized bundle hashes
//! - Address derivation from a seed, plus 9-tryte checksums

pub mod address;
pub mod curl;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{add_checksum, checksum, derive_address, parse_address, validate_checksum};
pub use curl::{CurlP, CurlRounds, Sponge};
pub use error::CryptoError;
pub use hash::{bundle_hash, curl_hash, transaction_hash};
pub use keys::{PrivateKey, Subseed};
pub use sign::{digest_from_signature, is_insecure, normalize, verify_signature};
