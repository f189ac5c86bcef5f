//! Fundamental ternary types for the tangle client.
//!
//! This crate defines the values shared by every other crate in the
//! workspace: the trit/tryte codec, fixed-width hashes, addresses, tags and
//! seeds, the transaction wire layout, bundles and timestamps.

pub mod address;
pub mod ascii;
pub mod bundle;
pub mod error;
pub mod hash;
pub mod seed;
pub mod tag;
pub mod ternary;
pub mod time;
pub mod transaction;

pub use address::{Address, Checksum, CHECKSUM_TRITS, CHECKSUM_TRYTES};
pub use ascii::{ascii_to_trytes, trytes_to_ascii, trytes_to_ascii_trimmed};
pub use bundle::{Bundle, Input, Transfer};
pub use error::EncodingError;
pub use hash::{Hash, HASH_TRITS, HASH_TRYTES};
pub use seed::{SecurityLevel, Seed, SEED_TRITS, SEED_TRYTES};
pub use tag::{Nonce, Tag, NONCE_TRITS, TAG_TRITS, TAG_TRYTES};
pub use ternary::{
    bytes_to_trits, trits_to_bytes, trits_to_int, trits_to_trytes, trytes_to_trits, Trit,
};
pub use time::{Clock, SystemClock, Timestamp};
pub use transaction::{
    Fragment, Transaction, ESSENCE_TRITS, FRAGMENT_TRITS, FRAGMENT_TRYTES, MAX_TIMESTAMP,
    MAX_VALUE, TRANSACTION_TRITS, TRANSACTION_TRYTES,
};
