//! Proof-of-work for bundle attachment.
//!
//! Each transaction needs a nonce that leaves its Curl-P-81 hash with a
//! minimum number of trailing zero trits. The search is brute force, spread
//! over rayon workers and cancellable from another thread.

pub mod attach;
pub mod error;
pub mod generator;
pub mod validator;

pub use attach::{attach, Attacher, Tips};
pub use error::WorkError;
pub use generator::{WorkCancel, WorkGenerator};
pub use validator::{meets_min_weight, validate_attachment, validate_work};
