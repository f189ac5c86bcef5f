//! Bundle construction, signing and stateless validation.
//!
//! A bundle is the atomic unit of transfer: outputs, signed inputs and an
//! optional remainder whose values sum to zero and whose essences hash to
//! the shared bundle hash.

pub mod builder;
pub mod error;
mod signer;
pub mod validation;

pub use builder::{build_bundle, BundleBuilder};
pub use error::{BundleError, InvalidBundleReason};
pub use validation::{decode_transaction, validate_bundle, validate_bundle_trytes};
