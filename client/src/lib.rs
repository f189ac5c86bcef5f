//! Node-facing client for the tangle.
//!
//! Everything here talks to a node through [`NodeApi`]: scanning for an
//! unused address, rebuilding and validating a bundle from its tail, and
//! attaching plus broadcasting a freshly built bundle.

pub mod client;
pub mod config;
pub mod error;
pub mod node;
pub mod scanner;
pub mod traversal;

pub use client::Client;
pub use config::ClientConfig;
pub use error::ClientError;
pub use node::{NodeApi, NodeError, NodeInfo};
pub use scanner::{find_unused_address, AddressScanner, ScannedAddress};
pub use traversal::{traverse_and_validate, traverse_bundle};
