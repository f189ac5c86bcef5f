//! Nullable infrastructure for deterministic testing.
//!
//! The node and the clock are the client's only outside dependencies. The
//! implementations here keep everything in memory, are controlled from the
//! test, and never touch the network.

pub mod clock;
pub mod node;

pub use clock::NullClock;
pub use node::NullNode;
