//! Bounded search for an address the tangle has not seen yet.

use tangle_crypto::{add_checksum, derive_address};
use tangle_types::{Address, SecurityLevel, Seed};

use crate::node::NodeApi;
use crate::ClientError;

/// One derived address and whether the node knows transactions for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedAddress {
    pub index: u64,
    pub address: Address,
    pub used: bool,
}

/// Derives addresses from `start` through `max_index`, asking the node
/// about each. The only blocking point is the node lookup.
pub struct AddressScanner<'a, N: ?Sized> {
    node: &'a N,
    seed: &'a Seed,
    security: SecurityLevel,
    next: u64,
    max_index: u64,
    done: bool,
}

impl<'a, N: NodeApi + ?Sized> AddressScanner<'a, N> {
    pub fn new(
        node: &'a N,
        seed: &'a Seed,
        security: SecurityLevel,
        start: u64,
        max_index: u64,
    ) -> Self {
        Self {
            node,
            seed,
            security,
            next: start,
            max_index,
            done: start > max_index,
        }
    }
}

impl<N: NodeApi + ?Sized> Iterator for AddressScanner<'_, N> {
    type Item = Result<ScannedAddress, ClientError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let index = self.next;
        if index >= self.max_index {
            self.done = true;
        } else {
            self.next += 1;
        }

        let address = add_checksum(derive_address(self.seed, index, self.security));
        let used = match self.node.find_transactions(&[address]) {
            Ok(hashes) => !hashes.is_empty(),
            Err(e) => {
                self.done = true;
                return Some(Err(e.into()));
            }
        };
        tracing::debug!(index, used, "scanned address");
        Some(Ok(ScannedAddress {
            index,
            address,
            used,
        }))
    }
}

/// First unused address at or after `start`, with its checksum.
pub fn find_unused_address<N: NodeApi + ?Sized>(
    node: &N,
    seed: &Seed,
    security: SecurityLevel,
    start: u64,
    max_index: u64,
) -> Result<(u64, Address), ClientError> {
    for scanned in AddressScanner::new(node, seed, security, start, max_index) {
        let scanned = scanned?;
        if !scanned.used {
            tracing::info!(index = scanned.index, "found unused address");
            return Ok((scanned.index, scanned.address));
        }
    }
    tracing::warn!(start, max_index, "address scan exhausted");
    Err(ClientError::Exhausted { max_index })
}
