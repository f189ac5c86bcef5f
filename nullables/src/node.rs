//! Nullable node: an in-memory tangle that records what it is sent.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tangle_client::{NodeApi, NodeError, NodeInfo};
use tangle_crypto::transaction_hash;
use tangle_types::{Address, Bundle, EncodingError, Hash, Transaction, TRANSACTION_TRYTES};

/// A test node holding transactions in memory.
pub struct NullNode {
    trytes: RefCell<HashMap<Hash, String>>,
    by_address: RefCell<HashMap<Address, Vec<Hash>>>,
    broadcasts: RefCell<Vec<Vec<String>>>,
    requests: Cell<usize>,
    unavailable: Cell<bool>,
    info: NodeInfo,
}

impl NullNode {
    pub fn new() -> Self {
        Self {
            trytes: RefCell::new(HashMap::new()),
            by_address: RefCell::new(HashMap::new()),
            broadcasts: RefCell::new(Vec::new()),
            requests: Cell::new(0),
            unavailable: Cell::new(false),
            info: NodeInfo {
                app_name: "null-node".to_string(),
                app_version: "0.0.0".to_string(),
                latest_milestone_index: 0,
            },
        }
    }

    pub fn with_info(mut self, info: NodeInfo) -> Self {
        self.info = info;
        self
    }

    /// Stores one transaction and returns its hash.
    pub fn insert_trytes(&self, trytes: &str) -> Result<Hash, EncodingError> {
        let tx = Transaction::from_trytes(trytes)?;
        let hash = transaction_hash(&tx)?;
        self.trytes.borrow_mut().insert(hash, trytes.to_string());
        let mut by_address = self.by_address.borrow_mut();
        let hashes = by_address.entry(tx.address).or_default();
        if !hashes.contains(&hash) {
            hashes.push(hash);
        }
        Ok(hash)
    }

    /// Stores every transaction of `bundle`, returning hashes in index order.
    pub fn insert_bundle(&self, bundle: &Bundle) -> Result<Vec<Hash>, EncodingError> {
        bundle
            .to_trytes()?
            .iter()
            .map(|trytes| self.insert_trytes(trytes))
            .collect()
    }

    /// Serves `trytes` for `hash` regardless of what they hash to.
    pub fn override_trytes(&self, hash: Hash, trytes: String) {
        self.trytes.borrow_mut().insert(hash, trytes);
    }

    /// Makes `address` look used without storing a transaction.
    pub fn mark_used(&self, address: Address) {
        self.by_address
            .borrow_mut()
            .entry(address)
            .or_default()
            .push(Hash::NULL);
    }

    /// Makes every request fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// Every batch passed to `broadcast_transactions` (for assertions).
    pub fn broadcasts(&self) -> Vec<Vec<String>> {
        self.broadcasts.borrow().clone()
    }

    pub fn transaction_count(&self) -> usize {
        self.trytes.borrow().len()
    }

    /// Number of requests served so far.
    pub fn requests(&self) -> usize {
        self.requests.get()
    }

    fn request(&self) -> Result<(), NodeError> {
        self.requests.set(self.requests.get() + 1);
        if self.unavailable.get() {
            return Err(NodeError::Request("null node is unavailable".to_string()));
        }
        Ok(())
    }
}

impl Default for NullNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeApi for NullNode {
    fn find_transactions(&self, addresses: &[Address]) -> Result<Vec<Hash>, NodeError> {
        self.request()?;
        let by_address = self.by_address.borrow();
        Ok(addresses
            .iter()
            .filter_map(|a| by_address.get(a))
            .flatten()
            .copied()
            .collect())
    }

    fn get_trytes(&self, hashes: &[Hash]) -> Result<Vec<String>, NodeError> {
        self.request()?;
        let trytes = self.trytes.borrow();
        Ok(hashes
            .iter()
            .map(|h| {
                trytes
                    .get(h)
                    .cloned()
                    .unwrap_or_else(|| "9".repeat(TRANSACTION_TRYTES))
            })
            .collect())
    }

    fn store_transactions(&self, trytes: &[String]) -> Result<(), NodeError> {
        self.request()?;
        for t in trytes {
            self.insert_trytes(t)
                .map_err(|e| NodeError::Request(format!("rejected transaction: {e}")))?;
        }
        Ok(())
    }

    fn broadcast_transactions(&self, trytes: &[String]) -> Result<(), NodeError> {
        self.request()?;
        self.broadcasts.borrow_mut().push(trytes.to_vec());
        Ok(())
    }

    fn get_node_info(&self) -> Result<NodeInfo, NodeError> {
        self.request()?;
        Ok(self.info.clone())
    }
}
