//! High-level client over any [`NodeApi`].

use tangle_bundle::BundleBuilder;
use tangle_crypto::{add_checksum, derive_address};
use tangle_types::{Address, Bundle, Clock, Hash, Input, Seed, SystemClock, Transfer};
use tangle_work::{Attacher, Tips, WorkCancel, WorkGenerator};

use crate::config::ClientConfig;
use crate::node::{NodeApi, NodeInfo};
use crate::scanner::{find_unused_address, AddressScanner};
use crate::traversal::traverse_and_validate;
use crate::ClientError;

pub struct Client<N, C = SystemClock> {
    node: N,
    config: ClientConfig,
    attacher: Attacher<C>,
}

impl<N: NodeApi> Client<N, SystemClock> {
    pub fn new(node: N, config: ClientConfig) -> Result<Self, ClientError> {
        let generator = WorkGenerator::with_threads(config.work_threads)?;
        Ok(Self {
            node,
            config,
            attacher: Attacher::new(generator),
        })
    }
}

impl<N: NodeApi, C: Clock> Client<N, C> {
    /// Swaps the clock used for bundle and attachment timestamps.
    pub fn with_clock<D: Clock>(self, clock: D) -> Client<N, D> {
        Client {
            node: self.node,
            config: self.config,
            attacher: self.attacher.with_clock(clock),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    /// Derives the checksummed address at `index` without asking the node.
    pub fn address(&self, seed: &Seed, index: u64) -> Address {
        add_checksum(derive_address(seed, index, self.config.security_level))
    }

    /// First address from `start` on that the node has no transactions for.
    pub fn get_new_address(&self, seed: &Seed, start: u64) -> Result<(u64, Address), ClientError> {
        find_unused_address(
            &self.node,
            seed,
            self.config.security_level,
            start,
            self.config.max_address_index,
        )
    }

    /// Lazily scans addresses from `start` up to the configured bound.
    pub fn scan_addresses<'a>(&'a self, seed: &'a Seed, start: u64) -> AddressScanner<'a, N> {
        AddressScanner::new(
            &self.node,
            seed,
            self.config.security_level,
            start,
            self.config.max_address_index,
        )
    }

    /// Builds and signs a bundle paying `outputs` from `inputs`; any surplus
    /// goes to `remainder`.
    pub fn prepare_transfers(
        &self,
        seed: &Seed,
        outputs: Vec<Transfer>,
        inputs: Vec<Input>,
        remainder: Option<Address>,
    ) -> Result<Bundle, ClientError> {
        let spends = !inputs.is_empty();
        let mut builder = BundleBuilder::new(self.config.security_level)
            .with_clock(self.attacher.clock())
            .outputs(outputs);
        for input in inputs {
            builder = builder.input(input);
        }
        if let Some(address) = remainder {
            builder = builder.remainder(address);
        }
        let bundle = if spends {
            builder.build(seed)?
        } else {
            builder.build_unsigned()?
        };
        Ok(bundle)
    }

    /// Fetches and validates the bundle whose tail is `tail`.
    pub fn get_bundle(&self, tail: &Hash) -> Result<Bundle, ClientError> {
        traverse_and_validate(&self.node, tail, self.config.max_bundle_length)
    }

    /// Attaches `bundle` on top of `tips`, then stores and broadcasts it.
    pub fn attach_and_broadcast(
        &self,
        bundle: Bundle,
        tips: &Tips,
        cancel: &WorkCancel,
    ) -> Result<Bundle, ClientError> {
        let attached =
            self.attacher
                .attach(bundle, tips, self.config.min_weight_magnitude, cancel)?;
        let trytes = attached.to_trytes()?;
        self.node.store_transactions(&trytes)?;
        self.node.broadcast_transactions(&trytes)?;
        tracing::info!(transactions = trytes.len(), "bundle broadcast");
        Ok(attached)
    }

    pub fn node_info(&self) -> Result<NodeInfo, ClientError> {
        Ok(self.node.get_node_info()?)
    }
}
