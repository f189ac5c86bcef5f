//! Nonce search (multi-threaded CPU).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::WorkError;
use tangle_crypto::{CurlP, Sponge};
use tangle_types::ternary::add_assign;
use tangle_types::transaction::layout;
use tangle_types::{Nonce, Trit, HASH_TRITS, NONCE_TRITS, TRANSACTION_TRITS};

/// Trits absorbed once before the search; only the final block changes.
const MIDSTATE_TRITS: usize = TRANSACTION_TRITS - HASH_TRITS;

/// Offset of the nonce within the final block.
const NONCE_OFFSET: usize = layout::NONCE.start - MIDSTATE_TRITS;

/// Attempts per worker between checks of the found/cancel flags.
const BATCH_SIZE: u64 = 256;

const NOT_FOUND: u64 = u64::MAX;

/// Cancels a running search from another thread.
#[derive(Clone, Debug, Default)]
pub struct WorkCancel(Arc<AtomicBool>);

impl WorkCancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Searches transaction nonces on a rayon pool.
///
/// Worker `w` of `n` tries nonce counters `w, w + n, w + 2n, ...`; the
/// first hit stops the rest.
#[derive(Default)]
pub struct WorkGenerator {
    pool: Option<rayon::ThreadPool>,
}

impl WorkGenerator {
    /// Uses `threads` workers, or the global rayon pool when zero.
    pub fn with_threads(threads: usize) -> Result<Self, WorkError> {
        if threads == 0 {
            return Ok(Self::default());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("tangle-work-{i}"))
            .build()?;
        Ok(Self { pool: Some(pool) })
    }

    fn workers(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
        .max(1)
    }

    /// Finds a nonce for `transaction` (all 8019 trits, nonce field ignored)
    /// whose Curl-P-81 hash ends in `min_weight_magnitude` zero trits.
    pub fn search(
        &self,
        transaction: &[Trit],
        min_weight_magnitude: u8,
        cancel: &WorkCancel,
    ) -> Result<Nonce, WorkError> {
        if transaction.len() != TRANSACTION_TRITS {
            return Err(tangle_types::EncodingError::WrongLength {
                expected: TRANSACTION_TRITS,
                actual: transaction.len(),
            }
            .into());
        }
        let mwm = min_weight_magnitude as usize;
        if mwm > HASH_TRITS {
            return Err(WorkError::InvalidMinWeight(min_weight_magnitude));
        }
        if cancel.is_cancelled() {
            return Err(WorkError::Cancelled);
        }
        if mwm == 0 {
            return Ok(Nonce::ZERO);
        }

        let mut midstate = CurlP::default();
        midstate.absorb(&transaction[..MIDSTATE_TRITS]);
        let mut last_block = [0 as Trit; HASH_TRITS];
        last_block.copy_from_slice(&transaction[MIDSTATE_TRITS..]);
        last_block[NONCE_OFFSET..].fill(0);

        let found = AtomicU64::new(NOT_FOUND);
        let workers = self.workers();
        let stride = workers as u64;

        let run = || {
            (0..workers).into_par_iter().for_each(|worker| {
                let mut block = last_block;
                let mut counter = worker as u64;
                add_assign(&mut block[NONCE_OFFSET..], counter);
                let mut curl = midstate.clone();

                loop {
                    if found.load(Ordering::Relaxed) != NOT_FOUND || cancel.is_cancelled() {
                        return;
                    }
                    for _ in 0..BATCH_SIZE {
                        curl.clone_from(&midstate);
                        curl.absorb(&block);
                        if curl.state()[HASH_TRITS - mwm..HASH_TRITS].iter().all(|&t| t == 0) {
                            let _ = found.compare_exchange(
                                NOT_FOUND,
                                counter,
                                Ordering::Relaxed,
                                Ordering::Relaxed,
                            );
                            return;
                        }
                        counter += stride;
                        add_assign(&mut block[NONCE_OFFSET..], stride);
                    }
                }
            })
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }

        match found.load(Ordering::Relaxed) {
            NOT_FOUND => Err(WorkError::Cancelled),
            counter => {
                let mut nonce = [0; NONCE_TRITS];
                add_assign(&mut nonce, counter);
                Ok(Nonce::new(nonce))
            }
        }
    }
}
