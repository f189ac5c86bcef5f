//! The Curl-P sponge.
//!
//! A 729-trit state with a 243-trit rate. Each transform runs a fixed number
//! of rounds of a substitution over pairs of state trits.

use tangle_types::{Hash, Trit, HASH_TRITS};

pub const STATE_TRITS: usize = 3 * HASH_TRITS;

const TRUTH_TABLE: [Trit; 11] = [1, 0, -1, 2, 1, -1, 0, 2, -1, 1, 0];

/// Round count of a Curl-P instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurlRounds {
    Rounds27 = 27,
    Rounds81 = 81,
}

/// Absorb/squeeze interface over trits.
pub trait Sponge {
    fn reset(&mut self);

    /// Absorbs `input` in rate-sized chunks, transforming after each.
    fn absorb(&mut self, input: &[Trit]);

    /// Fills `out` from the state, transforming after each rate-sized chunk.
    fn squeeze_into(&mut self, out: &mut [Trit]);

    fn squeeze(&mut self, len: usize) -> Vec<Trit> {
        let mut out = vec![0; len];
        self.squeeze_into(&mut out);
        out
    }

    /// Resets, absorbs `input` and squeezes one hash.
    fn digest(&mut self, input: &[Trit]) -> Hash {
        let mut out = [0; HASH_TRITS];
        self.reset();
        self.absorb(input);
        self.squeeze_into(&mut out);
        Hash::new(out)
    }
}

/// A Curl-P instance. Each caller owns its own; nothing is shared.
#[derive(Clone)]
pub struct CurlP {
    rounds: usize,
    state: [Trit; STATE_TRITS],
    scratch: [Trit; STATE_TRITS],
}

impl CurlP {
    pub fn new(rounds: CurlRounds) -> Self {
        Self {
            rounds: rounds as usize,
            state: [0; STATE_TRITS],
            scratch: [0; STATE_TRITS],
        }
    }

    pub fn state(&self) -> &[Trit; STATE_TRITS] {
        &self.state
    }

    fn transform(&mut self) {
        for _ in 0..self.rounds {
            self.scratch.copy_from_slice(&self.state);
            let mut index = 0usize;
            for slot in self.state.iter_mut() {
                let prev = index;
                index = if index < 365 { index + 364 } else { index - 365 };
                let lookup = self.scratch[prev] + (self.scratch[index] << 2) + 5;
                *slot = TRUTH_TABLE[lookup as usize];
            }
        }
    }
}

impl Default for CurlP {
    fn default() -> Self {
        Self::new(CurlRounds::Rounds81)
    }
}

impl Sponge for CurlP {
    fn reset(&mut self) {
        self.state = [0; STATE_TRITS];
    }

    fn absorb(&mut self, input: &[Trit]) {
        for chunk in input.chunks(HASH_TRITS) {
            self.state[..chunk.len()].copy_from_slice(chunk);
            self.transform();
        }
    }

    fn squeeze_into(&mut self, out: &mut [Trit]) {
        for chunk in out.chunks_mut(HASH_TRITS) {
            chunk.copy_from_slice(&self.state[..chunk.len()]);
            self.transform();
        }
    }
}
