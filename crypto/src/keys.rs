//! One-time signature keys derived from a seed.
//!
//! A key for `(seed, index)` is the Curl squeeze of the subseed
//! `curl(seed + index)`, `2187 * security` trytes long. Each 2187-tryte
//! fragment is 27 segments of one hash width; hashing every segment 26 times
//! and the fragment once more gives the fragment's public digest.

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use tangle_types::ternary::add_assign;
use tangle_types::{Address, Hash, SecurityLevel, Seed, Trit, FRAGMENT_TRITS, HASH_TRITS};

use crate::curl::{CurlP, Sponge};

/// Segments per key fragment.
pub const FRAGMENT_SEGMENTS: usize = 27;

/// Hash rounds between a key segment and its public counterpart.
pub(crate) const SEGMENT_ROUNDS: usize = 26;

/// Hash of the seed advanced by the key index.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Subseed([Trit; HASH_TRITS]);

impl Subseed {
    pub fn derive(seed: &Seed, index: u64) -> Self {
        let mut preimage = Zeroizing::new(*seed.as_trits());
        add_assign(&mut preimage[..], index);
        let mut curl = CurlP::default();
        curl.absorb(&preimage[..]);
        let mut subseed = Self([0; HASH_TRITS]);
        curl.squeeze_into(&mut subseed.0);
        curl.reset();
        subseed
    }
}

/// The private key of one address.
///
/// This type intentionally does not implement `Debug`, `Serialize`, or `Clone`.
/// Signing consumes the key, and the trits are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    trits: Vec<Trit>,
    #[zeroize(skip)]
    security: SecurityLevel,
}

impl PrivateKey {
    pub fn derive(seed: &Seed, index: u64, security: SecurityLevel) -> Self {
        let subseed = Subseed::derive(seed, index);
        let mut curl = CurlP::default();
        curl.absorb(&subseed.0);
        let mut trits = vec![0; FRAGMENT_TRITS * security.fragments()];
        curl.squeeze_into(&mut trits);
        curl.reset();
        Self { trits, security }
    }

    pub fn security(&self) -> SecurityLevel {
        self.security
    }

    pub(crate) fn fragments(&self) -> std::slice::Chunks<'_, Trit> {
        self.trits.chunks(FRAGMENT_TRITS)
    }

    /// Public digest of every key fragment, concatenated.
    pub fn digests(&self) -> Vec<Trit> {
        let mut curl = CurlP::default();
        let mut digests = Vec::with_capacity(HASH_TRITS * self.security.fragments());
        for fragment in self.fragments() {
            let mut buffer = Zeroizing::new(fragment.to_vec());
            for segment in buffer.chunks_mut(HASH_TRITS) {
                hash_segment(&mut curl, segment, SEGMENT_ROUNDS);
            }
            digests.extend_from_slice(curl.digest(&buffer).as_trits());
        }
        digests
    }

    /// The address this key signs for.
    pub fn address(&self) -> Address {
        let mut curl = CurlP::default();
        Address::new(curl.digest(&self.digests()))
    }
}

/// Hashes one segment in place `rounds` times.
pub(crate) fn hash_segment(curl: &mut CurlP, segment: &mut [Trit], rounds: usize) {
    for _ in 0..rounds {
        curl.reset();
        curl.absorb(segment);
        curl.squeeze_into(segment);
    }
}

/// Digest of a set of fragment digests; equals the signer's address hash.
pub fn address_from_digests(digests: &[Trit]) -> Hash {
    CurlP::default().digest(digests)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n_seed() -> Seed {
        Seed::from_trytes(&"N".repeat(81)).unwrap()
    }

    #[test]
    fn key_length_follows_security() {
        for level in [SecurityLevel::Low, SecurityLevel::Medium, SecurityLevel::High] {
            let key = PrivateKey::derive(&n_seed(), 0, level);
            assert_eq!(key.fragments().count(), level.fragments());
            assert_eq!(key.digests().len(), HASH_TRITS * level.fragments());
        }
    }

    #[test]
    fn key_is_deterministic() {
        let a = PrivateKey::derive(&n_seed(), 3, SecurityLevel::Low);
        let b = PrivateKey::derive(&n_seed(), 3, SecurityLevel::Low);
        assert_eq!(a.trits, b.trits);
        let c = PrivateKey::derive(&n_seed(), 4, SecurityLevel::Low);
        assert_ne!(a.trits, c.trits);
    }

    #[test]
    fn higher_security_extends_lower() {
        let low = PrivateKey::derive(&n_seed(), 0, SecurityLevel::Low);
        let high = PrivateKey::derive(&n_seed(), 0, SecurityLevel::High);
        assert_eq!(low.trits[..], high.trits[..FRAGMENT_TRITS]);
    }

    #[test]
    fn subseed_index_wraps_into_seed() {
        let seed = Seed::from_trytes("").unwrap();
        let a = Subseed::derive(&seed, 1);
        let b = Subseed::derive(&Seed::from_trytes("A").unwrap(), 0);
        assert_eq!(a.0, b.0);
    }

    #[test]
    fn address_matches_digest_hash() {
        let key = PrivateKey::derive(&n_seed(), 0, SecurityLevel::Medium);
        assert_eq!(*key.address().hash(), address_from_digests(&key.digests()));
    }
}
