//! One-time signatures over bundle hashes.

use tangle_types::{Address, Fragment, Hash, Trit, FRAGMENT_TRITS, HASH_TRITS};

use crate::curl::{CurlP, Sponge};
use crate::keys::{address_from_digests, hash_segment, PrivateKey, FRAGMENT_SEGMENTS};

/// Trytes of a normalized bundle hash.
pub const NORMALIZED_TRYTES: usize = HASH_TRITS / 3;

const MIN_TRYTE: i8 = -13;
const MAX_TRYTE: i8 = 13;

/// Splits a hash into three 27-tryte chunks and shifts each to sum to zero.
///
/// A positive chunk lowers its first tryte still above -13, one step at a
/// time; a negative chunk raises its first tryte still below 13.
pub fn normalize(hash: &Hash) -> [i8; NORMALIZED_TRYTES] {
    let mut normalized = [0i8; NORMALIZED_TRYTES];
    for (value, tryte) in normalized.iter_mut().zip(hash.as_trits().chunks(3)) {
        *value = tryte[0] + 3 * tryte[1] + 9 * tryte[2];
    }
    for chunk in normalized.chunks_mut(FRAGMENT_SEGMENTS) {
        let mut sum: i32 = chunk.iter().map(|&v| v as i32).sum();
        while sum > 0 {
            if let Some(v) = chunk.iter_mut().find(|v| **v > MIN_TRYTE) {
                *v -= 1;
            }
            sum -= 1;
        }
        while sum < 0 {
            if let Some(v) = chunk.iter_mut().find(|v| **v < MAX_TRYTE) {
                *v += 1;
            }
            sum += 1;
        }
    }
    normalized
}

/// The 27 normalized trytes signed by key fragment `fragment_index`.
pub fn normalized_chunk(normalized: &[i8; NORMALIZED_TRYTES], fragment_index: usize) -> &[i8] {
    let start = (fragment_index % 3) * FRAGMENT_SEGMENTS;
    &normalized[start..start + FRAGMENT_SEGMENTS]
}

/// True when signing this hash would reveal an unhashed key segment.
pub fn is_insecure(hash: &Hash) -> bool {
    normalize(hash).contains(&MAX_TRYTE)
}

impl PrivateKey {
    /// Signs `bundle_hash`, producing one fragment per key fragment.
    ///
    /// The key is consumed: a second signature with the same key would leak
    /// enough segments to forge a third.
    pub fn sign(self, bundle_hash: &Hash) -> Vec<Fragment> {
        let normalized = normalize(bundle_hash);
        let mut curl = CurlP::default();
        self.fragments()
            .enumerate()
            .map(|(i, key_fragment)| {
                let mut signature = Box::new([0; FRAGMENT_TRITS]);
                signature.copy_from_slice(key_fragment);
                let chunk = normalized_chunk(&normalized, i);
                for (segment, &n) in signature.chunks_mut(HASH_TRITS).zip(chunk) {
                    hash_segment(&mut curl, segment, (MAX_TRYTE - n) as usize);
                }
                Fragment::from(signature)
            })
            .collect()
    }
}

/// Public digest recovered from one signature fragment.
pub fn digest_from_signature(normalized_chunk: &[i8], signature: &Fragment) -> Hash {
    let mut curl = CurlP::default();
    let mut buffer: Vec<Trit> = signature.as_trits().to_vec();
    for (segment, &n) in buffer.chunks_mut(HASH_TRITS).zip(normalized_chunk) {
        hash_segment(&mut curl, segment, (n - MIN_TRYTE) as usize);
    }
    curl.digest(&buffer)
}

/// Checks that `fragments` sign `bundle_hash` for `address`.
///
/// Returns `true` if the signature is valid, `false` otherwise.
pub fn verify_signature(address: &Address, fragments: &[Fragment], bundle_hash: &Hash) -> bool {
    if fragments.is_empty() || fragments.len() > 3 {
        return false;
    }
    let normalized = normalize(bundle_hash);
    let mut digests = Vec::with_capacity(fragments.len() * HASH_TRITS);
    for (i, fragment) in fragments.iter().enumerate() {
        let digest = digest_from_signature(normalized_chunk(&normalized, i), fragment);
        digests.extend_from_slice(digest.as_trits());
    }
    address_from_digests(&digests) == *address.hash()
}
