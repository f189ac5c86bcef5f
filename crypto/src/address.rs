//! Address derivation and checksums.
//!
//! Address = Curl(digests of the private key for `(seed, index, security)`).
//! Checksum = the last 9 trytes of Curl(address).

use tangle_types::{Address, Checksum, SecurityLevel, Seed, CHECKSUM_TRITS, HASH_TRITS};

use crate::hash::curl_hash;
use crate::keys::PrivateKey;
use crate::CryptoError;

/// Derive the address at `index`. Same inputs always give the same address.
pub fn derive_address(seed: &Seed, index: u64, security: SecurityLevel) -> Address {
    PrivateKey::derive(seed, index, security).address()
}

/// Compute the 9-tryte checksum of an address.
pub fn checksum(address: &Address) -> Checksum {
    let hash = curl_hash(address.as_trits());
    let mut trits = [0; CHECKSUM_TRITS];
    trits.copy_from_slice(&hash.as_trits()[HASH_TRITS - CHECKSUM_TRITS..]);
    Checksum::new(trits)
}

/// Return the address with its checksum attached.
pub fn add_checksum(address: Address) -> Address {
    let checksum = checksum(&address);
    address.with_checksum(checksum)
}

/// Verify the checksum carried by an address.
pub fn validate_checksum(address: &Address) -> Result<(), CryptoError> {
    let actual = address.checksum().ok_or(CryptoError::MissingChecksum)?;
    let expected = checksum(address);
    if *actual != expected {
        return Err(CryptoError::InvalidChecksum {
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// Parse an 81- or 90-tryte address, verifying the checksum when present.
pub fn parse_address(trytes: &str) -> Result<Address, CryptoError> {
    let address: Address = trytes.parse()?;
    if address.checksum().is_some() {
        validate_checksum(&address)?;
    }
    Ok(address)
}
