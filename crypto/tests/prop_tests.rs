use proptest::prelude::*;

use tangle_crypto::{add_checksum, derive_address, normalize, parse_address, PrivateKey};
use tangle_crypto::verify_signature;
use tangle_types::{Hash, SecurityLevel, Seed};

fn seed_trytes() -> impl Strategy<Value = String> {
    "[A-Z9]{1,81}"
}

fn hash_strategy() -> impl Strategy<Value = Hash> {
    "[A-Z9]{81}".prop_map(|s| s.parse::<Hash>().unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Derivation is deterministic: same seed and index give the same address.
    #[test]
    fn derivation_is_deterministic(seed in seed_trytes(), index in 0u64..1000) {
        let seed = Seed::from_trytes(&seed).unwrap();
        let a = derive_address(&seed, index, SecurityLevel::Low);
        let b = derive_address(&seed, index, SecurityLevel::Low);
        prop_assert_eq!(a, b);
    }

    /// An address with its own checksum always parses back.
    #[test]
    fn checksummed_address_parses(hash in hash_strategy()) {
        let address = add_checksum(hash.into());
        let parsed = parse_address(&address.to_string()).unwrap();
        prop_assert_eq!(parsed.checksum(), address.checksum());
    }

    /// Every normalized chunk sums to zero and stays within tryte range.
    #[test]
    fn normalized_chunks_balance(hash in hash_strategy()) {
        let normalized = normalize(&hash);
        for chunk in normalized.chunks(27) {
            prop_assert_eq!(chunk.iter().map(|&v| v as i32).sum::<i32>(), 0);
            prop_assert!(chunk.iter().all(|v| (-13..=13).contains(v)));
        }
    }

    /// A signature verifies against its own address and hash.
    #[test]
    fn signature_verifies(seed in seed_trytes(), index in 0u64..50, hash in hash_strategy()) {
        let seed = Seed::from_trytes(&seed).unwrap();
        let key = PrivateKey::derive(&seed, index, SecurityLevel::Low);
        let address = key.address();
        let signature = key.sign(&hash);
        prop_assert!(verify_signature(&address, &signature, &hash));
    }
}
