#![no_main]

use libfuzzer_sys::fuzz_target;
use tangle_types::{Transaction, TRANSACTION_TRYTES};

const ALPHABET: &[u8; 27] = b"9ABCDEFGHIJKLMNOPQRSTUVWXYZ";

// Parsing arbitrary trytes never panics, and whatever parses re-encodes to
// the same string.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = Transaction::from_trytes(s);
    }

    let trytes: String = data
        .iter()
        .cycle()
        .take(if data.is_empty() { 0 } else { TRANSACTION_TRYTES })
        .map(|b| ALPHABET[(*b % 27) as usize] as char)
        .collect();
    if let Ok(tx) = Transaction::from_trytes(&trytes) {
        let encoded = tx.to_trytes().expect("parsed transaction must encode");
        assert_eq!(encoded, trytes);
        let _ = tangle_crypto::transaction_hash(&tx);
    }
});
