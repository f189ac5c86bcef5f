#![no_main]

use libfuzzer_sys::fuzz_target;
use tangle_types::{
    bytes_to_trits, trits_to_bytes, trits_to_trytes, trytes_to_ascii, trytes_to_trits, Address,
    Hash, Tag,
};

fuzz_target!(|data: &[u8]| {
    // bytes survive the b1t6 round trip
    let trits = bytes_to_trits(data);
    assert_eq!(trits_to_bytes(&trits).expect("encoded bytes decode"), data);

    // arbitrary trits as bytes must fail cleanly, never panic
    let raw: Vec<i8> = data.iter().map(|b| (*b % 3) as i8 - 1).collect();
    let _ = trits_to_bytes(&raw);
    if let Ok(trytes) = trits_to_trytes(&raw) {
        assert_eq!(trytes_to_trits(&trytes).expect("encoded trytes decode"), raw);
    }

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = trytes_to_trits(s);
        let _ = trytes_to_ascii(s);
        let _ = s.parse::<Hash>();
        let _ = s.parse::<Address>();
        let _ = s.parse::<Tag>();
    }
});
