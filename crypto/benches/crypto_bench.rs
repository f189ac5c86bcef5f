use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tangle_crypto::{curl_hash, derive_address, CurlP, CurlRounds, PrivateKey, Sponge};
use tangle_types::{Hash, SecurityLevel, Seed, TRANSACTION_TRITS};

fn curl81_transaction_bench(c: &mut Criterion) {
    let trits = vec![1i8; TRANSACTION_TRITS];

    c.bench_function("curl81_transaction", |b| {
        b.iter(|| curl_hash(black_box(&trits)))
    });
}

fn curl27_hash_bench(c: &mut Criterion) {
    let trits = [-1i8; 243];

    c.bench_function("curl27_243_trits", |b| {
        b.iter(|| CurlP::new(CurlRounds::Rounds27).digest(black_box(&trits)))
    });
}

fn derive_address_bench(c: &mut Criterion) {
    let seed = Seed::from_trytes("BENCHSEED").unwrap();

    c.bench_function("derive_address_security_2", |b| {
        b.iter(|| derive_address(&seed, black_box(0), SecurityLevel::Medium))
    });
}

fn sign_bench(c: &mut Criterion) {
    let seed = Seed::from_trytes("BENCHSEED").unwrap();
    let hash: Hash = "A".repeat(81).parse().unwrap();

    c.bench_function("sign_security_1", |b| {
        b.iter(|| PrivateKey::derive(&seed, 0, SecurityLevel::Low).sign(black_box(&hash)))
    });
}

criterion_group!(
    benches,
    curl81_transaction_bench,
    curl27_hash_bench,
    derive_address_bench,
    sign_bench,
);
criterion_main!(benches);
