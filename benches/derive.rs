use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_bigint::BigUint;

use vanity_engine::crypto::{keccak256, private_key_to_address};

fn bench_keccak(c: &mut Criterion) {
    let public_key = [0x5au8; 64];
    c.bench_function("keccak256_64_bytes", |b| {
        b.iter(|| keccak256(black_box(&public_key)))
    });
}

fn bench_derive(c: &mut Criterion) {
    let k = BigUint::from_bytes_be(&[0x3cu8; 32]);
    c.bench_function("private_key_to_address", |b| {
        b.iter(|| private_key_to_address(black_box(&k)))
    });
}

criterion_group!(benches, bench_keccak, bench_derive);
criterion_main!(benches);
