use criterion::{criterion_group, criterion_main, Criterion};

use scloudplus::traits::{Decaps, Encaps, KeyGen};
use scloudplus::{scloud_plus_128, scloud_plus_192, scloud_plus_256};

#[allow(clippy::redundant_closure)]
pub fn criterion_benchmark(c: &mut Criterion) {
    let (ek_128, dk_128) = scloud_plus_128::KG::try_keygen().unwrap();
    let (_, ct_128) = ek_128.try_encaps().unwrap();
    let (ek_192, dk_192) = scloud_plus_192::KG::try_keygen().unwrap();
    let (_, ct_192) = ek_192.try_encaps().unwrap();
    let (ek_256, dk_256) = scloud_plus_256::KG::try_keygen().unwrap();
    let (_, ct_256) = ek_256.try_encaps().unwrap();

    c.bench_function("scloud_plus_128 KeyGen", |b| b.iter(|| scloud_plus_128::KG::try_keygen()));
    c.bench_function("scloud_plus_128 Encaps", |b| b.iter(|| ek_128.try_encaps()));
    c.bench_function("scloud_plus_128 Decaps", |b| b.iter(|| dk_128.try_decaps(&ct_128)));

    c.bench_function("scloud_plus_192 KeyGen", |b| b.iter(|| scloud_plus_192::KG::try_keygen()));
    c.bench_function("scloud_plus_192 Encaps", |b| b.iter(|| ek_192.try_encaps()));
    c.bench_function("scloud_plus_192 Decaps", |b| b.iter(|| dk_192.try_decaps(&ct_192)));

    c.bench_function("scloud_plus_256 KeyGen", |b| b.iter(|| scloud_plus_256::KG::try_keygen()));
    c.bench_function("scloud_plus_256 Encaps", |b| b.iter(|| ek_256.try_encaps()));
    c.bench_function("scloud_plus_256 Decaps", |b| b.iter(|| dk_256.try_decaps(&ct_256)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
