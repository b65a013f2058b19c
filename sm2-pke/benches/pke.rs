//! SM2 encryption benchmarks

use core::hint::black_box;
use criterion::{
    criterion_group, criterion_main, measurement::Measurement, BenchmarkGroup, Criterion,
};
use hex_literal::hex;
use rand_core::OsRng;
use sm2_pke::{
    kdf,
    pke::{DecryptingKey, Mode},
    SecretKey,
};

const SECRET_KEY_BYTES: [u8; 32] =
    hex!("59276e27d506861a16680f3ad9c02dccef3cc1fa3cdbe4ce6d54b80deac1bc21");

const MSG: &[u8] = b"example message";

fn decrypting_key(mode: Mode) -> DecryptingKey {
    let secret_key = SecretKey::from_bytes(&SECRET_KEY_BYTES.into()).unwrap();
    DecryptingKey::new_with_mode(secret_key, mode).unwrap()
}

fn bench_encrypt<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let dk = black_box(decrypting_key(Mode::C1C3C2));
    let ek = dk.encrypting_key();
    let msg = black_box(MSG);
    group.bench_function("encrypt", |b| {
        b.iter(|| black_box(ek.encrypt(&mut OsRng, msg).unwrap()))
    });
}

fn bench_decrypt<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let dk = black_box(decrypting_key(Mode::C1C3C2));
    let ciphertext = black_box(dk.encrypting_key().encrypt(&mut OsRng, MSG).unwrap());
    group.bench_function("decrypt", |b| b.iter(|| dk.decrypt(&ciphertext)));
}

fn bench_decrypt_hex<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let dk = black_box(decrypting_key(Mode::C1C2C3));
    let ciphertext = black_box(dk.encrypting_key().encrypt_hex(&mut OsRng, MSG).unwrap());
    group.bench_function("decrypt_hex", |b| b.iter(|| dk.decrypt_hex(&ciphertext)));
}

fn bench_kdf<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let seed = black_box([0x5au8; 64]);
    group.bench_function("kdf 1KiB", |b| b.iter(|| kdf::derive(&seed, 1024)));
}

fn bench_pke(c: &mut Criterion) {
    let mut group = c.benchmark_group("SM2PKE");
    bench_encrypt(&mut group);
    bench_decrypt(&mut group);
    bench_decrypt_hex(&mut group);
    bench_kdf(&mut group);
    group.finish();
}

criterion_group!(benches, bench_pke);
criterion_main!(benches);
