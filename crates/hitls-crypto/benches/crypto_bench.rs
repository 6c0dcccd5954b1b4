//! SM9 and ShangMi primitive benchmarks.
//!
//! Run with: cargo bench -p hitls-crypto

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand_core::OsRng;

// ---------------------------------------------------------------------------
// Block cipher benchmarks
// ---------------------------------------------------------------------------

fn bench_block_ciphers(c: &mut Criterion) {
    use hitls_crypto::aes::AesKey;
    use hitls_crypto::sm4::Sm4Key;

    let mut group = c.benchmark_group("block-cipher");

    let sm4 = Sm4Key::new(&[0x42u8; 16]).unwrap();
    let mut block = [0u8; 16];
    group.bench_function("sm4/encrypt_block", |b| {
        b.iter(|| sm4.encrypt_block(&mut block).unwrap());
    });

    for key_len in [16, 32] {
        let key: Vec<u8> = (0..key_len).map(|i| i as u8).collect();
        let cipher = AesKey::new(&key).unwrap();
        let mut block = [0u8; 16];
        group.bench_function(format!("aes-{}/encrypt_block", key_len * 8), |b| {
            b.iter(|| cipher.encrypt_block(&mut block).unwrap());
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// SM3 benchmarks
// ---------------------------------------------------------------------------

fn bench_sm3(c: &mut Criterion) {
    use hitls_crypto::sm3::Sm3;

    let mut group = c.benchmark_group("sm3");

    for size in [64usize, 1024, 16384] {
        group.throughput(Throughput::Bytes(size as u64));
        let data = vec![0xabu8; size];
        group.bench_with_input(BenchmarkId::new("digest", size), &size, |b, _| {
            b.iter(|| Sm3::digest(&data).unwrap());
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// SM9 group arithmetic and pairing
// ---------------------------------------------------------------------------

fn bench_sm9_arith(c: &mut Criterion) {
    use hitls_crypto::sm9::{pair, G1Point, G2Point, Gt, Scalar};

    let mut group = c.benchmark_group("sm9-arith");
    let k = Scalar::random(&mut OsRng).unwrap();

    group.bench_function("g1/mul_base", |b| {
        b.iter(|| G1Point::mul_base(&k));
    });
    group.bench_function("g2/mul_base", |b| {
        b.iter(|| G2Point::mul_base(&k));
    });

    let p = G1Point::generator();
    let q = G2Point::generator();
    group.bench_function("pair", |b| {
        b.iter(|| pair(&p, &q));
    });

    let g = Gt::generator();
    group.bench_function("gt/pow", |b| {
        b.iter(|| g.pow(&k));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// SM9 protocol benchmarks
// ---------------------------------------------------------------------------

fn bench_sm9_sign(c: &mut Criterion) {
    use hitls_crypto::sm9::SignMasterPrivateKey;
    use hitls_types::algorithm::sm9_hid;

    let mut group = c.benchmark_group("sm9-sign");

    let master = SignMasterPrivateKey::generate(&mut OsRng).unwrap();
    let user = master.generate_user_key(b"Alice", sm9_hid::SIGN).unwrap();
    let public = master.public_key();
    let msg = b"benchmark message for SM9 signing";

    group.bench_function("sign", |b| {
        b.iter(|| user.sign(&mut OsRng, msg).unwrap());
    });

    let sig = user.sign(&mut OsRng, msg).unwrap();
    group.bench_function("verify", |b| {
        b.iter(|| assert!(public.verify(b"Alice", sm9_hid::SIGN, msg, &sig)));
    });

    group.finish();
}

fn bench_sm9_encrypt(c: &mut Criterion) {
    use hitls_crypto::sm9::{EncryptMasterPrivateKey, EncrypterOpts};
    use hitls_types::algorithm::{sm9_hid, SymCipherId};

    let mut group = c.benchmark_group("sm9-encrypt");

    let master = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
    let user = master.generate_user_key(b"Bob", sm9_hid::ENCRYPT).unwrap();
    let public = master.public_key();
    let plaintext = vec![0u8; 1024];

    for (name, opts) in [
        ("xor", EncrypterOpts::Xor),
        ("sm4-cbc", EncrypterOpts::Cbc(SymCipherId::Sm4)),
    ] {
        group.bench_function(format!("{name}/encrypt"), |b| {
            b.iter(|| {
                public
                    .encrypt(&mut OsRng, b"Bob", sm9_hid::ENCRYPT, &plaintext, &opts)
                    .unwrap()
            });
        });

        let ct = public
            .encrypt(&mut OsRng, b"Bob", sm9_hid::ENCRYPT, &plaintext, &opts)
            .unwrap();
        group.bench_function(format!("{name}/decrypt"), |b| {
            b.iter(|| user.decrypt(b"Bob", &ct, &opts).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_block_ciphers,
    bench_sm3,
    bench_sm9_arith,
    bench_sm9_sign,
    bench_sm9_encrypt,
);
criterion_main!(benches);
