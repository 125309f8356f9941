use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use gm_accel::{Backend, Scalar, Wide};
use gm_core::sm4::{Block, Sm4Key};

fn bench_key_schedule(c: &mut Criterion) {
    let key = Sm4Key::from([0u8; 16]);
    let mut group = c.benchmark_group("key_schedule");
    group.bench_function("scalar", |b| b.iter(|| Scalar.expand_key(&key)));
    group.bench_function("fused_tables", |b| b.iter(|| Wide::<4>.expand_key(&key)));
    group.finish();
}

fn bench_sm4(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
    let mut key = [0u8; 16];
    rng.fill_bytes(&mut key);
    let round_keys = Scalar.expand_key(&Sm4Key::from(key));

    let mut blocks: Vec<Block> = vec![[0u8; 16]; 1024];
    for block in blocks.iter_mut() {
        rng.fill_bytes(block);
    }

    let backends: [(&str, Box<dyn Backend>); 3] = [
        ("scalar", Box::new(Scalar)),
        ("wide4", Box::new(Wide::<4>)),
        ("wide8", Box::new(Wide::<8>)),
    ];

    let mut group = c.benchmark_group("sm4_encrypt_16KiB");
    group.throughput(Throughput::Bytes((blocks.len() * 16) as u64));
    for (name, backend) in backends.iter() {
        group.bench_function(*name, |b| {
            b.iter(|| {
                let mut data = blocks.clone();
                backend.encrypt_blocks(&round_keys, &mut data);
                data
            });
        });
    }
    group.finish();
}

fn bench_sm3(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([4u8; 32]);
    let mut message = vec![0u8; 16 * 1024];
    rng.fill_bytes(&mut message);

    let mut group = c.benchmark_group("sm3_16KiB");
    group.throughput(Throughput::Bytes(message.len() as u64));
    group.bench_function("scalar", |b| b.iter(|| Scalar.hash(&message)));
    group.bench_function("optimized", |b| b.iter(|| Wide::<8>.hash(&message)));
    group.finish();
}

criterion_group!(benches, bench_key_schedule, bench_sm4, bench_sm3);
criterion_main!(benches);
