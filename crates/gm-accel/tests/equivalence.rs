//! Every accelerated strategy must agree byte-for-byte with the scalar reference.

use gm_accel::{select, Backend, Capability, Scalar, Wide};
use gm_core::sm4::{Block, Sm4Key};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn strategies() -> Vec<Box<dyn Backend + Send + Sync>> {
    vec![
        Box::new(Wide::<4>),
        Box::new(Wide::<8>),
        Box::new(Wide::<16>),
        select(Capability::detect()),
    ]
}

fn random_blocks(rng: &mut ChaCha20Rng, count: usize) -> Vec<Block> {
    let mut blocks = vec![[0u8; 16]; count];
    for block in blocks.iter_mut() {
        rng.fill_bytes(block);
    }
    blocks
}

#[test]
fn key_expansion_agrees() {
    let mut rng = ChaCha20Rng::from_seed([60u8; 32]);
    for _ in 0..128 {
        let mut key = [0u8; 16];
        rng.fill_bytes(&mut key);
        let key = Sm4Key::from(key);
        let expected = Scalar.expand_key(&key);
        for backend in strategies() {
            assert_eq!(backend.expand_key(&key), expected, "{}", backend.name());
        }
    }
}

#[test]
fn encryption_and_decryption_agree() {
    let mut rng = ChaCha20Rng::from_seed([61u8; 32]);
    for _ in 0..32 {
        let mut key = [0u8; 16];
        rng.fill_bytes(&mut key);
        let rks = Scalar.expand_key(&Sm4Key::from(key));
        let count = rng.gen_range(0..40);
        let plain = random_blocks(&mut rng, count);

        let mut expected = plain.clone();
        Scalar.encrypt_blocks(&rks, &mut expected);

        for backend in strategies() {
            let mut blocks = plain.clone();
            backend.encrypt_blocks(&rks, &mut blocks);
            assert_eq!(blocks, expected, "{} encrypt", backend.name());
            backend.decrypt_blocks(&rks, &mut blocks);
            assert_eq!(blocks, plain, "{} decrypt", backend.name());
        }
    }
}

#[test]
fn hashing_agrees() {
    let mut rng = ChaCha20Rng::from_seed([62u8; 32]);
    let mut lengths: Vec<usize> = (0..=130).collect();
    lengths.extend((0..16).map(|_| rng.gen_range(131..5000)));
    for len in lengths {
        let mut message = vec![0u8; len];
        rng.fill_bytes(&mut message);
        let expected = Scalar.hash(&message).expect("scalar hash");
        for backend in strategies() {
            assert_eq!(
                backend.hash(&message).expect("padded buffer"),
                expected,
                "{} length {len}",
                backend.name()
            );
        }
    }
}

#[test]
fn standard_vectors_hold_on_every_strategy() {
    let key = [
        0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0xfe, 0xdc, 0xba, 0x98, 0x76, 0x54, 0x32,
        0x10,
    ];
    let cipher = [
        0x68, 0x1e, 0xdf, 0x34, 0xd2, 0x06, 0x96, 0x5e, 0x86, 0xb3, 0xe9, 0x4f, 0x53, 0x6e, 0x42,
        0x46,
    ];
    let abc = [
        0x66, 0xc7, 0xf0, 0xf4, 0x62, 0xee, 0xed, 0xd9, 0xd1, 0xf2, 0xd4, 0x6b, 0xdc, 0x10, 0xe4,
        0xe2, 0x41, 0x67, 0xc4, 0x87, 0x5c, 0xf2, 0xf7, 0xa2, 0x29, 0x7d, 0xa0, 0x2b, 0x8f, 0x4b,
        0xa8, 0xe0,
    ];
    for backend in strategies() {
        let rks = backend.expand_key(&Sm4Key::from(key));
        let mut blocks = [key];
        backend.encrypt_blocks(&rks, &mut blocks);
        assert_eq!(blocks[0], cipher, "{}", backend.name());
        assert_eq!(backend.hash(b"abc"), Ok(abc), "{}", backend.name());
    }
}
