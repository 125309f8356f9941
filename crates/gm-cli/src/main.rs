//! Command-line interface for `gmcrypt`.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gm_accel::{Backend, Capability, Scalar, Wide};
use gm_core::sm4::{Block, RoundKeys, Sm4Key, BLOCK_SIZE};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// SM4 / SM3 CLI.
#[derive(Parser)]
#[command(
    name = "gmcrypt",
    version,
    author,
    about = "SM4 block cipher and SM3 hash (GB/T 32907, GB/T 32905)"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the 32 round keys derived from a key.
    Keys {
        /// SM4 key as 32 hex characters (whitespace allowed).
        #[arg(long, value_name = "HEX")]
        key_hex: String,
    },
    /// Encrypt one block, then decrypt it back.
    Block {
        /// SM4 key as 32 hex characters (whitespace allowed).
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Plaintext block as 32 hex characters (whitespace allowed).
        #[arg(long, value_name = "HEX")]
        plain_hex: String,
        /// Also print the round-key schedule.
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },
    /// Encrypt a file of 16-byte blocks, each independently.
    Enc {
        /// SM4 key as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Input file (must be a multiple of 16 bytes).
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Output ciphertext path.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
        /// Execution strategy.
        #[arg(long, value_enum, default_value_t = BackendChoice::Auto)]
        backend: BackendChoice,
    },
    /// Decrypt a file of 16-byte blocks, each independently.
    Dec {
        /// SM4 key as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Input file (ciphertext).
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Output plaintext path.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
        /// Execution strategy.
        #[arg(long, value_enum, default_value_t = BackendChoice::Auto)]
        backend: BackendChoice,
    },
    /// Print the SM3 digest of a string or a file.
    Hash {
        /// Message given on the command line.
        #[arg(long, conflicts_with = "input", required_unless_present = "input")]
        text: Option<String>,
        /// File to hash.
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
        /// Execution strategy.
        #[arg(long, value_enum, default_value_t = BackendChoice::Auto)]
        backend: BackendChoice,
    },
    /// Verify a backend matches the scalar reference on random samples.
    Check {
        /// Strategy to compare against the scalar path.
        #[arg(long, value_enum, default_value_t = BackendChoice::Auto)]
        backend: BackendChoice,
        /// Number of random samples to test.
        #[arg(long, default_value_t = 64)]
        samples: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a local demo: random key and block, encrypt, decrypt back, hash.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BackendChoice {
    /// Pick from the detected CPU capability.
    Auto,
    /// Reference implementation.
    Scalar,
    /// Fused tables, 4 lanes.
    Wide4,
    /// Fused tables, 8 lanes.
    Wide8,
}

impl BackendChoice {
    fn build(self) -> Box<dyn Backend + Send + Sync> {
        match self {
            Self::Auto => gm_accel::select(Capability::detect()),
            Self::Scalar => Box::new(Scalar),
            Self::Wide4 => Box::new(Wide::<4>),
            Self::Wide8 => Box::new(Wide::<8>),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Keys { key_hex } => cmd_keys(&key_hex),
        Commands::Block {
            key_hex,
            plain_hex,
            verbose,
        } => cmd_block(&key_hex, &plain_hex, verbose),
        Commands::Enc {
            key_hex,
            input,
            output,
            backend,
        } => cmd_crypt(&key_hex, &input, &output, backend, Direction::Encrypt),
        Commands::Dec {
            key_hex,
            input,
            output,
            backend,
        } => cmd_crypt(&key_hex, &input, &output, backend, Direction::Decrypt),
        Commands::Hash {
            text,
            input,
            backend,
        } => cmd_hash(text, input, backend),
        Commands::Check {
            backend,
            samples,
            seed,
        } => cmd_check(backend, samples, seed),
        Commands::Demo { seed } => cmd_demo(seed),
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

fn cmd_keys(key_hex: &str) -> Result<()> {
    let key = parse_key_hex(key_hex)?;
    print_round_keys(&gm_core::sm4::expand_key(&key));
    Ok(())
}

fn cmd_block(key_hex: &str, plain_hex: &str, verbose: bool) -> Result<()> {
    let key = parse_key_hex(key_hex)?;
    let plain = parse_block_hex(plain_hex)?;
    let round_keys = gm_core::sm4::expand_key(&key);
    if verbose {
        print_round_keys(&round_keys);
    }

    let cipher = gm_core::sm4::encrypt_block(&plain, &round_keys);
    let verify = gm_core::sm4::decrypt_block(&cipher, &round_keys);
    println!("ciphertext: {}", words_hex(&cipher));
    println!("decrypted: {}", words_hex(&verify));
    if verify != plain {
        bail!("decryption did not restore the plaintext");
    }
    Ok(())
}

fn cmd_crypt(
    key_hex: &str,
    input_path: &Path,
    output_path: &Path,
    choice: BackendChoice,
    direction: Direction,
) -> Result<()> {
    let key = parse_key_hex(key_hex)?;
    let backend = choice.build();
    let round_keys = backend.expand_key(&key);
    let data = fs::read(input_path).with_context(|| format!("read {}", input_path.display()))?;
    if data.len() % BLOCK_SIZE != 0 {
        bail!("input length must be a multiple of {BLOCK_SIZE} bytes");
    }

    let mut blocks: Vec<Block> = data
        .chunks_exact(BLOCK_SIZE)
        .map(|chunk| {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            block
        })
        .collect();
    match direction {
        Direction::Encrypt => backend.encrypt_blocks(&round_keys, &mut blocks),
        Direction::Decrypt => backend.decrypt_blocks(&round_keys, &mut blocks),
    }

    let out: Vec<u8> = blocks.concat();
    fs::write(output_path, out).with_context(|| format!("write {}", output_path.display()))?;
    Ok(())
}

fn cmd_hash(text: Option<String>, input: Option<PathBuf>, choice: BackendChoice) -> Result<()> {
    let message = match (text, input) {
        (Some(text), _) => text.into_bytes(),
        (None, Some(path)) => fs::read(&path).with_context(|| format!("read {}", path.display()))?,
        (None, None) => bail!("either --text or --input is required"),
    };
    let digest = choice.build().hash(&message).context("hash message")?;
    println!("{}", hex::encode(digest));
    Ok(())
}

fn cmd_check(choice: BackendChoice, samples: usize, seed: Option<u64>) -> Result<()> {
    let backend = choice.build();
    let mut rng = seeded_rng(seed);

    for _ in 0..samples {
        let mut key_bytes = [0u8; 16];
        rng.fill_bytes(&mut key_bytes);
        let key = Sm4Key::from(key_bytes);
        let round_keys = Scalar.expand_key(&key);
        if backend.expand_key(&key) != round_keys {
            bail!("{}: key schedule differs from scalar", backend.name());
        }

        let mut blocks = vec![[0u8; BLOCK_SIZE]; 1 + (rng.next_u32() % 16) as usize];
        for block in blocks.iter_mut() {
            rng.fill_bytes(block);
        }
        let mut expected = blocks.clone();
        Scalar.encrypt_blocks(&round_keys, &mut expected);
        let mut actual = blocks.clone();
        backend.encrypt_blocks(&round_keys, &mut actual);
        if actual != expected {
            bail!("{}: encryption differs from scalar", backend.name());
        }
        backend.decrypt_blocks(&round_keys, &mut actual);
        if actual != blocks {
            bail!("{}: decryption did not restore the plaintext", backend.name());
        }

        let mut message = vec![0u8; (rng.next_u32() % 512) as usize];
        rng.fill_bytes(&mut message);
        if backend.hash(&message)? != Scalar.hash(&message)? {
            bail!("{}: digest differs from scalar", backend.name());
        }
    }
    println!("{}: {} samples match the scalar reference", backend.name(), samples);
    Ok(())
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key_bytes = [0u8; 16];
    rng.fill_bytes(&mut key_bytes);
    let key = Sm4Key::from(key_bytes);
    let backend = gm_accel::detect();
    let round_keys = backend.expand_key(&key);

    let mut block = [0u8; BLOCK_SIZE];
    rng.fill_bytes(&mut block);
    let plaintext_hex = hex::encode(block);

    let mut blocks = [block];
    backend.encrypt_blocks(&round_keys, &mut blocks);
    let ciphertext_hex = hex::encode(blocks[0]);
    backend.decrypt_blocks(&round_keys, &mut blocks);
    let decrypted_hex = hex::encode(blocks[0]);

    println!("backend: {}", backend.name());
    println!("demo key: {}", hex::encode(key_bytes));
    println!("plaintext: {}", plaintext_hex);
    println!("ciphertext: {}", ciphertext_hex);
    println!("decrypted: {}", decrypted_hex);
    println!("sm3(plaintext): {}", hex::encode(backend.hash(&block)?));
    if decrypted_hex != plaintext_hex {
        bail!("demo roundtrip failed");
    }
    Ok(())
}

fn print_round_keys(round_keys: &RoundKeys) {
    for (i, rk) in round_keys.iter().enumerate() {
        print!("rk[{i:2}] = {rk:08x}  ");
        if (i + 1) % 4 == 0 {
            println!();
        }
    }
}

fn words_hex(block: &Block) -> String {
    block
        .chunks_exact(4)
        .map(hex::encode)
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_hex16(hex_str: &str, what: &str) -> Result<[u8; 16]> {
    let compact: String = hex_str.split_whitespace().collect();
    let bytes = hex::decode(&compact).with_context(|| format!("decode {what} hex"))?;
    if bytes.len() != 16 {
        bail!("{what} must be 16 bytes (32 hex characters), got {}", bytes.len());
    }
    let mut out = [0u8; 16];
    out.copy_from_slice(&bytes);
    Ok(out)
}

fn parse_key_hex(hex_str: &str) -> Result<Sm4Key> {
    Ok(Sm4Key::from(parse_hex16(hex_str, "SM4 key")?))
}

fn parse_block_hex(hex_str: &str) -> Result<Block> {
    parse_hex16(hex_str, "block")
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => ChaCha20Rng::from_entropy(),
    }
}
