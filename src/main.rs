#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! forknet-keys command line: generate phrases, derive keys, and write or read backup files.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use forknet_keys::constants::MIN_PASSWORD_LEN;
use forknet_keys::{
    backup, generate, seedphrase_to_private_key, BackupEnvelope, PrivateKey, Wordlist,
};

#[derive(Parser)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a new 12 word recovery phrase
    Generate {
        #[arg(
            short,
            long,
            help = "Categorized wordlist JSON file (defaults to the BIP-39 English list)"
        )]
        wordlist: Option<PathBuf>,
    },
    /// Derive the Base58 private key for a recovery phrase
    Derive {
        #[arg(short, long, help = "Recovery phrase, 12 to 24 words")]
        phrase: String,
    },
    /// Write an encrypted backup file for a private key
    Export {
        #[arg(short, long, help = "Base58 private key")]
        key: String,
        #[arg(short, long, help = "Password to encrypt the backup")]
        password: String,
        #[arg(short, long, help = "Account address recorded in the backup")]
        address: String,
        #[arg(short, long, default_value = ".", help = "Directory to write the backup file into")]
        out: PathBuf,
    },
    /// Read a backup file and print its private key
    Import {
        #[arg(short, long, help = "Backup JSON file")]
        file: PathBuf,
        #[arg(short, long, default_value = "", help = "Password the backup was created with")]
        password: String,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries keys and phrases.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate { wordlist } => {
            let wordlist = match wordlist {
                Some(path) => Wordlist::from_json_file(&path)
                    .with_context(|| format!("loading wordlist {}", path.display()))?,
                None => Wordlist::bip39_english(),
            };
            let phrase = generate(&wordlist).context("generating recovery phrase")?;
            println!("{}", phrase);
        }
        Command::Derive { phrase } => {
            let key = seedphrase_to_private_key(&phrase)
                .context("deriving private key from phrase")?;
            println!("{}", key.to_base58());
        }
        Command::Export {
            key,
            password,
            address,
            out,
        } => {
            if password.chars().count() < MIN_PASSWORD_LEN {
                bail!("password must be at least {} characters", MIN_PASSWORD_LEN);
            }
            let key = PrivateKey::from_base58(&key).context("parsing private key")?;
            let envelope = backup::encrypt(&key, &password, &address).context("encrypting backup")?;
            let path = envelope
                .write_to_dir(&out)
                .with_context(|| format!("writing backup into {}", out.display()))?;
            println!("{}", path.display());
        }
        Command::Import { file, password } => {
            let envelope = BackupEnvelope::read_from_file(&file)
                .with_context(|| format!("reading backup {}", file.display()))?;
            let key = backup::decrypt(&envelope, &password).context("decrypting backup")?;
            println!("{}", key.to_base58());
        }
    }
    Ok(())
}
