//! sigstore-keygen CLI — `skg` command.
//!
//! Generates a sigstore-compatible key pair and writes both PEM blocks to
//! stdout. Nothing is written to disk.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use sigstore_keygen::{
    generate_and_publish, Argon2Params, KdfParams, KeyPairSink, KeygenConfig, KeygenError, PrivateKeyLabel,
    PRIVATE_KEY_SLOT, PUBLIC_KEY_SLOT,
};

// ── Passphrase helper ─────────────────────────────────────────────────────────

/// Read one line from stdin. Only the line terminator is stripped; other
/// whitespace is part of the passphrase.
fn read_passphrase(prompt: &str) -> Result<Zeroizing<String>> {
    eprint!("{prompt}");
    read_passphrase_from(&mut std::io::stdin().lock())
}

/// Read one passphrase line from `input`. End of input is an error, not an
/// empty passphrase; an empty line is an empty passphrase.
fn read_passphrase_from(input: &mut impl BufRead) -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    let read = input
        .read_line(&mut line)
        .context("failed to read passphrase")?;
    if read == 0 {
        return Err(anyhow!("unexpected end of input while reading passphrase"));
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(line)
}

// ── Output sink ───────────────────────────────────────────────────────────────

/// Writes the published key pair to a byte stream.
///
/// The whole rendering is built first and handed to the stream in one
/// `write_all`, so a rendering failure writes nothing.
struct WriterSink<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> WriterSink<W> {
    fn render(&self, public_key_pem: &str, private_key_pem: &str) -> std::io::Result<Zeroizing<Vec<u8>>> {
        let mut buf = Zeroizing::new(Vec::new());
        match self.format {
            OutputFormat::Pem => {
                buf.extend_from_slice(public_key_pem.as_bytes());
                buf.extend_from_slice(private_key_pem.as_bytes());
            }
            OutputFormat::Json => {
                let mut slots = serde_json::Map::new();
                slots.insert(PUBLIC_KEY_SLOT.to_string(), public_key_pem.into());
                slots.insert(PRIVATE_KEY_SLOT.to_string(), private_key_pem.into());
                serde_json::to_writer_pretty(&mut *buf, &slots)?;
                buf.push(b'\n');
            }
        }
        Ok(buf)
    }

    fn write_all(&mut self, public_key_pem: &str, private_key_pem: &str) -> std::io::Result<()> {
        let rendered = self.render(public_key_pem, private_key_pem)?;
        self.out.write_all(&rendered)?;
        self.out.flush()
    }
}

impl<W: Write> KeyPairSink for WriterSink<W> {
    fn publish(&mut self, public_key_pem: &str, private_key_pem: &str) -> sigstore_keygen::Result<()> {
        self.write_all(public_key_pem, private_key_pem)
            .map_err(|e| KeygenError::Publish(format!("write to stdout: {e}")))
    }
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// sigstore-keygen CLI — generate ECDSA P-256 key pairs for sigstore signing.
#[derive(Parser, Debug)]
#[command(
    name = "skg",
    about = "sigstore-keygen CLI",
    version,
    long_about = "skg — sigstore-keygen CLI\n\nGenerate an ECDSA P-256 key pair, encrypt the private key with a\npassphrase, and print both halves as PEM."
)]
struct Cli {
    /// Enable verbose output on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a key pair and print it to stdout
    Generate {
        /// Read the passphrase (and its confirmation) from stdin instead of
        /// using an empty passphrase
        #[arg(long)]
        prompt_passphrase: bool,

        /// Passphrase KDF for the private key encryption
        #[arg(long, value_enum, default_value_t = KdfPreset::Scrypt)]
        kdf: KdfPreset,

        /// PEM label for the encrypted private key
        #[arg(long, value_enum, default_value_t = LabelArg::Sigstore)]
        label: LabelArg,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pem)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum KdfPreset {
    /// scrypt N=32768 r=8 p=1 with NaCl secretbox (readable by cosign)
    Scrypt,
    /// Argon2id 64 MiB, 3 iterations, 4 lanes
    Argon2id,
    /// Argon2id 19 MiB, 2 iterations, 1 lane
    Argon2idInteractive,
}

impl From<KdfPreset> for KdfParams {
    fn from(preset: KdfPreset) -> Self {
        match preset {
            KdfPreset::Scrypt => KdfParams::default(),
            KdfPreset::Argon2id => KdfParams::Argon2id(Argon2Params::default()),
            KdfPreset::Argon2idInteractive => KdfParams::Argon2id(Argon2Params::interactive()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LabelArg {
    /// ENCRYPTED SIGSTORE PRIVATE KEY
    Sigstore,
    /// ENCRYPTED COSIGN PRIVATE KEY
    Cosign,
}

impl From<LabelArg> for PrivateKeyLabel {
    fn from(label: LabelArg) -> Self {
        match label {
            LabelArg::Sigstore => PrivateKeyLabel::Sigstore,
            LabelArg::Cosign => PrivateKeyLabel::Cosign,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Public key PEM followed by private key PEM
    Pem,
    /// JSON object keyed by cosignPublicKey / cosignPrivateKey
    Json,
}

// ── Main entry point ──────────────────────────────────────────────────────────

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let verbose = cli.verbose;

    let result = match cli.command {
        Commands::Generate {
            prompt_passphrase,
            kdf,
            label,
            format,
        } => cmd_generate(prompt_passphrase, kdf, label, format, verbose),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

// ── Command implementations ───────────────────────────────────────────────────

/// `skg generate [--prompt-passphrase] [--kdf PRESET] [--label LABEL] [--format FORMAT]`
fn cmd_generate(
    prompt_passphrase: bool,
    kdf: KdfPreset,
    label: LabelArg,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let passphrase = if prompt_passphrase {
        let passphrase = read_passphrase("Enter passphrase for private key: ")?;
        let confirm = read_passphrase("Confirm passphrase: ")?;
        if *passphrase != *confirm {
            return Err(anyhow!("passphrases do not match"));
        }
        passphrase
    } else {
        Zeroizing::new(String::new())
    };

    let config = KeygenConfig::default()
        .with_kdf(kdf.into())
        .with_private_key_label(label.into());
    config.validate()?;

    if verbose {
        eprintln!("Curve:     {}", config.curve.name());
        eprintln!("KDF:       {}", config.kdf);
        eprintln!("Label:     {}", config.private_key_label.as_str());
        if passphrase.is_empty() {
            eprintln!("Passphrase: (empty)");
        }
    }

    let mut sink = WriterSink {
        out: std::io::stdout().lock(),
        format,
    };
    generate_and_publish(&mut sink, &mut OsRng, passphrase.as_bytes(), &config)
        .context("failed to generate key pair")?;

    log::info!("generated key pair ({})", config.private_key_label.as_str());
    Ok(())
}
