//! Command-line front-end: generate proofs, verify them, and convert proving
//! keys between the JSON and native binary layouts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use log::info;
use rand::rngs::OsRng;

use circom_groth16::parsers::{bin, json};
use circom_groth16::{create_random_proof, verify_proof, ProvingKey, Witness};

/// Groth16 zkSNARK prover and verifier for circom/snarkjs artifacts.
#[derive(Parser)]
#[command(name = "circom-groth16", version, about, long_about = None)]
struct Cli {
    /// Prover mode: read the proving key and witness, write proof and
    /// public signals.
    #[arg(long)]
    prove: bool,

    /// Verifier mode: check a proof against the verification key and
    /// public signals.
    #[arg(long)]
    verify: bool,

    /// Convert mode: round-trip a JSON proving key into the native binary
    /// layout.
    #[arg(long)]
    convert: bool,

    /// Proving key path (.json, .bin, or .go.bin).
    #[arg(long, default_value = "proving_key.json")]
    pk: PathBuf,

    /// Witness path (.json or .bin).
    #[arg(long, default_value = "witness.json")]
    witness: PathBuf,

    /// Proof path.
    #[arg(long, default_value = "proof.json")]
    proof: PathBuf,

    /// Verification key path.
    #[arg(long, default_value = "verification_key.json")]
    vk: PathBuf,

    /// Public signals path.
    #[arg(long, default_value = "public.json")]
    public: PathBuf,

    /// Native binary proving key path, for --convert.
    #[arg(long, default_value = "proving_key.go.bin")]
    pkbin: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let result = if cli.prove {
        cmd_prove(&cli)
    } else if cli.verify {
        cmd_verify(&cli)
    } else if cli.convert {
        cmd_convert(&cli)
    } else {
        Cli::command().print_help().ok();
        return;
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn load_pk(path: &Path) -> Result<ProvingKey> {
    let name = path.to_string_lossy();
    info!("reading proving key file: {name}");
    let pk = if name.ends_with(".go.bin") {
        bin::parse_pk_native_bin(&mut fs::File::open(path)?)?
    } else if name.ends_with(".bin") {
        bin::parse_pk_bin(&mut fs::File::open(path)?)?
    } else {
        json::parse_pk(&fs::read(path)?)?
    };
    Ok(pk)
}

fn load_witness(path: &Path) -> Result<Witness> {
    info!("reading witness file: {}", path.display());
    let w = if path.extension().is_some_and(|e| e == "bin") {
        bin::parse_witness_bin(&mut fs::File::open(path)?)?
    } else {
        json::parse_witness(&fs::read(path)?)?
    };
    Ok(w)
}

fn cmd_prove(cli: &Cli) -> Result<()> {
    let pk = load_pk(&cli.pk).with_context(|| format!("loading {}", cli.pk.display()))?;
    let witness =
        load_witness(&cli.witness).with_context(|| format!("loading {}", cli.witness.display()))?;

    info!("generating the proof");
    let start = std::time::Instant::now();
    let (proof, public_signals) = create_random_proof(&pk, &witness, &mut OsRng)?;
    info!("proof generation took {:?}", start.elapsed());

    fs::write(&cli.proof, serde_json::to_vec(&json::proof_to_json(&proof))?)?;
    fs::write(
        &cli.public,
        serde_json::to_vec(&json::public_signals_to_json(&public_signals))?,
    )?;
    info!("proof stored at: {}", cli.proof.display());
    info!("public signals stored at: {}", cli.public.display());
    Ok(())
}

fn cmd_verify(cli: &Cli) -> Result<()> {
    let proof = json::parse_proof(&fs::read(&cli.proof)?)
        .with_context(|| format!("loading {}", cli.proof.display()))?;
    let vk = json::parse_vk(&fs::read(&cli.vk)?)
        .with_context(|| format!("loading {}", cli.vk.display()))?;
    let public = json::parse_public_signals(&fs::read(&cli.public)?)
        .with_context(|| format!("loading {}", cli.public.display()))?;

    let ok = verify_proof(&vk, &proof, &public);
    println!("verification: {ok}");
    Ok(())
}

fn cmd_convert(cli: &Cli) -> Result<()> {
    let name = cli.pk.to_string_lossy();
    if name.ends_with(".bin") {
        bail!("--convert expects a JSON proving key as --pk");
    }
    let pk = load_pk(&cli.pk)?;

    info!(
        "converting proving key json ({}) to native binary ({})",
        cli.pk.display(),
        cli.pkbin.display()
    );
    fs::write(&cli.pkbin, bin::pk_to_bin(&pk))?;
    Ok(())
}
