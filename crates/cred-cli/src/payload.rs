//! # Check-Payload Subcommand
//!
//! Dry-runs a credential payload through the same registry and assembler the
//! API uses for `POST /credentials`, and prints either the normalized DTO or
//! the first field that failed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use cred_api::assembler::AssemblerRegistry;

/// Arguments for the `credctl check-payload` subcommand.
#[derive(Args, Debug)]
pub struct CheckPayloadArgs {
    /// `drivers_license` or `passport`.
    #[arg(long)]
    pub credential_type: String,

    /// JSON file holding the payload.
    #[arg(value_name = "FILE")]
    pub path: PathBuf,
}

/// Execute the check-payload subcommand.
///
/// Returns exit code: 0 when the payload is accepted, 1 when it is rejected.
pub fn run_check_payload(args: &CheckPayloadArgs) -> Result<u8> {
    match check_payload(&args.credential_type, &args.path)? {
        Ok(normalized) => {
            println!("{}", serde_json::to_string_pretty(&normalized)?);
            Ok(0)
        }
        Err(rejection) => {
            eprintln!("REJECTED: {rejection}");
            Ok(1)
        }
    }
}

/// Outer error: the file could not be read or parsed. Inner error: the
/// payload was rejected by the assembler.
pub fn check_payload(credential_type: &str, path: &Path) -> Result<Result<Value, String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let payload: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let registry = AssemblerRegistry::with_defaults();
    let outcome = registry
        .resolve(credential_type)
        .and_then(|(_, assembler)| {
            let credential = assembler.to_domain(&payload)?;
            assembler.to_dto(&credential)
        });

    match outcome {
        Ok(dto) => Ok(Ok(serde_json::to_value(dto)?)),
        Err(e) => Ok(Err(e.to_string())),
    }
}
