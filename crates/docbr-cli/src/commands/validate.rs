//! Validate command - check a CPF, CNPJ or CNH number.

use clap::Args;
use tracing::info;

use docbr_core::{validate, IdentifierKind};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Identifier kind: cpf, cnpj or cnh
    kind: IdentifierKind,

    /// Value to check; punctuation is ignored
    value: String,
}

pub async fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let outcome = validate(args.kind, &args.value);
    info!("Validated {} {:?}: {}", outcome.kind, outcome.input, outcome.is_valid);

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if !outcome.is_valid {
        anyhow::bail!(
            "{} {} is not valid",
            outcome.kind.as_str().to_uppercase(),
            outcome.input
        );
    }

    Ok(())
}
