//! Checks a withdrawal witness against a public statement.
//!
//! Prints `satisfied` and the derived values, or the reason the relation does
//! not hold. Exits with a non-zero status if the witness is not accepted.
//!
//! For usage please refer to the program help: `shieldpool-check --help`

#![allow(clippy::try_err)]

use color_eyre::eyre::{eyre, Result};
use structopt::StructOpt;

use shieldpool_utils::{check_json, init_tracing, load_config, read_input, Verdict};

mod args;

fn main() -> Result<()> {
    init_tracing();

    color_eyre::install()?;

    let args = args::Args::from_args();
    let config = load_config(args.config.as_deref())?;

    let witness = read_input(&args.witness)?;
    let statement = match (&args.statement, args.derive) {
        (Some(path), false) => Some(read_input(path)?),
        _ => None,
    };

    tracing::debug!(levels = config.levels, derive = args.derive, "checking witness");

    match check_json(config.levels, &witness, statement.as_deref())? {
        Verdict::Derived(derived) => {
            println!("{}", serde_json::to_string_pretty(&derived)?);
        }
        Verdict::Satisfied(derived) => {
            println!("satisfied");
            println!("{}", serde_json::to_string_pretty(&derived)?);
        }
        Verdict::Unsatisfied(error) => {
            println!("not satisfied: {error}");
            return Err(eyre!("witness rejected: {}", error.kind()));
        }
    }

    Ok(())
}
