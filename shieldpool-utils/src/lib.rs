//! Utilities for shielded pool development, not for library or application users.

use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shieldpool_relation::{
    Config, Derived, PublicStatement, RelationError, WithdrawalRelation, Witness,
};

#[cfg(test)]
mod tests;

/// The tree depths the tools are built for.
pub const SUPPORTED_LEVELS: [usize; 3] = [16, 20, 32];

/// Initialise tracing, writing events to stderr.
///
/// Uses the `RUST_LOG` env var, or `warn` by default.
pub fn init_tracing() {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::Registry::default()
        .with(filter_layer)
        .with(fmt::layer().with_writer(io::stderr))
        .with(tracing_error::ErrorLayer::default())
        .init();
}

/// Loads the config file at `path`, or the default config if there is no path.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path,
        None => return Ok(Config::default()),
    };

    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("reading config file {}", path.display()))?;

    toml::from_str(&contents).wrap_err_with(|| format!("parsing config file {}", path.display()))
}

/// Reads the file at `path`, or stdin if `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .wrap_err("reading stdin")?;

        return Ok(input);
    }

    fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))
}

/// The outcome of checking a witness.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    /// Only the public values were derived, no statement was checked.
    Derived(Derived),

    /// The witness satisfies the statement.
    Satisfied(Derived),

    /// The witness does not satisfy the statement.
    Unsatisfied(RelationError),
}

/// Parses a JSON witness for a tree of depth `levels`, and checks it against
/// the JSON `statement`.
///
/// If there is no statement, only derives the public values of the witness.
pub fn check_json(levels: usize, witness: &str, statement: Option<&str>) -> Result<Verdict> {
    match levels {
        16 => check_json_with_depth::<16>(witness, statement),
        20 => check_json_with_depth::<20>(witness, statement),
        32 => check_json_with_depth::<32>(witness, statement),
        _ => Err(eyre!(
            "unsupported tree depth {levels}, supported depths are {SUPPORTED_LEVELS:?}"
        )),
    }
}

fn check_json_with_depth<const LEVELS: usize>(
    witness: &str,
    statement: Option<&str>,
) -> Result<Verdict> {
    let witness: Witness<LEVELS> =
        serde_json::from_str(witness).wrap_err("parsing witness JSON")?;
    let relation = WithdrawalRelation::<LEVELS>::new();

    let statement: PublicStatement = match statement {
        Some(statement) => serde_json::from_str(statement).wrap_err("parsing statement JSON")?,
        None => {
            return Ok(match relation.derive(&witness) {
                Ok(derived) => Verdict::Derived(derived),
                Err(error) => Verdict::Unsatisfied(error),
            })
        }
    };

    Ok(match relation.evaluate(&witness, &statement) {
        Ok(derived) => Verdict::Satisfied(derived),
        Err(error) => Verdict::Unsatisfied(error),
    })
}
