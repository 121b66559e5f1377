//! shieldpool-check arguments
//!
//! For usage please refer to the program help: `shieldpool-check --help`

use std::path::PathBuf;

use structopt::StructOpt;

/// shieldpool-check arguments
#[derive(Debug, StructOpt)]
pub struct Args {
    /// Path to a TOML config file, which sets the tree depth.
    #[structopt(short, long, parse(from_os_str))]
    pub config: Option<PathBuf>,

    /// Only derive the commitment and nullifier tag of the witness note.
    #[structopt(short, long)]
    pub derive: bool,

    /// Path to the JSON witness, or `-` for stdin.
    #[structopt(parse(from_os_str))]
    pub witness: PathBuf,

    /// Path to the JSON public statement, or `-` for stdin.
    ///
    /// Required unless `--derive` is used.
    #[structopt(parse(from_os_str), required_unless = "derive")]
    pub statement: Option<PathBuf>,
}
