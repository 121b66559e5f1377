//! shieldpool-note arguments
//!
//! For usage please refer to the program help: `shieldpool-note --help`

use structopt::StructOpt;

/// shieldpool-note arguments
#[derive(Debug, StructOpt)]
pub struct Args {
    /// Derive the public values of an existing note string, instead of
    /// generating new notes.
    #[structopt(short, long)]
    pub note: Option<String>,

    /// The number of notes to generate.
    #[structopt(default_value = "1", short, long)]
    pub count: usize,
}
