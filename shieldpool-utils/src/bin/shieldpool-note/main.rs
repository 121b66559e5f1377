//! Generates deposit notes, and prints their commitments and nullifier tags.
//!
//! Each note is printed as a JSON object with the note string, the commitment
//! to deposit, and the nullifier tag that a withdrawal will publish.
//!
//! For usage please refer to the program help: `shieldpool-note --help`

#![allow(clippy::try_err)]

use color_eyre::eyre::Result;
use serde::Serialize;
use structopt::StructOpt;

use shieldpool_relation::{note::Note, Derived};
use shieldpool_utils::init_tracing;

mod args;

/// A note and its public values.
#[derive(Serialize)]
struct NoteOutput {
    note: String,

    #[serde(flatten)]
    derived: Derived,
}

impl NoteOutput {
    fn new(note: &Note) -> Result<Self> {
        Ok(NoteOutput {
            note: note.to_string(),
            derived: note.derive()?,
        })
    }
}

fn main() -> Result<()> {
    init_tracing();

    color_eyre::install()?;

    let args = args::Args::from_args();

    let notes: Vec<Note> = match &args.note {
        Some(note) => vec![note.parse()?],
        None => {
            let mut rng = rand::thread_rng();
            std::iter::repeat_with(|| Note::random(&mut rng))
                .take(args.count)
                .collect()
        }
    };

    for note in notes.iter() {
        println!("{}", serde_json::to_string_pretty(&NoteOutput::new(note)?)?);
    }

    tracing::debug!(notes = notes.len(), "printed notes");

    Ok(())
}
