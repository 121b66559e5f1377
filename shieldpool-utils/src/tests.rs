use std::io::Write;

use shieldpool_relation::{note::Note, tree::MerkleTree, Base};

use super::*;

/// Returns JSON for a deposited note's witness, and its statement.
fn withdrawal_json() -> (String, PublicStatement, Derived) {
    let note = Note::random(&mut rand::thread_rng());
    let derived = note.derive().expect("random notes are in range");

    let mut tree = MerkleTree::<16>::new();
    tree.append(Base::from(3u64)).expect("tree has room");
    let position = tree.append(derived.commitment).expect("tree has room");

    let witness = note.to_witness(tree.path(position).expect("leaf was appended"));
    let statement = PublicStatement {
        root: tree.root(),
        nullifier_tag: derived.nullifier_tag,
    };

    (
        serde_json::to_string(&witness).expect("witness serializes"),
        statement,
        derived,
    )
}

#[test]
fn satisfied_witness() {
    shieldpool_test::init();

    let (witness, statement, derived) = withdrawal_json();
    let statement = serde_json::to_string(&statement).expect("statement serializes");

    assert_eq!(
        check_json(16, &witness, Some(&statement)).expect("JSON is valid"),
        Verdict::Satisfied(derived)
    );
    assert_eq!(
        check_json(16, &witness, None).expect("JSON is valid"),
        Verdict::Derived(derived)
    );
}

#[test]
fn unsatisfied_witness() {
    shieldpool_test::init();

    let (witness, mut statement, _) = withdrawal_json();
    statement.nullifier_tag += Base::one();
    let statement = serde_json::to_string(&statement).expect("statement serializes");

    assert_eq!(
        check_json(16, &witness, Some(&statement)).expect("JSON is valid"),
        Verdict::Unsatisfied(RelationError::NullifierTagMismatch)
    );
}

#[test]
fn depth_must_match() {
    shieldpool_test::init();

    let (witness, _, _) = withdrawal_json();

    let error = check_json(20, &witness, None).expect_err("witness has 16 levels");
    assert!(error
        .chain()
        .any(|cause| cause.to_string().contains("authentication path has 16 levels")));

    let error = check_json(17, &witness, None).expect_err("17 levels is unsupported");
    assert!(error.to_string().contains("unsupported tree depth 17"));
}

#[test]
fn config_files() {
    shieldpool_test::init();

    assert_eq!(load_config(None).expect("default config"), Config::default());

    let mut file = tempfile::NamedTempFile::new().expect("temp file is created");
    writeln!(file, "levels = 32").expect("temp file is writable");
    let config = load_config(Some(file.path())).expect("config is valid");
    assert_eq!(config.levels, 32);
    assert_eq!(config.batch_threads, 0);

    let mut file = tempfile::NamedTempFile::new().expect("temp file is created");
    writeln!(file, "depth = 32").expect("temp file is writable");
    assert!(load_config(Some(file.path())).is_err());
}
