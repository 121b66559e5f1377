//! Shared test setup for the shieldpool crates.
//!
//! Every test calls [`init`] first. It is cheap to call more than once.
#![warn(missing_docs)]
#![allow(clippy::try_err)]
#![forbid(unsafe_code)]

use std::{collections::HashSet, env, fmt, sync::Once};

// color-eyre's `PanicMessage` still takes the older panic info type.
#[allow(deprecated)]
use std::panic::PanicInfo;

use color_eyre::{config::Frame, section::PanicMessage};
use owo_colors::OwoColorize;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt as tracing_fmt, prelude::*, EnvFilter};

pub mod prelude;

/// The log filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "warn,shieldpool_relation=info";

/// Backtrace frames from the test runner, the panic machinery, and the thread
/// pools that run batches and property tests.
const HIDDEN_FRAME_PREFIXES: &[&str] = &[
    "std::panic",
    "std::thread::local",
    "core::ops::function::FnOnce::call_once",
    "core::result::Result",
    "<alloc::boxed::Box",
    "<std::panic::AssertUnwindSafe",
    "test::run_test_in_process",
    "test::assert_test_result",
    "rayon_core::",
    "proptest::",
];

static INIT: Once = Once::new();

/// Installs the tracing subscriber and the color-eyre report hooks.
///
/// Logs go to the test output, filtered by `RUST_LOG`.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
            .expect("default log filter is valid");

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_fmt::layer().with_target(false).with_test_writer())
            .with(ErrorLayer::default())
            .init();

        color_eyre::config::HookBuilder::default()
            .add_frame_filter(Box::new(hide_frames))
            .panic_message(TestPanicMessage)
            .install()
            .expect("color-eyre hooks are only installed once");
    })
}

/// Returns the number of proptest cases to run.
///
/// Uses the `PROPTEST_CASES` env var if it is set, or `default` otherwise.
/// Tests that hash witnesses use a small default, so each test finishes
/// in a few seconds on most machines.
pub fn proptest_cases(default: u32) -> u32 {
    env::var("PROPTEST_CASES")
        .ok()
        .and_then(|cases| cases.parse().ok())
        .unwrap_or(default)
}

/// Removes duplicate frames, and frames that match [`HIDDEN_FRAME_PREFIXES`].
fn hide_frames(frames: &mut Vec<&Frame>) {
    let mut seen = HashSet::new();

    frames.retain(|frame| {
        if !seen.insert((frame.lineno, frame.filename.clone())) {
            return false;
        }

        match frame.name.as_deref() {
            Some(name) => !HIDDEN_FRAME_PREFIXES
                .iter()
                .any(|prefix| name.starts_with(prefix)),
            None => true,
        }
    });
}

/// Prints test panics without repeating errors that a test already returned.
struct TestPanicMessage;

#[allow(deprecated)]
impl PanicMessage for TestPanicMessage {
    fn display(&self, info: &PanicInfo<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = info
            .payload()
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| info.payload().downcast_ref::<&str>().copied())
            .unwrap_or("<non string panic payload>");

        // The test harness panics after a test returns an `Err`,
        // and color-eyre has already printed the report.
        if payload.contains("the test returned a termination value with a non-zero status code") {
            return write!(f, "---- end of test output ----");
        }

        writeln!(f, "{}", "\nThe test panicked.".red())?;
        writeln!(f, "Message:  {}", payload.cyan())?;

        match info.location() {
            Some(location) => write!(
                f,
                "Location: {}:{}",
                location.file().purple(),
                location.line().purple()
            ),
            None => write!(f, "Location: <unknown>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        panic,
        sync::{Arc, Mutex},
    };

    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();

        assert!(INIT.is_completed());
    }

    #[allow(deprecated)]
    #[test]
    fn panic_message_shows_payload_and_location() {
        init();

        struct Shown<'a, 'b>(&'a PanicInfo<'b>);

        impl fmt::Display for Shown<'_, '_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                TestPanicMessage.display(self.0, f)
            }
        }

        let shown = Arc::new(Mutex::new(String::new()));
        let captured = shown.clone();

        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if let Ok(mut captured) = captured.lock() {
                *captured = Shown(info).to_string();
            }
        }));
        let result = panic::catch_unwind(|| panic!("deliberate test panic"));
        panic::set_hook(previous);

        assert!(result.is_err());

        let shown = shown.lock().expect("hook thread did not panic").clone();
        assert!(shown.contains("The test panicked."));
        assert!(shown.contains("deliberate test panic"));
        assert!(shown.contains("lib.rs"));
    }
}
