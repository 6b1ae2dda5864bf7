//! File watcher: runs `check` on startup, then re-runs on documentation changes.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::commands;
use crate::error;
use crate::report::{self, Format};

/// Debounce delay between filesystem events and re-check.
const DEBOUNCE_MS: u64 = 100;

/// Create a filesystem watcher that sends events on the given channel.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
) -> Result<notify::RecommendedWatcher, error::Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return error::Error::Watch {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Entry point for the watch command.
///
/// Runs an initial check, then watches the whole root recursively and
/// re-checks after each burst of changes. Any file can be a link target,
/// so changes anywhere under the root count.
///
/// # Errors
///
/// Returns `Error::RootNotFound` if `root` is not a directory,
/// or `Error::Watch` if the watcher cannot be set up.
pub fn run(root: &Path, format: Format) -> Result<ExitCode, error::Error> {
    if !root.is_dir() {
        return Err(error::Error::RootNotFound { path: root.to_path_buf() });
    }

    eprintln!("watch: initial check");
    let mut last_code = run_check(root, format);

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;
    watcher.watch(root, RecursiveMode::Recursive).map_err(|e| {
        return error::Error::Watch {
            reason: format!("cannot watch {}: {e}", root.display()),
        };
    })?;

    eprintln!("watch: monitoring {}, press Ctrl+C to stop", root.display());

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        eprintln!("watch: change detected, re-checking...");
        last_code = run_check(root, format);
    }

    return Ok(last_code);
}

/// Run one scan and print the rendered report to stdout. The configured
/// report file is ignored here, since writing it under the root would
/// trigger another round. Returns the exit code the scan maps to.
fn run_check(root: &Path, format: Format) -> ExitCode {
    let rendered = commands::scan_root(root).and_then(|(_, scan)| {
        let text = report::render(&scan, format)?;
        return Ok((text, commands::exit_code_for(&scan)));
    });
    return match rendered {
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(3_u8)
        },
        Ok((text, code)) => {
            print!("{text}");
            code
        },
    };
}
