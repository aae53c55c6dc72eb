//! File watcher: runs `check` on startup, then re-runs on PHP source changes.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::commands;
use crate::config::Config;
use crate::error::Error;
use crate::indexer::ClassIndex;

/// Debounce delay between filesystem events and re-check.
const DEBOUNCE_MS: u64 = 100;

/// Create a filesystem watcher that sends changed `.php` paths on the channel.
///
/// # Errors
///
/// Returns an error if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<PathBuf>,
) -> Result<notify::RecommendedWatcher, Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
        {
            for path in event.paths {
                if path.extension().is_some_and(|ext| ext == "php") {
                    let _ = tx.send(path);
                }
            }
        }
    })
    .map_err(|e| {
        return Error::WatcherSetup {
            reason: e.to_string(),
        };
    });
}

/// Entry point for the watch command.
///
/// Runs an initial check, then watches the private source tree and re-checks
/// on changes. The class index survives across runs; only the records touched
/// by changed files are dropped before each re-check.
///
/// # Errors
///
/// Returns errors from config loading or watcher setup.
pub fn run() -> Result<ExitCode, Error> {
    let root = std::env::current_dir()?;
    let config = Config::load(&root)?;
    let protected = config.protected_root(&root);

    let mut index = ClassIndex::new();

    eprintln!("watch: initial check");
    let mut last_code = run_check(&mut index);

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;

    if protected.exists() {
        let _ = watcher.watch(&protected, RecursiveMode::Recursive);
    }

    eprintln!(
        "watch: monitoring {}, press Ctrl+C to stop",
        protected.display()
    );

    while let Ok(first) = rx.recv() {
        let mut changed = vec![first];
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while let Ok(more) = rx.recv_timeout(debounce) {
            changed.push(more);
        }

        for path in &changed {
            index.invalidate_file(path, &protected);
        }

        let count = changed.len();
        eprintln!("watch: {count} files changed, re-checking...");
        last_code = run_check(&mut index);
    }

    return Ok(last_code);
}

/// Run check once and print result. Returns the exit code from check.
fn run_check(index: &mut ClassIndex) -> ExitCode {
    return match commands::check_with_index(None, index) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(3_u8)
        },
    };
}
