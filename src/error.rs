/// Crate-level error types for yiinav.
use std::path::PathBuf;

/// True failures only. Expected "not found" outcomes — a view that doesn't
/// exist, a route that matches no controller — are represented in return
/// values, never raised as errors. Each variant names the file or reason
/// so the diagnostic is useful without a debugger.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source file that should be scannable could not be read.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// The document path does not live under the workspace root.
    #[error("file is outside the workspace root: {}", path.display())]
    OutsideWorkspace {
        /// Path that failed the root check.
        path: PathBuf,
    },

    /// TOML deserialization of `.yiinav.toml` failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A reference-kind argument did not name a known kind.
    #[error("unknown reference kind: `{kind}` (expected view, partial, layout, import, route, or behavior)")]
    UnknownKind {
        /// The kind string as given on the command line.
        kind: String,
    },

    /// The filesystem watcher could not be created or started.
    #[error("watcher setup failed: {reason}")]
    WatcherSetup {
        /// Description of the watcher failure.
        reason: String,
    },
}
