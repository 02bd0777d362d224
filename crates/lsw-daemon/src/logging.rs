//! Tracing setup: stdout plus one append-only file per server start.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Create `log_dir` if needed and open a log file named after the current
/// RFC3339 time.
pub fn open_log_file(log_dir: &Path) -> Result<(PathBuf, File)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("create log directory '{}'", log_dir.display()))?;

    let path = log_dir.join(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

    let mut opts = OpenOptions::new();
    opts.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let file = opts
        .open(&path)
        .with_context(|| format!("open log file '{}'", path.display()))?;

    Ok((path, file))
}

/// Install the global subscriber writing to stdout and `file`.
///
/// Filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing(file: File) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stdout.and(Arc::new(file)))
        .init();
}
