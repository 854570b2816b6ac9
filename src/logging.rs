use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Send tracing output to `path`, appending. `RUST_LOG` overrides the
/// default `info` filter.
pub fn init(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // a second init (tests, embedding) keeps the first subscriber
    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
    {
        tracing::debug!(%error, path = %path.display(), "subscriber already installed, keeping it");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_log_file_and_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("dogtap.log");
        init(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn second_init_is_not_an_error() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");
        init(&first).unwrap();
        init(&second).unwrap();
        assert!(second.exists());
    }
}
