use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Open (creating parents) the append-only log file
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Route `log` records into `path`. The terminal is in raw mode on the
/// alternate screen, so nothing may be written to stderr. `RUST_LOG` wins over
/// the default `info` level.
pub fn init_file_logger(path: &Path) -> io::Result<()> {
    let file = open_log_file(path)?;

    // a logger may already be installed (tests, embedding); keep it
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_target(false)
        .target(Target::Pipe(Box::new(file)))
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn open_log_file_creates_parents_and_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("typespeed.log");

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn init_file_logger_tolerates_existing_logger() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("typespeed.log");
        init_file_logger(&path).unwrap();
        init_file_logger(&path).unwrap();
        assert!(path.exists());
    }
}
