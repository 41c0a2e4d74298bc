//! Per-attempt execution log.
//!
//! Plain text, one line per entry, opened in append mode for every write so a
//! separate tool can tail the file while a render runs. Every attempt gets a file
//! of its own; attempts started within the same second are numbered `_2`, `_3`, ...

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Append-only text log for one render attempt.
#[derive(Debug, Clone)]
pub struct ExecutionLog {
    path: PathBuf,
}

impl ExecutionLog {
    /// Path of the first log for a given prefix and timestamp.
    pub fn path_for(dir: &Path, prefix: &str, timestamp: &str) -> PathBuf {
        Self::numbered_path(dir, prefix, timestamp, 1)
    }

    fn numbered_path(dir: &Path, prefix: &str, timestamp: &str, n: u32) -> PathBuf {
        if n <= 1 {
            dir.join(format!("{}_{}.log", prefix, timestamp))
        } else {
            dir.join(format!("{}_{}_{}.log", prefix, timestamp, n))
        }
    }

    /// Claim a log file no earlier attempt has used and write the header line.
    pub fn create(dir: &Path, prefix: &str, timestamp: &str) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let mut n = 1;
        loop {
            let path = Self::numbered_path(dir, prefix, timestamp, n);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Self::start(path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e),
            }
        }
    }

    fn start(path: PathBuf, mut file: File) -> io::Result<Self> {
        writeln!(file, "Log file: {}", path.display())?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line.
    pub fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }

    /// Append several lines in order.
    pub fn append_all<I, S>(&self, lines: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.append(line.as_ref())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let log = ExecutionLog::create(&logs, "VPT", "2024-01-02_03.04.05").unwrap();
        assert_eq!(log.path(), logs.join("VPT_2024-01-02_03.04.05.log"));

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, format!("Log file: {}\n", log.path().display()));
    }

    #[test]
    fn test_append_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = ExecutionLog::create(dir.path(), "VPT", "t").unwrap();
        log.append_all(["one", "two"]).unwrap();
        log.append("three").unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().skip(1).collect();
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_same_timestamp_gets_numbered_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = ExecutionLog::create(dir.path(), "VPT", "2024-01-02_03.04.05").unwrap();
        first.append("first attempt").unwrap();
        let second = ExecutionLog::create(dir.path(), "VPT", "2024-01-02_03.04.05").unwrap();
        let third = ExecutionLog::create(dir.path(), "VPT", "2024-01-02_03.04.05").unwrap();

        assert_eq!(first.path(), dir.path().join("VPT_2024-01-02_03.04.05.log"));
        assert_eq!(second.path(), dir.path().join("VPT_2024-01-02_03.04.05_2.log"));
        assert_eq!(third.path(), dir.path().join("VPT_2024-01-02_03.04.05_3.log"));

        let contents = fs::read_to_string(second.path()).unwrap();
        assert_eq!(contents, format!("Log file: {}\n", second.path().display()));
        let contents = fs::read_to_string(first.path()).unwrap();
        assert!(contents.ends_with("first attempt\n"));
    }
}
