//! Filesystem utilities for code generation

use std::fs;
use std::io;
use std::path::Path;

/// What a write did to the target path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Overwritten,
}

/// Write content to a file, creating parent directories if needed
pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> io::Result<WriteOutcome> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let outcome = if path.exists() {
        WriteOutcome::Overwritten
    } else {
        WriteOutcome::Created
    };

    fs::write(path, contents)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_file_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a/b/c.txt");

        assert_eq!(write_file(&path, "hello").unwrap(), WriteOutcome::Created);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_write_file_reports_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Product.cs");

        write_file(&path, "first").unwrap();
        assert_eq!(write_file(&path, "second").unwrap(), WriteOutcome::Overwritten);
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}
