//! JSONL file source with polling-based tailing.

use crate::model::error::InputError;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What one poll of the file produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceUpdate {
    /// Complete lines appended since the last poll (possibly none).
    Appended(Vec<String>),
    /// The file shrank; these are all of its complete lines, read from the
    /// start. The consumer should replace everything it holds.
    Reset(Vec<String>),
}

impl SourceUpdate {
    /// The lines carried by this update.
    pub fn lines(&self) -> &[String] {
        match self {
            Self::Appended(lines) | Self::Reset(lines) => lines,
        }
    }
}

/// Reads a JSONL log file incrementally.
///
/// Tracks the byte offset of the last complete line. A trailing line
/// without `\n` is held back until it is finished.
#[derive(Debug)]
pub struct LogFileSource {
    path: PathBuf,
    position: u64,
    /// Complete lines consumed so far (1-based source line of the next one
    /// is `lines_read + 1`)
    lines_read: usize,
    reader: BufReader<File>,
}

impl LogFileSource {
    /// Open `path` positioned at its start.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    /// Returns `InputError::Io` for other I/O errors.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        info!(path = %path.display(), "Opened log file");

        Ok(Self {
            path: path.to_path_buf(),
            position: 0,
            lines_read: 0,
            reader: BufReader::new(file),
        })
    }

    /// Path being tailed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Source line number (1-based) of the next line to be read.
    pub fn next_source_line(&self) -> usize {
        self.lines_read + 1
    }

    /// Complete lines appended since the last read.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` on read or seek failure.
    pub fn read_new_lines(&mut self) -> Result<Vec<String>, InputError> {
        self.reader.seek(SeekFrom::Start(self.position))?;

        let mut lines = Vec::new();
        let mut buffer = String::new();

        loop {
            buffer.clear();
            let bytes_read = self.reader.read_line(&mut buffer)?;
            if bytes_read == 0 || !buffer.ends_with('\n') {
                // EOF, or a partial line still being written
                break;
            }

            self.position += bytes_read as u64;
            lines.push(buffer.trim_end_matches(['\n', '\r']).to_string());
            self.lines_read += 1;
        }

        if !lines.is_empty() {
            debug!(count = lines.len(), position = self.position, "Read new lines");
        }
        Ok(lines)
    }

    /// Poll the file, detecting truncation.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` on metadata, read or seek failure.
    pub fn poll(&mut self) -> Result<SourceUpdate, InputError> {
        let len = self.reader.get_ref().metadata()?.len();
        if len < self.position {
            info!(
                path = %self.path.display(),
                previous = self.position,
                len,
                "Log file truncated, rereading from start"
            );
            self.position = 0;
            self.lines_read = 0;
            return Ok(SourceUpdate::Reset(self.read_new_lines()?));
        }
        Ok(SourceUpdate::Appended(self.read_new_lines()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, OpenOptions};
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn append(path: &Path, contents: &str) {
        let mut file = OpenOptions::new().append(true).open(path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn open_returns_file_not_found_for_missing_file() {
        let missing = std::env::temp_dir().join("exlv_missing_source_12345.jsonl");

        let result = LogFileSource::open(&missing);

        assert!(matches!(result, Err(InputError::FileNotFound { path }) if path == missing));
    }

    #[test]
    fn read_new_lines_returns_initial_content() {
        let path = temp_file("exlv_source_initial.jsonl", "{\"a\":1}\n{\"a\":2}\n");
        let mut source = LogFileSource::open(&path).unwrap();

        let lines = source.read_new_lines().unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(lines, vec!["{\"a\":1}", "{\"a\":2}"]);
        assert_eq!(source.next_source_line(), 3);
    }

    #[test]
    fn read_new_lines_returns_only_appended_lines() {
        let path = temp_file("exlv_source_append.jsonl", "first\n");
        let mut source = LogFileSource::open(&path).unwrap();
        source.read_new_lines().unwrap();

        append(&path, "second\n");
        let lines = source.read_new_lines().unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(lines, vec!["second"]);
    }

    #[test]
    fn partial_line_is_held_back_until_complete() {
        let path = temp_file("exlv_source_partial.jsonl", "done\nhalf");
        let mut source = LogFileSource::open(&path).unwrap();

        assert_eq!(source.read_new_lines().unwrap(), vec!["done"]);

        append(&path, "-written\n");
        let lines = source.read_new_lines().unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(lines, vec!["half-written"]);
    }

    #[test]
    fn crlf_endings_are_stripped() {
        let path = temp_file("exlv_source_crlf.jsonl", "a\r\n\r\nb\r\n");
        let mut source = LogFileSource::open(&path).unwrap();

        let lines = source.read_new_lines().unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(lines, vec!["a", "", "b"]);
        assert_eq!(source.next_source_line(), 4);
    }

    #[test]
    fn poll_detects_truncation() {
        let path = temp_file("exlv_source_truncate.jsonl", "one\ntwo\nthree\n");
        let mut source = LogFileSource::open(&path).unwrap();
        assert_eq!(
            source.poll().unwrap(),
            SourceUpdate::Appended(vec!["one".into(), "two".into(), "three".into()])
        );

        fs::write(&path, "fresh\n").unwrap();
        let update = source.poll().unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(update, SourceUpdate::Reset(vec!["fresh".into()]));
    }
}
