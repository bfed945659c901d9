//! Line-buffered output file writer.
//!
//! Exactly one line is held in a pending slot; it only reaches the file when
//! the next line arrives or the writer is finished. The one-line lag lets
//! the class emitter retract a trailing separator line after the fact
//! (`delete_last_line`) and extend the line it just wrote
//! (`append_to_last_line`), without tracking whether more content follows.

use crate::render::build_indent;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only writer over a single output file.
///
/// State machine: the pending slot is either empty or holds one line.
/// `append` swaps a new line in and writes the old one out; `delete_last_line`
/// empties the slot; `finish` (or `Drop`) flushes whatever is still pending.
#[derive(Debug)]
pub struct FileWriter {
    path: PathBuf,
    file: File,
    pending: Option<String>,
}

impl FileWriter {
    /// Open `path` for writing. Refuses to touch an existing file — output
    /// targets are created exactly once per run.
    pub fn create(path: impl AsRef<Path>) -> Result<FileWriter> {
        let path = path.as_ref().to_path_buf();

        if path.exists() {
            bail!("{} already exists", path.display());
        }

        let file =
            File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;

        Ok(FileWriter {
            path,
            file,
            pending: None,
        })
    }

    /// Buffer a line, writing out the previously buffered one.
    ///
    /// Empty content stays empty — no indentation is added to blank lines.
    pub fn append(&mut self, content: &str, indent_lvl: usize) -> Result<()> {
        let line = if content.is_empty() {
            String::new()
        } else {
            format!("{}{}", build_indent(indent_lvl), content)
        };

        self.swap_line(Some(line))
    }

    /// Extend the currently buffered line. Errors when nothing is buffered.
    pub fn append_to_last_line(&mut self, suffix: &str) -> Result<()> {
        match self.pending.as_mut() {
            Some(line) => {
                line.push_str(suffix);
                Ok(())
            }
            None => bail!(
                "no buffered line to append to in {}",
                self.path.display()
            ),
        }
    }

    /// Discard the buffered line so it is never written.
    pub fn delete_last_line(&mut self) {
        self.pending = None;
    }

    /// Flush the buffered line and close out the writer.
    pub fn finish(mut self) -> Result<()> {
        self.swap_line(None)?;
        self.file
            .flush()
            .with_context(|| format!("failed to flush {}", self.path.display()))
    }

    /// Swap the pending slot; write the previous occupant, trailing
    /// whitespace trimmed, with a line terminator.
    fn swap_line(&mut self, new: Option<String>) -> Result<()> {
        let previous = std::mem::replace(&mut self.pending, new);

        if let Some(line) = previous {
            self.file
                .write_all(line.trim_end().as_bytes())
                .and_then(|_| self.file.write_all(b"\n"))
                .with_context(|| format!("failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }
}

impl Drop for FileWriter {
    /// Backstop flush for exit paths that skip `finish` (early `?` returns).
    fn drop(&mut self) {
        let _ = self.swap_line(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn target(dir: &TempDir) -> PathBuf {
        dir.path().join("out.php")
    }

    #[test]
    fn lines_are_written_in_order() {
        let dir = TempDir::new().unwrap();
        let mut writer = FileWriter::create(target(&dir)).unwrap();
        writer.append("testing", 0).unwrap();
        writer.append("123", 1).unwrap();
        writer.append("456", 2).unwrap();
        writer.finish().unwrap();

        let content = fs::read_to_string(target(&dir)).unwrap();
        assert_eq!(content, "testing\n    123\n        456\n");
    }

    #[test]
    fn delete_drops_only_the_buffered_line() {
        let dir = TempDir::new().unwrap();
        let mut writer = FileWriter::create(target(&dir)).unwrap();
        writer.append("a", 0).unwrap();
        writer.append("b", 0).unwrap();
        writer.delete_last_line();
        writer.finish().unwrap();

        let content = fs::read_to_string(target(&dir)).unwrap();
        assert_eq!(content, "a\n", "\"b\" must never reach the file");
    }

    #[test]
    fn append_to_last_line_extends_in_place() {
        let dir = TempDir::new().unwrap();
        let mut writer = FileWriter::create(target(&dir)).unwrap();
        writer.append("class Foo", 0).unwrap();
        writer.append_to_last_line(" extends Bar").unwrap();
        writer.append("{", 0).unwrap();
        writer.finish().unwrap();

        let content = fs::read_to_string(target(&dir)).unwrap();
        assert_eq!(content, "class Foo extends Bar\n{\n");
    }

    #[test]
    fn append_to_last_line_without_buffer_fails() {
        let dir = TempDir::new().unwrap();
        let mut writer = FileWriter::create(target(&dir)).unwrap();
        assert!(writer.append_to_last_line("x").is_err());
    }

    #[test]
    fn existing_target_is_refused() {
        let dir = TempDir::new().unwrap();
        fs::write(target(&dir), "occupied").unwrap();

        let err = FileWriter::create(target(&dir)).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        // The existing file is untouched.
        assert_eq!(fs::read_to_string(target(&dir)).unwrap(), "occupied");
    }

    #[test]
    fn trailing_whitespace_is_trimmed_on_write() {
        let dir = TempDir::new().unwrap();
        let mut writer = FileWriter::create(target(&dir)).unwrap();
        writer.append("content   ", 0).unwrap();
        writer.append("", 0).unwrap();
        writer.finish().unwrap();

        assert_eq!(fs::read_to_string(target(&dir)).unwrap(), "content\n\n");
    }

    #[test]
    fn drop_flushes_pending_line() {
        let dir = TempDir::new().unwrap();
        {
            let mut writer = FileWriter::create(target(&dir)).unwrap();
            writer.append("pending", 0).unwrap();
        }
        assert_eq!(fs::read_to_string(target(&dir)).unwrap(), "pending\n");
    }
}
