//! CSV archiving functionality
//!
//! An [`Archiver`] writes one CSV row per record into a file inside the
//! session's archive directory. Records must be flat structs (no nested
//! structs or sequences) so that a header row can be produced.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::{Path, PathBuf};
use std::fs::{self, File};
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
pub struct Archiver {
    path: PathBuf,
    writer: Writer<File>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot create the archive file {0:?}: {1}")]
    CreateError(PathBuf, std::io::Error),

    #[error("Cannot write a record to {0:?}: {1}")]
    WriteError(PathBuf, csv::Error),

    #[error("Cannot flush the archive {0:?}: {1}")]
    FlushError(PathBuf, std::io::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    ///
    /// Any missing parent directories are created and an existing file is
    /// truncated.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        let full_path = session.arch_root.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ArchiveError::CreateError(full_path.clone(), e))?;
        }

        let file = File::create(&full_path)
            .map_err(|e| ArchiveError::CreateError(full_path.clone(), e))?;

        let writer = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self {
            path: full_path,
            writer
        })
    }

    /// Path of the file this archiver writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(
        &mut self, record: T
    ) -> Result<(), ArchiveError> {
        self.writer.serialize(record)
            .map_err(|e| ArchiveError::WriteError(self.path.clone(), e))?;
        self.writer.flush()
            .map_err(|e| ArchiveError::FlushError(self.path.clone(), e))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        time_s: f64,
        value: i32,
    }

    #[test]
    fn test_archive_rows() {
        let mut root = std::env::temp_dir();
        root.push(format!("util_archive_test_{}", std::process::id()));

        let session = Session::new_in(root.clone(), "test_exec", "sessions").unwrap();
        assert!(session.arch_root.is_dir());
        assert!(session.log_file_path.ends_with("test_exec.log"));

        let mut arch = Archiver::from_path(&session, "module/rows.csv").unwrap();
        arch.serialise(Row { time_s: 0.0, value: 1 }).unwrap();
        arch.serialise(Row { time_s: 0.5, value: -2 }).unwrap();

        let contents = fs::read_to_string(arch.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["time_s,value", "0.0,1", "0.5,-2"]);

        assert!(crate::session::get_elapsed_seconds() >= 0.0);

        fs::remove_dir_all(&root).ok();
    }
}
