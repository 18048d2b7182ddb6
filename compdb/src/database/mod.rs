// SPDX-License-Identifier: GPL-3.0-or-later

//! This module provides the query model of the JSON compilation database.
//!
//! A compilation database is a set of records which describe the compilation of the
//! source files in a given project. Each record describes the compiler invocation
//! which compiles a source file to an object file.
//!
//! The database is loaded at once and is immutable afterwards. Lookups return
//! [`CompileCommands`] collections, which own copies of the matching records.
//! Neither the collections nor the commands in them borrow from the database.

mod command;
mod commands;
pub mod entry;
pub mod formats;
mod json;

pub use command::CompileCommand;
pub use commands::{CompileCommands, IndexOutOfRange};
pub use formats::{JsonCompilationDatabase, SerializationError, SerializationFormat};

use entry::Entry;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

/// The file name of the compilation database in a directory.
pub const DEFAULT_FILE_NAME: &str = "compile_commands.json";

/// A loaded compilation database.
#[derive(Clone, Debug)]
pub struct CompilationDatabase {
    // Records in file order, all of them in the arguments form.
    entries: Vec<Entry>,
}

impl CompilationDatabase {
    /// Loads the `compile_commands.json` file from the given directory.
    pub fn from_directory(directory: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::from_file(directory.as_ref().join(DEFAULT_FILE_NAME))
    }

    /// Loads the compilation database from the given file.
    ///
    /// The load is atomic: any I/O, syntax or entry error fails the whole load.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        Self::read(path)
            .map(|entries| Self { entries })
            .map_err(|source| LoadError::CannotLoadDatabase { path: path.to_path_buf(), source })
    }

    fn read(path: &Path) -> Result<Vec<Entry>, SerializationError> {
        let file = fs::File::open(path).map(io::BufReader::new)?;

        JsonCompilationDatabase::read(file)
            .map(|result| {
                result.and_then(|entry| entry.to_arguments().map_err(SerializationError::Semantic))
            })
            .collect()
    }

    /// The number of records in the database.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every record of the database in file order.
    pub fn all_compile_commands(&self) -> CompileCommands {
        self.entries.iter().map(CompileCommand::from).collect()
    }

    /// Returns the records which were recorded for the given source file.
    ///
    /// The file is compared with the recorded `file` field as it is, without
    /// any path normalization. Every matching record is returned in file order,
    /// or `None` when there is no match.
    pub fn compile_commands(&self, file: impl AsRef<Path>) -> Option<CompileCommands> {
        let file = file.as_ref().as_os_str();
        let commands: CompileCommands = self
            .entries
            .iter()
            .filter(|entry| entry.file.as_os_str() == file)
            .map(CompileCommand::from)
            .collect();

        if commands.is_empty() { None } else { Some(commands) }
    }

    /// Returns the distinct source files of the database in order of
    /// their first appearance.
    pub fn all_files(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|entry| seen.insert(entry.file.as_path()))
            .map(|entry| entry.file.clone())
            .collect()
    }
}

/// Represents the errors of loading a compilation database.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// The file is missing, unreadable, not JSON, or an entry breaks the schema.
    #[error("Cannot load compilation database '{path}': {source}")]
    CannotLoadDatabase {
        path: PathBuf,
        #[source]
        source: SerializationError,
    },
}
