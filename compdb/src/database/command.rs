// SPDX-License-Identifier: GPL-3.0-or-later

use super::entry::Entry;
use std::path::{Path, PathBuf};

/// One recorded compiler invocation.
///
/// The value is a snapshot of a database record: it owns all of its fields,
/// so it stays valid after the database and the result collection it came
/// from are gone.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompileCommand {
    directory: PathBuf,
    filename: PathBuf,
    arguments: Vec<String>,
    output: Option<PathBuf>,
}

impl CompileCommand {
    /// The working directory of the compilation.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The source file, exactly as it was recorded.
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// The source file joined onto the working directory when it was recorded
    /// as a relative path.
    pub fn absolute_filename(&self) -> PathBuf {
        if self.filename.is_absolute() {
            self.filename.clone()
        } else {
            self.directory.join(&self.filename)
        }
    }

    /// The argument vector of the invocation. The first item is the compiler.
    pub fn arguments(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.arguments.iter().map(String::as_str)
    }

    /// The output of the compilation, when the record has one.
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// The argument vector as a single shell-escaped string.
    pub fn command_line(&self) -> String {
        shell_words::join(&self.arguments)
    }
}

/// Copies the fields of a record which is in the arguments form.
impl From<&Entry> for CompileCommand {
    fn from(entry: &Entry) -> Self {
        CompileCommand {
            directory: entry.directory.clone(),
            filename: entry.file.clone(),
            arguments: entry.arguments.clone(),
            output: entry.output.clone(),
        }
    }
}

impl From<CompileCommand> for Entry {
    fn from(command: CompileCommand) -> Self {
        Entry::from_arguments(command.filename, command.arguments, command.directory, command.output)
    }
}
