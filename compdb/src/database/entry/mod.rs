// SPDX-License-Identifier: GPL-3.0-or-later

//! The record type of the JSON compilation database.
//!
//! The definition of the JSON compilation database files is done in the
//! LLVM project [documentation](https://clang.llvm.org/docs/JSONCompilationDatabase.html).

mod type_de;

use serde::Serialize;
use std::path;
use thiserror::Error;

/// Represents an entry of the compilation database.
///
/// An entry is kept as it was read from the file: it has either the `command`
/// or the `arguments` field. The [`Entry::to_arguments`] and [`Entry::to_command`]
/// methods convert between the two forms.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Entry {
    /// The main translation unit source processed by this compilation step.
    /// This is used by tools as the key into the compilation database.
    /// There can be multiple entries for the same file, for example if the same
    /// source file is compiled with different configurations.
    pub file: path::PathBuf,
    /// The compile command argv as list of strings. `arguments[0]` is the
    /// executable name, such as `clang++`. Arguments are not escaped.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    /// The compile command as a single shell-escaped string.
    ///
    /// Either `arguments` or `command` is required.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub command: String,
    /// The working directory of the compilation. Relative paths in the `command`,
    /// `arguments` or `file` fields are relative to this directory.
    pub directory: path::PathBuf,
    /// The name of the output created by this compilation step. This field is optional.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<path::PathBuf>,
}

impl Entry {
    /// Create an Entry from arguments.
    pub fn from_arguments(
        file: impl Into<path::PathBuf>,
        arguments: Vec<String>,
        directory: impl Into<path::PathBuf>,
        output: Option<path::PathBuf>,
    ) -> Self {
        Entry {
            file: file.into(),
            arguments,
            command: String::default(),
            directory: directory.into(),
            output,
        }
    }

    /// Create an Entry from a shell command string.
    pub fn from_command(
        file: impl Into<path::PathBuf>,
        command: impl Into<String>,
        directory: impl Into<path::PathBuf>,
        output: Option<path::PathBuf>,
    ) -> Self {
        Entry {
            file: file.into(),
            arguments: Vec::default(),
            command: command.into(),
            directory: directory.into(),
            output,
        }
    }

    /// Semantic validation of the entry.
    pub fn validate(self) -> Result<Self, EntryError> {
        if self.file.as_os_str().is_empty() {
            return Err(EntryError::EmptyFileName);
        }
        if self.directory.as_os_str().is_empty() {
            return Err(EntryError::EmptyDirectory);
        }
        if self.command.is_empty() && self.arguments.is_empty() {
            return Err(EntryError::CommandOrArgumentsAreMissing);
        }
        if !self.command.is_empty() && !self.arguments.is_empty() {
            return Err(EntryError::CommandOrArgumentsArePresent);
        }
        if !self.command.is_empty() && shell_words::split(&self.command)?.is_empty() {
            return Err(EntryError::EmptyCommand);
        }
        Ok(self)
    }

    /// Convert entry to a form when only the command field is available.
    pub fn to_command(self) -> Result<Self, EntryError> {
        let valid = self.validate()?;

        let command = if valid.command.is_empty() {
            shell_words::join(&valid.arguments)
        } else {
            valid.command
        };

        Ok(Entry { arguments: Vec::default(), command, ..valid })
    }

    /// Convert entry to a form when only the arguments field is available.
    ///
    /// The command string is split by the POSIX shell word rules: quotes and
    /// backslash escapes are honored, nothing is expanded.
    pub fn to_arguments(self) -> Result<Self, EntryError> {
        let valid = self.validate()?;

        let arguments = if valid.arguments.is_empty() {
            shell_words::split(&valid.command)?
        } else {
            valid.arguments
        };

        Ok(Entry { arguments, command: String::default(), ..valid })
    }
}

/// Represents the possible errors that can occur when validating an entry.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Entry has an empty file field")]
    EmptyFileName,
    #[error("Entry has an empty directory field")]
    EmptyDirectory,
    #[error("Both command and arguments fields are empty")]
    CommandOrArgumentsAreMissing,
    #[error("Both command and arguments fields are present")]
    CommandOrArgumentsArePresent,
    #[error("Entry has a command field without words")]
    EmptyCommand,
    #[error("Entry has an invalid command field: {0}")]
    InvalidCommand(#[from] shell_words::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arguments(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_validate_accepts_arguments_form() {
        let entry = Entry::from_arguments("main.cpp", arguments(&["clang", "-c"]), "/tmp", None);

        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_command_form() {
        let entry = Entry::from_command("main.cpp", "clang -c", "/tmp", None);

        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_validate_errors() {
        let cases = vec![
            Entry::from_arguments("", arguments(&["clang", "-c"]), "/tmp", None),
            Entry::from_arguments("main.cpp", arguments(&["clang", "-c"]), "", None),
            Entry::from_arguments("main.cpp", vec![], "/tmp", None),
            Entry {
                command: "clang".to_string(),
                ..Entry::from_arguments("main.cpp", arguments(&["clang"]), "/tmp", None)
            },
            Entry::from_command("main.cpp", "clang \"unterminated", "/tmp", None),
            Entry::from_command("main.cpp", "  \t ", "/tmp", None),
        ];

        let results: Vec<_> = cases.into_iter().map(|entry| entry.validate().unwrap_err()).collect();

        assert!(matches!(results[0], EntryError::EmptyFileName));
        assert!(matches!(results[1], EntryError::EmptyDirectory));
        assert!(matches!(results[2], EntryError::CommandOrArgumentsAreMissing));
        assert!(matches!(results[3], EntryError::CommandOrArgumentsArePresent));
        assert!(matches!(results[4], EntryError::InvalidCommand(_)));
        assert!(matches!(results[5], EntryError::EmptyCommand));
    }

    #[test]
    fn test_to_arguments_splits_quoted_words() {
        let entry = Entry::from_command(
            "main.c",
            r#"cc -DNAME="hello world" -I 'include dir' -c main.c"#,
            "/src",
            None,
        );

        let result = entry.to_arguments().unwrap();

        assert!(result.command.is_empty());
        assert_eq!(
            result.arguments,
            arguments(&["cc", "-DNAME=hello world", "-I", "include dir", "-c", "main.c"])
        );
    }

    #[test]
    fn test_to_arguments_keeps_arguments_verbatim() {
        let tokens = arguments(&["cc", "-DNAME=\"quoted\"", "a b.c"]);
        let entry = Entry::from_arguments("a b.c", tokens.clone(), "/src", None);

        let result = entry.to_arguments().unwrap();

        assert_eq!(result.arguments, tokens);
    }

    #[test]
    fn test_to_command_escapes_arguments() {
        let entry = Entry::from_arguments(
            "a b.c",
            arguments(&["cc", "-c", "a b.c"]),
            "/src",
            Some("a.o".into()),
        );

        let result = entry.to_command().unwrap();

        assert!(result.arguments.is_empty());
        assert_eq!(result.command, "cc -c 'a b.c'");
        assert_eq!(result.output, Some(path::PathBuf::from("a.o")));
    }

    #[test]
    fn test_conversions_are_stable() {
        let entries = vec![
            Entry::from_arguments("main.cpp", arguments(&["clang", "-c", "main.cpp"]), "/tmp", None),
            Entry::from_command("bar.c", "gcc -O2 -c bar.c", "/src", Some("bar.o".into())),
        ];

        for entry in entries {
            let to_args = entry.clone().to_arguments().unwrap();
            let to_cmd = to_args.clone().to_command().unwrap();
            assert_eq!(to_cmd.clone().to_arguments().unwrap(), to_args);
            assert_eq!(to_args.to_command().unwrap(), to_cmd);
        }
    }
}
