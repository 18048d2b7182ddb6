// SPDX-License-Identifier: GPL-3.0-or-later

//! This module declares the file format of the JSON compilation database,
//! as defined by the Clang project.

use super::entry::{Entry, EntryError};
use super::json;
use thiserror::Error;

/// Represents errors that can occur while working with file formats.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("Generic IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Format syntax error: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("Format semantic error: {0}")]
    Semantic(#[from] EntryError),
}

/// A trait representing a file format that can be written to and read from.
pub trait SerializationFormat<T> {
    /// Writes an iterator of items to the specified writer.
    fn write(
        writer: impl std::io::Write,
        items: impl Iterator<Item = T>,
    ) -> Result<(), SerializationError>;

    /// Reads items from the specified reader, returning an iterator of results.
    fn read(reader: impl std::io::Read) -> impl Iterator<Item = Result<T, SerializationError>>;
}

/// The JSON compilation database format.
///
/// The format is a JSON array, where each object represents a compilation
/// command. Only entries which pass [`Entry::validate`] are read or written.
///
/// # Note
/// The format itself is defined in the LLVM project documentation.
/// https://clang.llvm.org/docs/JSONCompilationDatabase.html
pub struct JsonCompilationDatabase;

impl SerializationFormat<Entry> for JsonCompilationDatabase {
    fn write(
        writer: impl std::io::Write,
        entries: impl Iterator<Item = Entry>,
    ) -> Result<(), SerializationError> {
        json::serialize_result_seq(
            writer,
            entries.map(|entry| entry.validate().map_err(SerializationError::Semantic)),
        )
    }

    fn read(reader: impl std::io::Read) -> impl Iterator<Item = Result<Entry, SerializationError>> {
        json::deserialize_seq(reader).map(|result| -> Result<Entry, SerializationError> {
            let entry: Entry = result?;
            Ok(entry.validate()?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_valid_entries() {
        let content = r#"[
            { "directory": "/src", "file": "a.c", "arguments": ["cc", "-c", "a.c"] },
            { "directory": "/src", "file": "b.c", "command": "cc -c b.c", "output": "b.o" }
        ]"#;

        let entries: Vec<Entry> = JsonCompilationDatabase::read(Cursor::new(content))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].arguments, vec!["cc", "-c", "a.c"]);
        assert_eq!(entries[1].command, "cc -c b.c");
    }

    #[test]
    fn test_read_reports_semantic_errors() {
        let content = r#"[ { "directory": "", "file": "a.c", "arguments": ["cc"] } ]"#;

        let result: Vec<_> = JsonCompilationDatabase::read(Cursor::new(content)).collect();

        assert!(matches!(result[0], Err(SerializationError::Semantic(EntryError::EmptyDirectory))));
    }

    #[test]
    fn test_read_reports_syntax_errors() {
        let content = r#"[ { "directory": "/src", "file": "a.c", "arguments": ["cc"] "#;

        let result: Vec<_> = JsonCompilationDatabase::read(Cursor::new(content)).collect();

        assert!(matches!(result.last(), Some(Err(SerializationError::Syntax(_)))));
    }

    #[test]
    fn test_write_then_read_back() {
        let entries = vec![
            Entry::from_arguments("a.c", vec!["cc".into(), "-c".into(), "a.c".into()], "/src", None),
            Entry::from_command("b.c", "cc -c b.c", "/src", Some("b.o".into())),
        ];
        let mut buffer = Vec::new();

        JsonCompilationDatabase::write(&mut buffer, entries.clone().into_iter()).unwrap();
        let result: Vec<Entry> = JsonCompilationDatabase::read(Cursor::new(buffer))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(result, entries);
    }

    #[test]
    fn test_write_refuses_invalid_entries() {
        let entries = vec![Entry::from_arguments("a.c", vec![], "/src", None)];

        let result = JsonCompilationDatabase::write(Vec::new(), entries.into_iter());

        assert!(matches!(
            result,
            Err(SerializationError::Semantic(EntryError::CommandOrArgumentsAreMissing))
        ));
    }
}
