// SPDX-License-Identifier: GPL-3.0-or-later

use super::command::CompileCommand;
use thiserror::Error;

/// The ordered result of a database lookup.
///
/// The order of the commands is the order of the records in the database
/// file. The collection owns copies of the records, it does not refer back
/// to the database.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CompileCommands {
    commands: Vec<CompileCommand>,
}

/// Positional access past the end of a [`CompileCommands`].
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("Index {index} is out of range, the collection has {len} commands")]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len: usize,
}

impl CompileCommands {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the command at the given position.
    pub fn get(&self, index: usize) -> Result<&CompileCommand, IndexOutOfRange> {
        self.commands.get(index).ok_or(IndexOutOfRange { index, len: self.commands.len() })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompileCommand> {
        self.commands.iter()
    }
}

impl FromIterator<CompileCommand> for CompileCommands {
    fn from_iter<I: IntoIterator<Item = CompileCommand>>(iter: I) -> Self {
        CompileCommands { commands: iter.into_iter().collect() }
    }
}

/// Consumes the collection. The iteration is one-pass: the yielded commands
/// are moved out and the collection is gone.
impl IntoIterator for CompileCommands {
    type Item = CompileCommand;
    type IntoIter = std::vec::IntoIter<CompileCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

impl<'a> IntoIterator for &'a CompileCommands {
    type Item = &'a CompileCommand;
    type IntoIter = std::slice::Iter<'a, CompileCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entry::Entry;

    fn commands(files: &[&str]) -> CompileCommands {
        files
            .iter()
            .map(|file| {
                let arguments = vec!["cc".to_string(), "-c".to_string(), file.to_string()];
                CompileCommand::from(&Entry::from_arguments(*file, arguments, "/src", None))
            })
            .collect()
    }

    #[test]
    fn test_positional_access() {
        let sut = commands(&["a.c", "b.c"]);

        assert_eq!(sut.len(), 2);
        assert_eq!(sut.get(0).unwrap().filename().to_str(), Some("a.c"));
        assert_eq!(sut.get(1).unwrap().filename().to_str(), Some("b.c"));
        assert_eq!(sut.get(2), Err(IndexOutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn test_empty_collection() {
        let sut = CompileCommands::default();

        assert!(sut.is_empty());
        assert_eq!(sut.get(0), Err(IndexOutOfRange { index: 0, len: 0 }));
        assert_eq!(sut.iter().count(), 0);
    }

    #[test]
    fn test_consuming_iteration_stops_at_length() {
        let sut = commands(&["a.c", "b.c", "c.c"]);
        let expected = sut.len();

        let mut iterator = sut.into_iter();
        assert_eq!(iterator.len(), expected);

        let mut count = 0;
        for command in iterator.by_ref() {
            count += 1;
            assert!(count <= expected, "iterated past the end with {command:?}");
        }
        assert_eq!(count, expected);
        assert_eq!(iterator.next(), None);
    }

    #[test]
    fn test_extracted_command_outlives_the_collection() {
        let sut = commands(&["a.c"]);

        let command = sut.get(0).unwrap().clone();
        drop(sut);

        assert_eq!(command.directory().to_str(), Some("/src"));
        assert_eq!(command.arguments().collect::<Vec<_>>(), vec!["cc", "-c", "a.c"]);
    }
}
