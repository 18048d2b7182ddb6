// SPDX-License-Identifier: GPL-3.0-or-later

//! Implements deserialization of the `Entry` struct.
//!
//! The syntax check is strict: unknown and repeated keys are rejected. The
//! semantic check (exactly one of `command` and `arguments`) is left to
//! [`Entry::validate`], so it can be reported with a typed error.

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::path;

use super::Entry;

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_struct("Entry", FIELDS, EntryVisitor)
    }
}

enum Field {
    Directory,
    File,
    Command,
    Arguments,
    Output,
}

const FIELDS: &[&str] = &["directory", "file", "command", "arguments", "output"];

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Field, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_identifier(FieldVisitor)
    }
}

struct FieldVisitor;

impl Visitor<'_> for FieldVisitor {
    type Value = Field;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "one of {:?}", FIELDS)
    }

    fn visit_str<E>(self, value: &str) -> Result<Field, E>
    where
        E: de::Error,
    {
        match value {
            "directory" => Ok(Field::Directory),
            "file" => Ok(Field::File),
            "command" => Ok(Field::Command),
            "arguments" => Ok(Field::Arguments),
            "output" => Ok(Field::Output),
            _ => Err(de::Error::unknown_field(value, FIELDS)),
        }
    }
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = Entry;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("compilation database entry object")
    }

    fn visit_map<V>(self, mut map: V) -> Result<Entry, V::Error>
    where
        V: MapAccess<'de>,
    {
        let mut directory: Option<path::PathBuf> = None;
        let mut file: Option<path::PathBuf> = None;
        let mut command: Option<String> = None;
        let mut arguments: Option<Vec<String>> = None;
        let mut output: Option<path::PathBuf> = None;

        while let Some(key) = map.next_key()? {
            match key {
                Field::Directory => set_once(&mut directory, "directory", map.next_value()?)?,
                Field::File => set_once(&mut file, "file", map.next_value()?)?,
                Field::Command => set_once(&mut command, "command", map.next_value()?)?,
                Field::Arguments => set_once(&mut arguments, "arguments", map.next_value()?)?,
                Field::Output => set_once(&mut output, "output", map.next_value()?)?,
            }
        }

        if command.is_none() && arguments.is_none() {
            return Err(de::Error::missing_field("`command` or `arguments`"));
        }

        Ok(Entry {
            directory: directory.ok_or_else(|| de::Error::missing_field("directory"))?,
            file: file.ok_or_else(|| de::Error::missing_field("file"))?,
            command: command.unwrap_or_default(),
            arguments: arguments.unwrap_or_default(),
            output,
        })
    }
}

fn set_once<T, E: de::Error>(slot: &mut Option<T>, name: &'static str, value: T) -> Result<(), E> {
    if slot.is_some() {
        return Err(de::Error::duplicate_field(name));
    }
    *slot = Some(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_form() {
        let content = r#"{
            "directory": "/home/user",
            "file": "./file_a.c",
            "arguments": ["cc", "-c", "./file_a.c", "-o", "./file_a.o"],
            "output": "./file_a.o"
        }"#;

        let entry: Entry = serde_json::from_str(content).unwrap();

        assert_eq!(entry.directory, path::PathBuf::from("/home/user"));
        assert_eq!(entry.file, path::PathBuf::from("./file_a.c"));
        assert_eq!(entry.arguments, vec!["cc", "-c", "./file_a.c", "-o", "./file_a.o"]);
        assert!(entry.command.is_empty());
        assert_eq!(entry.output, Some(path::PathBuf::from("./file_a.o")));
    }

    #[test]
    fn test_command_form() {
        let content = r#"{
            "directory": "/home/user",
            "file": "./file_b.c",
            "command": "cc -c ./file_b.c"
        }"#;

        let entry: Entry = serde_json::from_str(content).unwrap();

        assert_eq!(entry.command, "cc -c ./file_b.c");
        assert!(entry.arguments.is_empty());
        assert_eq!(entry.output, None);
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let cases = [
            r#"{ "file": "a.c", "arguments": ["cc"] }"#,
            r#"{ "directory": "/tmp", "arguments": ["cc"] }"#,
            r#"{ "directory": "/tmp", "file": "a.c" }"#,
        ];

        for content in cases {
            let result: Result<Entry, _> = serde_json::from_str(content);
            assert!(result.is_err(), "should fail: {content}");
        }
    }

    #[test]
    fn test_unknown_and_repeated_fields_are_rejected() {
        let cases = [
            r#"{ "directory": "/tmp", "file": "a.c", "arguments": ["cc"], "flags": [] }"#,
            r#"{ "directory": "/tmp", "file": "a.c", "file": "b.c", "arguments": ["cc"] }"#,
        ];

        for content in cases {
            let result: Result<Entry, _> = serde_json::from_str(content);
            assert!(result.is_err(), "should fail: {content}");
        }
    }

    #[test]
    fn test_both_forms_pass_syntax_but_fail_validation() {
        let content = r#"{
            "directory": "/tmp",
            "file": "a.c",
            "command": "cc -c a.c",
            "arguments": ["cc", "-c", "a.c"]
        }"#;

        let entry: Entry = serde_json::from_str(content).unwrap();

        assert!(entry.validate().is_err());
    }
}
