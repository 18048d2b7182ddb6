// SPDX-License-Identifier: GPL-3.0-or-later

//! This module defines the configuration of the application.
//!
//! The configuration controls where the database is found in a directory and
//! how query results are printed. It is a YAML file named `compdb.yml`, given
//! with `--config` or looked up in the current directory, the `compdb`
//! configuration directory and the user configuration directory, in this order.
//! Missing values and a missing file fall back to the defaults below.
//!
//! ```yaml
//! schema: 1.0
//!
//! database:
//!   file_name: compile_commands.json
//!
//! format:
//!   use_array_format: true
//!   include_output_field: true
//! ```

// Re-Export the types and the loader module content.
pub use loader::{ConfigError, ConfigErrorKind, Loader};
pub use types::*;
pub use validation::{ValidationError, Validator};

mod types {
    use crate::database::DEFAULT_FILE_NAME;
    use serde::Deserialize;
    use std::fmt;

    /// Represents the application configuration.
    #[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Main {
        #[serde(deserialize_with = "validate_schema_version")]
        pub schema: String,
        #[serde(default)]
        pub database: Database,
        #[serde(default)]
        pub format: Format,
    }

    impl Default for Main {
        fn default() -> Self {
            Self {
                schema: String::from(SUPPORTED_SCHEMA_VERSION),
                database: Database::default(),
                format: Format::default(),
            }
        }
    }

    impl fmt::Display for Main {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "Configuration:")?;
            let yaml_string = serde_yml::to_string(self).map_err(|_| fmt::Error)?;
            for line in yaml_string.lines() {
                writeln!(f, "{}", line)?;
            }
            Ok(())
        }
    }

    /// Where to find the compilation database in the queried directory.
    #[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Database {
        #[serde(default = "default_file_name")]
        pub file_name: String,
    }

    impl Default for Database {
        fn default() -> Self {
            Self { file_name: default_file_name() }
        }
    }

    /// How the query results are printed.
    ///
    /// - `use_array_format`: print the `arguments` array, otherwise the `command` string.
    /// - `include_output_field`: print the `output` field when the record has one.
    #[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Format {
        #[serde(default = "default_enabled")]
        pub use_array_format: bool,
        #[serde(default = "default_enabled")]
        pub include_output_field: bool,
    }

    impl Default for Format {
        fn default() -> Self {
            Self { use_array_format: true, include_output_field: true }
        }
    }

    const SUPPORTED_SCHEMA_VERSION: &str = "1.0";

    fn default_file_name() -> String {
        String::from(DEFAULT_FILE_NAME)
    }

    fn default_enabled() -> bool {
        true
    }

    // Custom deserialization function to validate the schema version
    fn validate_schema_version<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let schema: String = Deserialize::deserialize(deserializer)?;
        if schema != SUPPORTED_SCHEMA_VERSION {
            use serde::de::Error;
            Err(Error::custom(format!(
                "Unsupported schema version: {schema}. Expected: {SUPPORTED_SCHEMA_VERSION}"
            )))
        } else {
            Ok(schema)
        }
    }
}

pub mod validation {
    use super::types::*;
    use thiserror::Error;

    /// Trait for validating configuration objects
    pub trait Validator<T> {
        type Error: std::error::Error;

        fn validate(config: &T) -> Result<(), Self::Error>;
    }

    /// Validation errors for configuration
    #[derive(Debug, Error)]
    pub enum ValidationError {
        #[error("Empty string value for field '{field}'")]
        EmptyString { field: &'static str },
        #[error("Value of field '{field}' is not a plain file name: '{value}'")]
        NotAFileName { field: &'static str, value: String },
    }

    impl Validator<Main> for Main {
        type Error = ValidationError;

        fn validate(config: &Main) -> Result<(), Self::Error> {
            Database::validate(&config.database)
        }
    }

    impl Validator<Database> for Database {
        type Error = ValidationError;

        fn validate(config: &Database) -> Result<(), Self::Error> {
            let field = "database.file_name";
            if config.file_name.trim().is_empty() {
                return Err(ValidationError::EmptyString { field });
            }
            let is_plain = std::path::Path::new(&config.file_name)
                .file_name()
                .is_some_and(|name| name == config.file_name.as_str());
            if !is_plain {
                return Err(ValidationError::NotAFileName { field, value: config.file_name.clone() });
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_validate_file_name_success() {
            let valid = ["compile_commands.json", "build.json", ".compdb"];

            for file_name in valid {
                let config = Database { file_name: file_name.to_string() };
                assert!(Database::validate(&config).is_ok(), "Should be valid: {file_name}");
            }
        }

        #[test]
        fn test_validate_file_name_failures() {
            let config = Database { file_name: "  ".to_string() };
            assert!(matches!(Database::validate(&config), Err(ValidationError::EmptyString { .. })));

            for file_name in ["build/compile_commands.json", "/tmp/db.json", "..", "db.json/"] {
                let config = Database { file_name: file_name.to_string() };
                assert!(
                    matches!(Database::validate(&config), Err(ValidationError::NotAFileName { .. })),
                    "Should be invalid: {file_name}"
                );
            }
        }

        #[test]
        fn test_validate_main_delegates() {
            let config = Main {
                database: Database { file_name: String::new() },
                ..Main::default()
            };

            assert!(Main::validate(&config).is_err());
            assert!(Main::validate(&Main::default()).is_ok());
        }
    }
}

pub mod loader {
    use super::{Main, ValidationError, Validator};
    use directories::{BaseDirs, ProjectDirs};
    use std::fs;
    use std::path::{Path, PathBuf};
    use thiserror::Error;

    const CONFIG_FILE_NAME: &str = "compdb.yml";

    pub struct Loader;

    impl Loader {
        /// Loads the configuration given on the command line, or the first
        /// `compdb.yml` found in the search locations. Without either one,
        /// the defaults are used.
        pub fn load(current_directory: &Path, filename: &Option<String>) -> Result<Main, ConfigError> {
            let found = match filename {
                Some(path) => Some(PathBuf::from(path)),
                None => Self::candidates(current_directory).find(|candidate| {
                    log::debug!("Looking for configuration: {}", candidate.display());
                    candidate.is_file()
                }),
            };

            match found {
                Some(path) => Self::from_file(&path),
                None => {
                    log::debug!("No configuration file, using defaults");
                    Ok(Main::default())
                }
            }
        }

        /// The current directory first, then the user's configuration directories.
        fn candidates(current_directory: &Path) -> impl Iterator<Item = PathBuf> {
            let application = ProjectDirs::from("", "", "compdb").map(|dirs| dirs.config_dir().to_path_buf());
            let user = BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf());

            let mut directories = vec![current_directory.to_path_buf()];
            directories.extend(application);
            directories.extend(user);
            directories.dedup();

            directories.into_iter().map(|directory| directory.join(CONFIG_FILE_NAME))
        }

        /// Reads and validates the given configuration file.
        pub fn from_file(path: &Path) -> Result<Main, ConfigError> {
            log::info!("Reading configuration: {}", path.display());
            let error = |kind| ConfigError { path: path.to_path_buf(), kind };

            let file = fs::File::open(path).map_err(|e| error(ConfigErrorKind::Read(e)))?;
            let config: Main = Self::from_reader(file).map_err(|e| error(ConfigErrorKind::Parse(e)))?;
            Main::validate(&config).map_err(|e| error(ConfigErrorKind::Invalid(e)))?;

            Ok(config)
        }

        fn from_reader<R, T>(reader: R) -> serde_yml::Result<T>
        where
            R: std::io::Read,
            T: serde::de::DeserializeOwned,
        {
            serde_yml::from_reader(reader)
        }
    }

    /// A configuration file which could not be used.
    #[derive(Debug, Error)]
    #[error("Bad configuration '{path}': {kind}")]
    pub struct ConfigError {
        pub path: PathBuf,
        #[source]
        pub kind: ConfigErrorKind,
    }

    #[derive(Debug, Error)]
    pub enum ConfigErrorKind {
        #[error("cannot read it: {0}")]
        Read(std::io::Error),
        #[error("not a valid YAML document: {0}")]
        Parse(serde_yml::Error),
        #[error("{0}")]
        Invalid(ValidationError),
    }

}
