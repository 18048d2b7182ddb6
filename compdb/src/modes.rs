// SPDX-License-Identifier: GPL-3.0-or-later

//! The modes of the application.
//!
//! Each mode is a query against a compilation database, except the one
//! which prints the shell completion script. The database is loaded in
//! the configuration step, so a missing or broken database is reported
//! before anything is written to the output.

use crate::database::entry::{Entry, EntryError};
use crate::database::{
    CompilationDatabase, CompileCommand, JsonCompilationDatabase, LoadError, SerializationError,
    SerializationFormat,
};
use crate::{args, config};
use clap_complete::Shell;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use thiserror::Error;

/// Represent the modes the application can run in.
pub enum Mode {
    All { database: CompilationDatabase, printer: EntryPrinter },
    Lookup { database: CompilationDatabase, file: String, printer: EntryPrinter },
    Files { database: CompilationDatabase },
    Completions { shell: Shell },
}

impl Mode {
    /// Configure the application mode based on the command line arguments and the configuration.
    pub fn configure(args: args::Arguments, config: config::Main) -> Result<Self, ConfigurationError> {
        let printer = EntryPrinter::from(&config.format);
        match args.mode {
            args::Mode::All { input } => {
                log::debug!("Mode: print all entries");
                let database = Self::load(&input, &config)?;
                Ok(Self::All { database, printer })
            }
            args::Mode::Lookup { input, file } => {
                log::debug!("Mode: print entries of a source file");
                let database = Self::load(&input, &config)?;
                Ok(Self::Lookup { database, file, printer })
            }
            args::Mode::Files { input } => {
                log::debug!("Mode: print source files");
                let database = Self::load(&input, &config)?;
                Ok(Self::Files { database })
            }
            args::Mode::Completions { shell } => {
                log::debug!("Mode: print completion script");
                Ok(Self::Completions { shell })
            }
        }
    }

    fn load(input: &args::Database, config: &config::Main) -> Result<CompilationDatabase, LoadError> {
        let path = Path::new(&input.directory).join(&config.database.file_name);
        log::info!("Loading compilation database: {}", path.display());

        let database = CompilationDatabase::from_file(&path)?;
        log::info!("Loaded {} entries", database.len());
        Ok(database)
    }

    /// Runs the query and writes the result to the standard output.
    pub fn run(self) -> ExitCode {
        let stdout = io::stdout();
        match self.execute(stdout.lock()) {
            Ok(code) => code,
            Err(error) => {
                log::error!("{error}");
                ExitCode::FAILURE
            }
        }
    }

    /// Runs the query and writes the result to the given output.
    pub fn execute(self, mut output: impl Write) -> Result<ExitCode, ExecutionError> {
        match self {
            Self::All { database, printer } => {
                printer.print(&mut output, database.all_compile_commands())?;
                Ok(ExitCode::SUCCESS)
            }
            Self::Lookup { database, file, printer } => match database.compile_commands(&file) {
                Some(commands) => {
                    log::info!("Found {} entries for {}", commands.len(), file);
                    printer.print(&mut output, commands)?;
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    log::warn!("No entry found for {}", file);
                    Ok(ExitCode::FAILURE)
                }
            },
            Self::Files { database } => {
                for file in database.all_files() {
                    writeln!(output, "{}", file.display())?;
                }
                Ok(ExitCode::SUCCESS)
            }
            Self::Completions { shell } => {
                let mut command = args::cli();
                let name = command.get_name().to_string();
                clap_complete::generate(shell, &mut command, name, &mut output);
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Writes compile commands as a JSON compilation database, in the entry form
/// the configuration asks for.
pub struct EntryPrinter {
    use_array_format: bool,
    include_output_field: bool,
}

impl From<&config::Format> for EntryPrinter {
    fn from(format: &config::Format) -> Self {
        Self {
            use_array_format: format.use_array_format,
            include_output_field: format.include_output_field,
        }
    }
}

impl EntryPrinter {
    // Every entry is checked here, so nothing is written when one of them is invalid.
    fn format(&self, command: CompileCommand) -> Result<Entry, EntryError> {
        let mut entry = Entry::from(command);
        if !self.include_output_field {
            entry.output = None;
        }
        if self.use_array_format { entry.validate() } else { entry.to_command() }
    }

    fn print(
        &self,
        output: impl Write,
        commands: impl IntoIterator<Item = CompileCommand>,
    ) -> Result<(), SerializationError> {
        let entries = commands
            .into_iter()
            .map(|command| self.format(command))
            .collect::<Result<Vec<_>, _>>()?;

        JsonCompilationDatabase::write(output, entries.into_iter())
    }
}

/// Represents errors that can occur while configuring the application.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Database(#[from] LoadError),
}

/// Represents errors that can occur while writing the query result.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Failed to write the output: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to write the output: {0}")]
    Serialization(#[from] SerializationError),
}
