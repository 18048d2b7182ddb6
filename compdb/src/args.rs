// SPDX-License-Identifier: GPL-3.0-or-later

//! This module contains the command line interface of the application.
//!
//! The command line parsing is implemented using the `clap` library.
//! The module is defining types to represent a structured form of the
//! program invocation. The `Arguments` type is used to represent all
//! possible invocations of the program.

use anyhow::anyhow;
use clap::{ArgAction, ArgMatches, Command, arg, command, value_parser};
use clap_complete::Shell;
use std::fmt;

/// Common constants used in the module.
const MODE_ALL_SUBCOMMAND: &str = "all";
const MODE_LOOKUP_SUBCOMMAND: &str = "lookup";
const MODE_FILES_SUBCOMMAND: &str = "files";
const MODE_COMPLETIONS_SUBCOMMAND: &str = "completions";
const DEFAULT_DIRECTORY: &str = ".";

/// Represents the command line arguments of the application.
#[derive(Debug, PartialEq)]
pub struct Arguments {
    // The path of the configuration file.
    pub config: Option<String>,
    // The number of `-v` flags.
    pub verbose: u8,
    // The mode of the application.
    pub mode: Mode,
}

/// Represents the mode of the application.
#[derive(Debug, PartialEq)]
pub enum Mode {
    /// Print every entry of the database.
    All { input: Database },
    /// Print the entries recorded for a source file.
    Lookup { input: Database, file: String },
    /// Print the distinct source files of the database.
    Files { input: Database },
    /// Print a shell completion script.
    Completions { shell: Shell },
}

/// Represents the directory which holds the compilation database.
#[derive(Debug, PartialEq)]
pub struct Database {
    pub directory: String,
}

impl TryFrom<ArgMatches> for Arguments {
    type Error = anyhow::Error;

    fn try_from(matches: ArgMatches) -> Result<Self, Self::Error> {
        let config = matches.get_one::<String>("config").map(String::to_string);
        let verbose = matches.get_count("verbose");

        let mode = match matches.subcommand() {
            Some((MODE_ALL_SUBCOMMAND, sub_matches)) => {
                Mode::All { input: Database::try_from(sub_matches)? }
            }
            Some((MODE_LOOKUP_SUBCOMMAND, sub_matches)) => {
                let input = Database::try_from(sub_matches)?;
                let file = sub_matches
                    .get_one::<String>("FILE")
                    .map(String::to_string)
                    .ok_or_else(|| anyhow!("missing file argument"))?;
                Mode::Lookup { input, file }
            }
            Some((MODE_FILES_SUBCOMMAND, sub_matches)) => {
                Mode::Files { input: Database::try_from(sub_matches)? }
            }
            Some((MODE_COMPLETIONS_SUBCOMMAND, sub_matches)) => {
                let shell = sub_matches
                    .get_one::<Shell>("SHELL")
                    .copied()
                    .ok_or_else(|| anyhow!("missing shell argument"))?;
                Mode::Completions { shell }
            }
            _ => return Err(anyhow!("unrecognized subcommand")),
        };
        Ok(Arguments { config, verbose, mode })
    }
}

impl TryFrom<&ArgMatches> for Database {
    type Error = anyhow::Error;

    fn try_from(matches: &ArgMatches) -> Result<Self, Self::Error> {
        let directory = matches
            .get_one::<String>("directory")
            .map(String::to_string)
            .ok_or_else(|| anyhow!("missing directory argument"))?;
        Ok(Database { directory })
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arguments: config={:?}, verbose={}, mode=", self.config, self.verbose)?;
        match &self.mode {
            Mode::All { input } => write!(f, "all (directory={})", input.directory),
            Mode::Lookup { input, file } => {
                write!(f, "lookup (directory={}, file={})", input.directory, file)
            }
            Mode::Files { input } => write!(f, "files (directory={})", input.directory),
            Mode::Completions { shell } => write!(f, "completions (shell={})", shell),
        }
    }
}

/// Represents the command line interface of the application.
///
/// The queries of the application are represented as subcommands.
pub fn cli() -> Command {
    let directory = arg!(-d --directory <DIR> "Directory of the compilation database")
        .default_value(DEFAULT_DIRECTORY)
        .hide_default_value(false);

    command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args(&[
            arg!(-v --verbose ... "Sets the level of verbosity").action(ArgAction::Count),
            arg!(-c --config <FILE> "Path of the config file"),
        ])
        .subcommand(
            Command::new(MODE_ALL_SUBCOMMAND)
                .about("print every entry of the compilation database")
                .arg(directory.clone()),
        )
        .subcommand(
            Command::new(MODE_LOOKUP_SUBCOMMAND)
                .about("print the entries of a source file")
                .args(&[
                    arg!(<FILE> "Source file, as it was recorded in the database"),
                    directory.clone(),
                ])
                .arg_required_else_help(true),
        )
        .subcommand(
            Command::new(MODE_FILES_SUBCOMMAND)
                .about("print the source files of the compilation database")
                .arg(directory),
        )
        .subcommand(
            Command::new(MODE_COMPLETIONS_SUBCOMMAND)
                .about("print a shell completion script")
                .arg(arg!(<SHELL> "Shell to generate the script for").value_parser(value_parser!(Shell)))
                .arg_required_else_help(true),
        )
}
