// SPDX-License-Identifier: GPL-3.0-or-later

//! Read and query JSON compilation database files.
//!
//! The entry point of the library is the [`CompilationDatabase`] type, which
//! loads a `compile_commands.json` file and answers lookups against it. The
//! results of the lookups are owned values, independent of the database that
//! produced them.

pub mod args;
pub mod config;
pub mod database;
pub mod modes;

pub use database::{
    CompilationDatabase, CompileCommand, CompileCommands, IndexOutOfRange, LoadError,
};
