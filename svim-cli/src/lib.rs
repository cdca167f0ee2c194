//! The command-line driver for the svim virtual machine.
//!
//! This crate is deliberately thin: it owns flag parsing, source-file-name
//! validation, output-file-name derivation, the demo-program table, and
//! exit-code mapping, and consumes [`svim_vm`]/[`svim_asm`] only through
//! their public interfaces (`Interpreter`, `ValueSink`, `assemble`). Neither
//! core crate depends back on this one.

pub mod app;
pub mod cli;
pub mod demos;
pub mod error;
pub mod format;

pub use app::{run, Command};
pub use error::AppError;
