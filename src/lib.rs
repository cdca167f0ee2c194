//! Core of the svim toy language runtime: the stack bytecode interpreter.
//!
//! This crate owns the opcode set, the operand stack, the frame-based local
//! store, the shared global store, and the fetch-decode-execute loop. It
//! knows nothing about source text, command-line flags, or file I/O beyond
//! the narrow [`ValueSink`] interface its output is written through; the
//! [`svim_asm`](../svim_asm/index.html) crate turns source text into the
//! `Vec<i32>` programs this crate executes.

extern crate num;
#[macro_use]
extern crate num_derive;

pub mod constants;
pub mod error;
pub mod frame;
pub mod globals;
pub mod interpreter;
pub mod opcode;
pub mod sink;
pub mod stack;

pub use error::RuntimeFault;
pub use interpreter::{ExitReason, Interpreter};
pub use opcode::OpCode;
pub use sink::{ConsoleSink, FileSink, ValueSink};

/// The VM's sole runtime type: a signed 32-bit integer.
pub type Value = i32;
