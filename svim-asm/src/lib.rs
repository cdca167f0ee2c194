//! Assembler for the [svim_vm](../svim_vm/index.html) bytecode virtual machine.
//!
//! [`assemble`] turns a source string written in the svim assembly dialect
//! into a flat `Vec<i32>` program plus a starting instruction index, ready
//! to hand to [`svim_vm::Interpreter`](../svim_vm/struct.Interpreter.html).
//!
//! # Source language
//!
//! - Case-insensitive: every line is uppercased before tokenizing.
//! - Tokens are separated by spaces, tabs, or carriage returns.
//! - `#` starts a line comment running to the end of the line.
//! - An instruction mnemonic is followed by its fixed number of inline
//!   integer operands (0, 1, or 2 -- see each [`OpCode`](../svim_vm/enum.OpCode.html)'s
//!   arity).
//! - `.INIT` marks the entry point: the next parsed instruction becomes the
//!   program's starting index. At most one `.INIT` is allowed, and it must
//!   be followed by an instruction before end of input.
//! - Integer literals may carry a leading `-`, but a negative value is only
//!   accepted as `PUSH`'s operand.

mod error;
mod lexer;
mod parser;

pub use error::{ConversionFailure, ParseError};
pub use parser::{assemble, Assembled};
