//! Output destinations for the interpreter.
//!
//! `ValueSink` keeps the interpreter's output plumbing behind a narrow
//! interface. It is deliberately small: the console and file variants below
//! share one capability set rather than a deep class hierarchy.

use std::io::{self, Write};

use crate::opcode::OpCode;

/// Where `PRINT`ed values, trace output, and the `-d` listing go.
pub trait ValueSink {
    /// A single `PRINT`ed value.
    fn log_value(&mut self, value: i32);

    /// Disassembly of a single instruction in trace mode: the opcode at
    /// `index`, plus its inline operands (if any), peeked out of `program`.
    fn log_instruction(&mut self, index: usize, program: &[i32], opcode: i32);

    /// A labeled dump of an integer array (stack, globals, or locals).
    fn log_array(&mut self, label: &str, data: &[i32]);

    /// The full assembled listing, one `<index>: <value>` line per entry.
    fn log_program_listing(&mut self, program: &[i32]);

    /// An opcode byte that did not decode to any known `OpCode`.
    fn log_invalid_opcode(&mut self, value: i32);
}

fn write_array(out: &mut dyn Write, label: &str, data: &[i32]) -> io::Result<()> {
    write!(out, "\n\t{}=[", label)?;
    for (i, value) in data.iter().enumerate() {
        if i > 0 {
            write!(out, ",")?;
        }
        write!(out, "{}={}", i, value)?;
    }
    writeln!(out, "]\n")
}

fn write_instruction(out: &mut dyn Write, index: usize, program: &[i32], opcode: i32) -> io::Result<()> {
    match OpCode::from_value(opcode) {
        Some(op) => {
            write!(out, "Instruction {} ({}): Index {}\n", op.mnemonic(), opcode, index)?;
            match op.arity() {
                1 => writeln!(out, "    Next: {}", program[index + 1]),
                2 => writeln!(out, "    Next: {},{}", program[index + 1], program[index + 2]),
                _ => Ok(()),
            }
        }
        None => Ok(()),
    }
}

/// Writes values to standard output.
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> ConsoleSink {
        ConsoleSink
    }
}

impl Default for ConsoleSink {
    fn default() -> ConsoleSink {
        ConsoleSink::new()
    }
}

impl ValueSink for ConsoleSink {
    fn log_value(&mut self, value: i32) {
        println!("{}", value);
    }

    fn log_instruction(&mut self, index: usize, program: &[i32], opcode: i32) {
        let _ = write_instruction(&mut io::stdout(), index, program, opcode);
    }

    fn log_array(&mut self, label: &str, data: &[i32]) {
        let _ = write_array(&mut io::stdout(), label, data);
    }

    fn log_program_listing(&mut self, program: &[i32]) {
        let mut out = io::stdout();
        let _ = writeln!(out, "\n\tSource Code Values\n\t---------");
        for (i, value) in program.iter().enumerate() {
            if *value >= 0 {
                let _ = writeln!(out, "\t{}: {}", i, value);
            }
        }
    }

    fn log_invalid_opcode(&mut self, value: i32) {
        println!("Invalid operation code \"{}\"", value);
    }
}

/// Writes values to a file opened at construction.
pub struct FileSink {
    output: io::BufWriter<std::fs::File>,
}

impl FileSink {
    pub fn create(path: &std::path::Path) -> io::Result<FileSink> {
        let file = std::fs::File::create(path)?;
        Ok(FileSink {
            output: io::BufWriter::new(file),
        })
    }
}

impl ValueSink for FileSink {
    fn log_value(&mut self, value: i32) {
        let _ = writeln!(self.output, "{}", value);
    }

    fn log_instruction(&mut self, index: usize, program: &[i32], opcode: i32) {
        let _ = write_instruction(&mut self.output, index, program, opcode);
    }

    fn log_array(&mut self, label: &str, data: &[i32]) {
        let _ = write_array(&mut self.output, label, data);
    }

    fn log_program_listing(&mut self, program: &[i32]) {
        let _ = writeln!(self.output, "\n\tSource Code Values\n\t---------");
        for (i, value) in program.iter().enumerate() {
            if *value >= 0 {
                let _ = writeln!(self.output, "\t{}: {}", i, value);
            }
        }
    }

    fn log_invalid_opcode(&mut self, value: i32) {
        let _ = writeln!(self.output, "Invalid operation code \"{}\"", value);
    }
}
