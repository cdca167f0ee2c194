//! The application's run-command orchestration.
//!
//! This module knows nothing about `std::env::args()` or `std::process::exit`
//! -- [`crate::cli`] owns parsing `clap::ArgMatches` into a [`Command`] and
//! mapping the final `Result` to an exit code; this module only knows how to
//! carry out an already-parsed command.

use std::fs;
use std::path::{Path, PathBuf};

use svim_vm::{ConsoleSink, FileSink, Interpreter, ValueSink};

use crate::demos;
use crate::error::{AppError, ConfigError, FileNameError};
use crate::format;

/// One of the five modes `-h`/`-c`/`-f`/`-d`/`-e` select.
#[derive(Clone, Debug)]
pub enum Command {
    Help,
    RunToConsole { source_file: PathBuf },
    RunToFile { source_file: PathBuf },
    DumpBytecode { source_file: PathBuf },
    RunDemo { name: String },
}

/// `-f`/`-d`/`-e` run in trace mode; `-c` does not. Trace mode is tied to
/// the command kind rather than exposed as a user-facing `--trace` flag.
fn trace_mode_for(command: &Command) -> bool {
    matches!(
        command,
        Command::RunToFile { .. } | Command::DumpBytecode { .. } | Command::RunDemo { .. }
    )
}

pub const HELP_BANNER: &str = "Command line format: option source_file [output_file/example_program]";

pub fn print_help() {
    println!("{}", HELP_BANNER);
    println!("\t-h (print available options (no 'source_file' necessary))");
    println!("\t-c (run 'source_file,' outputting to console)");
    println!("\t-f (run 'source_file,' outputting to file)");
    println!("\t-d (parse 'source_file' without running, outputting parsed contents to file)");
    println!("\t-e (run example_program, outputting to console in trace mode)");
}

/// Runs an already-resolved command to completion. Returns `Ok(())` on a
/// clean interpreter exit, or the `AppError` that should drive the process's
/// exit code.
pub fn run(command: Command) -> Result<(), AppError> {
    match &command {
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::RunToConsole { source_file } | Command::RunToFile { source_file } => {
            run_user_program(&command, source_file)
        }
        Command::DumpBytecode { source_file } => dump_parsed_source(source_file),
        Command::RunDemo { name } => run_demo_program(name),
    }
}

fn validate_and_read_source(source_file: &Path) -> Result<String, AppError> {
    let name = source_file
        .to_str()
        .ok_or_else(|| AppError::Config(ConfigError::BadFileName(FileNameError::DisallowedCharacter)))?;

    format::validate_source_file_name(name)
        .map_err(|err| AppError::Config(ConfigError::BadFileName(err)))?;

    fs::read_to_string(source_file).map_err(|err| AppError::SourceNotFound(source_file.to_path_buf(), err))
}

fn run_user_program(command: &Command, source_file: &Path) -> Result<(), AppError> {
    let source = validate_and_read_source(source_file)?;
    let assembled = svim_asm::assemble(&source)?;

    let sink: Box<dyn ValueSink> = match command {
        Command::RunToConsole { .. } => Box::new(ConsoleSink::new()),
        Command::RunToFile { .. } => {
            let name = source_file.to_str().expect("validated above");
            let output_path = PathBuf::from(format::output_log_file_name(name));
            Box::new(
                FileSink::create(&output_path)
                    .map_err(|err| AppError::Config(ConfigError::Io(err, output_path)))?,
            )
        }
        _ => unreachable!("run_user_program only called for RunToConsole/RunToFile"),
    };

    run_interpreter(assembled.program, assembled.start_index, sink, trace_mode_for(command))
}

fn dump_parsed_source(source_file: &Path) -> Result<(), AppError> {
    let source = validate_and_read_source(source_file)?;
    let assembled = svim_asm::assemble(&source)?;

    let name = source_file.to_str().expect("validated above");
    let output_path = PathBuf::from(format::code_dump_file_name(name));
    let mut sink =
        FileSink::create(&output_path).map_err(|err| AppError::Config(ConfigError::Io(err, output_path)))?;

    sink.log_program_listing(&assembled.program);
    Ok(())
}

fn run_demo_program(name: &str) -> Result<(), AppError> {
    let demo = demos::find(name).ok_or_else(|| {
        AppError::Config(ConfigError::UnknownDemo {
            name: name.to_string(),
            available: demos::names(),
        })
    })?;

    let assembled = svim_asm::assemble(demo.source)
        .expect("built-in demo source is assembled and tested at build time");

    run_interpreter(assembled.program, assembled.start_index, Box::new(ConsoleSink::new()), true)
}

fn run_interpreter(
    program: Vec<i32>,
    start_index: usize,
    sink: Box<dyn ValueSink>,
    trace_mode: bool,
) -> Result<(), AppError> {
    let mut interpreter = Interpreter::new(program, start_index, sink);
    interpreter.set_trace_mode(trace_mode);

    interpreter.interpret()?;

    if trace_mode {
        interpreter.dump_bytecode();
    }

    Ok(())
}
