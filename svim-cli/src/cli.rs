//! Command-line flag parsing: turns `std::env::args()` into an [`app::Command`].
//!
//! Built with `clap`'s builder API (`app_from_crate!` plus `Arg::with_name`),
//! pinned to the `~2.32.0` release.

use std::path::PathBuf;

use clap::{App, Arg, ArgGroup};

use crate::app::Command;
use crate::error::ConfigError;

pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Command, ConfigError> {
    let matches = App::new("svim")
        .version("0.1.0")
        .about("Stack-based bytecode virtual machine and assembler")
        .arg(
            Arg::with_name("console")
                .short("c")
                .takes_value(true)
                .value_name("SOURCE_FILE")
                .help("Assemble and run SOURCE_FILE, printing output to the console"),
        )
        .arg(
            Arg::with_name("file")
                .short("f")
                .takes_value(true)
                .value_name("SOURCE_FILE")
                .help("Assemble and run SOURCE_FILE, writing output to SOURCE_FILE_Output.txt"),
        )
        .arg(
            Arg::with_name("dump")
                .short("d")
                .takes_value(true)
                .value_name("SOURCE_FILE")
                .help("Assemble SOURCE_FILE without running it, writing the bytecode listing to SOURCE_FILE_ParsedSourceDump.txt"),
        )
        .arg(
            Arg::with_name("example")
                .short("e")
                .takes_value(true)
                .value_name("DEMO_NAME")
                .help("Run a built-in demo program, printing output to the console in trace mode"),
        )
        .group(
            ArgGroup::with_name("mode")
                .args(&["console", "file", "dump", "example"])
                .required(false),
        )
        .get_matches_from_safe(args);

    let matches = match matches {
        Ok(matches) => matches,
        // clap's own `-h`/`--help`/`-V`/`--version` short-circuit here with
        // the help/version text already rendered into `err.message`; treat
        // that the same as no flags at all rather than an invalid-argument
        // error, so `-h` exits 0 instead of 87.
        Err(err)
            if matches!(
                err.kind,
                clap::ErrorKind::HelpDisplayed | clap::ErrorKind::VersionDisplayed
            ) =>
        {
            return Ok(Command::Help);
        }
        Err(err) => return Err(ConfigError::InvalidArgs(err.message)),
    };

    if let Some(path) = matches.value_of("console") {
        return Ok(Command::RunToConsole {
            source_file: PathBuf::from(path),
        });
    }
    if let Some(path) = matches.value_of("file") {
        return Ok(Command::RunToFile {
            source_file: PathBuf::from(path),
        });
    }
    if let Some(path) = matches.value_of("dump") {
        return Ok(Command::DumpBytecode {
            source_file: PathBuf::from(path),
        });
    }
    if let Some(name) = matches.value_of("example") {
        return Ok(Command::RunDemo { name: name.to_string() });
    }

    Ok(Command::Help)
}
