//! Errors at the command-line boundary, plus the exit-code mapping.
//!
//! None of this is exercised by `svim-vm`/`svim-asm`: those two crates never
//! see a file path or a `std::process::exit`.

use std::fmt;
use std::path::PathBuf;

use svim_asm::ParseError;
use svim_vm::RuntimeFault;

/// Why a source file name was rejected before it was ever opened.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FileNameError {
    /// Shorter than the `.svim` extension itself allows.
    TooShort,
    /// No `.` found anywhere in the name.
    NoExtensionDelimiter,
    /// A `.` was found, but the suffix after it isn't `svim`.
    WrongExtension,
    /// A character outside `[A-Za-z0-9_.]`, or more than one `.`.
    DisallowedCharacter,
}

impl fmt::Display for FileNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileNameError::TooShort => write!(
                f,
                "invalid input file name entered: svim files must have at least one character \
                 for the file extension, plus the \".svim\" extension"
            ),
            FileNameError::NoExtensionDelimiter => {
                write!(f, "file extension could not be found; perhaps a '.' is missing")
            }
            FileNameError::WrongExtension => write!(
                f,
                "incorrect file extension; target files must have a \".svim\" extension at the end"
            ),
            FileNameError::DisallowedCharacter => write!(
                f,
                "invalid character detected in source file name; source file names can only \
                 contain alphabetic characters, digits, and '_' (not including the '.' separator \
                 for the file extension)"
            ),
        }
    }
}

/// Errors raised at the CLI boundary: bad flags, bad file names, unknown
/// demos, and I/O failures opening/creating files. Never produced by
/// `svim-vm`/`svim-asm` themselves.
#[derive(Debug)]
pub enum ConfigError {
    /// Wrong argument count or an unrecognized `-x` flag.
    InvalidArgs(String),
    /// The source file name failed [`crate::format::validate_source_file_name`].
    BadFileName(FileNameError),
    /// The named demo program doesn't exist. Carries the list of valid names.
    UnknownDemo { name: String, available: Vec<&'static str> },
    /// A `std::io::Error` reading the source file or writing an output file.
    Io(std::io::Error, PathBuf),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidArgs(message) => write!(f, "{}", message),
            ConfigError::BadFileName(err) => write!(f, "{}", err),
            ConfigError::UnknownDemo { name, available } => {
                writeln!(
                    f,
                    "application does not contain demo program \"{}\"",
                    name
                )?;
                writeln!(f, "example programs available (enter name in command line to run):")?;
                for demo_name in available {
                    writeln!(f, "    {}", demo_name)?;
                }
                Ok(())
            }
            ConfigError::Io(err, path) => write!(f, "{}: {}", path.display(), err),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The top-level error the CLI binary handles, unifying config errors,
/// missing source files, assembly errors, and runtime faults into one type.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    /// The source file couldn't be opened for reading at all (as distinct
    /// from an I/O failure writing an output file, which is `Config::Io`).
    SourceNotFound(PathBuf, std::io::Error),
    Parse(ParseError),
    Runtime(RuntimeFault),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "{}", err),
            AppError::SourceNotFound(path, err) => {
                write!(f, "could not open source file \"{}\": {}", path.display(), err)
            }
            AppError::Parse(err) => write!(f, "{}", err),
            AppError::Runtime(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> AppError {
        AppError::Config(err)
    }
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> AppError {
        AppError::Parse(err)
    }
}

impl From<RuntimeFault> for AppError {
    fn from(err: RuntimeFault) -> AppError {
        AppError::Runtime(err)
    }
}

/// The process exit codes, reachable only through [`AppError::exit_code`]
/// and the success path in [`crate::app::run`].
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const NOT_FOUND: i32 = 2;
    pub const PARSE_OR_FORMAT: i32 = 11;
    pub const INVALID_ARGS: i32 = 87;
    pub const FILE_OPEN: i32 = 110;
    pub const INVALID_EXECUTION_STATE: i32 = 186;
    pub const SCRIPT_FAILURE: i32 = -1;
    pub const UNKNOWN: i32 = -2;
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(ConfigError::InvalidArgs(_)) => exit_code::INVALID_ARGS,
            AppError::Config(ConfigError::BadFileName(_)) => exit_code::PARSE_OR_FORMAT,
            AppError::Config(ConfigError::UnknownDemo { .. }) => exit_code::NOT_FOUND,
            AppError::Config(ConfigError::Io(..)) => exit_code::FILE_OPEN,
            AppError::SourceNotFound(..) => exit_code::NOT_FOUND,
            AppError::Parse(_) => exit_code::PARSE_OR_FORMAT,
            AppError::Runtime(_) => exit_code::SCRIPT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_the_documented_table() {
        assert_eq!(
            AppError::Config(ConfigError::InvalidArgs("x".into())).exit_code(),
            87
        );
        assert_eq!(
            AppError::Config(ConfigError::BadFileName(FileNameError::TooShort)).exit_code(),
            11
        );
        assert_eq!(
            AppError::Config(ConfigError::UnknownDemo {
                name: "x".into(),
                available: vec![]
            })
            .exit_code(),
            2
        );
        assert_eq!(
            AppError::SourceNotFound(
                PathBuf::from("x.svim"),
                std::io::Error::new(std::io::ErrorKind::NotFound, "nope")
            )
            .exit_code(),
            2
        );
        assert_eq!(
            AppError::Config(ConfigError::Io(
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
                PathBuf::from("x")
            ))
            .exit_code(),
            110
        );
        assert_eq!(
            AppError::Runtime(RuntimeFault::DivideByZero { opcode: "DIV" }).exit_code(),
            -1
        );
    }
}
