//! Source file name validation and output file name derivation.

use crate::error::FileNameError;

pub const SOURCE_EXTENSION: &str = "svim";
const OUTPUT_SUFFIX: &str = "_Output";
const DUMP_SUFFIX: &str = "_ParsedSourceDump";
const DUMP_EXTENSION: &str = ".txt";

/// A character allowed in a source file name outside of the single `.`
/// extension separator: letters, digits, or underscore (mirrors
/// `is_alphabetic`'s C locale behavior of folding `_` in with the letters).
fn is_allowed_name_character(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Validates a source file name: only letters, digits, underscore, and
/// exactly one `.` marking the extension, which must be `.svim`.
pub fn validate_source_file_name(name: &str) -> Result<(), FileNameError> {
    // Must fit at least one name character plus the ".svim" extension itself.
    if name.len() < SOURCE_EXTENSION.len() + 2 {
        return Err(FileNameError::TooShort);
    }

    let mut separator_found = false;
    for c in name.chars() {
        if c == '.' {
            if separator_found {
                return Err(FileNameError::DisallowedCharacter);
            }
            separator_found = true;
        } else if !is_allowed_name_character(c) {
            return Err(FileNameError::DisallowedCharacter);
        }
    }

    if !separator_found {
        return Err(FileNameError::NoExtensionDelimiter);
    }

    let dot = name.rfind('.').expect("separator_found implies a '.' exists");
    if &name[dot + 1..] != SOURCE_EXTENSION {
        return Err(FileNameError::WrongExtension);
    }

    Ok(())
}

fn strip_svim_extension(name: &str) -> &str {
    name.strip_suffix(&format!(".{}", SOURCE_EXTENSION))
        .expect("caller already validated the .svim extension")
}

/// Derives the `-f` mode's execution-log output file name: strip `.svim`,
/// append `_Output.txt`.
pub fn output_log_file_name(source_file: &str) -> String {
    format!("{}{}{}", strip_svim_extension(source_file), OUTPUT_SUFFIX, DUMP_EXTENSION)
}

/// Derives the `-d` mode's bytecode listing output file name: strip
/// `.svim`, append `_ParsedSourceDump.txt`.
pub fn code_dump_file_name(source_file: &str) -> String {
    format!("{}{}{}", strip_svim_extension(source_file), DUMP_SUFFIX, DUMP_EXTENSION)
}
