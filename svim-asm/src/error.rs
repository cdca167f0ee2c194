//! Errors surfaced while turning source text into a program.
//!
//! Every variant carries the 1-based source line it was raised on.

use std::fmt;

/// Why an integer literal failed to convert.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConversionFailure {
    /// The token wasn't a valid integer at all (e.g. a lone `-`).
    NotANumber,
    /// The token was a valid integer but doesn't fit in 32 bits.
    Overflow,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// Unknown token, a token glued to non-whitespace punctuation, a
    /// duplicate `.INIT`, or `.INIT` with no instruction following it.
    Syntax { line: u32, message: String },
    /// An operand token couldn't be converted to an `i32`.
    Conversion {
        line: u32,
        token: String,
        kind: ConversionFailure,
    },
    /// A negative operand on a non-`PUSH` instruction, or an index operand
    /// outside its declared range.
    BadOperand { line: u32, message: String },
    /// End of input reached with operands still owed to the last instruction.
    MalformedProgram { line: u32, message: String },
}

impl ParseError {
    pub fn line(&self) -> u32 {
        match self {
            ParseError::Syntax { line, .. }
            | ParseError::Conversion { line, .. }
            | ParseError::BadOperand { line, .. }
            | ParseError::MalformedProgram { line, .. } => *line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Syntax { line, message } => {
                write!(f, "line {}: syntax error: {}", line, message)
            }
            ParseError::Conversion { line, token, kind } => {
                let reason = match kind {
                    ConversionFailure::NotANumber => "is not a convertible integer",
                    ConversionFailure::Overflow => "falls out of the range of a 32-bit integer",
                };
                write!(f, "line {}: operand \"{}\" {}", line, token, reason)
            }
            ParseError::BadOperand { line, message } => {
                write!(f, "line {}: bad operand: {}", line, message)
            }
            ParseError::MalformedProgram { line, message } => {
                write!(f, "line {}: malformed program: {}", line, message)
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_accessor_covers_every_variant() {
        let errs = vec![
            ParseError::Syntax {
                line: 1,
                message: "x".into(),
            },
            ParseError::Conversion {
                line: 2,
                token: "x".into(),
                kind: ConversionFailure::Overflow,
            },
            ParseError::BadOperand {
                line: 3,
                message: "x".into(),
            },
            ParseError::MalformedProgram {
                line: 4,
                message: "x".into(),
            },
        ];

        for (i, err) in errs.iter().enumerate() {
            assert_eq!(err.line(), (i + 1) as u32);
        }
    }
}
