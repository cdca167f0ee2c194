//! The line-oriented parse state machine.
//!
//! Parsing is driven by a single counter, `expected_operand_count`: zero
//! means the next token must be a mnemonic or a keyword, positive means the
//! next token must be an integer literal (decrementing the counter on
//! success). The counter never goes negative in a correct implementation --
//! if it ever would, that's this parser's own bug, not a user error.

use crate::error::{ConversionFailure, ParseError};
use crate::lexer::{is_ident_continue, is_ident_start, is_negator, Cursor};
use std::num::IntErrorKind;
use svim_vm::constants::{MAX_GLOBALS, MAX_LOCALS};
use svim_vm::OpCode;

const INIT_KEYWORD: &str = "INIT";

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryPointStatus {
    NotFound,
    Expecting,
    Found,
}

/// The assembled result: a flat program plus its declared entry point.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assembled {
    pub program: Vec<i32>,
    pub start_index: usize,
}

struct State {
    expected_operand_count: i32,
    last_instruction: Option<OpCode>,
    entry_point_status: EntryPointStatus,
    program_start_index: usize,
    line: u32,
}

pub fn assemble(source: &str) -> Result<Assembled, ParseError> {
    let mut program = Vec::with_capacity(svim_vm::constants::INITIAL_STACK_CAPACITY);
    let mut state = State {
        expected_operand_count: 0,
        last_instruction: None,
        entry_point_status: EntryPointStatus::NotFound,
        program_start_index: 0,
        line: 0,
    };

    for raw_line in source.lines() {
        state.line += 1;
        let upper = raw_line.to_ascii_uppercase();
        parse_line(&upper, &mut state, &mut program)?;
    }

    if state.expected_operand_count != 0 {
        return Err(ParseError::MalformedProgram {
            line: state.line,
            message: format!(
                "expected {} more operand(s) after the last parsed instruction",
                state.expected_operand_count
            ),
        });
    }

    if state.entry_point_status == EntryPointStatus::Expecting {
        return Err(ParseError::Syntax {
            line: state.line,
            message: format!(
                "no instruction found after {} declaration; an entry point must be given after it",
                INIT_KEYWORD
            ),
        });
    }

    Ok(Assembled {
        program,
        start_index: state.program_start_index,
    })
}

fn parse_line(line: &str, state: &mut State, program: &mut Vec<i32>) -> Result<(), ParseError> {
    let mut cursor = Cursor::new(line);

    loop {
        cursor.skip_whitespace();

        if cursor.at_end() || cursor.at_comment() {
            return Ok(());
        }

        if cursor.peek() == Some('.') {
            cursor.bump();
            let token = parse_keyword_token(&mut cursor, state.line)?;
            process_keyword(token, state)?;
        } else if state.expected_operand_count == 0 {
            let token = parse_instruction_token(&mut cursor, state.line)?;
            let opcode = resolve_instruction(token, state.line)?;

            program.push(opcode.value());

            if state.entry_point_status == EntryPointStatus::Expecting {
                state.program_start_index = program.len() - 1;
                state.entry_point_status = EntryPointStatus::Found;
            }

            state.last_instruction = Some(opcode);
            state.expected_operand_count = opcode.arity() as i32;
        } else if state.expected_operand_count > 0 {
            let token = parse_operand_token(&mut cursor, state.line)?;
            let value = convert_operand(token, state.line)?;

            validate_operand(value, state)?;
            program.push(value);
            state.expected_operand_count -= 1;
        } else {
            unreachable!("expected operand count went negative -- parser bug");
        }
    }
}

fn parse_instruction_token<'a>(cursor: &mut Cursor<'a>, line: u32) -> Result<&'a str, ParseError> {
    if !cursor.peek().map_or(false, is_ident_start) {
        return Err(ParseError::Syntax {
            line,
            message: "expected an instruction".to_string(),
        });
    }

    let token = cursor.take_while(is_ident_continue);

    if !cursor.at_token_boundary() {
        return Err(malformed_token(token, line));
    }

    Ok(token)
}

fn parse_keyword_token<'a>(cursor: &mut Cursor<'a>, line: u32) -> Result<&'a str, ParseError> {
    if !cursor.peek().map_or(false, |c| c.is_ascii_alphabetic()) {
        return Err(ParseError::Syntax {
            line,
            message: "expected a keyword".to_string(),
        });
    }

    let token = cursor.take_while(|c| c.is_ascii_alphabetic());

    if !cursor.at_token_boundary() {
        return Err(malformed_token(token, line));
    }

    Ok(token)
}

fn parse_operand_token<'a>(cursor: &mut Cursor<'a>, line: u32) -> Result<&'a str, ParseError> {
    let start_char = cursor.peek();

    if !start_char.map_or(false, |c| c.is_ascii_digit() || is_negator(c)) {
        return Err(ParseError::Syntax {
            line,
            message: "expected an integer".to_string(),
        });
    }

    let mark = cursor.mark();

    if start_char.map_or(false, is_negator) {
        cursor.bump();
    }

    cursor.take_while(|c| c.is_ascii_digit());
    let token = cursor.span_since(mark);

    if !cursor.at_token_boundary() {
        return Err(malformed_token(token, line));
    }

    Ok(token)
}

fn malformed_token(token: &str, line: u32) -> ParseError {
    ParseError::Syntax {
        line,
        message: format!("unknown token \"{}\" found", token),
    }
}

fn resolve_instruction(token: &str, line: u32) -> Result<OpCode, ParseError> {
    OpCode::from_mnemonic(token).ok_or_else(|| ParseError::Syntax {
        line,
        message: format!("token \"{}\" is not a valid instruction", token),
    })
}

fn process_keyword(token: &str, state: &mut State) -> Result<(), ParseError> {
    if token == INIT_KEYWORD {
        if state.entry_point_status != EntryPointStatus::NotFound {
            return Err(ParseError::Syntax {
                line: state.line,
                message: "duplicate entry point declared; only one per program is allowed"
                    .to_string(),
            });
        }

        state.entry_point_status = EntryPointStatus::Expecting;
        Ok(())
    } else {
        Err(ParseError::Syntax {
            line: state.line,
            message: format!("unexpected token \".{}\" found", token),
        })
    }
}

fn convert_operand(token: &str, line: u32) -> Result<i32, ParseError> {
    token.parse::<i32>().map_err(|err| {
        let kind = match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ConversionFailure::Overflow,
            _ => ConversionFailure::NotANumber,
        };

        ParseError::Conversion {
            line,
            token: token.to_string(),
            kind,
        }
    })
}

/// Validates an operand against the rules for the instruction it belongs to.
///
/// `CALL`'s *first* inline operand (the destination address) is checked
/// against `MAX_LOCALS` rather than the program length here; the interpreter
/// validates the destination against the actual program length at runtime,
/// so this assembly-time check only ever rejects programs the interpreter
/// would have accepted, never the reverse.
fn validate_operand(value: i32, state: &State) -> Result<(), ParseError> {
    let last = state
        .last_instruction
        .expect("an operand is only parsed right after an instruction");

    if value < 0 && last != OpCode::PUSH {
        return Err(ParseError::BadOperand {
            line: state.line,
            message: format!(
                "use of negative value {} with non-PUSH instruction {}; operands for other instructions must be non-negative",
                value,
                last.mnemonic()
            ),
        });
    }

    let is_call_destination =
        last == OpCode::CALL && state.expected_operand_count == OpCode::CALL.arity() as i32;

    if is_call_destination || last == OpCode::LPUSH || last == OpCode::LSTORE {
        assert_within_range(value, MAX_LOCALS as i32, "local", last, state.line)
    } else if last == OpCode::GPUSH || last == OpCode::GSTORE {
        assert_within_range(value, MAX_GLOBALS as i32, "global", last, state.line)
    } else {
        Ok(())
    }
}

fn assert_within_range(
    index: i32,
    max_values: i32,
    kind: &str,
    instruction: OpCode,
    line: u32,
) -> Result<(), ParseError> {
    if index < 0 || index >= max_values {
        return Err(ParseError::BadOperand {
            line,
            message: format!(
                "{}) index operand {} strays outside range of {} values (range: 0-{})",
                instruction.mnemonic(),
                index,
                kind,
                max_values
            ),
        });
    }

    Ok(())
}
