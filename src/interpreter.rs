//! The fetch-decode-execute loop.

use std::io::Read;

use crate::error::RuntimeFault;
use crate::frame::{CallStack, Frame};
use crate::globals::GlobalStore;
use crate::opcode::OpCode;
use crate::sink::ValueSink;
use crate::stack::OperandStack;

const FALSE: i32 = 0;
const TRUE: i32 = 1;

/// Why `interpret` returned successfully.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitReason {
    /// The `EXIT` opcode ran.
    Exited,
    /// The instruction pointer ran off the end of the program.
    RanOffEnd,
    /// `RET` fired in the synthetic main frame (its `return_index` is the
    /// program length, so this looks identical to `RanOffEnd` to the caller
    /// but is reached through `RET` rather than falling through).
    ReturnedFromMain,
}

/// Executes a program over an operand stack, global store, and call stack,
/// producing its only observable effects through a [`ValueSink`].
pub struct Interpreter {
    program: Vec<i32>,
    ip: usize,
    stack: OperandStack,
    globals: GlobalStore,
    call_stack: CallStack,
    trace_mode: bool,
    sink: Box<dyn ValueSink>,
}

impl Interpreter {
    pub fn new(program: Vec<i32>, start_index: usize, sink: Box<dyn ValueSink>) -> Interpreter {
        let call_stack = CallStack::new(program.len());
        Interpreter {
            ip: start_index,
            program,
            stack: OperandStack::new(),
            globals: GlobalStore::new(),
            call_stack,
            trace_mode: false,
            sink,
        }
    }

    pub fn set_trace_mode(&mut self, enabled: bool) {
        self.trace_mode = enabled;
    }

    pub fn dump_bytecode(&mut self) {
        self.sink.log_program_listing(&self.program);
    }

    fn next_inline(&mut self) -> i32 {
        let value = self.program[self.ip];
        self.ip += 1;
        value
    }

    fn check_jump_target(&self, opcode: &'static str, target: i32) -> Result<usize, RuntimeFault> {
        if target < 0 || target as usize >= self.program.len() {
            Err(RuntimeFault::BadJumpTarget {
                opcode,
                target,
                program_len: self.program.len(),
            })
        } else {
            Ok(target as usize)
        }
    }

    /// Runs until `EXIT`, a natural end-of-program, a top-level `RET`, or a fault.
    pub fn interpret(&mut self) -> Result<ExitReason, RuntimeFault> {
        if self.program.is_empty() {
            return Ok(ExitReason::RanOffEnd);
        }

        while self.ip < self.program.len() {
            if self.trace_mode {
                self.sink.log_instruction(self.ip, &self.program, self.program[self.ip]);
            }

            let raw_op = self.program[self.ip];
            self.ip += 1;

            let opcode = match OpCode::from_value(raw_op) {
                Some(op) => op,
                None => {
                    self.sink.log_invalid_opcode(raw_op);
                    return Err(RuntimeFault::UnknownOpcode {
                        value: raw_op,
                        index: self.ip - 1,
                    });
                }
            };

            match self.execute(opcode)? {
                Some(reason) => {
                    self.run_exit_protocol();
                    return Ok(reason);
                }
                None => {
                    if self.trace_mode {
                        self.sink.log_array("Stack", self.stack.as_slice());
                        self.sink.log_array("Locals", self.call_stack.current().locals());
                    }
                }
            }
        }

        self.run_exit_protocol();
        Ok(ExitReason::RanOffEnd)
    }

    /// Executes one already-fetched opcode. Returns `Some(reason)` when this
    /// opcode ends the program (`EXIT`, or `RET` unwinding the main frame).
    fn execute(&mut self, opcode: OpCode) -> Result<Option<ExitReason>, RuntimeFault> {
        use OpCode::*;

        match opcode {
            ADD => {
                let (a, b) = self.stack.pop2("ADD")?;
                self.stack.push(a.wrapping_add(b));
            }
            SUB => {
                let (a, b) = self.stack.pop2("SUB")?;
                self.stack.push(a.wrapping_sub(b));
            }
            MUL => {
                let (a, b) = self.stack.pop2("MUL")?;
                self.stack.push(a.wrapping_mul(b));
            }
            DIV => {
                let (a, b) = self.stack.pop2("DIV")?;
                if b == 0 {
                    return Err(RuntimeFault::DivideByZero { opcode: "DIV" });
                }
                self.stack.push(a / b);
            }
            MOD => {
                let (a, b) = self.stack.pop2("MOD")?;
                if b == 0 {
                    return Err(RuntimeFault::DivideByZero { opcode: "MOD" });
                }
                self.stack.push(a % b);
            }
            INC => {
                let top = self.stack.top_mut("INC")?;
                *top = top.wrapping_add(1);
            }
            DEC => {
                let top = self.stack.top_mut("DEC")?;
                *top = top.wrapping_sub(1);
            }
            NEG => {
                let top = self.stack.top_mut("NEG")?;
                *top = top.wrapping_neg();
            }
            LT => {
                let (a, b) = self.stack.pop2("LT")?;
                self.stack.push(if a < b { TRUE } else { FALSE });
            }
            GT => {
                let (a, b) = self.stack.pop2("GT")?;
                self.stack.push(if a > b { TRUE } else { FALSE });
            }
            EQ => {
                let (a, b) = self.stack.pop2("EQ")?;
                self.stack.push(if a == b { TRUE } else { FALSE });
            }
            LEQ => {
                let (a, b) = self.stack.pop2("LEQ")?;
                self.stack.push(if a <= b { TRUE } else { FALSE });
            }
            GEQ => {
                let (a, b) = self.stack.pop2("GEQ")?;
                self.stack.push(if a >= b { TRUE } else { FALSE });
            }
            NEQ => {
                let (a, b) = self.stack.pop2("NEQ")?;
                self.stack.push(if a != b { TRUE } else { FALSE });
            }
            DUP => {
                let top = self.stack.at_depth("DUP", 0)?;
                self.stack.push(top);
            }
            DUP2 => self.stack.dup2()?,
            SWAP => self.stack.swap()?,
            OVER => {
                let under = self.stack.at_depth("OVER", 1)?;
                self.stack.push(under);
            }
            PRINT => {
                let value = self.stack.pop("PRINT")?;
                self.sink.log_value(value);
            }
            POP => {
                self.stack.pop("POP")?;
            }
            TURN => self.stack.turn()?,
            HALT => {
                let mut byte = [0u8; 1];
                let _ = std::io::stdin().read(&mut byte);
            }
            BR => {
                let target = self.next_inline();
                let address = self.check_jump_target("BR", target)?;
                self.ip = address;
            }
            BRT => {
                let target = self.next_inline();
                let address = self.check_jump_target("BRT", target)?;
                let condition = self.stack.pop("BRT")?;
                if condition != FALSE {
                    self.ip = address;
                }
            }
            BRF => {
                let target = self.next_inline();
                let address = self.check_jump_target("BRF", target)?;
                let condition = self.stack.pop("BRF")?;
                if condition == FALSE {
                    self.ip = address;
                }
            }
            PUSH => {
                let value = self.next_inline();
                self.stack.push(value);
            }
            LPUSH => {
                let index = self.next_inline();
                let value = self.call_stack.current().local(index)?;
                self.stack.push(value);
            }
            GPUSH => {
                let index = self.next_inline();
                let value = self.globals.get(index)?;
                self.stack.push(value);
            }
            LSTORE => {
                let index = self.next_inline();
                let value = self.stack.pop("LSTORE")?;
                self.call_stack.current_mut().set_local(index, value)?;
            }
            GSTORE => {
                let index = self.next_inline();
                let value = self.stack.pop("GSTORE")?;
                self.globals.set(index, value)?;
            }
            CALL => {
                let destination = self.next_inline();
                let address = self.check_jump_target("CALL", destination)?;
                let argc = self.next_inline();
                if argc < 0 {
                    return Err(RuntimeFault::StackUnderflow {
                        opcode: "CALL",
                        needed: 0,
                        available: self.stack.len(),
                    });
                }
                let args = self.stack.pop_n("CALL", argc as usize)?;
                let frame = Frame::with_args(self.ip, &args);
                self.call_stack.push(frame);
                self.ip = address;
            }
            RET => {
                let (return_index, is_main) = self.call_stack.pop();
                self.ip = return_index;
                if is_main {
                    return Ok(Some(ExitReason::ReturnedFromMain));
                }
            }
            EXIT => return Ok(Some(ExitReason::Exited)),
        }

        Ok(None)
    }

    fn run_exit_protocol(&mut self) {
        if self.trace_mode {
            self.sink.log_array("Stack", self.stack.as_slice());
            self.sink.log_array("Globals", self.globals.as_slice());
            self.sink.log_array("Locals", self.call_stack.current().locals());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::ValueSink;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct CollectingSink {
        values: Rc<RefCell<Vec<i32>>>,
    }

    impl ValueSink for CollectingSink {
        fn log_value(&mut self, value: i32) {
            self.values.borrow_mut().push(value);
        }
        fn log_instruction(&mut self, _index: usize, _program: &[i32], _opcode: i32) {}
        fn log_array(&mut self, _label: &str, _data: &[i32]) {}
        fn log_program_listing(&mut self, _program: &[i32]) {}
        fn log_invalid_opcode(&mut self, _value: i32) {}
    }

    fn run(program: Vec<i32>) -> (Result<ExitReason, RuntimeFault>, Vec<i32>) {
        run_from(program, 0)
    }

    fn run_from(program: Vec<i32>, start: usize) -> (Result<ExitReason, RuntimeFault>, Vec<i32>) {
        let printed = Rc::new(RefCell::new(Vec::new()));
        let sink = CollectingSink {
            values: Rc::clone(&printed),
        };
        let mut interp = Interpreter::new(program, start, Box::new(sink));
        let result = interp.interpret();
        let values = printed.borrow().clone();
        (result, values)
    }

    #[test]
    fn arithmetic_and_comparisons() {
        use OpCode::*;
        let program: Vec<i32> = vec![
            PUSH.value(), 8,
            PUSH.value(), 7,
            ADD.value(),
            PUSH.value(), 5,
            SUB.value(),
            PUSH.value(), 2,
            MUL.value(),
            PUSH.value(), 4,
            DIV.value(),
            PRINT.value(),
            PUSH.value(), 5,
            PUSH.value(), 2,
            MOD.value(),
            PRINT.value(),
            EXIT.value(),
        ];
        let (result, printed) = run(program);
        assert_eq!(result.unwrap(), ExitReason::Exited);
        assert_eq!(printed, vec![5, 1]);
    }

    #[test]
    fn unconditional_branch_skips_dead_push() {
        use OpCode::*;
        // BR 4, PUSH 6, PUSH 8, PUSH 7, ADD, PRINT, EXIT
        let program: Vec<i32> = vec![
            BR.value(), 4,
            PUSH.value(), 6,
            PUSH.value(), 8,
            PUSH.value(), 7,
            ADD.value(),
            PRINT.value(),
            EXIT.value(),
        ];
        let (result, printed) = run(program);
        assert_eq!(result.unwrap(), ExitReason::Exited);
        assert_eq!(printed, vec![15]);
    }

    #[test]
    fn do_while_loop_counts_to_ten() {
        use OpCode::*;
        // loop demo: locals[0] = 10 (max), locals[1] = 0 (i); do { i++; print(i); } while (i < max)
        let program: Vec<i32> = vec![
            PUSH.value(), 10,
            LSTORE.value(), 0,
            PUSH.value(), 0,
            LSTORE.value(), 1,
            LPUSH.value(), 1,
            INC.value(),
            DUP.value(),
            DUP.value(),
            PRINT.value(),
            LSTORE.value(), 1,
            LPUSH.value(), 0,
            LT.value(),
            BRT.value(), 8,
        ];
        let (result, printed) = run(program);
        assert_eq!(result.unwrap(), ExitReason::RanOffEnd);
        assert_eq!(printed, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn divide_by_zero_faults() {
        use OpCode::*;
        let program: Vec<i32> = vec![PUSH.value(), 1, PUSH.value(), 0, DIV.value()];
        let (result, _) = run(program);
        assert_eq!(result, Err(RuntimeFault::DivideByZero { opcode: "DIV" }));
    }

    #[test]
    fn stack_underflow_on_empty_stack() {
        use OpCode::*;
        let program: Vec<i32> = vec![ADD.value()];
        let (result, _) = run(program);
        assert!(matches!(result, Err(RuntimeFault::StackUnderflow { .. })));
    }

    #[test]
    fn arithmetic_wraps_instead_of_panicking_on_overflow() {
        use OpCode::*;
        let program: Vec<i32> = vec![
            PUSH.value(), 2_000_000_000,
            PUSH.value(), 2_000_000_000,
            ADD.value(),
            PRINT.value(),
            PUSH.value(), i32::MIN,
            NEG.value(),
            PRINT.value(),
            EXIT.value(),
        ];
        let (result, printed) = run(program);
        assert_eq!(result.unwrap(), ExitReason::Exited);
        assert_eq!(printed, vec![2_000_000_000i32.wrapping_add(2_000_000_000), i32::MIN]);
    }

    #[test]
    fn call_binds_args_in_pop_order() {
        use OpCode::*;
        // main: PUSH 100, CALL 7 1, PRINT, EXIT
        // double: LPUSH 0, PUSH 2, MUL, RET
        let program: Vec<i32> = vec![
            PUSH.value(), 100,
            CALL.value(), 7, 1,
            PRINT.value(),
            EXIT.value(),
            LPUSH.value(), 0,
            PUSH.value(), 2,
            MUL.value(),
            RET.value(),
        ];
        let (result, printed) = run(program);
        assert_eq!(result.unwrap(), ExitReason::Exited);
        assert_eq!(printed, vec![200]);
    }

    #[test]
    fn unused_start_index_is_honored() {
        let (result, _) = run_from(vec![OpCode::EXIT.value()], 0);
        assert_eq!(result.unwrap(), ExitReason::Exited);
    }

    #[test]
    fn top_level_ret_in_trace_mode_does_not_panic_on_exit_dump() {
        use OpCode::*;
        let printed = Rc::new(RefCell::new(Vec::new()));
        let sink = CollectingSink {
            values: Rc::clone(&printed),
        };
        let program: Vec<i32> = vec![PUSH.value(), 1, PRINT.value(), RET.value()];
        let mut interp = Interpreter::new(program, 0, Box::new(sink));
        interp.set_trace_mode(true);
        let result = interp.interpret();
        assert_eq!(result.unwrap(), ExitReason::ReturnedFromMain);
        assert_eq!(printed.borrow().clone(), vec![1]);
    }
}
