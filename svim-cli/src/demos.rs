//! The six built-in demo programs `-e <name>` runs.
//!
//! Each demo is written here as `.svim` source and assembled once, on
//! lookup, with [`svim_asm::assemble`].

pub struct Demo {
    pub name: &'static str,
    pub source: &'static str,
}

pub const DEMOS: &[Demo] = &[
    Demo {
        name: "basics",
        source: BASICS,
    },
    Demo {
        name: "branches",
        source: BRANCHES,
    },
    Demo {
        name: "loop",
        source: LOOP,
    },
    Demo {
        name: "func_double",
        source: FUNC_DOUBLE,
    },
    Demo {
        name: "factorial_5",
        source: FACTORIAL_5,
    },
    Demo {
        name: "fibonacci_10",
        source: FIBONACCI_10,
    },
];

/// Looks up a demo by name (case-sensitive).
pub fn find(name: &str) -> Option<&'static Demo> {
    DEMOS.iter().find(|demo| demo.name == name)
}

pub fn names() -> Vec<&'static str> {
    DEMOS.iter().map(|demo| demo.name).collect()
}

const BASICS: &str = "
    # PUSH, ADD, SUB, MUL, DIV, MOD, PRINT
    PUSH 8
    PUSH 7
    ADD
    PUSH 5
    SUB
    PUSH 2
    MUL
    PUSH 4
    DIV
    PRINT
    PUSH 5
    PUSH 2
    MOD
    PRINT

    # LT
    PUSH 5
    PUSH 10
    LT
    PRINT

    # EQ
    PUSH 10
    PUSH 10
    EQ
    PRINT

    # GT
    PUSH 10
    PUSH 8
    GT
    PRINT

    # DUP
    PUSH 100
    DUP
    MUL
    PRINT

    # DUP2
    PUSH 200
    PUSH 2
    DUP2
    DIV
    PRINT
    MUL
    PRINT

    # OVER, SWAP, POP, NEG
    PUSH 300
    PUSH 3
    OVER
    LT
    SWAP
    POP
    NEG
    PRINT

    # TURN
    PUSH 1
    PUSH 2
    PUSH 3
    TURN
    PRINT
    PRINT
    PRINT

    # LEQ
    PUSH 400
    DUP
    LEQ
    PRINT
    PUSH 400
    PUSH 500
    LEQ
    PRINT

    # GEQ
    PUSH 600
    DUP
    GEQ
    PRINT
    PUSH 600
    PUSH 500
    GEQ
    PRINT

    # NEQ
    PUSH 600
    PUSH 700
    NEQ
    PRINT

    # LSTORE, LPUSH
    PUSH 8
    LSTORE 0
    PUSH 7
    LPUSH 0
    ADD
    PUSH 7
    LSTORE 1
    LPUSH 1
    ADD
    PRINT

    # GSTORE, GPUSH
    PUSH 1000
    GSTORE 0
    GPUSH 0
    GPUSH 0
    MUL
    PRINT

    EXIT
";

const BRANCHES: &str = "
    # BR
    BR 4
    PUSH 6       # skipped

    # BRT
    PUSH 8
    PUSH 7
    DUP2
    NEQ
    BRT 13
    SUB          # skipped
    ADD
    PRINT

    # BRF
    PUSH 20
    PUSH 40
    DUP2
    EQ
    BRF 24
    DIV          # skipped
    MUL
    PRINT
";

const LOOP: &str = "
    # MAX_ITERATIONS = 10
    PUSH 10
    LSTORE 0

    # I = 0
    PUSH 0
    LSTORE 1

    # DO-WHILE (I < MAX_ITERATIONS)
    LPUSH 1
    INC
    DUP
    DUP
    PRINT
    LSTORE 1
    LPUSH 0
    LT
    BRT 8
";

const FUNC_DOUBLE: &str = "
    # FUNCTION: main()
    PUSH 100
    CALL 7 1
    PRINT
    EXIT

    # FUNCTION: double(int)
    LPUSH 0
    PUSH 2
    MUL
    RET
";

const FACTORIAL_5: &str = "
    # FUNCTION: main()
    PUSH 5
    CALL 7 1
    PRINT
    EXIT

    # FUNCTION: factorial(n)
    PUSH 1
    LSTORE 1
    PUSH 2
    LSTORE 2
    LPUSH 2
    LPUSH 0
    LEQ
    BRF 36
    LPUSH 1
    LPUSH 2
    MUL
    LSTORE 1
    LPUSH 2
    INC
    LSTORE 2
    BR 15
    LPUSH 1
    RET
";

const FIBONACCI_10: &str = "
    PUSH 10
    LSTORE 0

    PUSH 0
    LSTORE 1

    PUSH 1
    LSTORE 2

    LPUSH 2
    LSTORE 3

    PUSH 1
    LSTORE 4

    LPUSH 4
    LPUSH 0
    LEQ
    BRT 28
    EXIT

    LPUSH 1
    PRINT

    LPUSH 2
    LSTORE 1

    LPUSH 3
    LSTORE 2

    LPUSH 1
    LPUSH 2
    ADD
    LSTORE 3

    LPUSH 4
    INC
    LSTORE 4

    BR 20
";

#[cfg(test)]
mod tests {
    use super::*;
    use svim_vm::{ExitReason, Interpreter, ValueSink};

    struct CollectingSink {
        values: Vec<i32>,
    }

    impl ValueSink for CollectingSink {
        fn log_value(&mut self, value: i32) {
            self.values.push(value);
        }
        fn log_instruction(&mut self, _index: usize, _program: &[i32], _opcode: i32) {}
        fn log_array(&mut self, _label: &str, _data: &[i32]) {}
        fn log_program_listing(&mut self, _program: &[i32]) {}
        fn log_invalid_opcode(&mut self, _value: i32) {}
    }

    #[test]
    fn every_demo_assembles_and_runs_to_completion() {
        for demo in DEMOS {
            let assembled = svim_asm::assemble(demo.source)
                .unwrap_or_else(|err| panic!("{} failed to assemble: {}", demo.name, err));
            let sink = CollectingSink { values: Vec::new() };
            let mut interpreter =
                Interpreter::new(assembled.program, assembled.start_index, Box::new(sink));
            let result = interpreter.interpret();
            assert!(result.is_ok(), "{} faulted: {:?}", demo.name, result);
        }
    }

    #[test]
    fn find_is_case_sensitive() {
        assert!(find("basics").is_some());
        assert!(find("Basics").is_none());
    }

    #[test]
    fn loop_prints_one_through_ten() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let demo = find("loop").unwrap();
        let assembled = svim_asm::assemble(demo.source).unwrap();
        let printed = Rc::new(RefCell::new(Vec::new()));

        struct Recording(Rc<RefCell<Vec<i32>>>);
        impl ValueSink for Recording {
            fn log_value(&mut self, value: i32) {
                self.0.borrow_mut().push(value);
            }
            fn log_instruction(&mut self, _index: usize, _program: &[i32], _opcode: i32) {}
            fn log_array(&mut self, _label: &str, _data: &[i32]) {}
            fn log_program_listing(&mut self, _program: &[i32]) {}
            fn log_invalid_opcode(&mut self, _value: i32) {}
        }

        let sink = Recording(Rc::clone(&printed));
        let mut interpreter =
            Interpreter::new(assembled.program, assembled.start_index, Box::new(sink));
        assert_eq!(interpreter.interpret().unwrap(), ExitReason::RanOffEnd);
        assert_eq!(*printed.borrow(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn fibonacci_prints_first_ten_terms() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let demo = find("fibonacci_10").unwrap();
        let assembled = svim_asm::assemble(demo.source).unwrap();
        let printed = Rc::new(RefCell::new(Vec::new()));

        struct Recording(Rc<RefCell<Vec<i32>>>);
        impl ValueSink for Recording {
            fn log_value(&mut self, value: i32) {
                self.0.borrow_mut().push(value);
            }
            fn log_instruction(&mut self, _index: usize, _program: &[i32], _opcode: i32) {}
            fn log_array(&mut self, _label: &str, _data: &[i32]) {}
            fn log_program_listing(&mut self, _program: &[i32]) {}
            fn log_invalid_opcode(&mut self, _value: i32) {}
        }

        let sink = Recording(Rc::clone(&printed));
        let mut interpreter =
            Interpreter::new(assembled.program, assembled.start_index, Box::new(sink));
        interpreter.interpret().unwrap();
        assert_eq!(*printed.borrow(), vec![1, 1, 2, 3, 5, 8, 13, 21, 34, 55]);
    }
}
