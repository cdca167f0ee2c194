//! Fixed sizes shared by the assembler and the interpreter.
//!
//! These are fixed limits, not tuning knobs: the assembler rejects
//! out-of-range local/global indices at parse time using exactly these
//! bounds, and the interpreter's frame and global storage are sized to them.

/// Number of local value slots in every call frame.
pub const MAX_LOCALS: usize = 10;

/// Number of slots in the global value store.
pub const MAX_GLOBALS: usize = 100;

/// Initial operand stack capacity reservation (the stack itself is unbounded).
pub const INITIAL_STACK_CAPACITY: usize = 100;
