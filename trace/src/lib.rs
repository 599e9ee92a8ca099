//! Reconstruction of PL/0 P-code execution traces from interpreter logs.
//!
//! The interpreter writes a textual log while running: one line per
//! executed instruction, interleaved with operand-stack rows and
//! procedure entry/return markers. This crate turns that text back into an
//! ordered, immutable [`PcodeTrace`] — instructions with stack snapshots,
//! per-instruction call levels and procedure annotations — and provides
//! the category [`FilterSet`] used to select a visible subsequence of
//! frames. Front-ends consume the trace by index; nothing here executes
//! P-code or validates that the trace is a sensible program run.

mod filter;
mod instruction;
mod levels;
mod opcodes;
mod parser;
mod reader;
mod trace;
mod util;

pub use filter::{Category, FilterSet};
pub use instruction::{Instruction, StackEntry, StackSnapshot};
pub use levels::call_levels;
pub use opcodes::Opcode;
pub use parser::{annotate, parse_instructions, Annotations};
pub use reader::{read_log, ReadError};
pub use trace::{PcodeTrace, TraceError};
pub use util::{init_logger, init_logger_with};
