//! The immutable trace aggregate handed to front-ends.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::filter::FilterSet;
use crate::instruction::{Instruction, StackEntry};
use crate::levels::call_levels;
use crate::parser::{annotate, parse_instructions};
use crate::reader::{read_log, ReadError};

#[derive(Debug, Error)]
pub enum TraceError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("no P-code instructions recognized in the log")]
    EmptyTrace,
}

/// A fully reconstructed execution trace.
///
/// Built once from a single log read and immutable afterwards; a changed
/// source log means a wholesale rebuild, never an incremental update. The
/// three annotation arrays are index-aligned with the instruction
/// sequence, which itself preserves file order exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcodeTrace {
    instructions: Vec<Instruction>,
    markers: Vec<String>,
    procedures: Vec<String>,
    call_levels: Vec<u32>,
}

impl PcodeTrace {
    /// Read and reconstruct a trace from a log file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        Self::parse(&read_log(path)?)
    }

    /// Reconstruct a trace from already-loaded log text.
    ///
    /// Runs all passes to completion: instruction/stack reconstruction,
    /// marker attribution, call-level derivation. A log in which no line
    /// matches the instruction grammar yields [`TraceError::EmptyTrace`].
    pub fn parse(content: &str) -> Result<Self, TraceError> {
        let instructions = parse_instructions(content);
        if instructions.is_empty() {
            return Err(TraceError::EmptyTrace);
        }
        let annotations = annotate(content, instructions.len());
        let call_levels = call_levels(&instructions);

        info!(
            instructions = instructions.len(),
            real_snapshots = instructions.iter().filter(|i| !i.synthetic_stack).count(),
            "trace reconstructed"
        );

        Ok(Self {
            instructions,
            markers: annotations.markers,
            procedures: annotations.procedures,
            call_levels,
        })
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The full instruction sequence, in file order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn instruction(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Snapshot of the operand stack after the given instruction,
    /// bottom-up.
    pub fn stack_of(&self, index: usize) -> Option<&[StackEntry]> {
        self.instructions.get(index).map(|i| i.stack.as_slice())
    }

    pub fn call_level_of(&self, index: usize) -> Option<u32> {
        self.call_levels.get(index).copied()
    }

    /// Marker text attributed to the instruction, empty if none.
    pub fn marker_of(&self, index: usize) -> Option<&str> {
        self.markers.get(index).map(String::as_str)
    }

    /// Name of the procedure entered most recently before this instruction
    /// without an intervening return; empty means global/main.
    pub fn procedure_of(&self, index: usize) -> Option<&str> {
        self.procedures.get(index).map(String::as_str)
    }

    /// Ordered trace indices visible under the given filter.
    pub fn frames(&self, filter: &FilterSet) -> Vec<usize> {
        filter.frames(&self.instructions)
    }

    pub fn frame_count(&self, filter: &FilterSet) -> usize {
        self.frames(filter).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Category;
    use crate::opcodes::Opcode;

    const SMALL_LOG: &str = "\
0: JMP 0 2
[0]: 0
newAc:Foo
1: CAL 1 1
[1]: 0
[0]: 0
back 0
2: OPR 0 0
[0]: 0
";

    #[test]
    fn empty_log_is_an_error() {
        assert!(matches!(
            PcodeTrace::parse("no instructions here\n"),
            Err(TraceError::EmptyTrace)
        ));
        assert!(matches!(PcodeTrace::parse(""), Err(TraceError::EmptyTrace)));
    }

    #[test]
    fn arrays_are_index_aligned() {
        let trace = PcodeTrace::parse(SMALL_LOG).unwrap();
        assert_eq!(trace.len(), 3);
        for i in 0..trace.len() {
            assert!(trace.instruction(i).is_some());
            assert!(trace.marker_of(i).is_some());
            assert!(trace.procedure_of(i).is_some());
            assert!(trace.call_level_of(i).is_some());
        }
        assert!(trace.instruction(3).is_none());
        assert!(trace.call_level_of(3).is_none());
    }

    #[test]
    fn aggregate_reflects_all_passes() {
        let trace = PcodeTrace::parse(SMALL_LOG).unwrap();
        assert_eq!(trace.instruction(1).unwrap().opcode, Opcode::Cal);
        assert_eq!(trace.procedure_of(1), Some("Foo"));
        assert_eq!(trace.marker_of(2), Some("back 0"));
        assert_eq!(trace.call_level_of(0), Some(0));
        assert_eq!(trace.call_level_of(1), Some(1));
        assert_eq!(trace.call_level_of(2), Some(0));
        assert_eq!(trace.stack_of(1).unwrap().len(), 2);
    }

    #[test]
    fn filtering_dereferences_in_order() {
        let trace = PcodeTrace::parse(SMALL_LOG).unwrap();
        assert_eq!(trace.frames(&FilterSet::all()), vec![0, 1, 2]);
        assert_eq!(trace.frame_count(&FilterSet::none()), 0);

        let calls_only = FilterSet::none().with(Category::ProcedureCall, true);
        assert_eq!(trace.frames(&calls_only), vec![1]);
    }

    #[test]
    fn parse_is_deterministic() {
        let a = PcodeTrace::parse(SMALL_LOG).unwrap();
        let b = PcodeTrace::parse(SMALL_LOG).unwrap();
        assert_eq!(a, b);
    }
}
