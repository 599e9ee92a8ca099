use std::fmt;

use smallvec::SmallVec;

use crate::opcodes::Opcode;

/// One `(slot, value)` pair of a reconstructed operand-stack snapshot.
///
/// Slot 0 is the stack bottom. Values are kept as printed; the emitter
/// writes both bare numbers (`5`) and named cells (`x:3`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    pub slot: i64,
    pub value: String,
}

impl StackEntry {
    pub fn new(slot: i64, value: impl Into<String>) -> Self {
        Self {
            slot,
            value: value.into(),
        }
    }
}

impl fmt::Display for StackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.slot, self.value)
    }
}

/// Full operand-stack snapshot after an instruction, sorted ascending by
/// slot. Snapshots are small in practice, so they live inline.
pub type StackSnapshot = SmallVec<[StackEntry; 8]>;

/// One executed virtual-machine step as reconstructed from the log.
///
/// The trace position (`index` in the aggregate) is the instruction's
/// position in file order, which need not equal `pc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Program counter as printed.
    pub pc: i64,
    pub opcode: Opcode,
    /// Level-difference operand.
    pub l: i64,
    /// Displacement operand.
    pub a: i64,
    /// Snapshot of the operand stack after this instruction executed.
    pub stack: StackSnapshot,
    /// True when the log carried no stack rows for this instruction and the
    /// snapshot is the single-entry placeholder rather than real state.
    pub synthetic_stack: bool,
}

impl Instruction {
    pub fn new(pc: i64, opcode: Opcode, l: i64, a: i64) -> Self {
        Self {
            pc,
            opcode,
            l,
            a,
            stack: StackSnapshot::new(),
            synthetic_stack: false,
        }
    }

    /// Substitute the lossy single-entry fallback for a missing snapshot.
    pub(crate) fn fill_placeholder_stack(&mut self) {
        debug_assert!(self.stack.is_empty());
        let value = format!("{}_default", self.opcode);
        self.stack.push(StackEntry::new(0, value));
        self.synthetic_stack = true;
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {} {}", self.pc, self.opcode, self.l, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_log_form() {
        let instr = Instruction::new(7, Opcode::Cal, 1, -3);
        assert_eq!(instr.to_string(), "7: CAL 1 -3");
    }

    #[test]
    fn placeholder_stack_is_flagged() {
        let mut instr = Instruction::new(0, Opcode::Opr, 0, 2);
        instr.fill_placeholder_stack();
        assert!(instr.synthetic_stack);
        assert_eq!(instr.stack.len(), 1);
        assert_eq!(instr.stack[0], StackEntry::new(0, "OPR_default"));
    }
}
