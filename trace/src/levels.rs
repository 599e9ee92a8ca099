//! Call-nesting depth derived from the instruction sequence alone.

use crate::instruction::Instruction;
use crate::opcodes::Opcode;

/// Compute the per-instruction call level.
///
/// A single pass with a running counter: `CAL` enters a procedure, `OPR`
/// with `A == 0` is the return convention and leaves one. The recorded
/// value is the post-update depth, so the `CAL` itself already sits at the
/// callee's level. Depth never goes below zero; the textual markers play no
/// part here.
pub fn call_levels(instructions: &[Instruction]) -> Vec<u32> {
    let mut level: u32 = 0;
    instructions
        .iter()
        .map(|instr| {
            match instr.opcode {
                Opcode::Cal => level += 1,
                Opcode::Opr if instr.a == 0 => level = level.saturating_sub(1),
                _ => {}
            }
            level
        })
        .collect()
}
