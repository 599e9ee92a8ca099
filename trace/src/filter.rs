//! Deterministic selection of visible trace frames by opcode category.

use strum::EnumCount;
use strum_macros::{Display, EnumCount, EnumIter, EnumString};

use crate::instruction::Instruction;
use crate::opcodes::Opcode;

/// The six display categories instructions partition into.
///
/// Categories are mutually exclusive by opcode (plus the `A` operand for
/// the `OPR 0` return convention). An unrecognized opcode is deliberately
/// `Other`: the partition is open-world.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Category {
    /// `CAL`
    ProcedureCall,
    /// `OPR` with `A == 0`
    ProcedureReturn,
    /// `JMP`, `JPC`
    Jump,
    /// `LOD`, `STO`
    StackAccess,
    /// `LIT`
    LiteralPush,
    /// Everything else, including `OPR` with `A != 0`
    Other,
}

impl Category {
    /// Classify one instruction. First match wins.
    pub fn of(instr: &Instruction) -> Self {
        match &instr.opcode {
            Opcode::Cal => Category::ProcedureCall,
            Opcode::Opr if instr.a == 0 => Category::ProcedureReturn,
            Opcode::Jmp | Opcode::Jpc => Category::Jump,
            Opcode::Lod | Opcode::Sto => Category::StackAccess,
            Opcode::Lit => Category::LiteralPush,
            _ => Category::Other,
        }
    }
}

/// Per-category visibility flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSet {
    enabled: [bool; Category::COUNT],
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FilterSet {
    /// Every category visible.
    pub fn all() -> Self {
        Self {
            enabled: [true; Category::COUNT],
        }
    }

    /// No category visible.
    pub fn none() -> Self {
        Self {
            enabled: [false; Category::COUNT],
        }
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        self.enabled[category as usize]
    }

    pub fn set(&mut self, category: Category, enabled: bool) {
        self.enabled[category as usize] = enabled;
    }

    pub fn toggle(&mut self, category: Category) -> bool {
        let flag = &mut self.enabled[category as usize];
        *flag = !*flag;
        *flag
    }

    /// Builder-style variant of [`FilterSet::set`].
    pub fn with(mut self, category: Category, enabled: bool) -> Self {
        self.set(category, enabled);
        self
    }

    /// Ordered indices of the instructions this filter keeps visible.
    ///
    /// All flags on yields exactly `0..instructions.len()`; all off yields
    /// the empty sequence. A cheap full recomputation, run synchronously
    /// whenever a flag changes.
    pub fn frames(&self, instructions: &[Instruction]) -> Vec<usize> {
        instructions
            .iter()
            .enumerate()
            .filter(|(_, instr)| self.is_enabled(Category::of(instr)))
            .map(|(i, _)| i)
            .collect()
    }
}
