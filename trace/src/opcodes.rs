use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A P-code operation mnemonic as printed by the interpreter.
///
/// The known set is the classic PL/0 repertoire. Anything else that still
/// fits the instruction-line grammar is preserved verbatim in [`Opcode::Other`]
/// rather than rejected: the categorizer treats unrecognized mnemonics as
/// plain "other" instructions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Push a literal constant.
    Lit,
    /// Push a variable or parameter value.
    Lod,
    /// Store the stack top into a variable or parameter.
    Sto,
    /// Call a procedure.
    Cal,
    /// Allocate activation-record space.
    Int,
    /// Unconditional jump.
    Jmp,
    /// Conditional jump.
    Jpc,
    /// Operator dispatch; `OPR 0 0` is the return convention.
    Opr,
    /// Read a value onto the stack.
    Red,
    /// Write the stack top.
    Wrt,
    /// Unrecognized mnemonic, kept as printed.
    Other(String),
}

impl Opcode {
    /// The mnemonic exactly as it appears in the log.
    pub fn mnemonic(&self) -> &str {
        match self {
            Opcode::Lit => "LIT",
            Opcode::Lod => "LOD",
            Opcode::Sto => "STO",
            Opcode::Cal => "CAL",
            Opcode::Int => "INT",
            Opcode::Jmp => "JMP",
            Opcode::Jpc => "JPC",
            Opcode::Opr => "OPR",
            Opcode::Red => "RED",
            Opcode::Wrt => "WRT",
            Opcode::Other(s) => s,
        }
    }
}

impl FromStr for Opcode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "LIT" => Opcode::Lit,
            "LOD" => Opcode::Lod,
            "STO" => Opcode::Sto,
            "CAL" => Opcode::Cal,
            "INT" => Opcode::Int,
            "JMP" => Opcode::Jmp,
            "JPC" => Opcode::Jpc,
            "OPR" => Opcode::Opr,
            "RED" => Opcode::Red,
            "WRT" => Opcode::Wrt,
            _ => Opcode::Other(s.to_string()),
        })
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
