//! Second pass: attribute procedure markers to instruction positions.
//!
//! Attribution is purely positional. A marker line sets a pending value;
//! the next instruction line consumes it. An instruction line immediately
//! preceded by another instruction line gets empty annotations. No
//! correlation with addresses or execution order is attempted.

use tracing::debug;

use super::{classify_line, trimmed_lines, LineKind};

/// Marker and procedure-name annotations, index-aligned with the
/// instruction sequence. Empty string means "none" (for procedures:
/// global/main scope).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotations {
    pub markers: Vec<String>,
    pub procedures: Vec<String>,
}

impl Annotations {
    fn empty(len: usize) -> Self {
        Self {
            markers: vec![String::new(); len],
            procedures: vec![String::new(); len],
        }
    }
}

/// Scan the raw text a second time and fill the annotation arrays for a
/// trace of `instruction_count` instructions.
///
/// A `newAc:<name>` line sets both the pending procedure name and the
/// pending marker (the whole line); a `back <level>` line sets the pending
/// marker and clears the procedure name, so instructions after a return
/// fall back to the enclosing scope the emitter re-announces on the next
/// entry.
pub fn annotate(content: &str, instruction_count: usize) -> Annotations {
    let mut out = Annotations::empty(instruction_count);
    let mut current_marker = String::new();
    let mut current_procedure = String::new();
    let mut instr_idx = 0usize;

    for line in trimmed_lines(content) {
        match classify_line(line) {
            LineKind::ProcedureEntry { name } => {
                current_procedure = name;
                current_marker = line.to_string();
            }
            LineKind::ProcedureReturn => {
                current_marker = line.to_string();
                current_procedure.clear();
            }
            LineKind::Instruction(_) => {
                // Bound check is defensive: both passes scan the same text,
                // so the counts agree whenever the caller passed the output
                // of `parse_instructions` on the same content.
                if instr_idx < instruction_count {
                    out.markers[instr_idx] = std::mem::take(&mut current_marker);
                    out.procedures[instr_idx] = std::mem::take(&mut current_procedure);
                    instr_idx += 1;
                }
            }
            LineKind::Stack(_) | LineKind::Other => {}
        }
    }

    debug!(
        markers = out.markers.iter().filter(|m| !m.is_empty()).count(),
        procedures = out.procedures.iter().filter(|p| !p.is_empty()).count(),
        "attributed procedure markers"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_marker_attaches_to_next_instruction() {
        let log = "newAc:Foo\n0: CAL 1 10\n";
        let ann = annotate(log, 1);
        assert_eq!(ann.procedures, vec!["Foo"]);
        assert_eq!(ann.markers, vec!["newAc:Foo"]);
    }

    #[test]
    fn pending_values_are_consumed_once() {
        // The second instruction follows the first with no intervening
        // marker, so it gets empty annotations.
        let log = "newAc:Foo\n0: CAL 1 10\n1: INT 0 3\n";
        let ann = annotate(log, 2);
        assert_eq!(ann.procedures, vec!["Foo", ""]);
        assert_eq!(ann.markers, vec!["newAc:Foo", ""]);
    }

    #[test]
    fn return_marker_clears_procedure() {
        let log = "newAc:Foo\n0: CAL 1 10\nback 0\n1: OPR 0 0\n";
        let ann = annotate(log, 2);
        assert_eq!(ann.procedures, vec!["Foo", ""]);
        assert_eq!(ann.markers, vec!["newAc:Foo", "back 0"]);
    }

    #[test]
    fn emitter_order_lands_on_callee_body() {
        // The interpreter prints the CAL line before newAc, so in real logs
        // the annotation attaches to the first instruction of the body.
        let log = "11: CAL 1 1\nnewAc:Fact\n1: INT 0 3\n";
        let ann = annotate(log, 2);
        assert_eq!(ann.procedures, vec!["", "Fact"]);
        assert_eq!(ann.markers, vec!["", "newAc:Fact"]);
    }

    #[test]
    fn intervening_stack_rows_do_not_consume_markers() {
        let log = "newAc:Foo\n[1]: 0\n[0]: 0\n0: CAL 1 10\n";
        let ann = annotate(log, 1);
        assert_eq!(ann.procedures, vec!["Foo"]);
    }

    #[test]
    fn marker_with_no_following_instruction_is_dropped() {
        let log = "0: LIT 0 5\nnewAc:Tail\n";
        let ann = annotate(log, 1);
        assert_eq!(ann.markers, vec![""]);
        assert_eq!(ann.procedures, vec![""]);
    }

    #[test]
    fn procedure_name_is_trimmed() {
        let ann = annotate("newAc:  Spaced  \n0: CAL 1 2\n", 1);
        assert_eq!(ann.procedures, vec!["Spaced"]);
    }
}
