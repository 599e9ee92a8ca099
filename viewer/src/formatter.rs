//! Display formatting for viewer output.

use pcode_trace::{Category, FilterSet};
use strum::IntoEnumIterator;

use crate::session::{Frame, Session};

/// Format a frame for detailed display (after step/goto).
pub fn format_frame(frame: &Frame<'_>, total: usize) -> String {
    let instr = frame.instruction;
    let procedure = if frame.procedure.is_empty() {
        "main"
    } else {
        frame.procedure
    };
    let rendered = instr.to_string();
    let category = format!("({})", Category::of(instr));
    let mut out = format!(
        "[{}/{}] #{:<4} {rendered:<16} {category:<16} level={} proc={}",
        frame.frame_index, total, frame.trace_index, frame.call_level, procedure,
    );
    if !frame.marker.is_empty() {
        out.push_str(&format!("  marker: {}", frame.marker));
    }
    out
}

/// Format a frame compactly (for list/run views).
pub fn format_frame_compact(frame: &Frame<'_>, total: usize, is_cursor: bool) -> String {
    let cursor = if is_cursor { ">" } else { " " };
    let rendered = frame.instruction.to_string();
    format!(
        "{cursor} [{}/{}] #{:<4} {rendered:<16} level={}",
        frame.frame_index, total, frame.trace_index, frame.call_level,
    )
}

/// Render the operand-stack snapshot bottom-to-top.
pub fn format_stack(frame: &Frame<'_>) -> String {
    let instr = frame.instruction;
    let mut lines = if instr.synthetic_stack {
        vec!["Stack (no rows in the log; placeholder):".to_string()]
    } else {
        vec![format!("Stack ({} slots, bottom to top):", instr.stack.len())]
    };
    for entry in &instr.stack {
        lines.push(format!("  {entry}"));
    }
    lines.join("\n")
}

/// Summarize the parse result and cursor position.
pub fn format_info(session: &Session) -> String {
    let trace = session.trace();
    let markers = (0..trace.len())
        .filter(|i| trace.marker_of(*i).is_some_and(|m| !m.is_empty()))
        .count();
    let procedures = (0..trace.len())
        .filter(|i| trace.procedure_of(*i).is_some_and(|p| !p.is_empty()))
        .count();
    let real_snapshots = trace
        .instructions()
        .iter()
        .filter(|i| !i.synthetic_stack)
        .count();
    format!(
        "Trace: {} instructions | {} markers | {} procedure entries | {} real snapshots\n\
         Visible: {} frames | position {}",
        trace.len(),
        markers,
        procedures,
        real_snapshots,
        session.frame_count(),
        session.position(),
    )
}

/// One line per category with its flag state.
pub fn format_filters(filter: &FilterSet) -> String {
    let mut lines = vec!["Categories:".to_string()];
    for category in Category::iter() {
        let state = if filter.is_enabled(category) {
            "on"
        } else {
            "off"
        };
        lines.push(format!("  {category:<17} {state}"));
    }
    lines.join("\n")
}

/// Static help text.
pub fn format_help() -> String {
    "\
Commands:
  s, step             Step forward one frame
  sb, step-back       Step backward one frame
  g, goto <frame>     Jump to frame number
  r, run              Print all frames from the cursor to the end
  i, info             Show trace summary
  st, stack           Show the current operand stack
  l, list [n]         List n frames around the cursor (default: 5)
  f, filter <cat> [on|off]
                      Toggle or set a category (procedure-call,
                      procedure-return, jump, stack-access, literal-push,
                      other)
  fs, filters         Show category flags
  reset               All categories on, cursor to start
  h, help             Show this help
  q, quit             Exit the viewer"
        .to_string()
}

#[cfg(test)]
mod tests {
    use pcode_trace::{Instruction, Opcode};

    use super::*;

    fn frame(instr: &Instruction) -> Frame<'_> {
        Frame {
            frame_index: 3,
            trace_index: 6,
            instruction: instr,
            call_level: 1,
            marker: "",
            procedure: "Fact",
        }
    }

    #[test]
    fn frame_line_pads_instruction_and_category() {
        let instr = Instruction::new(6, Opcode::Cal, 0, 8);
        let line = format_frame(&frame(&instr), 10);
        assert_eq!(
            line,
            "[3/10] #6    6: CAL 0 8       (procedure-call) level=1 proc=Fact"
        );
    }

    #[test]
    fn frame_line_appends_marker_when_present() {
        let instr = Instruction::new(8, Opcode::Int, 0, 4);
        let mut fr = frame(&instr);
        fr.marker = "newAc:Fact";
        let line = format_frame(&fr, 10);
        assert!(line.ends_with("  marker: newAc:Fact"));
    }

    #[test]
    fn compact_line_marks_the_cursor() {
        let instr = Instruction::new(0, Opcode::Jmp, 0, 8);
        let fr = frame(&instr);
        let at_cursor = format_frame_compact(&fr, 10, true);
        let elsewhere = format_frame_compact(&fr, 10, false);
        assert!(at_cursor.starts_with("> [3/10] #6"));
        assert!(elsewhere.starts_with("  [3/10] #6"));
    }
}
