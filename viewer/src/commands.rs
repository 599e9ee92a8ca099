//! Command parsing and execution for the viewer REPL.

use pcode_trace::Category;

use crate::formatter;
use crate::session::Session;

/// A parsed viewer command.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Step,
    StepBack,
    Goto { frame: usize },
    Run,
    Info,
    Stack,
    List { count: usize },
    Filter { category: Category, state: Option<bool> },
    Filters,
    Reset,
    Help,
    Quit,
}

/// Result of executing a command.
pub enum Action {
    Print(String),
    Quit,
}

/// Parse user input into a command. Returns `None` for empty or
/// unrecognized input.
pub fn parse(input: &str) -> Option<Command> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut parts = trimmed.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let arg = parts.next().map(str::trim);

    match cmd {
        "s" | "step" => Some(Command::Step),
        "sb" | "step-back" => Some(Command::StepBack),
        "g" | "goto" => Some(Command::Goto {
            frame: arg?.parse().ok()?,
        }),
        "r" | "run" => Some(Command::Run),
        "i" | "info" => Some(Command::Info),
        "st" | "stack" => Some(Command::Stack),
        "l" | "list" => {
            let count = arg.and_then(|a| a.parse::<usize>().ok()).unwrap_or(5);
            Some(Command::List { count })
        }
        "f" | "filter" => parse_filter(arg?),
        "fs" | "filters" => Some(Command::Filters),
        "reset" => Some(Command::Reset),
        "h" | "help" => Some(Command::Help),
        "q" | "quit" => Some(Command::Quit),
        _ => {
            eprintln!("Unknown command: '{cmd}'. Type 'help' for available commands.");
            None
        }
    }
}

fn parse_filter(arg: &str) -> Option<Command> {
    let mut parts = arg.splitn(2, ' ');
    let category: Category = match parts.next()?.trim().parse() {
        Ok(category) => category,
        Err(_) => {
            eprintln!("Unknown category. See 'help' for the six category names.");
            return None;
        }
    };
    let state = match parts.next().map(str::trim) {
        None => None,
        Some("on") => Some(true),
        Some("off") => Some(false),
        Some(other) => {
            eprintln!("Expected 'on' or 'off', got '{other}'.");
            return None;
        }
    };
    Some(Command::Filter { category, state })
}

/// Execute a command against the session.
pub fn execute(cmd: &Command, session: &mut Session) -> Action {
    let total = session.frame_count();
    match cmd {
        Command::Step => match session.forward() {
            Some(frame) => Action::Print(formatter::format_frame(&frame, total)),
            None => Action::Print("Already at the last frame.".to_string()),
        },
        Command::StepBack => match session.backward() {
            Some(frame) => Action::Print(formatter::format_frame(&frame, total)),
            None => Action::Print("Already at the first frame.".to_string()),
        },
        Command::Goto { frame } => match session.goto(*frame) {
            Some(f) => Action::Print(formatter::format_frame(&f, total)),
            None => Action::Print(format!(
                "Frame {} out of range (0..{}).",
                frame,
                total.saturating_sub(1)
            )),
        },
        Command::Run => {
            let frames = session.remaining();
            if frames.is_empty() {
                return Action::Print("No visible frames.".to_string());
            }
            let position = session.position();
            let lines: Vec<String> = frames
                .iter()
                .map(|f| formatter::format_frame_compact(f, total, f.frame_index == position))
                .collect();
            Action::Print(lines.join("\n"))
        }
        Command::Info => Action::Print(formatter::format_info(session)),
        Command::Stack => match session.current() {
            Some(frame) => Action::Print(formatter::format_stack(&frame)),
            None => Action::Print("No visible frames.".to_string()),
        },
        Command::List { count } => {
            let start = session.position().saturating_sub(count / 2);
            let frames = session.frames_range(start, *count);
            if frames.is_empty() {
                return Action::Print("No visible frames.".to_string());
            }
            let position = session.position();
            let lines: Vec<String> = frames
                .iter()
                .map(|f| formatter::format_frame_compact(f, total, f.frame_index == position))
                .collect();
            Action::Print(lines.join("\n"))
        }
        Command::Filter { category, state } => {
            let enabled = match state {
                Some(enabled) => session.set_filter(*category, *enabled),
                None => session.toggle_filter(*category),
            };
            Action::Print(format!(
                "{category}: {} | {} frames visible",
                if enabled { "on" } else { "off" },
                session.frame_count()
            ))
        }
        Command::Filters => Action::Print(formatter::format_filters(session.filter())),
        Command::Reset => {
            session.reset();
            Action::Print(format!(
                "All categories on; {} frames visible.",
                session.frame_count()
            ))
        }
        Command::Help => Action::Print(formatter::format_help()),
        Command::Quit => Action::Quit,
    }
}

#[cfg(test)]
mod tests {
    use pcode_trace::PcodeTrace;

    use super::*;

    #[test]
    fn parse_recognizes_aliases() {
        assert_eq!(parse("s"), Some(Command::Step));
        assert_eq!(parse("step"), Some(Command::Step));
        assert_eq!(parse("sb"), Some(Command::StepBack));
        assert_eq!(parse("g 12"), Some(Command::Goto { frame: 12 }));
        assert_eq!(parse("l"), Some(Command::List { count: 5 }));
        assert_eq!(parse("list 9"), Some(Command::List { count: 9 }));
        assert_eq!(parse("q"), Some(Command::Quit));
        assert_eq!(parse(""), None);
        assert_eq!(parse("g"), None);
    }

    #[test]
    fn parse_filter_forms() {
        assert_eq!(
            parse("filter jump"),
            Some(Command::Filter {
                category: Category::Jump,
                state: None
            })
        );
        assert_eq!(
            parse("f procedure-call off"),
            Some(Command::Filter {
                category: Category::ProcedureCall,
                state: Some(false)
            })
        );
        assert_eq!(parse("filter nonsense"), None);
        assert_eq!(parse("filter jump maybe"), None);
    }

    #[test]
    fn execute_steps_through_a_session() {
        let trace = PcodeTrace::parse("0: LIT 0 5\n1: JMP 0 0\n2: OPR 0 0\n").unwrap();
        let mut session = Session::new(trace);

        match execute(&Command::Step, &mut session) {
            Action::Print(s) => assert!(s.contains("1: JMP 0 0"), "{s}"),
            Action::Quit => panic!("step must not quit"),
        }
        assert_eq!(session.position(), 1);

        match execute(
            &Command::Filter {
                category: Category::Jump,
                state: Some(false),
            },
            &mut session,
        ) {
            Action::Print(s) => assert!(s.contains("2 frames visible"), "{s}"),
            Action::Quit => panic!(),
        }
        assert_eq!(session.position(), 0);
    }
}
