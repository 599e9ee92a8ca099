//! Viewing session: a cursor over the filtered frame list.

use pcode_trace::{Category, FilterSet, Instruction, PcodeTrace};

/// One visible frame, assembled from the trace's index-aligned arrays.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Position within the filtered list.
    pub frame_index: usize,
    /// Position within the full trace.
    pub trace_index: usize,
    pub instruction: &'a Instruction,
    pub call_level: u32,
    pub marker: &'a str,
    pub procedure: &'a str,
}

/// Step-through state over an immutable trace.
///
/// Holds the trace, the category flags, the filtered frame list derived
/// from them, and a cursor into that list. Toggling a flag recomputes the
/// list synchronously (a cheap full pass) and rewinds the cursor.
pub struct Session {
    trace: PcodeTrace,
    filter: FilterSet,
    frames: Vec<usize>,
    cursor: usize,
}

impl Session {
    pub fn new(trace: PcodeTrace) -> Self {
        let filter = FilterSet::all();
        let frames = trace.frames(&filter);
        Self {
            trace,
            filter,
            frames,
            cursor: 0,
        }
    }

    pub fn trace(&self) -> &PcodeTrace {
        &self.trace
    }

    pub fn filter(&self) -> &FilterSet {
        &self.filter
    }

    /// Number of frames visible under the current filter.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Current cursor position (0-based frame index).
    pub fn position(&self) -> usize {
        self.cursor
    }

    fn frame_at(&self, frame_index: usize) -> Option<Frame<'_>> {
        let trace_index = *self.frames.get(frame_index)?;
        Some(Frame {
            frame_index,
            trace_index,
            instruction: self.trace.instruction(trace_index)?,
            call_level: self.trace.call_level_of(trace_index)?,
            marker: self.trace.marker_of(trace_index)?,
            procedure: self.trace.procedure_of(trace_index)?,
        })
    }

    /// The frame under the cursor, if any frame is visible at all.
    pub fn current(&self) -> Option<Frame<'_>> {
        self.frame_at(self.cursor)
    }

    /// Move the cursor forward one frame, returning the new current frame.
    ///
    /// Returns `None` when already at the last visible frame.
    pub fn forward(&mut self) -> Option<Frame<'_>> {
        let next = self.cursor.checked_add(1)?;
        if next >= self.frames.len() {
            return None;
        }
        self.cursor = next;
        self.frame_at(self.cursor)
    }

    /// Move the cursor back one frame, returning the new current frame.
    pub fn backward(&mut self) -> Option<Frame<'_>> {
        let prev = self.cursor.checked_sub(1)?;
        self.cursor = prev;
        self.frame_at(self.cursor)
    }

    /// Jump to an arbitrary frame index.
    pub fn goto(&mut self, frame_index: usize) -> Option<Frame<'_>> {
        if frame_index >= self.frames.len() {
            return None;
        }
        self.cursor = frame_index;
        self.frame_at(self.cursor)
    }

    /// Frames from `start`, at most `count` of them.
    pub fn frames_range(&self, start: usize, count: usize) -> Vec<Frame<'_>> {
        (start..self.frames.len().min(start.saturating_add(count)))
            .filter_map(|i| self.frame_at(i))
            .collect()
    }

    /// All frames from the cursor to the end, inclusive.
    pub fn remaining(&self) -> Vec<Frame<'_>> {
        self.frames_range(self.cursor, self.frames.len())
    }

    /// Set one category flag and recompute the visible list. The cursor
    /// rewinds to the first frame, mirroring the original viewer's restart
    /// on filter change. Returns the new flag value.
    pub fn set_filter(&mut self, category: Category, enabled: bool) -> bool {
        self.filter.set(category, enabled);
        self.refilter();
        enabled
    }

    pub fn toggle_filter(&mut self, category: Category) -> bool {
        let enabled = self.filter.toggle(category);
        self.refilter();
        enabled
    }

    /// Restore the default view: every category on, cursor at the start.
    pub fn reset(&mut self) {
        self.filter = FilterSet::all();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.frames = self.trace.frames(&self.filter);
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
0: LIT 0 5
[0]: 5
1: CAL 1 1
newAc:Foo
2: INT 0 3
back 0
3: OPR 0 0
4: JMP 0 0
";

    fn session() -> Session {
        Session::new(PcodeTrace::parse(LOG).unwrap())
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut s = session();
        assert_eq!(s.frame_count(), 5);
        assert!(s.backward().is_none());
        assert_eq!(s.position(), 0);

        assert_eq!(s.forward().unwrap().frame_index, 1);
        assert_eq!(s.goto(4).unwrap().trace_index, 4);
        assert!(s.forward().is_none());
        assert_eq!(s.position(), 4);
        assert!(s.goto(5).is_none());
    }

    #[test]
    fn filtered_frames_dereference_to_trace_indices() {
        let mut s = session();
        s.set_filter(Category::LiteralPush, false);
        s.set_filter(Category::Jump, false);
        s.set_filter(Category::Other, false);
        // Remaining: CAL at trace index 1, OPR 0 at trace index 3.
        assert_eq!(s.frame_count(), 2);
        let current = s.current().unwrap();
        assert_eq!(current.frame_index, 0);
        assert_eq!(current.trace_index, 1);
        assert_eq!(s.forward().unwrap().trace_index, 3);
    }

    #[test]
    fn filter_change_rewinds_cursor() {
        let mut s = session();
        s.goto(3).unwrap();
        s.toggle_filter(Category::Jump);
        assert_eq!(s.position(), 0);
        assert_eq!(s.frame_count(), 4);
    }

    #[test]
    fn reset_restores_everything() {
        let mut s = session();
        s.set_filter(Category::Other, false);
        s.goto(1).unwrap();
        s.reset();
        assert_eq!(s.frame_count(), 5);
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn frame_carries_annotations() {
        let s = session();
        // Trace index 2 is the INT annotated by newAc:Foo.
        let frame = s.frames_range(2, 1)[0];
        assert_eq!(frame.trace_index, 2);
        assert_eq!(frame.procedure, "Foo");
        assert_eq!(frame.marker, "newAc:Foo");
        assert_eq!(frame.call_level, 1);
    }

    #[test]
    fn all_filters_off_leaves_no_current_frame() {
        let mut s = session();
        for category in [
            Category::ProcedureCall,
            Category::ProcedureReturn,
            Category::Jump,
            Category::StackAccess,
            Category::LiteralPush,
            Category::Other,
        ] {
            s.set_filter(category, false);
        }
        assert_eq!(s.frame_count(), 0);
        assert!(s.current().is_none());
    }
}
