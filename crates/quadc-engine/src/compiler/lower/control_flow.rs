//! Control Flow Lowering Utilities
//!
//! Label allocation and the label sets used by `if` and loop lowering.

use crate::compiler::ir::Label;

/// Source of fresh labels, owned by one lowering run
#[derive(Debug, Default)]
pub struct LabelMaker {
    next: u32,
}

impl LabelMaker {
    /// Create a label maker starting at `__L0__`
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new label
    pub fn fresh(&mut self) -> Label {
        let label = Label(self.next);
        self.next += 1;
        label
    }

    /// Number of labels allocated so far
    pub fn count(&self) -> u32 {
        self.next
    }
}

/// Labels for an `if` statement
#[derive(Debug, Clone, Copy)]
pub struct IfLabels {
    pub then_label: Label,
    /// Only allocated when there is an else branch
    pub else_label: Option<Label>,
    pub end_label: Label,
}

impl IfLabels {
    pub fn new(labels: &mut LabelMaker, has_else: bool) -> Self {
        let then_label = labels.fresh();
        let else_label = has_else.then(|| labels.fresh());
        let end_label = labels.fresh();
        Self {
            then_label,
            else_label,
            end_label,
        }
    }

    /// Where the guard goes when false
    pub fn false_target(&self) -> Label {
        self.else_label.unwrap_or(self.end_label)
    }
}

/// Labels for a loop in jump-to-condition shape:
///
/// ```text
///     goto eval
/// top:
///     <body>
/// eval:
///     <guard: true -> top, false -> end>
/// end:
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LoopLabels {
    pub top: Label,
    pub eval: Label,
    pub end: Label,
}

impl LoopLabels {
    pub fn new(labels: &mut LabelMaker) -> Self {
        Self {
            top: labels.fresh(),
            eval: labels.fresh(),
            end: labels.fresh(),
        }
    }
}
