use console::{Style, Term};
use notetree::stages::{Progress, Stage};

/// Redraws one status line on stderr per tick. Silent when stderr is not a terminal.
pub(super) struct TermProgress {
    term: Term,
    enabled: bool,
    current: Option<Stage>,
    count: usize,
    label: Style,
}

impl TermProgress {
    pub(super) fn new(enabled: bool) -> Self {
        let term = Term::stderr();
        let enabled = enabled && term.is_term();
        Self {
            term,
            enabled,
            current: None,
            count: 0,
            label: Style::new().cyan(),
        }
    }

    fn draw(&self) {
        if let Some(stage) = self.current {
            let line = format!("{} {}", self.label.apply_to(stage.label()), self.count);
            // Progress output is cosmetic; a failed redraw is ignored.
            let _ = self.term.clear_line();
            let _ = self.term.write_str(&line);
        }
    }
}

impl Progress for TermProgress {
    fn tick(&mut self, stage: Stage) {
        if !self.enabled {
            return;
        }
        if self.current != Some(stage) {
            if self.current.is_some() {
                let _ = self.term.write_line("");
            }
            self.current = Some(stage);
            self.count = 0;
        }
        self.count += 1;
        self.draw();
    }

    fn finish(&mut self) {
        if self.enabled && self.current.is_some() {
            let _ = self.term.write_line("");
        }
        self.current = None;
    }
}
