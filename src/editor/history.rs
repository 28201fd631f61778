// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;
use std::mem;

use crate::commands::PageOp;
use crate::model::Page;

pub const DEFAULT_MAX_UNDO: usize = 256;

/// A recorded op plus the page state on the other side of it.
///
/// On the undo stack `snapshot` is the page *before* the op; on the redo stack it is the page
/// *after* it.
#[derive(Debug, Clone)]
struct HistoryEntry {
    op: PageOp,
    snapshot: Page,
}

/// Bounded snapshot-based undo/redo stacks for one page.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    undo: VecDeque<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    max_depth: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO)
    }
}

impl UndoHistory {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Names of the undoable ops, oldest first.
    pub fn undo_op_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.undo.iter().map(|entry| entry.op.name())
    }

    /// Records `op` with the page state it replaced. Clears the redo stack.
    ///
    /// Returns false if history is disabled (`max_depth == 0`).
    pub fn record(&mut self, op: PageOp, before: Page) -> bool {
        if self.max_depth == 0 {
            return false;
        }
        self.redo.clear();
        self.undo.push_back(HistoryEntry {
            op,
            snapshot: before,
        });
        while self.undo.len() > self.max_depth {
            self.undo.pop_front();
        }
        true
    }

    /// Restores the page state before the last recorded op.
    ///
    /// Selection is view state and is carried over from the current page for objects that still
    /// exist after the swap.
    pub fn undo(&mut self, page: &mut Page) -> bool {
        let Some(entry) = self.undo.pop_back() else {
            return false;
        };
        let after = mem::replace(page, entry.snapshot);
        page.carry_selection_from(&after);
        self.redo.push(HistoryEntry {
            op: entry.op,
            snapshot: after,
        });
        true
    }

    pub fn redo(&mut self, page: &mut Page) -> bool {
        let Some(entry) = self.redo.pop() else {
            return false;
        };
        let before = mem::replace(page, entry.snapshot);
        page.carry_selection_from(&before);
        self.undo.push_back(HistoryEntry {
            op: entry.op,
            snapshot: before,
        });
        true
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::UndoHistory;
    use crate::commands::PageOp;
    use crate::model::{fixtures, ObjectId};

    fn rename(name: &str) -> PageOp {
        PageOp::RenamePage {
            name: name.to_owned(),
        }
    }

    #[test]
    fn record_trims_oldest_entries() {
        let mut history = UndoHistory::new(2);
        let page = fixtures::small_flow();

        assert!(history.record(rename("a"), page.clone()));
        assert!(history.record(rename("b"), page.clone()));
        assert!(history.record(rename("c"), page));

        assert_eq!(history.undo_len(), 2);
        assert_eq!(
            history.undo_op_names().collect::<Vec<_>>(),
            vec!["rename_page", "rename_page"]
        );
    }

    #[test]
    fn zero_depth_disables_recording() {
        let mut history = UndoHistory::new(0);
        assert!(!history.record(rename("a"), fixtures::small_flow()));
        assert!(!history.can_undo());
    }

    #[test]
    fn undo_then_redo_swaps_snapshots() {
        let mut history = UndoHistory::default();
        let before = fixtures::small_flow();
        let mut page = before.clone();
        page.set_name("Renamed");
        let after = page.clone();

        history.record(rename("Renamed"), before.clone());

        assert!(history.undo(&mut page));
        assert_eq!(page, before);
        assert!(history.can_redo());

        assert!(history.redo(&mut page));
        assert_eq!(page, after);
        assert!(!history.can_redo());
        assert!(!history.redo(&mut page));
    }

    #[test]
    fn undo_keeps_current_selection() {
        let mut history = UndoHistory::default();
        let before = fixtures::small_flow();
        let mut page = before.clone();
        page.set_name("Renamed");
        page.object_mut(&ObjectId::new("b:recon").expect("id"))
            .expect("b:recon")
            .set_selected(true);

        history.record(rename("Renamed"), before);
        history.undo(&mut page);

        assert_eq!(page.name(), "Small flow");
        assert_eq!(page.selection_count(), 1);
    }

    #[test]
    fn recording_clears_redo() {
        let mut history = UndoHistory::default();
        let mut page = fixtures::small_flow();

        history.record(rename("x"), page.clone());
        history.undo(&mut page);
        assert!(history.can_redo());

        history.record(rename("y"), page.clone());
        assert!(!history.can_redo());
    }
}
