// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Page editor: one page, its undo history, selection and validation state.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::commands::{apply_page_op, CommandError, Delta, PageCommand, PageTarget};
use crate::model::{DiagramObject, Page, PageId};
use crate::validate::{
    DiagramValidator, ValidationErrorResult, ValidationReport, ValidationWarningResult,
};

mod history;

pub use history::{UndoHistory, DEFAULT_MAX_UNDO};

const DUMMY_PAGE_ID: &str = "untitled";

/// Owns a single page while it is open for editing.
///
/// `rev` increases on every observable change (content or selection); UIs compare it to decide
/// when to recompute derived values.
#[derive(Debug, Clone)]
pub struct PageEditor {
    page: Page,
    history: UndoHistory,
    validator: Option<Arc<dyn DiagramValidator>>,
    validation: ValidationReport,
    last_delta: Delta,
    rev: u64,
    recoverable: bool,
}

impl PageEditor {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            history: UndoHistory::default(),
            validator: None,
            validation: ValidationReport::default(),
            last_delta: Delta::default(),
            rev: 0,
            recoverable: true,
        }
    }

    /// A blank placeholder editor for when no page is open. It is never stored for recovery.
    pub fn dummy() -> Self {
        let page = Page::new(PageId::new_unchecked(DUMMY_PAGE_ID.to_owned()), "Untitled");
        Self {
            recoverable: false,
            ..Self::new(page)
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn DiagramValidator>) -> Self {
        self.validator = Some(validator);
        self.revalidate();
        self
    }

    /// Swaps the validator (or removes it) and revalidates the current page.
    pub fn set_validator(&mut self, validator: Option<Arc<dyn DiagramValidator>>) {
        self.validator = validator;
        self.revalidate();
        self.bump_rev();
    }

    pub fn with_history_depth(mut self, max_depth: usize) -> Self {
        self.history = UndoHistory::new(max_depth);
        self
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_id(&self) -> &PageId {
        self.page.page_id()
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn is_recoverable(&self) -> bool {
        self.recoverable
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn last_delta(&self) -> &Delta {
        &self.last_delta
    }

    /// Applies a page command.
    ///
    /// Returns `Ok(true)` iff the command changed the page *and* was recorded into the undo
    /// history. Commands aimed at the null page are ignored.
    pub fn execute(&mut self, command: PageCommand) -> Result<bool, CommandError> {
        let page_id = match command.target() {
            PageTarget::Null => return Ok(false),
            PageTarget::Page(page_id) => page_id,
        };
        if page_id != self.page.page_id() {
            return Err(CommandError::PageMismatch {
                expected: self.page.page_id().clone(),
                found: page_id.clone(),
            });
        }

        let op = command.into_op();
        let result = apply_page_op(&self.page, &op)?;
        if result.delta.is_empty() {
            trace!(page_id = %self.page.page_id(), op = op.name(), "page op changed nothing");
            return Ok(false);
        }

        let structural = result.delta.is_structural();
        let recordable = op.is_recordable();
        let before = std::mem::replace(&mut self.page, result.page);
        self.last_delta = result.delta;

        let recorded = recordable && self.history.record(op, before);
        if structural {
            self.revalidate();
        }
        self.bump_rev();

        debug!(
            page_id = %self.page.page_id(),
            rev = self.rev,
            recorded,
            undo_depth = self.history.undo_len(),
            "page op applied"
        );
        Ok(recorded)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.page) {
            return false;
        }
        self.after_history_move();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.page) {
            return false;
        }
        self.after_history_move();
        true
    }

    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }

    pub fn validation(&self) -> &ValidationReport {
        &self.validation
    }

    pub fn validation_errors(&self) -> &[ValidationErrorResult] {
        self.validation.errors()
    }

    pub fn validation_warnings(&self) -> &[ValidationWarningResult] {
        self.validation.warnings()
    }

    /// Selected objects in page order.
    pub fn selection(&self) -> Vec<&DiagramObject> {
        self.page.selection()
    }

    pub fn selection_count(&self) -> usize {
        self.page.selection_count()
    }

    fn after_history_move(&mut self) {
        // History moves swap whole snapshots; there is no per-object delta to report.
        self.last_delta = Delta {
            page_changed: true,
            ..Delta::default()
        };
        self.revalidate();
        self.bump_rev();
        debug!(
            page_id = %self.page.page_id(),
            rev = self.rev,
            undo_depth = self.history.undo_len(),
            redo_depth = self.history.redo_len(),
            "page history moved"
        );
    }

    fn revalidate(&mut self) {
        self.validation = match &self.validator {
            Some(validator) => validator.validate(&self.page),
            None => ValidationReport::default(),
        };
    }

    fn bump_rev(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }
}
