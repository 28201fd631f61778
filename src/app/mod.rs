// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Application state and the command dispatcher.
//!
//! [`ApplicationStore`] owns everything above a single page: settings, the clipboard, the
//! optional publisher, the active page editor and the recovery bank. All mutation goes through
//! [`ApplicationStore::execute`].

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::commands::{Command, CommandError, PageCommand, PageOp};
use crate::editor::PageEditor;
use crate::model::{DiagramObject, ObjectId, ObjectKind, Page};
use crate::publish::{publisher_for, PublishError, Publisher};
use crate::settings::{AppSettings, RecoverySettings};
use crate::store::{FolderRecoveryStore, PageRecoveryBank, WriteDurability};
use crate::validate::{
    DiagramValidator, StructuralValidator, ValidationErrorResult, ValidationWarningResult,
};

#[derive(Debug)]
pub struct ApplicationStore {
    settings: AppSettings,
    clipboard: Vec<DiagramObject>,
    publisher: Option<Box<dyn Publisher>>,
    active_page: PageEditor,
    recovery_bank: PageRecoveryBank,
}

impl ApplicationStore {
    /// Creates the store with the placeholder editor active.
    ///
    /// The recovery backend follows the settings: a folder store when a recovery directory is
    /// configured, an in-memory bank otherwise.
    pub fn new(settings: AppSettings) -> Self {
        let recovery_bank = recovery_bank_for(&settings.recovery);
        Self::with_recovery_bank(settings, recovery_bank)
    }

    pub fn with_recovery_bank(settings: AppSettings, recovery_bank: PageRecoveryBank) -> Self {
        Self {
            publisher: publisher_for(settings.publisher),
            settings,
            clipboard: Vec::new(),
            active_page: PageEditor::dummy(),
            recovery_bank,
        }
    }

    /// Dispatches a command.
    ///
    /// Page commands aimed at the null page are dropped. Other page commands run on the active
    /// editor, and a snapshot goes to the recovery bank iff the editor recorded the command into
    /// its undo history. Application commands run directly.
    pub fn execute(&mut self, command: impl Into<Command>) -> Result<(), CommandError> {
        match command.into() {
            Command::Page(command) => self.execute_page_command(command),
            Command::App(command) => {
                debug!(command = command.name(), "executing application command");
                command.execute(self);
                Ok(())
            }
        }
    }

    fn execute_page_command(&mut self, command: PageCommand) -> Result<(), CommandError> {
        if command.is_null() {
            trace!(op = command.op().name(), "ignoring command for the null page");
            return Ok(());
        }

        let op = command.op().name();
        if self.active_page.execute(command)? {
            debug!(page_id = %self.active_page.page_id(), op, "command recorded");
            self.store_recovery_snapshot();
        }
        Ok(())
    }

    fn store_recovery_snapshot(&mut self) {
        if !self.settings.recovery.enabled {
            return;
        }
        if let Err(err) = self.recovery_bank.store_editor(&self.active_page) {
            warn!(
                page_id = %self.active_page.page_id(),
                error = %err,
                "failed to store recovery snapshot"
            );
        }
    }

    /// Undoes the last recorded command of the active page.
    pub fn undo(&mut self) -> bool {
        let moved = self.active_page.undo();
        if moved {
            self.store_recovery_snapshot();
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.active_page.redo();
        if moved {
            self.store_recovery_snapshot();
        }
        moved
    }

    /// Builds an editor for `page` configured from the current settings.
    pub fn new_editor(&self, page: Page) -> PageEditor {
        let editor =
            PageEditor::new(page).with_history_depth(self.settings.edit.history.max_undo_depth);
        match self.validator() {
            Some(validator) => editor.with_validator(validator),
            None => editor,
        }
    }

    fn validator(&self) -> Option<Arc<dyn DiagramValidator>> {
        if !self.settings.validation.enabled {
            return None;
        }
        Some(Arc::new(StructuralValidator::from_settings(
            &self.settings.validation,
        )))
    }

    /// A command that pastes the clipboard into the active page with fresh ids, offset by the
    /// configured paste offset, and selects the pasted objects.
    ///
    /// With an empty clipboard the command targets the null page.
    pub fn paste_command(&self) -> PageCommand {
        if self.clipboard.is_empty() {
            return PageCommand::null(PageOp::AddObjects {
                parent: None,
                objects: Vec::new(),
                select: true,
            });
        }

        let mut page = self.active_page.page().clone();
        let offset = self.settings.edit.clipboard.paste_offset;

        let mut renamed = BTreeMap::<ObjectId, ObjectId>::new();
        for object in &self.clipboard {
            let fresh = page.fresh_object_id(object.template());
            renamed.insert(object.object_id().clone(), fresh);
        }

        let objects = self
            .clipboard
            .iter()
            .filter_map(|object| {
                let fresh = renamed.get(object.object_id())?.clone();
                let mut copy = object.clone();
                copy.set_object_id(fresh);
                copy.set_position(object.position().translated(offset.x, offset.y));
                if let ObjectKind::Line { source, target } = copy.kind_mut() {
                    // Endpoints outside the copied set are detached.
                    *source = source.as_ref().and_then(|id| renamed.get(id).cloned());
                    *target = target.as_ref().and_then(|id| renamed.get(id).cloned());
                }
                let parent = object.parent().and_then(|id| renamed.get(id).cloned());
                Some(copy.with_parent(parent))
            })
            .collect();

        PageCommand::new(
            page.page_id().clone(),
            PageOp::AddObjects {
                parent: None,
                objects,
                select: true,
            },
        )
    }

    /// Publishes the active page. `Ok(None)` when no publisher is configured.
    pub fn publish_active_page(&self) -> Result<Option<String>, PublishError> {
        let Some(publisher) = &self.publisher else {
            return Ok(None);
        };
        let output = publisher.publish(self.active_page.page())?;
        debug!(
            page_id = %self.active_page.page_id(),
            publisher = publisher.name(),
            bytes = output.len(),
            "published page"
        );
        Ok(Some(output))
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn clipboard(&self) -> &[DiagramObject] {
        &self.clipboard
    }

    pub fn has_clipboard_contents(&self) -> bool {
        !self.clipboard.is_empty()
    }

    pub fn publisher(&self) -> Option<&dyn Publisher> {
        self.publisher.as_deref()
    }

    pub fn active_page(&self) -> &PageEditor {
        &self.active_page
    }

    pub fn recovery_bank(&self) -> &PageRecoveryBank {
        &self.recovery_bank
    }

    pub fn recovery_bank_mut(&mut self) -> &mut PageRecoveryBank {
        &mut self.recovery_bank
    }

    pub fn has_selection(&self) -> bool {
        self.active_page.selection_count() > 0
    }

    pub fn selection_count(&self) -> usize {
        self.active_page.selection_count()
    }

    /// Selected objects of the active page, in page order.
    pub fn selection(&self) -> Vec<&DiagramObject> {
        self.active_page.selection()
    }

    pub fn can_undo(&self) -> bool {
        self.active_page.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.active_page.can_redo()
    }

    /// True when the active page passes validation, or when validation is disabled.
    pub fn is_valid(&self) -> bool {
        self.active_page.is_valid()
    }

    pub fn validation_errors(&self) -> &[ValidationErrorResult] {
        self.active_page.validation_errors()
    }

    pub fn validation_warnings(&self) -> &[ValidationWarningResult] {
        self.active_page.validation_warnings()
    }

    pub(crate) fn replace_active_page(&mut self, editor: PageEditor) {
        self.active_page = editor;
    }

    pub(crate) fn replace_clipboard(&mut self, objects: Vec<DiagramObject>) {
        self.clipboard = objects;
    }

    /// Swaps in new settings. A changed recovery directory or durability rebuilds the recovery
    /// bank; snapshots already in the old backend stay there.
    pub(crate) fn replace_settings(&mut self, settings: AppSettings) {
        let backend_changed = settings.recovery.directory != self.settings.recovery.directory
            || settings.recovery.durable_writes != self.settings.recovery.durable_writes;
        self.settings = settings;
        if backend_changed {
            self.recovery_bank = recovery_bank_for(&self.settings.recovery);
            debug!(
                directory = ?self.settings.recovery.directory,
                durable = self.settings.recovery.durable_writes,
                "recovery backend replaced"
            );
        }
        self.publisher = publisher_for(self.settings.publisher);
        let validator = self.validator();
        self.active_page.set_validator(validator);
        debug!(
            publisher = ?self.settings.publisher,
            validation = self.settings.validation.enabled,
            "settings updated"
        );
    }
}

fn recovery_bank_for(settings: &RecoverySettings) -> PageRecoveryBank {
    let Some(directory) = &settings.directory else {
        return PageRecoveryBank::in_memory();
    };
    let durability = if settings.durable_writes {
        WriteDurability::Durable
    } else {
        WriteDurability::BestEffort
    };
    PageRecoveryBank::new(Box::new(
        FolderRecoveryStore::new(directory).with_durability(durability),
    ))
}
