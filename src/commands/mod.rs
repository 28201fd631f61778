// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Commands submitted to the application store.
//!
//! A [`Command`] is either page-scoped ([`PageCommand`], eligible for undo history) or
//! application-scoped ([`AppCommand`]). Page ops are applied to a copy of the page, so a failing
//! op never leaves a half-mutated page behind, and produce a minimal [`Delta`] that the UI can use
//! to refresh derived state.

use std::collections::BTreeSet;

use smol_str::SmolStr;
use thiserror::Error;

use crate::model::{
    DiagramObject, LineEnd, ObjectId, ObjectKind, Page, PageError, PageId, PropertyValue,
};

mod app;

pub use app::AppCommand;

#[derive(Debug)]
pub enum Command {
    App(AppCommand),
    Page(PageCommand),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::App(command) => command.name(),
            Self::Page(command) => command.op().name(),
        }
    }
}

impl From<AppCommand> for Command {
    fn from(command: AppCommand) -> Self {
        Self::App(command)
    }
}

impl From<PageCommand> for Command {
    fn from(command: PageCommand) -> Self {
        Self::Page(command)
    }
}

/// The page a [`PageCommand`] addresses.
///
/// `Null` is the "no page" sentinel: commands aimed at it are dropped by the dispatcher without
/// any side effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageTarget {
    Null,
    Page(PageId),
}

impl PageTarget {
    pub fn page_id(&self) -> Option<&PageId> {
        match self {
            Self::Null => None,
            Self::Page(page_id) => Some(page_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCommand {
    target: PageTarget,
    op: PageOp,
}

impl PageCommand {
    pub fn new(page_id: PageId, op: PageOp) -> Self {
        Self {
            target: PageTarget::Page(page_id),
            op,
        }
    }

    /// A command aimed at the null page. Dispatching it is a no-op.
    pub fn null(op: PageOp) -> Self {
        Self {
            target: PageTarget::Null,
            op,
        }
    }

    pub fn target(&self) -> &PageTarget {
        &self.target
    }

    pub fn is_null(&self) -> bool {
        self.target == PageTarget::Null
    }

    pub fn op(&self) -> &PageOp {
        &self.op
    }

    pub fn into_op(self) -> PageOp {
        self.op
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Replace,
    Add,
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOp {
    /// Inserts a forest of childless objects in pre-order.
    ///
    /// An object whose `parent` names another object of the same batch is attached to it; every
    /// other object is attached under `parent` (or the page root).
    AddObjects {
        parent: Option<ObjectId>,
        objects: Vec<DiagramObject>,
        select: bool,
    },
    RemoveObjects {
        object_ids: Vec<ObjectId>,
    },
    MoveObjects {
        object_ids: Vec<ObjectId>,
        dx: i64,
        dy: i64,
    },
    SetProperty {
        object_id: ObjectId,
        key: SmolStr,
        value: PropertyValue,
    },
    ConnectLine {
        line_id: ObjectId,
        end: LineEnd,
        object_id: Option<ObjectId>,
    },
    RenamePage {
        name: String,
    },
    SelectObjects {
        object_ids: Vec<ObjectId>,
        mode: SelectionMode,
    },
    SelectAll,
    ClearSelection,
}

impl PageOp {
    /// Whether a change made by this op belongs in the page's undo history.
    ///
    /// Selection is view state: it changes the page but is never recorded.
    pub fn is_recordable(&self) -> bool {
        !matches!(
            self,
            Self::SelectObjects { .. } | Self::SelectAll | Self::ClearSelection
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AddObjects { .. } => "add_objects",
            Self::RemoveObjects { .. } => "remove_objects",
            Self::MoveObjects { .. } => "move_objects",
            Self::SetProperty { .. } => "set_property",
            Self::ConnectLine { .. } => "connect_line",
            Self::RenamePage { .. } => "rename_page",
            Self::SelectObjects { .. } => "select_objects",
            Self::SelectAll => "select_all",
            Self::ClearSelection => "clear_selection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("command targets page {found} but the active page is {expected}")]
    PageMismatch { expected: PageId, found: PageId },
    #[error(transparent)]
    Page(#[from] PageError),
    #[error("object {object_id} is not a line")]
    NotALine { object_id: ObjectId },
    #[error("line {line_id} cannot connect to {object_id}")]
    InvalidEndpoint { line_id: ObjectId, object_id: ObjectId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub page: Page,
    pub delta: Delta,
}

/// What an op changed: affected object ids (sorted) plus selection and page-level flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ObjectId>,
    pub removed: Vec<ObjectId>,
    pub updated: Vec<ObjectId>,
    pub selection_changed: bool,
    pub page_changed: bool,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.updated.is_empty()
            && !self.selection_changed
            && !self.page_changed
    }

    /// True if the page content changed, ignoring selection.
    pub fn is_structural(&self) -> bool {
        !self.added.is_empty()
            || !self.removed.is_empty()
            || !self.updated.is_empty()
            || self.page_changed
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<ObjectId>,
    removed: BTreeSet<ObjectId>,
    updated: BTreeSet<ObjectId>,
    selection_changed: bool,
    page_changed: bool,
}

impl DeltaBuilder {
    fn record_added(&mut self, object_id: ObjectId) {
        self.removed.remove(&object_id);
        self.updated.remove(&object_id);
        self.added.insert(object_id);
    }

    fn record_removed(&mut self, object_id: ObjectId) {
        self.added.remove(&object_id);
        self.updated.remove(&object_id);
        self.removed.insert(object_id);
    }

    fn record_updated(&mut self, object_id: ObjectId) {
        if self.added.contains(&object_id) || self.removed.contains(&object_id) {
            return;
        }
        self.updated.insert(object_id);
    }

    fn record_selection(&mut self) {
        self.selection_changed = true;
    }

    fn record_page(&mut self) {
        self.page_changed = true;
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
            selection_changed: self.selection_changed,
            page_changed: self.page_changed,
        }
    }
}

/// Applies `op` to a copy of `page`.
///
/// The returned page is only meaningful when the delta is non-empty; an empty delta means the op
/// was valid but changed nothing.
pub fn apply_page_op(page: &Page, op: &PageOp) -> Result<ApplyResult, CommandError> {
    let mut next = page.clone();
    let mut delta = DeltaBuilder::default();

    match op {
        PageOp::AddObjects {
            parent,
            objects,
            select,
        } => add_objects(&mut next, parent.as_ref(), objects, *select, &mut delta)?,
        PageOp::RemoveObjects { object_ids } => remove_objects(&mut next, object_ids, &mut delta)?,
        PageOp::MoveObjects { object_ids, dx, dy } => {
            move_objects(&mut next, object_ids, *dx, *dy, &mut delta)?
        }
        PageOp::SetProperty {
            object_id,
            key,
            value,
        } => set_property(&mut next, object_id, key, value, &mut delta)?,
        PageOp::ConnectLine {
            line_id,
            end,
            object_id,
        } => connect_line(&mut next, line_id, *end, object_id.as_ref(), &mut delta)?,
        PageOp::RenamePage { name } => {
            if next.name() != name {
                next.set_name(name.clone());
                delta.record_page();
            }
        }
        PageOp::SelectObjects { object_ids, mode } => {
            select_objects(&mut next, object_ids, *mode, &mut delta)?
        }
        PageOp::SelectAll => {
            for object in next.objects_mut() {
                if !object.is_selected() {
                    object.set_selected(true);
                    delta.record_selection();
                }
            }
        }
        PageOp::ClearSelection => {
            for object in next.objects_mut() {
                if object.is_selected() {
                    object.set_selected(false);
                    delta.record_selection();
                }
            }
        }
    }

    Ok(ApplyResult {
        page: next,
        delta: delta.finish(),
    })
}

// Extracted op-application implementation for object/line/selection mutations.
include!("page_ops.rs");
