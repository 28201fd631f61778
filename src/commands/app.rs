// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::debug;

use crate::app::ApplicationStore;
use crate::editor::PageEditor;
use crate::settings::AppSettings;

/// Commands that act on application state rather than on a page.
///
/// They never touch a page's undo history or the recovery bank.
#[derive(Debug)]
pub enum AppCommand {
    /// Replaces the active page editor.
    LoadPage(Box<PageEditor>),
    /// Copies the selected objects (with their descendants) of the active page to the clipboard.
    /// An empty selection leaves the clipboard as it is.
    CopySelection,
    ClearClipboard,
    UpdateSettings(Box<AppSettings>),
}

impl AppCommand {
    pub fn load_page(editor: PageEditor) -> Self {
        Self::LoadPage(Box::new(editor))
    }

    pub fn update_settings(settings: AppSettings) -> Self {
        Self::UpdateSettings(Box::new(settings))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadPage(_) => "load_page",
            Self::CopySelection => "copy_selection",
            Self::ClearClipboard => "clear_clipboard",
            Self::UpdateSettings(_) => "update_settings",
        }
    }

    pub fn execute(self, store: &mut ApplicationStore) {
        match self {
            Self::LoadPage(editor) => {
                debug!(page_id = %editor.page_id(), "loading page");
                store.replace_active_page(*editor);
            }
            Self::CopySelection => {
                let page = store.active_page().page();
                let selected = page
                    .selection()
                    .into_iter()
                    .map(|object| object.object_id().clone())
                    .collect::<Vec<_>>();
                if selected.is_empty() {
                    return;
                }
                let copied = page.clone_forest(&selected);
                debug!(objects = copied.len(), "copied selection to clipboard");
                store.replace_clipboard(copied);
            }
            Self::ClearClipboard => store.replace_clipboard(Vec::new()),
            Self::UpdateSettings(settings) => store.replace_settings(*settings),
        }
    }
}
