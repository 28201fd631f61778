// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{debug, trace};

use super::records::RecordError;
use crate::editor::PageEditor;
use crate::model::{Page, PageId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("json error at {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid recovery file {path:?}: {source}")]
    Record { path: PathBuf, source: RecordError },
    #[error("refusing to write through symlink at {path:?}")]
    SymlinkRefused { path: PathBuf },
}

/// One recovered page snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryEntry {
    page: Page,
    saved_at_ms: u64,
}

impl RecoveryEntry {
    pub fn new(page: Page, saved_at_ms: u64) -> Self {
        Self { page, saved_at_ms }
    }

    /// Snapshots `page` with the current wall-clock time.
    pub fn capture(page: &Page) -> Self {
        Self::new(page.clone(), now_ms())
    }

    pub fn page_id(&self) -> &PageId {
        self.page.page_id()
    }

    pub fn name(&self) -> &str {
        self.page.name()
    }

    pub fn saved_at_ms(&self) -> u64 {
        self.saved_at_ms
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn into_page(self) -> Page {
        self.page
    }
}

fn now_ms() -> u64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

/// Storage backend for recovery snapshots, keyed by page id. At most one entry per page.
pub trait RecoveryStore: fmt::Debug + Send {
    fn put(&mut self, entry: RecoveryEntry) -> Result<(), StoreError>;
    fn get(&self, page_id: &PageId) -> Result<Option<RecoveryEntry>, StoreError>;
    /// All entries, in no particular order.
    fn list(&self) -> Result<Vec<RecoveryEntry>, StoreError>;
    fn remove(&mut self, page_id: &PageId) -> Result<Option<RecoveryEntry>, StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryRecoveryStore {
    entries: BTreeMap<PageId, RecoveryEntry>,
}

impl MemoryRecoveryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecoveryStore for MemoryRecoveryStore {
    fn put(&mut self, entry: RecoveryEntry) -> Result<(), StoreError> {
        self.entries.insert(entry.page_id().clone(), entry);
        Ok(())
    }

    fn get(&self, page_id: &PageId) -> Result<Option<RecoveryEntry>, StoreError> {
        Ok(self.entries.get(page_id).cloned())
    }

    fn list(&self) -> Result<Vec<RecoveryEntry>, StoreError> {
        Ok(self.entries.values().cloned().collect())
    }

    fn remove(&mut self, page_id: &PageId) -> Result<Option<RecoveryEntry>, StoreError> {
        Ok(self.entries.remove(page_id))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}

/// Keeps the latest snapshot of every edited page so unsaved work survives a restart.
#[derive(Debug)]
pub struct PageRecoveryBank {
    store: Box<dyn RecoveryStore>,
    writes: u64,
}

impl Default for PageRecoveryBank {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl PageRecoveryBank {
    pub fn new(store: Box<dyn RecoveryStore>) -> Self {
        Self { store, writes: 0 }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryRecoveryStore::new()))
    }

    /// Number of snapshots successfully stored through this bank.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Stores the editor's current page, replacing any earlier snapshot of the same page.
    ///
    /// Returns `Ok(false)` for editors that are not recoverable (the placeholder editor).
    pub fn store_editor(&mut self, editor: &PageEditor) -> Result<bool, StoreError> {
        if !editor.is_recoverable() {
            trace!(page_id = %editor.page_id(), "editor is not recoverable; skipping snapshot");
            return Ok(false);
        }

        let entry = RecoveryEntry::capture(editor.page());
        let saved_at_ms = entry.saved_at_ms();
        self.store.put(entry)?;
        self.writes = self.writes.saturating_add(1);

        debug!(
            page_id = %editor.page_id(),
            rev = editor.rev(),
            saved_at_ms,
            "stored recovery snapshot"
        );
        Ok(true)
    }

    pub fn entry(&self, page_id: &PageId) -> Result<Option<RecoveryEntry>, StoreError> {
        self.store.get(page_id)
    }

    /// All snapshots, most recently saved first.
    pub fn entries(&self) -> Result<Vec<RecoveryEntry>, StoreError> {
        let mut entries = self.store.list()?;
        entries.sort_by(|a, b| {
            b.saved_at_ms()
                .cmp(&a.saved_at_ms())
                .then_with(|| a.page_id().cmp(b.page_id()))
        });
        Ok(entries)
    }

    /// Removes and returns the snapshot of `page_id`, typically once the user restored it.
    pub fn withdraw(&mut self, page_id: &PageId) -> Result<Option<RecoveryEntry>, StoreError> {
        let entry = self.store.remove(page_id)?;
        if entry.is_some() {
            debug!(page_id = %page_id, "withdrew recovery snapshot");
        }
        Ok(entry)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.clear()?;
        debug!("cleared recovery bank");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryRecoveryStore, PageRecoveryBank, RecoveryEntry, RecoveryStore};
    use crate::commands::{PageCommand, PageOp};
    use crate::editor::PageEditor;
    use crate::model::{fixtures, Page, PageId};

    fn page(id: &str) -> Page {
        Page::new(PageId::new(id).expect("page id"), id)
    }

    #[test]
    fn store_editor_replaces_previous_snapshot() {
        let mut bank = PageRecoveryBank::in_memory();
        let mut editor = PageEditor::new(fixtures::small_flow());

        assert!(bank.store_editor(&editor).expect("store"));
        let first = editor.page().clone();

        let rename = PageCommand::new(
            editor.page_id().clone(),
            PageOp::RenamePage {
                name: "Renamed flow".to_owned(),
            },
        );
        assert!(editor.execute(rename).expect("rename"));
        assert!(bank.store_editor(&editor).expect("store"));

        assert_eq!(bank.write_count(), 2);
        assert_eq!(bank.entries().expect("entries").len(), 1);
        let entry = bank
            .entry(editor.page_id())
            .expect("entry")
            .expect("present");
        assert_ne!(entry.page(), &first);
        assert_eq!(entry.page(), editor.page());
        assert_eq!(entry.name(), "Renamed flow");
    }

    #[test]
    fn dummy_editor_is_never_stored() {
        let mut bank = PageRecoveryBank::in_memory();

        assert!(!bank.store_editor(&PageEditor::dummy()).expect("store"));
        assert_eq!(bank.write_count(), 0);
        assert!(bank.entries().expect("entries").is_empty());
    }

    #[test]
    fn entries_are_most_recent_first() {
        let mut store = MemoryRecoveryStore::new();
        store.put(RecoveryEntry::new(page("p:old"), 10)).expect("put");
        store.put(RecoveryEntry::new(page("p:new"), 30)).expect("put");
        store.put(RecoveryEntry::new(page("p:mid"), 20)).expect("put");
        let bank = PageRecoveryBank::new(Box::new(store));

        let ids = bank
            .entries()
            .expect("entries")
            .iter()
            .map(|entry| entry.page_id().as_str().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["p:new", "p:mid", "p:old"]);
    }

    #[test]
    fn withdraw_and_clear() {
        let mut bank = PageRecoveryBank::in_memory();
        let editor = PageEditor::new(fixtures::small_flow());
        bank.store_editor(&editor).expect("store");
        bank.store_editor(&PageEditor::new(fixtures::grouped_page()))
            .expect("store");

        let withdrawn = bank.withdraw(editor.page_id()).expect("withdraw");
        assert_eq!(withdrawn.map(RecoveryEntry::into_page), Some(editor.page().clone()));
        assert!(bank.withdraw(editor.page_id()).expect("withdraw").is_none());

        bank.clear().expect("clear");
        assert!(bank.entries().expect("entries").is_empty());
    }
}
