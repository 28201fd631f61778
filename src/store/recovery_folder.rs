// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::records::{page_from_record, page_to_record, PageRecord};
use super::recovery_bank::{RecoveryEntry, RecoveryStore, StoreError};
use crate::model::PageId;

const RECOVERY_FILE_SUFFIX: &str = ".recovery.json";
const TEMP_FILE_PREFIX: &str = ".flowpage.tmp.";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Writes a temp file and renames it into place, without fsync.
    #[default]
    BestEffort,

    /// Additionally flushes file contents and the rename to stable storage where the platform
    /// allows it.
    Durable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecoveryFileJson {
    saved_at_ms: u64,
    page: PageRecord,
}

/// Recovery snapshots stored as one JSON file per page inside a folder.
#[derive(Debug, Clone)]
pub struct FolderRecoveryStore {
    root: PathBuf,
    durability: WriteDurability,
}

impl FolderRecoveryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, page_id: &PageId) -> PathBuf {
        let stem = encode_persisted_id_segment(page_id.as_str());
        self.root.join(format!("{stem}{RECOVERY_FILE_SUFFIX}"))
    }

    /// Paths of all recovery files currently in the folder, sorted by file name.
    pub fn entry_paths(&self) -> Result<Vec<PathBuf>, StoreError> {
        let read_dir = match fs::read_dir(&self.root) {
            Ok(read_dir) => read_dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.root.clone(),
                    source,
                })
            }
        };

        let mut paths = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry.map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
            let file_name = dir_entry.file_name();
            let file_name = file_name.to_string_lossy();
            if file_name.starts_with(TEMP_FILE_PREFIX) || !file_name.ends_with(RECOVERY_FILE_SUFFIX)
            {
                continue;
            }
            paths.push(dir_entry.path());
        }
        paths.sort();
        Ok(paths)
    }

    fn read_entry(&self, path: &Path) -> Result<Option<RecoveryEntry>, StoreError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let file: RecoveryFileJson =
            serde_json::from_str(&text).map_err(|source| StoreError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        let page = page_from_record(file.page).map_err(|source| StoreError::Record {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(RecoveryEntry::new(page, file.saved_at_ms)))
    }
}

impl RecoveryStore for FolderRecoveryStore {
    fn put(&mut self, entry: RecoveryEntry) -> Result<(), StoreError> {
        let path = self.entry_path(entry.page_id());
        let file = RecoveryFileJson {
            saved_at_ms: entry.saved_at_ms(),
            page: page_to_record(entry.page()),
        };
        let mut contents = serde_json::to_vec_pretty(&file).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        contents.push(b'\n');
        write_atomic(&self.root, &path, &contents, self.durability)
    }

    fn get(&self, page_id: &PageId) -> Result<Option<RecoveryEntry>, StoreError> {
        self.read_entry(&self.entry_path(page_id))
    }

    /// Unreadable files are skipped with a warning so one corrupt snapshot does not hide the rest.
    fn list(&self) -> Result<Vec<RecoveryEntry>, StoreError> {
        let mut entries = Vec::new();
        for path in self.entry_paths()? {
            match self.read_entry(&path) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {}
                Err(err) => warn!(path = %path.display(), error = %err, "skipping recovery file"),
            }
        }
        Ok(entries)
    }

    fn remove(&mut self, page_id: &PageId) -> Result<Option<RecoveryEntry>, StoreError> {
        let path = self.entry_path(page_id);
        let entry = self.read_entry(&path)?;
        remove_file_if_exists(&path)?;
        Ok(entry)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        for path in self.entry_paths()? {
            remove_file_if_exists(&path)?;
        }
        Ok(())
    }
}

include!("recovery_folder/helpers.rs");
