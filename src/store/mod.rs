// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for page snapshots.
//!
//! The recovery bank keeps the latest state of every edited page behind a [`RecoveryStore`]
//! backend: in memory for tests and embedders, or a folder of versioned JSON files.

pub mod records;
pub mod recovery_bank;
pub mod recovery_folder;

pub use records::{page_from_record, page_to_record, PageRecord, RecordError, PAGE_RECORD_FORMAT};
pub use recovery_bank::{
    MemoryRecoveryStore, PageRecoveryBank, RecoveryEntry, RecoveryStore, StoreError,
};
pub use recovery_folder::{FolderRecoveryStore, WriteDurability};
