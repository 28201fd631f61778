// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowpage: the editing core of an attack flow diagram builder.
//!
//! Commands flow through [`app::ApplicationStore::execute`]. Page commands run on the active
//! [`editor::PageEditor`], which keeps undo history and validation results, and every recorded
//! change is snapshotted into the [`store::PageRecoveryBank`].

pub mod app;
pub mod commands;
pub mod editor;
pub mod logging;
pub mod model;
pub mod publish;
pub mod settings;
pub mod store;
pub mod validate;
