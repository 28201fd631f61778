// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core diagram data model.
//!
//! A [`Page`] is an ordered forest of [`DiagramObject`]s (blocks, groups, lines) addressed by
//! typed ids.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod object;
pub mod page;

pub use ids::{Id, IdError, ObjectId, PageId};
pub use object::{DiagramObject, LineEnd, ObjectKind, Point, PropertyValue};
pub use page::{Page, PageError};
