// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Page publishers: turn the active page into a shareable document.

use std::fmt;

use thiserror::Error;

use crate::model::Page;
use crate::settings::PublisherKind;
use crate::store::page_to_record;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("cannot serialize page {page_id}: {source}")]
    Serialize {
        page_id: String,
        source: serde_json::Error,
    },
}

pub trait Publisher: fmt::Debug + Send {
    fn name(&self) -> &'static str;
    fn publish(&self, page: &Page) -> Result<String, PublishError>;
}

/// Emits the page as a pretty-printed JSON document in the recovery record format.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPublisher;

impl Publisher for JsonPublisher {
    fn name(&self) -> &'static str {
        "json"
    }

    fn publish(&self, page: &Page) -> Result<String, PublishError> {
        serde_json::to_string_pretty(&page_to_record(page)).map_err(|source| {
            PublishError::Serialize {
                page_id: page.page_id().to_string(),
                source,
            }
        })
    }
}

pub fn publisher_for(kind: PublisherKind) -> Option<Box<dyn Publisher>> {
    match kind {
        PublisherKind::None => None,
        PublisherKind::Json => Some(Box::new(JsonPublisher)),
    }
}
