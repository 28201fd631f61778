// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Serialized page format shared by recovery files and the JSON publisher.
//!
//! Records are plain serde structs kept apart from the model types, so the on-disk shape can
//! evolve (and be versioned) without touching the editing model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ObjectIdTag, PageIdTag};
use crate::model::{DiagramObject, Id, IdError, ObjectKind, Page, PageError, Point, PropertyValue};

pub const PAGE_RECORD_FORMAT: u32 = 1;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(
        "unsupported page record format {format} (expected {expected})",
        expected = PAGE_RECORD_FORMAT
    )]
    UnsupportedFormat { format: u32 },
    #[error("invalid id '{value}': {source}")]
    InvalidId { value: String, source: IdError },
    #[error("inconsistent page structure: {source}")]
    Structure { source: PageError },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub format: u32,
    pub page_id: String,
    pub name: String,
    #[serde(default)]
    pub id_seq: u64,
    /// Objects in pre-order, so parents always precede their children.
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: String,
    pub template: String,
    #[serde(flatten)]
    pub kind: KindRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyRecord>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum KindRecord {
    Block,
    Group,
    Line {
        #[serde(default)]
        source: Option<String>,
        #[serde(default)]
        target: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyRecord {
    Boolean(bool),
    Integer(i64),
    Text(String),
    Null(()),
}

impl From<&PropertyValue> for PropertyRecord {
    fn from(value: &PropertyValue) -> Self {
        match value {
            PropertyValue::Null => Self::Null(()),
            PropertyValue::Text(text) => Self::Text(text.clone()),
            PropertyValue::Integer(value) => Self::Integer(*value),
            PropertyValue::Boolean(value) => Self::Boolean(*value),
        }
    }
}

impl From<PropertyRecord> for PropertyValue {
    fn from(record: PropertyRecord) -> Self {
        match record {
            PropertyRecord::Null(()) => Self::Null,
            PropertyRecord::Text(text) => Self::Text(text),
            PropertyRecord::Integer(value) => Self::Integer(value),
            PropertyRecord::Boolean(value) => Self::Boolean(value),
        }
    }
}

pub fn page_to_record(page: &Page) -> PageRecord {
    let objects = page
        .subtree(|_| true)
        .into_iter()
        .map(object_to_record)
        .collect();

    PageRecord {
        format: PAGE_RECORD_FORMAT,
        page_id: page.page_id().as_str().to_owned(),
        name: page.name().to_owned(),
        id_seq: page.id_seq(),
        objects,
    }
}

fn object_to_record(object: &DiagramObject) -> ObjectRecord {
    let kind = match object.kind() {
        ObjectKind::Block => KindRecord::Block,
        ObjectKind::Group => KindRecord::Group,
        ObjectKind::Line { source, target } => KindRecord::Line {
            source: source.as_ref().map(|id| id.as_str().to_owned()),
            target: target.as_ref().map(|id| id.as_str().to_owned()),
        },
    };

    ObjectRecord {
        id: object.object_id().as_str().to_owned(),
        template: object.template().to_owned(),
        kind,
        parent: object.parent().map(|id| id.as_str().to_owned()),
        x: object.position().x,
        y: object.position().y,
        properties: object
            .properties()
            .iter()
            .map(|(key, value)| (key.to_string(), PropertyRecord::from(value)))
            .collect(),
        selected: object.is_selected(),
    }
}

pub fn page_from_record(record: PageRecord) -> Result<Page, RecordError> {
    if record.format != PAGE_RECORD_FORMAT {
        return Err(RecordError::UnsupportedFormat {
            format: record.format,
        });
    }

    let mut page = Page::new(parse_id::<PageIdTag>(record.page_id)?, record.name);

    for object in record.objects {
        let object_id = parse_id::<ObjectIdTag>(object.id)?;
        let parent = object.parent.map(parse_id::<ObjectIdTag>).transpose()?;
        let kind = match object.kind {
            KindRecord::Block => ObjectKind::Block,
            KindRecord::Group => ObjectKind::Group,
            KindRecord::Line { source, target } => ObjectKind::Line {
                source: source.map(parse_id::<ObjectIdTag>).transpose()?,
                target: target.map(parse_id::<ObjectIdTag>).transpose()?,
            },
        };

        let mut model = DiagramObject::new(object_id.clone(), object.template, kind)
            .with_position(Point::new(object.x, object.y));
        for (key, value) in object.properties {
            model.set_property(key, value.into());
        }

        page.insert(model, parent.as_ref())
            .map_err(|source| RecordError::Structure { source })?;
        if object.selected {
            if let Some(inserted) = page.object_mut(&object_id) {
                inserted.set_selected(true);
            }
        }
    }

    page.set_id_seq(record.id_seq);
    Ok(page)
}

fn parse_id<T>(value: String) -> Result<Id<T>, RecordError> {
    Id::new(value.clone()).map_err(|source| RecordError::InvalidId { value, source })
}
