// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use smol_str::SmolStr;

use super::ids::ObjectId;

/// Integer canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    Block,
    Group,
    Line {
        source: Option<ObjectId>,
        target: Option<ObjectId>,
    },
}

impl ObjectKind {
    pub fn line() -> Self {
        Self::Line {
            source: None,
            target: None,
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Self::Line { .. })
    }

    pub fn can_hold_children(&self) -> bool {
        matches!(self, Self::Group)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Group => "group",
            Self::Line { .. } => "line",
        }
    }
}

/// Which end of a line an op addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnd {
    Source,
    Target,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Null,
    Text(String),
    Integer(i64),
    Boolean(bool),
}

impl PropertyValue {
    /// True for `Null` and for text that is blank after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Integer(_) | Self::Boolean(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// A single node of a page's object tree.
///
/// Structural links (`parent`, `children`) are owned by [`super::Page`]; ops go through the page
/// so both sides stay consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramObject {
    object_id: ObjectId,
    template: SmolStr,
    kind: ObjectKind,
    position: Point,
    properties: BTreeMap<SmolStr, PropertyValue>,
    pub(super) parent: Option<ObjectId>,
    pub(super) children: Vec<ObjectId>,
    pub(super) selected: bool,
}

impl DiagramObject {
    pub fn new(object_id: ObjectId, template: impl Into<SmolStr>, kind: ObjectKind) -> Self {
        Self {
            object_id,
            template: template.into(),
            kind,
            position: Point::default(),
            properties: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
            selected: false,
        }
    }

    pub fn block(object_id: ObjectId, template: impl Into<SmolStr>) -> Self {
        Self::new(object_id, template, ObjectKind::Block)
    }

    pub fn group(object_id: ObjectId, template: impl Into<SmolStr>) -> Self {
        Self::new(object_id, template, ObjectKind::Group)
    }

    pub fn line(
        object_id: ObjectId,
        template: impl Into<SmolStr>,
        source: Option<ObjectId>,
        target: Option<ObjectId>,
    ) -> Self {
        Self::new(object_id, template, ObjectKind::Line { source, target })
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn with_property(mut self, key: impl Into<SmolStr>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Sets the parent link of a detached object, used when building forests for insertion.
    pub fn with_parent(mut self, parent: Option<ObjectId>) -> Self {
        self.parent = parent;
        self
    }

    pub fn object_id(&self) -> &ObjectId {
        &self.object_id
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ObjectKind {
        &mut self.kind
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn properties(&self) -> &BTreeMap<SmolStr, PropertyValue> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Returns the previous value.
    pub fn set_property(
        &mut self,
        key: impl Into<SmolStr>,
        value: PropertyValue,
    ) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value)
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_object_id(&mut self, object_id: ObjectId) {
        self.object_id = object_id;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn line_endpoints(&self) -> Option<(Option<&ObjectId>, Option<&ObjectId>)> {
        match &self.kind {
            ObjectKind::Line { source, target } => Some((source.as_ref(), target.as_ref())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DiagramObject, ObjectKind, Point, PropertyValue};
    use crate::model::ObjectId;

    #[test]
    fn blank_property_values() {
        assert!(PropertyValue::Null.is_blank());
        assert!(PropertyValue::from("  ").is_blank());
        assert!(!PropertyValue::from("T1059").is_blank());
        assert!(!PropertyValue::Integer(0).is_blank());
    }

    #[test]
    fn builder_sets_position_and_properties() {
        let object = DiagramObject::block(ObjectId::new("b1").expect("id"), "action")
            .with_position(Point::new(10, -4))
            .with_property("name", "Phishing");

        assert_eq!(object.position(), Point::new(10, -4));
        assert_eq!(object.property("name"), Some(&PropertyValue::from("Phishing")));
        assert_eq!(object.kind(), &ObjectKind::Block);
        assert!(!object.is_selected());
    }

    #[test]
    fn translate_saturates() {
        let point = Point::new(i64::MAX, 0).translated(1, -1);
        assert_eq!(point, Point::new(i64::MAX, -1));
    }
}
