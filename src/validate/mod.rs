// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram well-formedness checks.
//!
//! A [`DiagramValidator`] inspects a whole page and reports errors (the page is invalid) and
//! warnings (the page is valid but probably unfinished). Editors without a validator treat every
//! page as valid.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::model::{DiagramObject, ObjectId, ObjectKind, Page};
use crate::settings::ValidationSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrorResult {
    pub object_id: Option<ObjectId>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarningResult {
    pub object_id: Option<ObjectId>,
    pub reason: String,
}

impl fmt::Display for ValidationErrorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.object_id {
            Some(object_id) => write!(f, "error: {object_id}: {}", self.reason),
            None => write!(f, "error: {}", self.reason),
        }
    }
}

impl fmt::Display for ValidationWarningResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.object_id {
            Some(object_id) => write!(f, "warning: {object_id}: {}", self.reason),
            None => write!(f, "warning: {}", self.reason),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<ValidationErrorResult>,
    warnings: Vec<ValidationWarningResult>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationErrorResult] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ValidationWarningResult] {
        &self.warnings
    }

    pub fn error(&mut self, object_id: Option<&ObjectId>, reason: impl Into<String>) {
        self.errors.push(ValidationErrorResult {
            object_id: object_id.cloned(),
            reason: reason.into(),
        });
    }

    pub fn warning(&mut self, object_id: Option<&ObjectId>, reason: impl Into<String>) {
        self.warnings.push(ValidationWarningResult {
            object_id: object_id.cloned(),
            reason: reason.into(),
        });
    }
}

pub trait DiagramValidator: fmt::Debug + Send + Sync {
    fn validate(&self, page: &Page) -> ValidationReport;
}

/// Built-in structural checks.
///
/// Errors: dangling or missing line endpoints, lines attached to lines, required template
/// properties that are missing or blank. Warnings: blocks no line touches, empty groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuralValidator {
    required_properties: BTreeMap<String, Vec<String>>,
}

impl StructuralValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &ValidationSettings) -> Self {
        Self {
            required_properties: settings.required_properties.clone(),
        }
    }

    pub fn require(mut self, template: impl Into<String>, key: impl Into<String>) -> Self {
        self.required_properties
            .entry(template.into())
            .or_default()
            .push(key.into());
        self
    }

    fn check_line(
        &self,
        page: &Page,
        line: &DiagramObject,
        source: Option<&ObjectId>,
        target: Option<&ObjectId>,
        report: &mut ValidationReport,
    ) {
        let line_id = line.object_id();
        for (end, slot) in [("source", source), ("target", target)] {
            match slot.map(|id| (id, page.object(id))) {
                None => report.error(Some(line_id), format!("line has no {end}")),
                Some((id, None)) => {
                    report.error(Some(line_id), format!("line {end} references missing object {id}"))
                }
                Some((_, Some(endpoint))) if endpoint.kind().is_line() => {
                    report.error(Some(line_id), format!("line {end} is attached to another line"))
                }
                Some(_) => {}
            }
        }
    }

    fn check_required(&self, object: &DiagramObject, report: &mut ValidationReport) {
        let Some(keys) = self.required_properties.get(object.template()) else {
            return;
        };
        for key in keys {
            let missing = object.property(key).map_or(true, |value| value.is_blank());
            if missing {
                report.error(
                    Some(object.object_id()),
                    format!("required property '{key}' is missing"),
                );
            }
        }
    }
}

impl DiagramValidator for StructuralValidator {
    fn validate(&self, page: &Page) -> ValidationReport {
        let mut report = ValidationReport::default();

        let connected: BTreeSet<&ObjectId> = page
            .objects()
            .values()
            .filter_map(DiagramObject::line_endpoints)
            .flat_map(|(source, target)| [source, target])
            .flatten()
            .collect();

        for object in page.subtree(|_| true) {
            self.check_required(object, &mut report);
            match object.kind() {
                ObjectKind::Line { source, target } => {
                    self.check_line(page, object, source.as_ref(), target.as_ref(), &mut report)
                }
                ObjectKind::Block => {
                    if !connected.contains(object.object_id()) {
                        report.warning(Some(object.object_id()), "block is not connected");
                    }
                }
                ObjectKind::Group => {
                    if object.children().is_empty() {
                        report.warning(Some(object.object_id()), "group is empty");
                    }
                }
            }
        }

        report
    }
}
