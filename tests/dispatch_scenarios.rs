// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use flowpage::app::ApplicationStore;
use flowpage::commands::{AppCommand, PageCommand, PageOp, SelectionMode};
use flowpage::model::{DiagramObject, ObjectId, Page, PageId, Point, PropertyValue};
use flowpage::settings::{AppSettings, SettingsError};

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let mut path = env::temp_dir();
        path.push(format!("flowpage-it-{prefix}-{}-{nanos}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn oid(value: &str) -> ObjectId {
    ObjectId::new(value).unwrap()
}

fn campaign_page() -> Page {
    let mut page = Page::new(PageId::new("p:campaign").unwrap(), "Campaign");
    page.insert(
        DiagramObject::block(oid("b:initial"), "action").with_property("name", "Initial access"),
        None,
    )
    .unwrap();
    page.insert(
        DiagramObject::block(oid("b:exec"), "action")
            .with_position(Point::new(200, 0))
            .with_property("name", "Execution"),
        None,
    )
    .unwrap();
    page.insert(
        DiagramObject::line(oid("l:1"), "flow", Some(oid("b:initial")), Some(oid("b:exec"))),
        None,
    )
    .unwrap();
    page
}

fn settings_for(dir: &Path) -> AppSettings {
    let text = format!(
        r#"{{
  "edit": {{ "history": {{ "max_undo_depth": 8 }} }},
  "validation": {{ "required_properties": {{ "action": ["name"] }} }},
  "recovery": {{ "directory": {} }}
}}"#,
        serde_json::to_string(&dir.join("recovery")).unwrap()
    );
    AppSettings::parse(&text).unwrap()
}

fn open_campaign(settings: AppSettings) -> ApplicationStore {
    let mut store = ApplicationStore::new(settings);
    let editor = store.new_editor(campaign_page());
    store.execute(AppCommand::load_page(editor)).unwrap();
    store
}

#[test]
fn recorded_edits_survive_a_restart() {
    let tmp = TempDir::new("restart");
    let settings = settings_for(tmp.path());

    let edited = {
        let mut store = open_campaign(settings.clone());
        let page_id = store.active_page().page_id().clone();

        store
            .execute(PageCommand::new(
                page_id.clone(),
                PageOp::SetProperty {
                    object_id: oid("b:exec"),
                    key: "technique_id".into(),
                    value: PropertyValue::from("T1204"),
                },
            ))
            .unwrap();
        // Selection is not recorded, so the snapshot on disk stays unselected.
        store
            .execute(PageCommand::new(
                page_id,
                PageOp::SelectObjects {
                    object_ids: vec![oid("b:exec")],
                    mode: SelectionMode::Replace,
                },
            ))
            .unwrap();

        assert_eq!(store.recovery_bank().write_count(), 1);
        store.active_page().page().clone()
    };

    let mut restarted = ApplicationStore::new(settings);
    let entries = restarted.recovery_bank().entries().unwrap();
    assert_eq!(entries.len(), 1);

    let entry = entries.into_iter().next().unwrap();
    assert_eq!(entry.page_id().as_str(), "p:campaign");
    let recovered = entry.into_page();
    assert_eq!(
        recovered
            .object(&oid("b:exec"))
            .and_then(|o| o.property("technique_id")),
        Some(&PropertyValue::from("T1204"))
    );
    assert_eq!(recovered.selection_count(), 0);
    assert_eq!(recovered.len(), edited.len());

    let editor = restarted.new_editor(recovered);
    restarted.execute(AppCommand::load_page(editor)).unwrap();
    assert!(restarted.is_valid());
    assert!(!restarted.can_undo());

    let page_id = PageId::new("p:campaign").unwrap();
    restarted.recovery_bank_mut().withdraw(&page_id).unwrap();
    assert!(restarted.recovery_bank().entries().unwrap().is_empty());
}

#[test]
fn null_and_application_commands_never_touch_the_recovery_folder() {
    let tmp = TempDir::new("quiet");
    let mut store = open_campaign(settings_for(tmp.path()));

    store
        .execute(PageCommand::null(PageOp::RemoveObjects {
            object_ids: vec![oid("b:initial")],
        }))
        .unwrap();
    store.execute(AppCommand::CopySelection).unwrap();
    store.execute(AppCommand::ClearClipboard).unwrap();

    assert!(!tmp.path().join("recovery").exists());
    assert!(!store.can_undo());
}

#[test]
fn validation_tracks_edits_and_undo() {
    let tmp = TempDir::new("validation");
    let mut store = open_campaign(settings_for(tmp.path()));
    let page_id = store.active_page().page_id().clone();
    assert!(store.is_valid());

    store
        .execute(PageCommand::new(
            page_id.clone(),
            PageOp::SetProperty {
                object_id: oid("b:initial"),
                key: "name".into(),
                value: PropertyValue::from(""),
            },
        ))
        .unwrap();
    assert!(!store.is_valid());
    assert_eq!(
        store.validation_errors()[0].reason,
        "required property 'name' is missing"
    );

    store
        .execute(PageCommand::new(
            page_id,
            PageOp::RemoveObjects {
                object_ids: vec![oid("b:exec")],
            },
        ))
        .unwrap();
    let reasons = store
        .validation_errors()
        .iter()
        .map(|error| error.reason.as_str())
        .collect::<Vec<_>>();
    assert!(reasons.contains(&"line has no target"));

    assert!(store.undo());
    assert!(store.undo());
    assert!(store.is_valid());
    assert_eq!(store.recovery_bank().write_count(), 4);
}

#[test]
fn settings_file_rejects_unknown_fields() {
    let tmp = TempDir::new("settings");
    let path = tmp.path().join("settings.json");
    std::fs::write(&path, r#"{ "edit": { "undo": 3 } }"#).unwrap();

    match AppSettings::load(&path) {
        Err(SettingsError::Json { .. }) => {}
        other => panic!("expected Json error, got: {other:?}"),
    }

    let defaults = AppSettings::load_or_default(tmp.path().join("missing.json")).unwrap();
    assert_eq!(defaults, AppSettings::default());
}
