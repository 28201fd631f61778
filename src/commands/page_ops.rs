// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Per-op mutation helpers for `apply_page_op`. Each one works on the scratch copy of the page.

/// Inserts a forest. Objects whose parent is part of the batch stay under it; everything else
/// attaches under `parent` (or the page root).
fn add_objects(
    page: &mut Page,
    parent: Option<&ObjectId>,
    objects: &[DiagramObject],
    select: bool,
    delta: &mut DeltaBuilder,
) -> Result<(), CommandError> {
    if objects.is_empty() {
        return Ok(());
    }

    let batch: BTreeSet<&ObjectId> = objects.iter().map(DiagramObject::object_id).collect();

    for object in objects {
        let attach_to = match object.parent() {
            Some(batch_parent) if batch.contains(batch_parent) => Some(batch_parent),
            _ => parent,
        };
        let mut copy = object.clone();
        copy.set_selected(false);
        page.insert(copy, attach_to)?;
        page.reserve_object_id(object.object_id());
        delta.record_added(object.object_id().clone());
    }

    for object in objects {
        if let Some((source, target)) = object.line_endpoints() {
            for endpoint in [source, target].into_iter().flatten() {
                check_line_endpoint(page, object.object_id(), endpoint)?;
            }
        }
    }

    if select {
        for object in page.objects_mut() {
            let wanted = batch.contains(object.object_id());
            if object.is_selected() != wanted {
                object.set_selected(wanted);
                delta.record_selection();
            }
        }
    }

    Ok(())
}

fn remove_objects(
    page: &mut Page,
    object_ids: &[ObjectId],
    delta: &mut DeltaBuilder,
) -> Result<(), CommandError> {
    let mut removed_ids = BTreeSet::new();

    for object_id in object_ids {
        // Already gone as part of an ancestor listed earlier.
        if removed_ids.contains(object_id) {
            continue;
        }
        for removed in page.remove_subtree(object_id)? {
            if removed.is_selected() {
                delta.record_selection();
            }
            delta.record_removed(removed.object_id().clone());
            removed_ids.insert(removed.object_id().clone());
        }
    }

    if removed_ids.is_empty() {
        return Ok(());
    }

    for object in page.objects_mut() {
        let line_id = object.object_id().clone();
        if let ObjectKind::Line { source, target } = object.kind_mut() {
            let mut detached = false;
            for slot in [source, target] {
                if slot.as_ref().is_some_and(|id| removed_ids.contains(id)) {
                    *slot = None;
                    detached = true;
                }
            }
            if detached {
                delta.record_updated(line_id);
            }
        }
    }

    Ok(())
}

fn move_objects(
    page: &mut Page,
    object_ids: &[ObjectId],
    dx: i64,
    dy: i64,
    delta: &mut DeltaBuilder,
) -> Result<(), CommandError> {
    let mut moved = BTreeSet::new();
    for object_id in object_ids {
        if !page.contains(object_id) {
            return Err(not_found(object_id));
        }
        moved.extend(page.descendants(object_id));
    }

    if dx == 0 && dy == 0 {
        return Ok(());
    }

    for object_id in moved {
        if let Some(object) = page.object_mut(&object_id) {
            let position = object.position().translated(dx, dy);
            if position != object.position() {
                object.set_position(position);
                delta.record_updated(object_id);
            }
        }
    }

    Ok(())
}

fn set_property(
    page: &mut Page,
    object_id: &ObjectId,
    key: &SmolStr,
    value: &PropertyValue,
    delta: &mut DeltaBuilder,
) -> Result<(), CommandError> {
    let Some(object) = page.object_mut(object_id) else {
        return Err(not_found(object_id));
    };

    if object.property(key) == Some(value) {
        return Ok(());
    }

    object.set_property(key.clone(), value.clone());
    delta.record_updated(object_id.clone());
    Ok(())
}

fn connect_line(
    page: &mut Page,
    line_id: &ObjectId,
    end: LineEnd,
    object_id: Option<&ObjectId>,
    delta: &mut DeltaBuilder,
) -> Result<(), CommandError> {
    let Some(line) = page.object(line_id) else {
        return Err(not_found(line_id));
    };
    if !line.kind().is_line() {
        return Err(CommandError::NotALine {
            object_id: line_id.clone(),
        });
    }
    if let Some(endpoint) = object_id {
        check_line_endpoint(page, line_id, endpoint)?;
    }

    let Some(line) = page.object_mut(line_id) else {
        return Err(not_found(line_id));
    };
    if let ObjectKind::Line { source, target } = line.kind_mut() {
        let slot = match end {
            LineEnd::Source => source,
            LineEnd::Target => target,
        };
        if slot.as_ref() != object_id {
            *slot = object_id.cloned();
            delta.record_updated(line_id.clone());
        }
    }

    Ok(())
}

fn select_objects(
    page: &mut Page,
    object_ids: &[ObjectId],
    mode: SelectionMode,
    delta: &mut DeltaBuilder,
) -> Result<(), CommandError> {
    let listed: BTreeSet<&ObjectId> = object_ids.iter().collect();
    if let Some(missing) = listed.iter().find(|id| !page.contains(id)) {
        return Err(not_found(missing));
    }

    for object in page.objects_mut() {
        let is_listed = listed.contains(object.object_id());
        let selected = match mode {
            SelectionMode::Replace => is_listed,
            SelectionMode::Add => object.is_selected() || is_listed,
            SelectionMode::Toggle => object.is_selected() ^ is_listed,
        };
        if selected != object.is_selected() {
            object.set_selected(selected);
            delta.record_selection();
        }
    }

    Ok(())
}

/// Lines may only attach to existing non-line objects other than themselves.
fn check_line_endpoint(
    page: &Page,
    line_id: &ObjectId,
    endpoint: &ObjectId,
) -> Result<(), CommandError> {
    let attachable = endpoint != line_id
        && page
            .object(endpoint)
            .is_some_and(|object| !object.kind().is_line());
    if attachable {
        Ok(())
    } else {
        Err(CommandError::InvalidEndpoint {
            line_id: line_id.clone(),
            object_id: endpoint.clone(),
        })
    }
}

fn not_found(object_id: &ObjectId) -> CommandError {
    CommandError::Page(PageError::NotFound {
        object_id: object_id.clone(),
    })
}
