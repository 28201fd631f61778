// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use smallvec::SmallVec;
use thiserror::Error;

use super::ids::{sanitize_id_prefix, ObjectId, PageId};
use super::object::DiagramObject;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("object already exists (id={object_id})")]
    AlreadyExists { object_id: ObjectId },
    #[error("object not found (id={object_id})")]
    NotFound { object_id: ObjectId },
    #[error("object {parent_id} cannot hold children")]
    InvalidParent { parent_id: ObjectId },
    #[error("object {object_id} must be inserted without children")]
    HasChildren { object_id: ObjectId },
}

/// One diagram page: an ordered forest of [`DiagramObject`]s stored in an arena.
///
/// Root objects hang off the page itself; only groups may have children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    page_id: PageId,
    name: String,
    objects: BTreeMap<ObjectId, DiagramObject>,
    roots: Vec<ObjectId>,
    id_seq: u64,
}

impl Page {
    pub fn new(page_id: PageId, name: impl Into<String>) -> Self {
        Self {
            page_id,
            name: name.into(),
            objects: BTreeMap::new(),
            roots: Vec::new(),
            id_seq: 0,
        }
    }

    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn objects(&self) -> &BTreeMap<ObjectId, DiagramObject> {
        &self.objects
    }

    pub fn object(&self, object_id: &ObjectId) -> Option<&DiagramObject> {
        self.objects.get(object_id)
    }

    pub(crate) fn object_mut(&mut self, object_id: &ObjectId) -> Option<&mut DiagramObject> {
        self.objects.get_mut(object_id)
    }

    pub(crate) fn objects_mut(&mut self) -> impl Iterator<Item = &mut DiagramObject> {
        self.objects.values_mut()
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.objects.contains_key(object_id)
    }

    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn id_seq(&self) -> u64 {
        self.id_seq
    }

    pub(crate) fn set_id_seq(&mut self, id_seq: u64) {
        self.id_seq = id_seq;
    }

    /// Returns every object matching `filter`, in pre-order (roots first, then children in order).
    pub fn subtree<F>(&self, filter: F) -> Vec<&DiagramObject>
    where
        F: Fn(&DiagramObject) -> bool,
    {
        let mut out = Vec::new();
        let mut stack: SmallVec<[&ObjectId; 16]> = self.roots.iter().rev().collect();

        while let Some(object_id) = stack.pop() {
            let Some(object) = self.objects.get(object_id) else {
                continue;
            };
            if filter(object) {
                out.push(object);
            }
            stack.extend(object.children.iter().rev());
        }

        out
    }

    pub fn selection(&self) -> Vec<&DiagramObject> {
        self.subtree(DiagramObject::is_selected)
    }

    pub fn selection_count(&self) -> usize {
        self.objects.values().filter(|o| o.is_selected()).count()
    }

    pub fn selected_ids(&self) -> BTreeSet<ObjectId> {
        self.objects
            .values()
            .filter(|o| o.is_selected())
            .map(|o| o.object_id().clone())
            .collect()
    }

    /// Ids of `object_id` and all of its descendants, in pre-order.
    pub fn descendants(&self, object_id: &ObjectId) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut stack: SmallVec<[&ObjectId; 16]> = SmallVec::new();
        stack.push(object_id);

        while let Some(current) = stack.pop() {
            let Some(object) = self.objects.get(current) else {
                continue;
            };
            out.push(current.clone());
            stack.extend(object.children.iter().rev());
        }

        out
    }

    /// Generates an id that is not used on this page yet.
    pub fn fresh_object_id(&mut self, prefix: &str) -> ObjectId {
        let prefix = sanitize_id_prefix(prefix);
        loop {
            self.id_seq = self.id_seq.saturating_add(1);
            let candidate = ObjectId::new_unchecked(format!("{prefix}-{}", self.id_seq));
            if !self.objects.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Advances the id sequence past `object_id` when it has the `<prefix>-<n>` shape handed
    /// out by [`Page::fresh_object_id`].
    pub(crate) fn reserve_object_id(&mut self, object_id: &ObjectId) {
        let seq = object_id
            .as_str()
            .rsplit_once('-')
            .and_then(|(_, suffix)| suffix.parse::<u64>().ok());
        if let Some(seq) = seq {
            self.id_seq = self.id_seq.max(seq);
        }
    }

    /// Inserts a childless object under `parent` (or the page root), appending it last.
    pub fn insert(
        &mut self,
        mut object: DiagramObject,
        parent: Option<&ObjectId>,
    ) -> Result<(), PageError> {
        let object_id = object.object_id().clone();
        if self.objects.contains_key(&object_id) {
            return Err(PageError::AlreadyExists { object_id });
        }
        if !object.children.is_empty() {
            return Err(PageError::HasChildren { object_id });
        }

        match parent {
            Some(parent_id) => {
                let Some(parent_object) = self.objects.get_mut(parent_id) else {
                    return Err(PageError::NotFound {
                        object_id: parent_id.clone(),
                    });
                };
                if !parent_object.kind().can_hold_children() {
                    return Err(PageError::InvalidParent {
                        parent_id: parent_id.clone(),
                    });
                }
                parent_object.children.push(object_id.clone());
                object.parent = Some(parent_id.clone());
            }
            None => {
                self.roots.push(object_id.clone());
                object.parent = None;
            }
        }

        self.objects.insert(object_id, object);
        Ok(())
    }

    /// Removes `object_id` together with its descendants. Returns the removed objects in pre-order.
    pub fn remove_subtree(&mut self, object_id: &ObjectId) -> Result<Vec<DiagramObject>, PageError> {
        let Some(object) = self.objects.get(object_id) else {
            return Err(PageError::NotFound {
                object_id: object_id.clone(),
            });
        };

        match object.parent.clone() {
            Some(parent_id) => {
                if let Some(parent) = self.objects.get_mut(&parent_id) {
                    parent.children.retain(|child| child != object_id);
                }
            }
            None => self.roots.retain(|root| root != object_id),
        }

        let removed = self
            .descendants(object_id)
            .into_iter()
            .filter_map(|id| self.objects.remove(&id))
            .collect();
        Ok(removed)
    }

    /// Deep copies of the given objects and their descendants, in pre-order.
    ///
    /// Parent links that point outside the copied set are cleared, so the result is a
    /// self-contained forest that can be handed to an insert op.
    pub fn clone_forest(&self, object_ids: &[ObjectId]) -> Vec<DiagramObject> {
        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();

        let requested: BTreeSet<&ObjectId> = object_ids.iter().collect();
        let top_level = self.subtree(|o| requested.contains(o.object_id()));

        for object in top_level {
            for id in self.descendants(object.object_id()) {
                if seen.insert(id.clone()) {
                    ordered.push(id);
                }
            }
        }

        ordered
            .iter()
            .filter_map(|id| self.objects.get(id))
            .map(|object| {
                let mut copy = object.clone();
                if copy.parent.as_ref().is_some_and(|p| !seen.contains(p)) {
                    copy.parent = None;
                }
                copy.children.clear();
                copy.selected = false;
                copy
            })
            .collect()
    }

    /// Copies selection flags from `other` for objects present on both pages.
    ///
    /// Returns true if any flag changed.
    pub fn carry_selection_from(&mut self, other: &Page) -> bool {
        let mut changed = false;
        for object in self.objects.values_mut() {
            let selected = other
                .objects
                .get(object.object_id())
                .is_some_and(DiagramObject::is_selected);
            if object.selected != selected {
                object.selected = selected;
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, PageError};
    use crate::model::{fixtures, DiagramObject, ObjectId, PageId};

    fn oid(value: &str) -> ObjectId {
        ObjectId::new(value).expect("object id")
    }

    #[test]
    fn subtree_walks_in_pre_order() {
        let page = fixtures::grouped_page();
        let order = page
            .subtree(|_| true)
            .into_iter()
            .map(|o| o.object_id().as_str().to_owned())
            .collect::<Vec<_>>();

        assert_eq!(order, vec!["g:1", "b:a", "b:b", "b:c", "l:ab"]);
    }

    #[test]
    fn insert_rejects_duplicate_and_non_group_parent() {
        let mut page = fixtures::grouped_page();

        let err = page
            .insert(DiagramObject::block(oid("b:a"), "action"), None)
            .unwrap_err();
        assert_eq!(err, PageError::AlreadyExists { object_id: oid("b:a") });

        let err = page
            .insert(DiagramObject::block(oid("b:z"), "action"), Some(&oid("b:c")))
            .unwrap_err();
        assert_eq!(err, PageError::InvalidParent { parent_id: oid("b:c") });

        let err = page
            .insert(DiagramObject::block(oid("b:z"), "action"), Some(&oid("nope")))
            .unwrap_err();
        assert_eq!(err, PageError::NotFound { object_id: oid("nope") });
    }

    #[test]
    fn remove_subtree_detaches_from_parent() {
        let mut page = fixtures::grouped_page();
        let removed = page.remove_subtree(&oid("g:1")).expect("remove");

        assert_eq!(removed.len(), 3);
        assert!(!page.contains(&oid("b:a")));
        assert!(!page.contains(&oid("b:b")));
        assert_eq!(page.roots(), &[oid("b:c"), oid("l:ab")]);
    }

    #[test]
    fn fresh_object_id_skips_taken_ids() {
        let mut page = Page::new(PageId::new("p").expect("page id"), "Page");
        page.insert(DiagramObject::block(oid("action-1"), "action"), None)
            .expect("insert");

        assert_eq!(page.fresh_object_id("action"), oid("action-2"));
        assert_eq!(page.fresh_object_id("action"), oid("action-3"));
    }

    #[test]
    fn clone_forest_keeps_internal_parent_links_only() {
        let page = fixtures::grouped_page();
        let forest = page.clone_forest(&[oid("b:b"), oid("g:1")]);

        let ids = forest.iter().map(|o| o.object_id().as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["g:1", "b:a", "b:b"]);
        assert_eq!(forest[0].parent(), None);
        assert_eq!(forest[1].parent(), Some(&oid("g:1")));
        assert!(forest.iter().all(|o| o.children().is_empty()));
    }

    #[test]
    fn carry_selection_only_touches_shared_objects() {
        let mut before = fixtures::grouped_page();
        before.object_mut(&oid("b:a")).expect("b:a").set_selected(true);

        let mut after = fixtures::grouped_page();
        after.object_mut(&oid("b:c")).expect("b:c").set_selected(true);

        assert!(before.carry_selection_from(&after));
        assert_eq!(before.selected_ids().into_iter().collect::<Vec<_>>(), vec![oid("b:c")]);
        assert!(!before.carry_selection_from(&after));
    }
}
