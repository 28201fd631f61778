// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{ObjectId, PageId};
use super::object::{DiagramObject, Point};
use super::page::Page;

fn oid(value: &str) -> ObjectId {
    ObjectId::new(value).expect("object id")
}

/// Two connected actions and one unconnected asset on a single page.
pub(crate) fn small_flow() -> Page {
    let mut page = Page::new(PageId::new("p:flow").expect("page id"), "Small flow");

    page.insert(
        DiagramObject::block(oid("b:recon"), "action")
            .with_position(Point::new(0, 0))
            .with_property("name", "Reconnaissance"),
        None,
    )
    .expect("insert recon");
    page.insert(
        DiagramObject::block(oid("b:phish"), "action")
            .with_position(Point::new(200, 0))
            .with_property("name", "Phishing"),
        None,
    )
    .expect("insert phish");
    page.insert(
        DiagramObject::block(oid("b:mail"), "asset")
            .with_position(Point::new(200, 150))
            .with_property("name", "Mail server"),
        None,
    )
    .expect("insert asset");
    page.insert(
        DiagramObject::line(oid("l:1"), "flow", Some(oid("b:recon")), Some(oid("b:phish"))),
        None,
    )
    .expect("insert line");

    page
}

/// A group holding two blocks, a free block, and a line between the grouped blocks.
pub(crate) fn grouped_page() -> Page {
    let mut page = Page::new(PageId::new("p:grouped").expect("page id"), "Grouped");

    page.insert(DiagramObject::group(oid("g:1"), "group"), None)
        .expect("insert group");
    page.insert(DiagramObject::block(oid("b:a"), "action"), Some(&oid("g:1")))
        .expect("insert a");
    page.insert(DiagramObject::block(oid("b:b"), "action"), Some(&oid("g:1")))
        .expect("insert b");
    page.insert(DiagramObject::block(oid("b:c"), "asset"), None)
        .expect("insert c");
    page.insert(
        DiagramObject::line(oid("l:ab"), "flow", Some(oid("b:a")), Some(oid("b:b"))),
        None,
    )
    .expect("insert line");

    page
}
