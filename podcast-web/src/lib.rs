#![warn(clippy::use_self)]

mod dom;

pub use dom::DomTree;

use std::{cell::Cell, mem, thread_local};

use podcast_view::{strict, Node, Notifier};
use thiserror::Error;
use wasm_bindgen::JsValue;

thread_local! {
    static MOUNTED: Cell<bool> = const { Cell::new(false) };
}

#[derive(Clone, PartialEq, Eq, Error, Debug)]
pub enum MountError {
    #[error("mounting only works in browser environments")]
    NoDocument,
    #[error("no element with id `{0}` to mount into")]
    MissingRoot(String),
    #[error("application already mounted")]
    AlreadyMounted,
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl From<JsValue> for MountError {
    fn from(value: JsValue) -> Self {
        Self::Dom(format!("{value:?}"))
    }
}

pub fn window() -> Option<web_sys::Window> {
    if cfg!(target_family = "wasm") {
        web_sys::window()
    } else {
        None
    }
}

pub fn document() -> Option<web_sys::Document> {
    window().and_then(|window| window.document())
}

/// Renders `f` into the element with the given id, once per page.
///
/// Listeners stay bound for the lifetime of the page.
pub fn mount<F>(id: &str, f: F) -> Result<(), MountError>
where
    F: Fn() -> Node,
{
    let document = document().ok_or(MountError::NoDocument)?;
    let root = document
        .get_element_by_id(id)
        .ok_or_else(|| MountError::MissingRoot(id.to_string()))?;

    if MOUNTED.get() {
        return Err(MountError::AlreadyMounted);
    }

    let tree = mount_to(&document, &root, f)?;
    MOUNTED.set(true);
    mem::forget(tree);
    Ok(())
}

/// Replaces the content of `root` with the tree rendered by `f`.
///
/// Any prerendered markup inside `root` is discarded first.
pub fn mount_to<F>(
    document: &web_sys::Document,
    root: &web_sys::Element,
    f: F,
) -> Result<DomTree, MountError>
where
    F: Fn() -> Node,
{
    let tree = DomTree::build(document, &strict::render(f))?;
    root.set_text_content(None);
    tree.mount(root)?;
    Ok(tree)
}

/// Blocking `window.alert` notifications.
#[derive(Clone, Copy, Default, Debug)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, message: &str) {
        if let Some(window) = window() {
            window
                .alert_with_message(message)
                .expect("failed to show alert");
        }
    }
}
