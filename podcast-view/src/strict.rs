//! Debug-build double render check.
//!
//! Render functions must be pure. In debug builds [`render`] runs the function
//! twice and panics if the two trees differ; release builds render once.

use crate::node::Node;

pub fn render<F>(f: F) -> Node
where
    F: Fn() -> Node,
{
    if cfg!(debug_assertions) {
        let first = f();
        let second = f();
        assert_eq!(first, second, "render function produced different trees");
        second
    } else {
        f()
    }
}
