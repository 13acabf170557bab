#![warn(clippy::use_self)]

pub mod app;
pub mod node;
pub mod notify;
pub mod render;
pub mod strict;

pub use node::{IntoNode, Node};
pub use notify::Notifier;
