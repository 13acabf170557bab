#![warn(clippy::use_self)]

pub mod config;
pub mod page;
pub mod preview;
pub mod project;
pub mod shell;

mod tools;
mod util;

pub use self::{shell::shell, util::is_error_silent};

#[cfg(feature = "cli")]
mod cli;

#[cfg(feature = "cli")]
pub use cli::run;
