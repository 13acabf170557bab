//! External programs the build drives.

pub mod cargo;
mod wasm_bindgen;

pub use self::{cargo::cargo, wasm_bindgen::wasm_bindgen};
