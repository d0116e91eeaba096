// ColaCup - core/mod.rs
//
// Core logic layer: model, filtering, page windows, details, export.
// Must NOT depend on: app, platform, or spawn threads.

pub mod details;
pub mod export;
pub mod filter;
pub mod model;
pub mod page;
