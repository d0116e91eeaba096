// ColaCup - platform/mod.rs
//
// Platform layer: config directory resolution and config.toml loading.
// Dependencies: core model types, directories crate.

pub mod config;
