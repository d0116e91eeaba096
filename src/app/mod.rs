// ColaCup - app/mod.rs
//
// Application layer: viewer session orchestration, search throttling and
// the collaborator traits the host implements.
// Dependencies: core, platform (config values only).

pub mod session;
pub mod source;
pub mod throttle;
