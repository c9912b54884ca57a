// src/dev/mod.rs
// Helpers shared by the binaries and integration tests.
pub mod generator;
pub mod grammar;
pub mod oracle;
