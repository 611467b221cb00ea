//! Test helpers shared across crates in the envgen workspace.
//!
//! This crate provides throwaway project trees for exercising the generator
//! end to end.

pub mod project;

pub use project::TempProject;
