//! `rstest-bdd` behavioural tests for `cargo-envgen`.
//!
//! Fixtures and step implementations live under [`behaviour`]; the shared
//! project builders come from the integration-test `common` module.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]

#[path = "../common/mod.rs"]
mod common;

mod behaviour;
