//! Binds `cargo-envgen` feature files to the step registry.

use super::steps::{EnvgenContext, envgen_context};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/generation.feature",
    fixtures = [envgen_context: EnvgenContext]
);
