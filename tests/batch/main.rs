//! Batch endpoint integration tests.

mod support;
mod replace;
mod append;
mod update;
mod validation;
