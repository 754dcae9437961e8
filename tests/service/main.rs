//! Service integration tests.

mod support;
mod dispatch;

#[cfg(feature = "http")]
mod http;
