//! Infrastructure layer for the linepatch server.
//!
//! Contains the adapters that touch the outside world: the JSON template
//! store and TOML config file, the file locator and batch rewriter, the axum
//! HTTP API and the browser launcher.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `linepatch_core`, but MUST NOT be imported by the `application` layer.

pub mod browser;
pub mod files;
pub mod http;
pub mod storage;
