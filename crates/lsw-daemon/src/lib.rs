//! lsw-daemon library target.
//!
//! Exposes the router, state, template and logging setup for integration
//! tests. The binary `main.rs` depends on this library target.

pub mod logging;
pub mod routes;
pub mod state;
pub mod template;
