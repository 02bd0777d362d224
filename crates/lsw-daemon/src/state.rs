//! Shared runtime state for lsw-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The switch sits behind
//! a single lock so a reader always sees all four fields from the same
//! transition.

use std::path::PathBuf;
use std::sync::Arc;

use lsw_switch::{Switch, OFF, ON};
use tokio::sync::RwLock;

use crate::template::SwitchTemplate;

/// Cloneable (Arc) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The one switch this server exposes.
    pub switch: Arc<RwLock<Switch>>,
    /// Parsed view template for `/switch`.
    pub template: Arc<SwitchTemplate>,
    /// Root served for every path not claimed by a route.
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(switch: Switch, template: SwitchTemplate, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            switch: Arc::new(RwLock::new(switch)),
            template: Arc::new(template),
            static_dir: static_dir.into(),
        }
    }
}

/// Boot configuration of the served switch: `off`, offering `on`.
pub fn boot_switch(name: impl Into<String>) -> Switch {
    Switch::new(name, OFF, ON)
}
