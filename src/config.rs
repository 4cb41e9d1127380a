use serde::{Deserialize, Serialize};

use crate::template::BindMode;

/// What happens to a transaction released without an explicit commit or rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropBehavior {
    /// Commit the transaction's work.
    #[default]
    Commit,
    /// Discard the transaction's work.
    Rollback,
}

/// Per-client options shared by every backend.
///
/// ```rust
/// use sql_template::prelude::*;
///
/// let options = ClientOptions::default()
///     .with_bind_mode(BindMode::Inline)
///     .with_drop_behavior(DropBehavior::Rollback);
/// # let _ = options;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub bind_mode: BindMode,
    pub on_drop: DropBehavior,
}

impl ClientOptions {
    #[must_use]
    pub fn with_bind_mode(mut self, bind_mode: BindMode) -> Self {
        self.bind_mode = bind_mode;
        self
    }

    #[must_use]
    pub fn with_drop_behavior(mut self, on_drop: DropBehavior) -> Self {
        self.on_drop = on_drop;
        self
    }
}
