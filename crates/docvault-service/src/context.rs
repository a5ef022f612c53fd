//! Request context carrying the caller identity.

use serde::{Deserialize, Serialize};

/// Context for the current request.
///
/// There is no authentication; the actor is whatever identity the caller
/// presented, and ends up in `created_by` columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Caller identity.
    pub actor: String,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
        }
    }
}
