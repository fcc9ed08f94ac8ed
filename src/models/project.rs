use serde::{Deserialize, Serialize};

/// A project as returned by the API. `created_at` is whatever timestamp
/// format the server uses; it is displayed verbatim, never parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub clerk_id: String,
}
