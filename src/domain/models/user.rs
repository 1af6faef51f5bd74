use serde::{Deserialize, Serialize};

/// Authenticated identity forwarded by the upstream gateway.
/// The core trusts this input and never re-verifies credentials.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Principal {
    pub id: String,
    pub role: String,
    pub email: String,
}

pub const ROLE_PROVIDER: &str = "PROVIDER";
pub const ROLE_USER: &str = "USER";
