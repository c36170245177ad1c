use serde::{Deserialize, Serialize};

use super::Role;

/// Payload of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String, // user id
    #[serde(rename = "type")]
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}
