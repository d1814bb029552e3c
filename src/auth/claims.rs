use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload asserted by a bearer token.
///
/// Tokens carry no `exp` claim; a validly signed token does not expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String, // login handle of the bearer
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>, // may be absent in the payload
    pub iat: usize, // issued at (unix timestamp)
}
