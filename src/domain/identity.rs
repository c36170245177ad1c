use super::{Role, User};

/// Caller resolved from a verified token plus a live user lookup. Lives in the
/// request extensions for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub role: Role,
    pub email: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            role: user.role,
            email: user.email.clone(),
        }
    }
}
