use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// The closed set of account kinds. Serialized in lowercase on the wire and
/// in the `users.user_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Employee];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Minimal role set a route accepts once the caller is authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolePolicy {
    Authenticated,
    AdminOnly,
    EmployeeOrAdmin,
}

impl RolePolicy {
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            RolePolicy::Authenticated => &Role::ALL,
            RolePolicy::AdminOnly => &[Role::Admin],
            RolePolicy::EmployeeOrAdmin => &[Role::Employee, Role::Admin],
        }
    }

    pub fn permits(&self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }

    /// Message returned to callers whose role falls outside the policy.
    pub fn denial_message(&self) -> &'static str {
        match self {
            RolePolicy::Authenticated => "Access denied",
            RolePolicy::AdminOnly => "Access denied. Admins only",
            RolePolicy::EmployeeOrAdmin => "Access denied. Employees or admins only",
        }
    }
}
