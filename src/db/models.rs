use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::{Role, User};

use super::StoreError;

/// Row shape of the `users` table. The role column is plain text and is only
/// trusted once it parses into [`Role`].
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .user_type
            .parse::<Role>()
            .map_err(|e| StoreError::Corrupt(format!("user {}: {}", row.id, e)))?;

        Ok(User {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user_type: &str) -> UserRow {
        let now = Utc::now();
        UserRow {
            id: "u1".to_string(),
            full_name: "Jane Doe".to_string(),
            email: "jane@gmail.com".to_string(),
            password_hash: "hash".to_string(),
            user_type: user_type.to_string(),
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_with_known_role_converts() {
        let user = User::try_from(row("admin")).unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.email, "jane@gmail.com");
    }

    #[test]
    fn test_row_with_unknown_role_is_corrupt() {
        let err = User::try_from(row("superuser")).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
