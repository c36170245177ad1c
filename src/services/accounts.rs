use crate::db::{StoreError, UserStore};
use crate::domain::{NewUser, User, UserUpdate};
use crate::error::AppError;
use crate::services::{hash_password, verify_password};
use crate::validation::{parse_role, validate_email, validate_full_name, validate_password};

pub const DUPLICATE_EMAIL_MESSAGE: &str = "User with this email already exists.";
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid email or password";

/// Raw registration input as received from a client or the CLI.
#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub user_type: String,
}

/// Validates, hashes and stores a new account.
pub async fn register(users: &dyn UserStore, input: Registration) -> Result<User, AppError> {
    validate_email(&input.email)?;
    validate_full_name(&input.full_name)?;
    validate_password(&input.password)?;
    let role = parse_role(&input.user_type)?;

    let password_hash = hash_password(&input.password).await?;
    let user = users
        .insert_user(NewUser {
            full_name: input.full_name,
            email: input.email,
            password_hash,
            role,
        })
        .await
        .map_err(|e| match e {
            StoreError::DuplicateEmail(_) => {
                AppError::BadRequest(DUPLICATE_EMAIL_MESSAGE.to_string())
            }
            other => AppError::Store(other),
        })?;

    tracing::info!(user_id = %user.id, email = %user.email, role = %user.role, "User created");
    Ok(user)
}

/// Returns the user whose password matches. Unknown email and wrong password
/// are reported identically.
pub async fn check_credentials(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let invalid = || AppError::BadRequest(INVALID_LOGIN_MESSAGE.to_string());

    let user = users.find_user_by_email(email).await?.ok_or_else(invalid)?;
    if !verify_password(password, &user.password_hash).await? {
        tracing::info!(email = %email, "Login rejected: wrong password");
        return Err(invalid());
    }

    Ok(user)
}

/// Builds the partial update for an edit request, validating only the fields
/// that are present.
pub async fn prepare_update(
    full_name: Option<String>,
    password: Option<String>,
) -> Result<UserUpdate, AppError> {
    let full_name = full_name.filter(|name| !name.is_empty());
    let password = password.filter(|password| !password.is_empty());

    if let Some(name) = &full_name {
        validate_full_name(name)?;
    }
    if let Some(password) = &password {
        validate_password(password)?;
    }

    let password_hash = match password {
        Some(password) => Some(hash_password(&password).await?),
        None => None,
    };

    Ok(UserUpdate {
        full_name,
        password_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::domain::Role;
    use crate::validation::{EMAIL_MESSAGE, ROLE_MESSAGE};

    fn registration(email: &str, user_type: &str) -> Registration {
        Registration {
            full_name: "Jane Doe".to_string(),
            email: email.to_string(),
            password: "P@ssw0rd123!".to_string(),
            user_type: user_type.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let store = MemoryStore::new();
        let user = register(&store, registration("jane@gmail.com", "admin"))
            .await
            .unwrap();

        assert_eq!(user.role, Role::Admin);
        assert_ne!(user.password_hash, "P@ssw0rd123!");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input() {
        let store = MemoryStore::new();

        let err = register(&store, registration("jane@yahoo.com", "admin"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), EMAIL_MESSAGE);

        let err = register(&store, registration("jane@gmail.com", "owner"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), ROLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let store = MemoryStore::new();
        register(&store, registration("jane@gmail.com", "employee"))
            .await
            .unwrap();

        let err = register(&store, registration("jane@gmail.com", "employee"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg == DUPLICATE_EMAIL_MESSAGE));
    }

    #[tokio::test]
    async fn test_check_credentials() {
        let store = MemoryStore::new();
        register(&store, registration("jane@gmail.com", "employee"))
            .await
            .unwrap();

        assert!(check_credentials(&store, "jane@gmail.com", "P@ssw0rd123!")
            .await
            .is_ok());

        let wrong_password = check_credentials(&store, "jane@gmail.com", "Wr0ng!pass")
            .await
            .unwrap_err();
        let unknown_email = check_credentials(&store, "nobody@gmail.com", "P@ssw0rd123!")
            .await
            .unwrap_err();
        assert_eq!(wrong_password.to_string(), INVALID_LOGIN_MESSAGE);
        assert_eq!(unknown_email.to_string(), INVALID_LOGIN_MESSAGE);
    }

    #[tokio::test]
    async fn test_prepare_update_ignores_blank_fields() {
        let update = prepare_update(Some(String::new()), None).await.unwrap();
        assert!(update.is_empty());

        assert!(prepare_update(Some("Jane 2".to_string()), None).await.is_err());
        assert!(prepare_update(None, Some("weak".to_string())).await.is_err());

        let update = prepare_update(None, Some("N3wP@ssword".to_string()))
            .await
            .unwrap();
        assert!(update.password_hash.unwrap().starts_with("$argon2"));
    }
}
