pub mod accounts;
pub mod password;
pub mod token_service;

pub use password::{hash_password, verify_password, PasswordError};
pub use token_service::{TokenError, TokenService, TOKEN_TTL_SECONDS};
