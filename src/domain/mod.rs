pub mod claims;
pub mod identity;
pub mod job;
pub mod role;
pub mod user;

pub use claims::Claims;
pub use identity::Identity;
pub use job::{Job, NewJob};
pub use role::{Role, RolePolicy};
pub use user::{NewUser, User, UserProfile, UserUpdate};
