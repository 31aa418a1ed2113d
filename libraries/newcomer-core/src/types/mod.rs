mod ids;
mod role;
mod user;

pub use ids::{TokenId, UserId};
pub use role::{ParseRoleError, Role};
pub use user::{normalize_email, normalize_set, Credentials, NewUser, UpdateProfile, User};
