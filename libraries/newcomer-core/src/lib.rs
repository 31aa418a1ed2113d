//! Newcomer Core
//!
//! Storage-agnostic domain types, the user store trait, and error handling
//! shared by the storage layer and the HTTP server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Role`, `NewUser`, `UpdateProfile`
//! - **Core Traits**: `UserStore`
//! - **Error Handling**: Unified `NewcomerError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use newcomer_core::types::{Role, UpdateProfile};
//!
//! let role: Role = "developer".parse().unwrap();
//! assert!(role.is_self_assignable());
//!
//! let update = UpdateProfile {
//!     bio: Some("Building things".to_string()),
//!     ..UpdateProfile::default()
//! };
//! assert!(!update.is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{NewcomerError, Result};
pub use storage::UserStore;

pub use types::{Credentials, NewUser, Role, UpdateProfile, User, UserId};
