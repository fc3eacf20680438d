//! Account authentication: password hashing and login tokens
//!
//! Tokens are issued on login but not required by any route.

mod jwt;
mod password;

pub use jwt::{Claims, JWT_EXPIRY_HOURS, create_token, verify_token};
pub use password::{hash_password, verify_password};
