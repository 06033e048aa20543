//! Security module for EcoWatt: password storage and account input policy.
//!
//! Provides:
//! - **Passwords**: Argon2id hashing and constant-time verification
//! - **Account policy**: email normalisation and password length rules

pub mod account;
pub mod password;

pub use account::{MIN_PASSWORD_LEN, check_password_policy, normalize_email};
pub use password::{PasswordError, hash_password, verify_password};
