pub mod password;

pub use password::{PasswordPolicy, PasswordStrength, PasswordViolation};
