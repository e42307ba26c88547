use secrecy::Secret;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Account record mirrored from the identity service.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub description: String,
}

/// Sign-in input. The password is only ever read out at the network boundary.
#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    pub password: Secret<String>,
}

/// Signup input; dropped wholesale once the submission round trip finishes,
/// so the password never outlives the request that carried it.
#[derive(Debug, Deserialize, Validate)]
pub struct RegistrationProfile {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub password: Secret<String>,
}

/// The `(uid, token)` pair from an emailed activation or reset link.
///
/// Both values are opaque identifiers minted by the identity service; they
/// are read verbatim from the link and never recomputed or altered here.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkCredentials {
    pub uid: String,
    pub token: String,
}
