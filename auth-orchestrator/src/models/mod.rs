pub mod session;
pub mod user;

pub use session::{AuthScheme, SessionTokens};
pub use user::{Credentials, LinkCredentials, RegistrationProfile, UserProfile};
