pub mod handoff;
pub mod store;

pub use handoff::{PendingSignup, SignupHandoff};
pub use store::{SessionSnapshot, SessionStore};
