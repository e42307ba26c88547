use std::sync::RwLock;

/// `{email, name}` staged between a successful signup and OTP verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSignup {
    pub email: String,
    pub name: String,
}

/// Tab-scoped staging slot for the signup-to-OTP handoff.
///
/// Holds only what the verification step needs; the rest of the registration
/// input (the password above all) is gone by the time this is written.
#[derive(Debug, Default)]
pub struct SignupHandoff {
    slot: RwLock<Option<PendingSignup>>,
}

impl SignupHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self, email: impl Into<String>, name: impl Into<String>) {
        *self.slot.write().expect("handoff lock poisoned") = Some(PendingSignup {
            email: email.into(),
            name: name.into(),
        });
    }

    pub fn pending(&self) -> Option<PendingSignup> {
        self.slot.read().expect("handoff lock poisoned").clone()
    }

    /// Take and drop the staged values; used after verification completes.
    pub fn discard(&self) -> Option<PendingSignup> {
        self.slot.write().expect("handoff lock poisoned").take()
    }
}
