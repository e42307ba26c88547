// Page rendering belongs to the front-end proper; these routes exist so the
// session guards have something to gate.

pub async fn index() -> &'static str {
    "Learning platform"
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn signin_page() -> &'static str {
    "Sign in"
}

pub async fn signup_page() -> &'static str {
    "Create your account"
}
