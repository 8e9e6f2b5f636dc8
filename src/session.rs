//! Per-run mutable state and generated credentials.

use uuid::Uuid;

/// Authentication and entity identifiers threaded across steps within one
/// run. Owned exclusively by the orchestrator; mutated only by step
/// extraction; reset at run start.
#[derive(Debug, Default, Clone)]
pub struct Session {
    pub auth_token: Option<String>,
    pub user_id: Option<String>,
    pub profile_id: Option<String>,
    pub chat_id: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}

/// Account credentials for one run. Generated fresh with a random suffix so
/// repeated runs never collide with previously registered accounts.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        let suffix = &suffix[..8];
        Self {
            username: format!("test_user_{}", suffix),
            email: format!("test_{}@test.com", suffix),
            password: "TestPass123!".to_string(),
        }
    }
}
