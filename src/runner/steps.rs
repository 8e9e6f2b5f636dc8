//! Step library: one function per API operation.
//!
//! Each step is a pure function of (client, session, arguments). It issues a
//! single request, asserts the per-step expected status, extracts the
//! identifiers later steps depend on into the session, and returns an
//! immutable `StepResult`. Steps never call each other; only the
//! orchestrator sequences them.

use std::time::Instant;

use serde_json::{json, Value};

use crate::client::{ApiClient, Method, ResponseBody};
use crate::error::StepError;
use crate::runner::state::StepResult;
use crate::session::{Credentials, Session};

/// Known spellings of an entity id across backend variants. Normalized
/// here, at the extraction boundary, rather than configured per target.
const ID_ALIASES: &[&str] = &["_id", "user_id", "id"];

fn extract_str(body: Option<&ResponseBody>, keys: &[&str]) -> Option<String> {
    let json = body?.as_json()?;
    for key in keys {
        if let Some(value) = json.get(key).and_then(Value::as_str) {
            return Some(value.to_string());
        }
    }
    None
}

/// Demote an otherwise-successful result: the HTTP contract was met but a
/// required field is absent from the body.
fn missing_field(mut result: StepResult, field: &'static str) -> StepResult {
    result.success = false;
    result.error = Some(StepError::MissingField { field }.to_string());
    result
}

/// Issue one request and fold the outcome into a `StepResult`. All errors
/// stop at this boundary.
async fn call(
    client: &ApiClient,
    token: Option<&str>,
    name: &str,
    method: Method,
    path: &str,
    expected: u16,
    body: Option<Value>,
) -> StepResult {
    let started = Instant::now();
    let outcome = client.execute(method, path, body.as_ref(), token).await;
    let duration_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(res) if res.status == expected => {
            StepResult::passed(name, res.status, expected, res.body, duration_ms)
        }
        Ok(res) => StepResult::failed(
            name,
            expected,
            StepError::UnexpectedStatus {
                expected,
                actual: res.status,
                body: res.body,
            },
            duration_ms,
        ),
        Err(err) => StepResult::failed(name, expected, err, duration_ms),
    }
}

/// POST auth/register. Some backends issue a token at registration, others
/// only at login; an absent token is not a failure here.
pub async fn register(client: &ApiClient, session: &mut Session, creds: &Credentials) -> StepResult {
    let body = json!({
        "username": creds.username,
        "email": creds.email,
        "password": creds.password,
    });
    let result = call(
        client,
        None,
        "Register User",
        Method::POST,
        "auth/register",
        201,
        Some(body),
    )
    .await;

    if result.success {
        if let Some(token) = extract_str(result.body.as_ref(), &["token"]) {
            session.auth_token = Some(token);
        }
        if let Some(id) = extract_str(result.body.as_ref(), ID_ALIASES) {
            session.user_id = Some(id);
        }
    }
    result
}

/// POST auth/login. A 200 without a token is useless to every downstream
/// step, so the token is mandatory.
pub async fn login(client: &ApiClient, session: &mut Session, creds: &Credentials) -> StepResult {
    let body = json!({ "email": creds.email, "password": creds.password });
    let result = call(client, None, "Login", Method::POST, "auth/login", 200, Some(body)).await;
    if !result.success {
        return result;
    }

    match extract_str(result.body.as_ref(), &["token"]) {
        Some(token) => {
            session.auth_token = Some(token);
            if let Some(id) = extract_str(result.body.as_ref(), ID_ALIASES) {
                session.user_id = Some(id);
            }
            result
        }
        None => missing_field(result, "token"),
    }
}

/// GET auth/me
pub async fn get_current_user(client: &ApiClient, session: &mut Session) -> StepResult {
    let result = call(
        client,
        session.token(),
        "Get Current User",
        Method::GET,
        "auth/me",
        200,
        None,
    )
    .await;

    if result.success {
        if let Some(id) = extract_str(result.body.as_ref(), ID_ALIASES) {
            session.user_id = Some(id);
        }
    }
    result
}

/// POST profile with the full structured payload
pub async fn create_profile(
    client: &ApiClient,
    session: &mut Session,
    profile: Value,
) -> StepResult {
    let result = call(
        client,
        session.token(),
        "Create Profile",
        Method::POST,
        "profile",
        201,
        Some(profile),
    )
    .await;

    if result.success {
        if let Some(id) = extract_str(result.body.as_ref(), ID_ALIASES) {
            session.profile_id = Some(id);
        }
    }
    result
}

/// GET profile/me — resolves via the token
pub async fn get_my_profile(client: &ApiClient, session: &Session) -> StepResult {
    call(
        client,
        session.token(),
        "Get My Profile",
        Method::GET,
        "profile/me",
        200,
        None,
    )
    .await
}

/// GET profile/:id — the orchestrator supplies an id extracted earlier
pub async fn get_profile_by_id(client: &ApiClient, session: &Session, id: &str) -> StepResult {
    call(
        client,
        session.token(),
        "Get Profile by ID",
        Method::GET,
        &format!("profile/{}", id),
        200,
        None,
    )
    .await
}

/// PUT profile — same payload shape as create
pub async fn update_profile(client: &ApiClient, session: &Session, profile: Value) -> StepResult {
    call(
        client,
        session.token(),
        "Update Profile",
        Method::PUT,
        "profile",
        200,
        Some(profile),
    )
    .await
}

/// POST chat/start. The chat id is mandatory: without it no chat-dependent
/// step can run.
pub async fn start_chat(
    client: &ApiClient,
    session: &mut Session,
    participant_id: &str,
) -> StepResult {
    let body = json!({ "participantId": participant_id });
    let result = call(
        client,
        session.token(),
        "Start New Chat",
        Method::POST,
        "chat/start",
        201,
        Some(body),
    )
    .await;
    if !result.success {
        return result;
    }

    match extract_str(result.body.as_ref(), ID_ALIASES) {
        Some(id) => {
            session.chat_id = Some(id);
            result
        }
        None => missing_field(result, "_id"),
    }
}

/// POST chat/:id/message
pub async fn send_message(
    client: &ApiClient,
    session: &Session,
    chat_id: &str,
    content: &str,
) -> StepResult {
    let body = json!({ "content": content });
    call(
        client,
        session.token(),
        "Send Message",
        Method::POST,
        &format!("chat/{}/message", chat_id),
        201,
        Some(body),
    )
    .await
}

/// GET chat/:id
pub async fn get_chat(client: &ApiClient, session: &Session, chat_id: &str) -> StepResult {
    call(
        client,
        session.token(),
        "Get Chat by ID",
        Method::GET,
        &format!("chat/{}", chat_id),
        200,
        None,
    )
    .await
}

/// GET chat
pub async fn get_all_chats(client: &ApiClient, session: &Session) -> StepResult {
    call(
        client,
        session.token(),
        "Get All Chats",
        Method::GET,
        "chat",
        200,
        None,
    )
    .await
}

/// POST suggestions. Backed by an external text-generation service that may
/// be absent in test environments; the orchestrator treats this step as
/// advisory.
pub async fn get_text_suggestions(
    client: &ApiClient,
    session: &Session,
    text: &str,
    style: Option<&str>,
) -> StepResult {
    let mut body = json!({ "text": text });
    if let Some(style) = style {
        body["style"] = json!(style);
    }
    call(
        client,
        session.token(),
        "Get Text Suggestions",
        Method::POST,
        "suggestions",
        200,
        Some(body),
    )
    .await
}

/// Profile payload used by the default scenario, shaped after the backend's
/// profile schema (nested contact info and social media links).
pub fn sample_profile() -> Value {
    json!({
        "fullName": "Test User",
        "bio": "I am a software developer",
        "skills": ["Python", "JavaScript"],
        "experience": [{
            "title": "Software Engineer",
            "company": "Test Company",
            "location": "Remote",
            "from": "2020-01-01",
            "to": "2024-01-01",
            "current": false,
            "description": "Test role"
        }],
        "education": [{
            "school": "Test University",
            "degree": "Bachelor's",
            "fieldOfStudy": "Computer Science",
            "from": "2016-01-01",
            "to": "2020-01-01",
            "current": false,
            "description": "Test education"
        }],
        "location": "Test City",
        "contactInfo": {
            "email": "test@example.com",
            "phone": "1234567890",
            "socialMedia": {
                "linkedin": "https://linkedin.com/test",
                "twitter": "https://twitter.com/test",
                "github": "https://github.com/test"
            }
        }
    })
}

/// Update payload for the same profile: amended bio and an extra skill
pub fn updated_profile() -> Value {
    let mut profile = sample_profile();
    profile["bio"] = json!("I am an experienced software developer");
    profile["skills"] = json!(["Python", "JavaScript", "React", "Node.js"]);
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_extraction_tries_known_aliases_in_order() {
        let mongo = ResponseBody::Json(json!({ "_id": "abc", "id": "other" }));
        assert_eq!(extract_str(Some(&mongo), ID_ALIASES).as_deref(), Some("abc"));

        let flat = ResponseBody::Json(json!({ "user_id": "u1" }));
        assert_eq!(extract_str(Some(&flat), ID_ALIASES).as_deref(), Some("u1"));

        let plain = ResponseBody::Json(json!({ "id": "p9" }));
        assert_eq!(extract_str(Some(&plain), ID_ALIASES).as_deref(), Some("p9"));
    }

    #[test]
    fn extraction_ignores_non_string_and_text_bodies() {
        let numeric = ResponseBody::Json(json!({ "id": 42 }));
        assert_eq!(extract_str(Some(&numeric), ID_ALIASES), None);

        let text = ResponseBody::Text("Server error".to_string());
        assert_eq!(extract_str(Some(&text), &["token"]), None);
        assert_eq!(extract_str(None, &["token"]), None);
    }

    #[test]
    fn missing_field_demotes_a_passing_result() {
        let result = StepResult::passed(
            "Login",
            200,
            200,
            ResponseBody::Json(json!({ "message": "ok" })),
            3,
        );
        let demoted = missing_field(result, "token");
        assert!(!demoted.success);
        assert_eq!(demoted.status, Some(200));
        assert!(demoted.error.as_deref().unwrap().contains("token"));
    }

    #[test]
    fn update_payload_keeps_create_shape() {
        let created = sample_profile();
        let updated = updated_profile();
        assert_eq!(created["fullName"], updated["fullName"]);
        assert_ne!(created["bio"], updated["bio"]);
        assert_eq!(updated["skills"].as_array().unwrap().len(), 4);
        assert!(updated["contactInfo"]["socialMedia"]["github"].is_string());
    }
}
