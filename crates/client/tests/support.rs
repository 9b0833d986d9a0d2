//! Shared helpers for the client integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use kelvin_client::{Session, SessionConfig};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USERNAME: &str = "kelvin-admin";
pub const PASSWORD: &str = "correct horse battery staple";

/// Unsigned compact JWT whose `exp` claim lies `valid_for` from now.
pub fn jwt(valid_for: Duration) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = json!({ "sub": USERNAME, "exp": (Utc::now() + valid_for).timestamp() });
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

pub fn token_response(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "access_token": token, "token_type": "bearer" }))
}

/// Token endpoint issuing `token` and expecting exactly `times` exchanges.
pub async fn mount_token(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("username=kelvin-admin"))
        .respond_with(token_response(token))
        .expect(times)
        .mount(server)
        .await;
}

pub fn config(server: &MockServer) -> SessionConfig {
    SessionConfig::builder("kelvin.test", USERNAME, PASSWORD).base_url(server.uri()).build()
}

/// Open session against the mock server.
pub fn session(server: &MockServer) -> Arc<Session> {
    Session::connect(config(server)).expect("session should open")
}

pub fn url(server: &MockServer, tail: &str) -> String {
    format!("{}/v1/{tail}", server.uri())
}

pub fn school_json(server: &MockServer, name: &str) -> Value {
    json!({
        "name": name,
        "dn": format!("ou={name},dc=example,dc=test"),
        "url": url(server, &format!("schools/{name}")),
        "display_name": format!("School {name}"),
        "educational_servers": [format!("dc-{name}")],
        "administrative_servers": [],
        "class_share_file_server": null,
        "home_share_file_server": null,
        "ucsschool_roles": [format!("school:school:{name}")],
        "udm_properties": {}
    })
}

pub fn class_json(server: &MockServer, school: &str, name: &str, users: &[&str]) -> Value {
    json!({
        "name": name,
        "school": url(server, &format!("schools/{school}")),
        "dn": format!("cn={school}-{name},cn=klassen,ou={school},dc=example,dc=test"),
        "url": url(server, &format!("classes/{school}/{name}")),
        "description": "A school class",
        "users": users.iter().map(|user| url(server, &format!("users/{user}"))).collect::<Vec<_>>(),
        "ucsschool_roles": [format!("school_class:school:{school}")],
        "udm_properties": {}
    })
}

pub fn user_json(server: &MockServer, name: &str, school: &str) -> Value {
    json!({
        "name": name,
        "school": url(server, &format!("schools/{school}")),
        "schools": [url(server, &format!("schools/{school}"))],
        "dn": format!("uid={name},cn=schueler,cn=users,ou={school},dc=example,dc=test"),
        "url": url(server, &format!("users/{name}")),
        "firstname": "Demo",
        "lastname": "Student",
        "birthday": "2010-04-01",
        "disabled": false,
        "email": null,
        "expiration_date": null,
        "record_uid": format!("{name}-uid"),
        "source_uid": "TESTID",
        "roles": [url(server, "roles/student")],
        "school_classes": { school: ["1a"] },
        "workgroups": {},
        "ucsschool_roles": [format!("student:school:{school}")],
        "udm_properties": {}
    })
}
