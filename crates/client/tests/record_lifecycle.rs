//! Integration tests for save, reload and delete of domain objects.

mod support;

use chrono::Duration;
use kelvin_client::Record;
use kelvin_domain::{KelvinError, Operation, Role, School, SchoolClass, User, WorkGroup};
use serde_json::json;
use support::{class_json, jwt, mount_token, school_json, user_json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn first_save_posts_and_second_save_puts_to_returned_url() {
    let server = MockServer::start().await;
    mount_token(&server, &jwt(Duration::minutes(30)), 1).await;
    let created = user_json(&server, "demo_student", "DEMOSCHOOL");
    Mock::given(method("POST"))
        .and(path("/v1/users/"))
        .and(body_partial_json(json!({
            "name": "demo_student",
            "school": support::url(&server, "schools/DEMOSCHOOL"),
            "schools": [support::url(&server, "schools/DEMOSCHOOL")],
            "roles": [support::url(&server, "roles/student")],
            "password": "Univention.99",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .expect(1)
        .mount(&server)
        .await;
    let mut updated = created.clone();
    updated["lastname"] = json!("Renamed");
    Mock::given(method("PUT"))
        .and(path("/v1/users/demo_student"))
        .and(body_partial_json(json!({"lastname": "Renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(&updated))
        .expect(1)
        .mount(&server)
        .await;

    let session = support::session(&server);
    let mut user = User::new("demo_student", "DEMOSCHOOL");
    user.roles = vec!["student".into()];
    user.password = Some("Univention.99".into());
    let mut record = Record::new(session, user);

    record.save().await.expect("create");
    assert_eq!(record.url(), Some(support::url(&server, "users/demo_student").as_str()));
    assert!(record.dn().is_some());
    assert!(!record.is_fresh());
    assert_eq!(record.password, None);

    record.lastname = Some("Renamed".into());
    record.save().await.expect("modify");
    assert_eq!(record.lastname.as_deref(), Some("Renamed"));

    let requests = server.received_requests().await.unwrap();
    let post = requests.iter().find(|request| request.method.as_str() == "POST" && request.url.path() == "/v1/users/").unwrap();
    let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
    assert!(body.get("dn").is_none());
    assert!(body.get("url").is_none());
    assert!(body.get("email").is_none());
    assert!(body.get("ucsschool_roles").is_none());
}

#[tokio::test]
async fn save_then_reload_yields_server_values() {
    let server = MockServer::start().await;
    mount_token(&server, &jwt(Duration::minutes(30)), 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/classes/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(class_json(&server, "DEMOSCHOOL", "1a", &["anton"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/classes/DEMOSCHOOL/1a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(class_json(&server, "DEMOSCHOOL", "1a", &["anton", "berta"])))
        .expect(1)
        .mount(&server)
        .await;

    let session = support::session(&server);
    let mut class = Record::new(session, SchoolClass::new("DEMOSCHOOL", "1a"));
    class.users = vec!["anton".into()];
    class.save().await.expect("create");
    assert_eq!(class.description.as_deref(), Some("A school class"));
    assert_eq!(class.ucsschool_roles, vec!["school_class:school:DEMOSCHOOL".to_string()]);

    class.reload().await.expect("reload");
    assert!(class.is_fresh());
    assert_eq!(class.users, vec!["anton".to_string(), "berta".to_string()]);
}

#[tokio::test]
async fn reload_uses_identity_of_last_sync() {
    let server = MockServer::start().await;
    mount_token(&server, &jwt(Duration::minutes(30)), 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/users/demo_student"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(&server, "demo_student", "DEMOSCHOOL")))
        .expect(2)
        .mount(&server)
        .await;

    let session = support::session(&server);
    let mut user = session
        .resource::<User>()
        .get(&kelvin_domain::Identity::name("demo_student"))
        .await
        .expect("user");
    user.name = "renamed_locally".into();
    user.reload().await.expect("reload");
    assert_eq!(user.name, "demo_student");
}

#[tokio::test]
async fn delete_twice_sends_one_request() {
    let server = MockServer::start().await;
    mount_token(&server, &jwt(Duration::minutes(30)), 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/workgroups/DEMOSCHOOL/chess"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "chess",
            "school": support::url(&server, "schools/DEMOSCHOOL"),
            "dn": "cn=DEMOSCHOOL-chess,cn=schueler,cn=groups,ou=DEMOSCHOOL,dc=example,dc=test",
            "url": support::url(&server, "workgroups/DEMOSCHOOL/chess"),
            "users": [],
            "create_share": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/workgroups/DEMOSCHOOL/chess"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let session = support::session(&server);
    let mut group = session
        .resource::<WorkGroup>()
        .get(&kelvin_domain::Identity::school_name("DEMOSCHOOL", "chess"))
        .await
        .expect("workgroup");
    assert!(!group.create_share);

    group.delete().await.expect("first delete");
    assert!(group.is_deleted());
    group.delete().await.expect("second delete is a no-op");
    assert_eq!(group.name, "chess");

    assert!(matches!(group.save().await, Err(KelvinError::State(_))));
}

#[tokio::test]
async fn type_restrictions_are_enforced_without_requests() {
    let server = MockServer::start().await;
    mount_token(&server, &jwt(Duration::minutes(30)), 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/schools/DEMOSCHOOL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(school_json(&server, "DEMOSCHOOL")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/roles/teacher"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "teacher",
            "display_name": "Teacher",
            "url": support::url(&server, "roles/teacher")
        })))
        .mount(&server)
        .await;

    let session = support::session(&server);
    let mut school = session
        .resource::<School>()
        .get(&kelvin_domain::Identity::name("DEMOSCHOOL"))
        .await
        .expect("school");
    assert!(matches!(
        school.save().await,
        Err(KelvinError::Unsupported { operation: Operation::Modify, .. })
    ));
    assert!(matches!(
        school.delete().await,
        Err(KelvinError::Unsupported { operation: Operation::Delete, .. })
    ));

    let mut role = session
        .resource::<Role>()
        .get(&kelvin_domain::Identity::name("teacher"))
        .await
        .expect("role");
    assert!(role.dn().is_none());
    assert!(matches!(role.delete().await, Err(KelvinError::Unsupported { .. })));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|request| request.method.as_str() == "GET" || request.url.path() == "/token"));
}

#[tokio::test]
async fn moving_a_class_to_another_school_propagates_server_error() {
    let server = MockServer::start().await;
    mount_token(&server, &jwt(Duration::minutes(30)), 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/classes/DEMOSCHOOL/1a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(class_json(&server, "DEMOSCHOOL", "1a", &[])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/classes/DEMOSCHOOL/1a"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": "Moving of class to other school is not allowed."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = support::session(&server);
    let mut class = session
        .resource::<SchoolClass>()
        .get(&kelvin_domain::Identity::school_name("DEMOSCHOOL", "1a"))
        .await
        .expect("class");
    class.school = "OTHERSCHOOL".into();
    let err = class.save().await.unwrap_err();
    assert!(matches!(err, KelvinError::InvalidRequest { status: Some(422), .. }));
    assert!(class.is_fresh());
}
