// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course creation and listing tests.

use course_admin::config::Config;
use course_admin::error::ClientError;
use course_admin::flow::{AbortSignal, FlowStatus};
use course_admin::models::{NewCourse, SessionTokens};
use course_admin::services::{CourseListFlow, CreateCourseFlow};
use course_admin::session::{MemorySessionStore, SessionStore};
use course_admin::AdminClient;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{test_client, MockBackend, RecordingNotifier, Reply};

const COURSES: &str = "/api/v1/courses";

fn algebra() -> NewCourse {
    NewCourse {
        title: "Algebra".to_string(),
        subject: "Mathematics".to_string(),
        syllabus: "CBSE".to_string(),
        price: 1000,
    }
}

fn log_in(session: &dyn SessionStore, token: &str) {
    session
        .set(
            SessionTokens {
                access_token: token.to_string(),
                refresh_token: None,
            },
            None,
        )
        .unwrap();
}

#[tokio::test]
async fn test_create_course_server_error_field() {
    let backend = MockBackend::new();
    backend.respond("POST", COURSES, Reply::json(500, json!({ "error": "db down" })));
    let url = backend.spawn().await;
    let (client, session, _) = test_client(&url);
    log_in(session.as_ref(), "tok123");

    let flow = CreateCourseFlow::new(client.courses.clone());
    let result = flow.create_course(&algebra(), &AbortSignal::never()).await;

    assert!(result.is_none());
    assert_eq!(flow.state().error().as_deref(), Some("db down"));
    assert_eq!(flow.state().status(), FlowStatus::Rejected);
}

#[tokio::test]
async fn test_create_course_sends_bearer_and_json_body() {
    let backend = MockBackend::new();
    backend.respond(
        "POST",
        COURSES,
        Reply::json(201, json!({ "status": "success", "data": { "_id": "c1" } })),
    );
    let url = backend.spawn().await;
    let (client, session, _) = test_client(&url);
    log_in(session.as_ref(), "tok123");

    let response = client
        .courses
        .create_course(&algebra(), &AbortSignal::never())
        .await
        .unwrap();
    assert_eq!(response.data, Some(json!({ "_id": "c1" })));

    let requests = backend.requests();
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer tok123"));
    assert_eq!(
        requests[0].json,
        Some(json!({
            "title": "Algebra",
            "subject": "Mathematics",
            "syllabus": "CBSE",
            "price": 1000
        }))
    );
}

#[tokio::test]
async fn test_create_course_without_login_sends_bearer_null() {
    let backend = MockBackend::new();
    backend.respond("POST", COURSES, Reply::json(401, json!({ "message": "jwt malformed" })));
    let url = backend.spawn().await;
    let (client, session, _) = test_client(&url);

    let err = client
        .courses
        .create_course(&algebra(), &AbortSignal::never())
        .await
        .unwrap_err();

    assert_eq!(
        backend.requests()[0].authorization.as_deref(),
        Some("Bearer null")
    );
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "jwt malformed");
    // A 401 does not touch the session
    assert!(session.get().unwrap().is_none());
}

#[tokio::test]
async fn test_create_course_is_not_idempotent() {
    let backend = MockBackend::new();
    backend.respond(
        "POST",
        COURSES,
        Reply::json(201, json!({ "status": "success", "data": {} })).with_sequence_id(),
    );
    let url = backend.spawn().await;
    let (client, session, _) = test_client(&url);
    log_in(session.as_ref(), "tok123");

    let first = client
        .courses
        .create_course(&algebra(), &AbortSignal::never())
        .await
        .unwrap();
    let second = client
        .courses
        .create_course(&algebra(), &AbortSignal::never())
        .await
        .unwrap();

    assert_eq!(backend.requests().len(), 2);
    assert_ne!(first.data, second.data);
}

#[tokio::test]
async fn test_create_course_empty_success_body() {
    let backend = MockBackend::new();
    backend.respond("POST", COURSES, Reply::empty(201));
    let url = backend.spawn().await;
    let (client, _, _) = test_client(&url);

    let response = client
        .courses
        .create_course(&algebra(), &AbortSignal::never())
        .await
        .unwrap();
    assert!(response.data.is_none());
}

#[tokio::test]
async fn test_abort_in_flight_create() {
    let backend = MockBackend::new();
    backend.respond(
        "POST",
        COURSES,
        Reply::json(201, json!({ "data": {} })).delayed(Duration::from_secs(5)),
    );
    let url = backend.spawn().await;
    let (client, _, _) = test_client(&url);

    let flow = Arc::new(CreateCourseFlow::new(client.courses.clone()));
    let abort = AbortSignal::new();

    let pending = {
        let flow = flow.clone();
        let abort = abort.clone();
        tokio::spawn(async move { flow.create_course(&algebra(), &abort).await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(flow.state().loading());
    abort.abort();

    let result = tokio::time::timeout(Duration::from_secs(2), pending)
        .await
        .expect("abort should resolve promptly")
        .unwrap();

    assert!(result.is_none());
    assert_eq!(flow.state().status(), FlowStatus::Cancelled);
    assert_eq!(flow.state().error().as_deref(), Some("Request cancelled"));
    assert!(!flow.state().loading());
}

#[tokio::test]
async fn test_request_timeout_is_transport_error() {
    let backend = MockBackend::new();
    backend.respond(
        "POST",
        COURSES,
        Reply::json(201, json!({ "data": {} })).delayed(Duration::from_secs(3)),
    );
    let url = backend.spawn().await;

    let mut config = Config::test_default().with_api_url(&url).unwrap();
    config.request_timeout = Some(Duration::from_millis(200));
    let client = AdminClient::new(
        config,
        Arc::new(MemorySessionStore::new()),
        Arc::new(RecordingNotifier::default()),
    )
    .unwrap();

    let flow = CreateCourseFlow::new(client.courses.clone());
    let err = tokio::time::timeout(
        Duration::from_secs(2),
        client.courses.create_course(&algebra(), &AbortSignal::never()),
    )
    .await
    .expect("timeout should fire before the reply")
    .unwrap_err();

    match &err {
        ClientError::Transport(message) => assert!(!message.is_empty()),
        other => panic!("expected transport error, got {:?}", other),
    }

    // Same path through the flow: rejected, not cancelled
    assert!(flow.create_course(&algebra(), &AbortSignal::never()).await.is_none());
    assert_eq!(flow.state().status(), FlowStatus::Rejected);
    assert!(flow.state().error().is_some());
}

#[tokio::test]
async fn test_latest_invocation_owns_state() {
    let backend = MockBackend::new();
    backend.respond(
        "POST",
        COURSES,
        Reply::json(201, json!({ "data": { "_id": "slow" } })).delayed(Duration::from_millis(400)),
    );
    backend.respond("POST", COURSES, Reply::json(201, json!({ "data": { "_id": "fast" } })));
    let url = backend.spawn().await;
    let (client, _, _) = test_client(&url);

    let flow = Arc::new(CreateCourseFlow::new(client.courses.clone()));

    let slow = {
        let flow = flow.clone();
        tokio::spawn(async move { flow.create_course(&algebra(), &AbortSignal::never()).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let fast = flow
        .create_course(&algebra(), &AbortSignal::never())
        .await
        .unwrap();
    assert_eq!(fast.data, Some(json!({ "_id": "fast" })));

    // The slow call still resolves for its own caller
    let slow = slow.await.unwrap().unwrap();
    assert_eq!(slow.data, Some(json!({ "_id": "slow" })));

    let state = flow.state().snapshot();
    assert_eq!(state.data.unwrap().data, Some(json!({ "_id": "fast" })));
    assert_eq!(state.status, FlowStatus::Fulfilled);
}

#[tokio::test]
async fn test_list_courses() {
    let backend = MockBackend::new();
    backend.respond(
        "GET",
        COURSES,
        Reply::json(
            200,
            json!({
                "status": "success",
                "data": [
                    { "_id": "c1", "title": "Algebra", "subject": "Mathematics", "syllabus": "CBSE", "price": 1000 },
                    { "_id": "c2", "title": "Physics for WAEC", "subject": "Science", "syllabus": "IB" }
                ]
            }),
        ),
    );
    let url = backend.spawn().await;
    let (client, session, notifier) = test_client(&url);
    log_in(session.as_ref(), "tok123");

    let flow = CourseListFlow::new(client.courses.clone());
    let courses = flow.fetch(&AbortSignal::never()).await.unwrap();

    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].id.as_deref(), Some("c1"));
    assert_eq!(courses[0].title.as_deref(), Some("Algebra"));
    assert_eq!(courses[0].price, Some(1000));
    assert_eq!(courses[1].price, None);
    assert_eq!(backend.requests()[0].authorization.as_deref(), Some("Bearer tok123"));
    assert_eq!(notifier.successes(), vec!["Courses fetched successfully"]);
}

#[tokio::test]
async fn test_list_courses_missing_data_is_empty() {
    let backend = MockBackend::new();
    backend.respond("GET", COURSES, Reply::json(200, json!({ "status": "success" })));
    let url = backend.spawn().await;
    let (client, _, _) = test_client(&url);

    let courses = client
        .courses
        .list_courses(&AbortSignal::never())
        .await
        .unwrap();
    assert!(courses.is_empty());
}

#[tokio::test]
async fn test_list_courses_tolerates_null_fields() {
    let backend = MockBackend::new();
    backend.respond(
        "GET",
        COURSES,
        Reply::json(
            200,
            json!({
                "data": [
                    { "_id": "c1", "title": "Algebra", "subject": "Mathematics", "syllabus": null, "price": 1000 },
                    { "_id": "c2", "title": null, "subject": null, "syllabus": "IB", "price": null }
                ]
            }),
        ),
    );
    let url = backend.spawn().await;
    let (client, _, notifier) = test_client(&url);

    let flow = CourseListFlow::new(client.courses.clone());
    let courses = flow.fetch(&AbortSignal::never()).await.expect("listing should decode");

    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].syllabus, None);
    assert_eq!(courses[0].price, Some(1000));
    assert_eq!(courses[1].title, None);
    assert_eq!(courses[1].syllabus.as_deref(), Some("IB"));
    assert!(notifier.errors().is_empty());
}

#[tokio::test]
async fn test_list_courses_failure_notifies() {
    let backend = MockBackend::new();
    backend.respond("GET", COURSES, Reply::json(500, json!({})));
    let url = backend.spawn().await;
    let (client, _, notifier) = test_client(&url);

    let flow = CourseListFlow::new(client.courses.clone());
    assert!(flow.fetch(&AbortSignal::never()).await.is_none());

    assert_eq!(
        notifier.errors(),
        vec!["Request failed with status code 500"]
    );
    assert!(notifier.successes().is_empty());
}
