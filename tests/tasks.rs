mod common;

use std::net::TcpListener;

use actix_web::http::StatusCode;
use actix_web::{rt, test, web, App, HttpServer};
use pretty_assertions::assert_eq;
use serde_json::json;
use tazky::models::Task;
use tazky::routes;
use tazky::tasks::DeletedTask;

#[actix_rt::test]
async fn test_task_crud_scenario() {
    let (state, _store) = common::state();
    let app = test::init_service(App::new().app_data(state).configure(routes::config)).await;
    let login = common::register_and_login(&app, "A", "a@x.com", "p")
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/tasks")
        .insert_header(common::bearer(&login.token))
        .set_json(json!({ "title": "buy milk" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let created: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(status, StatusCode::CREATED, "Create task failed. Body: {}", created);
    assert_eq!(
        created,
        json!({ "id": 1, "title": "buy milk", "completed": false, "owner": "a@x.com" })
    );

    let req = test::TestRequest::patch()
        .uri("/tasks/1")
        .insert_header(common::bearer(&login.token))
        .set_json(json!({ "completed": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Task = test::read_body_json(resp).await;
    assert!(updated.completed);
    assert_eq!(updated.title, "buy milk");

    let req = test::TestRequest::delete()
        .uri("/tasks/1")
        .insert_header(common::bearer(&login.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: DeletedTask = test::read_body_json(resp).await;
    assert_eq!(deleted.message, "Task deleted");
    assert_eq!(deleted.deleted, updated);

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header(common::bearer(&login.token))
        .to_request();
    let tasks: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tasks, json!([]));

    let req = test::TestRequest::delete()
        .uri("/tasks/1")
        .insert_header(common::bearer(&login.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_tasks_require_a_valid_token() {
    let (state, store) = common::state();
    let app = test::init_service(App::new().app_data(state).configure(routes::config)).await;

    let requests = vec![
        test::TestRequest::get().uri("/tasks"),
        test::TestRequest::post()
            .uri("/tasks")
            .set_json(json!({ "title": "sneaky" })),
        test::TestRequest::patch()
            .uri("/tasks/1")
            .set_json(json!({ "completed": true })),
        test::TestRequest::delete().uri("/tasks/1"),
        test::TestRequest::post()
            .uri("/tasks")
            .insert_header(common::bearer("not.a.token"))
            .set_json(json!({ "title": "sneaky" })),
        test::TestRequest::post()
            .uri("/tasks")
            .insert_header(("Authorization", "Token abc"))
            .set_json(json!({ "title": "sneaky" })),
    ];

    for req in requests {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    assert_eq!(store.task_count().await, 0, "no task may be stored without a token");
}

#[actix_rt::test]
async fn test_missing_token_wins_over_bad_body() {
    let (state, _store) = common::state();
    let app = test::init_service(App::new().app_data(state).configure(routes::config)).await;

    let req = test::TestRequest::post()
        .uri("/tasks")
        .set_json(json!({ "title": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No token provided");
}

#[actix_rt::test]
async fn test_task_input_validation() {
    let (state, _store) = common::state();
    let app = test::init_service(App::new().app_data(state).configure(routes::config)).await;
    let login = common::register_and_login(&app, "A", "a@x.com", "p")
        .await
        .unwrap();

    for payload in [json!({ "title": "" }), json!({ "title": "   " }), json!({})] {
        let req = test::TestRequest::post()
            .uri("/tasks")
            .insert_header(common::bearer(&login.token))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {}", payload);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Title is required");
    }

    let req = test::TestRequest::post()
        .uri("/tasks")
        .insert_header(common::bearer(&login.token))
        .set_json(json!({ "title": "  padded  " }))
        .to_request();
    let task: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(task.title, "padded");

    for payload in [json!({}), json!({ "completed": true, "title": "both" })] {
        let req = test::TestRequest::patch()
            .uri(&format!("/tasks/{}", task.id))
            .insert_header(common::bearer(&login.token))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {}", payload);
    }

    let req = test::TestRequest::patch()
        .uri(&format!("/tasks/{}", task.id))
        .insert_header(common::bearer(&login.token))
        .set_json(json!({ "title": "renamed" }))
        .to_request();
    let renamed: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(renamed.title, "renamed");
    assert_eq!(renamed.id, task.id);
    assert!(!renamed.completed);

    let req = test::TestRequest::patch()
        .uri("/tasks/999")
        .insert_header(common::bearer(&login.token))
        .set_json(json!({ "completed": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_unparseable_task_id_is_not_found() {
    let (state, _store) = common::state();
    let app = test::init_service(App::new().app_data(state).configure(routes::config)).await;
    let login = common::register_and_login(&app, "A", "a@x.com", "p")
        .await
        .unwrap();

    let requests = vec![
        test::TestRequest::delete().uri("/tasks/abc"),
        test::TestRequest::delete().uri("/tasks/99999999999"),
        test::TestRequest::patch()
            .uri("/tasks/abc")
            .set_json(json!({ "completed": true })),
    ];

    for req in requests {
        let resp = test::call_service(
            &app,
            req.insert_header(common::bearer(&login.token)).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Task not found" }));
    }
}

#[actix_rt::test]
async fn test_patch_breaking_both_rules_gets_a_stable_message() {
    let (state, _store) = common::state();
    let app = test::init_service(App::new().app_data(state).configure(routes::config)).await;
    let login = common::register_and_login(&app, "A", "a@x.com", "p")
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/tasks")
        .insert_header(common::bearer(&login.token))
        .set_json(json!({ "title": "buy milk" }))
        .to_request();
    let task: Task = test::call_and_read_body_json(&app, req).await;

    for _ in 0..20 {
        let req = test::TestRequest::patch()
            .uri(&format!("/tasks/{}", task.id))
            .insert_header(common::bearer(&login.token))
            .set_json(json!({ "completed": true, "title": " " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Provide either completed or title");
    }
}

#[actix_rt::test]
async fn test_tasks_are_scoped_to_their_owner() {
    let (state, _store) = common::state();
    let app = test::init_service(App::new().app_data(state).configure(routes::config)).await;
    let alice = common::register_and_login(&app, "Alice", "alice@x.com", "pa")
        .await
        .unwrap();
    let bob = common::register_and_login(&app, "Bob", "bob@x.com", "pb")
        .await
        .unwrap();

    let mut alice_ids = Vec::new();
    for title in ["first", "second"] {
        let req = test::TestRequest::post()
            .uri("/tasks")
            .insert_header(common::bearer(&alice.token))
            .set_json(json!({ "title": title }))
            .to_request();
        let task: Task = test::call_and_read_body_json(&app, req).await;
        assert_eq!(task.owner, "alice@x.com");
        alice_ids.push(task.id);
    }

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header(common::bearer(&alice.token))
        .to_request();
    let listed: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    let listed_ids: Vec<i32> = listed.iter().map(|t| t.id).collect();
    assert_eq!(listed_ids, vec![alice_ids[1], alice_ids[0]]);

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header(common::bearer(&bob.token))
        .to_request();
    let listed: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert!(listed.is_empty());

    let req = test::TestRequest::patch()
        .uri(&format!("/tasks/{}", alice_ids[0]))
        .insert_header(common::bearer(&bob.token))
        .set_json(json!({ "completed": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/tasks/{}", alice_ids[0]))
        .insert_header(common::bearer(&bob.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header(common::bearer(&alice.token))
        .to_request();
    let listed: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|t| !t.completed));
}

#[actix_rt::test]
async fn test_create_task_unauthorized_over_http() {
    let (state, _store) = common::state();

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes::config)
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let handle = server.handle();
    rt::spawn(server);

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/tasks", port))
        .json(&json!({ "title": "Unauthorized Task" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
    let body: serde_json::Value = resp.json().await.expect("JSON error body");
    assert_eq!(body["message"], "No token provided");

    handle.stop(false).await;
}

#[actix_rt::test]
async fn test_health_reports_store_status() {
    let (state, _store) = common::state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::clone(&state))
            .configure(routes::config),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
}
