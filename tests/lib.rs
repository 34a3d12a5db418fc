//! Integration tests for the Opero library

use opero::agent::{AgentRequest, AgentService, ContextMap, TaskRequest, TaskStatus};
use serde_json::json;

fn params(value: serde_json::Value) -> ContextMap {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_library_structure() {
    use opero::OperoResult;

    let result: OperoResult<i32> = Ok(42);
    assert!(result.is_ok());
}

#[test]
fn test_config_default() {
    use opero::Config;

    let config = Config::default();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8000);
    assert!(config.seed_demo_data);
}

// ============================================================
// DISPATCHER
// ============================================================

#[test]
fn test_contact_keyword_wins_regardless_of_case() {
    let agent = AgentService::new();
    for message in ["CONTACT me", "email my Contacts", "schedule a call with a contact", "help: contact"] {
        let response = agent.process_request(&AgentRequest::new(1, message));
        assert_eq!(response.context["domain"], "contacts", "message: {}", message);
        assert_eq!(response.actions[0].action_type, "contact_search");
    }
}

#[test]
fn test_schedule_an_email_is_email() {
    let agent = AgentService::new();
    let response = agent.process_request(&AgentRequest::new(1, "schedule an email"));
    assert_eq!(response.context["domain"], "email");
    assert_eq!(response.actions[0].action_type, "email_analysis");
}

#[test]
fn test_unmatched_message_is_general() {
    let agent = AgentService::new();
    let response = agent.process_request(&AgentRequest::new(1, "xyz123"));
    assert_eq!(response.context["domain"], "general");
    assert!(response.actions.is_empty());
}

// ============================================================
// TASKS
// ============================================================

#[test]
fn test_contact_analysis_is_input_independent() {
    let agent = AgentService::new();
    let expected = json!([
        "Follow up with 3 inactive contacts",
        "Schedule quarterly review with top clients",
        "Update contact information for 5 contacts"
    ]);

    for p in [json!({}), json!({"company_filter": "Tech Corp"}), json!({"date_range": [1, 2]})] {
        let response = agent.execute_task(&TaskRequest::new("contact_analysis", params(p)));
        assert_eq!(response.status, TaskStatus::Completed);
        assert_eq!(response.result.unwrap()["recommendations"], expected);
    }
}

#[test]
fn test_email_draft_for_bob() {
    let agent = AgentService::new();
    let response = agent.execute_task(&TaskRequest::new(
        "email_draft",
        params(json!({"recipient": "Bob", "purpose": "renewal"})),
    ));
    assert_eq!(response.status, TaskStatus::Completed);
    let result = response.result.unwrap();
    assert!(result["subject"].as_str().unwrap().contains("renewal"));
    assert!(result["body"].as_str().unwrap().contains("Bob"));
}

#[test]
fn test_unknown_task_type() {
    let agent = AgentService::new();
    let response = agent.execute_task(&TaskRequest::new("foo", ContextMap::new()));
    assert_eq!(response.status, TaskStatus::Error);
    let result = serde_json::to_string(&response.result).unwrap();
    assert!(result.contains("Unknown task type: foo"));
}

#[test]
fn test_task_response_wire_shape() {
    let agent = AgentService::new();
    let response = agent.execute_task(&TaskRequest::new("meeting_schedule", ContextMap::new()));
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["status"], "completed");
    assert!(value["estimated_completion"].is_null());
    assert!(value["task_id"].as_str().unwrap().starts_with("task_"));
}

// ============================================================
// CONTEXT STORE
// ============================================================

#[test]
fn test_context_merge_is_union() {
    let agent = AgentService::new();
    agent.update_user_context(3, params(json!({"first": 1})));
    agent.update_user_context(3, params(json!({"second": 2})));

    let ctx = agent.user_context(3);
    assert_eq!(ctx["first"], 1);
    assert_eq!(ctx["second"], 2);
}

#[test]
fn test_shared_context_store() {
    use opero::ContextStore;
    use std::sync::Arc;

    let store = Arc::new(ContextStore::new());
    let a = AgentService::with_context_store(store.clone());
    let b = AgentService::with_context_store(store.clone());

    a.chat(&AgentRequest::new(4, "calendar please"));
    assert_eq!(b.user_context(4)["last_request"], "calendar please");
    assert_eq!(store.len(), 1);
}

#[test]
fn test_concurrent_chats_keep_every_user() {
    let agent = AgentService::new();
    let handles: Vec<_> = (0..8u64)
        .map(|user| {
            let agent = agent.clone();
            std::thread::spawn(move || {
                for i in 0..25 {
                    agent.chat(&AgentRequest::new(user, format!("message {}", i)));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(agent.context_store().len(), 8);
    for user in 0..8u64 {
        assert_eq!(agent.user_context(user)["last_request"], "message 24");
    }
}

// ============================================================
// HTTP API
// ============================================================

#[cfg(feature = "server")]
mod http {
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use opero::{Config, Opero};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(app: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn app() -> axum::Router {
        opero::server::router(Opero::new(Config::default()))
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_contact_crud() {
        let app = app();

        let (status, list) = call(&app, Method::GET, "/contacts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 3);

        let (status, created) = call(
            &app,
            Method::POST,
            "/contacts",
            Some(json!({"first_name": "Maya", "company": "Tech Corp"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["id"], 4);
        assert_eq!(created["is_active"], true);

        let (status, updated) = call(&app, Method::PUT, "/contacts/4", Some(json!({"position": "CTO"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["position"], "CTO");
        assert_eq!(updated["first_name"], "Maya");

        let (_, stats) = call(&app, Method::GET, "/contacts/stats/overview", None).await;
        assert_eq!(stats["total_contacts"], 4);
        assert_eq!(stats["contacts_by_company"]["Tech Corp"], 2);

        let (status, _) = call(&app, Method::DELETE, "/contacts/4", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&app, Method::GET, "/contacts/4", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Contact 4 not found");
    }

    #[tokio::test]
    async fn test_contact_search() {
        let (status, found) = call(&app(), Method::GET, "/contacts/search?company=studio", None).await;
        assert_eq!(status, StatusCode::OK);
        let found = found.as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["first_name"], "Jane");
    }

    #[tokio::test]
    async fn test_contact_search_trailing_slash_and_combined_filters() {
        let app = app();

        let (status, found) = call(&app, Method::GET, "/contacts/search/?company=studio", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found.as_array().unwrap().len(), 1);

        let (status, found) = call(&app, Method::GET, "/contacts/search?q=j&tags=client", None).await;
        assert_eq!(status, StatusCode::OK);
        let found = found.as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["first_name"], "John");

        let (_, none) = call(&app, Method::GET, "/contacts/search?q=jane&tags=client", None).await;
        assert!(none.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_contact() {
        let app = app();

        let (status, body) = call(&app, Method::PUT, "/contacts/42", Some(json!({"position": "CTO"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Contact 42 not found");

        let (status, body) = call(&app, Method::DELETE, "/contacts/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Contact 42 not found");
    }

    #[tokio::test]
    async fn test_update_with_null_clears_field() {
        let app = app();

        let (status, updated) = call(&app, Method::PUT, "/contacts/1", Some(json!({"email": null}))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(updated["email"].is_null());
        assert_eq!(updated["last_name"], "Doe");
    }

    #[tokio::test]
    async fn test_static_routes_respond() {
        let app = app();

        for uri in ["/", "/health", "/info", "/auth/status", "/monitoring/health", "/agent/analytics"] {
            let (status, body) = call(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::OK, "uri: {}", uri);
            assert!(body.is_object(), "uri: {}", uri);
        }

        let (_, info) = call(&app, Method::GET, "/info", None).await;
        assert_eq!(info["name"], "Opero");
        let (_, auth) = call(&app, Method::GET, "/auth/status", None).await;
        assert_eq!(auth["status"], "available");
        let (_, analytics) = call(&app, Method::GET, "/agent/analytics", None).await;
        assert_eq!(analytics["popular_features"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_error_status_mapping() {
        use axum::response::IntoResponse;
        use opero::OperoError;

        let cases = [
            (OperoError::ContactNotFound(1), StatusCode::NOT_FOUND),
            (OperoError::UnknownTaskType("foo".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (OperoError::InvalidInput("bad".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (OperoError::Configuration("bad".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_chat_then_context() {
        let app = app();

        let (status, reply) = call(
            &app,
            Method::POST,
            "/agent/chat",
            Some(json!({"user_id": 12, "message": "schedule an email"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["context"]["domain"], "email");
        assert_eq!(reply["actions"][0]["type"], "email_analysis");

        let (_, ctx) = call(&app, Method::GET, "/agent/context/12", None).await;
        assert_eq!(ctx["user_id"], 12);
        assert_eq!(ctx["context"]["last_request"], "schedule an email");
        assert_eq!(ctx["context"]["last_response"], reply["response"]);
    }

    #[tokio::test]
    async fn test_task_endpoint() {
        let app = app();

        let (status, task) = call(
            &app,
            Method::POST,
            "/agent/task",
            Some(json!({"task_type": "report_generation", "parameters": {"type": "contacts"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(task["status"], "completed");
        assert_eq!(task["result"]["title"], "Contact Management Report");

        let (status, task) = call(&app, Method::POST, "/agent/task", Some(json!({"task_type": "foo"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(task["status"], "error");
        assert_eq!(task["result"]["error"], "Unknown task type: foo");
    }

    #[tokio::test]
    async fn test_static_agent_endpoints() {
        let app = app();

        let (_, templates) = call(&app, Method::GET, "/agent/tasks/templates", None).await;
        assert_eq!(templates["templates"].as_array().unwrap().len(), 4);

        let (_, caps) = call(&app, Method::GET, "/agent/capabilities", None).await;
        assert_eq!(caps["capabilities"].as_array().unwrap().len(), 5);

        let (status, demo) = call(&app, Method::POST, "/agent/demo", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(demo["demo_conversation"].as_array().unwrap().len(), 4);

        let (_, monitoring) = call(&app, Method::GET, "/monitoring/health", None).await;
        assert_eq!(monitoring["checks"]["contacts"]["count"], 3);
    }
}
