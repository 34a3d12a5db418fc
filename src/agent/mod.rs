//! Rule-based business assistant
//!
//! This module provides:
//! - **Dispatcher**: keyword classification of chat messages into canned answers
//! - **Tasks**: templated drafts and reports keyed by task type
//! - **Context**: per-user memory of the latest exchange
//! - **AgentService**: entry point combining all three
//!
//! # Example
//!
//! ```rust
//! use opero::agent::{AgentRequest, AgentService};
//!
//! let agent = AgentService::new();
//! let reply = agent.chat(&AgentRequest::new(7, "Schedule an email to Bob"));
//! assert_eq!(reply.context["domain"], "email");
//! assert_eq!(agent.user_context(7)["last_request"], "Schedule an email to Bob");
//! ```

pub mod types;
pub mod dispatcher;
pub mod tasks;
pub mod context;

pub use types::{
    AgentAction, AgentRequest, AgentResponse, ContextMap, DemoExchange, TaskId, TaskRequest,
    TaskResponse, TaskStatus, UserId,
};
pub use dispatcher::{Domain, CAPABILITIES};
pub use tasks::{task_templates, TaskKind, TaskTemplate};
pub use context::ContextStore;

use std::sync::Arc;
use serde_json::Value;
use tracing::instrument;

/// User id the scripted demo conversation runs under
pub const DEMO_USER_ID: UserId = 999;

const DEMO_PROMPTS: &[&str] = &[
    "Help me manage my contacts",
    "I need to schedule a meeting",
    "Can you help me with email automation?",
    "What are your capabilities?",
];

/// Agent entry point
///
/// Cheap to clone; clones share the same context store.
#[derive(Clone, Default)]
pub struct AgentService {
    context: Arc<ContextStore>,
}

impl AgentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a service over an existing context store
    pub fn with_context_store(context: Arc<ContextStore>) -> Self {
        Self { context }
    }

    /// Capabilities advertised by the agent
    pub fn capabilities(&self) -> &'static [&'static str] {
        CAPABILITIES
    }

    /// Classify and answer a request without touching user context
    pub fn process_request(&self, request: &AgentRequest) -> AgentResponse {
        dispatcher::dispatch(request)
    }

    /// Answer a request and record the exchange in the user's context
    #[instrument(skip(self, request), fields(user_id = request.user_id))]
    pub fn chat(&self, request: &AgentRequest) -> AgentResponse {
        let response = self.process_request(request);

        let mut update = ContextMap::new();
        update.insert("last_request".to_string(), Value::String(request.message.clone()));
        update.insert("last_response".to_string(), Value::String(response.response.clone()));
        update.insert("timestamp".to_string(), Value::String(response.timestamp.to_rfc3339()));
        self.context.merge(request.user_id, update);

        tracing::info!(actions = response.actions.len(), "Chat message answered");
        response
    }

    /// Run one of the task generators
    #[instrument(skip(self, request), fields(task_type = %request.task_type))]
    pub fn execute_task(&self, request: &TaskRequest) -> TaskResponse {
        tasks::execute(request)
    }

    /// Stored context for a user, empty if none
    pub fn user_context(&self, user_id: UserId) -> ContextMap {
        self.context.get(user_id)
    }

    /// Shallow-merge keys into a user's context
    pub fn update_user_context(&self, user_id: UserId, update: ContextMap) {
        self.context.merge(user_id, update);
    }

    /// Replay the scripted demo prompts. Does not record context.
    pub fn demo_conversation(&self) -> Vec<DemoExchange> {
        DEMO_PROMPTS
            .iter()
            .map(|prompt| {
                let request = AgentRequest::new(DEMO_USER_ID, *prompt).with_agent_type("demo");
                let response = self.process_request(&request);
                DemoExchange {
                    request: prompt.to_string(),
                    response: response.response,
                    actions: response.actions,
                }
            })
            .collect()
    }

    pub fn context_store(&self) -> &Arc<ContextStore> {
        &self.context
    }
}
