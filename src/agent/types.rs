//! Core types for the agent module

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of the user talking to the agent
pub type UserId = u64;

/// Free-form key/value mapping carried in requests, responses and user context
pub type ContextMap = Map<String, Value>;

/// Identifier of an executed task
pub type TaskId = String;

fn default_agent_type() -> String {
    "general".to_string()
}

fn default_priority() -> String {
    "medium".to_string()
}

/// A chat message addressed to the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRequest {
    pub user_id: UserId,
    pub message: String,
    #[serde(default)]
    pub context: Option<ContextMap>,
    #[serde(default = "default_agent_type")]
    pub agent_type: String,
}

impl AgentRequest {
    pub fn new(user_id: UserId, message: impl Into<String>) -> Self {
        Self {
            user_id,
            message: message.into(),
            context: None,
            agent_type: default_agent_type(),
        }
    }

    pub fn with_agent_type(mut self, agent_type: impl Into<String>) -> Self {
        self.agent_type = agent_type.into();
        self
    }
}

/// A step the agent reports having taken while answering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub description: String,
    pub status: String,
}

impl AgentAction {
    pub fn completed(action_type: &str, description: &str) -> Self {
        Self {
            action_type: action_type.to_string(),
            description: description.to_string(),
            status: "completed".to_string(),
        }
    }
}

/// The agent's answer to an [`AgentRequest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub response: String,
    #[serde(default)]
    pub actions: Vec<AgentAction>,
    #[serde(default)]
    pub context: ContextMap,
    pub timestamp: DateTime<Utc>,
}

/// A request to run one of the task generators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRequest {
    pub task_type: String,
    #[serde(default)]
    pub parameters: ContextMap,
    /// Informational only; never consulted when dispatching
    #[serde(default = "default_priority")]
    pub priority: String,
}

impl TaskRequest {
    pub fn new(task_type: impl Into<String>, parameters: ContextMap) -> Self {
        Self {
            task_type: task_type.into(),
            parameters,
            priority: default_priority(),
        }
    }
}

/// Outcome tag of a task
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Completed,
    Error,
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Completed => "completed",
            TaskStatus::Error => "error",
        }
    }
}

/// Result of executing a [`TaskRequest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub result: Option<ContextMap>,
    /// Always `None`; kept so clients see a stable shape
    pub estimated_completion: Option<DateTime<Utc>>,
}

/// One exchange from the scripted demo conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoExchange {
    pub request: String,
    pub response: String,
    pub actions: Vec<AgentAction>,
}
