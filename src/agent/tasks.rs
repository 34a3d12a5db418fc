//! Task generators
//!
//! Each known task type maps to a pure function over the request parameters
//! that fills a fixed template.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{json, Value};

use super::types::{ContextMap, TaskId, TaskRequest, TaskResponse, TaskStatus};
use crate::error::OperoError;

/// Known task types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    ContactAnalysis,
    EmailDraft,
    MeetingSchedule,
    ReportGeneration,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        TaskKind::ContactAnalysis,
        TaskKind::EmailDraft,
        TaskKind::MeetingSchedule,
        TaskKind::ReportGeneration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::ContactAnalysis => "contact_analysis",
            TaskKind::EmailDraft => "email_draft",
            TaskKind::MeetingSchedule => "meeting_schedule",
            TaskKind::ReportGeneration => "report_generation",
        }
    }

    /// Run the generator for this kind
    pub fn run(&self, params: &ContextMap) -> ContextMap {
        let value = match self {
            TaskKind::ContactAnalysis => analyze_contacts(),
            TaskKind::EmailDraft => draft_email(params),
            TaskKind::MeetingSchedule => schedule_meeting(params),
            TaskKind::ReportGeneration => generate_report(params),
        };
        match value {
            Value::Object(map) => map,
            _ => ContextMap::new(),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = OperoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| OperoError::UnknownTaskType(s.to_string()))
    }
}

/// Fresh task identifier
pub fn new_task_id() -> TaskId {
    format!("task_{}", uuid::Uuid::new_v4().simple())
}

/// Execute a task request. Unknown task types come back as an error-tagged response.
pub fn execute(request: &TaskRequest) -> TaskResponse {
    let task_id = new_task_id();

    match request.task_type.parse::<TaskKind>() {
        Ok(kind) => {
            tracing::debug!(%task_id, task_type = kind.as_str(), "Executing task");
            TaskResponse {
                task_id,
                status: TaskStatus::Completed,
                result: Some(kind.run(&request.parameters)),
                estimated_completion: None,
            }
        }
        Err(e) => {
            tracing::warn!(%task_id, "{}", e);
            let mut result = ContextMap::new();
            result.insert("error".to_string(), Value::String(e.to_string()));
            TaskResponse {
                task_id,
                status: TaskStatus::Error,
                result: Some(result),
                estimated_completion: None,
            }
        }
    }
}

/// Render a parameter as display text, falling back to `default` when absent
fn param_text(params: &ContextMap, key: &str, default: &str) -> String {
    match params.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(other) => other.to_string(),
    }
}

fn analyze_contacts() -> Value {
    json!({
        "total_contacts": 50,
        "top_companies": ["Tech Corp", "Design Studio", "Innovation Labs"],
        "contact_growth": "+15% this month",
        "engagement_score": 8.5,
        "recommendations": [
            "Follow up with 3 inactive contacts",
            "Schedule quarterly review with top clients",
            "Update contact information for 5 contacts"
        ]
    })
}

fn draft_email(params: &ContextMap) -> Value {
    let recipient = param_text(params, "recipient", "Contact");
    let purpose = param_text(params, "purpose", "follow-up");

    let body = format!(
        "Dear {recipient},\n\n\
         I hope this email finds you well. I wanted to follow up on our recent conversation regarding {purpose}.\n\n\
         Key points to discuss:\n\
         • Next steps for our collaboration\n\
         • Timeline and deliverables\n\
         • Any questions or concerns\n\n\
         Please let me know when would be a good time for a brief call to discuss this further.\n\n\
         Best regards,\n\
         Your AI Assistant"
    );

    json!({
        "subject": format!("Following up on our conversation - {purpose}"),
        "body": body,
        "suggested_send_time": "Tomorrow at 10:00 AM"
    })
}

fn schedule_meeting(params: &ContextMap) -> Value {
    let participant = param_text(params, "participant", "Contact");
    let duration = param_text(params, "duration", "30");

    json!({
        "title": format!("Meeting with {participant}"),
        "duration": format!("{duration} minutes"),
        "suggested_times": [
            "Tomorrow 2:00 PM - 2:30 PM",
            "Thursday 10:00 AM - 10:30 AM",
            "Friday 3:00 PM - 3:30 PM"
        ],
        "agenda": [
            "Project status update",
            "Next milestone planning",
            "Resource allocation",
            "Q&A session"
        ],
        "meeting_link": "https://meet.opero.ai/room/12345"
    })
}

fn generate_report(params: &ContextMap) -> Value {
    if param_text(params, "type", "summary") == "contacts" {
        json!({
            "title": "Contact Management Report",
            "period": "Last 30 days",
            "metrics": {
                "new_contacts": 12,
                "meetings_scheduled": 8,
                "emails_sent": 45,
                "response_rate": "78%"
            },
            "insights": [
                "Contact acquisition up 25% from last month",
                "Response rates improved with personalized messaging",
                "Tech industry contacts showing highest engagement"
            ],
            "action_items": [
                "Follow up with 5 pending prospects",
                "Schedule quarterly business reviews",
                "Update CRM with latest contact information"
            ]
        })
    } else {
        json!({
            "title": "Business Summary Report",
            "kpis": {
                "productivity_score": 85,
                "automation_efficiency": 92,
                "user_satisfaction": 4.6
            }
        })
    }
}

/// Description of a task type for clients building requests
#[derive(Debug, Clone, Serialize)]
pub struct TaskTemplate {
    #[serde(rename = "type")]
    pub task_type: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [&'static str],
}

pub fn task_templates() -> Vec<TaskTemplate> {
    TaskKind::ALL
        .into_iter()
        .map(|kind| match kind {
            TaskKind::ContactAnalysis => TaskTemplate {
                task_type: kind.as_str(),
                name: "Contact Analysis Report",
                description: "Analyze contact patterns and generate insights",
                parameters: &["date_range", "company_filter"],
            },
            TaskKind::EmailDraft => TaskTemplate {
                task_type: kind.as_str(),
                name: "Email Draft Generator",
                description: "Generate professional email drafts",
                parameters: &["recipient", "purpose", "tone"],
            },
            TaskKind::MeetingSchedule => TaskTemplate {
                task_type: kind.as_str(),
                name: "Smart Meeting Scheduler",
                description: "Schedule meetings with intelligent suggestions",
                parameters: &["participant", "duration", "urgency"],
            },
            TaskKind::ReportGeneration => TaskTemplate {
                task_type: kind.as_str(),
                name: "Business Report Generator",
                description: "Generate comprehensive business reports",
                parameters: &["type", "period", "metrics"],
            },
        })
        .collect()
}
