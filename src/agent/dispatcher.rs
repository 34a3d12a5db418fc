//! Keyword dispatch of chat messages
//!
//! A message is lower-cased and tested against an ordered route table. The
//! first route with a keyword contained in the message decides the domain.
//! Order matters: "schedule an email" lands on email because email is checked
//! before calendar.

use chrono::Utc;
use serde_json::{json, Value};

use super::types::{AgentAction, AgentRequest, AgentResponse, ContextMap};

/// Capabilities the agent advertises
pub const CAPABILITIES: &[&str] = &[
    "contact_management",
    "email_automation",
    "calendar_scheduling",
    "document_generation",
    "data_analysis",
];

/// Response domain a message is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Contacts,
    Email,
    Calendar,
    Help,
    General,
}

struct Route {
    domain: Domain,
    keywords: &'static [&'static str],
}

const ROUTES: &[Route] = &[
    Route { domain: Domain::Contacts, keywords: &["contact"] },
    Route { domain: Domain::Email, keywords: &["email"] },
    Route { domain: Domain::Calendar, keywords: &["calendar", "schedule"] },
    Route { domain: Domain::Help, keywords: &["help", "capabilities"] },
];

impl Domain {
    pub fn as_str(&self) -> &str {
        match self {
            Domain::Contacts => "contacts",
            Domain::Email => "email",
            Domain::Calendar => "calendar",
            Domain::Help => "help",
            Domain::General => "general",
        }
    }

    /// Classify a message; falls back to [`Domain::General`]
    pub fn classify(message: &str) -> Domain {
        let message = message.to_lowercase();
        ROUTES
            .iter()
            .find(|route| route.keywords.iter().any(|k| message.contains(k)))
            .map(|route| route.domain)
            .unwrap_or(Domain::General)
    }

    /// Build the canned response for this domain
    pub fn respond(&self) -> AgentResponse {
        let (response, actions, context) = match self {
            Domain::Contacts => (
                "I can help you manage your contacts. You can add, search, or update contact information. What would you like to do?".to_string(),
                vec![AgentAction::completed("contact_search", "Searching contacts database")],
                domain_context(self, json!(["create", "read", "update", "delete"])),
            ),
            Domain::Email => (
                "I can help you with email automation, templates, and scheduling. What email task would you like assistance with?".to_string(),
                vec![AgentAction::completed("email_analysis", "Analyzing email requirements")],
                domain_context(self, json!(["compose", "schedule", "automate"])),
            ),
            Domain::Calendar => (
                "I can help you schedule meetings, check availability, and manage your calendar. What would you like to schedule?".to_string(),
                vec![AgentAction::completed("calendar_check", "Checking calendar availability")],
                domain_context(self, json!(["schedule", "check_availability", "manage_events"])),
            ),
            Domain::Help => (
                format!(
                    "I'm your AI business assistant. I can help you with: {}. Just ask me what you need!",
                    CAPABILITIES.join(", ")
                ),
                Vec::new(),
                domain_context(self, json!(CAPABILITIES)),
            ),
            Domain::General => {
                let mut context = ContextMap::new();
                context.insert("domain".to_string(), json!(self.as_str()));
                context.insert("suggestion".to_string(), json!("be_more_specific"));
                (
                    "I understand you need assistance. Could you be more specific about what you'd like help with? I can assist with contacts, emails, scheduling, and more.".to_string(),
                    Vec::new(),
                    context,
                )
            }
        };

        AgentResponse {
            response,
            actions,
            context,
            timestamp: Utc::now(),
        }
    }
}

fn domain_context(domain: &Domain, capabilities: Value) -> ContextMap {
    let mut context = ContextMap::new();
    context.insert("domain".to_string(), json!(domain.as_str()));
    context.insert("capabilities".to_string(), capabilities);
    context
}

/// Classify the request message and answer it. Never fails.
pub fn dispatch(request: &AgentRequest) -> AgentResponse {
    let domain = Domain::classify(&request.message);
    tracing::debug!(user_id = request.user_id, domain = domain.as_str(), "Dispatched message");
    domain.respond()
}
