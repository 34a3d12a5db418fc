//! In-memory contact records
//!
//! Contacts live in a single list guarded by a lock. Lookups, filters and
//! search are linear scans.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{OperoError, OperoResult};

pub type ContactId = u64;

/// A stored contact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub notes: Option<String>,
    /// Comma separated
    pub tags: Option<String>,
    pub is_active: bool,
}

/// Fields accepted when creating a contact
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactCreate {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

impl ContactCreate {
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            ..Default::default()
        }
    }
}

/// Partial update; only fields that are present are applied
///
/// The optional text fields are doubly wrapped: an absent field is `None`
/// and leaves the value alone, an explicit `null` is `Some(None)` and clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub company: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub position: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Mark a field as present even when its value is `null`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Search filters; all present filters must match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactQuery {
    pub q: Option<String>,
    pub company: Option<String>,
    pub tags: Option<String>,
}

/// Aggregate counts over the contact list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactStats {
    pub total_contacts: usize,
    pub active_contacts: usize,
    pub inactive_contacts: usize,
    pub unique_companies: usize,
    pub contacts_by_company: BTreeMap<String, usize>,
}

fn contains_ci(field: &Option<String>, needle: &str) -> bool {
    field
        .as_deref()
        .map(|value| value.to_lowercase().contains(needle))
        .unwrap_or(false)
}

impl Contact {
    fn matches(&self, query: &ContactQuery) -> bool {
        if let Some(q) = query.q.as_deref().filter(|q| !q.is_empty()) {
            let q = q.to_lowercase();
            let hit = self.first_name.to_lowercase().contains(&q)
                || contains_ci(&self.last_name, &q)
                || contains_ci(&self.email, &q)
                || contains_ci(&self.company, &q);
            if !hit {
                return false;
            }
        }
        if let Some(company) = query.company.as_deref().filter(|c| !c.is_empty()) {
            if !contains_ci(&self.company, &company.to_lowercase()) {
                return false;
            }
        }
        if let Some(tags) = query.tags.as_deref().filter(|t| !t.is_empty()) {
            if !contains_ci(&self.tags, &tags.to_lowercase()) {
                return false;
            }
        }
        true
    }

    fn apply(&mut self, update: ContactUpdate) {
        if let Some(v) = update.first_name {
            self.first_name = v;
        }
        if let Some(v) = update.last_name {
            self.last_name = v;
        }
        if let Some(v) = update.email {
            self.email = v;
        }
        if let Some(v) = update.phone {
            self.phone = v;
        }
        if let Some(v) = update.company {
            self.company = v;
        }
        if let Some(v) = update.position {
            self.position = v;
        }
        if let Some(v) = update.notes {
            self.notes = v;
        }
        if let Some(v) = update.tags {
            self.tags = v;
        }
        if let Some(v) = update.is_active {
            self.is_active = v;
        }
    }
}

#[derive(Debug)]
struct Inner {
    contacts: Vec<Contact>,
    next_id: ContactId,
}

/// Contact list with CRUD, search and stats
#[derive(Debug)]
pub struct ContactStore {
    inner: RwLock<Inner>,
}

impl Default for ContactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                contacts: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a store holding the demo contacts
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        for contact in demo_contacts() {
            store.create(contact);
        }
        store
    }

    pub fn list(&self) -> Vec<Contact> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).contacts.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[instrument(skip(self, new), fields(first_name = %new.first_name))]
    pub fn create(&self, new: ContactCreate) -> Contact {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let id = inner.next_id;
        inner.next_id += 1;

        let contact = Contact {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            company: new.company,
            position: new.position,
            notes: new.notes,
            tags: new.tags,
            is_active: true,
        };
        inner.contacts.push(contact.clone());
        tracing::debug!(id, "Created contact");
        contact
    }

    pub fn get(&self, id: ContactId) -> OperoResult<Contact> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contacts
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(OperoError::ContactNotFound(id))
    }

    #[instrument(skip(self, update))]
    pub fn update(&self, id: ContactId, update: ContactUpdate) -> OperoResult<Contact> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let contact = inner
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(OperoError::ContactNotFound(id))?;
        contact.apply(update);
        Ok(contact.clone())
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: ContactId) -> OperoResult<Contact> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let index = inner
            .contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or(OperoError::ContactNotFound(id))?;
        Ok(inner.contacts.remove(index))
    }

    pub fn search(&self, query: &ContactQuery) -> Vec<Contact> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contacts
            .iter()
            .filter(|c| c.matches(query))
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> ContactStats {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let total_contacts = inner.contacts.len();
        let active_contacts = inner.contacts.iter().filter(|c| c.is_active).count();

        let mut contacts_by_company = BTreeMap::new();
        for company in inner.contacts.iter().filter_map(|c| c.company.as_deref()) {
            *contacts_by_company.entry(company.to_string()).or_insert(0) += 1;
        }

        ContactStats {
            total_contacts,
            active_contacts,
            inactive_contacts: total_contacts - active_contacts,
            unique_companies: contacts_by_company.len(),
            contacts_by_company,
        }
    }
}

fn demo_contacts() -> Vec<ContactCreate> {
    let seed = |first: &str, last: &str, email: &str, phone: &str, company: &str, position: &str, notes: &str, tags: &str| ContactCreate {
        first_name: first.to_string(),
        last_name: Some(last.to_string()),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
        company: Some(company.to_string()),
        position: Some(position.to_string()),
        notes: Some(notes.to_string()),
        tags: Some(tags.to_string()),
    };

    vec![
        seed("John", "Doe", "john@example.com", "+1-555-0123", "Tech Corp", "CEO", "Important client", "client,important"),
        seed("Jane", "Smith", "jane@example.com", "+1-555-0124", "Design Studio", "Creative Director", "Potential partner", "partner,creative"),
        seed("Alex", "Johnson", "alex@startupxyz.com", "+1-555-0125", "StartupXYZ", "Founder", "Innovative startup", "startup,innovation"),
    ]
}
