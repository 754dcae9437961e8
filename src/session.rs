//! Session storage organized in sections.
//!
//! A [`Session`] maps section ids to small key/value mappings. Multi-step
//! flows keep their state in a section named by a token, so parallel flows
//! of one user don't overwrite each other:
//!
//! ```
//! use restkit::session::{load_from_session, save_to_session, Session};
//! use serde_json::json;
//!
//! let mut session = Session::new();
//! let token = save_to_session(&mut session, "step", json!(2), None);
//! assert_eq!(load_from_session(&session, "step", &token, json!(null)), json!(2));
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Session data: section id → key → value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    sections: HashMap<String, Map<String, Value>>,
    #[serde(skip)]
    modified: bool,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from existing sections.
    pub fn from_map(sections: HashMap<String, Map<String, Value>>) -> Self {
        Self {
            sections,
            modified: false,
        }
    }

    /// Get a section by id.
    pub fn section(&self, id: &str) -> Option<&Map<String, Value>> {
        self.sections.get(id)
    }

    /// Check if a section exists.
    pub fn has(&self, id: &str) -> bool {
        self.sections.contains_key(id)
    }

    /// Whether the session changed since it was loaded.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Forget pending modifications, e.g. after persisting the session.
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }
}

/// Reads and writes session sections.
pub struct SessionStorage<'a> {
    session: &'a mut Session,
}

impl<'a> SessionStorage<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// Store `value` under `key` in the section, creating it if needed.
    pub fn set(&mut self, section_id: &str, key: &str, value: Value) {
        self.session
            .sections
            .entry(section_id.to_string())
            .or_default()
            .insert(key.to_string(), value);
        self.session.modified = true;
    }

    /// The value under `key`, or `default` when the section or key is missing.
    pub fn get(&self, section_id: &str, key: &str, default: Value) -> Value {
        self.session
            .sections
            .get(section_id)
            .and_then(|section| section.get(key))
            .cloned()
            .unwrap_or(default)
    }

    /// Remove the section. Missing sections are already clear.
    pub fn clear(&mut self, section_id: &str) {
        if self.session.sections.remove(section_id).is_some() {
            self.session.modified = true;
        }
    }
}

/// Save `value` in the section named by `token`, generating a UUID v4 token
/// when none is given. Returns the token used.
pub fn save_to_session(session: &mut Session, key: &str, value: Value, token: Option<&str>) -> String {
    let token = match token {
        Some(token) => token.to_string(),
        None => Uuid::new_v4().to_string(),
    };
    SessionStorage::new(session).set(&token, key, value);
    token
}

/// Load the value saved under `key` in the section named by `token`.
pub fn load_from_session(session: &Session, key: &str, token: &str, default: Value) -> Value {
    session
        .section(token)
        .and_then(|section| section.get(key))
        .cloned()
        .unwrap_or(default)
}
