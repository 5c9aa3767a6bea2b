//! Turns a homework record into the sentence sent to the chat.
//!
//! The three verdict sentences are locale content; [`Verdicts`] carries the
//! defaults and can be overridden from the `[verdicts]` table of the config
//! file.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::PollError;

/// Review outcome reported by the API. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomeworkStatus::Approved => write!(f, "approved"),
            HomeworkStatus::Reviewing => write!(f, "reviewing"),
            HomeworkStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A single homework entry with both required fields present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub name: String,
    pub status: HomeworkStatus,
}

impl WorkItem {
    /// Extracts `homework_name` and `status` from a raw API record.
    pub fn from_value(raw: &Value) -> Result<Self, PollError> {
        let name = match raw.get("homework_name") {
            None | Some(Value::Null) => return Err(PollError::Field("homework_name")),
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                return Err(PollError::InvalidField {
                    field: "homework_name",
                    value: other.to_string(),
                });
            }
        };
        let status = match raw.get("status") {
            None | Some(Value::Null) => return Err(PollError::Field("status")),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        let status =
            HomeworkStatus::parse(&status).ok_or(PollError::UnknownStatus { status })?;

        Ok(Self {
            name: name.to_string(),
            status,
        })
    }
}

/// Verdict sentence per review outcome.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Verdicts {
    #[serde(default = "default_approved")]
    pub approved: String,
    #[serde(default = "default_reviewing")]
    pub reviewing: String,
    #[serde(default = "default_rejected")]
    pub rejected: String,
}

fn default_approved() -> String {
    "The work has been reviewed: the reviewer liked everything. Hooray!".to_string()
}

fn default_reviewing() -> String {
    "The work has been taken for review.".to_string()
}

fn default_rejected() -> String {
    "The work has been reviewed: the reviewer has comments.".to_string()
}

impl Default for Verdicts {
    fn default() -> Self {
        Self {
            approved: default_approved(),
            reviewing: default_reviewing(),
            rejected: default_rejected(),
        }
    }
}

impl Verdicts {
    pub fn for_status(&self, status: HomeworkStatus) -> &str {
        match status {
            HomeworkStatus::Approved => &self.approved,
            HomeworkStatus::Reviewing => &self.reviewing,
            HomeworkStatus::Rejected => &self.rejected,
        }
    }

    pub fn message(&self, item: &WorkItem) -> String {
        format!(
            "Status changed for \"{}\": {}",
            item.name,
            self.for_status(item.status)
        )
    }

    /// Validates a raw homework record and renders its notification text.
    pub fn translate(&self, raw: &Value) -> Result<String, PollError> {
        let item = WorkItem::from_value(raw)?;
        Ok(self.message(&item))
    }
}
