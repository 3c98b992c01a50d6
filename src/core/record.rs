//! Income and expense records and the wire vocabulary around them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub fn singular(&self) -> &'static str {
        match self {
            RecordKind::Income => "income",
            RecordKind::Expense => "expense",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            RecordKind::Income => "incomes",
            RecordKind::Expense => "expenses",
        }
    }

    /// Path of `endpoint` for this kind, relative to the `/api/v1/` prefix.
    pub fn path(&self, endpoint: Endpoint<'_>) -> String {
        match endpoint {
            Endpoint::Add => format!("add-{}", self.singular()),
            Endpoint::List => format!("get-{}", self.plural()),
            Endpoint::Update(id) => format!("update-{}/{id}", self.singular()),
            Endpoint::Delete(id) => format!("delete-{}/{id}", self.singular()),
        }
    }

    /// Message recorded when `op` fails without a server-provided message.
    pub fn fallback_message(&self, op: Operation) -> String {
        match op {
            Operation::Add => format!("Failed to add {}", self.singular()),
            Operation::Fetch => format!("Failed to fetch {}", self.plural()),
            Operation::Update => format!("Failed to update {}", self.singular()),
            Operation::Delete => format!("Failed to delete {}", self.singular()),
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Income => write!(f, "Income"),
            RecordKind::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" | "incomes" => Ok(RecordKind::Income),
            "expense" | "expenses" => Ok(RecordKind::Expense),
            _ => Err(anyhow::anyhow!("Invalid record kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Fetch,
    Update,
    Delete,
}

/// A route of the records API. Update and delete address a record by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Add,
    List,
    Update(&'a str),
    Delete(&'a str),
}

impl Endpoint<'_> {
    pub fn method(&self) -> &'static str {
        match self {
            Endpoint::Add => "POST",
            Endpoint::List => "GET",
            Endpoint::Update(_) => "PUT",
            Endpoint::Delete(_) => "DELETE",
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Endpoint::Add => Operation::Add,
            Endpoint::List => Operation::Fetch,
            Endpoint::Update(_) => Operation::Update,
            Endpoint::Delete(_) => Operation::Delete,
        }
    }
}

/// A single income or expense entry as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Client-supplied fields of a record, sent on add and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub title: String,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl From<&Record> for RecordDraft {
    fn from(record: &Record) -> Self {
        RecordDraft {
            title: record.title.clone(),
            amount: record.amount,
            category: record.category.clone(),
            description: record.description.clone(),
        }
    }
}

/// Field overrides applied over the record being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
    }

    pub fn apply(&self, record: &Record) -> RecordDraft {
        let mut draft = RecordDraft::from(record);
        if let Some(title) = &self.title {
            draft.title = title.clone();
        }
        if let Some(amount) = self.amount {
            draft.amount = amount;
        }
        if let Some(category) = &self.category {
            draft.category = category.clone();
        }
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }
        draft
    }
}

/// A record tagged with the collection it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub kind: RecordKind,
    pub record: Record,
}
