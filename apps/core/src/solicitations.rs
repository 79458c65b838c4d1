//! Solicitation Store.
//!
//! In-memory registry of tracked interactions, alive for the lifetime of the
//! process. A single mutex guards the whole collection, so every
//! read-modify-write on a record is serialized.
//!
//! Lifecycle: `pending -> processing -> {concluded, error}`. `concluded` is
//! only reachable by recording an answer, which keeps "answer present" and
//! "status concluded" in lockstep.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    AssistantDetails, ContextSnapshot, Priority, ProductDetails, Requester, Solicitation,
    SolicitationDetails, SolicitationKind, SolicitationStatus, SupportDetails,
};

/// Default number of records returned by [`SolicitationStore::list`]
pub const DEFAULT_LIST_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("solicitation not found: {0}")]
    NotFound(String),

    #[error("solicitation {id}: invalid transition {from:?} -> {to:?}")]
    InvalidTransition {
        id: String,
        from: SolicitationStatus,
        to: SolicitationStatus,
    },

    #[error("solicitation {0} is not an assistant request")]
    NotAssistant(String),
}

/// Generate a solicitation identifier: `SOL_<YYYYmmdd>_<HHMMSS>_<8 hex>`.
pub fn generate_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("SOL_{}_{}", Utc::now().format("%Y%m%d_%H%M%S"), &suffix[..8])
}

/// Filters for [`SolicitationStore::list`]. Unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolicitationFilter {
    pub requester_id: Option<String>,
    pub kind: Option<SolicitationKind>,
    pub status: Option<SolicitationStatus>,
}

impl SolicitationFilter {
    fn matches(&self, record: &Solicitation) -> bool {
        self.requester_id
            .as_ref()
            .map_or(true, |id| record.requester.id.as_ref() == Some(id))
            && self.kind.map_or(true, |kind| record.kind() == kind)
            && self.status.map_or(true, |status| record.status == status)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total: usize,
    pub by_status: BTreeMap<SolicitationStatus, usize>,
    pub by_kind: BTreeMap<SolicitationKind, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    /// When the figures were computed; absent for an empty store
    pub computed_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Inner {
    /// Insertion order
    records: Vec<Solicitation>,
    /// id -> position in `records`
    index: HashMap<String, usize>,
}

impl Inner {
    fn get_mut(&mut self, id: &str) -> Result<&mut Solicitation, StoreError> {
        let position = *self
            .index
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(&mut self.records[position])
    }
}

fn touch(record: &mut Solicitation) {
    record.updated_at = Utc::now().max(record.created_at);
}

/// Process-lifetime store of solicitations
pub struct SolicitationStore {
    inner: Mutex<Inner>,
    default_limit: usize,
}

impl Default for SolicitationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SolicitationStore {
    pub fn new() -> Self {
        Self::with_default_limit(DEFAULT_LIST_LIMIT)
    }

    pub fn with_default_limit(default_limit: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            default_limit,
        }
    }

    /// Record a new solicitation in `pending`.
    pub fn create(&self, requester: Requester, details: SolicitationDetails) -> Solicitation {
        let now = Utc::now();
        let record = Solicitation {
            id: generate_id(),
            requester,
            status: SolicitationStatus::Pending,
            priority: details.initial_priority(),
            details,
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.lock();
        let position = inner.records.len();
        inner.index.insert(record.id.clone(), position);
        inner.records.push(record.clone());

        debug!(local_id = %record.id, kind = ?record.kind(), "Solicitation created");
        record
    }

    pub fn create_assistant(
        &self,
        requester: Requester,
        question: impl Into<String>,
        context: Option<ContextSnapshot>,
    ) -> Solicitation {
        self.create(
            requester,
            SolicitationDetails::Assistant(AssistantDetails::new(question, context)),
        )
    }

    pub fn create_product(&self, requester: Requester, details: ProductDetails) -> Solicitation {
        self.create(requester, SolicitationDetails::Product(details))
    }

    pub fn create_support(&self, requester: Requester, details: SupportDetails) -> Solicitation {
        self.create(requester, SolicitationDetails::Support(details))
    }

    pub fn get(&self, id: &str) -> Option<Solicitation> {
        let inner = self.inner.lock();
        inner.index.get(id).map(|&i| inner.records[i].clone())
    }

    /// Matching records, newest first, at most `limit` (or the store default).
    pub fn list(&self, filter: &SolicitationFilter, limit: Option<usize>) -> Vec<Solicitation> {
        let limit = limit.unwrap_or(self.default_limit);
        let inner = self.inner.lock();

        let mut matching: Vec<&Solicitation> = inner
            .records
            .iter()
            .rev()
            .filter(|record| filter.matches(record))
            .collect();
        // Stable: equal timestamps keep newest-inserted first.
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        matching.into_iter().take(limit).cloned().collect()
    }

    /// Move a record to `processing` (from `pending`) or `error` (from `processing`).
    pub fn set_status(&self, id: &str, status: SolicitationStatus) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let record = inner.get_mut(id)?;

        let allowed = matches!(
            (record.status, status),
            (SolicitationStatus::Pending, SolicitationStatus::Processing)
                | (SolicitationStatus::Processing, SolicitationStatus::Error)
        );
        if !allowed {
            return Err(StoreError::InvalidTransition {
                id: id.to_string(),
                from: record.status,
                to: status,
            });
        }

        debug!(local_id = %id, from = ?record.status, to = ?status, "Solicitation status changed");
        record.status = status;
        touch(record);
        Ok(())
    }

    /// Conclude a processing assistant record with its answer.
    pub fn set_answer(
        &self,
        id: &str,
        answer: impl Into<String>,
        tokens_used: u64,
        response_time: f64,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let record = inner.get_mut(id)?;
        let status = record.status;

        let SolicitationDetails::Assistant(details) = &mut record.details else {
            return Err(StoreError::NotAssistant(id.to_string()));
        };

        if status != SolicitationStatus::Processing {
            return Err(StoreError::InvalidTransition {
                id: id.to_string(),
                from: status,
                to: SolicitationStatus::Concluded,
            });
        }

        details.answer = Some(answer.into());
        details.tokens_used = Some(tokens_used);
        details.response_time = Some(response_time);
        record.status = SolicitationStatus::Concluded;
        touch(record);

        debug!(local_id = %id, tokens_used, "Solicitation concluded");
        Ok(())
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.lock();
        if inner.records.is_empty() {
            return StoreStats::default();
        }

        let mut stats = StoreStats {
            total: inner.records.len(),
            computed_at: Some(Utc::now()),
            ..StoreStats::default()
        };
        for record in &inner.records {
            *stats.by_status.entry(record.status).or_insert(0) += 1;
            *stats.by_kind.entry(record.kind()).or_insert(0) += 1;
            *stats.by_priority.entry(record.priority).or_insert(0) += 1;
        }
        stats
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
