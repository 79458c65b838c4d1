//! Solicitation Store Tests
//!
//! Lifecycle invariants and concurrent access to a shared store.

use crate::models::{
    ProductAction, ProductDetails, Requester, SolicitationKind, SolicitationStatus,
};
use crate::solicitations::{SolicitationFilter, SolicitationStore, StoreError};
use std::sync::Arc;
use std::thread;

fn requester(id: &str) -> Requester {
    Requester {
        id: Some(id.to_string()),
        name: None,
        email: None,
    }
}

fn assert_answer_matches_status(store: &SolicitationStore) {
    for record in store.list(&SolicitationFilter::default(), Some(usize::MAX)) {
        if record.kind() != SolicitationKind::Assistant {
            continue;
        }
        assert_eq!(
            record.answer().is_some(),
            record.status == SolicitationStatus::Concluded,
            "Expected answer presence to match status for '{}' ({:?})",
            record.id,
            record.status
        );
    }
}

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_pending_cannot_skip_processing() {
        // Arrange
        let store = SolicitationStore::new();
        let record = store.create_assistant(requester("1"), "oi", None);

        // Act
        let to_error = store.set_status(&record.id, SolicitationStatus::Error);
        let to_concluded = store.set_answer(&record.id, "x", 1, 0.1);

        // Assert
        assert!(matches!(to_error, Err(StoreError::InvalidTransition { .. })));
        assert!(matches!(to_concluded, Err(StoreError::InvalidTransition { .. })));
        assert_eq!(store.get(&record.id).unwrap().status, SolicitationStatus::Pending);
        assert_answer_matches_status(&store);
    }

    #[test]
    fn test_terminal_states_are_final() {
        let store = SolicitationStore::new();
        let concluded = store.create_assistant(requester("1"), "oi", None);
        store.set_status(&concluded.id, SolicitationStatus::Processing).unwrap();
        store.set_answer(&concluded.id, "resposta", 3, 0.2).unwrap();

        let failed = store.create_assistant(requester("1"), "oi", None);
        store.set_status(&failed.id, SolicitationStatus::Processing).unwrap();
        store.set_status(&failed.id, SolicitationStatus::Error).unwrap();

        assert!(store.set_status(&concluded.id, SolicitationStatus::Error).is_err());
        assert!(store.set_answer(&failed.id, "tarde demais", 1, 0.1).is_err());
        assert_eq!(store.get(&failed.id).unwrap().answer(), None);
        assert_answer_matches_status(&store);
    }

    #[test]
    fn test_answer_requires_assistant_record() {
        let store = SolicitationStore::new();
        let product = store.create_product(
            requester("1"),
            ProductDetails {
                action: ProductAction::Query,
                product_id: Some("P1".to_string()),
                product_name: None,
                product_data: None,
                notes: None,
            },
        );
        store.set_status(&product.id, SolicitationStatus::Processing).unwrap();

        let result = store.set_answer(&product.id, "x", 1, 0.1);

        assert_eq!(result, Err(StoreError::NotAssistant(product.id.clone())));
        assert_eq!(store.get(&product.id).unwrap().status, SolicitationStatus::Processing);
    }

    #[test]
    fn test_mutations_touch_updated_at() {
        let store = SolicitationStore::new();
        let record = store.create_assistant(requester("1"), "oi", None);

        store.set_status(&record.id, SolicitationStatus::Processing).unwrap();
        let updated = store.get(&record.id).unwrap();

        assert!(updated.updated_at >= record.updated_at);
        assert_eq!(updated.created_at, record.created_at);
    }
}

#[cfg(test)]
mod concurrency_tests {
    use super::*;

    #[test]
    fn test_concurrent_lifecycles() {
        // Arrange
        let store = Arc::new(SolicitationStore::new());
        let workers = 8;
        let per_worker = 25;

        // Act
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..per_worker {
                        let record = store.create_assistant(
                            requester(&worker.to_string()),
                            format!("pergunta {}", i),
                            None,
                        );
                        store.set_status(&record.id, SolicitationStatus::Processing).unwrap();
                        if i % 2 == 0 {
                            store.set_answer(&record.id, "ok", 2, 0.5).unwrap();
                        } else {
                            store.set_status(&record.id, SolicitationStatus::Error).unwrap();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Assert
        let stats = store.stats();
        assert_eq!(stats.total, workers * per_worker);
        assert_eq!(stats.by_status.get(&SolicitationStatus::Concluded), Some(&(workers * 13)));
        assert_eq!(stats.by_status.get(&SolicitationStatus::Error), Some(&(workers * 12)));
        assert_answer_matches_status(&store);
    }

    #[test]
    fn test_racing_transitions_apply_once() {
        let store = Arc::new(SolicitationStore::new());
        let record = store.create_assistant(requester("1"), "oi", None);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let id = record.id.clone();
                thread::spawn(move || store.set_status(&id, SolicitationStatus::Processing).is_ok())
            })
            .collect();
        let applied = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(applied, 1, "Expected exactly one pending -> processing transition");
    }
}

#[cfg(test)]
mod listing_tests {
    use super::*;

    #[test]
    fn test_filters_combine() {
        let store = SolicitationStore::new();
        let mine = store.create_assistant(requester("7"), "a", None);
        store.create_assistant(requester("8"), "b", None);
        store.set_status(&mine.id, SolicitationStatus::Processing).unwrap();

        let filter = SolicitationFilter {
            requester_id: Some("7".to_string()),
            kind: Some(SolicitationKind::Assistant),
            status: Some(SolicitationStatus::Processing),
        };
        let listed = store.list(&filter, None);

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, mine.id);
    }

    #[test]
    fn test_newest_first_with_limit() {
        let store = SolicitationStore::with_default_limit(2);
        let first = store.create_assistant(requester("1"), "1", None);
        let second = store.create_assistant(requester("1"), "2", None);
        let third = store.create_assistant(requester("1"), "3", None);

        let listed: Vec<String> = store
            .list(&SolicitationFilter::default(), None)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(listed, vec![third.id.clone(), second.id.clone()]);

        let all = store.list(&SolicitationFilter::default(), Some(10));
        assert_eq!(all.last().map(|r| r.id.clone()), Some(first.id));
    }
}
