//! Write-once store for stage results.

use crate::core::StageResult;
use crate::errors::OutputConflictError;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Inner {
    index: HashMap<String, usize>,
    results: Vec<StageResult>,
}

/// Stage results of one run, keyed by stage id.
///
/// Each id can be written exactly once. Results keep the order in which
/// they were inserted.
#[derive(Debug, Default)]
pub struct ResultStore {
    inner: RwLock<Inner>,
}

impl ResultStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a result.
    ///
    /// # Errors
    ///
    /// Returns `OutputConflictError` if the stage already has a result.
    pub fn insert(&self, result: StageResult) -> Result<(), OutputConflictError> {
        let mut inner = self.inner.write();
        if inner.index.contains_key(&result.stage_id) {
            return Err(OutputConflictError::new(
                &result.stage_id,
                "a result for this stage was already recorded",
            ));
        }
        let position = inner.results.len();
        inner.index.insert(result.stage_id.clone(), position);
        inner.results.push(result);
        Ok(())
    }

    /// Returns a copy of the result for a stage.
    #[must_use]
    pub fn get(&self, stage_id: &str) -> Option<StageResult> {
        let inner = self.inner.read();
        inner.index.get(stage_id).map(|&i| inner.results[i].clone())
    }

    /// Returns true if the stage has a result.
    #[must_use]
    pub fn contains(&self, stage_id: &str) -> bool {
        self.inner.read().index.contains_key(stage_id)
    }

    /// Collects the output text of the given stages. Stages without a
    /// result are left out.
    #[must_use]
    pub fn outputs_for(&self, stage_ids: &[String]) -> HashMap<String, String> {
        let inner = self.inner.read();
        stage_ids
            .iter()
            .filter_map(|id| {
                inner
                    .index
                    .get(id)
                    .map(|&i| (id.clone(), inner.results[i].text.clone()))
            })
            .collect()
    }

    /// Returns the number of stored results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().results.len()
    }

    /// Returns true if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().results.is_empty()
    }

    /// Consumes the store, returning results in insertion order.
    #[must_use]
    pub fn into_results(self) -> Vec<StageResult> {
        self.inner.into_inner().results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result(id: &str, text: &str) -> StageResult {
        StageResult::completed(id, "Role", text, Utc::now(), 1)
    }

    #[test]
    fn test_insert_and_get() {
        let store = ResultStore::new();
        store.insert(result("a", "alpha")).unwrap();

        assert!(store.contains("a"));
        assert_eq!(store.get("a").unwrap().text, "alpha");
        assert!(store.get("b").is_none());
    }

    #[test]
    fn test_second_write_conflicts() {
        let store = ResultStore::new();
        store.insert(result("a", "first")).unwrap();

        let err = store.insert(result("a", "second")).unwrap_err();
        assert_eq!(err.stage, "a");
        assert_eq!(store.get("a").unwrap().text, "first");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_outputs_for_skips_missing() {
        let store = ResultStore::new();
        store.insert(result("a", "alpha")).unwrap();

        let outputs = store.outputs_for(&["a".to_string(), "missing".to_string()]);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs["a"], "alpha");
    }

    #[test]
    fn test_into_results_keeps_order() {
        let store = ResultStore::new();
        for id in ["c", "a", "b"] {
            store.insert(result(id, id)).unwrap();
        }

        let ids: Vec<_> = store.into_results().into_iter().map(|r| r.stage_id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
