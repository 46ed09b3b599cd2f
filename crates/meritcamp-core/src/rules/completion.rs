//! Per-requirement completion records.
//!
//! An assignment tracks one flag per requirement of its offering. When the
//! offering's requirement list changes, existing records are reconciled:
//! surviving requirements keep their flag, removed ones are dropped and new
//! ones start out incomplete.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::Completions;

/// All-incomplete record for a new assignment
pub fn initial(requirements: &[String]) -> Completions {
    requirements.iter().map(|r| (r.clone(), false)).collect()
}

/// Reconcile an existing record with a new requirement list
pub fn reconcile(existing: &Completions, requirements: &[String]) -> Completions {
    requirements
        .iter()
        .map(|r| (r.clone(), existing.get(r).copied().unwrap_or(false)))
        .collect()
}

/// Merge a partial update into a record. Unknown requirements are rejected.
pub fn apply_update(existing: &Completions, update: &Completions) -> Result<Completions> {
    if let Some(unknown) = update.keys().find(|k| !existing.contains_key(*k)) {
        return Err(Error::BadRequest(format!("unknown requirement: {}", unknown)));
    }
    let mut merged = existing.clone();
    merged.extend(update.iter().map(|(k, v)| (k.clone(), *v)));
    Ok(merged)
}

/// Trim requirement names and reject blanks and duplicates. Order is kept.
pub fn normalize_requirements(requirements: &[String]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(requirements.len());
    for requirement in requirements {
        let trimmed = requirement.trim();
        if trimmed.is_empty() {
            return Err(Error::bad_request("requirements must not be blank"));
        }
        if !seen.insert(trimmed.to_string()) {
            return Err(Error::BadRequest(format!("duplicate requirement: {}", trimmed)));
        }
        normalized.push(trimmed.to_string());
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reqs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn record(pairs: &[(&str, bool)]) -> Completions {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_initial_is_all_false() {
        let c = initial(&reqs(&["1", "2", "3a"]));
        assert_eq!(c, record(&[("1", false), ("2", false), ("3a", false)]));
    }

    #[test]
    fn test_reconcile_keeps_drops_and_adds() {
        let existing = record(&[("1", true), ("2", false), ("3", true)]);
        let reconciled = reconcile(&existing, &reqs(&["1", "2", "4"]));
        assert_eq!(reconciled, record(&[("1", true), ("2", false), ("4", false)]));
    }

    #[test]
    fn test_reconcile_to_empty() {
        let existing = record(&[("1", true)]);
        assert!(reconcile(&existing, &[]).is_empty());
    }

    #[test]
    fn test_apply_update_merges() {
        let existing = record(&[("1", false), ("2", false)]);
        let updated = apply_update(&existing, &record(&[("2", true)])).unwrap();
        assert_eq!(updated, record(&[("1", false), ("2", true)]));
    }

    #[test]
    fn test_apply_update_rejects_unknown() {
        let existing = record(&[("1", false)]);
        let err = apply_update(&existing, &record(&[("9", true)])).unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_normalize_requirements() {
        assert_eq!(
            normalize_requirements(&reqs(&[" 1 ", "2"])).unwrap(),
            reqs(&["1", "2"])
        );
        assert!(normalize_requirements(&reqs(&["1", ""])).is_err());
        assert!(normalize_requirements(&reqs(&["1", "1 "])).is_err());
    }
}
