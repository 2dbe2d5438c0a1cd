//! Reconciliation planning.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::script::ScriptFile;
use crate::store::AppliedRecord;

/// An already-applied script whose content changed although its policy
/// forbids that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// File name of the conflicting script.
    pub script_name: String,
    /// When the original content was applied.
    pub applied_at: DateTime<Utc>,
}

/// The computed, immutable decision of what to skip, apply, or flag for one
/// run.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Scripts whose applied record still matches their content.
    pub to_skip: Vec<ScriptFile>,
    /// Ordered migrations needing application, ascending by serial.
    pub to_apply_ordered: Vec<ScriptFile>,
    /// Repeatable scripts to apply, in loader order.
    pub to_apply_repeatable: Vec<ScriptFile>,
    /// Conflicts found during planning. Any entry aborts the run.
    pub conflicts: Vec<Conflict>,
}

impl Plan {
    /// Whether the run must abort before executing anything.
    pub fn is_aborted(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Whether there is nothing to execute.
    pub fn is_empty(&self) -> bool {
        self.to_apply_ordered.is_empty() && self.to_apply_repeatable.is_empty()
    }

    /// Total number of scripts that would execute.
    pub fn to_apply_count(&self) -> usize {
        self.to_apply_ordered.len() + self.to_apply_repeatable.len()
    }

    /// Get a summary of the plan.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if !self.to_apply_ordered.is_empty() {
            parts.push(format!("{} ordered to apply", self.to_apply_ordered.len()));
        }

        if !self.to_apply_repeatable.is_empty() {
            parts.push(format!("{} repeatable to apply", self.to_apply_repeatable.len()));
        }

        if !self.to_skip.is_empty() {
            parts.push(format!("{} skipped", self.to_skip.len()));
        }

        if !self.conflicts.is_empty() {
            parts.push(format!("{} CONFLICTS", self.conflicts.len()));
        }

        if parts.is_empty() {
            "Nothing to apply".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Compare the loaded script set against the applied records.
///
/// This is a pure function: identical inputs always produce an identical
/// plan. Conflicts are fully collected rather than failing on the first, so
/// operators see the complete remediation list in one run.
pub fn build_plan(scripts: Vec<ScriptFile>, records: &[AppliedRecord]) -> Plan {
    let by_name_fingerprint: HashMap<&str, &AppliedRecord> = records
        .iter()
        .map(|r| (r.name_fingerprint.as_str(), r))
        .collect();

    let mut plan = Plan {
        to_skip: Vec::new(),
        to_apply_ordered: Vec::new(),
        to_apply_repeatable: Vec::new(),
        conflicts: Vec::new(),
    };

    for script in scripts {
        match by_name_fingerprint.get(script.identity.name_fingerprint.as_str()) {
            Some(record) => {
                if !script.is_repeatable() && script.content_matches(&record.content_fingerprint) {
                    plan.to_skip.push(script);
                    continue;
                }
                if script.conflicts_on_content_change()
                    && !script.content_matches(&record.content_fingerprint)
                {
                    plan.conflicts.push(Conflict {
                        script_name: script.name.clone(),
                        applied_at: record.applied_at,
                    });
                    continue;
                }
                // Repeatable scripts are desired state: re-apply every run,
                // matched record or not.
                route(&mut plan, script);
            }
            None => route(&mut plan, script),
        }
    }

    // Loader order already ascends by serial, but the ordered phase depends
    // on it, so enforce it here rather than assume it.
    plan.to_apply_ordered
        .sort_by(|a, b| a.serial().cmp(&b.serial()).then_with(|| a.name.cmp(&b.name)));

    debug!(
        ordered = plan.to_apply_ordered.len(),
        repeatable = plan.to_apply_repeatable.len(),
        skipped = plan.to_skip.len(),
        conflicts = plan.conflicts.len(),
        "built plan"
    );

    plan
}

fn route(plan: &mut Plan, script: ScriptFile) {
    if script.is_repeatable() {
        plan.to_apply_repeatable.push(script);
    } else {
        plan.to_apply_ordered.push(script);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptFile;

    fn script(name: &str, content: &str) -> ScriptFile {
        ScriptFile::new(format!("scripts/{name}"), name, content)
    }

    fn record_for(script: &ScriptFile) -> AppliedRecord {
        AppliedRecord {
            name_fingerprint: script.identity.name_fingerprint.clone(),
            content_fingerprint: script.identity.content_fingerprint.clone(),
            applied_at: Utc::now(),
        }
    }

    #[test]
    fn test_first_run_routes_by_kind() {
        let scripts = vec![
            script("001_create_table.sql", "CREATE TABLE t (id INTEGER);"),
            script("002_add_column.sql", "ALTER TABLE t ADD c TEXT;"),
            script("seed_lookup.sql", "INSERT INTO t VALUES (1);"),
        ];

        let plan = build_plan(scripts, &[]);
        let ordered: Vec<_> = plan.to_apply_ordered.iter().map(|s| s.name.as_str()).collect();
        let repeatable: Vec<_> = plan.to_apply_repeatable.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(ordered, vec!["001_create_table.sql", "002_add_column.sql"]);
        assert_eq!(repeatable, vec!["seed_lookup.sql"]);
        assert!(plan.to_skip.is_empty());
        assert!(!plan.is_aborted());
    }

    #[test]
    fn test_unchanged_migration_skips() {
        let migration = script("001_create.sql", "CREATE TABLE t (id INTEGER);");
        let records = vec![record_for(&migration)];

        let plan = build_plan(vec![migration], &records);
        assert_eq!(plan.to_skip.len(), 1);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_edited_migration_conflicts() {
        let original = script("002_add_column.sql", "ALTER TABLE t ADD c TEXT;");
        let records = vec![record_for(&original)];

        let edited = script("002_add_column.sql", "ALTER TABLE t ADD c INTEGER;");
        let plan = build_plan(vec![edited], &records);

        assert!(plan.is_aborted());
        assert_eq!(plan.conflicts.len(), 1);
        assert_eq!(plan.conflicts[0].script_name, "002_add_column.sql");
        assert!(plan.to_apply_ordered.is_empty());
    }

    #[test]
    fn test_repeatable_always_re_applies() {
        let seed = script("seed.sql", "INSERT INTO t VALUES (1);");
        let records = vec![record_for(&seed)];

        // Matching record with identical content still re-applies.
        let plan = build_plan(vec![seed.clone()], &records);
        assert!(plan.to_skip.is_empty());
        assert_eq!(plan.to_apply_repeatable.len(), 1);

        // Edited content is an update, not a conflict.
        let edited = script("seed.sql", "INSERT INTO t VALUES (2);");
        let plan = build_plan(vec![edited], &records);
        assert!(!plan.is_aborted());
        assert_eq!(plan.to_apply_repeatable.len(), 1);
    }

    #[test]
    fn test_all_conflicts_collected() {
        let a = script("001_a.sql", "SELECT 1;");
        let b = script("002_b.sql", "SELECT 2;");
        let records = vec![record_for(&a), record_for(&b)];

        let edited = vec![script("001_a.sql", "SELECT 10;"), script("002_b.sql", "SELECT 20;")];
        let plan = build_plan(edited, &records);
        assert_eq!(plan.conflicts.len(), 2);
    }

    #[test]
    fn test_planning_is_deterministic() {
        let scripts = || {
            vec![
                script("001_a.sql", "SELECT 1;"),
                script("beta.sql", "SELECT 2;"),
                script("alpha.sql", "SELECT 3;"),
            ]
        };
        let records = vec![record_for(&script("beta.sql", "SELECT 2;"))];

        let first = build_plan(scripts(), &records);
        let second = build_plan(scripts(), &records);

        let names = |p: &Plan| -> (Vec<String>, Vec<String>, Vec<String>) {
            (
                p.to_apply_ordered.iter().map(|s| s.name.clone()).collect(),
                p.to_apply_repeatable.iter().map(|s| s.name.clone()).collect(),
                p.to_skip.iter().map(|s| s.name.clone()).collect(),
            )
        };
        assert_eq!(names(&first), names(&second));
    }

    #[test]
    fn test_summary() {
        let plan = build_plan(
            vec![script("001_a.sql", "SELECT 1;"), script("seed.sql", "SELECT 2;")],
            &[],
        );
        let summary = plan.summary();
        assert!(summary.contains("1 ordered"));
        assert!(summary.contains("1 repeatable"));

        let empty = build_plan(Vec::new(), &[]);
        assert_eq!(empty.summary(), "Nothing to apply");
    }
}
