//! Script files and their classification.

use std::cmp::Ordering;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::identity::ScriptIdentity;

/// How a script participates in reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptKind {
    /// Runs exactly once, in ascending serial order. Named `<serial>_<description>`.
    Migration {
        /// Serial number parsed from the filename prefix.
        serial: i64,
    },
    /// Re-applied on every run to converge toward a desired state.
    Repeatable,
}

/// A script file loaded from the migrations directory.
///
/// Content is read eagerly and fingerprints are computed at construction;
/// the value is immutable for the rest of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptFile {
    /// Path to the script on disk.
    pub path: PathBuf,
    /// File name, including extension.
    pub name: String,
    /// Full text content.
    pub content: String,
    /// Name and content fingerprints.
    pub identity: ScriptIdentity,
    /// Classification of this script.
    pub kind: ScriptKind,
}

impl ScriptFile {
    /// Build a script from its path, name, and content.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let content = content.into();
        let identity = ScriptIdentity::compute(&name, &content);
        let kind = classify(&name);
        Self {
            path: path.into(),
            name,
            content,
            identity,
            kind,
        }
    }

    /// Serial number, for ordered migrations.
    pub fn serial(&self) -> Option<i64> {
        match self.kind {
            ScriptKind::Migration { serial } => Some(serial),
            ScriptKind::Repeatable => None,
        }
    }

    /// Whether a content change after application is a conflict.
    pub fn conflicts_on_content_change(&self) -> bool {
        matches!(self.kind, ScriptKind::Migration { .. })
    }

    /// Whether this script re-applies on every run despite a matching record.
    pub fn is_repeatable(&self) -> bool {
        matches!(self.kind, ScriptKind::Repeatable)
    }

    /// Compare against a recorded content fingerprint, ignoring hex case.
    pub fn content_matches(&self, content_fingerprint: &str) -> bool {
        self.identity
            .content_fingerprint
            .eq_ignore_ascii_case(content_fingerprint)
    }
}

impl Ord for ScriptFile {
    /// Canonical order: ordered migrations first, by serial then name;
    /// repeatable scripts after, by name. Bucketing by kind keeps the
    /// comparison a total order even when repeatable names interleave
    /// lexically with migration serials.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.kind, other.kind) {
            (ScriptKind::Migration { serial: a }, ScriptKind::Migration { serial: b }) => {
                a.cmp(&b).then_with(|| self.name.cmp(&other.name))
            }
            (ScriptKind::Migration { .. }, ScriptKind::Repeatable) => Ordering::Less,
            (ScriptKind::Repeatable, ScriptKind::Migration { .. }) => Ordering::Greater,
            (ScriptKind::Repeatable, ScriptKind::Repeatable) => self.name.cmp(&other.name),
        }
    }
}

impl PartialOrd for ScriptFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScriptFile {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScriptFile {}

/// Classify a file by name.
///
/// An integer before the first `_` (with at least one character ahead of the
/// underscore) makes the file an ordered migration carrying that serial;
/// every other name is a repeatable script. Classification is total: every
/// name resolves to exactly one kind.
pub fn classify(name: &str) -> ScriptKind {
    match name.split_once('_') {
        Some((prefix, _)) if !prefix.is_empty() => match prefix.parse::<i64>() {
            Ok(serial) => ScriptKind::Migration { serial },
            Err(_) => ScriptKind::Repeatable,
        },
        _ => ScriptKind::Repeatable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(name: &str) -> ScriptFile {
        ScriptFile::new(format!("scripts/{name}"), name, "SELECT 1;")
    }

    #[test]
    fn test_classify_numeric_prefix() {
        assert_eq!(classify("001_create.sql"), ScriptKind::Migration { serial: 1 });
        assert_eq!(classify("42_add_index.sql"), ScriptKind::Migration { serial: 42 });
    }

    #[test]
    fn test_classify_non_numeric_prefix() {
        assert_eq!(classify("seed_lookup.sql"), ScriptKind::Repeatable);
        assert_eq!(classify("view_users.sql"), ScriptKind::Repeatable);
    }

    #[test]
    fn test_classify_edge_names() {
        // No underscore at all.
        assert_eq!(classify("seed.sql"), ScriptKind::Repeatable);
        // Leading underscore leaves no prefix to parse.
        assert_eq!(classify("_hidden.sql"), ScriptKind::Repeatable);
        // Mixed prefix does not parse.
        assert_eq!(classify("1a_thing.sql"), ScriptKind::Repeatable);
    }

    #[test]
    fn test_migrations_order_by_serial_then_name() {
        let mut files = vec![script("010_ten.sql"), script("002_two.sql"), script("002_also.sql")];
        files.sort();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["002_also.sql", "002_two.sql", "010_ten.sql"]);
    }

    #[test]
    fn test_repeatables_order_by_name() {
        let mut files = vec![script("views.sql"), script("seed.sql")];
        files.sort();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["seed.sql", "views.sql"]);
    }

    #[test]
    fn test_mixed_sort_is_independent_of_input_order() {
        // A repeatable whose name interleaves lexically with migration
        // serials ("10_y.sql" < "95.sql" < "9_x.sql" by name) must not
        // disturb the canonical order.
        let names = ["95.sql", "10_y.sql", "9_x.sql", "seed.sql", "001_a.sql"];

        let mut forward: Vec<_> = names.iter().map(|n| script(n)).collect();
        let mut reverse: Vec<_> = names.iter().rev().map(|n| script(n)).collect();
        forward.sort();
        reverse.sort();

        let sorted: Vec<_> = forward.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            sorted,
            vec!["001_a.sql", "9_x.sql", "10_y.sql", "95.sql", "seed.sql"]
        );
        let from_reverse: Vec<_> = reverse.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(sorted, from_reverse);
    }

    #[test]
    fn test_sort_handles_large_mixed_sets() {
        // Enough interleaved names to trip the standard library's
        // total-order check if the comparator were inconsistent.
        let mut files: Vec<_> = (1..=60)
            .flat_map(|i| [script(&format!("{i}_m.sql")), script(&format!("{i}r.sql"))])
            .collect();
        files.sort();

        let serials: Vec<_> = files[..60].iter().map(|f| f.serial().unwrap()).collect();
        assert_eq!(serials, (1..=60).collect::<Vec<i64>>());
        assert!(files[60..].iter().all(|f| f.is_repeatable()));
    }

    #[test]
    fn test_policies_by_kind() {
        let migration = script("001_create.sql");
        assert!(migration.conflicts_on_content_change());
        assert!(!migration.is_repeatable());
        assert_eq!(migration.serial(), Some(1));

        let repeatable = script("seed.sql");
        assert!(!repeatable.conflicts_on_content_change());
        assert!(repeatable.is_repeatable());
        assert_eq!(repeatable.serial(), None);
    }

    #[test]
    fn test_content_matches_ignores_hex_case() {
        let s = script("seed.sql");
        let upper = s.identity.content_fingerprint.to_uppercase();
        assert!(s.content_matches(&upper));
        assert!(!s.content_matches("deadbeef"));
    }
}
