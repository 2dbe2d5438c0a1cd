//! Script directory loading.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::script::{ScriptFile, ScriptKind};

/// Load every file directly inside `dir` as a script, in canonical order.
///
/// Each file is read fully into memory and fingerprinted at load time. A
/// read failure on any file fails the whole load; migration directories are
/// assumed small enough to hold upfront. Subdirectories are ignored.
pub async fn load_scripts(dir: impl AsRef<Path>) -> EngineResult<Vec<ScriptFile>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(EngineError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut scripts = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(String::from) else {
            continue;
        };

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| EngineError::MalformedScript {
                name: name.clone(),
                source,
            })?;

        scripts.push(ScriptFile::new(path, name, content));
    }

    scripts.sort();
    reject_duplicate_serials(&scripts)?;

    debug!(count = scripts.len(), dir = %dir.display(), "loaded scripts");
    Ok(scripts)
}

/// Two ordered migrations sharing a serial is a load-time error rather than
/// silently ordering by name.
fn reject_duplicate_serials(scripts: &[ScriptFile]) -> EngineResult<()> {
    let mut seen: HashMap<i64, &str> = HashMap::new();
    for script in scripts {
        if let ScriptKind::Migration { serial } = script.kind {
            if let Some(first) = seen.insert(serial, &script.name) {
                return Err(EngineError::DuplicateSerial {
                    serial,
                    first: first.to_string(),
                    second: script.name.clone(),
                });
            }
        }
    }
    Ok(())
}
