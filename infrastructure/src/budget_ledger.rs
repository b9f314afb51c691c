//! Spend ledger: file-backed persistence for budget accounting.
//!
//! The budget tracker itself is in-memory; the ledger hydrates it at
//! startup and takes the totals back after a run records spend, so a
//! monthly ceiling holds across one-shot invocations rather than
//! resetting with every process.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    spend_by_period: HashMap<String, f64>,
}

/// Persisted spend totals per billing period
#[derive(Debug)]
pub struct BudgetLedger {
    path: PathBuf,
}

impl BudgetLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ledger at the platform data directory
    pub fn default_location() -> Option<Self> {
        dirs::data_dir().map(|d| Self::new(d.join("conclave").join("spend.json")))
    }

    /// Read the persisted totals.
    ///
    /// A missing file yields an empty map (first run); a corrupt one is
    /// logged and treated the same rather than failing the process.
    pub fn load(&self) -> HashMap<String, f64> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        match serde_json::from_str::<LedgerFile>(&raw) {
            Ok(file) => file.spend_by_period,
            Err(e) => {
                warn!(
                    "spend ledger at {} is corrupt ({}), starting fresh",
                    self.path.display(),
                    e
                );
                HashMap::new()
            }
        }
    }

    /// Write the totals back, creating the parent directory if needed
    pub fn save(&self, totals: &HashMap<String, f64>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = LedgerFile {
            spend_by_period: totals.clone(),
        };
        let raw = serde_json::to_string_pretty(&file).map_err(io::Error::other)?;
        fs::write(&self.path, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = BudgetLedger::new(dir.path().join("spend.json"));
        assert!(ledger.load().is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = BudgetLedger::new(dir.path().join("nested").join("spend.json"));

        let mut totals = HashMap::new();
        totals.insert("2026-08".to_string(), 12.5);
        ledger.save(&totals).unwrap();

        let loaded = ledger.load();
        assert_eq!(loaded.get("2026-08").copied(), Some(12.5));
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spend.json");
        fs::write(&path, "{not json").unwrap();
        assert!(BudgetLedger::new(path).load().is_empty());
    }
}
