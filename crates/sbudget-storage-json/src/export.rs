use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use sbudget_core::{CoreError, RecordSnapshot};
use tracing::{info, warn};

use crate::fs_util::write_atomic;

const EXPORT_PREFIX: &str = "simple_budget";
const EXPORT_EXTENSION: &str = "json";
const EXPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// Number of export files kept by default.
pub const DEFAULT_EXPORT_RETENTION: usize = 5;

/// A single export file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportInfo {
    /// File name, e.g. `simple_budget_20240315_1042_year-end.json`.
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// Directory of JSON snapshots written by the export command.
#[derive(Debug, Clone)]
pub struct ExportArchive {
    dir: PathBuf,
    retention: usize,
}

impl ExportArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
        Self::with_retention(dir, DEFAULT_EXPORT_RETENTION)
    }

    pub fn with_retention(dir: impl Into<PathBuf>, retention: usize) -> Result<Self, CoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            retention: retention.max(1),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `snapshot` under a name derived from its export time and the
    /// optional note, then prunes files beyond the retention count.
    pub fn export(&self, snapshot: &RecordSnapshot, note: Option<&str>) -> Result<ExportInfo, CoreError> {
        let timestamp = snapshot.exported_at.format(EXPORT_TIMESTAMP_FORMAT);
        let mut stem = format!("{EXPORT_PREFIX}_{timestamp}");
        if let Some(label) = sanitize_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let file_name = format!("{stem}.{EXPORT_EXTENSION}");
        let path = self.dir.join(&file_name);
        let body = serde_json::to_string_pretty(snapshot)?;
        write_atomic(&path, &body)?;
        info!(
            file = %file_name,
            transactions = snapshot.transactions.len(),
            "export written"
        );
        self.prune()?;
        Ok(ExportInfo {
            created_at: parse_export_timestamp(&file_name),
            id: file_name,
            size_bytes: body.len() as u64,
            path,
        })
    }

    /// Lists export files, newest first.
    pub fn list(&self) -> Result<Vec<ExportInfo>, CoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXPORT_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(created_at) = parse_export_timestamp(file_name) else {
                continue;
            };
            let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
            entries.push(ExportInfo {
                id: file_name.to_string(),
                created_at: Some(created_at),
                size_bytes,
                path: path.clone(),
            });
        }
        entries.sort_by(|a, b| {
            Reverse(a.created_at)
                .cmp(&Reverse(b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    /// Reads an export back, for inspection.
    pub fn load(&self, id: &str) -> Result<RecordSnapshot, CoreError> {
        let path = self.dir.join(id);
        if !path.exists() {
            return Err(CoreError::Storage(format!("export `{id}` not found")));
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn prune(&self) -> Result<(), CoreError> {
        for entry in self.list()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(file = %entry.id, error = %err, "failed to prune old export");
            }
        }
        Ok(())
    }
}

/// Reduces a free-form note to a lowercase, dash-separated file name label.
pub(crate) fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Extracts the timestamp from `simple_budget_YYYYMMDD_HHMM[_note].json`.
pub(crate) fn parse_export_timestamp(file_name: &str) -> Option<DateTime<Utc>> {
    let stem = file_name.strip_suffix(&format!(".{EXPORT_EXTENSION}"))?;
    let rest = stem.strip_prefix(&format!("{EXPORT_PREFIX}_"))?;
    let mut segments = rest.split('_');
    let date = segments.next()?;
    let time = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 4) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M")
        .ok()
        .map(|naive| naive.and_utc())
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn note_is_reduced_to_a_slug() {
        assert_eq!(sanitize_note(Some("  Cierre de Año 2024! ")), Some("cierre-de-a-o-2024".into()));
        assert_eq!(sanitize_note(Some("***")), None);
        assert_eq!(sanitize_note(None), None);
    }

    #[test]
    fn timestamp_parses_with_and_without_note() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 15, 10, 42, 0).unwrap();
        assert_eq!(parse_export_timestamp("simple_budget_20240315_1042.json"), Some(expected));
        assert_eq!(
            parse_export_timestamp("simple_budget_20240315_1042_year-end.json"),
            Some(expected)
        );
        assert_eq!(parse_export_timestamp("simple_budget_2024_1042.json"), None);
        assert_eq!(parse_export_timestamp("other_20240315_1042.json"), None);
    }
}
