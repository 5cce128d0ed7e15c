//! Batch listing of stored report documents.

use super::parser::{parse_report_file, AssessmentRecord};
use super::report::FILE_INFIX;
use futures::future::join_all;
use sdk::EngineError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Date,
    Score,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// How to order and cap a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub sort_by: SortBy,
    pub order: SortOrder,
    /// Keep only the N most recent interviews before sorting
    pub recent: Option<usize>,
}

/// `*_assessment_*.txt`
pub fn is_report_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".txt") && n.contains(FILE_INFIX))
}

fn by_date(a: &AssessmentRecord, b: &AssessmentRecord) -> Ordering {
    a.interviewed_at
        .cmp(&b.interviewed_at)
        .then_with(|| a.file_name.cmp(&b.file_name))
}

/// Order records and apply the recency cap
pub fn sort_records(mut records: Vec<AssessmentRecord>, query: &ListingQuery) -> Vec<AssessmentRecord> {
    if let Some(n) = query.recent {
        records.sort_by(by_date);
        let skip = records.len().saturating_sub(n);
        records.drain(..skip);
    }

    match query.sort_by {
        SortBy::Date => records.sort_by(by_date),
        SortBy::Score => records.sort_by(|a, b| {
            a.final_score
                .cmp(&b.final_score)
                .then_with(|| by_date(a, b))
        }),
    }

    if query.order == SortOrder::Desc {
        records.reverse();
    }
    records
}

async fn report_paths(dir: &Path) -> Result<Vec<PathBuf>, EngineError> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "Assessments directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_report_file(&path) {
            continue;
        }
        let file_type = entry.file_type().await?;
        // Symlinked reports count when they resolve to a file
        let is_file = file_type.is_file()
            || (file_type.is_symlink()
                && fs::metadata(&path).await.is_ok_and(|m| m.is_file()));
        if is_file {
            paths.push(path);
        }
    }
    Ok(paths)
}

/// Parse every report in `dir`
///
/// Files are parsed concurrently on the blocking pool. Unreadable files are
/// logged and left out; a missing directory lists as empty.
pub async fn list_reports(
    dir: &Path,
    query: &ListingQuery,
) -> Result<Vec<AssessmentRecord>, EngineError> {
    let paths = report_paths(dir).await?;
    let total = paths.len();

    let tasks = paths
        .into_iter()
        .map(|path| tokio::task::spawn_blocking(move || parse_report_file(&path)));

    let records: Vec<AssessmentRecord> = join_all(tasks)
        .await
        .into_iter()
        .filter_map(|joined| match joined {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Report parse task failed: {}", e);
                None
            }
        })
        .collect();

    tracing::debug!(
        dir = %dir.display(),
        found = total,
        parsed = records.len(),
        "Listed assessment reports"
    );
    Ok(sort_records(records, query))
}
