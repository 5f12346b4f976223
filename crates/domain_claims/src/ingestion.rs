//! Batch ingestion of externally authored records
//!
//! Claims and reverts arrive as directories of JSON files, each holding an
//! array of records. Every readable file is parsed, the records of all files
//! are concatenated, and the whole set is written with a single atomic batch
//! call. A bad file is logged and skipped so it cannot block the others.
//!
//! The pharmacy catalog is a CSV file (`chain,npi` with a header row) loaded
//! record by record; a row that fails is logged and skipped.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use crate::claim::Claim;
use crate::error::IngestionError;
use crate::pharmacy::Pharmacy;
use crate::ports::ClaimStorePort;
use crate::revert::Revert;

/// Outcome of a directory ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionReport {
    /// Files parsed successfully
    pub files_loaded: usize,
    /// Files ignored or rejected
    pub files_skipped: usize,
    /// Records written in the batch
    pub records_saved: usize,
}

/// Outcome of a catalog load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Loads every claim file in `dir` and saves them in one batch
pub async fn load_claims_from_dir(
    store: &dyn ClaimStorePort,
    dir: impl AsRef<Path>,
) -> Result<IngestionReport, IngestionError> {
    let (claims, mut report) = read_records_from_dir::<Claim>(dir.as_ref(), "claims")?;

    if claims.is_empty() {
        info!("No claims to save");
        return Ok(report);
    }

    info!(count = claims.len(), "Saving claims batch");
    store
        .save_claims(&claims)
        .await
        .map_err(|source| IngestionError::Store { kind: "claims", source })?;

    report.records_saved = claims.len();
    info!(count = report.records_saved, "Claims batch saved");
    Ok(report)
}

/// Loads every revert file in `dir` and saves them in one batch
pub async fn load_reverts_from_dir(
    store: &dyn ClaimStorePort,
    dir: impl AsRef<Path>,
) -> Result<IngestionReport, IngestionError> {
    let (reverts, mut report) = read_records_from_dir::<Revert>(dir.as_ref(), "reverts")?;

    if reverts.is_empty() {
        info!("No reverts to save");
        return Ok(report);
    }

    info!(count = reverts.len(), "Saving reverts batch");
    store
        .save_reverts(&reverts)
        .await
        .map_err(|source| IngestionError::Store { kind: "reverts", source })?;

    report.records_saved = reverts.len();
    info!(count = report.records_saved, "Reverts batch saved");
    Ok(report)
}

/// Loads the pharmacy catalog from a CSV file, one upsert per row
pub async fn load_pharmacies_from_csv(
    store: &dyn ClaimStorePort,
    path: impl AsRef<Path>,
) -> Result<CatalogReport, IngestionError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestionError::OpenCatalog {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), "Loading pharmacies from CSV");
    let mut report = CatalogReport::default();

    for (index, record) in reader.records().enumerate() {
        // header is line 1
        let line = index + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(line, error = %e, "Unreadable CSV line, skipping");
                report.skipped += 1;
                continue;
            }
        };

        let (Some(chain), Some(npi)) = (record.get(0), record.get(1)) else {
            warn!(line, fields = record.len(), "CSV line has fewer than 2 fields, skipping");
            report.skipped += 1;
            continue;
        };

        let pharmacy = Pharmacy::new(chain, npi);
        if let Err(e) = store.save_pharmacy(&pharmacy).await {
            error!(npi = %pharmacy.npi, error = %e, "Failed to save pharmacy, skipping");
            report.skipped += 1;
            continue;
        }
        report.loaded += 1;
    }

    info!(loaded = report.loaded, skipped = report.skipped, "Pharmacy catalog loaded");
    Ok(report)
}

/// Parses every `.json` file in `dir`, in filename order
fn read_records_from_dir<T: DeserializeOwned>(
    dir: &Path,
    kind: &'static str,
) -> Result<(Vec<T>, IngestionReport), IngestionError> {
    let dir = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    let entries = fs::read_dir(&dir).map_err(|source| IngestionError::ReadDir {
        path: dir.clone(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut records = Vec::new();
    let mut report = IngestionReport::default();

    for path in paths {
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            info!(path = %path.display(), "Ignoring non-JSON file");
            report.files_skipped += 1;
            continue;
        }

        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read {} file", kind);
                report.files_skipped += 1;
                continue;
            }
        };

        match serde_json::from_slice::<Vec<T>>(&data) {
            Ok(mut parsed) => {
                info!(path = %path.display(), count = parsed.len(), "Loaded {} file", kind);
                records.append(&mut parsed);
                report.files_loaded += 1;
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to decode {} file", kind);
                report.files_skipped += 1;
            }
        }
    }

    info!(total = records.len(), "Finished reading {} files", kind);
    Ok((records, report))
}
