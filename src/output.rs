use crate::error::HarvestError;
use crate::results::{BusinessRecord, ResultSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// The document written at the end of a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessDocument {
    pub businesses: Vec<BusinessRecord>,
}

#[derive(Serialize)]
struct BusinessesRef<'a> {
    businesses: &'a [BusinessRecord],
}

/// Totals reported by [`dedupe_file`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupeReport {
    pub before: usize,
    pub after: usize,
}

/// Renders records as `{"businesses": [...]}`, indented with four spaces
pub fn to_json(records: &[BusinessRecord]) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    BusinessesRef {
        businesses: records,
    }
    .serialize(&mut serializer)?;

    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes the result set to `path`.
///
/// Nothing is written for an empty set; returns whether a file was written.
pub fn flush(results: &ResultSet, path: &Path) -> Result<bool, HarvestError> {
    if results.is_empty() {
        ::log::warn!("No businesses were scraped, nothing to export.");
        return Ok(false);
    }

    let json = to_json(results.records())?;
    fs::write(path, json)?;
    ::log::info!(
        "Successfully exported {} businesses to {}",
        results.len(),
        path.display()
    );
    Ok(true)
}

/// Drops records whose (name, address) pair already appeared, keeping first-seen order
pub fn dedupe(records: Vec<BusinessRecord>) -> Vec<BusinessRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let unique = seen.insert((record.name.clone(), record.address.clone()));
            if !unique {
                ::log::info!(
                    "Duplicate found and removed: {} - {}",
                    record.name,
                    record.address
                );
            }
            unique
        })
        .collect()
}

/// Rewrites a previously exported file without duplicate records
pub fn dedupe_file(path: &Path) -> Result<DedupeReport, HarvestError> {
    let contents = fs::read_to_string(path)?;
    let document: BusinessDocument = serde_json::from_str(&contents)?;

    let before = document.businesses.len();
    let unique = dedupe(document.businesses);
    let after = unique.len();

    fs::write(path, to_json(&unique)?)?;
    ::log::info!(
        "Removed duplicates from {}: {} entries before, {} after",
        path.display(),
        before,
        after
    );
    Ok(DedupeReport { before, after })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Field;

    fn record(name: &str, address: &str) -> BusinessRecord {
        let mut record = BusinessRecord::new(Some(name.to_string()));
        record.set(Field::Address, Some(address.to_string()));
        record
    }

    #[test]
    fn test_json_shape_and_indent() {
        let json = to_json(&[record("Cafe A", "123 St")]).unwrap();
        assert!(json.starts_with("{\n    \"businesses\": [\n        {"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let businesses = value["businesses"].as_array().unwrap();
        assert_eq!(businesses.len(), 1);
        assert_eq!(businesses[0]["name"], "Cafe A");
        assert_eq!(businesses[0]["phone"], "No phone found");
    }

    #[test]
    fn test_non_ascii_written_verbatim() {
        let json = to_json(&[record("Café Ñandú", "वडोदरा")]).unwrap();
        assert!(json.contains("Café Ñandú"));
        assert!(json.contains("वडोदरा"));
    }

    #[test]
    fn test_flush_skips_empty_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("businesses.json");
        assert!(!flush(&ResultSet::new(), &path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_flush_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("businesses.json");
        let mut results = ResultSet::new();
        results.push(record("Cafe A", "123 St"));
        results.push(record("Cafe B", "9 Rd"));

        assert!(flush(&results, &path).unwrap());
        let written: BusinessDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.businesses, results.into_records());
    }

    #[test]
    fn test_dedupe_keeps_first_by_name_and_address() {
        let records = vec![
            record("Cafe A", "123 St"),
            record("Cafe A", "9 Rd"),
            record("Cafe A", "123 St"),
            record("Cafe B", "123 St"),
        ];
        let unique = dedupe(records);
        assert_eq!(unique.len(), 3);
        assert_eq!(unique[0].address, "123 St");
        assert_eq!(unique[1].address, "9 Rd");
        assert_eq!(unique[2].name, "Cafe B");
    }

    #[test]
    fn test_dedupe_file_rewrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("businesses.json");
        let records = vec![record("Cafe A", "123 St"), record("Cafe A", "123 St")];
        fs::write(&path, to_json(&records).unwrap()).unwrap();

        let report = dedupe_file(&path).unwrap();
        assert_eq!(report, DedupeReport { before: 2, after: 1 });

        let written: BusinessDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.businesses.len(), 1);
    }

    #[test]
    fn test_dedupe_file_rejects_wrong_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.json");
        fs::write(&path, r#"{"places": []}"#).unwrap();
        assert!(matches!(dedupe_file(&path), Err(HarvestError::Json(_))));
    }
}
