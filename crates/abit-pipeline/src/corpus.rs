use abit_core::ProgramRecord;
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// Read the scraped program records.
///
/// A missing file is reported with a hint, since the scraper is a separate
/// step that has to run first.
pub fn load_corpus(path: &Path) -> Result<Vec<ProgramRecord>> {
    if !path.exists() {
        bail!(
            "corpus file {} not found; run the scraper first",
            path.display()
        );
    }

    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read corpus {}", path.display()))?;
    let records: Vec<ProgramRecord> = serde_json::from_slice(&bytes)
        .with_context(|| format!("corpus {} is not a JSON array of programs", path.display()))?;

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.name.as_str()) {
            tracing::warn!(program = %record.name, "duplicate program name in corpus");
        }
    }

    tracing::info!(programs = records.len(), path = %path.display(), "corpus loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_corpus_mentions_scraper() {
        let dir = tempdir().unwrap();
        let err = load_corpus(&dir.path().join("programs_data.json")).unwrap_err();
        assert!(err.to_string().contains("run the scraper first"));
    }

    #[test]
    fn test_not_an_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("programs_data.json");
        std::fs::write(&path, r#"{"name": "x"}"#).unwrap();
        assert!(load_corpus(&path).is_err());
    }

    #[test]
    fn test_loads_records_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("programs_data.json");
        std::fs::write(
            &path,
            r#"[
                {"name": "Искусственный интеллект", "url": "https://abit.itmo.ru/program/master/ai", "about": "Текст."},
                {"name": "AI и ML в технических системах", "url": "https://abit.itmo.ru/program/master/ai_product"}
            ]"#,
        )
        .unwrap();
        let records = load_corpus(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Искусственный интеллект");
        assert!(records[1].fields.is_empty());
    }
}
