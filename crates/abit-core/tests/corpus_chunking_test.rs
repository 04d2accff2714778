use abit_config::ChunkingConfig;
use abit_core::{FieldChunker, ProgramRecord};

const CORPUS: &str = include_str!("fixtures/programs.json");

#[test]
fn chunks_fixture_corpus() {
    let records: Vec<ProgramRecord> = serde_json::from_str(CORPUS).unwrap();
    assert_eq!(records.len(), 2);

    let chunker = FieldChunker::with_config(ChunkingConfig {
        max_chars: 200,
        ..Default::default()
    });
    let chunks = chunker.chunk(&records);

    // every chunk is non-empty and tagged with its program
    for chunk in &chunks {
        assert!(!chunk.text.trim().is_empty());
        assert!(records.iter().any(|r| r.name == chunk.source && r.url == chunk.url));
    }

    let directions: Vec<_> = chunks.iter().filter(|c| c.field == "directions").collect();
    assert_eq!(directions.len(), 2);
    assert!(directions[0].text.starts_with("directions: 01.04.02"));

    let companies: Vec<_> = chunks.iter().filter(|c| c.field == "companies").collect();
    assert_eq!(companies.len(), 1);
    assert!(companies[0].text.contains("Яндекс"));

    // short `title` field never makes it in
    assert!(chunks.iter().all(|c| c.field != "title"));
}

#[test]
fn rebuild_is_stable() {
    let records: Vec<ProgramRecord> = serde_json::from_str(CORPUS).unwrap();
    let chunker = FieldChunker::new();
    assert_eq!(chunker.chunk(&records), chunker.chunk(&records));
}
