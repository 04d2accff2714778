//! Splits program records into bounded, provenance-tagged fragments.
//!
//! Text fields are cut on the sentence delimiter and packed greedily up to
//! `max_chars`; a sentence is never split, so one sentence longer than the
//! cap becomes a chunk of its own. List fields collapse into a single
//! `"<field>: a, b, c"` chunk. Lengths are counted in characters.

use crate::models::{Chunk, FieldValue, ListItem, ProgramRecord};
use abit_config::ChunkingConfig;

const TERMINAL_PUNCTUATION: [char; 4] = ['.', '!', '?', '…'];

pub struct FieldChunker {
    config: ChunkingConfig,
}

impl FieldChunker {
    pub fn new() -> Self {
        Self::with_config(ChunkingConfig::default())
    }

    pub fn with_config(config: ChunkingConfig) -> Self {
        Self { config }
    }

    /// Chunks in record order, then field order, then packing order.
    pub fn chunk(&self, records: &[ProgramRecord]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for record in records {
            for (field, value) in &record.fields {
                let texts = match value {
                    FieldValue::Text(text) => self.pack_text(text),
                    FieldValue::List(items) => render_list(field, items).into_iter().collect(),
                    FieldValue::Other(_) => Vec::new(),
                };
                chunks.extend(texts.into_iter().map(|text| Chunk {
                    text,
                    source: record.name.clone(),
                    field: field.clone(),
                    url: record.url.clone(),
                }));
            }
        }
        tracing::debug!(records = records.len(), chunks = chunks.len(), "chunked corpus");
        chunks
    }

    fn pack_text(&self, text: &str) -> Vec<String> {
        if text.chars().count() <= self.config.min_field_chars {
            return Vec::new();
        }

        let max = self.config.max_chars;
        let mut out = Vec::new();
        let mut buffer = String::new();
        let mut buffer_len = 0usize;

        for sentence in split_sentences(text, &self.config.sentence_delimiter) {
            let len = sentence.chars().count();
            if buffer_len > 0 && buffer_len + 1 + len > max {
                out.push(std::mem::take(&mut buffer));
                buffer_len = 0;
            }
            if buffer_len > 0 {
                buffer.push(' ');
                buffer_len += 1;
            }
            buffer.push_str(&sentence);
            buffer_len += len;
        }

        if !buffer.is_empty() {
            out.push(buffer);
        }
        out
    }
}

impl Default for FieldChunker {
    fn default() -> Self {
        Self::new()
    }
}

/// Pieces between delimiters, trimmed, with the sentence period restored
/// where the delimiter swallowed it.
fn split_sentences(text: &str, delimiter: &str) -> Vec<String> {
    text.split(delimiter)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            if piece.ends_with(TERMINAL_PUNCTUATION) {
                piece.to_string()
            } else {
                format!("{}.", piece)
            }
        })
        .collect()
}

fn render_list(field: &str, items: &[ListItem]) -> Option<String> {
    let rendered: Vec<String> = items
        .iter()
        .map(ListItem::render)
        .filter(|item| !item.is_empty())
        .collect();
    if rendered.is_empty() {
        return None;
    }
    Some(format!("{}: {}", field, rendered.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: Vec<(&str, FieldValue)>) -> ProgramRecord {
        fields.into_iter().fold(
            ProgramRecord::new("Искусственный интеллект", "https://abit.itmo.ru/program/master/ai"),
            |r, (f, v)| r.with_field(f, v),
        )
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn chunker(max_chars: usize) -> FieldChunker {
        FieldChunker::with_config(ChunkingConfig {
            max_chars,
            ..Default::default()
        })
    }

    #[test]
    fn test_short_text_skipped() {
        let r = record(vec![("about", text("Коротко."))]);
        assert!(FieldChunker::new().chunk(&[r]).is_empty());
    }

    #[test]
    fn test_exactly_min_chars_skipped() {
        let fifty = "а".repeat(50);
        let r = record(vec![("about", text(&fifty))]);
        assert!(FieldChunker::new().chunk(&[r]).is_empty());

        let fifty_one = "а".repeat(51);
        let r = record(vec![("about", text(&fifty_one))]);
        assert_eq!(FieldChunker::new().chunk(&[r]).len(), 1);
    }

    #[test]
    fn test_single_chunk_keeps_text() {
        let body = "Программа длится два года. Обучение идет на русском языке. Есть стипендии.";
        let r = record(vec![("about", text(body))]);
        let chunks = FieldChunker::new().chunk(&[r]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, body);
        assert_eq!(chunks[0].field, "about");
        assert_eq!(chunks[0].source, "Искусственный интеллект");
        assert_eq!(chunks[0].url, "https://abit.itmo.ru/program/master/ai");
    }

    #[test]
    fn test_respects_cap() {
        let sentence = "Это предложение про машинное обучение и данные";
        let body = vec![sentence; 40].join(". ");
        let r = record(vec![("about", text(&body))]);
        let chunks = chunker(200).chunk(&[r]);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 200, "{}", chunk.text);
        }
    }

    #[test]
    fn test_oversized_sentence_kept_whole() {
        let long = "б".repeat(300);
        let body = format!("Первое предложение тут. {}. Последнее предложение тут.", long);
        let r = record(vec![("about", text(&body))]);
        let chunks = chunker(100).chunk(&[r]);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].text, format!("{}.", long));
    }

    #[test]
    fn test_concatenation_reproduces_field() {
        let body = "Первый год посвящен основам. Второй год посвящен практике! \
                    Выпускники работают в индустрии. Многие остаются в науке";
        let r = record(vec![("career", text(body))]);
        let chunks = chunker(60).chunk(&[r]);
        assert!(chunks.len() > 1);
        let joined = chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join(" ");
        let normalize = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(normalize(&joined), normalize(&format!("{}.", body)));
    }

    #[test]
    fn test_list_field_single_chunk() {
        let r = record(vec![(
            "directions",
            FieldValue::List(vec![
                ListItem::Structured {
                    code: "01.04.02".to_string(),
                    name: "Прикладная математика и информатика".to_string(),
                },
                ListItem::Structured {
                    code: "09.04.01".to_string(),
                    name: "Информатика и вычислительная техника".to_string(),
                },
            ]),
        )]);
        let chunks = FieldChunker::new().chunk(&[r]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].text,
            "directions: 01.04.02 Прикладная математика и информатика, \
             09.04.01 Информатика и вычислительная техника"
        );
    }

    #[test]
    fn test_plain_list_and_empty_list() {
        let r = record(vec![
            (
                "companies",
                FieldValue::List(vec![
                    ListItem::Plain("Яндекс".to_string()),
                    ListItem::Plain("Ozon".to_string()),
                ]),
            ),
            ("partners", FieldValue::List(vec![])),
        ]);
        let chunks = FieldChunker::new().chunk(&[r]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "companies: Яндекс, Ozon");
    }

    #[test]
    fn test_other_values_skipped() {
        let r = record(vec![("seats", FieldValue::Other(serde_json::json!(42)))]);
        assert!(FieldChunker::new().chunk(&[r]).is_empty());
    }

    #[test]
    fn test_ordering_follows_records_then_fields() {
        let long = "Достаточно длинный текст о программе, чтобы пройти порог длины поля.";
        let a = ProgramRecord::new("A", "https://a")
            .with_field("about", text(long))
            .with_field("career", text(long));
        let b = ProgramRecord::new("B", "https://b").with_field("about", text(long));
        let chunks = FieldChunker::new().chunk(&[a, b]);
        let tags: Vec<(&str, &str)> = chunks
            .iter()
            .map(|c| (c.source.as_str(), c.field.as_str()))
            .collect();
        assert_eq!(tags, vec![("A", "about"), ("A", "career"), ("B", "about")]);
    }

    #[test]
    fn test_empty_corpus() {
        assert!(FieldChunker::new().chunk(&[]).is_empty());
    }
}
