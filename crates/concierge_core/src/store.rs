use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CorpusError;
use crate::model::FaqEntry;
use crate::tokenize::normalize;

/// The FAQ knowledge base. Loaded once, immutable for the process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub entries: Vec<FaqEntry>,
    pub db_version: Option<String>,
}

/// A single record in the plain-array source format. `q`/`a` are accepted as
/// shorthand for `question`/`answer`.
#[derive(Debug, Deserialize)]
struct PlainRecord {
    #[serde(default, alias = "q")]
    question: String,
    #[serde(default, alias = "a")]
    answer: String,
}

/// The rich hotel document format. Every section is optional; FAQ entries are
/// synthesized from whatever is present.
#[derive(Debug, Default, Deserialize)]
struct HotelDocument {
    #[serde(default)]
    db_version: Option<Value>,
    #[serde(default)]
    faq: Vec<FaqItem>,
    #[serde(default)]
    hotel_policies: BTreeMap<String, Value>,
    #[serde(default)]
    rooms: Vec<Room>,
    #[serde(default)]
    amenities: Vec<Amenity>,
    #[serde(default)]
    menus: BTreeMap<String, Vec<MenuItem>>,
}

#[derive(Debug, Default, Deserialize)]
struct FaqItem {
    #[serde(default)]
    question: String,
    #[serde(default)]
    answer: String,
    #[serde(default, alias = "alternates")]
    alts: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Room {
    #[serde(default)]
    room_type: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct Amenity {
    #[serde(default)]
    amenity_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    rules: AmenityRules,
}

#[derive(Debug, Default, Deserialize)]
struct AmenityRules {
    #[serde(default)]
    timings: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct MenuItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
}

impl Corpus {
    pub fn from_entries(entries: Vec<FaqEntry>) -> Self {
        Self {
            entries,
            db_version: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.question.as_str())
    }

    /// Loads the corpus from a JSON file. The root may be a plain array of
    /// question/answer records, or a hotel document object whose sections are
    /// flattened into question/answer pairs.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        if !path.exists() {
            return Err(CorpusError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        // Tolerate a UTF-8 BOM left behind by Windows editors.
        let corpus = Self::from_json(text.strip_prefix('\u{feff}').unwrap_or(&text))?;
        tracing::debug!(
            path = %path.display(),
            entries = corpus.len(),
            "loaded FAQ corpus"
        );
        Ok(corpus)
    }

    pub fn from_json(text: &str) -> Result<Self, CorpusError> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Array(_) => Self::from_plain_records(value),
            Value::Object(_) => Self::from_document(value),
            _ => Err(CorpusError::UnsupportedRoot),
        }
    }

    /// Strict parse of the plain-array format. Every record must carry a
    /// non-empty question and answer; duplicates are kept as-is.
    fn from_plain_records(value: Value) -> Result<Self, CorpusError> {
        let records: Vec<PlainRecord> = serde_json::from_value(value)?;
        let mut entries = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            let question = record.question.trim();
            let answer = record.answer.trim();
            if question.is_empty() {
                return Err(CorpusError::EmptyField {
                    index,
                    field: "question",
                });
            }
            if answer.is_empty() {
                return Err(CorpusError::EmptyField {
                    index,
                    field: "answer",
                });
            }
            entries.push(FaqEntry::new(question, answer));
        }

        Ok(Self::from_entries(entries))
    }

    /// Flattens a rich hotel document into FAQ entries. Sections beyond the
    /// explicit `faq` list are synthesized into lightweight question variants
    /// so guests get more hits; blank items are skipped rather than rejected.
    fn from_document(value: Value) -> Result<Self, CorpusError> {
        let doc: HotelDocument = serde_json::from_value(value)?;
        let mut builder = EntryBuilder::default();

        for item in &doc.faq {
            let question = item.question.trim();
            let answer = item.answer.trim();
            if question.is_empty() || answer.is_empty() {
                continue;
            }
            builder.push(question, answer);
            for alt in &item.alts {
                if !alt.trim().is_empty() {
                    builder.push(alt.trim(), answer);
                }
            }
        }

        for (key, value) in &doc.hotel_policies {
            if let Some(text) = value.as_str().map(str::trim).filter(|t| !t.is_empty()) {
                let topic = key.replace('_', " ");
                let topic = topic.trim();
                builder.push(topic, text);
                builder.push(&format!("what is {topic}"), text);
            }
        }

        for room in &doc.rooms {
            let room_type = room.room_type.trim();
            let description = room.description.trim();
            if room_type.is_empty() || description.is_empty() {
                continue;
            }
            builder.push(&format!("what is {room_type}"), description);
            builder.push(&format!("tell me about {room_type}"), description);
            builder.push(room_type, description);
        }

        for amenity in &doc.amenities {
            let name = amenity.amenity_name.trim();
            let description = amenity.description.trim();
            if !name.is_empty() && !description.is_empty() {
                builder.push(name, description);
                builder.push(&format!("tell me about {name}"), description);
            }
            if let (false, Some(timings)) = (name.is_empty(), &amenity.rules.timings) {
                let timings = value_to_text(timings);
                if !timings.is_empty() {
                    builder.push(&format!("{name} timings"), &timings);
                }
            }
        }

        for (meal, items) in &doc.menus {
            for item in items {
                let name = item.name.trim();
                let description = item.description.trim();
                if name.is_empty() || description.is_empty() {
                    continue;
                }
                builder.push(&format!("what is in {name}"), description);
                builder.push(name, description);
            }
            builder.push(
                &format!("what is in {meal} menu"),
                &format!("{} menu available.", title_case(meal)),
            );
        }

        Ok(Self {
            entries: builder.entries,
            db_version: doc.db_version.as_ref().and_then(version_to_text),
        })
    }
}

/// Accumulates synthesized entries, de-duplicating by
/// (normalized question, answer).
#[derive(Default)]
struct EntryBuilder {
    entries: Vec<FaqEntry>,
    seen: HashSet<(String, String)>,
}

impl EntryBuilder {
    fn push(&mut self, question: &str, answer: &str) {
        let key = (normalize(question), answer.to_string());
        if self.seen.insert(key) {
            self.entries.push(FaqEntry::new(question, answer));
        }
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn version_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_plain_array() {
        let corpus = Corpus::from_json(
            r#"[{"question": "What time is check-in?", "answer": "Check-in starts at 3:00 PM."}]"#,
        )
        .unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.entries[0].question, "What time is check-in?");
    }

    #[test]
    fn accepts_short_field_names() {
        let corpus =
            Corpus::from_json(r#"[{"q": "Is breakfast included?", "a": "Yes"}]"#).unwrap();
        assert_eq!(corpus.entries[0].answer, "Yes");
    }

    #[test]
    fn keeps_duplicate_records_in_plain_arrays() {
        let corpus = Corpus::from_json(
            r#"[{"q": "Is breakfast included?", "a": "Yes"},
                {"q": "Is breakfast included?", "a": "Yes"}]"#,
        )
        .unwrap();
        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn rejects_empty_answer() {
        let err = Corpus::from_json(r#"[{"question": "Anything?", "answer": "  "}]"#).unwrap_err();
        match err {
            CorpusError::EmptyField { index, field } => {
                assert_eq!(index, 0);
                assert_eq!(field, "answer");
            }
            other => panic!("expected EmptyField, got {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_question() {
        let err = Corpus::from_json(r#"[{"answer": "Yes"}]"#).unwrap_err();
        assert!(matches!(
            err,
            CorpusError::EmptyField {
                field: "question",
                ..
            }
        ));
    }

    #[test]
    fn rejects_scalar_root() {
        assert!(matches!(
            Corpus::from_json("42").unwrap_err(),
            CorpusError::UnsupportedRoot
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = Corpus::load(Path::new("/nonexistent/hotel_faq.json")).unwrap_err();
        assert!(matches!(err, CorpusError::NotFound(_)));
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"q": "Is parking free?", "a": "Yes, for guests."}}]"#).unwrap();
        let corpus = Corpus::load(file.path()).unwrap();
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn synthesizes_entries_from_hotel_document() {
        let corpus = Corpus::from_json(
            r#"{
                "db_version": "2.1",
                "faq": [
                    {"question": "Is breakfast included?", "answer": "Yes, 7-10 AM.",
                     "alts": ["Do you serve breakfast?"]}
                ],
                "hotel_policies": {"late_checkout": "Until 1 PM for a small fee."},
                "rooms": [{"room_type": "Deluxe Suite", "description": "A suite with a sea view."}],
                "amenities": [{"amenity_name": "Pool", "description": "Rooftop pool.",
                               "rules": {"timings": "6 AM - 9 PM"}}],
                "menus": {"breakfast": [{"name": "Continental Plate",
                                          "description": "Croissant, fruit and coffee."}]}
            }"#,
        )
        .unwrap();

        assert_eq!(corpus.db_version.as_deref(), Some("2.1"));

        let questions: Vec<&str> = corpus.questions().collect();
        assert!(questions.contains(&"Is breakfast included?"));
        assert!(questions.contains(&"Do you serve breakfast?"));
        assert!(questions.contains(&"what is late checkout"));
        assert!(questions.contains(&"tell me about Deluxe Suite"));
        assert!(questions.contains(&"Pool timings"));
        assert!(questions.contains(&"what is in Continental Plate"));
        assert!(questions.contains(&"what is in breakfast menu"));
    }

    #[test]
    fn document_synthesis_deduplicates_variants() {
        let corpus = Corpus::from_json(
            r#"{"faq": [
                {"question": "Is parking free?", "answer": "Yes."},
                {"question": "is parking FREE", "answer": "Yes."}
            ]}"#,
        )
        .unwrap();
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn document_skips_blank_faq_items() {
        let corpus = Corpus::from_json(
            r#"{"faq": [
                {"question": "", "answer": "orphan"},
                {"question": "Is the gym open?", "answer": "Around the clock."}
            ]}"#,
        )
        .unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.entries[0].question, "Is the gym open?");
    }
}
