//! Append-only log of emitted gestures and the sentences composed for them

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationEntry {
    pub gesture: String,
    pub composed_sentence: String,
    pub confidence: f32,
    pub timestamp_ms: f64,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversationLog {
    entries: Vec<ConversationEntry>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: ConversationEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&ConversationEntry> {
        self.entries.last()
    }

    /// Emitted gesture labels, oldest first
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.gesture.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(gesture: &str, ts: f64) -> ConversationEntry {
        ConversationEntry {
            gesture: gesture.to_string(),
            composed_sentence: format!("{}.", gesture),
            confidence: 0.9,
            timestamp_ms: ts,
        }
    }

    #[test]
    fn test_append_keeps_order() {
        let mut log = ConversationLog::new();
        log.append(entry("Hello", 0.0));
        log.append(entry("Water", 2000.0));

        assert_eq!(log.len(), 2);
        assert_eq!(log.labels(), vec!["Hello", "Water"]);
        assert_eq!(log.latest().map(|e| e.gesture.as_str()), Some("Water"));
    }

    #[test]
    fn test_clear() {
        let mut log = ConversationLog::new();
        log.append(entry("Yes", 0.0));
        log.clear();
        assert!(log.is_empty());
        assert!(log.latest().is_none());
    }

    #[test]
    fn test_entry_json_shape() {
        let json = serde_json::to_value(entry("Hello", 5.0)).unwrap();
        assert_eq!(json["gesture"], "Hello");
        assert_eq!(json["composedSentence"], "Hello.");
        assert!(json.get("sentence").is_none());
        assert_eq!(json["timestampMs"], 5.0);
    }
}
