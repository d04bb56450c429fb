//! Text-to-speech contract
//!
//! Fire and forget: `speak` replaces whatever is being said, `stop` cancels.

use crate::config::SpeechOptions;

pub trait SpeechSynthesizer {
    fn speak(&mut self, text: &str, options: &SpeechOptions);
    fn stop(&mut self);
}

/// Keeps every utterance instead of playing it
#[derive(Debug, Default)]
pub struct RecordingSynthesizer {
    pub utterances: Vec<(String, SpeechOptions)>,
    pub stops: usize,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_text(&self) -> Option<&str> {
        self.utterances.last().map(|(text, _)| text.as_str())
    }
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn speak(&mut self, text: &str, options: &SpeechOptions) {
        self.utterances.push((text.to_string(), options.clone()));
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_utterances() {
        let mut speech = RecordingSynthesizer::new();
        let options = SpeechOptions {
            rate: 0.8,
            ..Default::default()
        };
        speech.speak("Hello!", &options);
        speech.stop();

        assert_eq!(speech.last_text(), Some("Hello!"));
        assert_eq!(speech.utterances[0].1.rate, 0.8);
        assert_eq!(speech.stops, 1);
    }
}
