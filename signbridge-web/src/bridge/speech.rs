//! Web Speech API synthesizer

use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance};

use crate::config::SpeechOptions;
use crate::services::SpeechSynthesizer;

/// Silent when the browser has no speech support
pub struct BrowserSpeech {
    synthesis: Option<SpeechSynthesis>,
}

impl BrowserSpeech {
    pub fn new() -> Self {
        let synthesis = web_sys::window().and_then(|w| w.speech_synthesis().ok());
        if synthesis.is_none() {
            console_log!("speech synthesis unavailable");
        }
        Self { synthesis }
    }
}

impl Default for BrowserSpeech {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechSynthesizer for BrowserSpeech {
    fn speak(&mut self, text: &str, options: &SpeechOptions) {
        let Some(synthesis) = &self.synthesis else {
            return;
        };

        // Replace any ongoing utterance
        synthesis.cancel();

        match SpeechSynthesisUtterance::new_with_text(text) {
            Ok(utterance) => {
                utterance.set_lang(&options.language);
                utterance.set_rate(options.rate);
                utterance.set_pitch(options.pitch);
                utterance.set_volume(options.volume);
                synthesis.speak(&utterance);
            }
            Err(e) => console_log!("failed to create utterance: {:?}", e),
        }
    }

    fn stop(&mut self) {
        if let Some(synthesis) = &self.synthesis {
            synthesis.cancel();
        }
    }
}
