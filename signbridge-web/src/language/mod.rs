//! Sentence composition and conversation history
//!
//! Re-exports only. All logic in submodules.

pub mod conversation;
pub mod sentence;

pub use conversation::{ConversationEntry, ConversationLog};
pub use sentence::{
    available_gestures, find_sentence_template, has_template, template_key, SentenceComposer,
    SentenceTemplate, CONTEXT_WINDOW, SENTENCE_TEMPLATES,
};
