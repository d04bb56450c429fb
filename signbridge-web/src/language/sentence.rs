//! Gesture labels to natural-language sentences
//!
//! Each label maps to a set of equivalent phrasings picked uniformly at
//! random, so output for a given label sequence is not deterministic. A few
//! context rules over the trailing window take precedence:
//!
//! 1. pain + a body part → a pain sentence about that part
//! 2. medical context with an emergency cue + doctor/hospital → fixed alert
//! 3. a need + "please" → combined need sentence
//! 4. otherwise the last three labels' sentences, space-joined

use rand::seq::IndexedRandom;
use rand::Rng;

/// Labels considered for context rules
pub const CONTEXT_WINDOW: usize = 5;

/// Labels joined by the fallback rule
const COMBINE_LAST: usize = 3;

const BODY_PARTS: [&str; 7] = ["head", "chest", "stomach", "back", "arm", "leg", "hand"];

const MEDICAL_KEYWORDS: [&str; 8] = [
    "pain", "doctor", "medicine", "hospital", "fever", "hurt", "help", "emergency",
];

const NEEDS: [&str; 5] = ["water", "food", "medicine", "help", "bathroom"];

pub const EMERGENCY_DOCTOR: &str = "This is an emergency! Please call a doctor immediately!";
pub const EMERGENCY_HOSPITAL: &str = "Emergency! I need to go to the hospital right now!";

/// Equivalent phrasings for one label
pub struct SentenceTemplate {
    pub patterns: &'static [&'static str],
}

const fn t(patterns: &'static [&'static str]) -> SentenceTemplate {
    SentenceTemplate { patterns }
}

pub static SENTENCE_TEMPLATES: &[(&str, SentenceTemplate)] = &[
    // Greetings
    ("hello", t(&["Hello!", "Hi there!", "Greetings!", "Hey!"])),
    ("goodbye", t(&["Goodbye!", "See you later!", "Take care!", "Bye!"])),
    ("thank_you", t(&["Thank you!", "Thanks so much!", "I appreciate it.", "Thank you very much!"])),
    ("please", t(&["Please.", "If you please.", "Would you please?"])),
    ("sorry", t(&["I'm sorry.", "My apologies.", "Excuse me.", "Sorry about that."])),
    // Responses
    ("yes", t(&["Yes.", "That's correct.", "I agree.", "Absolutely.", "Right."])),
    ("no", t(&["No.", "I disagree.", "That's not right.", "I don't think so."])),
    ("ok", t(&["OK.", "Alright.", "That's fine.", "Sounds good."])),
    ("good", t(&["Good!", "That's good.", "Great!", "Excellent!"])),
    ("bad", t(&["Bad.", "That's not good.", "Not great.", "Poor."])),
    // Requests
    ("help", t(&["I need help.", "Can you help me?", "Please help!", "Help me please."])),
    ("stop", t(&["Stop!", "Please stop.", "Wait, stop.", "Hold on."])),
    ("wait", t(&["Wait.", "Please wait.", "Hold on a moment.", "Just a moment."])),
    ("come", t(&["Come here.", "Please come.", "Come with me.", "Follow me."])),
    ("go", t(&["Go.", "Let's go.", "Time to go.", "We should go."])),
    // Medical
    ("pain", t(&["I am in pain.", "It hurts.", "I feel pain.", "I'm hurting."])),
    ("pain_head", t(&["I have a headache.", "My head hurts.", "Head pain.", "Severe headache."])),
    ("pain_chest", t(&["I have chest pain.", "My chest hurts.", "Chest pain!", "My heart hurts."])),
    ("pain_stomach", t(&["I have stomach pain.", "My stomach hurts.", "Stomachache.", "Abdominal pain."])),
    ("fever", t(&["I have a fever.", "I feel hot.", "High temperature.", "I'm burning up."])),
    ("medicine", t(&["I need medicine.", "Where is my medicine?", "Give me medicine.", "Medication please."])),
    ("doctor", t(&["I need a doctor.", "Call a doctor.", "Where is the doctor?", "Get a doctor please."])),
    ("hospital", t(&["Take me to the hospital.", "I need to go to hospital.", "Hospital please.", "Emergency room."])),
    ("emergency", t(&["This is an emergency!", "Emergency!", "Call for help!", "Urgent help needed!"])),
    // Daily needs
    ("water", t(&["I need water.", "Can I have water?", "Water please.", "I'm thirsty."])),
    ("food", t(&["I am hungry.", "I need food.", "Food please.", "Can I eat?"])),
    ("eat", t(&["I want to eat.", "Time to eat.", "Let's eat.", "I need to eat."])),
    ("drink", t(&["I want to drink.", "I'm thirsty.", "Something to drink.", "Drink please."])),
    ("bathroom", t(&["Where is the bathroom?", "I need the bathroom.", "Bathroom please.", "Restroom?"])),
    ("sleep", t(&["I am tired.", "I need to sleep.", "I want to rest.", "Time for sleep."])),
    // Emotions
    ("happy", t(&["I am happy.", "I feel good.", "I'm feeling great!", "So happy!"])),
    ("sad", t(&["I am sad.", "I feel down.", "I'm not feeling well.", "Feeling sad."])),
    ("angry", t(&["I am angry.", "I'm upset.", "This makes me angry.", "I'm frustrated."])),
    ("scared", t(&["I am scared.", "I'm afraid.", "I'm frightened.", "Help, I'm scared!"])),
    // Expressions
    ("i_love_you", t(&["I love you.", "Love you!", "I love you so much."])),
    ("call", t(&["Call someone.", "Make a phone call.", "I need to call.", "Phone call please."])),
    ("home", t(&["I want to go home.", "Take me home.", "Home please.", "Let's go home."])),
    ("work", t(&["I have to work.", "Going to work.", "Work time.", "At work."])),
    ("money", t(&["I need money.", "Money please.", "How much money?", "Pay money."])),
    ("time", t(&["What time is it?", "I need time.", "Time please.", "Check the time."])),
    ("today", t(&["Today.", "For today.", "Happening today.", "This is for today."])),
    ("tomorrow", t(&["Tomorrow.", "See you tomorrow.", "For tomorrow.", "Happening tomorrow."])),
];

/// Template key for a label: lowercase, whitespace runs become `_`
pub fn template_key(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join("_").to_lowercase()
}

pub fn find_sentence_template(label: &str) -> Option<&'static SentenceTemplate> {
    let key = template_key(label);
    SENTENCE_TEMPLATES.iter().find(|(k, _)| *k == key).map(|(_, t)| t)
}

pub fn has_template(label: &str) -> bool {
    find_sentence_template(label).is_some()
}

/// Title-cased names of every label with a template
pub fn available_gestures() -> Vec<String> {
    SENTENCE_TEMPLATES
        .iter()
        .map(|(key, _)| {
            key.split('_')
                .map(capitalize)
                .collect::<Vec<String>>()
                .join(" ")
        })
        .collect()
}

fn window_contains(window: &[String], needle: &str) -> bool {
    window.iter().any(|l| l.contains(needle))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Default)]
pub struct SentenceComposer;

impl SentenceComposer {
    pub fn new() -> Self {
        Self
    }

    /// One random phrasing for a single label, or `"{label}."` if unknown
    pub fn sentence_for<R: Rng + ?Sized>(&self, label: &str, rng: &mut R) -> String {
        find_sentence_template(label)
            .and_then(|t| t.patterns.choose(rng))
            .map(|p| p.to_string())
            .unwrap_or_else(|| format!("{}.", label))
    }

    /// Compose a sentence from the emitted label history, oldest first
    pub fn compose<S: AsRef<str>, R: Rng + ?Sized>(&self, labels: &[S], rng: &mut R) -> String {
        match labels {
            [] => return String::new(),
            [only] => return self.sentence_for(only.as_ref(), rng),
            _ => {}
        }

        let window = &labels[labels.len().saturating_sub(CONTEXT_WINDOW)..];
        let lower: Vec<String> = window.iter().map(|l| l.as_ref().to_lowercase()).collect();
        let any_contains = |needle: &str| window_contains(&lower, needle);

        let n = lower.len();
        let recent_pain = lower[n - 1].contains("pain") || lower[n - 2].contains("pain");
        if recent_pain {
            if let Some(part) = BODY_PARTS.iter().find(|p| window_contains(&lower, p)) {
                let options = [
                    format!("I have {} pain.", part),
                    format!("My {} hurts.", part),
                    format!("I'm experiencing pain in my {}.", part),
                    format!("Help, my {} is hurting.", part),
                ];
                let idx = rng.random_range(0..options.len());
                return options[idx].clone();
            }
        }

        if MEDICAL_KEYWORDS.iter().any(|k| window_contains(&lower, k)) {
            let emergency = any_contains("emergency") || any_contains("help");
            if emergency && any_contains("doctor") {
                return EMERGENCY_DOCTOR.to_string();
            }
            if emergency && any_contains("hospital") {
                return EMERGENCY_HOSPITAL.to_string();
            }
        }

        if any_contains("please") {
            if let Some(need) = NEEDS.iter().find(|n| window_contains(&lower, n)) {
                return format!("{} please. I need {}.", capitalize(need), need);
            }
        }

        window[window.len().saturating_sub(COMBINE_LAST)..]
            .iter()
            .map(|l| self.sentence_for(l.as_ref(), rng))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn patterns(label: &str) -> &'static [&'static str] {
        find_sentence_template(label).unwrap().patterns
    }

    #[test]
    fn test_keys() {
        assert_eq!(template_key("Thank You"), "thank_you");
        assert_eq!(template_key("I  Love\tYou"), "i_love_you");
        assert!(has_template("I Love You"));
        assert!(!has_template("Juggle"));
        assert!(available_gestures().contains(&"Thank You".to_string()));
    }

    #[test]
    fn test_every_template_has_patterns() {
        let composer = SentenceComposer::new();
        let mut rng = StdRng::seed_from_u64(9);
        for (key, template) in SENTENCE_TEMPLATES {
            assert!(!template.patterns.is_empty(), "{}", key);
            let s = composer.sentence_for(key, &mut rng);
            assert!(template.patterns.contains(&s.as_str()), "{} -> {}", key, s);
        }
    }

    #[test]
    fn test_empty_history() {
        let mut rng = StdRng::seed_from_u64(0);
        let empty: [&str; 0] = [];
        assert_eq!(SentenceComposer::new().compose(&empty, &mut rng), "");
    }

    #[test]
    fn test_single_label_uses_its_patterns() {
        let composer = SentenceComposer::new();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let s = composer.compose(&["Hello"], &mut rng);
            assert!(patterns("hello").contains(&s.as_str()), "{}", s);
        }
    }

    #[test]
    fn test_unknown_label_verbatim() {
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(SentenceComposer::new().compose(&["Juggle"], &mut rng), "Juggle.");
    }

    #[test]
    fn test_pain_with_body_part() {
        let composer = SentenceComposer::new();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let s = composer.compose(&["Pain", "Head"], &mut rng);
            assert!(s.to_lowercase().contains("head"), "{}", s);
            assert!(s.ends_with('.'), "{}", s);
        }
    }

    #[test]
    fn test_pain_too_old_is_ignored() {
        let composer = SentenceComposer::new();
        let mut rng = StdRng::seed_from_u64(4);
        let s = composer.compose(&["Pain", "Head", "Yes", "No"], &mut rng);
        assert!(!s.contains("pain in my"));
        assert!(!s.contains("hurting"));
    }

    #[test]
    fn test_emergency_rules() {
        let composer = SentenceComposer::new();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(composer.compose(&["Emergency", "Doctor"], &mut rng), EMERGENCY_DOCTOR);
        assert_eq!(composer.compose(&["Help", "Hospital"], &mut rng), EMERGENCY_HOSPITAL);
    }

    #[test]
    fn test_need_with_please() {
        let composer = SentenceComposer::new();
        let mut rng = StdRng::seed_from_u64(6);
        assert_eq!(
            composer.compose(&["Water", "Please"], &mut rng),
            "Water please. I need water."
        );
    }

    #[test]
    fn test_fallback_joins_last_three() {
        let composer = SentenceComposer::new();
        let mut rng = StdRng::seed_from_u64(7);
        let labels = ["Go", "Hello", "Yes", "Juggle"];
        let s = composer.compose(&labels, &mut rng);

        assert!(s.ends_with(" Juggle."), "{}", s);
        assert!(!patterns("go").iter().any(|p| s.starts_with(p)), "{}", s);
        assert!(patterns("hello").iter().any(|p| s.starts_with(p)), "{}", s);
        assert!(patterns("yes").iter().any(|p| s.contains(p)), "{}", s);
    }

    #[test]
    fn test_seeded_output_repeats() {
        let composer = SentenceComposer::new();
        let labels = ["Hello", "Good", "Tomorrow"];
        let a = composer.compose(&labels, &mut StdRng::seed_from_u64(11));
        let b = composer.compose(&labels, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }
}
