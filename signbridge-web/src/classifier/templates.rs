//! Built-in gesture templates
//!
//! Finger states are `[thumb, index, middle, ring, pinky]`, true = extended.
//! Motion and hand shape are only consulted by the shape classifier.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Motion {
    Static,
    Wave,
    Forward,
    Nod,
    Shake,
    Up,
    Down,
    Circle,
    Chest,
    Toward,
    Away,
    ToMouth,
    Tap,
    Twist,
    Wrist,
    Draw,
    Palm,
    Ear,
    Rub,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandShape {
    Open,
    Flat,
    Fist,
    Point,
    ThumbUp,
    ThumbDown,
    Ily,
    Ok,
    Pinch,
    Cup,
    W,
    Cross,
    Phone,
    Roof,
    Rub,
    Peace,
    Three,
    Four,
}

impl HandShape {
    /// Finger count that identifies this shape, if any
    pub fn finger_count(self) -> Option<u8> {
        match self {
            HandShape::Fist => Some(0),
            HandShape::Point => Some(1),
            HandShape::Peace => Some(2),
            HandShape::Three => Some(3),
            HandShape::Four => Some(4),
            HandShape::Open => Some(5),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub finger_states: [bool; 5],
    pub motion: Motion,
    pub hand_shape: HandShape,
}

const fn template(
    name: &'static str,
    description: &'static str,
    states: [u8; 5],
    motion: Motion,
    hand_shape: HandShape,
) -> GestureTemplate {
    GestureTemplate {
        name,
        description,
        finger_states: [states[0] == 1, states[1] == 1, states[2] == 1, states[3] == 1, states[4] == 1],
        motion,
        hand_shape,
    }
}

use HandShape as S;
use Motion as M;

pub static GESTURE_TEMPLATES: [GestureTemplate; 35] = [
    template("Hello", "Open palm wave", [1, 1, 1, 1, 1], M::Wave, S::Open),
    template("Thank You", "Flat hand from chin", [1, 1, 1, 1, 1], M::Forward, S::Flat),
    template("Yes", "Fist nodding", [0, 0, 0, 0, 0], M::Nod, S::Fist),
    template("No", "Index and middle together", [0, 1, 1, 0, 0], M::Shake, S::Point),
    template("Help", "Thumbs up on palm", [1, 0, 0, 0, 0], M::Up, S::ThumbUp),
    template("Please", "Flat hand on chest", [1, 1, 1, 1, 1], M::Circle, S::Flat),
    template("Sorry", "Fist on chest circle", [0, 0, 0, 0, 0], M::Chest, S::Fist),
    template("I Love You", "ILY handshape", [1, 1, 0, 0, 1], M::Static, S::Ily),
    template("Good", "Thumbs up", [1, 0, 0, 0, 0], M::Static, S::ThumbUp),
    template("Bad", "Thumbs down", [1, 0, 0, 0, 0], M::Static, S::ThumbDown),
    template("OK", "OK sign", [1, 1, 1, 1, 1], M::Static, S::Ok),
    template("Stop", "Open palm forward", [1, 1, 1, 1, 1], M::Forward, S::Open),
    template("Come", "Beckoning motion", [0, 1, 0, 0, 0], M::Toward, S::Point),
    template("Go", "Pointing forward", [0, 1, 0, 0, 0], M::Away, S::Point),
    template("Wait", "Open hand up", [1, 1, 1, 1, 1], M::Down, S::Open),
    template("Eat", "Fingers to mouth", [1, 1, 1, 0, 0], M::ToMouth, S::Pinch),
    template("Drink", "Thumb to mouth", [1, 0, 0, 0, 0], M::ToMouth, S::Cup),
    template("Water", "W handshape", [0, 1, 1, 1, 0], M::Tap, S::W),
    template("Pain", "Index fingers together", [0, 1, 0, 0, 0], M::Twist, S::Point),
    template("Doctor", "D on wrist", [0, 1, 0, 0, 0], M::Wrist, S::Flat),
    template("Hospital", "H on arm", [0, 1, 1, 0, 0], M::Draw, S::Cross),
    template("Medicine", "M on palm", [0, 0, 0, 0, 0], M::Palm, S::Pinch),
    template("Emergency", "E handshape shaking", [0, 0, 0, 0, 0], M::Shake, S::Open),
    template("Call", "Phone gesture", [1, 0, 0, 0, 1], M::Ear, S::Phone),
    template("Home", "Flat hand on cheek", [1, 1, 1, 1, 1], M::Static, S::Roof),
    template("Work", "Fists together", [0, 0, 0, 0, 0], M::Tap, S::Fist),
    template("Money", "Flat hand tap palm", [1, 1, 1, 1, 1], M::Rub, S::Rub),
    template("Time", "Point to wrist", [0, 1, 0, 0, 0], M::Wrist, S::Point),
    template("Today", "Y hands down", [1, 0, 0, 0, 1], M::Down, S::Flat),
    template("Tomorrow", "A thumb forward", [1, 0, 0, 0, 0], M::Forward, S::ThumbUp),
    template("One", "Index finger up", [0, 1, 0, 0, 0], M::Static, S::Point),
    template("Two", "Index and middle up", [0, 1, 1, 0, 0], M::Static, S::Peace),
    template("Three", "Three fingers up", [0, 1, 1, 1, 0], M::Static, S::Three),
    template("Four", "Four fingers up, thumb folded", [0, 1, 1, 1, 1], M::Static, S::Four),
    template("Five", "All fingers spread", [1, 1, 1, 1, 1], M::Static, S::Open),
];

pub fn find_template(name: &str) -> Option<&'static GestureTemplate> {
    GESTURE_TEMPLATES.iter().find(|t| t.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_unique() {
        let names: HashSet<_> = GESTURE_TEMPLATES.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), GESTURE_TEMPLATES.len());
    }

    #[test]
    fn test_lookup() {
        let ily = find_template("I Love You").unwrap();
        assert_eq!(ily.finger_states, [true, true, false, false, true]);
        assert_eq!(ily.hand_shape, HandShape::Ily);
        assert!(find_template("Juggle").is_none());
    }

    #[test]
    fn test_shape_counts() {
        assert_eq!(HandShape::Peace.finger_count(), Some(2));
        assert_eq!(HandShape::Cup.finger_count(), None);
    }
}
