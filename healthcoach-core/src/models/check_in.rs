use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Self-reported mood on a 1 to 5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Mood(u8);

impl Mood {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, String> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "Invalid mood '{}'. Use a value from {} to {}",
                value,
                Self::MIN,
                Self::MAX
            ))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "Very Bad",
            2 => "Bad",
            3 => "Okay",
            4 => "Good",
            _ => "Great",
        }
    }
}

impl TryFrom<u8> for Mood {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Mood::new(value)
    }
}

impl From<Mood> for u8 {
    fn from(mood: Mood) -> Self {
        mood.0
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid mood '{}'. Use a value from 1 to 5", s))?;
        Mood::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyLevel::Low => write!(f, "Low"),
            EnergyLevel::Medium => write!(f, "Medium"),
            EnergyLevel::High => write!(f, "High"),
        }
    }
}

impl FromStr for EnergyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(EnergyLevel::Low),
            "medium" => Ok(EnergyLevel::Medium),
            "high" => Ok(EnergyLevel::High),
            _ => Err(format!(
                "Invalid energy level '{}'. Valid options: low, medium, high",
                s
            )),
        }
    }
}

/// A partial update of the check-in fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckInUpdate {
    pub mood: Option<Mood>,
    pub energy: Option<EnergyLevel>,
    pub sleep_hours: Option<String>,
    pub other_workout_note: Option<String>,
    pub notes: Option<String>,
}

impl CheckInUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    pub fn with_energy(mut self, energy: EnergyLevel) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn with_sleep_hours(mut self, hours: impl Into<String>) -> Self {
        self.sleep_hours = Some(hours.into());
        self
    }

    pub fn with_other_workout_note(mut self, note: impl Into<String>) -> Self {
        self.other_workout_note = Some(note.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_range() {
        assert!(Mood::new(0).is_err());
        assert!(Mood::new(6).is_err());
        assert_eq!(Mood::new(1).unwrap().label(), "Very Bad");
        assert_eq!(Mood::new(5).unwrap().label(), "Great");
    }

    #[test]
    fn test_mood_from_str() {
        assert_eq!(Mood::from_str(" 4 ").unwrap().value(), 4);
        assert!(Mood::from_str("great").is_err());
        assert!(Mood::from_str("9").is_err());
    }

    #[test]
    fn test_mood_json_is_a_plain_number() {
        let mood = Mood::new(3).unwrap();
        assert_eq!(serde_json::to_string(&mood).unwrap(), "3");
        assert_eq!(serde_json::from_str::<Mood>("3").unwrap(), mood);
        assert!(serde_json::from_str::<Mood>("7").is_err());
    }

    #[test]
    fn test_energy_level_from_str() {
        assert_eq!(EnergyLevel::from_str("LOW").unwrap(), EnergyLevel::Low);
        assert_eq!(EnergyLevel::from_str("Medium").unwrap(), EnergyLevel::Medium);
        assert_eq!(EnergyLevel::from_str("high").unwrap(), EnergyLevel::High);
        assert!(EnergyLevel::from_str("exhausted").is_err());
    }

    #[test]
    fn test_energy_level_json() {
        assert_eq!(
            serde_json::to_string(&EnergyLevel::High).unwrap(),
            "\"High\""
        );
    }

    #[test]
    fn test_check_in_update_is_empty() {
        assert!(CheckInUpdate::new().is_empty());
        assert!(!CheckInUpdate::new().with_notes("").is_empty());
    }
}
