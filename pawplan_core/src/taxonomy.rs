//! Curriculum taxonomy: lesson formats and lesson concepts.
//!
//! Both enums are closed and purely descriptive. Display titles are Dutch,
//! matching the documents the business hands to clients.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Lesson formats
// ============================================================================

/// How a curriculum component is delivered
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum LessonFormat {
    Preparation,
    Equipment,
    Comprehension,
    Practice,
    Exercise,
    Demonstration,
}

impl LessonFormat {
    pub const ALL: [LessonFormat; 6] = [
        LessonFormat::Preparation,
        LessonFormat::Equipment,
        LessonFormat::Comprehension,
        LessonFormat::Practice,
        LessonFormat::Exercise,
        LessonFormat::Demonstration,
    ];

    /// Order in which formats compete for a synthesized tagline prefix
    pub const TAGLINE_PRIORITY: [LessonFormat; 6] = [
        LessonFormat::Comprehension,
        LessonFormat::Practice,
        LessonFormat::Exercise,
        LessonFormat::Demonstration,
        LessonFormat::Preparation,
        LessonFormat::Equipment,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            LessonFormat::Preparation => "Voorbereiding",
            LessonFormat::Equipment => "Materiaal",
            LessonFormat::Comprehension => "Begrip",
            LessonFormat::Practice => "Praktijk",
            LessonFormat::Exercise => "Oefening",
            LessonFormat::Demonstration => "Demonstratie",
        }
    }
}

impl fmt::Display for LessonFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

// ============================================================================
// Lesson concepts
// ============================================================================

/// Pedagogical tag describing what a component teaches
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum LessonConcept {
    Attention,
    NameRecognition,
    MarkerTraining,
    Reward,
    Motivation,
    Focus,
    EyeContact,
    Sit,
    Down,
    Stand,
    Stay,
    Recall,
    LooseLeashWalking,
    Heel,
    Wait,
    LeaveIt,
    Drop,
    Place,
    Settle,
    Relaxation,
    ImpulseControl,
    FrustrationTolerance,
    Patience,
    Socialization,
    Habituation,
    DogEncounters,
    PeopleEncounters,
    ChildSafety,
    HouseTraining,
    CrateTraining,
    AloneTime,
    Handling,
    Grooming,
    VetVisit,
    MuzzleTraining,
    CarTravel,
    Jumping,
    Mouthing,
    Barking,
    Pulling,
    ResourceGuarding,
    Reactivity,
    Fear,
    Stress,
    BodyLanguage,
    CalmingSignals,
    Communication,
    Bonding,
    Play,
    TugPlay,
    Retrieve,
    NoseWork,
    Tracking,
    MentalEnrichment,
    Tricks,
    Targeting,
    Shaping,
    Luring,
    Capturing,
    Generalization,
    Proofing,
    Distance,
    Duration,
    Distraction,
    Routine,
    Management,
    Nutrition,
    PhysicalActivity,
    Rest,
    Puppyhood,
    Adolescence,
    Senior,
    Gear,
    Safety,
}

impl LessonConcept {
    pub const ALL: [LessonConcept; 74] = [
        LessonConcept::Attention,
        LessonConcept::NameRecognition,
        LessonConcept::MarkerTraining,
        LessonConcept::Reward,
        LessonConcept::Motivation,
        LessonConcept::Focus,
        LessonConcept::EyeContact,
        LessonConcept::Sit,
        LessonConcept::Down,
        LessonConcept::Stand,
        LessonConcept::Stay,
        LessonConcept::Recall,
        LessonConcept::LooseLeashWalking,
        LessonConcept::Heel,
        LessonConcept::Wait,
        LessonConcept::LeaveIt,
        LessonConcept::Drop,
        LessonConcept::Place,
        LessonConcept::Settle,
        LessonConcept::Relaxation,
        LessonConcept::ImpulseControl,
        LessonConcept::FrustrationTolerance,
        LessonConcept::Patience,
        LessonConcept::Socialization,
        LessonConcept::Habituation,
        LessonConcept::DogEncounters,
        LessonConcept::PeopleEncounters,
        LessonConcept::ChildSafety,
        LessonConcept::HouseTraining,
        LessonConcept::CrateTraining,
        LessonConcept::AloneTime,
        LessonConcept::Handling,
        LessonConcept::Grooming,
        LessonConcept::VetVisit,
        LessonConcept::MuzzleTraining,
        LessonConcept::CarTravel,
        LessonConcept::Jumping,
        LessonConcept::Mouthing,
        LessonConcept::Barking,
        LessonConcept::Pulling,
        LessonConcept::ResourceGuarding,
        LessonConcept::Reactivity,
        LessonConcept::Fear,
        LessonConcept::Stress,
        LessonConcept::BodyLanguage,
        LessonConcept::CalmingSignals,
        LessonConcept::Communication,
        LessonConcept::Bonding,
        LessonConcept::Play,
        LessonConcept::TugPlay,
        LessonConcept::Retrieve,
        LessonConcept::NoseWork,
        LessonConcept::Tracking,
        LessonConcept::MentalEnrichment,
        LessonConcept::Tricks,
        LessonConcept::Targeting,
        LessonConcept::Shaping,
        LessonConcept::Luring,
        LessonConcept::Capturing,
        LessonConcept::Generalization,
        LessonConcept::Proofing,
        LessonConcept::Distance,
        LessonConcept::Duration,
        LessonConcept::Distraction,
        LessonConcept::Routine,
        LessonConcept::Management,
        LessonConcept::Nutrition,
        LessonConcept::PhysicalActivity,
        LessonConcept::Rest,
        LessonConcept::Puppyhood,
        LessonConcept::Adolescence,
        LessonConcept::Senior,
        LessonConcept::Gear,
        LessonConcept::Safety,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            LessonConcept::Attention => "Aandacht",
            LessonConcept::NameRecognition => "Naamherkenning",
            LessonConcept::MarkerTraining => "Markertraining",
            LessonConcept::Reward => "Beloning",
            LessonConcept::Motivation => "Motivatie",
            LessonConcept::Focus => "Focus",
            LessonConcept::EyeContact => "Oogcontact",
            LessonConcept::Sit => "Zit",
            LessonConcept::Down => "Af",
            LessonConcept::Stand => "Sta",
            LessonConcept::Stay => "Blijf",
            LessonConcept::Recall => "Hier",
            LessonConcept::LooseLeashWalking => "Lijnlopen",
            LessonConcept::Heel => "Volgen",
            LessonConcept::Wait => "Wacht",
            LessonConcept::LeaveIt => "Laat",
            LessonConcept::Drop => "Los",
            LessonConcept::Place => "Plaats",
            LessonConcept::Settle => "Tot rust komen",
            LessonConcept::Relaxation => "Ontspanning",
            LessonConcept::ImpulseControl => "Impulsbeheersing",
            LessonConcept::FrustrationTolerance => "Frustratietolerantie",
            LessonConcept::Patience => "Geduld",
            LessonConcept::Socialization => "Socialisatie",
            LessonConcept::Habituation => "Gewenning",
            LessonConcept::DogEncounters => "Hondencontact",
            LessonConcept::PeopleEncounters => "Mensencontact",
            LessonConcept::ChildSafety => "Kinderen en honden",
            LessonConcept::HouseTraining => "Zindelijkheid",
            LessonConcept::CrateTraining => "Bench",
            LessonConcept::AloneTime => "Alleen zijn",
            LessonConcept::Handling => "Hantering",
            LessonConcept::Grooming => "Verzorging",
            LessonConcept::VetVisit => "Dierenartsbezoek",
            LessonConcept::MuzzleTraining => "Muilkorftraining",
            LessonConcept::CarTravel => "Autorijden",
            LessonConcept::Jumping => "Opspringen",
            LessonConcept::Mouthing => "Bijten in spel",
            LessonConcept::Barking => "Blaffen",
            LessonConcept::Pulling => "Trekken aan de lijn",
            LessonConcept::ResourceGuarding => "Bezitsagressie",
            LessonConcept::Reactivity => "Reactiviteit",
            LessonConcept::Fear => "Angst",
            LessonConcept::Stress => "Stress",
            LessonConcept::BodyLanguage => "Lichaamstaal",
            LessonConcept::CalmingSignals => "Kalmeringssignalen",
            LessonConcept::Communication => "Communicatie",
            LessonConcept::Bonding => "Band",
            LessonConcept::Play => "Spel",
            LessonConcept::TugPlay => "Trekspel",
            LessonConcept::Retrieve => "Apporteren",
            LessonConcept::NoseWork => "Neuswerk",
            LessonConcept::Tracking => "Speurwerk",
            LessonConcept::MentalEnrichment => "Mentale verrijking",
            LessonConcept::Tricks => "Trucs",
            LessonConcept::Targeting => "Targeten",
            LessonConcept::Shaping => "Shaping",
            LessonConcept::Luring => "Lokken",
            LessonConcept::Capturing => "Gedrag vangen",
            LessonConcept::Generalization => "Generalisatie",
            LessonConcept::Proofing => "Proofing",
            LessonConcept::Distance => "Afstand",
            LessonConcept::Duration => "Duur",
            LessonConcept::Distraction => "Afleiding",
            LessonConcept::Routine => "Routine",
            LessonConcept::Management => "Management",
            LessonConcept::Nutrition => "Voeding",
            LessonConcept::PhysicalActivity => "Beweging",
            LessonConcept::Rest => "Rust",
            LessonConcept::Puppyhood => "Puppytijd",
            LessonConcept::Adolescence => "Pubertijd",
            LessonConcept::Senior => "Seniorhond",
            LessonConcept::Gear => "Uitrusting",
            LessonConcept::Safety => "Veiligheid",
        }
    }
}

impl fmt::Display for LessonConcept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_format_titles_unique() {
        let titles: HashSet<_> = LessonFormat::ALL.iter().map(|f| f.title()).collect();
        assert_eq!(titles.len(), LessonFormat::ALL.len());
    }

    #[test]
    fn test_priority_covers_every_format() {
        let mut priority = LessonFormat::TAGLINE_PRIORITY.to_vec();
        priority.sort();
        let mut all = LessonFormat::ALL.to_vec();
        all.sort();
        assert_eq!(priority, all);
    }

    #[test]
    fn test_concept_titles_unique_and_non_empty() {
        let titles: HashSet<_> = LessonConcept::ALL.iter().map(|c| c.title()).collect();
        assert_eq!(titles.len(), LessonConcept::ALL.len());
        assert!(titles.iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&LessonConcept::LooseLeashWalking).unwrap();
        assert_eq!(json, "\"loose_leash_walking\"");
        let format: LessonFormat = serde_json::from_str("\"demonstration\"").unwrap();
        assert_eq!(format, LessonFormat::Demonstration);
    }
}
