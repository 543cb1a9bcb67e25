//! The three choices the wizard collects.
//!
//! Each choice is a closed enum with a stable kebab-case identifier (used by
//! the CLI and config files) and a localized label (used on screen and in the
//! prompt sent to the generative service).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::locale::Locale;

/// Training experience of the user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// Primary training goal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum FitnessGoal {
    Hypertrophy,
    FatLoss,
    Strength,
    Endurance,
    Conditioning,
}

/// Muscle group targeted by today's session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Biceps,
    Triceps,
    Abdomen,
    FullBody,
    UpperBody,
    LowerBody,
}

/// A closed set of options that can be shown on a selection screen.
pub trait Choice: Copy + Eq + Sized + 'static {
    /// Every option, in display order.
    const ALL: &'static [Self];

    /// Stable identifier (kebab-case).
    fn id(self) -> &'static str;

    /// Human-readable label in the given locale.
    fn label(self, locale: Locale) -> &'static str;

    /// Position of this option in [`Choice::ALL`].
    fn position(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }
}

impl Choice for ExperienceLevel {
    const ALL: &'static [Self] = &[Self::Beginner, Self::Intermediate, Self::Advanced];

    fn id(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::PtBr, Self::Beginner) => "Iniciante",
            (Locale::PtBr, Self::Intermediate) => "Intermediário",
            (Locale::PtBr, Self::Advanced) => "Avançado",
            (Locale::En, Self::Beginner) => "Beginner",
            (Locale::En, Self::Intermediate) => "Intermediate",
            (Locale::En, Self::Advanced) => "Advanced",
        }
    }
}

impl Choice for FitnessGoal {
    const ALL: &'static [Self] =
        &[Self::Hypertrophy, Self::FatLoss, Self::Strength, Self::Endurance, Self::Conditioning];

    fn id(self) -> &'static str {
        match self {
            Self::Hypertrophy => "hypertrophy",
            Self::FatLoss => "fat-loss",
            Self::Strength => "strength",
            Self::Endurance => "endurance",
            Self::Conditioning => "conditioning",
        }
    }

    fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::PtBr, Self::Hypertrophy) => "Hipertrofia Muscular",
            (Locale::PtBr, Self::FatLoss) => "Perda de Gordura",
            (Locale::PtBr, Self::Strength) => "Ganho de Força",
            (Locale::PtBr, Self::Endurance) => "Resistência Muscular",
            (Locale::PtBr, Self::Conditioning) => "Condicionamento Físico",
            (Locale::En, Self::Hypertrophy) => "Muscle Hypertrophy",
            (Locale::En, Self::FatLoss) => "Fat Loss",
            (Locale::En, Self::Strength) => "Strength Gain",
            (Locale::En, Self::Endurance) => "Muscular Endurance",
            (Locale::En, Self::Conditioning) => "General Conditioning",
        }
    }
}

impl Choice for MuscleGroup {
    const ALL: &'static [Self] = &[
        Self::Chest,
        Self::Back,
        Self::Legs,
        Self::Shoulders,
        Self::Biceps,
        Self::Triceps,
        Self::Abdomen,
        Self::FullBody,
        Self::UpperBody,
        Self::LowerBody,
    ];

    fn id(self) -> &'static str {
        match self {
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Legs => "legs",
            Self::Shoulders => "shoulders",
            Self::Biceps => "biceps",
            Self::Triceps => "triceps",
            Self::Abdomen => "abdomen",
            Self::FullBody => "full-body",
            Self::UpperBody => "upper-body",
            Self::LowerBody => "lower-body",
        }
    }

    fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::PtBr, Self::Chest) => "Peito",
            (Locale::PtBr, Self::Back) => "Costas",
            (Locale::PtBr, Self::Legs) => "Pernas",
            (Locale::PtBr, Self::Shoulders) => "Ombros",
            (Locale::PtBr, Self::Biceps) => "Bíceps",
            (Locale::PtBr, Self::Triceps) => "Tríceps",
            (Locale::PtBr, Self::Abdomen) => "Abdômen",
            (Locale::PtBr, Self::FullBody) => "Corpo Completo (Full Body)",
            (Locale::PtBr, Self::UpperBody) => "Membros Superiores",
            (Locale::PtBr, Self::LowerBody) => "Membros Inferiores",
            (Locale::En, Self::Chest) => "Chest",
            (Locale::En, Self::Back) => "Back",
            (Locale::En, Self::Legs) => "Legs",
            (Locale::En, Self::Shoulders) => "Shoulders",
            (Locale::En, Self::Biceps) => "Biceps",
            (Locale::En, Self::Triceps) => "Triceps",
            (Locale::En, Self::Abdomen) => "Abdomen",
            (Locale::En, Self::FullBody) => "Full Body",
            (Locale::En, Self::UpperBody) => "Upper Body",
            (Locale::En, Self::LowerBody) => "Lower Body",
        }
    }
}

macro_rules! display_by_id {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.id())
                }
            }
        )*
    };
}

display_by_id!(ExperienceLevel, FitnessGoal, MuscleGroup);

/// Preferences accumulated while the wizard advances.
///
/// Fields stay `None` until the matching step has been answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub level: Option<ExperienceLevel>,
    pub goal: Option<FitnessGoal>,
    pub muscle_group: Option<MuscleGroup>,
}

impl UserPreferences {
    /// Empty preferences (session start, or after a restart).
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been chosen yet.
    pub fn is_empty(&self) -> bool {
        self.level.is_none() && self.goal.is_none() && self.muscle_group.is_none()
    }

    /// All three fields, if every one of them has been chosen.
    pub fn complete(&self) -> Option<CompletePreferences> {
        Some(CompletePreferences {
            level: self.level?,
            goal: self.goal?,
            muscle_group: self.muscle_group?,
        })
    }
}

/// Fully populated preferences; the only input accepted by generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletePreferences {
    pub level: ExperienceLevel,
    pub goal: FitnessGoal,
    pub muscle_group: MuscleGroup,
}

impl From<CompletePreferences> for UserPreferences {
    fn from(p: CompletePreferences) -> Self {
        Self { level: Some(p.level), goal: Some(p.goal), muscle_group: Some(p.muscle_group) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_requires_all_fields() {
        let mut prefs = UserPreferences::new();
        assert!(prefs.is_empty());
        assert!(prefs.complete().is_none());

        prefs.level = Some(ExperienceLevel::Beginner);
        prefs.goal = Some(FitnessGoal::Hypertrophy);
        assert!(prefs.complete().is_none());

        prefs.muscle_group = Some(MuscleGroup::Chest);
        let complete = prefs.complete().unwrap();
        assert_eq!(complete.muscle_group, MuscleGroup::Chest);
        assert_eq!(UserPreferences::from(complete), prefs);
    }

    #[test]
    fn test_ids_match_serde_names() {
        for goal in FitnessGoal::ALL {
            let json = serde_json::to_string(goal).unwrap();
            assert_eq!(json, format!("\"{}\"", goal.id()));
        }
        for group in MuscleGroup::ALL {
            let json = serde_json::to_string(group).unwrap();
            assert_eq!(json, format!("\"{}\"", group.id()));
        }
    }

    #[test]
    fn test_portuguese_labels() {
        assert_eq!(ExperienceLevel::Intermediate.label(Locale::PtBr), "Intermediário");
        assert_eq!(FitnessGoal::Strength.label(Locale::PtBr), "Ganho de Força");
        assert_eq!(MuscleGroup::FullBody.label(Locale::PtBr), "Corpo Completo (Full Body)");
    }

    #[test]
    fn test_position_follows_display_order() {
        assert_eq!(MuscleGroup::Chest.position(), 0);
        assert_eq!(MuscleGroup::LowerBody.position(), MuscleGroup::ALL.len() - 1);
        assert_eq!(FitnessGoal::Strength.position(), 2);
    }
}
