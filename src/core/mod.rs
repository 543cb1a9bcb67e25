//! Core functionality for Fitplan.
//!
//! This module contains the domain model, the wizard state machine and the
//! configuration layer. Nothing in here touches the network or the terminal.

mod config;
mod locale;
mod plan;
mod preferences;
mod wizard;

pub use config::{AiConfig, Config, GeneralConfig, UiConfig, FALLBACK_API_KEY_ENV, LOCAL_CONFIG_FILE};
pub use locale::{Locale, Text};
pub use plan::{Exercise, ImageRef, PlanViolation, WorkoutPlan};
pub use preferences::{
    Choice, CompletePreferences, ExperienceLevel, FitnessGoal, MuscleGroup, UserPreferences,
};
pub use wizard::{
    Completion, GenerationTicket, Transition, ValidationBlocked, Wizard, WizardStep,
};
