//! # Fitplan
//!
//! Personal-trainer wizard for your terminal.
//!
//! Fitplan walks you through three questions (experience level, training
//! goal and target muscle group), asks a generative service for a structured
//! workout plan, and shows it with warm-up, exercises and cool-down. Exercise
//! illustrations are requested in the background once the plan is on screen.
//!
//! ## Features
//!
//! - **Guided Wizard**: A strict step machine; you cannot skip a question
//! - **Structured Plans**: Every plan is validated before it is shown
//! - **Background Illustrations**: Images never block or fail the plan
//! - **Bilingual**: Portuguese (pt-BR) and English screens and plans
//!
//! ## Quick Start
//!
//! ```bash
//! export GEMINI_API_KEY=...
//!
//! # Interactive wizard
//! fitplan
//!
//! # One-shot plan
//! fitplan plan --level beginner --goal strength --muscle legs
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::future_not_send)]

pub mod ai;
pub mod app;
pub mod core;
pub mod tui;

// Re-export commonly used types
pub use ai::{GeminiGateway, GenerationFailed, GenerationGateway};
pub use app::{plan_once, App, AppEvent, ImageStatus};
pub use core::{
    CompletePreferences, Config, ExperienceLevel, FitnessGoal, Locale, MuscleGroup,
    UserPreferences, Wizard, WizardStep, WorkoutPlan,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "fitplan";
