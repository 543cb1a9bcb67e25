//! Step wizard state machine.
//!
//! Owns the current step, the accumulated preferences, the generated plan and
//! the error message. Every transition goes through [`Wizard::advance`],
//! [`Wizard::retreat`], [`Wizard::retry`] or [`Wizard::finish_generation`];
//! nothing else mutates the step.
//!
//! The wizard never talks to the generative service itself. Entering
//! `Loading` hands back a [`GenerationTicket`]; the caller runs the request
//! and reports the outcome with the ticket id. Outcomes for any other id, or
//! arriving outside `Loading`, are dropped.

use std::fmt;

use super::locale::Locale;
use super::plan::{ImageRef, WorkoutPlan};
use super::preferences::{
    CompletePreferences, ExperienceLevel, FitnessGoal, MuscleGroup, UserPreferences,
};

/// Wizard screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WizardStep {
    #[default]
    Intro,
    SelectLevel,
    SelectGoal,
    SelectMuscle,
    Loading,
    Result,
    Error,
}

impl WizardStep {
    /// Position among the three selection screens (1-based), if this is one.
    pub fn selection_index(self) -> Option<usize> {
        match self {
            Self::SelectLevel => Some(1),
            Self::SelectGoal => Some(2),
            Self::SelectMuscle => Some(3),
            _ => None,
        }
    }

    /// Number of selection screens.
    pub const SELECTION_STEPS: usize = 3;
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Intro => "intro",
            Self::SelectLevel => "select-level",
            Self::SelectGoal => "select-goal",
            Self::SelectMuscle => "select-muscle",
            Self::Loading => "loading",
            Self::Result => "result",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// A single outstanding plan request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    pub id: u64,
    pub preferences: CompletePreferences,
}

/// Outcome of a wizard command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The wizard moved to a new step.
    Moved(WizardStep),

    /// The wizard entered `Loading`; the caller must issue exactly one plan
    /// request for this ticket.
    Generate(GenerationTicket),

    /// The command does not apply to the current step.
    Ignored,
}

/// Advance was attempted on a selection step with nothing selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot advance from {step}: no {missing} selected")]
pub struct ValidationBlocked {
    pub step: WizardStep,
    pub missing: &'static str,
}

/// What became of a generation outcome handed to the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Plan stored, wizard is on `Result`.
    Succeeded,

    /// Error stored, wizard is on `Error`.
    Failed,

    /// The outcome belongs to a request that is no longer current.
    Stale,
}

/// The wizard state machine.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: WizardStep,
    preferences: UserPreferences,
    plan: Option<WorkoutPlan>,
    error: Option<String>,
    locale: Locale,
    pending: Option<u64>,
    next_ticket: u64,
    plan_epoch: u64,
}

impl Wizard {
    /// Create a wizard on the intro screen.
    pub fn new(locale: Locale) -> Self {
        Self { locale, ..Self::default() }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    pub fn plan(&self) -> Option<&WorkoutPlan> {
        self.plan.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Identifier of the currently displayed plan. Changes whenever a plan is
    /// stored or discarded, so late image results can be recognised.
    pub fn plan_epoch(&self) -> u64 {
        self.plan_epoch
    }

    /// Whether a plan request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.step == WizardStep::Loading
    }

    /// Choose an experience level. Only honoured on the level screen.
    pub fn select_level(&mut self, level: ExperienceLevel) -> bool {
        self.select_on(WizardStep::SelectLevel, |p| p.level = Some(level))
    }

    /// Choose a goal. Only honoured on the goal screen.
    pub fn select_goal(&mut self, goal: FitnessGoal) -> bool {
        self.select_on(WizardStep::SelectGoal, |p| p.goal = Some(goal))
    }

    /// Choose a muscle group. Only honoured on the muscle screen.
    pub fn select_muscle_group(&mut self, muscle_group: MuscleGroup) -> bool {
        self.select_on(WizardStep::SelectMuscle, |p| p.muscle_group = Some(muscle_group))
    }

    fn select_on(&mut self, step: WizardStep, apply: impl FnOnce(&mut UserPreferences)) -> bool {
        if self.step != step {
            return false;
        }
        apply(&mut self.preferences);
        true
    }

    /// Whether `advance` would currently move the wizard forward.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::Intro => true,
            WizardStep::SelectLevel => self.preferences.level.is_some(),
            WizardStep::SelectGoal => self.preferences.goal.is_some(),
            WizardStep::SelectMuscle => self.preferences.complete().is_some(),
            WizardStep::Loading | WizardStep::Result | WizardStep::Error => false,
        }
    }

    /// Move forward one step.
    ///
    /// On a selection step without the required choice nothing changes and
    /// [`ValidationBlocked`] is returned. Advancing from `SelectMuscle` enters
    /// `Loading` and returns the ticket for the one plan request to issue.
    pub fn advance(&mut self) -> Result<Transition, ValidationBlocked> {
        let next = match self.step {
            WizardStep::Intro => WizardStep::SelectLevel,
            WizardStep::SelectLevel => {
                self.require(self.preferences.level.is_some(), "level")?;
                WizardStep::SelectGoal
            }
            WizardStep::SelectGoal => {
                self.require(self.preferences.goal.is_some(), "goal")?;
                WizardStep::SelectMuscle
            }
            WizardStep::SelectMuscle => {
                let Some(preferences) = self.preferences.complete() else {
                    return Err(ValidationBlocked { step: self.step, missing: "muscle group" });
                };
                return Ok(Transition::Generate(self.enter_loading(preferences)));
            }
            WizardStep::Loading | WizardStep::Result | WizardStep::Error => {
                return Ok(Transition::Ignored);
            }
        };

        self.step = next;
        Ok(Transition::Moved(next))
    }

    fn require(&self, present: bool, missing: &'static str) -> Result<(), ValidationBlocked> {
        if present {
            Ok(())
        } else {
            Err(ValidationBlocked { step: self.step, missing })
        }
    }

    fn enter_loading(&mut self, preferences: CompletePreferences) -> GenerationTicket {
        self.next_ticket += 1;
        let id = self.next_ticket;
        self.step = WizardStep::Loading;
        self.error = None;
        self.pending = Some(id);
        tracing::debug!(ticket = id, "Entering loading");
        GenerationTicket { id, preferences }
    }

    /// Move back one step.
    ///
    /// From `Result` this starts over: preferences and plan are cleared and
    /// the wizard lands on `Intro`.
    pub fn retreat(&mut self) -> Transition {
        let previous = match self.step {
            WizardStep::SelectLevel => WizardStep::Intro,
            WizardStep::SelectGoal => WizardStep::SelectLevel,
            WizardStep::SelectMuscle => WizardStep::SelectGoal,
            WizardStep::Result => {
                self.preferences = UserPreferences::new();
                self.discard_plan();
                WizardStep::Intro
            }
            WizardStep::Intro | WizardStep::Loading | WizardStep::Error => {
                return Transition::Ignored;
            }
        };

        self.step = previous;
        Transition::Moved(previous)
    }

    /// Leave the error screen so the user can confirm the muscle group and
    /// generate again. Preferences are kept.
    pub fn retry(&mut self) -> Transition {
        if self.step != WizardStep::Error {
            return Transition::Ignored;
        }
        self.step = WizardStep::SelectMuscle;
        Transition::Moved(WizardStep::SelectMuscle)
    }

    /// Apply the outcome of the plan request identified by `ticket_id`.
    pub fn finish_generation<E: fmt::Display>(
        &mut self,
        ticket_id: u64,
        outcome: Result<WorkoutPlan, E>,
    ) -> Completion {
        if self.step != WizardStep::Loading || self.pending != Some(ticket_id) {
            tracing::debug!(ticket = ticket_id, step = %self.step, "Dropping stale generation result");
            return Completion::Stale;
        }
        self.pending = None;

        let failure = match outcome {
            Ok(plan) => match plan.validate() {
                Ok(()) => {
                    self.plan = Some(plan);
                    self.plan_epoch += 1;
                    self.error = None;
                    self.step = WizardStep::Result;
                    return Completion::Succeeded;
                }
                Err(violation) => violation.to_string(),
            },
            Err(e) => e.to_string(),
        };

        tracing::error!(ticket = ticket_id, cause = %failure, "Workout generation failed");
        self.discard_plan();
        self.error = Some(self.locale.retry_message().to_string());
        self.step = WizardStep::Error;
        Completion::Failed
    }

    /// Attach an illustration to an exercise of the plan shown under `epoch`.
    ///
    /// Returns `false`, leaving everything untouched, when that plan is no
    /// longer displayed.
    pub fn attach_image(&mut self, epoch: u64, index: usize, image: ImageRef) -> bool {
        if epoch != self.plan_epoch || self.step != WizardStep::Result {
            return false;
        }
        match self.plan.as_mut() {
            Some(plan) => plan.set_image(index, image),
            None => false,
        }
    }

    fn discard_plan(&mut self) {
        if self.plan.take().is_some() {
            self.plan_epoch += 1;
        }
    }
}
