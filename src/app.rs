//! Application state and lifecycle management.
//!
//! This module contains the `App` struct that sits between the TUI and the
//! wizard: it turns key-level intents into wizard commands, runs generation
//! requests on the async runtime, and feeds their results back to the wizard
//! on the UI thread.

use std::sync::Arc;

use futures::future::join_all;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::ai::{GenerationFailed, GenerationGateway};
use crate::core::{
    Choice, CompletePreferences, Completion, Config, ExperienceLevel, FitnessGoal,
    GenerationTicket, ImageRef, Locale, MuscleGroup, Text, Transition, Wizard, WizardStep,
    WorkoutPlan,
};
use crate::tui::Theme;

/// Results delivered from background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// A plan request finished.
    PlanReady { ticket: u64, outcome: Result<WorkoutPlan, GenerationFailed> },

    /// An illustration request finished.
    ImageReady { epoch: u64, index: usize, image: Option<ImageRef> },
}

/// Display state of one exercise illustration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    /// Request in flight
    Pending,
    /// Image attached (decoded size in bytes)
    Ready(usize),
    /// Generation failed or returned nothing
    Unavailable,
    /// Illustrations are disabled
    Skipped,
}

/// Main application state.
pub struct App {
    /// The wizard state machine
    pub wizard: Wizard,

    /// Application configuration
    pub config: Config,

    /// Current UI theme
    pub theme: Theme,

    /// Highlighted option on selection screens
    pub cursor: usize,

    /// Scroll offset on the result screen
    pub scroll: u16,

    /// Illustration status per exercise of the displayed plan
    pub images: Vec<ImageStatus>,

    /// Status message to display (if any)
    pub status_message: Option<String>,

    /// Whether the application should quit
    pub should_quit: bool,

    /// Frame counter for the loading spinner
    pub spinner_frame: usize,

    gateway: Arc<dyn GenerationGateway>,
    runtime: Handle,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    image_tasks: Vec<JoinHandle<()>>,
    image_epoch: u64,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("step", &self.wizard.step())
            .field("gateway", &self.gateway.name())
            .field("cursor", &self.cursor)
            .field("images", &self.images)
            .finish()
    }
}

impl App {
    /// Create a new application instance.
    ///
    /// Background requests are spawned on `runtime`.
    pub fn new(config: Config, gateway: Arc<dyn GenerationGateway>, runtime: Handle) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let theme = Theme::by_name(&config.ui.theme).unwrap_or_default();

        Self {
            wizard: Wizard::new(config.general.locale),
            config,
            theme,
            cursor: 0,
            scroll: 0,
            images: Vec::new(),
            status_message: None,
            should_quit: false,
            spinner_frame: 0,
            gateway,
            runtime,
            events_tx,
            events_rx,
            image_tasks: Vec::new(),
            image_epoch: 0,
        }
    }

    pub fn locale(&self) -> Locale {
        self.wizard.locale()
    }

    /// Localized copy for the active locale.
    pub fn text(&self, key: Text) -> &'static str {
        self.locale().text(key)
    }

    /// Name of the generative backend.
    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    // ------------------------------------------------------------------
    // Selection screens
    // ------------------------------------------------------------------

    /// Labels of the options on the current selection screen.
    pub fn options(&self) -> Vec<&'static str> {
        let locale = self.locale();
        match self.wizard.step() {
            WizardStep::SelectLevel => labels::<ExperienceLevel>(locale),
            WizardStep::SelectGoal => labels::<FitnessGoal>(locale),
            WizardStep::SelectMuscle => labels::<MuscleGroup>(locale),
            _ => Vec::new(),
        }
    }

    /// Index of the chosen option on the current selection screen.
    pub fn selected_option(&self) -> Option<usize> {
        let prefs = self.wizard.preferences();
        match self.wizard.step() {
            WizardStep::SelectLevel => prefs.level.map(Choice::position),
            WizardStep::SelectGoal => prefs.goal.map(Choice::position),
            WizardStep::SelectMuscle => prefs.muscle_group.map(Choice::position),
            _ => None,
        }
    }

    /// Move the highlight, wrapping around.
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.options().len();
        if len == 0 {
            return;
        }
        let len = len as isize;
        self.cursor = (self.cursor as isize + delta).rem_euclid(len) as usize;
    }

    /// Choose the highlighted option.
    pub fn select_highlighted(&mut self) -> bool {
        let cursor = self.cursor;
        let selected = match self.wizard.step() {
            WizardStep::SelectLevel => {
                pick::<ExperienceLevel>(cursor).is_some_and(|v| self.wizard.select_level(v))
            }
            WizardStep::SelectGoal => {
                pick::<FitnessGoal>(cursor).is_some_and(|v| self.wizard.select_goal(v))
            }
            WizardStep::SelectMuscle => {
                pick::<MuscleGroup>(cursor).is_some_and(|v| self.wizard.select_muscle_group(v))
            }
            _ => false,
        };
        if selected {
            self.status_message = None;
        }
        selected
    }

    fn sync_cursor(&mut self) {
        self.cursor = self.selected_option().unwrap_or(0);
    }

    // ------------------------------------------------------------------
    // Wizard commands
    // ------------------------------------------------------------------

    /// Primary action (Enter): start, choose-and-continue, or retry.
    pub fn confirm(&mut self) {
        match self.wizard.step() {
            WizardStep::Intro => self.advance(),
            WizardStep::SelectLevel | WizardStep::SelectGoal | WizardStep::SelectMuscle => {
                self.select_highlighted();
                self.advance();
            }
            WizardStep::Error => self.retry(),
            WizardStep::Loading | WizardStep::Result => {}
        }
    }

    /// Move the wizard forward.
    pub fn advance(&mut self) {
        match self.wizard.advance() {
            Ok(Transition::Moved(_)) => {
                self.status_message = None;
                self.sync_cursor();
            }
            Ok(Transition::Generate(ticket)) => {
                self.status_message = None;
                self.spawn_generation(ticket);
            }
            Ok(Transition::Ignored) => {}
            Err(blocked) => {
                tracing::debug!(%blocked, "Advance blocked");
                self.status_message = Some(self.text(Text::SelectFirst).to_string());
            }
        }
    }

    /// Move the wizard back; from the result screen this starts a new plan.
    pub fn retreat(&mut self) {
        let leaving_result = self.wizard.step() == WizardStep::Result;
        if let Transition::Moved(_) = self.wizard.retreat() {
            if leaving_result {
                self.drop_images();
                self.scroll = 0;
            }
            self.status_message = None;
            self.sync_cursor();
        }
    }

    /// Leave the error screen for the muscle-group screen.
    pub fn retry(&mut self) {
        if let Transition::Moved(_) = self.wizard.retry() {
            self.sync_cursor();
        }
    }

    /// Quit the application, abandoning outstanding illustrations.
    pub fn quit(&mut self) {
        self.drop_images();
        self.should_quit = true;
    }

    /// Scroll the result screen.
    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll = (i32::from(self.scroll) + delta).clamp(0, i32::from(u16::MAX)) as u16;
    }

    // ------------------------------------------------------------------
    // Background work
    // ------------------------------------------------------------------

    fn spawn_generation(&mut self, ticket: GenerationTicket) {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.events_tx.clone();
        tracing::info!(ticket = ticket.id, provider = gateway.name(), "Requesting workout plan");

        self.runtime.spawn(async move {
            let outcome = gateway.generate_plan(&ticket.preferences).await;
            let _ = tx.send(AppEvent::PlanReady { ticket: ticket.id, outcome });
        });
    }

    fn spawn_images(&mut self) {
        self.drop_images();
        let Some(plan) = self.wizard.plan() else {
            return;
        };

        let epoch = self.wizard.plan_epoch();
        self.image_epoch = epoch;

        if !self.config.general.fetch_images {
            self.images = vec![ImageStatus::Skipped; plan.exercises.len()];
            return;
        }

        self.images = vec![ImageStatus::Pending; plan.exercises.len()];
        let names: Vec<String> = plan.exercise_names().map(str::to_string).collect();

        for (index, name) in names.into_iter().enumerate() {
            let gateway = Arc::clone(&self.gateway);
            let tx = self.events_tx.clone();
            let handle = self.runtime.spawn(async move {
                let image = gateway.generate_exercise_image(&name).await;
                let _ = tx.send(AppEvent::ImageReady { epoch, index, image });
            });
            self.image_tasks.push(handle);
        }
    }

    fn drop_images(&mut self) {
        for task in self.image_tasks.drain(..) {
            task.abort();
        }
        self.images.clear();
    }

    /// Apply a background result.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::PlanReady { ticket, outcome } => {
                if self.wizard.finish_generation(ticket, outcome) == Completion::Succeeded {
                    self.scroll = 0;
                    self.spawn_images();
                }
            }
            AppEvent::ImageReady { epoch, index, image } => {
                if epoch != self.image_epoch || index >= self.images.len() {
                    tracing::debug!(epoch, index, "Dropping image for a plan no longer shown");
                    return;
                }
                self.images[index] = match image {
                    Some(image) => {
                        let bytes = image.byte_len();
                        if self.wizard.attach_image(epoch, index, image) {
                            ImageStatus::Ready(bytes)
                        } else {
                            ImageStatus::Unavailable
                        }
                    }
                    None => ImageStatus::Unavailable,
                };
            }
        }
    }

    /// Whether a plan or illustration request is still outstanding.
    pub fn has_pending_work(&self) -> bool {
        self.wizard.is_loading() || self.images.contains(&ImageStatus::Pending)
    }

    /// Wait until every outstanding request has been applied.
    pub async fn settle(&mut self) {
        while self.has_pending_work() {
            match self.events_rx.recv().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }
    }

    /// Periodic tick from the event loop: advance the spinner and apply any
    /// finished background work.
    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }
}

/// Drive a fresh wizard through every step with fixed answers and return the
/// resulting plan.
///
/// With `with_images`, illustrations are requested concurrently and attached
/// before returning; a missing illustration never fails the call.
pub async fn plan_once(
    gateway: &dyn GenerationGateway,
    locale: Locale,
    preferences: CompletePreferences,
    with_images: bool,
) -> anyhow::Result<WorkoutPlan> {
    let mut wizard = Wizard::new(locale);
    wizard.advance()?;
    wizard.select_level(preferences.level);
    wizard.advance()?;
    wizard.select_goal(preferences.goal);
    wizard.advance()?;
    wizard.select_muscle_group(preferences.muscle_group);

    let Transition::Generate(ticket) = wizard.advance()? else {
        anyhow::bail!("wizard did not reach generation (at {})", wizard.step());
    };

    let outcome = gateway.generate_plan(&ticket.preferences).await;
    let cause = outcome.as_ref().err().map(|e| e.cause.to_string());

    if wizard.finish_generation(ticket.id, outcome) != Completion::Succeeded {
        let message = wizard.error().unwrap_or_else(|| locale.retry_message());
        match cause {
            Some(cause) => anyhow::bail!("{message} ({cause})"),
            None => anyhow::bail!("{message}"),
        }
    }

    if with_images {
        let epoch = wizard.plan_epoch();
        let names: Vec<String> = wizard
            .plan()
            .map(|plan| plan.exercise_names().map(str::to_string).collect())
            .unwrap_or_default();

        let images = join_all(names.iter().map(|name| gateway.generate_exercise_image(name))).await;
        for (index, image) in images.into_iter().enumerate() {
            if let Some(image) = image {
                wizard.attach_image(epoch, index, image);
            }
        }
    }

    wizard.plan().cloned().ok_or_else(|| anyhow::anyhow!("wizard finished without a plan"))
}

fn labels<C: Choice>(locale: Locale) -> Vec<&'static str> {
    C::ALL.iter().map(|c| c.label(locale)).collect()
}

fn pick<C: Choice>(index: usize) -> Option<C> {
    C::ALL.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NeverCalled;

    #[async_trait]
    impl GenerationGateway for NeverCalled {
        async fn generate_plan(
            &self,
            _preferences: &CompletePreferences,
        ) -> Result<WorkoutPlan, GenerationFailed> {
            unreachable!("selection tests never generate")
        }

        async fn generate_exercise_image(&self, _exercise_name: &str) -> Option<ImageRef> {
            None
        }

        fn name(&self) -> &str {
            "never"
        }
    }

    fn app() -> (tokio::runtime::Runtime, App) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let app = App::new(Config::default(), Arc::new(NeverCalled), runtime.handle().clone());
        (runtime, app)
    }

    #[test]
    fn test_cursor_wraps() {
        let (_rt, mut app) = app();
        app.advance();
        assert_eq!(app.options().len(), 3);

        app.move_cursor(-1);
        assert_eq!(app.cursor, 2);
        app.move_cursor(1);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_confirm_selects_and_advances() {
        let (_rt, mut app) = app();
        app.confirm();
        assert_eq!(app.wizard.step(), WizardStep::SelectLevel);

        app.move_cursor(2);
        app.confirm();
        assert_eq!(app.wizard.step(), WizardStep::SelectGoal);
        assert_eq!(app.wizard.preferences().level, Some(ExperienceLevel::Advanced));
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_blocked_advance_sets_hint() {
        let (_rt, mut app) = app();
        app.advance();
        app.advance();
        assert_eq!(app.wizard.step(), WizardStep::SelectLevel);
        assert_eq!(app.status_message.as_deref(), Some(Locale::PtBr.text(Text::SelectFirst)));

        app.select_highlighted();
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_cursor_follows_existing_choice_on_retreat() {
        let (_rt, mut app) = app();
        app.advance();
        app.move_cursor(1);
        app.confirm();
        app.retreat();
        assert_eq!(app.wizard.step(), WizardStep::SelectLevel);
        assert_eq!(app.cursor, 1);
        assert_eq!(app.selected_option(), Some(1));
    }

    #[test]
    fn test_stale_image_event_is_ignored() {
        let (_rt, mut app) = app();
        app.handle_event(AppEvent::ImageReady { epoch: 42, index: 0, image: None });
        assert!(app.images.is_empty());
        assert!(!app.has_pending_work());
    }
}
