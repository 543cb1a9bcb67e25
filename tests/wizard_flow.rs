//! Wizard Flow Integration Tests
//!
//! Drives the application state end-to-end against an in-process gateway:
//! happy path, blocked steps, failure and retry, restart while illustrations
//! are still in flight.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use fitplan::ai::{FailureCause, GenerationFailed, GenerationGateway};
use fitplan::core::{ImageRef, Locale};
use fitplan::{
    plan_once, App, CompletePreferences, Config, ExperienceLevel, FitnessGoal, ImageStatus,
    MuscleGroup, WizardStep, WorkoutPlan,
};

const PLAN: &str = r#"{
    "title": "Leg Day Foundations",
    "description": "Compound lifts with controlled tempo.",
    "estimatedDuration": "50 min",
    "frequencyRecommendation": "2x per week",
    "warmup": ["5 min bike", "Bodyweight squats"],
    "exercises": [
        {"name": "Back Squat", "sets": "3-4", "reps": "6-8", "rest": "120s", "notes": "Brace before each rep."},
        {"name": "Romanian Deadlift", "sets": "3", "reps": "8-10", "rest": "90s", "notes": "Hinge at the hips."}
    ],
    "cooldown": ["Hamstring stretch"]
}"#;

/// PNG signature, base64-encoded.
const PNG: &str = "iVBORw0KGgo=";

/// Scripted gateway that records every call.
struct ScriptedGateway {
    plans: Mutex<VecDeque<Result<WorkoutPlan, GenerationFailed>>>,
    plan_calls: AtomicUsize,
    image_calls: AtomicUsize,
    /// Exercises that get an illustration; every other one gets `None`.
    illustrated: Vec<&'static str>,
    /// Illustrations wait for a permit when set.
    image_gate: Option<Arc<Semaphore>>,
}

impl ScriptedGateway {
    fn new(plans: Vec<Result<WorkoutPlan, GenerationFailed>>) -> Self {
        Self {
            plans: Mutex::new(plans.into()),
            plan_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            illustrated: vec!["Back Squat"],
            image_gate: None,
        }
    }

    fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.image_gate = Some(gate);
        self
    }

    fn plan_calls(&self) -> usize {
        self.plan_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationGateway for ScriptedGateway {
    async fn generate_plan(
        &self,
        _preferences: &CompletePreferences,
    ) -> Result<WorkoutPlan, GenerationFailed> {
        self.plan_calls.fetch_add(1, Ordering::SeqCst);
        self.plans
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FailureCause::EmptyResponse.into()))
    }

    async fn generate_exercise_image(&self, exercise_name: &str) -> Option<ImageRef> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.image_gate {
            let _permit = gate.acquire().await.ok()?;
        }
        if self.illustrated.iter().any(|name| *name == exercise_name) {
            ImageRef::from_base64_png(PNG).ok()
        } else {
            None
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn plan() -> WorkoutPlan {
    WorkoutPlan::from_json(PLAN).unwrap()
}

fn failure() -> Result<WorkoutPlan, GenerationFailed> {
    Err(FailureCause::Transport("connection reset".into()).into())
}

fn new_app(gateway: Arc<ScriptedGateway>) -> App {
    App::new(Config::default(), gateway, tokio::runtime::Handle::current())
}

/// Intro → level (beginner) → goal (strength) → muscle (legs) → generate.
fn answer_all(app: &mut App) {
    app.confirm();
    app.cursor = 0;
    app.confirm();
    app.cursor = 2;
    app.confirm();
    app.cursor = 2;
    app.confirm();
}

// ============================================================================
// Happy Path
// ============================================================================

#[tokio::test]
async fn test_full_flow_produces_plan() {
    let gateway = Arc::new(ScriptedGateway::new(vec![Ok(plan())]));
    let mut app = new_app(gateway.clone());

    answer_all(&mut app);
    assert_eq!(app.wizard.step(), WizardStep::Loading);
    assert_eq!(
        app.wizard.preferences().complete(),
        Some(CompletePreferences {
            level: ExperienceLevel::Beginner,
            goal: FitnessGoal::Strength,
            muscle_group: MuscleGroup::Legs,
        })
    );

    app.settle().await;

    assert_eq!(app.wizard.step(), WizardStep::Result);
    assert_eq!(gateway.plan_calls(), 1);

    let shown = app.wizard.plan().unwrap();
    assert_eq!(shown.title, "Leg Day Foundations");
    assert_eq!(shown.exercises.len(), 2);
}

#[tokio::test]
async fn test_illustrations_attach_independently() {
    let gateway = Arc::new(ScriptedGateway::new(vec![Ok(plan())]));
    let mut app = new_app(gateway.clone());

    answer_all(&mut app);
    app.settle().await;

    assert_eq!(gateway.image_calls.load(Ordering::SeqCst), 2);
    assert_eq!(app.images, vec![ImageStatus::Ready(8), ImageStatus::Unavailable]);

    let exercises = &app.wizard.plan().unwrap().exercises;
    let image = exercises[0].image.as_ref().unwrap();
    assert!(image.as_str().starts_with("data:image/png;base64,"));
    assert!(exercises[1].image.is_none());
}

#[tokio::test]
async fn test_illustrations_can_be_disabled() {
    let gateway = Arc::new(ScriptedGateway::new(vec![Ok(plan())]));
    let mut config = Config::default();
    config.general.fetch_images = false;
    let mut app = App::new(config, gateway.clone(), tokio::runtime::Handle::current());

    answer_all(&mut app);
    app.settle().await;

    assert_eq!(app.wizard.step(), WizardStep::Result);
    assert_eq!(gateway.image_calls.load(Ordering::SeqCst), 0);
    assert_eq!(app.images, vec![ImageStatus::Skipped; 2]);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_advance_without_choice_is_blocked() {
    let gateway = Arc::new(ScriptedGateway::new(vec![Ok(plan())]));
    let mut app = new_app(gateway.clone());

    app.confirm(); // Intro → SelectLevel
    app.confirm(); // level chosen, → SelectGoal

    app.advance();
    app.advance();
    assert_eq!(app.wizard.step(), WizardStep::SelectGoal);
    assert!(app.wizard.preferences().goal.is_none());
    assert!(app.status_message.is_some());
    assert_eq!(gateway.plan_calls(), 0);
}

#[tokio::test]
async fn test_repeated_generate_issues_one_request() {
    let gateway = Arc::new(ScriptedGateway::new(vec![Ok(plan()), Ok(plan())]));
    let mut app = new_app(gateway.clone());

    answer_all(&mut app);
    app.advance();
    app.confirm();

    app.settle().await;
    assert_eq!(gateway.plan_calls(), 1);
}

// ============================================================================
// Failure & Retry
// ============================================================================

#[tokio::test]
async fn test_failure_then_retry() {
    let gateway = Arc::new(ScriptedGateway::new(vec![failure(), Ok(plan())]));
    let mut app = new_app(gateway.clone());

    answer_all(&mut app);
    app.settle().await;

    assert_eq!(app.wizard.step(), WizardStep::Error);
    assert_eq!(app.wizard.error(), Some(Locale::PtBr.retry_message()));
    assert!(app.wizard.plan().is_none());
    assert!(app.images.is_empty());

    app.retry();
    assert_eq!(app.wizard.step(), WizardStep::SelectMuscle);
    assert_eq!(app.wizard.preferences().muscle_group, Some(MuscleGroup::Legs));
    assert_eq!(app.cursor, 2);

    app.advance();
    app.settle().await;

    assert_eq!(app.wizard.step(), WizardStep::Result);
    assert!(app.wizard.error().is_none());
    assert_eq!(gateway.plan_calls(), 2);
}

#[tokio::test]
async fn test_invalid_plan_is_a_failure() {
    let mut empty = plan();
    empty.exercises.clear();
    let gateway = Arc::new(ScriptedGateway::new(vec![Ok(empty)]));
    let mut app = new_app(gateway);

    answer_all(&mut app);
    app.settle().await;

    assert_eq!(app.wizard.step(), WizardStep::Error);
    assert!(app.wizard.plan().is_none());
}

// ============================================================================
// Restart
// ============================================================================

#[tokio::test]
async fn test_new_plan_drops_pending_illustrations() {
    let gate = Arc::new(Semaphore::new(0));
    let gateway = Arc::new(ScriptedGateway::new(vec![Ok(plan())]).with_gate(gate.clone()));
    let mut app = new_app(gateway.clone());

    answer_all(&mut app);
    while app.wizard.step() == WizardStep::Loading {
        tokio::task::yield_now().await;
        app.tick();
    }
    assert_eq!(app.wizard.step(), WizardStep::Result);
    assert_eq!(app.images, vec![ImageStatus::Pending; 2]);

    app.retreat();
    assert_eq!(app.wizard.step(), WizardStep::Intro);
    assert!(app.wizard.preferences().is_empty());
    assert!(app.wizard.plan().is_none());
    assert!(app.images.is_empty());

    gate.add_permits(8);
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    app.tick();

    assert!(app.wizard.plan().is_none());
    assert!(app.images.is_empty());
    assert!(!app.has_pending_work());
    assert_eq!(gateway.plan_calls(), 1);
}

// ============================================================================
// Headless
// ============================================================================

#[tokio::test]
async fn test_plan_once_with_images() {
    let gateway = ScriptedGateway::new(vec![Ok(plan())]);
    let preferences = CompletePreferences {
        level: ExperienceLevel::Advanced,
        goal: FitnessGoal::Hypertrophy,
        muscle_group: MuscleGroup::Legs,
    };

    let plan = plan_once(&gateway, Locale::En, preferences, true).await.unwrap();

    assert_eq!(gateway.plan_calls(), 1);
    assert!(plan.exercises[0].image.is_some());
    assert!(plan.exercises[1].image.is_none());
}

#[tokio::test]
async fn test_plan_once_reports_failure() {
    let gateway = ScriptedGateway::new(vec![failure()]);
    let preferences = CompletePreferences {
        level: ExperienceLevel::Beginner,
        goal: FitnessGoal::FatLoss,
        muscle_group: MuscleGroup::FullBody,
    };

    let err = plan_once(&gateway, Locale::En, preferences, false).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains(Locale::En.retry_message()));
    assert!(message.contains("connection reset"));
}
