//! Localized copy for the wizard.
//!
//! Every user-facing string lives here, keyed by [`Locale`]. The generative
//! service is also told to answer in the active locale's language.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    /// Brazilian Portuguese
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,

    /// English
    #[serde(rename = "en")]
    En,
}

impl Locale {
    /// All locales.
    pub const ALL: [Self; 2] = [Self::PtBr, Self::En];

    /// Config/CLI identifier.
    pub fn code(self) -> &'static str {
        match self {
            Self::PtBr => "pt-BR",
            Self::En => "en",
        }
    }

    /// The fixed message shown when plan generation fails.
    pub fn retry_message(self) -> &'static str {
        match self {
            Self::PtBr => "Falha ao gerar o treino. Por favor, tente novamente.",
            Self::En => "Failed to generate the workout. Please try again.",
        }
    }

    /// Prompt directive fixing the language of the generated plan.
    pub fn language_directive(self) -> &'static str {
        match self {
            Self::PtBr => {
                "The language must be motivating, clear and in PORTUGUESE (PT-BR). \
                 Every text field of the JSON must be written in Brazilian Portuguese."
            }
            Self::En => {
                "The language must be motivating, clear and in ENGLISH. \
                 Every text field of the JSON must be written in English."
            }
        }
    }

    /// Look up a piece of screen copy.
    pub fn text(self, key: Text) -> &'static str {
        use Text as C;
        match (self, key) {
            (Self::PtBr, C::AppName) | (Self::En, C::AppName) => "Fitplan",
            (Self::PtBr, C::Tagline) => {
                "Seu Personal Trainer Inteligente. Treinos personalizados baseados em ciência."
            }
            (Self::En, C::Tagline) => {
                "Your smart personal trainer. Science-based workouts tailored to your goals."
            }
            (Self::PtBr, C::Start) => "Pressione Enter para começar",
            (Self::En, C::Start) => "Press Enter to start",
            (Self::PtBr, C::AskLevel) => "Qual seu nível de experiência?",
            (Self::En, C::AskLevel) => "What is your experience level?",
            (Self::PtBr, C::AskGoal) => "Qual seu objetivo principal?",
            (Self::En, C::AskGoal) => "What is your main goal?",
            (Self::PtBr, C::AskMuscle) => "Qual grupo muscular vamos treinar hoje?",
            (Self::En, C::AskMuscle) => "Which muscle group are we training today?",
            (Self::PtBr, C::Next) => "Próximo",
            (Self::En, C::Next) => "Next",
            (Self::PtBr, C::Back) => "Voltar",
            (Self::En, C::Back) => "Back",
            (Self::PtBr, C::Generate) => "Gerar Treino",
            (Self::En, C::Generate) => "Generate plan",
            (Self::PtBr, C::SelectFirst) => "Escolha uma opção para continuar",
            (Self::En, C::SelectFirst) => "Pick an option to continue",
            (Self::PtBr, C::Loading) => "Criando seu treino...",
            (Self::En, C::Loading) => "Creating your workout...",
            (Self::PtBr, C::LoadingDetail) => {
                "Analisando biomecânica, volume e intensidade ideal."
            }
            (Self::En, C::LoadingDetail) => "Weighing biomechanics, volume and ideal intensity.",
            (Self::PtBr, C::ErrorTitle) => "Ops, algo deu errado",
            (Self::En, C::ErrorTitle) => "Oops, something went wrong",
            (Self::PtBr, C::TryAgain) => "Tentar Novamente",
            (Self::En, C::TryAgain) => "Try again",
            (Self::PtBr, C::Warmup) => "Aquecimento",
            (Self::En, C::Warmup) => "Warm-up",
            (Self::PtBr, C::Cooldown) => "Resfriamento",
            (Self::En, C::Cooldown) => "Cool-down",
            (Self::PtBr, C::MainWorkout) => "Treino Principal",
            (Self::En, C::MainWorkout) => "Main workout",
            (Self::PtBr, C::NewPlan) => "Criar Novo Treino",
            (Self::En, C::NewPlan) => "New plan",
            (Self::PtBr, C::Sets) => "Séries",
            (Self::En, C::Sets) => "Sets",
            (Self::PtBr, C::Reps) => "Reps",
            (Self::En, C::Reps) => "Reps",
            (Self::PtBr, C::Rest) => "Descanso",
            (Self::En, C::Rest) => "Rest",
            (Self::PtBr, C::ImagePending) => "gerando ilustração...",
            (Self::En, C::ImagePending) => "generating illustration...",
            (Self::PtBr, C::ImageReady) => "ilustração pronta",
            (Self::En, C::ImageReady) => "illustration ready",
            (Self::PtBr, C::ImageUnavailable) => "ilustração indisponível",
            (Self::En, C::ImageUnavailable) => "illustration unavailable",
            (Self::PtBr, C::Quit) => "Sair",
            (Self::En, C::Quit) => "Quit",
        }
    }
}

/// Keys for screen copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    AppName,
    Tagline,
    Start,
    AskLevel,
    AskGoal,
    AskMuscle,
    Next,
    Back,
    Generate,
    SelectFirst,
    Loading,
    LoadingDetail,
    ErrorTitle,
    TryAgain,
    Warmup,
    Cooldown,
    MainWorkout,
    NewPlan,
    Sets,
    Reps,
    Rest,
    ImagePending,
    ImageReady,
    ImageUnavailable,
    Quit,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pt-br" | "pt_br" | "pt" => Ok(Self::PtBr),
            "en" | "en-us" | "en_us" => Ok(Self::En),
            other => Err(format!("unknown locale '{}' (expected pt-BR or en)", other)),
        }
    }
}
