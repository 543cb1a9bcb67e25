//! Workout plan data contract.
//!
//! These types mirror the structure the generative service is required to
//! emit. Every field is mandatory on the wire; [`WorkoutPlan::validate`]
//! additionally rejects plans that parse but carry no usable content.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// One exercise of the main workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,

    /// Number of sets, as a range (e.g. "3-4")
    pub sets: String,

    /// Repetition range (e.g. "8-12" or "to failure")
    pub reps: String,

    /// Rest between sets (e.g. "60-90s")
    pub rest: String,

    /// Technique or intensity tip
    pub notes: String,

    /// Illustration, filled in after the plan exists. Never read from the
    /// service's plan payload.
    #[serde(rename = "imageUrl", skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

/// A complete generated workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub title: String,
    pub description: String,
    pub estimated_duration: String,
    pub frequency_recommendation: String,
    pub warmup: Vec<String>,
    pub exercises: Vec<Exercise>,
    pub cooldown: Vec<String>,
}

/// Reasons a parsed plan is still unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanViolation {
    #[error("plan has no exercises")]
    NoExercises,

    #[error("plan title is blank")]
    BlankTitle,

    #[error("exercise #{index} has a blank '{field}' field")]
    BlankExerciseField { index: usize, field: &'static str },
}

impl WorkoutPlan {
    /// Parse the raw text payload returned by the service.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Check the invariants a successful generation must satisfy.
    pub fn validate(&self) -> Result<(), PlanViolation> {
        if self.title.trim().is_empty() {
            return Err(PlanViolation::BlankTitle);
        }
        if self.exercises.is_empty() {
            return Err(PlanViolation::NoExercises);
        }
        for (index, exercise) in self.exercises.iter().enumerate() {
            let fields = [
                ("name", &exercise.name),
                ("sets", &exercise.sets),
                ("reps", &exercise.reps),
                ("rest", &exercise.rest),
                ("notes", &exercise.notes),
            ];
            if let Some((field, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
                return Err(PlanViolation::BlankExerciseField { index, field });
            }
        }
        Ok(())
    }

    /// Attach an illustration to the exercise at `index`.
    ///
    /// Returns `false` when the index is out of range.
    pub fn set_image(&mut self, index: usize, image: ImageRef) -> bool {
        match self.exercises.get_mut(index) {
            Some(exercise) => {
                exercise.image = Some(image);
                true
            }
            None => false,
        }
    }

    /// Exercise names in plan order.
    pub fn exercise_names(&self) -> impl Iterator<Item = &str> {
        self.exercises.iter().map(|e| e.name.as_str())
    }
}

/// An embeddable image reference (`data:<mime>;base64,<payload>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap an already base64-encoded PNG payload.
    ///
    /// The payload is decoded once to make sure it is well formed.
    pub fn from_base64_png(payload: &str) -> Result<Self, base64::DecodeError> {
        STANDARD.decode(payload)?;
        Ok(Self(format!("data:image/png;base64,{}", payload)))
    }

    /// The full data URI.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The base64 payload after the comma.
    pub fn payload(&self) -> &str {
        self.0.split_once(',').map_or("", |(_, data)| data)
    }

    /// Decoded image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.payload())
    }

    /// Size of the decoded image, in bytes.
    pub fn byte_len(&self) -> usize {
        self.decode().map(|bytes| bytes.len()).unwrap_or(0)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
