//! Prompt and response-schema construction.

use serde_json::{json, Value};

use crate::core::{Choice, CompletePreferences, Locale};

/// System instruction sent with every plan request.
pub const SYSTEM_INSTRUCTION: &str = "You are a world-class elite personal trainer. \
You design highly effective, safe, science-based workouts. Always answer with valid JSON.";

/// Build the natural-language instruction for a plan request.
pub fn plan_prompt(preferences: &CompletePreferences, locale: Locale) -> String {
    format!(
        r#"Create a complete and detailed strength training workout plan.

User profile:
- Experience level: {level}
- Main goal: {goal}
- Muscle group of the day: {muscle}

Guidelines:
1. The workout must follow professional physical education principles.
2. Prioritize safety and correct biomechanics, especially for beginners: start with simpler movements and progress carefully.
3. For hypertrophy goals, focus on training volume and mechanical tension.
4. For strength goals, focus on heavy loads and low repetitions.
5. For fat loss goals, suggest high intensity and bi-sets or other compound sets when appropriate.
6. {language}
7. The "notes" of each exercise must be practical execution tips."#,
        level = preferences.level.label(locale),
        goal = preferences.goal.label(locale),
        muscle = preferences.muscle_group.label(locale),
        language = locale.language_directive(),
    )
}

/// Build the image-generation instruction for one exercise.
pub fn image_prompt(exercise_name: &str) -> String {
    format!(
        r#"Create a clean, professional fitness illustration (technical drawing style or realistic 3D render) of a person performing the exercise: "{}".
The background must be plain white or very light gray.
Focus on correct form and posture.
Full body view."#,
        exercise_name
    )
}

/// Structural contract the service must follow, in the service's schema
/// dialect. Every field is required.
pub fn plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A catchy title for the workout session."
            },
            "description": {
                "type": "STRING",
                "description": "A brief overview of the workout focus and intensity."
            },
            "estimatedDuration": {
                "type": "STRING",
                "description": "Estimated time to complete the workout (e.g., '45-60 min')."
            },
            "frequencyRecommendation": {
                "type": "STRING",
                "description": "How many times per week this specific workout should be done."
            },
            "warmup": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of warm-up activities."
            },
            "exercises": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "sets": { "type": "STRING", "description": "Number of sets (e.g., '3-4')." },
                        "reps": { "type": "STRING", "description": "Repetition range (e.g., '8-12' or 'to failure')." },
                        "rest": { "type": "STRING", "description": "Rest time between sets (e.g., '60-90s')." },
                        "notes": { "type": "STRING", "description": "Technique tip or intensity instruction (e.g., 'Focus on the eccentric phase')." }
                    },
                    "required": ["name", "sets", "reps", "rest", "notes"]
                }
            },
            "cooldown": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of cool-down or stretching activities."
            }
        },
        "required": [
            "title",
            "description",
            "estimatedDuration",
            "frequencyRecommendation",
            "warmup",
            "exercises",
            "cooldown"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExperienceLevel, FitnessGoal, MuscleGroup};

    fn prefs() -> CompletePreferences {
        CompletePreferences {
            level: ExperienceLevel::Beginner,
            goal: FitnessGoal::Hypertrophy,
            muscle_group: MuscleGroup::Chest,
        }
    }

    #[test]
    fn test_plan_prompt_embeds_localized_preferences() {
        let prompt = plan_prompt(&prefs(), Locale::PtBr);
        assert!(prompt.contains("Iniciante"));
        assert!(prompt.contains("Hipertrofia Muscular"));
        assert!(prompt.contains("Peito"));
        assert!(prompt.contains("PORTUGUESE"));

        let prompt = plan_prompt(&prefs(), Locale::En);
        assert!(prompt.contains("Beginner"));
        assert!(prompt.contains("Chest"));
        assert!(prompt.contains("ENGLISH"));
    }

    #[test]
    fn test_plan_prompt_carries_domain_directives() {
        let prompt = plan_prompt(&prefs(), Locale::En);
        assert!(prompt.contains("especially for beginners"));
        assert!(prompt.contains("mechanical tension"));
        assert!(prompt.contains("heavy loads and low repetitions"));
        assert!(prompt.contains("bi-sets"));
    }

    #[test]
    fn test_image_prompt_names_exercise() {
        let prompt = image_prompt("Supino Reto");
        assert!(prompt.contains("\"Supino Reto\""));
        assert!(prompt.contains("plain white"));
    }

    #[test]
    fn test_schema_requires_every_field() {
        let schema = plan_schema();
        let required: Vec<&str> =
            schema["required"].as_array().unwrap().iter().filter_map(|v| v.as_str()).collect();
        for field in schema["properties"].as_object().unwrap().keys() {
            assert!(required.contains(&field.as_str()), "{field} not required");
        }

        let exercise = &schema["properties"]["exercises"]["items"];
        assert_eq!(exercise["required"].as_array().unwrap().len(), 5);
    }
}
