//! Built-in four-question calibration questionnaire

use super::models::{CalibrationOption, CalibrationQuestion, PointMap, Questionnaire};

fn option(value: &str, label: &str, primary: &str, secondary: &str) -> CalibrationOption {
    CalibrationOption::new(
        value,
        label,
        PointMap::new().with(primary, 2.0).with(secondary, 1.0),
    )
}

/// The default questionnaire. Each option awards 2 points to its primary
/// tutor and 1 to its secondary tutor, scaled by the question weight.
pub fn default_questionnaire() -> Questionnaire {
    Questionnaire::new(vec![
        CalibrationQuestion::new(
            "learning_approach",
            "What's your preferred way of understanding new concepts?",
            2.0,
        )
        .with_option(option(
            "analytical",
            "Through systematic analysis and experimentation",
            "Dr. Quantum Quest",
            "Kuchiki Sensei",
        ))
        .with_option(option(
            "creative",
            "Through stories and creative connections",
            "Nova Starweaver",
            "Urahara Sensei",
        ))
        .with_option(option(
            "philosophical",
            "Through deep reasoning and discussion",
            "Professor Echo",
            "Yamamoto Sensei",
        ))
        .with_option(option(
            "practical",
            "Through hands-on practice and clear steps",
            "Master Zen",
            "Coach Phoenix",
        )),
        CalibrationQuestion::new(
            "learning_environment",
            "What kind of learning environment helps you focus best?",
            1.5,
        )
        .with_option(option("structured", "Organized and methodical", "Kuchiki Sensei", "Master Zen"))
        .with_option(option("dynamic", "Interactive and energetic", "Coach Phoenix", "Urahara Sensei"))
        .with_option(option(
            "contemplative",
            "Thoughtful and reflective",
            "Yamamoto Sensei",
            "Professor Echo",
        ))
        .with_option(option(
            "explorative",
            "Creative and experimental",
            "Nova Starweaver",
            "Dr. Quantum Quest",
        )),
        CalibrationQuestion::new("feedback_style", "How do you prefer to receive feedback?", 1.3)
            .with_option(option(
                "direct",
                "Clear and precise corrections",
                "Kuchiki Sensei",
                "Dr. Quantum Quest",
            ))
            .with_option(option(
                "guided",
                "Through guiding questions and hints",
                "Professor Echo",
                "Nova Starweaver",
            ))
            .with_option(option(
                "encouraging",
                "Motivational with clear next steps",
                "Coach Phoenix",
                "Urahara Sensei",
            ))
            .with_option(option(
                "reflective",
                "Thoughtful and detailed explanations",
                "Master Zen",
                "Yamamoto Sensei",
            )),
        CalibrationQuestion::new(
            "challenge_preference",
            "How do you like to approach challenging topics?",
            1.2,
        )
        .with_option(option(
            "systematic",
            "Break down into smaller, manageable parts",
            "Dr. Quantum Quest",
            "Master Zen",
        ))
        .with_option(option(
            "holistic",
            "Understand the big picture first",
            "Yamamoto Sensei",
            "Nova Starweaver",
        ))
        .with_option(option(
            "competitive",
            "Take on progressively harder challenges",
            "Coach Phoenix",
            "Kuchiki Sensei",
        ))
        .with_option(option(
            "exploratory",
            "Experiment and learn through discovery",
            "Urahara Sensei",
            "Professor Echo",
        )),
    ])
}
