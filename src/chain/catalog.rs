//! Built-in teaching chains

use super::models::{Phase, TeachingChain};

/// The five default chains, each handing the session across three tutors
pub fn default_chains() -> Vec<TeachingChain> {
    vec![
        TeachingChain::new(
            "discover_practice_reflect",
            "Discover → Practice → Reflect",
            vec![
                Phase::new("Discover", "Professor Echo", "concept_understood"),
                Phase::new("Practice", "Coach Phoenix", "skills_demonstrated"),
                Phase::new("Reflect", "Master Zen", "session_complete"),
            ],
        )
        .with_description(
            "Start with inquiry-driven learning, reinforce through gamified practice, \
             and conclude with mindfulness and reflection.",
        ),
        TeachingChain::new(
            "understand_connect_system",
            "Understand Deeply → Connect Broadly → Think Systemically",
            vec![
                Phase::new("Understand", "Master Zen", "basics_mastered"),
                Phase::new("Connect", "Nova Starweaver", "connections_made"),
                Phase::new("Systemize", "Dr. Quantum Quest", "session_complete"),
            ],
        )
        .with_description(
            "Begin with clarity, relate to other disciplines, and then contextualize \
             within complex systems.",
        ),
        TeachingChain::new(
            "teach_story_visual",
            "Teach Simply → Tell a Story → Visualize It",
            vec![
                Phase::new("Simplify", "Master Zen", "concept_simplified"),
                Phase::new("Narrate", "Nova Starweaver", "story_complete"),
                Phase::new("Visualize", "Dr. Quantum Quest", "session_complete"),
            ],
        )
        .with_description(
            "Use child-friendly simplicity, build narrative memory, and reinforce with \
             visual structures.",
        ),
        TeachingChain::new(
            "light_deep_debate",
            "Light → Deep → Debate",
            vec![
                Phase::new("Warm Up", "Urahara Sensei", "comfort_established"),
                Phase::new("Deep Dive", "Professor Echo", "depth_achieved"),
                Phase::new("Debate", "Kuchiki Sensei", "session_complete"),
            ],
        )
        .with_description(
            "Warm up with friendly guidance, explore logic rigorously, and conclude with \
             a structured argument.",
        ),
        TeachingChain::new(
            "explore_simulate_analyze",
            "Explore Creatively → Simulate → Analyze with Data",
            vec![
                Phase::new("Explore", "Nova Starweaver", "curiosity_sparked"),
                Phase::new("Simulate", "Dr. Quantum Quest", "simulation_complete"),
                Phase::new("Analyze", "Kuchiki Sensei", "session_complete"),
            ],
        )
        .with_description(
            "Foster curiosity, test ideas interactively, then reflect on performance \
             using metrics.",
        ),
    ]
}
