//! What to show when the reply cannot be translated for display.

use serde::{Deserialize, Serialize};

/// Fallback for a failed outbound translation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Show the untranslated English reply
    #[default]
    Passthrough,

    /// Replace the reply with the apology
    Apologize,
}

impl FallbackStrategy {
    /// Text to show in place of `reply`.
    pub fn apply(self, reply: String, apology: &str) -> String {
        match self {
            FallbackStrategy::Passthrough => reply,
            FallbackStrategy::Apologize => apology.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_passthrough() {
        assert_eq!(FallbackStrategy::default(), FallbackStrategy::Passthrough);
        assert_eq!(
            FallbackStrategy::default().apply("Enter your full name:".to_string(), "sorry"),
            "Enter your full name:"
        );
    }

    #[test]
    fn test_apologize() {
        assert_eq!(
            FallbackStrategy::Apologize.apply("Enter your full name:".to_string(), "sorry"),
            "sorry"
        );
    }

    #[test]
    fn test_config_names() {
        let strategy: FallbackStrategy = serde_yaml::from_str("apologize").unwrap();
        assert_eq!(strategy, FallbackStrategy::Apologize);
    }
}
