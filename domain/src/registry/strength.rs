//! Capability and performance classifications for model profiles.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A task capability a model is known to be good at (Value Object)
///
/// Strengths connect task types to model profiles during selection:
/// a model is a candidate for a task when its strength set contains the
/// strength the task requires, or the generic [`Strength::Versatile`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strength {
    /// Multi-step logical reasoning
    Reasoning,
    /// Long-form prose and storytelling
    Narrative,
    /// Structured output (outlines, schemas, plans)
    Structural,
    /// Cheap enough for high-volume background work
    CostOptimized,
    /// Good-enough generalist, candidate for any task
    Versatile,
    /// Deployment-specific tag not known to this crate
    Custom(String),
}

impl Strength {
    /// Get the string identifier for this strength
    pub fn as_str(&self) -> &str {
        match self {
            Strength::Reasoning => "reasoning",
            Strength::Narrative => "narrative",
            Strength::Structural => "structural",
            Strength::CostOptimized => "cost-optimized",
            Strength::Versatile => "versatile",
            Strength::Custom(s) => s,
        }
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Strength {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "reasoning" => Strength::Reasoning,
            "narrative" => Strength::Narrative,
            "structural" => Strength::Structural,
            "cost-optimized" => Strength::CostOptimized,
            "versatile" => Strength::Versatile,
            other => Strength::Custom(other.to_string()),
        })
    }
}

impl Serialize for Strength {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Strength {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        // Infallible: unknown tags become Custom
        Ok(s.parse().unwrap())
    }
}

/// Rough latency classification for a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedClass {
    VeryFast,
    Fast,
    Medium,
    Slow,
}

impl Default for SpeedClass {
    fn default() -> Self {
        SpeedClass::Medium
    }
}

impl std::fmt::Display for SpeedClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SpeedClass::VeryFast => "very_fast",
            SpeedClass::Fast => "fast",
            SpeedClass::Medium => "medium",
            SpeedClass::Slow => "slow",
        };
        write!(f, "{s}")
    }
}

/// Named optimization policy for how the selector trades cost against quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    /// Minimize cost among acceptable-quality candidates
    Budget,
    /// Maximize quality-per-dollar
    Balanced,
    /// Maximize quality outright
    Premium,
}

impl Default for QualityTier {
    fn default() -> Self {
        QualityTier::Balanced
    }
}

impl std::str::FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "budget" => Ok(QualityTier::Budget),
            "balanced" => Ok(QualityTier::Balanced),
            "premium" => Ok(QualityTier::Premium),
            other => Err(format!("unknown quality tier: {other}")),
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            QualityTier::Budget => "budget",
            QualityTier::Balanced => "balanced",
            QualityTier::Premium => "premium",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_roundtrip() {
        for s in [
            Strength::Reasoning,
            Strength::Narrative,
            Strength::Structural,
            Strength::CostOptimized,
            Strength::Versatile,
        ] {
            let parsed: Strength = s.as_str().parse().unwrap();
            assert_eq!(s, parsed);
        }
    }

    #[test]
    fn test_custom_strength() {
        let s: Strength = "code-review".parse().unwrap();
        assert_eq!(s, Strength::Custom("code-review".to_string()));
        assert_eq!(s.to_string(), "code-review");
    }

    #[test]
    fn test_quality_tier_parse() {
        assert_eq!("premium".parse::<QualityTier>().unwrap(), QualityTier::Premium);
        assert!("ultra".parse::<QualityTier>().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(QualityTier::default(), QualityTier::Balanced);
        assert_eq!(SpeedClass::default(), SpeedClass::Medium);
    }
}
