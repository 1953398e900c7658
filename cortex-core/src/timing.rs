//! Adaptive study-time estimation.

use crate::tier::DifficultyTier;

/// Suggested study minutes for a topic: five minutes per word of the
/// topic name, scaled by the tier multiplier and clamped into the tier's
/// `[min_topic_time, max_topic_time]` range. Deterministic and pure.
pub fn suggested_minutes(topic_name: &str, tier: DifficultyTier) -> u32 {
    let settings = tier.settings();

    let words = topic_name.split_whitespace().count() as u32;
    let base_time = words * 5;

    let adjusted = (f64::from(base_time) * settings.difficulty_multiplier).round() as u32;

    adjusted.clamp(settings.min_topic_time, settings.max_topic_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_clamps_to_minimum() {
        // 2 words -> 10 base -> 13 after the 1.3x Basic multiplier,
        // clamped up into [25, 60]
        assert_eq!(
            suggested_minutes("Photosynthesis Overview", DifficultyTier::Basic),
            25
        );
    }

    #[test]
    fn test_long_name_clamps_to_maximum() {
        let name = "A very long and winding topic name with far too many words in it";
        assert_eq!(suggested_minutes(name, DifficultyTier::Basic), 60);
        assert_eq!(suggested_minutes(name, DifficultyTier::Advanced), 35);
    }

    #[test]
    fn test_mid_range_applies_multiplier() {
        // 6 words -> 30 base; Intermediate x1.0 stays 30 inside [20, 45]
        let name = "Energy transfer in marine food webs";
        assert_eq!(suggested_minutes(name, DifficultyTier::Intermediate), 30);
        // Advanced x0.8 -> 24 inside [15, 35]
        assert_eq!(suggested_minutes(name, DifficultyTier::Advanced), 24);
    }

    #[test]
    fn test_empty_name_still_within_bounds() {
        for tier in DifficultyTier::ALL {
            let minutes = suggested_minutes("", tier);
            let s = tier.settings();
            assert!(minutes >= s.min_topic_time && minutes <= s.max_topic_time);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = suggested_minutes("Krebs Cycle", DifficultyTier::Advanced);
        let b = suggested_minutes("Krebs Cycle", DifficultyTier::Advanced);
        assert_eq!(a, b);
    }
}
