/// A named score band with its display color (hex, no leading '#').
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub name: &'static str,
    pub color: &'static str,
}

/// Ethos score tiers, ordered by exclusive upper bound. Scores at or above
/// the last bound stay in the last tier.
const SCORE_TIERS: [(i64, Tier); 10] = [
    (800, Tier { name: "Untrusted", color: "b72b38" }),
    (1200, Tier { name: "Questionable", color: "C29010" }),
    (1400, Tier { name: "Neutral", color: "c1c0b6" }),
    (1600, Tier { name: "Known", color: "7C8DA8" }),
    (1800, Tier { name: "Established", color: "4E86B9" }),
    (2000, Tier { name: "Reputable", color: "2E7BC3" }),
    (2200, Tier { name: "Exemplary", color: "427B56" }),
    (2400, Tier { name: "Distinguished", color: "127f31" }),
    (2600, Tier { name: "Revered", color: "836DA6" }),
    (2800, Tier { name: "Renowned", color: "7A5EA0" }),
];

/// Map a score to its tier. Total over all integers: anything below the
/// first bound (including negative scores) is the lowest tier, anything at
/// or above the highest bound is the top tier.
pub fn classify(score: i64) -> Tier {
    for (bound, tier) in SCORE_TIERS {
        if score < bound {
            return tier;
        }
    }
    SCORE_TIERS[SCORE_TIERS.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(classify(799).name, "Untrusted");
        assert_eq!(classify(800).name, "Questionable");
        assert_eq!(classify(2799).name, "Revered");
        assert_eq!(classify(2800).name, "Renowned");
        assert_eq!(classify(999_999).name, "Renowned");
    }

    #[test]
    fn test_negative_scores_are_lowest_tier() {
        assert_eq!(classify(-1).name, "Untrusted");
        assert_eq!(classify(i64::MIN).name, "Untrusted");
    }

    #[test]
    fn test_established_color() {
        let tier = classify(1850);
        assert_eq!(tier.name, "Established");
        assert_eq!(tier.color, "4E86B9");
    }

    #[test]
    fn test_classify_is_pure() {
        assert_eq!(classify(1500), classify(1500));
        assert_eq!(classify(0), classify(0));
    }

    #[test]
    fn test_bounds_strictly_increasing() {
        for pair in SCORE_TIERS.windows(2) {
            assert!(pair[0].0 < pair[1].0, "bounds must be strictly increasing");
        }
    }

    /// Every bound is a real boundary: the tier changes exactly there.
    #[test]
    fn test_tiers_contiguous() {
        for (bound, _) in SCORE_TIERS {
            assert_ne!(classify(bound - 1), classify(bound));
        }
    }
}
