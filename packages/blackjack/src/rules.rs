use crate::shoe::DECK_POINTS;
use crate::EngineError;
use serde::{Deserialize, Serialize};

/// Restrictions on when doubling down is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DoubleRestriction {
    /// Can double on any two cards
    #[default]
    Any,
    /// Can only double on hard 9, 10, or 11
    Hard9To11,
    /// Can only double on hard 10 or 11
    Hard10To11,
}

impl DoubleRestriction {
    pub fn permits(self, value: u8, is_soft: bool) -> bool {
        match self {
            DoubleRestriction::Any => true,
            DoubleRestriction::Hard9To11 => !is_soft && (9..=11).contains(&value),
            DoubleRestriction::Hard10To11 => !is_soft && (10..=11).contains(&value),
        }
    }
}

/// Blackjack payout multiplier as a ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRatio {
    pub numerator: u16,
    pub denominator: u16,
}

impl PayoutRatio {
    pub const THREE_TO_TWO: Self = Self {
        numerator: 3,
        denominator: 2,
    };
    pub const SIX_TO_FIVE: Self = Self {
        numerator: 6,
        denominator: 5,
    };

    pub fn new(numerator: u16, denominator: u16) -> Result<Self, EngineError> {
        let ratio = Self {
            numerator,
            denominator,
        };
        ratio.validate()?;
        Ok(ratio)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.denominator == 0 {
            return Err(EngineError::InvalidRuleset(
                "payout denominator cannot be zero".to_string(),
            ));
        }
        if self.numerator == 0 {
            return Err(EngineError::InvalidRuleset(
                "blackjack payout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for PayoutRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.numerator, self.denominator)
    }
}

impl std::str::FromStr for PayoutRatio {
    type Err = EngineError;

    /// Parses `"N:D"`, e.g. `"3:2"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidRuleset(format!("invalid payout ratio '{s}'"));
        let (num, den) = s.split_once(':').ok_or_else(invalid)?;
        let num = num.trim().parse().map_err(|_| invalid())?;
        let den = den.trim().parse().map_err(|_| invalid())?;
        Self::new(num, den)
    }
}

/// House rules for one dealer. Immutable for the duration of a round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    /// Dealer stands on soft 17 (otherwise hits it)
    pub dealer_stands_on_soft_17: bool,

    /// Blackjack payout multiplier (commonly 3:2 or 6:5)
    pub blackjack_payout: PayoutRatio,

    /// Allow doubling after split
    pub double_after_split: bool,

    /// Restriction on when doubling is allowed based on hand value
    #[serde(default)]
    pub double_restriction: DoubleRestriction,

    /// Allow splitting a hand that already came from a split
    pub resplit_allowed: bool,

    /// Can split aces again when a split ace draws another ace. Applies even
    /// when `hit_split_aces` is off: such a pair stays open, with only
    /// stand or split offered.
    #[serde(default)]
    pub resplit_aces: bool,

    /// Split aces may take further cards; otherwise they get one card each
    #[serde(default = "default_true")]
    pub hit_split_aces: bool,

    /// Allow surrendering the initial two-card hand
    pub surrender_allowed: bool,

    /// Most hands a single seat may hold after splitting
    pub max_split_hands: u8,

    /// Number of decks in the shoe
    pub deck_count: u8,

    /// Fraction of the shoe dealt before a mandatory reshuffle
    pub penetration_threshold: f64,
}

fn default_true() -> bool {
    true
}

impl Default for Ruleset {
    fn default() -> Self {
        // Standard Las Vegas rules
        Self {
            dealer_stands_on_soft_17: true,
            blackjack_payout: PayoutRatio::THREE_TO_TWO,
            double_after_split: true,
            double_restriction: DoubleRestriction::Any,
            resplit_allowed: true,
            resplit_aces: false,
            hit_split_aces: true,
            surrender_allowed: true,
            max_split_hands: 4,
            deck_count: 6,
            penetration_threshold: 0.75,
        }
    }
}

impl Ruleset {
    pub fn validate(&self) -> Result<(), EngineError> {
        self.blackjack_payout.validate()?;
        if self.max_split_hands < 1 {
            return Err(EngineError::InvalidRuleset(
                "max_split_hands must be at least 1".to_string(),
            ));
        }
        if self.deck_count < 1 {
            return Err(EngineError::InvalidRuleset(
                "deck_count must be at least 1".to_string(),
            ));
        }
        // NaN fails both comparisons
        if !(self.penetration_threshold > 0.0 && self.penetration_threshold < 1.0) {
            return Err(EngineError::InvalidRuleset(format!(
                "penetration_threshold must be between 0 and 1, got {}",
                self.penetration_threshold
            )));
        }
        if self.round_reserve() > u32::from(self.deck_count) * DECK_POINTS {
            return Err(EngineError::InvalidRuleset(format!(
                "{} split hands can need more cards than {} deck(s) hold",
                self.max_split_hands, self.deck_count
            )));
        }
        Ok(())
    }

    /// Card points one round can consume at most, counting every split
    /// hand. A player hand only draws at hard 20 or less and the dealer at
    /// hard 16 or less, and no card is worth more than 10. A fresh round is
    /// only dealt from a shoe holding at least this many points.
    pub fn round_reserve(&self) -> u32 {
        u32::from(self.max_split_hands) * (20 + 10) + (16 + 10)
    }

    /// Returns the ruleset if it is valid.
    pub fn validated(self) -> Result<Self, EngineError> {
        self.validate()?;
        Ok(self)
    }
}

/// Table minimum and maximum wager. Owned by the host, enforced on every bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLimits {
    pub min_bet: u64,
    pub max_bet: u64,
}

impl TableLimits {
    pub fn new(min_bet: u64, max_bet: u64) -> Result<Self, EngineError> {
        let limits = Self { min_bet, max_bet };
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.min_bet == 0 {
            return Err(EngineError::InvalidRuleset(
                "table minimum must be positive".to_string(),
            ));
        }
        if self.min_bet > self.max_bet {
            return Err(EngineError::InvalidRuleset(format!(
                "table minimum {} exceeds maximum {}",
                self.min_bet, self.max_bet
            )));
        }
        Ok(())
    }

    pub fn contains(&self, amount: u64) -> bool {
        (self.min_bet..=self.max_bet).contains(&amount)
    }
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            min_bet: 10,
            max_bet: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_ratio_zero_parts() {
        assert!(PayoutRatio::new(3, 0).is_err());
        assert!(PayoutRatio::new(0, 2).is_err());
        assert!(PayoutRatio::new(2, 1).is_ok());
    }

    #[test]
    fn test_payout_ratio_parse() {
        assert_eq!("3:2".parse::<PayoutRatio>().unwrap(), PayoutRatio::THREE_TO_TWO);
        assert_eq!(" 6 : 5 ".parse::<PayoutRatio>().unwrap(), PayoutRatio::SIX_TO_FIVE);
        assert!("3/2".parse::<PayoutRatio>().is_err());
        assert!("3:x".parse::<PayoutRatio>().is_err());
        assert!("3:0".parse::<PayoutRatio>().is_err());
        assert_eq!(PayoutRatio::SIX_TO_FIVE.to_string(), "6:5");
    }

    #[test]
    fn test_default_ruleset_is_valid() {
        assert!(Ruleset::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_rulesets() {
        let bad = [
            Ruleset {
                max_split_hands: 0,
                ..Ruleset::default()
            },
            Ruleset {
                deck_count: 0,
                ..Ruleset::default()
            },
            Ruleset {
                penetration_threshold: 0.0,
                ..Ruleset::default()
            },
            Ruleset {
                penetration_threshold: 1.0,
                ..Ruleset::default()
            },
            Ruleset {
                penetration_threshold: f64::NAN,
                ..Ruleset::default()
            },
            Ruleset {
                blackjack_payout: PayoutRatio {
                    numerator: 3,
                    denominator: 0,
                },
                ..Ruleset::default()
            },
            Ruleset {
                deck_count: 1,
                max_split_hands: 11,
                ..Ruleset::default()
            },
        ];
        for rules in bad {
            assert!(
                matches!(rules.validate(), Err(EngineError::InvalidRuleset(_))),
                "{rules:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_round_reserve() {
        let rules = Ruleset {
            max_split_hands: 4,
            ..Ruleset::default()
        };
        assert_eq!(rules.round_reserve(), 146);

        let single = Ruleset {
            deck_count: 1,
            max_split_hands: 10,
            ..Ruleset::default()
        };
        assert!(single.round_reserve() <= DECK_POINTS);
        assert!(single.validate().is_ok());
    }

    #[test]
    fn test_double_restriction() {
        assert!(DoubleRestriction::Any.permits(17, true));
        assert!(DoubleRestriction::Hard9To11.permits(9, false));
        assert!(!DoubleRestriction::Hard9To11.permits(11, true));
        assert!(!DoubleRestriction::Hard10To11.permits(9, false));
        assert!(DoubleRestriction::Hard10To11.permits(11, false));
    }

    #[test]
    fn test_table_limits() {
        assert!(TableLimits::new(0, 10).is_err());
        assert!(TableLimits::new(20, 10).is_err());
        let limits = TableLimits::new(10, 100).unwrap();
        assert!(limits.contains(10));
        assert!(limits.contains(100));
        assert!(!limits.contains(9));
        assert!(!limits.contains(101));
    }

    #[test]
    fn test_ruleset_json_defaults() {
        let json = r#"{
            "dealer_stands_on_soft_17": false,
            "blackjack_payout": { "numerator": 6, "denominator": 5 },
            "double_after_split": false,
            "resplit_allowed": false,
            "surrender_allowed": false,
            "max_split_hands": 2,
            "deck_count": 1,
            "penetration_threshold": 0.6
        }"#;
        let rules: Ruleset = serde_json::from_str(json).unwrap();
        assert_eq!(rules.double_restriction, DoubleRestriction::Any);
        assert!(rules.hit_split_aces);
        assert!(!rules.resplit_aces);
        assert!(rules.validate().is_ok());
    }
}
