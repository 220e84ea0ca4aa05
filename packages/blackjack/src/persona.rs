//! Selectable dealers. Each persona is a named preset over [`Ruleset`];
//! the engine itself only ever sees the ruleset.

use crate::{DoubleRestriction, EngineError, PayoutRatio, Ruleset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Persona {
    #[default]
    Classic,
    Strip,
    Downtown,
    AtlanticCity,
    European,
    SingleDeck,
}

impl Persona {
    pub const ALL: [Persona; 6] = [
        Persona::Classic,
        Persona::Strip,
        Persona::Downtown,
        Persona::AtlanticCity,
        Persona::European,
        Persona::SingleDeck,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Persona::Classic => "Classic",
            Persona::Strip => "Vegas Strip",
            Persona::Downtown => "Downtown",
            Persona::AtlanticCity => "Atlantic City",
            Persona::European => "European",
            Persona::SingleDeck => "Single Deck",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Persona::Classic => "classic",
            Persona::Strip => "strip",
            Persona::Downtown => "downtown",
            Persona::AtlanticCity => "atlantic-city",
            Persona::European => "european",
            Persona::SingleDeck => "single-deck",
        }
    }

    pub fn ruleset(self) -> Ruleset {
        match self {
            Persona::Classic => Ruleset::default(),
            Persona::Strip => Ruleset {
                surrender_allowed: false,
                deck_count: 4,
                ..Ruleset::default()
            },
            Persona::Downtown => Ruleset {
                dealer_stands_on_soft_17: false,
                surrender_allowed: false,
                resplit_aces: true,
                deck_count: 2,
                penetration_threshold: 0.65,
                ..Ruleset::default()
            },
            Persona::AtlanticCity => Ruleset {
                deck_count: 8,
                penetration_threshold: 0.8,
                ..Ruleset::default()
            },
            // no surrender, no doubling after split, one split only
            Persona::European => Ruleset {
                double_after_split: false,
                double_restriction: DoubleRestriction::Hard9To11,
                resplit_allowed: false,
                hit_split_aces: false,
                surrender_allowed: false,
                max_split_hands: 2,
                ..Ruleset::default()
            },
            Persona::SingleDeck => Ruleset {
                dealer_stands_on_soft_17: false,
                blackjack_payout: PayoutRatio::SIX_TO_FIVE,
                double_after_split: false,
                double_restriction: DoubleRestriction::Hard10To11,
                resplit_allowed: false,
                hit_split_aces: false,
                surrender_allowed: false,
                max_split_hands: 2,
                deck_count: 1,
                penetration_threshold: 0.6,
                ..Ruleset::default()
            },
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Persona {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['_', ' '], "-");
        Persona::ALL
            .into_iter()
            .find(|p| p.slug() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Persona::ALL.iter().map(|p| p.slug()).collect();
                EngineError::InvalidRuleset(format!(
                    "unknown persona '{s}'. Available: {}",
                    known.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_persona_ruleset_is_valid() {
        for persona in Persona::ALL {
            assert!(persona.ruleset().validate().is_ok(), "{persona}");
        }
    }

    #[test]
    fn test_personas_differ() {
        for (i, a) in Persona::ALL.iter().enumerate() {
            for b in &Persona::ALL[i + 1..] {
                assert_ne!(a.ruleset(), b.ruleset(), "{a} and {b} share rules");
            }
        }
    }

    #[test]
    fn test_parse_persona() {
        assert_eq!("classic".parse::<Persona>().unwrap(), Persona::Classic);
        assert_eq!("Atlantic City".parse::<Persona>().unwrap(), Persona::AtlanticCity);
        assert_eq!("single_deck".parse::<Persona>().unwrap(), Persona::SingleDeck);
        assert!("riverboat".parse::<Persona>().is_err());
    }

    #[test]
    fn test_single_deck_pays_six_to_five() {
        let rules = Persona::SingleDeck.ruleset();
        assert_eq!(rules.blackjack_payout, PayoutRatio::SIX_TO_FIVE);
        assert_eq!(rules.deck_count, 1);
        assert!(!rules.dealer_stands_on_soft_17);
    }

    #[test]
    fn test_persona_serde_slug() {
        let json = serde_json::to_string(&Persona::AtlanticCity).unwrap();
        assert_eq!(json, "\"atlantic-city\"");
        let back: Persona = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Persona::AtlanticCity);
    }
}
