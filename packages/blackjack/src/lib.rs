mod card;
mod error;
mod hand;
mod outcome;
mod persona;
mod round;
mod rules;
mod shoe;
pub mod strategy;

pub use card::{Card, Rank, Suit};
pub use error::EngineError;
pub use hand::{
    calculate_hand_value, can_split_cards, hard_value, is_blackjack, is_busted, is_soft_hand, Hand,
};
pub use outcome::{resolve, HandResult, HandSummary, Outcome, PayoutMultiple, Resolution, RoundResult};
pub use persona::Persona;
pub use round::{
    dealer_should_hit, Action, LegalActions, Phase, PlayerHand, RoundEngine, RoundState,
};
pub use rules::{DoubleRestriction, PayoutRatio, Ruleset, TableLimits};
pub use shoe::{build as build_shoe, Shoe, DECK_POINTS};
