use crate::Card;
use serde::{Deserialize, Serialize};

/// Sum of card points with every Ace counted as 1.
pub fn hard_value(cards: &[Card]) -> u8 {
    let total: u32 = cards.iter().map(|c| c.points() as u32).sum();
    total.min(u8::MAX as u32) as u8
}

/// Best blackjack total: the hard total, plus 10 when one Ace can count
/// as 11 without going over 21. A second promoted Ace would always bust,
/// so at most one is ever promoted.
pub fn calculate_hand_value(cards: &[Card]) -> u8 {
    let hard = hard_value(cards);
    if has_promotable_ace(cards, hard) {
        hard + 10
    } else {
        hard
    }
}

/// True when the value includes an Ace counted as 11.
pub fn is_soft_hand(cards: &[Card]) -> bool {
    has_promotable_ace(cards, hard_value(cards))
}

pub fn is_busted(cards: &[Card]) -> bool {
    calculate_hand_value(cards) > 21
}

/// Two-card 21. Knows nothing about splits; see [`Hand::is_blackjack`].
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && calculate_hand_value(cards) == 21
}

/// Split pairs must share a rank, so K-Q is not a pair.
pub fn can_split_cards(card1: &Card, card2: &Card) -> bool {
    card1.rank == card2.rank
}

fn has_promotable_ace(cards: &[Card], hard: u8) -> bool {
    hard <= 11 && cards.iter().any(|c| c.is_ace())
}

/// One player hand or the dealer's hand. Totals are always derived from
/// `cards` on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
    /// Produced by a split; such a hand can never be a blackjack.
    pub from_split: bool,
    pub doubled: bool,
    pub stood: bool,
    pub surrendered: bool,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn hard_value(&self) -> u8 {
        hard_value(&self.cards)
    }

    pub fn value(&self) -> u8 {
        calculate_hand_value(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        is_soft_hand(&self.cards)
    }

    pub fn is_busted(&self) -> bool {
        is_busted(&self.cards)
    }

    pub fn is_blackjack(&self) -> bool {
        !self.from_split && is_blackjack(&self.cards)
    }

    pub fn can_split(&self) -> bool {
        self.cards.len() == 2 && can_split_cards(&self.cards[0], &self.cards[1])
    }

    /// No further decisions are taken on this hand.
    pub fn is_complete(&self) -> bool {
        self.stood || self.surrendered || self.is_busted()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
