use crate::{Card, EngineError, Rank, Suit};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Card points in one 52-card deck, Aces counted as 1.
pub const DECK_POINTS: u32 = 340;

/// Builds `deck_count` unshuffled decks: every rank × suit combination,
/// repeated once per deck.
pub fn build(deck_count: u8) -> Vec<Card> {
    let mut cards = Vec::with_capacity(52 * deck_count as usize);
    for _ in 0..deck_count {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
    }
    cards
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Shuffled,
    Stacked,
}

/// A shoe of one or more decks. The next card to be dealt sits at the end
/// of `cards`.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: Vec<Card>,
    deck_count: u8,
    built: usize,
    origin: Origin,
    rng: ChaCha8Rng,
}

impl Shoe {
    /// Builds and shuffles a fresh shoe. With a seed every shuffle the shoe
    /// ever performs is reproducible.
    pub fn new(deck_count: u8, seed: Option<u64>) -> Self {
        let cards = build(deck_count);
        let mut shoe = Self {
            built: cards.len(),
            cards,
            deck_count,
            origin: Origin::Shuffled,
            rng: rng_from(seed),
        };
        shoe.shuffle(None);
        shoe
    }

    /// A pre-arranged shoe that deals `cards` front to back. Stacked shoes
    /// are never reshuffled early; they are rebuilt only once exhausted.
    pub fn stacked(cards: Vec<Card>) -> Self {
        let mut cards = cards;
        cards.reverse();
        Self {
            built: cards.len(),
            cards,
            deck_count: 1,
            origin: Origin::Stacked,
            rng: rng_from(None),
        }
    }

    /// Uniformly permutes the remaining cards. `Some(seed)` reseeds the
    /// shoe's generator first; `None` keeps drawing from the generator the
    /// shoe already owns, so a seeded shoe stays reproducible across every
    /// later reshuffle. Only an unseeded shoe starts from entropy.
    pub fn shuffle(&mut self, seed: Option<u64>) {
        if let Some(seed) = seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }
        self.cards.shuffle(&mut self.rng);
    }

    /// Restores every card and reshuffles.
    pub fn rebuild(&mut self, seed: Option<u64>) {
        self.cards = build(self.deck_count);
        self.built = self.cards.len();
        self.origin = Origin::Shuffled;
        self.shuffle(seed);
        log::info!(
            "Shoe rebuilt: {} decks, {} cards",
            self.deck_count,
            self.built
        );
    }

    /// Switches to a different deck count, rebuilding if it changed.
    pub fn set_deck_count(&mut self, deck_count: u8) {
        if deck_count != self.deck_count {
            self.deck_count = deck_count;
            self.rebuild(None);
        }
    }

    pub fn draw(&mut self) -> Result<Card, EngineError> {
        self.cards.pop().ok_or_else(|| {
            log::warn!("Draw attempted on an empty shoe");
            EngineError::EmptyShoe
        })
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Total hard points of the undealt cards.
    pub fn remaining_points(&self) -> u32 {
        self.cards.iter().map(|c| u32::from(c.points())).sum()
    }

    pub fn dealt(&self) -> usize {
        self.built - self.cards.len()
    }

    /// Cards present right after the last build or rebuild.
    pub fn built(&self) -> usize {
        self.built
    }

    pub fn deck_count(&self) -> u8 {
        self.deck_count
    }

    /// Fraction of the shoe already dealt.
    pub fn penetration(&self) -> f64 {
        if self.built == 0 {
            return 1.0;
        }
        self.dealt() as f64 / self.built as f64
    }

    /// True once `threshold` of the shoe is dealt, or fewer than
    /// `reserve_points` card points remain to cover the next round.
    pub fn needs_reshuffle(&self, threshold: f64, reserve_points: u32) -> bool {
        match self.origin {
            Origin::Stacked => self.cards.is_empty(),
            Origin::Shuffled => {
                self.penetration() >= threshold || self.remaining_points() < reserve_points
            }
        }
    }
}

fn rng_from(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
