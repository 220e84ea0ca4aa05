use crate::{Card, EngineError, Hand, RoundResult, Ruleset, Shoe, TableLimits};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Betting,
    Dealing,
    PlayerTurn,
    DealerTurn,
    Settling,
    RoundOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Hit,
    Stand,
    Double,
    Split,
    Surrender,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Hit,
        Action::Stand,
        Action::Double,
        Action::Split,
        Action::Surrender,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Hit => "hit",
            Action::Stand => "stand",
            Action::Double => "double",
            Action::Split => "split",
            Action::Surrender => "surrender",
        };
        f.write_str(name)
    }
}

/// Actions the engine will accept for the acting hand right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegalActions {
    pub hit: bool,
    pub stand: bool,
    pub double: bool,
    pub split: bool,
    pub surrender: bool,
}

impl LegalActions {
    pub fn contains(&self, action: Action) -> bool {
        match action {
            Action::Hit => self.hit,
            Action::Stand => self.stand,
            Action::Double => self.double,
            Action::Split => self.split,
            Action::Surrender => self.surrender,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(move |a| self.contains(*a))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// A player hand and the chips riding on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHand {
    pub hand: Hand,
    pub wager: u64,
}

/// One round's worth of state. Created by a bet, discarded when the next
/// bet is placed.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub phase: Phase,
    pub dealer: Hand,
    pub hands: Vec<PlayerHand>,
    pub active_hand_index: usize,
    /// Bankroll the host reported when the bet was placed.
    pub bankroll: u64,
    pub result: Option<RoundResult>,
}

impl RoundState {
    fn new(wager: u64, bankroll: u64) -> Self {
        Self {
            phase: Phase::Dealing,
            dealer: Hand::new(),
            hands: vec![PlayerHand {
                hand: Hand::new(),
                wager,
            }],
            active_hand_index: 0,
            bankroll,
            result: None,
        }
    }

    pub fn active_hand(&self) -> &PlayerHand {
        &self.hands[self.active_hand_index]
    }

    fn active_hand_mut(&mut self) -> &mut PlayerHand {
        &mut self.hands[self.active_hand_index]
    }

    /// Chips committed across every hand, doubles and splits included.
    pub fn committed(&self) -> u64 {
        self.hands.iter().map(|h| h.wager).sum()
    }

    /// Bankroll not yet committed to this round.
    pub fn available(&self) -> u64 {
        self.bankroll.saturating_sub(self.committed())
    }

    fn next_open_hand(&self, from: usize) -> Option<usize> {
        (from..self.hands.len()).find(|&i| !self.hands[i].hand.is_complete())
    }
}

pub fn dealer_should_hit(dealer: &Hand, rules: &Ruleset) -> bool {
    let value = dealer.value();
    if value < 17 {
        true
    } else if value == 17 {
        dealer.is_soft() && !rules.dealer_stands_on_soft_17
    } else {
        false
    }
}

/// Drives rounds of blackjack for a single seat against the dealer.
///
/// Every operation either applies in full or returns an error and leaves
/// the engine untouched.
#[derive(Debug, Clone)]
pub struct RoundEngine {
    rules: Ruleset,
    limits: TableLimits,
    shoe: Shoe,
    round: Option<RoundState>,
}

impl RoundEngine {
    pub fn new(rules: Ruleset, limits: TableLimits) -> Result<Self, EngineError> {
        let shoe = Shoe::new(rules.deck_count, None);
        Self::with_shoe(rules, limits, shoe)
    }

    /// Seeds the shoe so every deal and reshuffle is reproducible.
    pub fn with_seed(rules: Ruleset, limits: TableLimits, seed: u64) -> Result<Self, EngineError> {
        let shoe = Shoe::new(rules.deck_count, Some(seed));
        Self::with_shoe(rules, limits, shoe)
    }

    /// Uses an existing shoe, e.g. one carried over from a previous engine.
    pub fn with_shoe(rules: Ruleset, limits: TableLimits, shoe: Shoe) -> Result<Self, EngineError> {
        rules.validate()?;
        limits.validate()?;
        Ok(Self {
            rules,
            limits,
            shoe,
            round: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.round.as_ref().map_or(Phase::Betting, |r| r.phase)
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.rules
    }

    pub fn limits(&self) -> &TableLimits {
        &self.limits
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn dealer_hand(&self) -> Option<&Hand> {
        self.round.as_ref().map(|r| &r.dealer)
    }

    /// The dealer's face-up card. The hole card stays hidden from hosts
    /// until the round is over.
    pub fn dealer_up_card(&self) -> Option<Card> {
        self.dealer_hand().and_then(|h| h.cards.first().copied())
    }

    pub fn player_hands(&self) -> &[PlayerHand] {
        match &self.round {
            Some(round) => &round.hands,
            None => &[],
        }
    }

    pub fn active_hand_index(&self) -> Option<usize> {
        self.round
            .as_ref()
            .filter(|r| r.phase == Phase::PlayerTurn)
            .map(|r| r.active_hand_index)
    }

    pub fn result(&self) -> Option<&RoundResult> {
        self.round.as_ref().and_then(|r| r.result.as_ref())
    }

    /// Replaces the house rules. Only allowed between rounds; a new deck
    /// count rebuilds the shoe.
    pub fn set_ruleset(&mut self, rules: Ruleset) -> Result<(), EngineError> {
        self.commit(|engine| {
            if !matches!(engine.phase(), Phase::Betting | Phase::RoundOver) {
                return Err(EngineError::illegal(
                    "set_ruleset",
                    "rules are locked until the round is over",
                ));
            }
            rules.validate()?;
            engine.shoe.set_deck_count(rules.deck_count);
            engine.rules = rules;
            Ok(())
        })
    }

    /// Drops the current round, if any. Cards already dealt stay out of
    /// the shoe.
    pub fn abandon_round(&mut self) {
        if let Some(round) = self.round.take() {
            if round.phase != Phase::RoundOver {
                log::warn!("Abandoning round in {:?}", round.phase);
            }
        }
    }

    /// Opens a round with `amount` riding on a single hand and deals it.
    /// `bankroll` is the player's balance before the bet.
    pub fn place_bet(&mut self, amount: u64, bankroll: u64) -> Result<Phase, EngineError> {
        self.commit(|engine| engine.open_round(amount, bankroll))
    }

    pub fn act(&mut self, action: Action) -> Result<Phase, EngineError> {
        self.commit(|engine| engine.apply(action))
    }

    pub fn hit(&mut self) -> Result<Phase, EngineError> {
        self.act(Action::Hit)
    }

    pub fn stand(&mut self) -> Result<Phase, EngineError> {
        self.act(Action::Stand)
    }

    pub fn double(&mut self) -> Result<Phase, EngineError> {
        self.act(Action::Double)
    }

    pub fn split(&mut self) -> Result<Phase, EngineError> {
        self.act(Action::Split)
    }

    pub fn surrender(&mut self) -> Result<Phase, EngineError> {
        self.act(Action::Surrender)
    }

    pub fn legal_actions(&self) -> LegalActions {
        LegalActions {
            hit: self.check(Action::Hit).is_ok(),
            stand: self.check(Action::Stand).is_ok(),
            double: self.check(Action::Double).is_ok(),
            split: self.check(Action::Split).is_ok(),
            surrender: self.check(Action::Surrender).is_ok(),
        }
    }

    /// Runs `op` against a copy and keeps the copy only on success.
    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut staged = self.clone();
        let value = op(&mut staged)?;
        *self = staged;
        Ok(value)
    }

    fn open_round(&mut self, amount: u64, bankroll: u64) -> Result<Phase, EngineError> {
        if !matches!(self.phase(), Phase::Betting | Phase::RoundOver) {
            return Err(EngineError::illegal("bet", "a round is already in progress"));
        }
        if !self.limits.contains(amount) {
            return Err(EngineError::invalid_bet(
                amount,
                format!(
                    "outside table limits {}-{}",
                    self.limits.min_bet, self.limits.max_bet
                ),
            ));
        }
        if amount > bankroll {
            return Err(EngineError::invalid_bet(
                amount,
                format!("exceeds bankroll of {bankroll}"),
            ));
        }

        let reserve = self.rules.round_reserve();
        if self
            .shoe
            .needs_reshuffle(self.rules.penetration_threshold, reserve)
        {
            log::info!(
                "Reshuffling at {:.0}% penetration ({} cards, {} of {reserve} points left)",
                self.shoe.penetration() * 100.0,
                self.shoe.remaining(),
                self.shoe.remaining_points()
            );
            self.shoe.rebuild(None);
        }

        let mut round = RoundState::new(amount, bankroll);
        log::debug!("Bet {amount} placed, dealing");

        // player, dealer, player, dealer
        for _ in 0..2 {
            let card = self.shoe.draw()?;
            round.hands[0].hand.add_card(card);
            let card = self.shoe.draw()?;
            round.dealer.add_card(card);
        }

        let player_blackjack = round.hands[0].hand.is_blackjack();
        let dealer_blackjack = round.dealer.is_blackjack();
        self.round = Some(round);

        if player_blackjack || dealer_blackjack {
            log::debug!(
                "Natural on the deal (player: {player_blackjack}, dealer: {dealer_blackjack})"
            );
            self.settle()
        } else {
            self.set_phase(Phase::PlayerTurn);
            Ok(Phase::PlayerTurn)
        }
    }

    fn round_ref(&self, action: Action) -> Result<&RoundState, EngineError> {
        match self.round.as_ref() {
            Some(round) if round.phase == Phase::PlayerTurn => Ok(round),
            Some(round) => Err(EngineError::illegal(
                action,
                format!("not the player's turn ({:?})", round.phase),
            )),
            None => Err(EngineError::illegal(action, "no round in progress")),
        }
    }

    /// Checks every precondition for `action` without touching state.
    fn check(&self, action: Action) -> Result<(), EngineError> {
        let round = self.round_ref(action)?;
        let current = round.active_hand();
        let hand = &current.hand;

        let split_ace = hand.from_split && hand.cards[0].is_ace();
        match action {
            Action::Hit if split_ace && !self.rules.hit_split_aces => Err(EngineError::illegal(
                action,
                "split aces take one card each",
            )),
            Action::Hit | Action::Stand => Ok(()),
            Action::Double => {
                if split_ace && !self.rules.hit_split_aces {
                    return Err(EngineError::illegal(action, "split aces take one card each"));
                }
                if hand.len() != 2 {
                    return Err(EngineError::illegal(action, "only on the first two cards"));
                }
                if hand.from_split && !self.rules.double_after_split {
                    return Err(EngineError::illegal(action, "not allowed after a split"));
                }
                if !self
                    .rules
                    .double_restriction
                    .permits(hand.value(), hand.is_soft())
                {
                    return Err(EngineError::illegal(
                        action,
                        format!("not allowed on {}", hand.value()),
                    ));
                }
                if round.available() < current.wager {
                    return Err(EngineError::illegal(action, "bankroll cannot cover the double"));
                }
                Ok(())
            }
            Action::Split => {
                if !hand.can_split() {
                    return Err(EngineError::illegal(action, "needs a pair of equal rank"));
                }
                if round.hands.len() >= self.rules.max_split_hands as usize {
                    return Err(EngineError::illegal(
                        action,
                        format!("at most {} hands", self.rules.max_split_hands),
                    ));
                }
                if hand.from_split && !self.rules.resplit_allowed {
                    return Err(EngineError::illegal(action, "resplitting is not allowed"));
                }
                if split_ace && !self.rules.resplit_aces {
                    return Err(EngineError::illegal(action, "aces cannot be resplit"));
                }
                if round.available() < current.wager {
                    return Err(EngineError::illegal(action, "bankroll cannot cover the split"));
                }
                Ok(())
            }
            Action::Surrender => {
                if !self.rules.surrender_allowed {
                    return Err(EngineError::illegal(action, "surrender is not offered"));
                }
                if hand.len() != 2 || hand.from_split {
                    return Err(EngineError::illegal(
                        action,
                        "only as the first decision on the original hand",
                    ));
                }
                Ok(())
            }
        }
    }

    fn apply(&mut self, action: Action) -> Result<Phase, EngineError> {
        self.check(action)?;
        let rules = self.rules;
        let Some(round) = self.round.as_mut() else {
            return Err(EngineError::illegal(action, "no round in progress"));
        };
        let index = round.active_hand_index;
        log::debug!("Hand {index}: {action}");

        match action {
            Action::Hit => {
                let card = self.shoe.draw()?;
                let current = &mut round.active_hand_mut().hand;
                current.add_card(card);
                if current.value() == 21 {
                    current.stood = true;
                }
            }
            Action::Stand => {
                round.active_hand_mut().hand.stood = true;
            }
            Action::Double => {
                let card = self.shoe.draw()?;
                let current = round.active_hand_mut();
                current.wager *= 2;
                current.hand.doubled = true;
                current.hand.add_card(card);
                current.hand.stood = true;
            }
            Action::Split => {
                let first_card = self.shoe.draw()?;
                let second_card = self.shoe.draw()?;
                let current = round.active_hand_mut();
                let wager = current.wager;
                let moved = current.hand.cards.pop().ok_or_else(|| {
                    EngineError::illegal(action, "needs a pair of equal rank")
                })?;
                current.hand.from_split = true;
                current.hand.add_card(first_card);

                let mut new_hand = Hand::from_cards([moved, second_card]);
                new_hand.from_split = true;
                round.hands.insert(
                    index + 1,
                    PlayerHand {
                        hand: new_hand,
                        wager,
                    },
                );

                // Split aces that may not be hit are done after one card,
                // unless that card makes a pair the player may split again.
                let split_aces = moved.is_ace();
                let room = round.hands.len() < rules.max_split_hands as usize;
                for hand in &mut round.hands[index..=index + 1] {
                    let resplittable =
                        rules.resplit_allowed && rules.resplit_aces && room && hand.hand.can_split();
                    let one_card_only = split_aces && !rules.hit_split_aces && !resplittable;
                    if one_card_only || hand.hand.value() == 21 {
                        hand.hand.stood = true;
                    }
                }
            }
            Action::Surrender => {
                round.active_hand_mut().hand.surrendered = true;
            }
        }

        self.advance()
    }

    /// Moves to the next hand still awaiting decisions, or on to the dealer.
    fn advance(&mut self) -> Result<Phase, EngineError> {
        let Some(round) = self.round.as_mut() else {
            return Ok(Phase::Betting);
        };
        match round.next_open_hand(round.active_hand_index) {
            Some(next) => {
                if next != round.active_hand_index {
                    log::debug!("Moving to hand {next}");
                }
                round.active_hand_index = next;
                Ok(Phase::PlayerTurn)
            }
            None => self.play_dealer(),
        }
    }

    fn play_dealer(&mut self) -> Result<Phase, EngineError> {
        self.set_phase(Phase::DealerTurn);
        let rules = self.rules;
        let Some(round) = self.round.as_mut() else {
            return Ok(Phase::Betting);
        };
        while dealer_should_hit(&round.dealer, &rules) {
            let card = self.shoe.draw()?;
            round.dealer.add_card(card);
        }
        log::debug!(
            "Dealer stands at {}{}",
            round.dealer.value(),
            if round.dealer.is_busted() { " (bust)" } else { "" }
        );
        self.settle()
    }

    fn settle(&mut self) -> Result<Phase, EngineError> {
        self.set_phase(Phase::Settling);
        let rules = self.rules;
        let Some(round) = self.round.as_mut() else {
            return Ok(Phase::Betting);
        };
        let result = RoundResult::settle(
            &round.dealer,
            round.hands.iter().map(|h| (&h.hand, h.wager)),
            &rules,
        );
        log::info!(
            "Round settled: dealer {} vs {} hand(s), net {:+}",
            result.dealer.value,
            result.hands.len(),
            result.net
        );
        round.result = Some(result);
        round.phase = Phase::RoundOver;
        Ok(Phase::RoundOver)
    }

    fn set_phase(&mut self, phase: Phase) {
        if let Some(round) = self.round.as_mut() {
            log::debug!("{:?} -> {:?}", round.phase, phase);
            round.phase = phase;
        }
    }
}
