use crate::{Card, Hand, PayoutRatio, Ruleset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Push,
    Blackjack,
    Bust,
    Surrender,
}

/// Net result relative to the hand's wager, as a signed ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutMultiple {
    pub numerator: i32,
    pub denominator: u16,
}

impl PayoutMultiple {
    pub const WIN: Self = Self::whole(1);
    pub const LOSS: Self = Self::whole(-1);
    pub const PUSH: Self = Self::whole(0);
    pub const SURRENDER: Self = Self {
        numerator: -1,
        denominator: 2,
    };

    const fn whole(n: i32) -> Self {
        Self {
            numerator: n,
            denominator: 1,
        }
    }

    pub fn blackjack(ratio: PayoutRatio) -> Self {
        Self {
            numerator: ratio.numerator as i32,
            denominator: ratio.denominator,
        }
    }

    /// Net chips won (positive) or lost (negative) on `wager`. Rounds
    /// toward negative infinity, so fractional chips stay with the house.
    pub fn apply(&self, wager: u64) -> i64 {
        let denominator = i128::from(self.denominator.max(1));
        let scaled = i128::from(wager) * i128::from(self.numerator);
        scaled
            .div_euclid(denominator)
            .clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

/// Outcome of one finished player hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub outcome: Outcome,
    pub multiple: PayoutMultiple,
    pub net: i64,
}

/// Scores a finished player hand against the dealer. `wager` is the hand's
/// full stake, already doubled if the hand was doubled.
///
/// A dealer blackjack beats every player hand except a player blackjack,
/// including a multi-card or post-split 21.
pub fn resolve(dealer: &Hand, player: &Hand, rules: &Ruleset, wager: u64) -> Resolution {
    let (outcome, multiple) = if player.surrendered {
        (Outcome::Surrender, PayoutMultiple::SURRENDER)
    } else if player.is_busted() {
        (Outcome::Bust, PayoutMultiple::LOSS)
    } else if player.is_blackjack() {
        if dealer.is_blackjack() {
            (Outcome::Push, PayoutMultiple::PUSH)
        } else {
            (
                Outcome::Blackjack,
                PayoutMultiple::blackjack(rules.blackjack_payout),
            )
        }
    } else if dealer.is_blackjack() {
        (Outcome::Loss, PayoutMultiple::LOSS)
    } else if dealer.is_busted() {
        (Outcome::Win, PayoutMultiple::WIN)
    } else {
        match player.value().cmp(&dealer.value()) {
            std::cmp::Ordering::Greater => (Outcome::Win, PayoutMultiple::WIN),
            std::cmp::Ordering::Less => (Outcome::Loss, PayoutMultiple::LOSS),
            std::cmp::Ordering::Equal => (Outcome::Push, PayoutMultiple::PUSH),
        }
    };

    Resolution {
        outcome,
        multiple,
        net: multiple.apply(wager),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandSummary {
    pub cards: Vec<Card>,
    pub value: u8,
    pub soft: bool,
}

impl From<&Hand> for HandSummary {
    fn from(hand: &Hand) -> Self {
        Self {
            cards: hand.cards.clone(),
            value: hand.value(),
            soft: hand.is_soft(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandResult {
    pub cards: Vec<Card>,
    pub value: u8,
    pub doubled: bool,
    pub outcome: Outcome,
    pub wager: u64,
    pub multiple: PayoutMultiple,
    pub net: i64,
}

/// Everything a host needs once a round settles: final hands, outcomes
/// and chip movements. `net` is the sum over all player hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub dealer: HandSummary,
    pub hands: Vec<HandResult>,
    pub net: i64,
}

impl RoundResult {
    pub fn settle<'a>(
        dealer: &Hand,
        hands: impl IntoIterator<Item = (&'a Hand, u64)>,
        rules: &Ruleset,
    ) -> Self {
        let hands: Vec<HandResult> = hands
            .into_iter()
            .map(|(hand, wager)| {
                let resolution = resolve(dealer, hand, rules, wager);
                HandResult {
                    cards: hand.cards.clone(),
                    value: hand.value(),
                    doubled: hand.doubled,
                    outcome: resolution.outcome,
                    wager,
                    multiple: resolution.multiple,
                    net: resolution.net,
                }
            })
            .collect();
        let net = hands.iter().map(|h| h.net).sum();
        Self {
            dealer: HandSummary::from(dealer),
            hands,
            net,
        }
    }

    pub fn total_wagered(&self) -> u64 {
        self.hands.iter().map(|h| h.wager).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, Suit};

    fn hand(ranks: &[Rank]) -> Hand {
        Hand::from_cards(ranks.iter().map(|&r| Card::new(r, Suit::Diamonds)))
    }

    fn rules() -> Ruleset {
        Ruleset::default()
    }

    #[test]
    fn test_blackjack_pays_three_to_two() {
        let r = resolve(
            &hand(&[Rank::Seven, Rank::Nine]),
            &hand(&[Rank::Ace, Rank::King]),
            &rules(),
            100,
        );
        assert_eq!(r.outcome, Outcome::Blackjack);
        assert_eq!(r.net, 150);
    }

    #[test]
    fn test_blackjack_six_to_five() {
        let rules = Ruleset {
            blackjack_payout: PayoutRatio::SIX_TO_FIVE,
            ..Ruleset::default()
        };
        let r = resolve(
            &hand(&[Rank::Ten, Rank::Eight]),
            &hand(&[Rank::Ace, Rank::Queen]),
            &rules,
            50,
        );
        assert_eq!(r.outcome, Outcome::Blackjack);
        assert_eq!(r.net, 60);
    }

    #[test]
    fn test_both_blackjack_push() {
        let r = resolve(
            &hand(&[Rank::Ace, Rank::Jack]),
            &hand(&[Rank::Ace, Rank::King]),
            &rules(),
            100,
        );
        assert_eq!(r.outcome, Outcome::Push);
        assert_eq!(r.net, 0);
    }

    #[test]
    fn test_dealer_blackjack_beats_three_card_21() {
        let r = resolve(
            &hand(&[Rank::Ace, Rank::Jack]),
            &hand(&[Rank::Seven, Rank::Seven, Rank::Seven]),
            &rules(),
            100,
        );
        assert_eq!(r.outcome, Outcome::Loss);
        assert_eq!(r.net, -100);
    }

    #[test]
    fn test_split_21_is_not_blackjack() {
        let mut player = hand(&[Rank::Ace, Rank::King]);
        player.from_split = true;
        let r = resolve(&hand(&[Rank::Ten, Rank::Nine]), &player, &rules(), 100);
        assert_eq!(r.outcome, Outcome::Win);
        assert_eq!(r.net, 100);
    }

    #[test]
    fn test_bust_loses_even_if_dealer_busts() {
        let r = resolve(
            &hand(&[Rank::Ten, Rank::Six, Rank::Nine]),
            &hand(&[Rank::Ten, Rank::Six, Rank::Ten]),
            &rules(),
            40,
        );
        assert_eq!(r.outcome, Outcome::Bust);
        assert_eq!(r.net, -40);
    }

    #[test]
    fn test_dealer_bust_wins_doubled_wager() {
        let mut player = hand(&[Rank::Five, Rank::Six, Rank::Two]);
        player.doubled = true;
        let r = resolve(
            &hand(&[Rank::Ten, Rank::Six, Rank::Eight]),
            &player,
            &rules(),
            200,
        );
        assert_eq!(r.outcome, Outcome::Win);
        assert_eq!(r.net, 200);
    }

    #[test]
    fn test_surrender_forfeits_half() {
        let mut player = hand(&[Rank::Ten, Rank::Six]);
        player.surrendered = true;
        let r = resolve(&hand(&[Rank::Ten, Rank::Nine]), &player, &rules(), 100);
        assert_eq!(r.outcome, Outcome::Surrender);
        assert_eq!(r.net, -50);
        // odd chip goes to the house
        let r = resolve(&hand(&[Rank::Ten, Rank::Nine]), &player, &rules(), 5);
        assert_eq!(r.net, -3);
    }

    #[test]
    fn test_value_comparison() {
        let dealer = hand(&[Rank::Ten, Rank::Eight]);
        let win = resolve(&dealer, &hand(&[Rank::Ten, Rank::Nine]), &rules(), 10);
        let loss = resolve(&dealer, &hand(&[Rank::Ten, Rank::Seven]), &rules(), 10);
        let push = resolve(&dealer, &hand(&[Rank::Nine, Rank::Nine]), &rules(), 10);
        assert_eq!((win.outcome, win.net), (Outcome::Win, 10));
        assert_eq!((loss.outcome, loss.net), (Outcome::Loss, -10));
        assert_eq!((push.outcome, push.net), (Outcome::Push, 0));
    }

    #[test]
    fn test_payout_multiple_apply() {
        assert_eq!(PayoutMultiple::WIN.apply(25), 25);
        assert_eq!(PayoutMultiple::LOSS.apply(25), -25);
        assert_eq!(PayoutMultiple::PUSH.apply(25), 0);
        assert_eq!(PayoutMultiple::SURRENDER.apply(25), -13);
        assert_eq!(PayoutMultiple::blackjack(PayoutRatio::THREE_TO_TWO).apply(25), 37);
        assert_eq!(PayoutMultiple::blackjack(PayoutRatio::SIX_TO_FIVE).apply(50), 60);
    }

    #[test]
    fn test_round_result_sums_net() {
        let dealer = hand(&[Rank::Ten, Rank::Seven]);
        let hands = vec![
            (hand(&[Rank::Ten, Rank::Nine]), 20),
            (hand(&[Rank::Ten, Rank::Six]), 20),
            (hand(&[Rank::Ten, Rank::Seven]), 20),
        ];
        let result = RoundResult::settle(&dealer, hands.iter().map(|(h, w)| (h, *w)), &rules());
        assert_eq!(result.hands.len(), 3);
        assert_eq!(result.net, 0);
        assert_eq!(result.total_wagered(), 60);
        assert_eq!(result.dealer.value, 17);
    }
}
