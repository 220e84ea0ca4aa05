//! Basic-strategy advice for the acting hand.

use crate::{Action, Card, Hand, LegalActions, Rank, Ruleset};

/// Dealer up card as strategy tables read it: Ace counts 11.
fn up_card_value(card: &Card) -> u8 {
    if card.is_ace() {
        11
    } else {
        card.points()
    }
}

/// Recommends a move from standard multi-deck basic strategy, picking only
/// among `legal`. Falls back to hit or stand when the preferred move
/// (double, split, surrender) is unavailable.
pub fn advise(hand: &Hand, dealer_up: &Card, legal: &LegalActions, rules: &Ruleset) -> Action {
    let player_value = hand.value();
    let dealer_value = up_card_value(dealer_up);
    let is_soft = hand.is_soft();
    let splittable = legal.split && hand.can_split();

    // Surrender comes before split/double; a pair of 8s is split instead
    let eights = splittable && hand.cards[0].rank == Rank::Eight;
    if legal.surrender && !is_soft && !eights {
        if player_value == 16 && (9..=11).contains(&dealer_value) {
            return Action::Surrender;
        }
        if player_value == 15 && dealer_value == 10 {
            return Action::Surrender;
        }
    }

    if splittable {
        if let Some(action) = split_advice(hand.cards[0].rank, dealer_value, rules) {
            return action;
        }
    }

    if legal.double && should_double(player_value, is_soft, dealer_value) {
        return Action::Double;
    }

    let stand = if is_soft {
        player_value >= 19 || (player_value == 18 && dealer_value <= 8)
    } else if player_value >= 17 {
        true
    } else if (13..=16).contains(&player_value) {
        (2..=6).contains(&dealer_value)
    } else if player_value == 12 {
        (4..=6).contains(&dealer_value)
    } else {
        false
    };

    if stand || !legal.hit {
        Action::Stand
    } else {
        Action::Hit
    }
}

fn split_advice(rank: Rank, dealer_value: u8, rules: &Ruleset) -> Option<Action> {
    let split = match rank {
        // Always split Aces and 8s
        Rank::Ace | Rank::Eight => true,
        // Never split 10s, 5s, 4s
        Rank::Ten | Rank::Jack | Rank::Queen | Rank::King | Rank::Five | Rank::Four => false,
        Rank::Nine => !matches!(dealer_value, 7 | 10 | 11),
        Rank::Seven => (2..=7).contains(&dealer_value),
        Rank::Six => {
            (3..=6).contains(&dealer_value) || (dealer_value == 2 && rules.double_after_split)
        }
        Rank::Two | Rank::Three => {
            (4..=7).contains(&dealer_value)
                || (dealer_value <= 3 && rules.double_after_split)
        }
    };
    split.then_some(Action::Split)
}

fn should_double(player_value: u8, is_soft: bool, dealer_value: u8) -> bool {
    if is_soft {
        match player_value {
            19 => dealer_value == 6,
            18 => (2..=6).contains(&dealer_value),
            17 => (3..=6).contains(&dealer_value),
            15 | 16 => (4..=6).contains(&dealer_value),
            13 | 14 => (5..=6).contains(&dealer_value),
            _ => false,
        }
    } else {
        match player_value {
            11 => true,
            10 => dealer_value <= 9,
            9 => (3..=6).contains(&dealer_value),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Suit;

    fn hand(ranks: &[Rank]) -> Hand {
        Hand::from_cards(ranks.iter().map(|&r| Card::new(r, Suit::Clubs)))
    }

    fn up(rank: Rank) -> Card {
        Card::new(rank, Suit::Spades)
    }

    fn all_legal() -> LegalActions {
        LegalActions {
            hit: true,
            stand: true,
            double: true,
            split: true,
            surrender: true,
        }
    }

    fn hit_stand() -> LegalActions {
        LegalActions {
            hit: true,
            stand: true,
            ..LegalActions::default()
        }
    }

    #[test]
    fn test_always_split_aces_and_eights() {
        let rules = Ruleset::default();
        for dealer in [Rank::Two, Rank::Seven, Rank::Ten, Rank::Ace] {
            assert_eq!(
                advise(&hand(&[Rank::Eight, Rank::Eight]), &up(dealer), &all_legal(), &rules),
                Action::Split
            );
            assert_eq!(
                advise(&hand(&[Rank::Ace, Rank::Ace]), &up(dealer), &all_legal(), &rules),
                Action::Split
            );
        }
    }

    #[test]
    fn test_never_split_tens() {
        let action = advise(
            &hand(&[Rank::King, Rank::King]),
            &up(Rank::Six),
            &all_legal(),
            &Ruleset::default(),
        );
        assert_eq!(action, Action::Stand);
    }

    #[test]
    fn test_surrender_sixteen_against_ten() {
        let action = advise(
            &hand(&[Rank::Ten, Rank::Six]),
            &up(Rank::King),
            &all_legal(),
            &Ruleset::default(),
        );
        assert_eq!(action, Action::Surrender);
    }

    #[test]
    fn test_sixteen_against_ten_hits_without_surrender() {
        let action = advise(
            &hand(&[Rank::Ten, Rank::Six]),
            &up(Rank::King),
            &hit_stand(),
            &Ruleset::default(),
        );
        assert_eq!(action, Action::Hit);
    }

    #[test]
    fn test_double_eleven() {
        let action = advise(
            &hand(&[Rank::Six, Rank::Five]),
            &up(Rank::Ten),
            &all_legal(),
            &Ruleset::default(),
        );
        assert_eq!(action, Action::Double);
    }

    #[test]
    fn test_eleven_hits_when_double_unavailable() {
        let action = advise(
            &hand(&[Rank::Six, Rank::Five]),
            &up(Rank::Ten),
            &hit_stand(),
            &Ruleset::default(),
        );
        assert_eq!(action, Action::Hit);
    }

    #[test]
    fn test_soft_eighteen() {
        let rules = Ruleset::default();
        let soft_18 = hand(&[Rank::Ace, Rank::Seven]);
        assert_eq!(advise(&soft_18, &up(Rank::Seven), &hit_stand(), &rules), Action::Stand);
        assert_eq!(advise(&soft_18, &up(Rank::Nine), &hit_stand(), &rules), Action::Hit);
        assert_eq!(advise(&soft_18, &up(Rank::Four), &all_legal(), &rules), Action::Double);
    }

    #[test]
    fn test_stiff_hands() {
        let rules = Ruleset::default();
        assert_eq!(
            advise(&hand(&[Rank::Ten, Rank::Two]), &up(Rank::Three), &hit_stand(), &rules),
            Action::Hit
        );
        assert_eq!(
            advise(&hand(&[Rank::Ten, Rank::Two]), &up(Rank::Five), &hit_stand(), &rules),
            Action::Stand
        );
        assert_eq!(
            advise(&hand(&[Rank::Ten, Rank::Three]), &up(Rank::Two), &hit_stand(), &rules),
            Action::Stand
        );
    }

    #[test]
    fn test_stands_when_hit_not_offered() {
        let only_stand = LegalActions {
            stand: true,
            ..LegalActions::default()
        };
        let action = advise(
            &hand(&[Rank::Five, Rank::Four]),
            &up(Rank::Ten),
            &only_stand,
            &Ruleset::default(),
        );
        assert_eq!(action, Action::Stand);
    }
}
