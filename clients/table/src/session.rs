use blackjack::{Outcome, RoundResult, TableLimits};
use serde::Serialize;
use std::fmt;

/// Bet for the next round: the requested amount held inside the table
/// limits and the bankroll. `None` once the bankroll cannot cover the
/// table minimum.
pub fn clamp_bet(requested: u64, bankroll: u64, limits: &TableLimits) -> Option<u64> {
    if bankroll < limits.min_bet {
        return None;
    }
    Some(requested.clamp(limits.min_bet, limits.max_bet).min(bankroll))
}

/// Running totals for a session at one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub rounds: u32,
    pub hands: u32,
    pub wins: u32,
    pub blackjacks: u32,
    pub pushes: u32,
    pub losses: u32,
    pub busts: u32,
    pub surrenders: u32,
    pub total_wagered: u64,
    pub net: i64,
    pub starting_bankroll: u64,
    pub bankroll: u64,
    pub peak_bankroll: u64,
    pub low_bankroll: u64,
}

impl SessionStats {
    pub fn new(bankroll: u64) -> Self {
        Self {
            starting_bankroll: bankroll,
            bankroll,
            peak_bankroll: bankroll,
            low_bankroll: bankroll,
            ..Self::default()
        }
    }

    pub fn record(&mut self, result: &RoundResult) {
        self.rounds += 1;
        for hand in &result.hands {
            self.hands += 1;
            let counter = match hand.outcome {
                Outcome::Win => &mut self.wins,
                Outcome::Blackjack => &mut self.blackjacks,
                Outcome::Push => &mut self.pushes,
                Outcome::Loss => &mut self.losses,
                Outcome::Bust => &mut self.busts,
                Outcome::Surrender => &mut self.surrenders,
            };
            *counter += 1;
        }
        self.total_wagered += result.total_wagered();
        self.net += result.net;
        self.bankroll = self.bankroll.saturating_add_signed(result.net);
        self.peak_bankroll = self.peak_bankroll.max(self.bankroll);
        self.low_bankroll = self.low_bankroll.min(self.bankroll);
    }

    /// Net result per chip wagered. Negative means the house is ahead.
    pub fn edge(&self) -> f64 {
        if self.total_wagered == 0 {
            return 0.0;
        }
        self.net as f64 / self.total_wagered as f64
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rounds played:  {} ({} hands)", self.rounds, self.hands)?;
        writeln!(
            f,
            "Wins:           {} (+{} blackjacks)",
            self.wins, self.blackjacks
        )?;
        writeln!(f, "Pushes:         {}", self.pushes)?;
        writeln!(
            f,
            "Losses:         {} ({} busts, {} surrenders)",
            self.losses + self.busts + self.surrenders,
            self.busts,
            self.surrenders
        )?;
        writeln!(f, "Total wagered:  {}", self.total_wagered)?;
        writeln!(
            f,
            "Net:            {:+} ({:+.2}% of action)",
            self.net,
            self.edge() * 100.0
        )?;
        write!(
            f,
            "Bankroll:       {} -> {} (peak {}, low {})",
            self.starting_bankroll, self.bankroll, self.peak_bankroll, self.low_bankroll
        )
    }
}
