mod session;

use blackjack::strategy::advise;
use blackjack::{Action, Persona, Phase, RoundEngine, Ruleset, TableLimits};
use clap::Parser;
use serde::Serialize;
use session::{clamp_bet, SessionStats};
use std::path::PathBuf;

type BoxErr = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(
    name = "blackjack-table",
    about = "Plays a basic-strategy blackjack session against a house persona"
)]
struct Cli {
    /// House persona: classic, strip, downtown, atlantic-city, european, single-deck
    #[arg(long, env = "TABLE_PERSONA", default_value = "classic")]
    persona: Persona,

    /// JSON ruleset file; overrides the persona
    #[arg(long, env = "TABLE_RULES_FILE")]
    rules_file: Option<PathBuf>,

    /// Rounds to play before leaving the table
    #[arg(long, env = "TABLE_ROUNDS", default_value = "100")]
    rounds: u32,

    /// Starting bankroll in chips
    #[arg(long, env = "TABLE_BANKROLL", default_value = "1000")]
    bankroll: u64,

    /// Bet per round, clamped to the table limits and bankroll
    #[arg(long, env = "TABLE_BET", default_value = "10")]
    bet: u64,

    /// Table minimum
    #[arg(long, env = "TABLE_MIN_BET", default_value = "10")]
    min_bet: u64,

    /// Table maximum
    #[arg(long, env = "TABLE_MAX_BET", default_value = "500")]
    max_bet: u64,

    /// Shoe seed for a reproducible session
    #[arg(long, env = "TABLE_SEED")]
    seed: Option<u64>,

    /// Print the session report as JSON
    #[arg(long, env = "TABLE_JSON", default_value_t = false, action = clap::ArgAction::Set)]
    json: bool,
}

#[derive(Serialize)]
struct SessionReport<'a> {
    table: &'a str,
    rules: &'a Ruleset,
    limits: &'a TableLimits,
    stats: &'a SessionStats,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        log::error!("Session failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), BoxErr> {
    let rules = load_rules(cli)?;
    let limits = TableLimits::new(cli.min_bet, cli.max_bet)?;
    let table = match cli.rules_file {
        Some(_) => "custom",
        None => cli.persona.name(),
    };

    let mut engine = match cli.seed {
        Some(seed) => RoundEngine::with_seed(rules, limits, seed)?,
        None => RoundEngine::new(rules, limits)?,
    };
    log::info!(
        "Seated at {table}: {} decks, blackjack pays {}, dealer {} soft 17",
        rules.deck_count,
        rules.blackjack_payout,
        if rules.dealer_stands_on_soft_17 { "stands on" } else { "hits" }
    );

    let stats = play_session(&mut engine, cli)?;

    if cli.json {
        let report = SessionReport {
            table,
            rules: &rules,
            limits: &limits,
            stats: &stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Table:          {table}");
        println!("{stats}");
    }
    Ok(())
}

fn load_rules(cli: &Cli) -> Result<Ruleset, BoxErr> {
    let rules = match &cli.rules_file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            let rules: Ruleset = serde_json::from_str(&raw)?;
            log::info!("Loaded rules from {}", path.display());
            rules
        }
        None => cli.persona.ruleset(),
    };
    Ok(rules.validated()?)
}

fn play_session(engine: &mut RoundEngine, cli: &Cli) -> Result<SessionStats, BoxErr> {
    let mut stats = SessionStats::new(cli.bankroll);

    for round in 1..=cli.rounds {
        let Some(bet) = clamp_bet(cli.bet, stats.bankroll, engine.limits()) else {
            log::info!(
                "Bankroll of {} cannot cover the table minimum, leaving after {} rounds",
                stats.bankroll,
                stats.rounds
            );
            break;
        };

        engine.place_bet(bet, stats.bankroll)?;
        while engine.phase() == Phase::PlayerTurn {
            let action = choose(engine)?;
            engine.act(action)?;
        }

        let result = engine.result().ok_or("round finished without a result")?;
        log::debug!(
            "Round {round}: bet {bet}, dealer {}, net {:+}",
            result.dealer.value,
            result.net
        );
        stats.record(result);
    }

    Ok(stats)
}

fn choose(engine: &RoundEngine) -> Result<Action, BoxErr> {
    let index = engine.active_hand_index().ok_or("no hand to act on")?;
    let hand = &engine.player_hands()[index].hand;
    let up = engine.dealer_up_card().ok_or("dealer has no up card")?;
    Ok(advise(hand, &up, &engine.legal_actions(), engine.ruleset()))
}
