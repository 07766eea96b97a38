//! Command-line grammar.

use bura_ai::Difficulty;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "bura",
    version,
    about = "Bura card game: play against bots, simulate matches, inspect round logs"
)]
pub struct BuraCli {
    /// Log session events to stderr (RUST_LOG overrides the filter)
    #[arg(long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a match against a bot, or watch two bots play
    Play {
        #[arg(long, value_enum, default_value_t = Vs::Human)]
        vs: Vs,
        /// Seat the human takes (1 attacks first in round one)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
        seat: u8,
        /// Bot tier: easy, medium or hard
        #[arg(long)]
        difficulty: Option<Difficulty>,
        /// Match points needed to win the match
        #[arg(long)]
        target: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        /// Bots move without their thinking delay
        #[arg(long)]
        no_pace: bool,
    },
    /// Simulate bot-vs-bot matches, optionally recording every round as JSONL
    Sim {
        #[arg(long, default_value_t = 10)]
        matches: u32,
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        target: Option<u32>,
        /// Tier of the bot in seat 1
        #[arg(long)]
        first: Option<Difficulty>,
        /// Tier of the bot in seat 2
        #[arg(long)]
        second: Option<Difficulty>,
    },
    /// Two bot seats play a match through a shared table with a turn clock
    Table {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        target: Option<u32>,
        #[arg(long)]
        first: Option<Difficulty>,
        #[arg(long)]
        second: Option<Difficulty>,
        /// Seconds a seat may take before its opponent claims the round
        #[arg(long)]
        turn_timeout: Option<u64>,
        /// Seat (1 or 2) that never moves
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
        stall: Option<u8>,
    },
    /// Deal one round and show both hands, the trump and the pile
    Deal {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Summarize recorded rounds (JSONL, optionally .zst)
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Vs {
    /// You play one seat against a bot
    Human,
    /// Two bots play each other
    Bot,
}

impl Vs {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vs::Human => "human",
            Vs::Bot => "bot",
        }
    }
}
