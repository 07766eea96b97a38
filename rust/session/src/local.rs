//! Single-timeline play: one human against a bot, or two bots.
//!
//! Moves are applied strictly one after another. A bot seat is asked to
//! move only after the previous transition has returned, and only after
//! its thinking delay has elapsed.

use bura_ai::{create_bot, decide, BotStrategy, Difficulty, PassHistory};
use bura_engine::engine::{apply, init_round, next_round, Action};
use bura_engine::logger::RoundRecord;
use bura_engine::state::{GameState, RoundConfig, Seat, DEFAULT_MATCH_TARGET};
use serde::{Deserialize, Serialize};

use crate::errors::SessionError;

/// Settings that stay fixed for a whole match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub match_target: u32,
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_target: DEFAULT_MATCH_TARGET,
            seed: 0,
        }
    }
}

impl MatchConfig {
    /// Shuffle seed for round `round_no`; round 1 uses the match seed itself.
    pub fn round_seed(&self, round_no: u32) -> u64 {
        self.seed
            .wrapping_add(u64::from(round_no.saturating_sub(1)).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

/// Who decides for a seat.
pub enum Controller {
    Human,
    Bot(Box<dyn BotStrategy>),
}

impl Controller {
    pub fn bot(difficulty: Difficulty, seed: u64) -> Self {
        Controller::Bot(create_bot(difficulty, seed))
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, Controller::Bot(_))
    }

    pub fn label(&self) -> &str {
        match self {
            Controller::Human => "human",
            Controller::Bot(bot) => bot.name(),
        }
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One match played on a single timeline.
#[derive(Debug)]
pub struct LocalSession {
    config: MatchConfig,
    controllers: [Controller; 2],
    state: GameState,
    /// `histories[i]` holds the concessions seat `i` has seen its opponent make.
    histories: [PassHistory; 2],
    pacing: bool,
    record: RoundRecord,
    finished: Vec<RoundRecord>,
}

impl LocalSession {
    pub fn new(config: MatchConfig, controllers: [Controller; 2]) -> Result<Self, SessionError> {
        let state = init_round(&RoundConfig::new_match(
            config.round_seed(1),
            config.match_target,
        ))?;
        tracing::info!(
            seed = config.seed,
            target = config.match_target,
            first = controllers[0].label(),
            second = controllers[1].label(),
            "match started"
        );
        let record = RoundRecord::open(round_id(&state), &state);
        let session = Self {
            config,
            controllers,
            state,
            histories: [PassHistory::default(), PassHistory::default()],
            pacing: true,
            record,
            finished: Vec::new(),
        };
        session.log_round_start();
        Ok(session)
    }

    /// A human in `human` against a bot of `difficulty`.
    pub fn vs_bot(
        config: MatchConfig,
        human: Seat,
        difficulty: Difficulty,
    ) -> Result<Self, SessionError> {
        let bot = Controller::bot(difficulty, config.seed ^ 0xB07);
        let controllers = match human {
            Seat::First => [Controller::Human, bot],
            Seat::Second => [bot, Controller::Human],
        };
        Self::new(config, controllers)
    }

    /// Two bots; used for simulations.
    pub fn bots_only(config: MatchConfig, tiers: [Difficulty; 2]) -> Result<Self, SessionError> {
        Self::new(
            config,
            [
                Controller::bot(tiers[0], config.seed ^ 0xB07),
                Controller::bot(tiers[1], config.seed ^ 0xB08),
            ],
        )
    }

    /// Turns bot thinking delays on or off.
    pub fn with_pacing(mut self, pacing: bool) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> MatchConfig {
        self.config
    }

    pub fn controller(&self, seat: Seat) -> &Controller {
        &self.controllers[seat.index()]
    }

    pub fn history(&self, seat: Seat) -> &PassHistory {
        &self.histories[seat.index()]
    }

    /// The record of the round in progress.
    pub fn record(&self) -> &RoundRecord {
        &self.record
    }

    /// Records of every round finished so far, including the current one if
    /// it is over.
    pub fn records(&self) -> Vec<RoundRecord> {
        let mut all = self.finished.clone();
        if self.state.is_finished() {
            all.push(self.record.clone());
        }
        all
    }

    /// The seat the table waits on, if it is a bot.
    pub fn bot_to_move(&self) -> Option<Seat> {
        self.state
            .expected_actor()
            .filter(|s| self.controllers[s.index()].is_bot())
    }

    /// The seat the table waits on, if it is a human.
    pub fn human_to_move(&self) -> Option<Seat> {
        self.state
            .expected_actor()
            .filter(|s| !self.controllers[s.index()].is_bot())
    }

    /// Applies a human's move.
    ///
    /// Fails with [`SessionError::NotYourSeat`] when it is a bot's turn or the
    /// round is over; an illegal move leaves the session untouched.
    pub fn submit(&mut self, action: Action) -> Result<&GameState, SessionError> {
        let seat = self
            .human_to_move()
            .ok_or_else(|| SessionError::NotYourSeat(self.state.turn()))?;
        self.commit(seat, action)?;
        Ok(&self.state)
    }

    /// Lets the bot on turn move once, after its thinking delay.
    ///
    /// Returns the applied action, or `None` when no bot is on turn.
    pub async fn advance_bot(&mut self) -> Result<Option<(Seat, Action)>, SessionError> {
        let Some(seat) = self.bot_to_move() else {
            return Ok(None);
        };
        let Controller::Bot(bot) = &self.controllers[seat.index()] else {
            return Ok(None);
        };
        if self.pacing {
            tokio::time::sleep(bot.thinking_delay()).await;
        }
        let Some(action) = decide(bot.as_ref(), &self.state, seat, &self.histories[seat.index()])
        else {
            return Ok(None);
        };
        tracing::debug!(
            bot = bot.name(),
            seat = %seat,
            action = ?action,
            "bot decided"
        );
        self.commit(seat, action.clone())?;
        Ok(Some((seat, action)))
    }

    /// Runs bot moves until a human is on turn or the round ends.
    pub async fn run_bots(&mut self) -> Result<Vec<(Seat, Action)>, SessionError> {
        let mut moves = Vec::new();
        while let Some(m) = self.advance_bot().await? {
            moves.push(m);
        }
        Ok(moves)
    }

    pub fn match_winner(&self) -> Option<Seat> {
        self.state.match_winner()
    }

    /// Deals the next round of the match.
    pub fn next_round(&mut self) -> Result<&GameState, SessionError> {
        let seed = self.config.round_seed(self.state.round_no() + 1);
        let next = next_round(&self.state, seed)?;
        self.finished.push(self.record.clone());
        self.state = next;
        self.histories = [PassHistory::default(), PassHistory::default()];
        self.record = RoundRecord::open(round_id(&self.state), &self.state);
        self.log_round_start();
        Ok(&self.state)
    }

    /// Plays the rest of the match with bots only. Fails if a human seat
    /// is asked to move.
    pub async fn play_out(&mut self) -> Result<Option<Seat>, SessionError> {
        loop {
            self.run_bots().await?;
            if !self.state.is_finished() {
                return Err(SessionError::NotYourSeat(self.state.turn()));
            }
            if self.match_winner().is_some() {
                return Ok(self.match_winner());
            }
            self.next_round()?;
        }
    }

    fn commit(&mut self, seat: Seat, action: Action) -> Result<(), SessionError> {
        let next = apply(&self.state, seat, &action)?;
        if let (Some(trick), Action::Defend(defense)) = (self.state.table(), &action) {
            self.histories[seat.other().index()].observe(&trick.cards, defense);
        }
        tracing::debug!(
            seat = %seat,
            version = next.version(),
            phase = next.phase().name(),
            "move applied"
        );
        self.record.push(seat, action, &next);
        self.state = next;
        if let Some(result) = self.state.result() {
            tracing::info!(
                round = self.state.round_no(),
                winner = ?result.winner(),
                points = result.match_points(),
                score_first = self.state.match_score(Seat::First),
                score_second = self.state.match_score(Seat::Second),
                "round finished"
            );
            if let Some(winner) = self.state.match_winner() {
                tracing::info!(winner = %winner, "match finished");
            }
        }
        Ok(())
    }

    fn log_round_start(&self) {
        tracing::info!(
            round = self.state.round_no(),
            trump = %self.state.trump_card(),
            first_attacker = %self.state.first_attacker(),
            "round started"
        );
        if let Some(result) = self.state.result() {
            tracing::info!(
                round = self.state.round_no(),
                winner = ?result.winner(),
                "BURA dealt"
            );
        }
    }
}

fn round_id(state: &GameState) -> String {
    format!("{:016x}-{:03}", state.seed(), state.round_no())
}
