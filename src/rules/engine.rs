//! The match engine: rules authority for one match.
//!
//! Every operation either applies fully or is rejected with a
//! [`MoveError`] and leaves the match exactly as it was. Applied actions:
//!
//! 1. push an undo snapshot of the prior state
//! 2. mutate the grid and append to the action log
//! 3. run win detection (mark placement and expansion only)
//! 4. spend one budget unit and, once the budget is empty, rotate the turn
//!
//! Turn rotation happens synchronously. `MatchConfig::turn_advance_delay`
//! is only a hint for presenters that want to pause before showing it.

use tracing::{debug, info, instrument, warn};

use crate::core::{
    Action, ActionBudget, ActionConfig, ActionKind, ActionRecord, Axis, BlockerKind, Cell,
    ConfigId, Coord, GameMode, Grid, InvalidReason, Mark, MatchConfig, MatchState, MatchStatus,
    MoveError, PlayerMap, TurnState, WinLine,
};
use crate::core::error::Result;
use crate::history::UndoHistory;
use crate::opponent::{OpponentPlan, OpponentPolicy};

use super::win::check_win;

/// What a successful operation led to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Same player, budget left.
    Continue,
    /// The turn rotated; `next` is now to move.
    TurnEnded { next: Mark },
    /// The match is over.
    Won(WinLine),
}

/// Rules authority for one match.
///
/// ## Example
///
/// ```
/// use expanse_ttt::core::{Coord, GameMode, Mark, MatchConfig};
/// use expanse_ttt::rules::{MatchEngine, Outcome};
///
/// let mut engine = MatchEngine::new(MatchConfig::for_mode(GameMode::Hotseat(2)));
///
/// let outcome = engine.place_mark(Coord::new(0, 0)).unwrap();
/// assert_eq!(outcome, Outcome::TurnEnded { next: Mark::O });
/// assert_eq!(engine.active_player(), Mark::O);
/// ```
#[derive(Clone, Debug)]
pub struct MatchEngine {
    config: MatchConfig,
    state: MatchState,
    undo: UndoHistory,
    /// Set while an opponent plan runs under a single snapshot.
    batching: bool,
}

impl MatchEngine {
    /// Start a fresh match.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        let state = MatchState::new(config.mode.initial_grid_size());
        let undo = UndoHistory::new(config.undo_capacity);
        info!(mode = %config.mode, size = state.grid.rows(), "match started");
        Self {
            config,
            state,
            undo,
            batching: false,
        }
    }

    /// Resume from a previously saved state. The undo history starts empty.
    #[must_use]
    pub fn from_state(config: MatchConfig, state: MatchState) -> Self {
        let undo = UndoHistory::new(config.undo_capacity);
        Self {
            config,
            state,
            undo,
            batching: false,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.config.mode.player_count()
    }

    #[must_use]
    pub fn active_player(&self) -> Mark {
        self.state.turn.active
    }

    #[must_use]
    pub fn turn(&self) -> &TurnState {
        &self.state.turn
    }

    #[must_use]
    pub fn budget(&self) -> &ActionBudget {
        &self.state.turn.budget
    }

    #[must_use]
    pub fn status(&self) -> MatchStatus {
        self.state.status
    }

    #[must_use]
    pub fn winner(&self) -> Option<Mark> {
        self.state.status.winner()
    }

    /// The action log, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ActionRecord> {
        self.state.history.iter()
    }

    #[must_use]
    pub fn session_wins(&self) -> &PlayerMap<u32> {
        &self.state.session_wins
    }

    /// Snapshots available to undo.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// True when the simulated opponent should move next.
    #[must_use]
    pub fn awaiting_opponent(&self) -> bool {
        !self.state.status.is_over() && self.config.mode.opponent_seat() == Some(self.active_player())
    }

    // === Turn setup ===

    /// Pick this turn's action config. Not allowed once an action was committed.
    pub fn select_config(&mut self, id: ConfigId) -> Result<()> {
        self.ensure_player_turn().map_err(|e| self.rejected(e))?;
        if self.state.turn.has_acted {
            return Err(self.rejected(MoveError::invalid(InvalidReason::AlreadyCommitted)));
        }
        let config = ActionConfig::get(id)
            .ok_or_else(|| self.rejected(MoveError::invalid(InvalidReason::UnknownConfig)))?;

        self.state.turn.apply_config(config);
        debug!(player = %self.active_player(), config = config.key, "config selected");
        Ok(())
    }

    /// Switch tools within the current budget.
    pub fn select_tool(&mut self, kind: ActionKind) -> Result<()> {
        self.ensure_player_turn().map_err(|e| self.rejected(e))?;
        if self.state.turn.budget.remaining(kind) == 0 {
            return Err(self.rejected(MoveError::BudgetExhausted(kind)));
        }
        self.state.turn.tool = Some(kind);
        Ok(())
    }

    // === Actions ===

    /// Place the active player's mark.
    pub fn place_mark(&mut self, at: Coord) -> Result<Outcome> {
        self.check_place_mark(at).map_err(|e| self.rejected(e))?;
        let mark = self.active_player();
        Ok(self.commit(Action::PlaceMark(at), |state, _| {
            if let Some(cell) = state.grid.get_mut(at) {
                cell.set_mark(mark);
            }
            None
        }))
    }

    /// Place a permanent or destructible blocker.
    pub fn place_blocker(&mut self, at: Coord, kind: BlockerKind) -> Result<Outcome> {
        self.check_place_blocker(at, kind).map_err(|e| self.rejected(e))?;
        Ok(self.commit(Action::PlaceBlocker { at, kind }, |state, config| {
            if let Some(cell) = state.grid.get_mut(at) {
                cell.set_blocker(kind, config.max_durability);
            }
            None
        }))
    }

    /// Protect an empty cell against blockers.
    pub fn place_protection(&mut self, at: Coord) -> Result<Outcome> {
        self.check_place_protection(at).map_err(|e| self.rejected(e))?;
        Ok(self.commit(Action::PlaceProtection(at), |state, _| {
            if let Some(cell) = state.grid.get_mut(at) {
                cell.protected = true;
            }
            None
        }))
    }

    /// Deal one point of damage to a destructible blocker.
    pub fn damage(&mut self, at: Coord) -> Result<Outcome> {
        self.check_damage(at).map_err(|e| self.rejected(e))?;
        Ok(self.commit(Action::Damage(at), |state, _| {
            let destroyed = state.grid.get_mut(at).is_some_and(Cell::hit);
            Some(if destroyed { "crushed" } else { "damaged" }.to_string())
        }))
    }

    /// Insert an empty row or column before `index` (`index` may equal the
    /// current line count).
    pub fn expand(&mut self, index: usize, axis: Axis) -> Result<Outcome> {
        self.check_expand(index, axis).map_err(|e| self.rejected(e))?;
        Ok(self.commit(Action::Expand { index, axis }, |state, _| {
            state.grid.insert_line(index, axis);
            None
        }))
    }

    /// Pass the rest of the turn.
    pub fn end_turn(&mut self) -> Result<Outcome> {
        self.ensure_player_turn().map_err(|e| self.rejected(e))?;
        self.snapshot();
        if !self.state.turn.has_acted {
            self.log(Action::Pass, None);
        }
        let next = self.advance_turn();
        Ok(Outcome::TurnEnded { next })
    }

    /// Apply a concrete action, switching to its tool first if needed.
    pub fn apply(&mut self, action: Action) -> Result<Outcome> {
        if let Some(kind) = action.kind() {
            if self.state.turn.tool != Some(kind) {
                self.select_tool(kind)?;
            }
        }
        match action {
            Action::PlaceMark(at) => self.place_mark(at),
            Action::PlaceBlocker { at, kind } => self.place_blocker(at, kind),
            Action::PlaceProtection(at) => self.place_protection(at),
            Action::Damage(at) => self.damage(at),
            Action::Expand { index, axis } => self.expand(index, axis),
            Action::Pass => self.end_turn(),
        }
    }

    // === Undo / reset ===

    /// Restore the most recent snapshot.
    ///
    /// At the start of a turn (nothing committed yet) two snapshots are
    /// popped so the previous player's turn is rolled back as well.
    /// Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let steps = if !self.state.turn.has_acted && self.undo.len() >= 2 {
            2
        } else {
            1
        };
        match self.undo.pop_many(steps) {
            Some(state) => {
                self.state = state;
                debug!(steps, player = %self.active_player(), "undo");
                true
            }
            None => false,
        }
    }

    /// Start a fresh match in the same mode. The session tally is kept.
    pub fn reset(&mut self) {
        let wins = self.state.session_wins.clone();
        self.state = MatchState::with_session_wins(self.config.mode.initial_grid_size(), wins);
        self.undo.clear();
        info!(mode = %self.config.mode, "match reset");
    }

    /// Switch mode and start a fresh match.
    pub fn change_mode(&mut self, mode: GameMode) {
        self.config.mode = mode;
        self.reset();
    }

    /// Advance to the next mode in the cycle. Returns the new mode.
    pub fn cycle_mode(&mut self) -> GameMode {
        let next = self.config.mode.next();
        self.change_mode(next);
        next
    }

    // === Simulated opponent ===

    /// Ask `policy` for a plan for the active player and apply it.
    ///
    /// Only valid while [`MatchEngine::awaiting_opponent`] is true.
    #[instrument(skip_all, fields(player = %self.active_player(), turn = self.state.turn.number))]
    pub fn play_opponent<P: OpponentPolicy + ?Sized>(&mut self, policy: &mut P) -> Result<Outcome> {
        self.ensure_in_progress()?;
        if !self.awaiting_opponent() {
            return Err(self.rejected(MoveError::invalid(InvalidReason::NotOpponentsTurn)));
        }
        let plan = policy.plan(&self.state.grid, self.active_player(), crate::core::CATALOGUE);
        self.apply_opponent_plan(&plan)
    }

    /// Apply a plan through the normal validation path.
    ///
    /// Rejected with `NotOpponentsTurn` unless the active seat belongs to the
    /// simulated opponent. The whole plan is one undo step. Rejected actions are skipped. If the
    /// plan leaves the turn open the rest of it is passed.
    #[instrument(skip(self), fields(player = %self.active_player()))]
    pub fn apply_opponent_plan(&mut self, plan: &OpponentPlan) -> Result<Outcome> {
        self.ensure_in_progress()?;
        let actor = self.active_player();
        if self.config.mode.opponent_seat() != Some(actor) {
            return Err(self.rejected(MoveError::invalid(InvalidReason::NotOpponentsTurn)));
        }
        let turn_number = self.state.turn.number;

        self.snapshot();
        self.batching = true;

        if let Err(err) = self.select_config(plan.config) {
            warn!(player = %actor, %err, "opponent config refused");
        }

        let mut outcome = Outcome::Continue;
        for action in &plan.actions {
            if self.state.status.is_over() || self.state.turn.number != turn_number {
                break;
            }
            match self.apply(*action) {
                Ok(result) => outcome = result,
                Err(err) => warn!(player = %actor, %action, %err, "opponent action skipped"),
            }
        }

        if !self.state.status.is_over() && self.state.turn.number == turn_number {
            if !self.state.turn.has_acted {
                self.log(Action::Pass, None);
            }
            outcome = Outcome::TurnEnded {
                next: self.advance_turn(),
            };
        }

        self.batching = false;
        Ok(outcome)
    }

    // === Validation ===

    fn ensure_in_progress(&self) -> Result<()> {
        if self.state.status.is_over() {
            return Err(MoveError::invalid(InvalidReason::MatchOver));
        }
        Ok(())
    }

    /// Outside an opponent plan, the opponent's seat refuses direct moves.
    fn ensure_player_turn(&self) -> Result<()> {
        self.ensure_in_progress()?;
        if !self.batching && self.awaiting_opponent() {
            return Err(MoveError::invalid(InvalidReason::OpponentsTurn));
        }
        Ok(())
    }

    fn ensure_tool(&self, kind: ActionKind) -> Result<()> {
        self.ensure_player_turn()?;
        let turn = &self.state.turn;
        if turn.tool != Some(kind) {
            return Err(MoveError::invalid(InvalidReason::WrongTool {
                selected: turn.tool,
                attempted: kind,
            }));
        }
        if turn.budget.remaining(kind) == 0 {
            return Err(MoveError::BudgetExhausted(kind));
        }
        Ok(())
    }

    fn cell(&self, at: Coord) -> Result<&Cell> {
        self.state
            .grid
            .get(at)
            .ok_or(MoveError::at(at, InvalidReason::OutOfBounds))
    }

    /// The centre of a fresh 3×3 two-player board is off limits for X's opener.
    fn is_forbidden_opening(&self, at: Coord) -> bool {
        let grid = &self.state.grid;
        self.player_count() == 2
            && self.state.turn.number == 1
            && self.state.turn.active == Mark::X
            && grid.rows() == 3
            && grid.cols() == 3
            && grid.center() == Some(at)
    }

    fn check_place_mark(&self, at: Coord) -> Result<()> {
        self.ensure_tool(ActionKind::PlaceMark)?;
        let cell = self.cell(at)?;
        if self.is_forbidden_opening(at) {
            return Err(MoveError::at(at, InvalidReason::ForbiddenOpening));
        }
        if !cell.is_empty() {
            return Err(MoveError::at(at, InvalidReason::Occupied));
        }
        Ok(())
    }

    fn check_place_blocker(&self, at: Coord, kind: BlockerKind) -> Result<()> {
        self.ensure_tool(ActionKind::for_blocker(kind))?;
        let cell = self.cell(at)?;
        if cell.protected {
            return Err(MoveError::at(at, InvalidReason::Protected));
        }
        if !cell.is_empty() {
            return Err(MoveError::at(at, InvalidReason::Occupied));
        }
        Ok(())
    }

    fn check_place_protection(&self, at: Coord) -> Result<()> {
        self.ensure_tool(ActionKind::PlaceProtection)?;
        let cell = self.cell(at)?;
        if !cell.is_empty() {
            return Err(MoveError::at(at, InvalidReason::Occupied));
        }
        Ok(())
    }

    fn check_damage(&self, at: Coord) -> Result<()> {
        self.ensure_tool(ActionKind::Damage)?;
        if !self.cell(at)?.is_destructible() {
            return Err(MoveError::at(at, InvalidReason::NotDestructible));
        }
        Ok(())
    }

    fn check_expand(&self, index: usize, axis: Axis) -> Result<()> {
        self.ensure_tool(ActionKind::Expand)?;
        if index > self.state.grid.line_count(axis) {
            return Err(MoveError::invalid(InvalidReason::OutOfBounds));
        }
        Ok(())
    }

    fn rejected(&self, err: MoveError) -> MoveError {
        debug!(player = %self.active_player(), %err, "action rejected");
        err
    }

    // === Mutation ===

    fn snapshot(&mut self) {
        if !self.batching {
            self.undo.push(self.state.clone());
        }
    }

    fn log(&mut self, action: Action, note: Option<String>) {
        let seq = self.state.next_sequence();
        let record = ActionRecord::new(self.active_player(), action, self.state.turn.number, seq);
        self.state.record(match note {
            Some(note) => record.with_note(note),
            None => record,
        });
    }

    /// Apply a validated action. `mutate` may return a note for the log.
    fn commit(
        &mut self,
        action: Action,
        mutate: impl FnOnce(&mut MatchState, &MatchConfig) -> Option<String>,
    ) -> Outcome {
        self.snapshot();

        let note = mutate(&mut self.state, &self.config);
        self.log(action, note);

        let Some(kind) = action.kind() else {
            return Outcome::Continue;
        };

        if matches!(kind, ActionKind::PlaceMark | ActionKind::Expand) {
            if let Some(line) = check_win(&self.state.grid) {
                return self.finish(line);
            }
        }

        let turn = &mut self.state.turn;
        turn.budget.consume(kind);
        turn.has_acted = true;

        if turn.budget.is_exhausted() {
            let next = self.advance_turn();
            return Outcome::TurnEnded { next };
        }
        if turn.budget.remaining(kind) == 0 {
            turn.tool = turn.budget.first_available();
        }
        Outcome::Continue
    }

    fn finish(&mut self, line: WinLine) -> Outcome {
        self.state.status = MatchStatus::Won(line);
        self.state.session_wins[line.winner] += 1;
        self.state.turn.has_acted = true;
        self.state.turn.clear_budget();
        info!(winner = %line.winner, cells = ?line.cells, "match won");
        Outcome::Won(line)
    }

    /// Rotate to the next seat with a default budget. Returns the new mark.
    fn advance_turn(&mut self) -> Mark {
        let next = self.active_player().next_in(self.player_count());
        self.state.turn = TurnState::start(next, self.state.turn.number + 1);
        debug!(player = %next, turn = self.state.turn.number, "turn advanced");
        next
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}
