use super::food;
use super::grid::step;
use super::input::{is_allowed, is_reversal};
use super::spawn::find_safe_cell;
use super::types::{Cell, Direction, GameSettings, GameStateSnapshot, Player, PlayersById};
use crate::shared::names::generate_player_name;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;


/// Simulation state of one room.
///
/// Players are kept in join order; that order drives every per-tick pass and
/// the order of the serialized player map.
#[derive(Debug)]
pub struct RoomState {
    settings: GameSettings,
    players: Vec<Player>,
    food: Vec<Cell>,
    rng: StdRng,
    ticks: u64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub fed: Vec<String>,
    pub died: Vec<String>,
}

impl RoomState {
    pub fn new(settings: GameSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_rng(settings: GameSettings, rng: StdRng) -> Self {
        Self {
            settings,
            players: Vec::new(),
            food: Vec::new(),
            rng,
            ticks: 0,
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snapshot(&self) -> GameStateSnapshot<'_> {
        GameStateSnapshot {
            players: PlayersById(&self.players),
            food: &self.food,
        }
    }

    fn index_of(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|player| player.id == player_id)
    }

    fn rebalance_food(&mut self) {
        food::rebalance(
            &mut self.food,
            &self.players,
            self.settings.grid_size,
            &mut self.rng,
        );
    }

    /// Adds a waiting (not alive) player and returns its generated name.
    /// Joining twice with the same id is a no-op.
    pub fn join(&mut self, player_id: &str) -> Option<String> {
        if self.index_of(player_id).is_some() {
            return None;
        }
        let name = generate_player_name(&mut self.rng);
        self.players
            .push(Player::new(player_id.to_string(), name.clone()));
        self.rebalance_food();
        Some(name)
    }

    pub fn leave(&mut self, player_id: &str) -> bool {
        let Some(index) = self.index_of(player_id) else { return false };
        self.players.remove(index);
        self.rebalance_food();
        true
    }

    pub fn start(&mut self, player_id: &str) -> bool {
        let Some(index) = self.index_of(player_id) else { return false };
        if self.players[index].is_alive {
            return false;
        }
        let cell = find_safe_cell(
            &self.players,
            &self.food,
            self.settings.grid_size,
            &mut self.rng,
        );
        let player = &mut self.players[index];
        player.body = VecDeque::from([cell]);
        player.direction = Direction::IDLE;
        player.score = 0;
        player.is_paused = false;
        player.is_alive = true;
        player.spawn_protection = self.settings.spawn_protection_ticks;
        tracing::debug!(player_id, x = cell.x, y = cell.y, "player started");
        true
    }

    pub fn set_direction(&mut self, player_id: &str, direction: Direction) -> bool {
        if !is_allowed(direction, self.settings.movement) {
            return false;
        }
        let Some(index) = self.index_of(player_id) else { return false };
        let player = &mut self.players[index];
        if !player.is_active() {
            return false;
        }
        if player.body.len() > 1 && is_reversal(player.direction, direction) {
            return false;
        }
        player.direction = direction;
        true
    }

    pub fn toggle_pause(&mut self, player_id: &str) -> bool {
        let Some(index) = self.index_of(player_id) else { return false };
        let player = &mut self.players[index];
        if !player.is_alive {
            return false;
        }
        player.is_paused = !player.is_paused;
        tracing::debug!(player_id, paused = player.is_paused, "pause toggled");
        true
    }

    /// Advances the room one step: movement and feeding in join order, then
    /// collision resolution against the post-movement bodies.
    pub fn tick(&mut self) -> TickOutcome {
        self.ticks += 1;
        let mut outcome = TickOutcome::default();
        let mut moved = Vec::with_capacity(self.players.len());
        for index in 0..self.players.len() {
            if self.advance_player(index, &mut outcome) {
                moved.push(index);
            }
        }

        for index in self.collisions(&moved) {
            let player = &mut self.players[index];
            player.is_alive = false;
            tracing::debug!(player_id = %player.id, score = player.score, "player died");
            outcome.died.push(player.id.clone());
        }
        outcome
    }

    /// Returns true when the player's head moved this tick.
    fn advance_player(&mut self, index: usize, outcome: &mut TickOutcome) -> bool {
        let grid_size = self.settings.grid_size;
        let player = &mut self.players[index];
        if !player.is_active() {
            return false;
        }
        if player.spawn_protection > 0 {
            player.spawn_protection -= 1;
            return false;
        }
        if player.direction.is_idle() {
            return false;
        }
        let Some(head) = player.head() else { return false };

        let next = step(head, player.direction, grid_size);
        player.body.push_front(next);
        let Some(eaten) = self.food.iter().position(|cell| *cell == next) else {
            player.body.pop_back();
            return true;
        };
        player.score += 1;
        outcome.fed.push(player.id.clone());
        self.food.remove(eaten);
        self.rebalance_food();
        true
    }

    /// Indices of moved players whose head hit their own body or any cell of
    /// another player that is active at the start of the pass. Deaths are
    /// applied afterwards, so a head-on meeting kills both snakes regardless
    /// of join order.
    fn collisions(&self, moved: &[usize]) -> Vec<usize> {
        moved
            .iter()
            .copied()
            .filter(|&index| {
                let player = &self.players[index];
                let Some(head) = player.head() else { return false };
                let hit_self = player.body.iter().skip(1).any(|cell| *cell == head);
                hit_self
                    || self
                        .players
                        .iter()
                        .enumerate()
                        .filter(|(other, target)| *other != index && target.is_active())
                        .any(|(_, target)| target.occupies(head))
            })
            .collect()
    }
}
