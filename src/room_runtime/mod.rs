mod registry;

pub use registry::{RoomRegistry, RoomStats};

use crate::game::room::RoomState;
use crate::game::types::{Direction, GameSettings};
use crate::protocol::{ClientMessage, InitPayload, ServerMessage};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;

/// Commands a room applies between two ticks before the tick goes first.
const COMMANDS_PER_TICK: usize = 256;

/// Outbound text frames for one connected session.
pub type Outbound = UnboundedSender<String>;

#[derive(Debug)]
pub enum RoomCommand {
    Join {
        session_id: String,
        outbound: Outbound,
    },
    Start {
        session_id: String,
    },
    Direction {
        session_id: String,
        direction: Direction,
    },
    TogglePause {
        session_id: String,
    },
    Leave {
        session_id: String,
    },
}

impl RoomCommand {
    pub fn from_client(session_id: &str, message: ClientMessage) -> Self {
        let session_id = session_id.to_string();
        match message {
            ClientMessage::StartGame => Self::Start { session_id },
            ClientMessage::DirectionChange(direction) => Self::Direction {
                session_id,
                direction,
            },
            ClientMessage::TogglePause => Self::TogglePause { session_id },
        }
    }
}

/// Cloneable address of a running room task.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: Arc<str>,
    commands: UnboundedSender<RoomCommand>,
    shutdown: Arc<Notify>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Queues a command; false once the room task has exited.
    pub fn send(&self, command: RoomCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub(crate) fn stop(&self) {
        self.shutdown.notify_one();
    }
}

pub fn spawn_room(room_id: String, settings: GameSettings) -> RoomHandle {
    spawn_room_with_state(room_id, RoomState::new(settings))
}

pub(crate) fn spawn_room_with_state(room_id: String, state: RoomState) -> RoomHandle {
    let room_id: Arc<str> = Arc::from(room_id);
    let (commands, inbox) = mpsc::unbounded_channel::<RoomCommand>();
    let shutdown = Arc::new(Notify::new());
    let actor = RoomActor {
        room_id: Arc::clone(&room_id),
        state,
        sessions: HashMap::new(),
    };
    tokio::spawn(run_room(actor, inbox, Arc::clone(&shutdown)));
    RoomHandle {
        room_id,
        commands,
        shutdown,
    }
}

async fn run_room(
    mut actor: RoomActor,
    mut inbox: UnboundedReceiver<RoomCommand>,
    shutdown: Arc<Notify>,
) {
    let mut interval = tokio::time::interval(actor.state.settings().tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::info!(room_id = %actor.room_id, "room started");

    // Commands win over the tick so anything received before a tick lands in it,
    // up to a per-tick budget so a flooding client cannot hold the tick back.
    let mut handled = 0usize;
    loop {
        tokio::select! {
            biased;
            _ = shutdown.notified() => break,
            command = inbox.recv(), if handled < COMMANDS_PER_TICK => {
                let Some(command) = command else { break };
                handled += 1;
                actor.apply(command);
            }
            _ = interval.tick() => {
                handled = 0;
                actor.tick();
            }
        }
    }

    tracing::info!(room_id = %actor.room_id, ticks = actor.state.ticks(), "room stopped");
}

struct RoomActor {
    room_id: Arc<str>,
    state: RoomState,
    sessions: HashMap<String, Outbound>,
}

impl RoomActor {
    fn apply(&mut self, command: RoomCommand) {
        match command {
            RoomCommand::Join {
                session_id,
                outbound,
            } => self.join(session_id, outbound),
            RoomCommand::Start { session_id } => {
                self.state.start(&session_id);
            }
            RoomCommand::Direction {
                session_id,
                direction,
            } => {
                self.state.set_direction(&session_id, direction);
            }
            RoomCommand::TogglePause { session_id } => {
                self.state.toggle_pause(&session_id);
            }
            RoomCommand::Leave { session_id } => {
                self.sessions.remove(&session_id);
                if self.state.leave(&session_id) {
                    tracing::info!(
                        room_id = %self.room_id,
                        session_id,
                        players = self.state.player_count(),
                        "player left room"
                    );
                }
            }
        }
    }

    fn join(&mut self, session_id: String, outbound: Outbound) {
        let Some(name) = self.state.join(&session_id) else {
            tracing::debug!(room_id = %self.room_id, session_id, "duplicate join ignored");
            return;
        };
        let init = ServerMessage::Init(InitPayload {
            id: session_id.clone(),
            name,
            room_id: self.room_id.to_string(),
        });
        if let Some(payload) = init.encode() {
            let _ = outbound.send(payload);
        }
        tracing::info!(
            room_id = %self.room_id,
            session_id,
            players = self.state.player_count(),
            "player joined room"
        );
        self.sessions.insert(session_id, outbound);
    }

    fn tick(&mut self) {
        let outcome = self.state.tick();
        if !outcome.died.is_empty() {
            tracing::debug!(room_id = %self.room_id, died = ?outcome.died, fed = ?outcome.fed, "tick");
        }
        self.broadcast();
    }

    /// Serializes the full room once and hands the same frame to every session.
    fn broadcast(&self) {
        if self.sessions.is_empty() {
            return;
        }
        let Some(payload) = ServerMessage::GameState(self.state.snapshot()).encode() else {
            return;
        };
        for (session_id, outbound) in &self.sessions {
            if outbound.send(payload.clone()).is_err() {
                tracing::debug!(room_id = %self.room_id, session_id, "session outbound closed");
            }
        }
    }
}
