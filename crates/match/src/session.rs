//! A round played against a remote opponent through a [`Transport`].

use puyo_core::Grid;
use puyo_engine::clamp_incoming;
use tracing::{debug, info};

use crate::config::RoundConfig;
use crate::error::MatchResult;
use crate::relay::{ClientMessage, ServerMessage, Transport};
use crate::round::{Round, RoundEvent, RoundInput};

/// Things a presentation layer should tell the player about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Started,
    RoomFull(String),
    OpponentDisconnected,
}

pub struct OnlineSession<T: Transport> {
    round: Round,
    transport: T,
    room: Option<String>,
    started: bool,
    opponent_field: Option<Grid>,
    notices: Vec<Notice>,
}

impl<T: Transport> OnlineSession<T> {
    pub fn new(config: RoundConfig, transport: T) -> Self {
        Self::with_round(Round::new(config), transport)
    }

    pub fn with_round(round: Round, transport: T) -> Self {
        Self {
            round,
            transport,
            room: None,
            started: false,
            opponent_field: None,
            notices: Vec::new(),
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Last field the opponent published. Display only.
    pub fn opponent_field(&self) -> Option<&Grid> {
        self.opponent_field.as_ref()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn join(&mut self, room: &str) -> MatchResult<()> {
        self.transport.send(ClientMessage::JoinRoom(room.to_owned()))?;
        self.room = Some(room.to_owned());
        Ok(())
    }

    /// Apply everything the relay has sent since the last call.
    pub fn pump(&mut self) -> MatchResult<Vec<RoundEvent>> {
        let mut events = Vec::new();
        while let Some(message) = self.transport.try_recv()? {
            events.extend(self.apply(message)?);
        }
        Ok(events)
    }

    /// Feed one input to the round and publish the result. Before the
    /// match has started, inputs are dropped.
    pub fn handle(&mut self, input: RoundInput) -> MatchResult<Vec<RoundEvent>> {
        if !self.started {
            return Ok(Vec::new());
        }
        let events = self.round.handle(input);
        self.publish(&events)?;
        Ok(events)
    }

    pub fn run_until_idle(&mut self) -> MatchResult<Vec<RoundEvent>> {
        let events = self.round.run_until_idle();
        self.publish(&events)?;
        Ok(events)
    }

    pub fn close(&mut self) {
        self.transport.close();
        self.started = false;
        self.room = None;
    }

    fn apply(&mut self, message: ServerMessage) -> MatchResult<Vec<RoundEvent>> {
        match message {
            ServerMessage::Start => {
                info!(room = ?self.room, "match started");
                self.started = true;
                self.opponent_field = None;
                self.notices.push(Notice::Started);
                let events = self.round.handle(RoundInput::Restart);
                self.publish(&events)?;
                Ok(events)
            }
            ServerMessage::RoomFull(room) => {
                info!(room = %room, "room full");
                self.room = None;
                self.notices.push(Notice::RoomFull(room));
                Ok(Vec::new())
            }
            ServerMessage::OpponentFieldUpdate(grid) => {
                self.opponent_field = Some(grid);
                Ok(Vec::new())
            }
            ServerMessage::ReceiveNuisance(raw) => {
                let units = clamp_incoming(raw);
                debug!(raw, units, "nuisance from opponent");
                Ok(self.round.handle(RoundInput::ReceiveNuisance(units)))
            }
            ServerMessage::OpponentDisconnected => {
                self.notices.push(Notice::OpponentDisconnected);
                Ok(self.round.handle(RoundInput::OpponentDisconnected))
            }
        }
    }

    /// Send any outgoing nuisance, then the current field if anything changed.
    fn publish(&mut self, events: &[RoundEvent]) -> MatchResult<()> {
        if !self.started || events.is_empty() {
            return Ok(());
        }
        for event in events {
            if let RoundEvent::SendNuisance(units) = *event {
                self.transport.send(ClientMessage::SendNuisance(units))?;
            }
        }
        self.transport
            .send(ClientMessage::FieldUpdate(self.round.display_grid()))
    }
}
