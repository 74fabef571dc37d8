//! Relay contract between a round and its remote opponent, plus an
//! in-process room registry that implements it.
//!
//! Rooms hold at most two parties. The second join starts the match for
//! both; a third gets a room-full notice. Field snapshots and nuisance are
//! forwarded to the other party, and a leave tells whoever remains.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use puyo_core::Grid;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{MatchError, MatchResult};

pub const ROOM_CAPACITY: usize = 2;

/// Round to relay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum ClientMessage {
    JoinRoom(String),
    FieldUpdate(Grid),
    SendNuisance(u32),
}

/// Relay to round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum ServerMessage {
    Start,
    RoomFull(String),
    OpponentFieldUpdate(Grid),
    /// Signed on the wire; the receiving round clamps it.
    ReceiveNuisance(i64),
    OpponentDisconnected,
}

impl ClientMessage {
    pub fn to_json(&self) -> MatchResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> MatchResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl ServerMessage {
    pub fn to_json(&self) -> MatchResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> MatchResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One party's connection to the relay.
pub trait Transport {
    fn send(&mut self, message: ClientMessage) -> MatchResult<()>;

    /// Next inbound message, or `None` when nothing is waiting.
    fn try_recv(&mut self) -> MatchResult<Option<ServerMessage>>;

    /// Leave every room. Further sends fail with `TransportClosed`.
    fn close(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClientId(u64);

#[derive(Default)]
struct Rooms {
    next_client: u64,
    /// Outbound queues carry encoded `ServerMessage`s, as a socket would.
    clients: FxHashMap<ClientId, Sender<String>>,
    rooms: FxHashMap<String, Vec<ClientId>>,
}

impl Rooms {
    fn deliver(&self, to: ClientId, message: &ServerMessage) {
        let Some(outbox) = self.clients.get(&to) else {
            return;
        };
        match message.to_json() {
            // a dropped receiver just means that party is gone
            Ok(text) => {
                let _ = outbox.send(text);
            }
            Err(err) => warn!(%err, "failed to encode relay message"),
        }
    }

    fn room_of(&self, client: ClientId) -> Option<(&String, &Vec<ClientId>)> {
        self.rooms
            .iter()
            .find(|(_, players)| players.contains(&client))
    }

    fn opponent_of(&self, client: ClientId) -> MatchResult<Option<ClientId>> {
        let (_, players) = self.room_of(client).ok_or(MatchError::NotInRoom)?;
        Ok(players.iter().copied().find(|&id| id != client))
    }
}

/// In-process relay. Cheap to clone; all clones share the same rooms.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    inner: Arc<Mutex<Rooms>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn rooms(&self) -> MutexGuard<'_, Rooms> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a new connection to this relay.
    pub fn connect(&self) -> LocalTransport {
        let (outbox, inbox) = mpsc::channel();
        let mut rooms = self.rooms();
        let id = ClientId(rooms.next_client);
        rooms.next_client += 1;
        rooms.clients.insert(id, outbox);
        debug!(client = id.0, "client connected");
        LocalTransport {
            id,
            registry: self.clone(),
            inbox,
            closed: false,
        }
    }

    /// Add `client` to `room`, creating it on first join. Returns the new
    /// player count; the second join sends `Start` to both players. A client
    /// holds at most one seat across all rooms.
    pub fn join_room(&self, client: ClientId, room: &str) -> MatchResult<usize> {
        let mut rooms = self.rooms();
        if let Some((current, _)) = rooms.room_of(client) {
            return Err(MatchError::AlreadyInRoom(current.clone()));
        }
        let players = rooms.rooms.entry(room.to_owned()).or_default();
        if players.len() >= ROOM_CAPACITY {
            return Err(MatchError::RoomFull(room.to_owned()));
        }
        players.push(client);
        let players = players.clone();
        info!(client = client.0, room, players = players.len(), "joined room");

        if players.len() == ROOM_CAPACITY {
            info!(room, "match started");
            for &id in &players {
                rooms.deliver(id, &ServerMessage::Start);
            }
        }
        Ok(players.len())
    }

    /// Route one client message.
    pub fn dispatch(&self, from: ClientId, message: ClientMessage) -> MatchResult<()> {
        match message {
            ClientMessage::JoinRoom(room) => match self.join_room(from, &room) {
                Ok(_) => Ok(()),
                Err(MatchError::RoomFull(room)) => {
                    info!(client = from.0, room = %room, "room full");
                    self.rooms().deliver(from, &ServerMessage::RoomFull(room));
                    Ok(())
                }
                Err(MatchError::AlreadyInRoom(current)) => {
                    debug!(client = from.0, room = %current, "repeat join ignored");
                    Ok(())
                }
                Err(err) => Err(err),
            },
            ClientMessage::FieldUpdate(grid) => {
                self.forward(from, ServerMessage::OpponentFieldUpdate(grid))
            }
            ClientMessage::SendNuisance(units) => {
                debug!(client = from.0, units, "nuisance forwarded");
                self.forward(from, ServerMessage::ReceiveNuisance(i64::from(units)))
            }
        }
    }

    fn forward(&self, from: ClientId, message: ServerMessage) -> MatchResult<()> {
        let rooms = self.rooms();
        if let Some(opponent) = rooms.opponent_of(from)? {
            rooms.deliver(opponent, &message);
        }
        Ok(())
    }

    /// Drop `client` from every room. Empty rooms are removed; a lone
    /// remaining player is told the opponent left.
    pub fn disconnect(&self, client: ClientId) {
        let mut rooms = self.rooms();
        rooms.clients.remove(&client);

        let mut remaining = Vec::new();
        rooms.rooms.retain(|room, players| {
            let before = players.len();
            players.retain(|&id| id != client);
            if players.len() == before {
                return true;
            }
            info!(client = client.0, room = %room, left = players.len(), "left room");
            remaining.extend(players.iter().copied());
            !players.is_empty()
        });

        for id in remaining {
            rooms.deliver(id, &ServerMessage::OpponentDisconnected);
        }
    }

    pub fn room_size(&self, room: &str) -> usize {
        self.rooms().rooms.get(room).map_or(0, Vec::len)
    }

    pub fn room_count(&self) -> usize {
        self.rooms().rooms.len()
    }
}

/// Channel-backed transport handed out by [`RoomRegistry::connect`].
pub struct LocalTransport {
    id: ClientId,
    registry: RoomRegistry,
    inbox: Receiver<String>,
    closed: bool,
}

impl LocalTransport {
    pub fn id(&self) -> ClientId {
        self.id
    }
}

impl Transport for LocalTransport {
    fn send(&mut self, message: ClientMessage) -> MatchResult<()> {
        if self.closed {
            return Err(MatchError::TransportClosed);
        }
        self.registry.dispatch(self.id, message)
    }

    fn try_recv(&mut self) -> MatchResult<Option<ServerMessage>> {
        match self.inbox.try_recv() {
            Ok(text) => ServerMessage::from_json(&text).map(Some),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(MatchError::TransportClosed),
        }
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.registry.disconnect(self.id);
        }
    }
}

impl Drop for LocalTransport {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puyo_core::Color;

    fn drain(transport: &mut LocalTransport) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Some(message) = transport.try_recv().expect("recv") {
            out.push(message);
        }
        out
    }

    #[test]
    fn test_second_join_starts_both() {
        let relay = RoomRegistry::new();
        let mut a = relay.connect();
        let mut b = relay.connect();
        a.send(ClientMessage::JoinRoom("r1".into())).expect("join");
        assert!(drain(&mut a).is_empty());
        b.send(ClientMessage::JoinRoom("r1".into())).expect("join");
        assert_eq!(drain(&mut a), vec![ServerMessage::Start]);
        assert_eq!(drain(&mut b), vec![ServerMessage::Start]);
        assert_eq!(relay.room_size("r1"), 2);
    }

    #[test]
    fn test_third_join_is_refused() {
        let relay = RoomRegistry::new();
        let mut a = relay.connect();
        let mut b = relay.connect();
        let mut c = relay.connect();
        for t in [&mut a, &mut b] {
            t.send(ClientMessage::JoinRoom("r1".into())).expect("join");
        }
        c.send(ClientMessage::JoinRoom("r1".into())).expect("join");
        assert_eq!(drain(&mut c), vec![ServerMessage::RoomFull("r1".into())]);
        assert_eq!(relay.room_size("r1"), 2);
        assert!(matches!(
            relay.join_room(c.id(), "r1"),
            Err(MatchError::RoomFull(_))
        ));
    }

    #[test]
    fn test_one_seat_per_client() {
        let relay = RoomRegistry::new();
        let mut a = relay.connect();
        a.send(ClientMessage::JoinRoom("r1".into())).expect("join");
        a.send(ClientMessage::JoinRoom("r1".into())).expect("repeat join");
        a.send(ClientMessage::JoinRoom("r2".into())).expect("other room");
        assert!(drain(&mut a).is_empty());
        assert_eq!(relay.room_size("r1"), 1);
        assert_eq!(relay.room_size("r2"), 0);
        assert_eq!(relay.room_count(), 1);
        assert!(matches!(
            relay.join_room(a.id(), "r2"),
            Err(MatchError::AlreadyInRoom(room)) if room == "r1"
        ));

        let mut b = relay.connect();
        b.send(ClientMessage::JoinRoom("r1".into())).expect("join");
        assert_eq!(drain(&mut a), vec![ServerMessage::Start]);
        assert_eq!(drain(&mut b), vec![ServerMessage::Start]);
    }

    #[test]
    fn test_forwarding_goes_to_the_other_party() {
        let relay = RoomRegistry::new();
        let mut a = relay.connect();
        let mut b = relay.connect();
        a.send(ClientMessage::JoinRoom("r".into())).expect("join");
        b.send(ClientMessage::JoinRoom("r".into())).expect("join");
        drain(&mut a);
        drain(&mut b);

        let mut grid = Grid::new();
        grid.set(0, 11, Some(Color::Red));
        a.send(ClientMessage::FieldUpdate(grid)).expect("field");
        a.send(ClientMessage::SendNuisance(4)).expect("nuisance");
        assert!(drain(&mut a).is_empty());
        assert_eq!(
            drain(&mut b),
            vec![
                ServerMessage::OpponentFieldUpdate(grid),
                ServerMessage::ReceiveNuisance(4)
            ]
        );
    }

    #[test]
    fn test_forward_outside_room_fails() {
        let relay = RoomRegistry::new();
        let mut a = relay.connect();
        assert!(matches!(
            a.send(ClientMessage::SendNuisance(1)),
            Err(MatchError::NotInRoom)
        ));
    }

    #[test]
    fn test_disconnect_notifies_and_cleans_up() {
        let relay = RoomRegistry::new();
        let mut a = relay.connect();
        let mut b = relay.connect();
        a.send(ClientMessage::JoinRoom("r".into())).expect("join");
        b.send(ClientMessage::JoinRoom("r".into())).expect("join");
        drain(&mut b);

        a.close();
        assert_eq!(drain(&mut b), vec![ServerMessage::OpponentDisconnected]);
        assert_eq!(relay.room_size("r"), 1);
        assert!(matches!(
            a.send(ClientMessage::SendNuisance(1)),
            Err(MatchError::TransportClosed)
        ));

        drop(b);
        assert_eq!(relay.room_count(), 0);
    }

    #[test]
    fn test_wire_format() {
        let json = ServerMessage::ReceiveNuisance(3).to_json().expect("encode");
        assert_eq!(json, r#"{"event":"receive-nuisance","payload":3}"#);
        assert_eq!(
            ServerMessage::from_json(r#"{"event":"start"}"#).expect("decode"),
            ServerMessage::Start
        );
        let join = ClientMessage::from_json(r#"{"event":"join-room","payload":"abc"}"#)
            .expect("decode");
        assert_eq!(join, ClientMessage::JoinRoom("abc".into()));
        assert!(matches!(
            ServerMessage::from_json(r#"{"event":"opponent-field-update","payload":["RR"]}"#),
            Err(MatchError::Snapshot(_))
        ));
    }
}
