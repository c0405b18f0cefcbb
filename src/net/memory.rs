//! Транспорт в памяти процесса: комнаты, пары ссылок, JSON-кадры.
//!
//! Используется dev-CLI и тестами. Умеет обрывать соединение "молча"
//! (`sever`), как это бывает с настоящей сетью.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{encode, WireMessage};

use super::errors::TransportError;
use super::transport::{Connection, Connector, Link, PeerId, PeerLink, TransportEvent};

/// Общее состояние одного соединения.
#[derive(Debug)]
struct Wire {
    room: String,
    client: PeerId,
    open: AtomicBool,
    to_host: mpsc::UnboundedSender<TransportEvent>,
    to_client: Mutex<Option<mpsc::UnboundedSender<String>>>,
}

impl Wire {
    /// Закрыть провод. С `notify` хост получит событие `Closed`.
    fn shut(&self, notify: bool) {
        if !self.open.swap(false, Ordering::SeqCst) {
            return;
        }
        self.to_client.lock().take();
        if notify {
            let _ = self.to_host.send(TransportEvent::Closed {
                peer: self.client.clone(),
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Host,
    Client,
}

/// Конец соединения в памяти.
#[derive(Debug)]
pub struct MemoryLink {
    side: Side,
    wire: Arc<Wire>,
}

impl PeerLink for MemoryLink {
    fn peer_id(&self) -> &str {
        match self.side {
            Side::Host => &self.wire.client,
            Side::Client => &self.wire.room,
        }
    }

    fn send(&self, msg: &WireMessage) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::Closed);
        }
        let frame = encode(msg)?;
        match self.side {
            Side::Host => {
                let guard = self.wire.to_client.lock();
                let tx = guard.as_ref().ok_or(TransportError::Closed)?;
                tx.send(frame).map_err(|_| TransportError::Closed)
            }
            Side::Client => self
                .wire
                .to_host
                .send(TransportEvent::Frame {
                    peer: self.wire.client.clone(),
                    frame,
                })
                .map_err(|_| TransportError::Closed),
        }
    }

    fn is_open(&self) -> bool {
        self.wire.open.load(Ordering::SeqCst)
    }

    fn close(&self) {
        self.wire.shut(true);
    }
}

#[derive(Default)]
struct NetworkState {
    rooms: HashMap<String, mpsc::UnboundedSender<TransportEvent>>,
    wires: HashMap<PeerId, Arc<Wire>>,
}

/// Сеть в памяти: реестр комнат и открытых соединений.
#[derive(Clone, Default)]
pub struct MemoryNetwork {
    state: Arc<Mutex<NetworkState>>,
    next_peer: Arc<AtomicU64>,
}

impl MemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Занять комнату и получить поток событий транспорта для хоста.
    pub fn listen(&self, room: &str) -> Result<mpsc::UnboundedReceiver<TransportEvent>, TransportError> {
        let mut state = self.state.lock();
        if state.rooms.get(room).is_some_and(|tx| !tx.is_closed()) {
            return Err(TransportError::AddressInUse(room.to_string()));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        state.rooms.insert(room.to_string(), tx);
        debug!(room, "[NET] listening");
        Ok(rx)
    }

    /// Хост пропал: комната недоступна, все её соединения оборваны.
    pub fn shutdown_room(&self, room: &str) {
        let mut state = self.state.lock();
        state.rooms.remove(room);
        state.wires.retain(|_, wire| {
            if wire.room == room {
                wire.shut(false);
                false
            } else {
                true
            }
        });
    }

    pub fn connector(&self, room: &str) -> MemoryConnector {
        MemoryConnector {
            network: self.clone(),
            room: room.to_string(),
            resets: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Оборвать соединение без уведомления хоста: он заметит это сам.
    pub fn sever(&self, peer: &str) -> bool {
        match self.state.lock().wires.remove(peer) {
            Some(wire) => {
                wire.shut(false);
                true
            }
            None => false,
        }
    }

    /// Открытые соединения комнаты.
    pub fn peers_in(&self, room: &str) -> Vec<PeerId> {
        let state = self.state.lock();
        let mut peers: Vec<PeerId> = state
            .wires
            .values()
            .filter(|w| w.room == room && w.open.load(Ordering::SeqCst))
            .map(|w| w.client.clone())
            .collect();
        peers.sort();
        peers
    }

    fn open(&self, room: &str) -> Result<Connection, TransportError> {
        let mut state = self.state.lock();
        let to_host = state
            .rooms
            .get(room)
            .filter(|tx| !tx.is_closed())
            .cloned()
            .ok_or_else(|| TransportError::Unreachable(room.to_string()))?;

        let id = self.next_peer.fetch_add(1, Ordering::SeqCst);
        let client = format!("peer-{id}");
        let (tx, inbound) = mpsc::unbounded_channel();
        let wire = Arc::new(Wire {
            room: room.to_string(),
            client: client.clone(),
            open: AtomicBool::new(true),
            to_host: to_host.clone(),
            to_client: Mutex::new(Some(tx)),
        });

        let host_side: Link = Arc::new(MemoryLink {
            side: Side::Host,
            wire: wire.clone(),
        });
        to_host
            .send(TransportEvent::Opened {
                peer: client.clone(),
                link: host_side,
            })
            .map_err(|_| TransportError::Unreachable(room.to_string()))?;

        state.wires.insert(client, wire.clone());
        Ok(Connection {
            link: Arc::new(MemoryLink {
                side: Side::Client,
                wire,
            }),
            inbound,
        })
    }
}

/// Коннектор к одной комнате.
#[derive(Clone)]
pub struct MemoryConnector {
    network: MemoryNetwork,
    room: String,
    resets: Arc<AtomicUsize>,
}

impl MemoryConnector {
    /// Сколько раз клиент выбрасывал handle.
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self) -> Result<Connection, TransportError> {
        self.network.open(&self.room)
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}
