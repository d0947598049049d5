//! Event relay between peers.
//!
//! Every event travels as one JSON object, `{"event": <name>, "args": [...]}`.
//! Events received from a peer only reach local listeners and are never sent
//! on to other peers, which keeps two relays from echoing events back and
//! forth forever.

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{metrics, JsonCodec, JsonValue, RelayConfig};

pub type Listener = Arc<dyn Fn(&[JsonValue]) + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub args: Vec<JsonValue>,
}

impl Event {
    pub fn new(name: impl Into<String>, args: Vec<JsonValue>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// The wire envelope of this event.
    pub fn into_value(self) -> JsonValue {
        [
            ("event", JsonValue::String(self.name)),
            ("args", JsonValue::Array(self.args)),
        ]
        .into_iter()
        .collect()
    }

    /// Reads an envelope. Values without a non-empty string `event`, or with
    /// `args` that is not an array, are not events. Missing `args` means none.
    pub fn from_value(value: JsonValue) -> Option<Self> {
        let JsonValue::Object(mut map) = value else {
            return None;
        };
        let name = match map.shift_remove("event")? {
            JsonValue::String(name) if !name.is_empty() => name,
            _ => return None,
        };
        let args = match map.shift_remove("args") {
            None => Vec::new(),
            Some(JsonValue::Array(args)) => args,
            Some(_) => return None,
        };
        Some(Self { name, args })
    }
}

/// Pause before accepting again after a failed `accept`.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// A connected peer. Cancelling `shutdown` stops both of its tasks, which
/// drops the stream.
struct Peer {
    tx: mpsc::Sender<JsonValue>,
    shutdown: CancellationToken,
}

struct RelayInner {
    listeners: DashMap<String, Vec<Listener>>,
    peers: DashMap<u64, Peer>,
    next_peer_id: AtomicU64,
    config: RelayConfig,
}

/// Local event emitter whose events are also broadcast to connected peers.
///
/// Cloning is cheap; clones share listeners and peers.
#[derive(Clone)]
pub struct EventRelay {
    inner: Arc<RelayInner>,
}

impl Default for EventRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRelay {
    pub fn new() -> Self {
        Self::with_config(RelayConfig::default())
    }

    pub fn with_config(config: RelayConfig) -> Self {
        Self {
            inner: Arc::new(RelayInner {
                listeners: DashMap::new(),
                peers: DashMap::new(),
                next_peer_id: AtomicU64::new(0),
                config,
            }),
        }
    }

    pub fn on<F>(&self, name: impl Into<String>, listener: F)
    where
        F: Fn(&[JsonValue]) + Send + Sync + 'static,
    {
        self.inner
            .listeners
            .entry(name.into())
            .or_default()
            .push(Arc::new(listener));
    }

    /// Calls the local listeners of `name` only. Returns how many ran.
    pub fn silent_emit(&self, name: &str, args: &[JsonValue]) -> usize {
        // Clone the list out so listeners may register more listeners.
        let listeners = match self.inner.listeners.get(name) {
            Some(entry) => entry.value().clone(),
            None => return 0,
        };
        for listener in &listeners {
            listener(args);
        }
        listeners.len()
    }

    /// Calls the local listeners and sends the event to every peer. Returns
    /// the number of peers that accepted it.
    ///
    /// Waits while a peer's outgoing buffer is full.
    #[instrument(skip(self, args))]
    pub async fn emit(&self, name: &str, args: Vec<JsonValue>) -> usize {
        self.silent_emit(name, &args);
        let envelope = Event::new(name, args).into_value();

        let peers: Vec<(u64, mpsc::Sender<JsonValue>)> = self
            .inner
            .peers
            .iter()
            .map(|entry| (*entry.key(), entry.value().tx.clone()))
            .collect();
        let mut delivered = 0;
        for (id, tx) in peers {
            if tx.send(envelope.clone()).await.is_ok() {
                delivered += 1;
            } else {
                debug!(peer = id, "Peer went away, removing it");
                self.drop_peer(id);
            }
        }
        delivered
    }

    /// Starts relaying over `stream`. Returns the peer id.
    ///
    /// A decode error on the incoming side is fatal for this peer only.
    pub fn attach<S>(&self, stream: S) -> u64
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let id = self.inner.next_peer_id.fetch_add(1, Ordering::Relaxed);
        let (read_half, write_half) = tokio::io::split(stream);
        let (tx, rx) = mpsc::channel::<JsonValue>(self.inner.config.peer_buffer.max(1));
        let shutdown = CancellationToken::new();
        // Registered before the tasks start so their cleanup always finds it.
        self.inner.peers.insert(
            id,
            Peer {
                tx,
                shutdown: shutdown.clone(),
            },
        );

        let writer_relay = self.clone();
        let writer_shutdown = shutdown.clone();
        tokio::spawn(async move {
            let mut sink = FramedWrite::new(write_half, JsonCodec::new());
            let mut outgoing = ReceiverStream::new(rx);
            loop {
                let value = tokio::select! {
                    biased;
                    _ = writer_shutdown.cancelled() => break,
                    value = outgoing.next() => match value {
                        Some(value) => value,
                        None => break,
                    },
                };
                if let Err(e) = sink.send(value).await {
                    warn!(peer = id, "Failed to write to peer: {}", e);
                    writer_relay.drop_peer(id);
                    break;
                }
            }
        });

        let reader_relay = self.clone();
        tokio::spawn(async move {
            let codec = JsonCodec::with_config(&reader_relay.inner.config.decoder);
            let mut frames = FramedRead::new(read_half, codec);
            loop {
                let frame = tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break,
                    frame = frames.next() => frame,
                };
                match frame {
                    Some(Ok(value)) => reader_relay.dispatch_remote(value),
                    Some(Err(e)) => {
                        warn!(peer = id, "Dropping peer after invalid input: {}", e);
                        break;
                    }
                    None => break,
                }
            }
            reader_relay.drop_peer(id);
            debug!(peer = id, "Peer disconnected");
        });

        id
    }

    /// Connects to another relay over TCP.
    #[instrument(skip(self))]
    pub async fn connect(&self, host: &str, port: u16) -> io::Result<u64> {
        let stream = TcpStream::connect((host, port)).await?;
        stream.set_nodelay(true)?;
        let id = self.attach(stream);
        info!(peer = id, host, port, "Connected to peer");
        Ok(id)
    }

    /// Connects to the host and port of this relay's configuration.
    pub async fn connect_configured(&self) -> io::Result<u64> {
        let host = self.inner.config.host.clone();
        self.connect(&host, self.inner.config.port).await
    }

    /// Accepts peers on `addr` in a background task.
    pub async fn listen<A: ToSocketAddrs>(&self, addr: A) -> io::Result<(SocketAddr, JoinHandle<()>)> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!(%local_addr, "Relay listening");

        let relay = self.clone();
        let handle = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, remote)) => {
                        if let Err(e) = stream.set_nodelay(true) {
                            warn!(%remote, "Failed to set TCP_NODELAY: {}", e);
                        }
                        let id = relay.attach(stream);
                        info!(peer = id, %remote, "Accepted peer");
                    }
                    Err(e) => {
                        // Usually transient (e.g. out of file descriptors).
                        warn!("Failed to accept peer: {}", e);
                        tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                    }
                }
            }
        });
        Ok((local_addr, handle))
    }

    /// Closes the connection to a peer: nothing more is sent to it and
    /// nothing it sends reaches the listeners. Returns whether it was
    /// connected.
    pub fn disconnect(&self, peer: u64) -> bool {
        self.drop_peer(peer)
    }

    fn drop_peer(&self, id: u64) -> bool {
        match self.inner.peers.remove(&id) {
            Some((_, peer)) => {
                peer.shutdown.cancel();
                true
            }
            None => false,
        }
    }

    pub fn peer_count(&self) -> usize {
        self.inner.peers.len()
    }

    fn dispatch_remote(&self, value: JsonValue) {
        match Event::from_value(value) {
            Some(event) => {
                metrics::record_relayed_event();
                let listeners = self.silent_emit(&event.name, &event.args);
                debug!(event = %event.name, listeners, "Relayed event");
            }
            None => debug!("Ignoring JSON value that is not an event"),
        }
    }
}
