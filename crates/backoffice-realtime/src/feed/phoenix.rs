//! Change feed over the backend's Phoenix channel websocket.
//!
//! Each subscription opens its own socket, joins one `postgres_changes`
//! channel filtered to INSERT events, keeps it alive with heartbeats and
//! forwards inserted rows to the returned stream. Dropping the stream
//! sends `phx_leave` and closes the socket.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use backoffice_backend::BackendClient;
use backoffice_core::config::RealtimeConfig;
use backoffice_core::error::{AppError, ErrorKind};
use backoffice_core::result::AppResult;
use backoffice_core::traits::{ChangeFeed, InsertStream};

use crate::message::envelope::events;
use crate::message::serializer::{decode, encode};
use crate::message::{PhoenixMessage, builder};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Protocol version of the JSON serializer.
const PROTOCOL_VERSION: &str = "1.0.0";

/// Phoenix channel change feed.
#[derive(Debug, Clone)]
pub struct PhoenixChangeFeed {
    client: BackendClient,
    config: RealtimeConfig,
    refs: Arc<AtomicU64>,
}

impl PhoenixChangeFeed {
    /// Create a feed for the backend `client` points at.
    pub fn new(client: BackendClient, config: RealtimeConfig) -> Self {
        Self {
            client,
            config,
            refs: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Websocket URL with the API key and protocol version.
    fn socket_url(&self) -> String {
        format!(
            "{}?apikey={}&vsn={PROTOCOL_VERSION}",
            self.client.config().realtime_url(),
            self.client.config().anon_key
        )
    }

    fn heartbeat_period(&self) -> Duration {
        Duration::from_secs(self.config.heartbeat_interval_seconds.max(1))
    }
}

fn next_ref(refs: &AtomicU64) -> String {
    (refs.fetch_add(1, Ordering::Relaxed) + 1).to_string()
}

async fn send_frame(sink: &mut WsSink, msg: &PhoenixMessage) -> AppResult<()> {
    let text = encode(msg)?;
    sink.send(Message::Text(text.into())).await.map_err(|e| {
        AppError::with_source(ErrorKind::ExternalService, "Realtime socket write failed", e)
    })
}

/// Read frames until the reply to the join request arrives.
async fn await_join(source: &mut WsSource, join_ref: &str) -> AppResult<()> {
    while let Some(frame) = source.next().await {
        let frame = frame.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Realtime socket error", e)
        })?;
        if let Message::Text(text) = frame {
            let msg = decode(text.as_str())?;
            if msg.is_reply_to(join_ref) {
                return match msg.reply_status() {
                    Some("ok") => Ok(()),
                    _ => Err(AppError::external(format!(
                        "Channel join rejected: {}",
                        msg.payload
                    ))),
                };
            }
        }
    }
    Err(AppError::external("Realtime socket closed before the join reply"))
}

/// State owned by the background task of one channel.
struct ChannelTask {
    topic: String,
    join_ref: String,
    refs: Arc<AtomicU64>,
    heartbeat: Duration,
    sink: WsSink,
    source: WsSource,
    rows: mpsc::Sender<Value>,
}

impl ChannelTask {
    async fn run(mut self) {
        let mut heartbeat = tokio::time::interval(self.heartbeat);
        heartbeat.tick().await;

        loop {
            tokio::select! {
                _ = self.rows.closed() => {
                    self.leave().await;
                    break;
                }
                _ = heartbeat.tick() => {
                    let frame = builder::heartbeat(&next_ref(&self.refs));
                    if let Err(e) = send_frame(&mut self.sink, &frame).await {
                        warn!(topic = %self.topic, error = %e, "Heartbeat failed; channel closed");
                        break;
                    }
                }
                frame = self.source.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        let msg = match decode(text.as_str()) {
                            Ok(msg) => msg,
                            Err(e) => {
                                debug!(error = %e, "Ignoring undecodable frame");
                                continue;
                            }
                        };
                        if msg.topic != self.topic {
                            continue;
                        }
                        if let Some(record) = msg.inserted_record() {
                            if self.rows.send(record.clone()).await.is_err() {
                                self.leave().await;
                                break;
                            }
                        } else if msg.event == events::ERROR || msg.event == events::CLOSE {
                            warn!(
                                topic = %self.topic,
                                event = %msg.event,
                                "Channel closed by server"
                            );
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(topic = %self.topic, "Realtime socket closed");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(topic = %self.topic, error = %e, "Realtime socket error");
                        break;
                    }
                }
            }
        }
        debug!(topic = %self.topic, "Channel task ended");
    }

    async fn leave(&mut self) {
        let frame = builder::leave(&self.topic, &next_ref(&self.refs), &self.join_ref);
        if let Err(e) = send_frame(&mut self.sink, &frame).await {
            debug!(error = %e, "phx_leave not delivered");
        }
        let _ = self.sink.close().await;
        info!(topic = %self.topic, "Channel released");
    }
}

#[async_trait]
impl ChangeFeed for PhoenixChangeFeed {
    async fn subscribe_inserts(&self, table: &str) -> AppResult<InsertStream> {
        let (ws, _response) = tokio_tungstenite::connect_async(self.socket_url())
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Realtime connection failed: {e}"),
                    e,
                )
            })?;
        let (mut sink, mut source) = ws.split();

        let topic = builder::topic_for(table);
        let join_ref = next_ref(&self.refs);
        let token = self.client.bearer_token().await;
        send_frame(
            &mut sink,
            &builder::join(&topic, &self.config.schema, table, &token, &join_ref),
        )
        .await?;

        tokio::time::timeout(self.heartbeat_period(), await_join(&mut source, &join_ref))
            .await
            .map_err(|_| AppError::external(format!("Join of '{topic}' timed out")))??;
        info!(topic = %topic, "Channel joined");

        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let task = ChannelTask {
            topic,
            join_ref,
            refs: self.refs.clone(),
            heartbeat: self.heartbeat_period(),
            sink,
            source,
            rows: tx,
        };
        tokio::spawn(task.run());

        let rows = stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|row| (row, rx)) });
        Ok(Box::pin(rows))
    }
}
