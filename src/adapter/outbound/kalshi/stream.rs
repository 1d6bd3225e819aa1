//! Kalshi order-book feed over WebSocket.
//!
//! The handshake is signed like a REST `GET` on the feed path. After
//! connecting, one `subscribe` command is sent for the `orderbook_delta`
//! channel. Server frames are parsed into [`FeedEvent`]s; malformed frames
//! are logged and skipped, unknown types are ignored.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace, warn};
use url::Url;

use super::dto::message::{parse_feed_message, KalshiSubscribeCommand};
use super::signer::Signer;
use crate::domain::MarketTicker;
use crate::error::{Error, Result, SigningError};
use crate::port::{BookFeed, FeedEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Streaming order-book feed for one Kalshi market.
pub struct KalshiBookFeed {
    url: String,
    signer: Arc<Signer>,
    ws: Option<WsStream>,
}

impl KalshiBookFeed {
    #[must_use]
    pub fn new(url: String, signer: Arc<Signer>) -> Self {
        Self {
            url,
            signer,
            ws: None,
        }
    }

    /// Whether a connection is currently open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.ws.is_some()
    }
}

/// Build the signed handshake request for `url`.
///
/// # Errors
///
/// Returns an error if the URL is invalid or signing fails. A signing
/// failure aborts the connection attempt.
pub fn handshake_request(url: &str, signer: &Signer) -> Result<Request> {
    let path = Url::parse(url)?.path().to_string();
    let auth = signer.sign("GET", &path)?;

    let mut request = url.into_client_request()?;
    let headers = request.headers_mut();
    for (name, value) in auth.pairs() {
        let value =
            HeaderValue::from_str(&value).map_err(|e| SigningError::Header(e.to_string()))?;
        headers.insert(name, value);
    }
    Ok(request)
}

#[async_trait]
impl BookFeed for KalshiBookFeed {
    async fn connect(&mut self) -> Result<()> {
        info!(url = %self.url, "Connecting to WebSocket");
        let request = handshake_request(&self.url, &self.signer)?;
        let (ws_stream, response) = connect_async(request).await?;
        info!(status = %response.status(), "WebSocket connected");
        self.ws = Some(ws_stream);
        Ok(())
    }

    async fn subscribe(&mut self, ticker: &MarketTicker, request_id: u64) -> Result<()> {
        let ws = self
            .ws
            .as_mut()
            .ok_or_else(|| Error::Connection("Not connected".into()))?;

        let cmd = KalshiSubscribeCommand::orderbook(ticker, request_id);
        let json = serde_json::to_string(&cmd)?;

        info!(ticker = %ticker, request_id, "Subscribing to order book");
        ws.send(Message::Text(json)).await?;
        Ok(())
    }

    async fn next_event(&mut self) -> Option<FeedEvent> {
        let ws = self.ws.as_mut()?;

        let event = loop {
            let Some(frame) = ws.next().await else {
                break FeedEvent::Disconnected {
                    reason: "stream ended".into(),
                };
            };

            match frame {
                Ok(Message::Text(text)) => {
                    trace!(bytes = text.len(), "Received WebSocket text frame");
                    match parse_feed_message(&text) {
                        Ok(Some(event)) => return Some(event),
                        Ok(None) => {
                            trace!("Ignoring unhandled message type");
                        }
                        Err(e) => {
                            warn!(error = %e, bytes = text.len(), "Failed to parse message");
                        }
                    }
                }
                Ok(Message::Ping(data)) => {
                    trace!("Received WebSocket ping");
                    if ws.send(Message::Pong(data)).await.is_err() {
                        break FeedEvent::Disconnected {
                            reason: "Failed to send pong".into(),
                        };
                    }
                }
                Ok(Message::Close(frame)) => {
                    info!(frame = ?frame, "WebSocket closed by server");
                    break FeedEvent::Disconnected {
                        reason: frame.map(|f| f.reason.to_string()).unwrap_or_default(),
                    };
                }
                Ok(_) => {}
                Err(e) => {
                    error!(error = %e, "WebSocket error");
                    break FeedEvent::Disconnected {
                        reason: e.to_string(),
                    };
                }
            }
        };

        debug!("Dropping WebSocket connection");
        self.ws = None;
        Some(event)
    }

    fn exchange_name(&self) -> &'static str {
        "Kalshi"
    }
}
