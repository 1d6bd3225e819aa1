//! Kalshi streaming message types.
//!
//! Every server frame is a JSON object with a `type` tag and a `msg` payload:
//!
//! ```json
//! {"type":"orderbook_snapshot","sid":1,"seq":1,"msg":{"market_ticker":"KX-A","yes":[[45,100]],"no":[[52,40]]}}
//! ```
//!
//! Book payloads carry `[price, quantity]` pairs per side. Deltas use the
//! same shape, with quantity 0 meaning "remove this level".

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{BookLevels, MarketTicker, PriceLevel};
use crate::error::ProtocolError;
use crate::port::FeedEvent;

/// Channel carrying order-book snapshots and deltas.
pub const ORDERBOOK_CHANNEL: &str = "orderbook_delta";

/// Subscription command sent once per connection.
#[derive(Debug, Serialize)]
pub struct KalshiSubscribeCommand {
    pub id: u64,
    pub cmd: &'static str,
    pub params: KalshiSubscribeParams,
}

#[derive(Debug, Serialize)]
pub struct KalshiSubscribeParams {
    pub channels: Vec<String>,
    pub market_ticker: String,
}

impl KalshiSubscribeCommand {
    #[must_use]
    pub fn orderbook(ticker: &MarketTicker, id: u64) -> Self {
        Self {
            id,
            cmd: "subscribe",
            params: KalshiSubscribeParams {
                channels: vec![ORDERBOOK_CHANNEL.into()],
                market_ticker: ticker.as_str().to_string(),
            },
        }
    }
}

/// Outer frame of every server message.
#[derive(Debug, Deserialize)]
pub struct KalshiWsEnvelope {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub id: Option<u64>,
    pub sid: Option<u64>,
    pub seq: Option<u64>,
    pub msg: Option<Value>,
}

/// Payload of `orderbook_snapshot` and `orderbook_delta` frames.
#[derive(Debug, Deserialize)]
pub struct KalshiBookPayload {
    pub market_ticker: Option<String>,
    #[serde(default)]
    pub yes: Vec<(i64, i64)>,
    #[serde(default)]
    pub no: Vec<(i64, i64)>,
}

impl KalshiBookPayload {
    fn into_levels(self, msg_type: &str) -> Result<(Option<MarketTicker>, BookLevels), ProtocolError> {
        let convert = |pairs: Vec<(i64, i64)>| -> Result<Vec<PriceLevel>, ProtocolError> {
            pairs
                .into_iter()
                .map(|(price, quantity)| {
                    PriceLevel::try_new(price, quantity).map_err(|source| {
                        ProtocolError::InvalidLevel {
                            msg_type: msg_type.to_string(),
                            source,
                        }
                    })
                })
                .collect()
        };

        let levels = BookLevels::new(convert(self.yes)?, convert(self.no)?);
        Ok((self.market_ticker.map(MarketTicker::from), levels))
    }
}

/// Payload of `subscribed` frames.
#[derive(Debug, Default, Deserialize)]
pub struct KalshiSubscribedPayload {
    pub channel: Option<String>,
    pub sid: Option<u64>,
}

/// Payload of `error` frames.
#[derive(Debug, Default, Deserialize)]
pub struct KalshiErrorPayload {
    pub code: Option<i64>,
    #[serde(alias = "message")]
    pub msg: Option<String>,
}

/// Parse one text frame into a feed event.
///
/// Returns `Ok(None)` for message types the book does not care about.
///
/// # Errors
///
/// Returns a [`ProtocolError`] if the frame is not valid JSON, or if a
/// snapshot or delta is missing its payload or carries an invalid level.
pub fn parse_feed_message(text: &str) -> Result<Option<FeedEvent>, ProtocolError> {
    let envelope: KalshiWsEnvelope = serde_json::from_str(text)?;

    let event = match envelope.msg_type.as_str() {
        "subscribed" => {
            let payload: KalshiSubscribedPayload = match envelope.msg {
                Some(msg) => serde_json::from_value(msg)?,
                None => KalshiSubscribedPayload::default(),
            };
            FeedEvent::Subscribed {
                request_id: envelope.id,
                channel: payload.channel,
            }
        }
        msg_type @ ("orderbook_snapshot" | "orderbook_delta") => {
            let msg = envelope.msg.ok_or_else(|| ProtocolError::MissingPayload {
                msg_type: msg_type.to_string(),
            })?;
            let payload: KalshiBookPayload = serde_json::from_value(msg)?;
            let (ticker, levels) = payload.into_levels(msg_type)?;
            if msg_type == "orderbook_snapshot" {
                FeedEvent::Snapshot { ticker, levels }
            } else {
                FeedEvent::Delta { ticker, levels }
            }
        }
        "error" => {
            let payload: KalshiErrorPayload = envelope
                .msg
                .map(serde_json::from_value)
                .transpose()?
                .unwrap_or_default();
            FeedEvent::Error {
                code: payload.code,
                message: payload.msg.unwrap_or_else(|| "unspecified error".into()),
            }
        }
        _ => return Ok(None),
    };

    Ok(Some(event))
}
