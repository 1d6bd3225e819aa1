//! Kalshi REST request and response bodies.

use serde::{Deserialize, Serialize};

use crate::domain::{Balance, MarketPosition, MarketSummary, MarketTicker, OrderId, Side};
use crate::error::ExchangeError;
use crate::port::{OrderAck, OrderRequest};

/// Market record from `GET /markets` and `GET /markets/{ticker}`.
#[derive(Debug, Clone, Deserialize)]
pub struct KalshiMarket {
    pub ticker: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub yes_bid: i64,
    #[serde(default = "default_yes_ask")]
    pub yes_ask: i64,
    #[serde(default)]
    pub volume: i64,
    #[serde(default)]
    pub open_interest: i64,
    #[serde(default)]
    pub liquidity: i64,
}

const fn default_yes_ask() -> i64 {
    100
}

impl From<KalshiMarket> for MarketSummary {
    fn from(m: KalshiMarket) -> Self {
        Self {
            ticker: MarketTicker::from(m.ticker),
            title: m.title,
            yes_bid: m.yes_bid,
            yes_ask: m.yes_ask,
            volume: m.volume,
            open_interest: m.open_interest,
            liquidity: m.liquidity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct KalshiMarketsResponse {
    #[serde(default)]
    pub markets: Vec<KalshiMarket>,
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KalshiMarketResponse {
    pub market: KalshiMarket,
}

#[derive(Debug, Deserialize)]
pub struct KalshiBalanceResponse {
    /// Cents.
    pub balance: i64,
}

impl From<KalshiBalanceResponse> for Balance {
    fn from(r: KalshiBalanceResponse) -> Self {
        Self {
            balance_cents: r.balance,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct KalshiPosition {
    pub ticker: String,
    #[serde(default)]
    pub position: i64,
}

#[derive(Debug, Deserialize)]
pub struct KalshiPositionsResponse {
    #[serde(default)]
    pub market_positions: Vec<KalshiPosition>,
}

impl From<KalshiPositionsResponse> for Vec<MarketPosition> {
    fn from(r: KalshiPositionsResponse) -> Self {
        r.market_positions
            .into_iter()
            .map(|p| MarketPosition {
                ticker: MarketTicker::from(p.ticker),
                position: p.position,
            })
            .collect()
    }
}

/// Body of `POST /portfolio/orders`.
#[derive(Debug, Serialize)]
pub struct KalshiCreateOrderBody {
    pub action: &'static str,
    pub count: i64,
    #[serde(rename = "type")]
    pub order_type: &'static str,
    pub ticker: String,
    pub side: &'static str,
    pub client_order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_price: Option<i64>,
}

impl KalshiCreateOrderBody {
    /// Limit order body. The price goes in the field matching the side.
    #[must_use]
    pub fn limit(order: &OrderRequest, client_order_id: String) -> Self {
        let (yes_price, no_price) = match order.side {
            Side::Yes => (Some(order.price), None),
            Side::No => (None, Some(order.price)),
        };
        Self {
            action: order.action.as_str(),
            count: order.count,
            order_type: "limit",
            ticker: order.ticker.as_str().to_string(),
            side: order.side.as_str(),
            client_order_id,
            yes_price,
            no_price,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct KalshiOrder {
    pub order_id: String,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KalshiCreateOrderResponse {
    pub order: KalshiOrder,
}

impl From<KalshiCreateOrderResponse> for OrderAck {
    fn from(r: KalshiCreateOrderResponse) -> Self {
        Self {
            order_id: OrderId::new(r.order.order_id),
        }
    }
}

/// Structured rejection body: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Deserialize)]
pub struct KalshiErrorResponse {
    pub error: KalshiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct KalshiErrorBody {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl From<KalshiErrorResponse> for ExchangeError {
    fn from(r: KalshiErrorResponse) -> Self {
        Self::new(r.error.code, r.error.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Action;

    #[test]
    fn market_missing_quotes_defaults_to_unpopulated() {
        let json = r#"{"ticker":"KX-A"}"#;
        let market: MarketSummary = serde_json::from_str::<KalshiMarket>(json).unwrap().into();

        assert_eq!(market.ticker.as_str(), "KX-A");
        assert_eq!(market.yes_bid, 0);
        assert_eq!(market.yes_ask, 100);
        assert!(market.title.is_none());
    }

    #[test]
    fn markets_response_parses_listing() {
        let json = r#"{"markets":[{"ticker":"KX-A","title":"Will it?","yes_bid":40,"yes_ask":47,"volume":5000,"open_interest":4000,"liquidity":90000}],"cursor":"abc"}"#;
        let response: KalshiMarketsResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.markets.len(), 1);
        let market = MarketSummary::from(response.markets[0].clone());
        assert_eq!(market.spread(), 7);
        assert_eq!(market.liquidity, 90_000);
    }

    #[test]
    fn positions_response_maps_to_domain() {
        let json = r#"{"market_positions":[{"ticker":"KX-A","position":-3},{"ticker":"KX-B","position":8}]}"#;
        let positions: Vec<MarketPosition> =
            serde_json::from_str::<KalshiPositionsResponse>(json).unwrap().into();

        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].position, -3);
        assert_eq!(positions[1].ticker.as_str(), "KX-B");
    }

    #[test]
    fn yes_order_body_carries_yes_price_only() {
        let order = OrderRequest {
            ticker: MarketTicker::new("KX-A"),
            action: Action::Buy,
            side: Side::Yes,
            count: 2,
            price: 49,
        };
        let body = serde_json::to_value(KalshiCreateOrderBody::limit(&order, "cid".into())).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "action": "buy",
                "count": 2,
                "type": "limit",
                "ticker": "KX-A",
                "side": "yes",
                "client_order_id": "cid",
                "yes_price": 49
            })
        );
    }

    #[test]
    fn no_order_body_carries_no_price_only() {
        let order = OrderRequest {
            ticker: MarketTicker::new("KX-A"),
            action: Action::Buy,
            side: Side::No,
            count: 2,
            price: 47,
        };
        let body = serde_json::to_value(KalshiCreateOrderBody::limit(&order, "cid".into())).unwrap();

        assert_eq!(body["no_price"], 47);
        assert!(body.get("yes_price").is_none());
    }

    #[test]
    fn error_body_converts_to_exchange_error() {
        let json = r#"{"error":{"code":"insufficient_balance","message":"not enough"}}"#;
        let err: ExchangeError = serde_json::from_str::<KalshiErrorResponse>(json).unwrap().into();
        assert!(err.is_insufficient_balance());
        assert_eq!(err.message, "not enough");
    }

    #[test]
    fn order_response_yields_ack() {
        let json = r#"{"order":{"order_id":"ord-1","status":"resting"}}"#;
        let ack: OrderAck = serde_json::from_str::<KalshiCreateOrderResponse>(json).unwrap().into();
        assert_eq!(ack.order_id.as_str(), "ord-1");
    }
}
