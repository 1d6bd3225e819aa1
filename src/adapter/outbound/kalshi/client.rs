//! Kalshi REST API client.
//!
//! Every call is signed with the account's RSA key. The signed path is the
//! full URL path including the API version prefix, without the query string.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use super::dto::response::{
    KalshiBalanceResponse, KalshiCreateOrderBody, KalshiCreateOrderResponse, KalshiErrorResponse,
    KalshiMarketResponse, KalshiMarketsResponse, KalshiPositionsResponse,
};
use super::settings::KalshiConfig;
use super::signer::Signer;
use crate::domain::{Balance, MarketPosition, MarketSummary, MarketTicker, OrderId};
use crate::error::{Error, ExchangeError, Result};
use crate::port::{OrderAck, OrderRequest, TradingGateway};

/// Authenticated HTTP client for the Kalshi trading API.
pub struct KalshiClient {
    http: HttpClient,
    /// Base URL, e.g. `https://api.elections.kalshi.com/trade-api/v2`.
    base_url: String,
    /// Path component of `base_url`, prepended to endpoints when signing.
    base_path: String,
    signer: Arc<Signer>,
}

impl KalshiClient {
    /// Create a client with default HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn new(base_url: &str, signer: Arc<Signer>) -> Result<Self> {
        Self::with_http(HttpClient::new(), base_url, signer)
    }

    /// Create a client from exchange configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured API URL is not a valid URL.
    pub fn from_config(config: &KalshiConfig, signer: Arc<Signer>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(Duration::from_millis(config.http_connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self::with_http(http, &config.api_url, signer)
    }

    fn with_http(http: HttpClient, base_url: &str, signer: Arc<Signer>) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base_path = Url::parse(&base_url)?.path().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            base_path,
            signer,
        })
    }

    /// Path covered by the signature for `endpoint`.
    fn signed_path(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_path, endpoint)
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, endpoint))
    }

    /// Sign, send, and decode one request.
    async fn execute<T>(&self, method: Method, endpoint: &str, builder: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let headers = self
            .signer
            .sign(method.as_str(), &self.signed_path(endpoint))?
            .to_header_map()?;

        debug!(method = %method, endpoint, "Sending request");
        let response = builder.headers(headers).send().await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            let decoded = decode_success(&body);
            if let Err(err) = &decoded {
                warn!(method = %method, endpoint, error = %err, "Request rejected");
            }
            return decoded;
        }

        let body = response.text().await.unwrap_or_default();
        let err = decode_error(status, &body);
        warn!(method = %method, endpoint, status = status.as_u16(), error = %err, "Request failed");
        Err(err)
    }
}

/// Decode a 2xx body. An `error` object wins over the success shape, since
/// the exchange reports rejections such as insufficient balance in-band.
fn decode_success<T: DeserializeOwned>(body: &str) -> Result<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.get("error").is_some_and(|e| !e.is_null()) {
        let parsed: KalshiErrorResponse = serde_json::from_value(value)?;
        return Err(ExchangeError::from(parsed).into());
    }
    Ok(serde_json::from_value(value)?)
}

/// Classify a non-2xx response body.
///
/// Structured `{"error": {...}}` bodies become [`ExchangeError`]; anything
/// else is a transport-level failure.
fn decode_error(status: StatusCode, body: &str) -> Error {
    match serde_json::from_str::<KalshiErrorResponse>(body) {
        Ok(parsed) => ExchangeError::from(parsed).into(),
        Err(_) => Error::HttpStatus {
            status: status.as_u16(),
            body: body.to_string(),
        },
    }
}

#[async_trait]
impl TradingGateway for KalshiClient {
    async fn get_markets(&self, limit: usize, status: &str) -> Result<Vec<MarketSummary>> {
        let endpoint = "/markets";
        let builder = self
            .request(Method::GET, endpoint)
            .query(&[("limit", limit.to_string()), ("status", status.to_string())]);

        let response: KalshiMarketsResponse = self.execute(Method::GET, endpoint, builder).await?;
        debug!(count = response.markets.len(), "Fetched markets");

        Ok(response.markets.into_iter().map(MarketSummary::from).collect())
    }

    async fn get_market(&self, ticker: &MarketTicker) -> Result<MarketSummary> {
        let endpoint = format!("/markets/{ticker}");
        let builder = self.request(Method::GET, &endpoint);
        let response: KalshiMarketResponse = self.execute(Method::GET, &endpoint, builder).await?;
        Ok(response.market.into())
    }

    async fn get_balance(&self) -> Result<Balance> {
        let endpoint = "/portfolio/balance";
        let builder = self.request(Method::GET, endpoint);
        let response: KalshiBalanceResponse = self.execute(Method::GET, endpoint, builder).await?;
        Ok(response.into())
    }

    async fn get_positions(&self) -> Result<Vec<MarketPosition>> {
        let endpoint = "/portfolio/positions";
        let builder = self.request(Method::GET, endpoint);
        let response: KalshiPositionsResponse =
            self.execute(Method::GET, endpoint, builder).await?;
        Ok(response.into())
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<OrderAck> {
        let endpoint = "/portfolio/orders";
        let body = KalshiCreateOrderBody::limit(order, uuid::Uuid::new_v4().to_string());
        let builder = self.request(Method::POST, endpoint).json(&body);

        let response: KalshiCreateOrderResponse =
            self.execute(Method::POST, endpoint, builder).await?;
        let ack = OrderAck::from(response);

        info!(
            ticker = %order.ticker,
            side = %order.side,
            price = order.price,
            count = order.count,
            order_id = %ack.order_id,
            "Order placed"
        );
        Ok(ack)
    }

    async fn cancel_order(&self, order_id: &OrderId) -> Result<()> {
        let endpoint = format!("/portfolio/orders/{order_id}");
        let builder = self.request(Method::DELETE, &endpoint);
        let _: serde_json::Value = self.execute(Method::DELETE, &endpoint, builder).await?;
        info!(order_id = %order_id, "Order cancelled");
        Ok(())
    }

    fn exchange_name(&self) -> &'static str {
        "Kalshi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::RsaPrivateKey;
    use std::sync::OnceLock;

    fn signer() -> Arc<Signer> {
        static SIGNER: OnceLock<Arc<Signer>> = OnceLock::new();
        SIGNER
            .get_or_init(|| {
                let key = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
                Arc::new(Signer::new("key", key))
            })
            .clone()
    }

    #[test]
    fn signed_path_includes_api_prefix() {
        let client =
            KalshiClient::new("https://api.elections.kalshi.com/trade-api/v2/", signer()).unwrap();
        assert_eq!(
            client.signed_path("/portfolio/orders"),
            "/trade-api/v2/portfolio/orders"
        );
    }

    #[test]
    fn signed_path_for_bare_host() {
        let client = KalshiClient::new("http://localhost:8080", signer()).unwrap();
        assert_eq!(client.signed_path("/markets"), "/markets");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            KalshiClient::new("not a url", signer()),
            Err(Error::Url(_))
        ));
    }

    #[test]
    fn structured_error_body_becomes_exchange_error() {
        let err = decode_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":"insufficient_balance","message":"no funds"}}"#,
        );
        assert!(err.as_exchange().is_some_and(ExchangeError::is_insufficient_balance));
    }

    #[test]
    fn unstructured_error_body_is_transport_failure() {
        let err = decode_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(matches!(err, Error::HttpStatus { status: 502, .. }));
        assert!(err.as_exchange().is_none());
    }

    #[test]
    fn success_body_with_error_object_is_exchange_error() {
        let result: Result<KalshiCreateOrderResponse> =
            decode_success(r#"{"error":{"code":"insufficient_balance","message":"no funds"}}"#);
        let err = result.unwrap_err();
        assert!(err.as_exchange().is_some_and(ExchangeError::is_insufficient_balance));
    }

    #[test]
    fn success_body_decodes_order() {
        let response: KalshiCreateOrderResponse =
            decode_success(r#"{"order":{"order_id":"abc","status":"resting"},"error":null}"#).unwrap();
        assert_eq!(response.order.order_id, "abc");
    }

    #[test]
    fn empty_success_body_is_accepted_for_untyped_responses() {
        let value: serde_json::Value = decode_success("").unwrap();
        assert!(value.is_null());
    }

    /// Serve one canned HTTP response and return the raw request it got.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/trade-api/v2", listener.local_addr().unwrap());
        let task = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text
                        .to_ascii_lowercase()
                        .lines()
                        .find_map(|line| {
                            line.strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length || n == 0 {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });
        (url, task)
    }

    fn order() -> OrderRequest {
        OrderRequest::buy(
            MarketTicker::new("KX-A"),
            &crate::domain::TargetOrder {
                side: crate::domain::Side::Yes,
                price: 48,
                size: 1,
            },
        )
    }

    #[tokio::test]
    async fn create_order_reports_in_band_insufficient_balance() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"error":{"code":"insufficient_balance","message":"no funds"}}"#,
        )
        .await;
        let client = KalshiClient::new(&url, signer()).unwrap();

        let err = client.create_order(&order()).await.unwrap_err();

        assert!(err.as_exchange().is_some_and(ExchangeError::is_insufficient_balance));
        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("post /trade-api/v2/portfolio/orders"));
        assert!(request.contains("kalshi-access-signature:"));
    }

    #[tokio::test]
    async fn create_order_returns_exchange_order_id() {
        let (url, _server) =
            serve_once("HTTP/1.1 201 Created", r#"{"order":{"order_id":"ord-9"}}"#).await;
        let client = KalshiClient::new(&url, signer()).unwrap();

        let ack = client.create_order(&order()).await.unwrap();

        assert_eq!(ack.order_id.as_str(), "ord-9");
    }

    #[tokio::test]
    async fn cancel_order_surfaces_in_band_error() {
        let (url, _server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"error":{"code":"not_found","message":"order not found"}}"#,
        )
        .await;
        let client = KalshiClient::new(&url, signer()).unwrap();

        let err = client.cancel_order(&OrderId::new("gone")).await.unwrap_err();

        assert_eq!(err.as_exchange().map(|e| e.code.as_str()), Some("not_found"));
    }

    #[test]
    fn exchange_name_is_kalshi() {
        let client = KalshiClient::new("http://localhost", signer()).unwrap();
        assert_eq!(client.exchange_name(), "Kalshi");
    }
}
