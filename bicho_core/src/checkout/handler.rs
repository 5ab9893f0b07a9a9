use std::future::Future;

use log::{debug, error, info, warn};
use reqwest::Client;

use super::dto::{CheckoutFailure, CheckoutReceipt, PlaceBetRequest, PlaceBetResponse, RpcErrorBody};
use crate::bet::store::BetStore;
use crate::error::CheckoutError;
use crate::helpers::config::Config;

const PLACE_BET_PROCEDURE: &str = "place_bet";

/// Anything able to run the remote `place_bet` procedure.
pub trait BetPlacer {
    fn place_bet(
        &self,
        request: &PlaceBetRequest,
    ) -> impl Future<Output = Result<PlaceBetResponse, CheckoutError>> + Send;
}

/// `place_bet` over the Supabase REST RPC endpoint.
#[derive(Clone)]
pub struct SupabaseRpc {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl SupabaseRpc {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        access_token: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            access_token,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.supabase_url.clone(),
            config.supabase_anon_key.clone(),
            config.supabase_access_token.clone(),
        )
    }

    fn endpoint(&self, procedure: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url.trim_end_matches('/'), procedure)
    }
}

impl BetPlacer for SupabaseRpc {
    async fn place_bet(&self, request: &PlaceBetRequest) -> Result<PlaceBetResponse, CheckoutError> {
        let url = self.endpoint(PLACE_BET_PROCEDURE);
        let token = self.access_token.as_deref().unwrap_or(&self.api_key);
        debug!("🌐 Calling {} for {} palpites", url, request.palpites.len());

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .json(request)
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status();
                debug!("📡 place_bet response status: {}", status);

                if status.is_success() {
                    let body: PlaceBetResponse = resp.json().await?;
                    Ok(body)
                } else {
                    let error_body = resp
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unable to read error body".to_string());
                    error!("❌ place_bet responded with status {}: {}", status, error_body);

                    // A procedure that raises comes back as a PostgREST error
                    // object carrying the message meant for the player.
                    if status.is_client_error() {
                        if let Ok(rpc_error) = serde_json::from_str::<RpcErrorBody>(&error_body) {
                            return Err(CheckoutError::Rejected(rpc_error.message));
                        }
                    }

                    let message = match status.as_u16() {
                        401 => "Authentication failed - API key or token is invalid".to_string(),
                        403 => "Access forbidden - insufficient permissions".to_string(),
                        404 => "place_bet procedure not found".to_string(),
                        429 => "Too many requests - rate limit exceeded".to_string(),
                        _ => error_body,
                    };
                    warn!("⚠️ {}", message);

                    Err(CheckoutError::Status {
                        status: status.as_u16(),
                        message,
                    })
                }
            }
            Err(network_error) => {
                error!("❌ Network error during place_bet: {}", network_error);
                if network_error.is_timeout() {
                    error!("⏰ Request timed out");
                } else if network_error.is_connect() {
                    error!("🔌 Connection failed - backend may be down");
                }
                Err(network_error.into())
            }
        }
    }
}

/// Submits the cart item by item. Accepted items leave the cart; the first
/// failure stops the checkout and leaves the remaining items untouched so
/// the player can resubmit. There is no retry.
pub async fn submit_cart<P: BetPlacer>(
    store: &mut BetStore,
    placer: &P,
) -> Result<CheckoutReceipt, CheckoutFailure> {
    let mut receipt = CheckoutReceipt::default();
    if store.items().is_empty() {
        return Err(CheckoutFailure {
            accepted: receipt,
            error: CheckoutError::EmptyCart,
        });
    }

    let queue = store.items().to_vec();
    for item in queue {
        let request = PlaceBetRequest::from(&item);
        let result = match placer.place_bet(&request).await {
            Ok(response) if response.success => Ok(response),
            Ok(response) => Err(CheckoutError::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "Aposta recusada".to_string()),
            )),
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => {
                store.remove_item(&item.id);
                if let Some(pule) = response.pule {
                    info!("✅ Bet {} accepted with pule {}", item.id, pule);
                    receipt.pules.push(pule);
                }
                if response.saldo.is_some() {
                    receipt.saldo = response.saldo;
                }
            }
            Err(error) => {
                warn!("⚠️ Checkout stopped at bet {}: {}", item.id, error);
                return Err(CheckoutFailure {
                    accepted: receipt,
                    error,
                });
            }
        }
    }

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet::store::tests::line;
    use serde_json::json;
    use std::sync::Mutex;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Accepts bets until `fail_at` (0-based call index), then rejects.
    struct FakePlacer {
        calls: Mutex<Vec<PlaceBetRequest>>,
        fail_at: Option<usize>,
    }

    impl FakePlacer {
        fn new(fail_at: Option<usize>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at,
            }
        }
    }

    impl BetPlacer for FakePlacer {
        async fn place_bet(&self, request: &PlaceBetRequest) -> Result<PlaceBetResponse, CheckoutError> {
            let mut calls = self.calls.lock().unwrap();
            let index = calls.len();
            calls.push(request.clone());

            if Some(index) == self.fail_at {
                return Ok(PlaceBetResponse {
                    success: false,
                    error: Some("Saldo insuficiente".to_string()),
                    ..Default::default()
                });
            }
            Ok(PlaceBetResponse {
                success: true,
                pule: Some(format!("PULE-{}", index + 1)),
                saldo: Some(100.0 - index as f64),
                error: None,
            })
        }
    }

    fn cart_with(count: usize) -> BetStore {
        let mut store = BetStore::new();
        for i in 0..count {
            let palpite = format!("{:04}", i);
            store.add_pending_item(line(&[palpite.as_str()], 1.0));
        }
        store
            .finalize_pending_items(&["ptrio-1120".to_string()], &["11:20".to_string()])
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_submit_cart_accepts_everything() {
        let mut store = cart_with(2);
        let placer = FakePlacer::new(None);

        let receipt = submit_cart(&mut store, &placer).await.unwrap();
        assert_eq!(receipt.pules, vec!["PULE-1", "PULE-2"]);
        assert_eq!(receipt.saldo, Some(99.0));
        assert!(store.items().is_empty());

        let calls = placer.calls.lock().unwrap();
        assert_eq!(calls[0].loterias, vec!["ptrio-1120"]);
        assert_eq!(calls[0].colocacao, "1");
    }

    #[tokio::test]
    async fn test_submit_cart_stops_at_first_rejection() {
        let mut store = cart_with(3);
        let placer = FakePlacer::new(Some(1));

        let failure = submit_cart(&mut store, &placer).await.unwrap_err();
        assert!(matches!(&failure.error, CheckoutError::Rejected(m) if m == "Saldo insuficiente"));
        assert_eq!(failure.accepted.pules, vec!["PULE-1"]);
        assert_eq!(store.items().len(), 2);
        assert_eq!(placer.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_empty_cart() {
        let mut store = BetStore::new();
        let failure = submit_cart(&mut store, &FakePlacer::new(None)).await.unwrap_err();
        assert!(matches!(failure.error, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_supabase_rpc_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/place_bet"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer user-token"))
            .and(body_partial_json(json!({
                "p_tipo": "loterias",
                "p_modalidade": "milhar",
                "p_palpites": ["0000"],
                "p_data": "2026-10-22"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "pule": "000123",
                "saldo": 42.5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rpc = SupabaseRpc::new(server.uri(), "anon-key", Some("user-token".to_string()));
        let store = cart_with(1);
        let response = rpc
            .place_bet(&PlaceBetRequest::from(&store.items()[0]))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.pule.as_deref(), Some("000123"));
        assert_eq!(response.saldo, Some(42.5));
    }

    #[tokio::test]
    async fn test_supabase_rpc_raised_exception_is_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/place_bet"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "P0001",
                "message": "Horário encerrado"
            })))
            .mount(&server)
            .await;

        let rpc = SupabaseRpc::new(format!("{}/", server.uri()), "anon-key", None);
        let store = cart_with(1);
        let err = rpc
            .place_bet(&PlaceBetRequest::from(&store.items()[0]))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Rejected(m) if m == "Horário encerrado"));
    }

    #[tokio::test]
    async fn test_supabase_rpc_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let rpc = SupabaseRpc::new(server.uri(), "anon-key", None);
        let store = cart_with(1);
        let err = rpc
            .place_bet(&PlaceBetRequest::from(&store.items()[0]))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Status { status: 503, .. }));
    }
}
