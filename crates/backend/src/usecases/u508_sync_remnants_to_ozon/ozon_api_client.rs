use crate::shared::config::{Credentials, OzonConfig};
use crate::shared::error::SyncError;
use async_trait::async_trait;
use contracts::usecases::u508_sync_remnants_to_ozon::{ImportResponse, PriceUpdate, StockUpdate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Операции OZON Seller API, нужные для выгрузки остатков
#[async_trait]
pub trait SellerApi: Send + Sync {
    /// Одна страница каталога продавца
    async fn fetch_product_list(
        &self,
        last_id: &str,
        limit: u32,
    ) -> Result<OzonProductListResult, SyncError>;

    async fn import_prices(&self, prices: &[PriceUpdate]) -> Result<ImportResponse, SyncError>;

    async fn import_stocks(&self, stocks: &[StockUpdate]) -> Result<ImportResponse, SyncError>;
}

/// HTTP-клиент для работы с OZON Seller API
pub struct OzonApiClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    request_log: Option<PathBuf>,
}

impl OzonApiClient {
    pub fn new(
        config: &OzonConfig,
        credentials: Credentials,
        request_log: Option<PathBuf>,
    ) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SyncError::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            request_log,
        })
    }

    /// Записать в лог-файл
    fn log_to_file(&self, message: &str) {
        let Some(path) = &self.request_log else {
            return;
        };
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] {}", timestamp, message);
        }
    }

    async fn post_json<Req, Resp>(&self, path: &str, request_body: &Req) -> Result<Resp, SyncError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned + Send,
    {
        let url = format!("{}{}", self.base_url, path);

        let body = serde_json::to_string(request_body)?;
        self.log_to_file(&format!(
            "=== REQUEST ===\nPOST {}\nClient-Id: {}\nApi-Key: ****\nBody: {}",
            url, self.credentials.client_id, body
        ));

        let response = self
            .client
            .post(&url)
            .header("Client-Id", &self.credentials.client_id)
            .header("Api-Key", &self.credentials.api_key)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        self.log_to_file(&format!("Response status: {}", status));

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            self.log_to_file(&format!("ERROR Response body:\n{}", body));
            tracing::error!("OZON API request {} failed: {}", path, body);
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        self.log_to_file(&format!("=== RESPONSE BODY ===\n{}\n", body));

        match serde_json::from_str::<Resp>(&body) {
            Ok(data) => Ok(data),
            Err(e) => {
                let preview: String = body.chars().take(500).collect();
                tracing::error!("Failed to parse OZON API response from {}: {}", path, e);
                Err(SyncError::data_shape(format!(
                    "failed to parse OZON API JSON from {}: {}. Body: {}",
                    path, e, preview
                )))
            }
        }
    }
}

#[async_trait]
impl SellerApi for OzonApiClient {
    /// POST /v2/product/list
    async fn fetch_product_list(
        &self,
        last_id: &str,
        limit: u32,
    ) -> Result<OzonProductListResult, SyncError> {
        let request_body = OzonProductListRequest {
            filter: OzonProductListFilter {
                visibility: "ALL".to_string(),
            },
            last_id: last_id.to_string(),
            limit,
        };

        let response: OzonProductListResponse =
            self.post_json("/v2/product/list", &request_body).await?;
        Ok(response.result)
    }

    /// POST /v1/product/import/prices
    async fn import_prices(&self, prices: &[PriceUpdate]) -> Result<ImportResponse, SyncError> {
        self.post_json("/v1/product/import/prices", &OzonImportPricesRequest { prices })
            .await
    }

    /// POST /v1/product/import/stocks
    async fn import_stocks(&self, stocks: &[StockUpdate]) -> Result<ImportResponse, SyncError> {
        self.post_json("/v1/product/import/stocks", &OzonImportStocksRequest { stocks })
            .await
    }
}

// ============================================================================
// Request/Response structures
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct OzonProductListRequest {
    pub filter: OzonProductListFilter,
    pub last_id: String,
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OzonProductListFilter {
    pub visibility: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OzonProductListResponse {
    pub result: OzonProductListResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OzonProductListResult {
    #[serde(default)]
    pub items: Vec<OzonProductListItem>,
    pub total: u64,
    #[serde(default)]
    pub last_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OzonProductListItem {
    pub offer_id: String,
}

#[derive(Debug, Serialize)]
struct OzonImportPricesRequest<'a> {
    prices: &'a [PriceUpdate],
}

#[derive(Debug, Serialize)]
struct OzonImportStocksRequest<'a> {
    stocks: &'a [StockUpdate],
}
