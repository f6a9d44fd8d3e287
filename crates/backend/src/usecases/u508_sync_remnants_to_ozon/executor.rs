use super::catalog::list_offer_ids;
use super::dispatcher::{dispatch_prices, dispatch_stocks};
use super::ozon_api_client::{OzonApiClient, SellerApi};
use super::reconciler::{derive_prices, derive_stocks, in_stock, OfferIds};
use super::remnants_source::{HttpRemnantsSource, RemnantRow, RemnantsSource};
use crate::shared::config::{resolve_path, Config, Credentials};
use crate::shared::error::SyncError;
use contracts::usecases::u508_sync_remnants_to_ozon::{
    PriceUpdate, StockUpdate, SyncRemnantsToOzon, SyncReport,
};
use std::sync::Arc;

/// Executor для UseCase выгрузки остатков и цен в OZON
pub struct SyncExecutor {
    api: Arc<dyn SellerApi>,
    remnants_source: Arc<dyn RemnantsSource>,
    config: Config,
}

impl SyncExecutor {
    pub fn new(
        api: Arc<dyn SellerApi>,
        remnants_source: Arc<dyn RemnantsSource>,
        config: Config,
    ) -> Self {
        Self {
            api,
            remnants_source,
            config,
        }
    }

    /// Боевые клиенты OZON и поставщика
    pub fn from_config(config: Config, credentials: Credentials) -> Result<Self, SyncError> {
        let request_log = resolve_path(&config.logging.dir).join(&config.logging.request_log);
        let api = OzonApiClient::new(&config.ozon, credentials, Some(request_log))?;
        let remnants_source =
            HttpRemnantsSource::new(config.remnants.clone(), config.ozon.timeout_secs)?;

        Ok(Self::new(Arc::new(api), Arc::new(remnants_source), config))
    }

    pub async fn fetch_offer_ids(&self) -> Result<OfferIds, SyncError> {
        let offer_ids = list_offer_ids(
            self.api.as_ref(),
            self.config.ozon.page_limit,
            self.config.ozon.max_pages,
        )
        .await?;
        let offer_ids = OfferIds::new(offer_ids);
        if offer_ids.is_empty() {
            tracing::warn!("OZON catalog is empty, nothing will be updated");
        }
        Ok(offer_ids)
    }

    pub async fn fetch_remnants(&self) -> Result<Vec<RemnantRow>, SyncError> {
        self.remnants_source.fetch_remnants().await
    }

    /// Полный запуск: остатки, затем цены
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        tracing::info!("Starting {}", SyncRemnantsToOzon::full_name());

        let offer_ids = self.fetch_offer_ids().await?;
        let remnants = self.fetch_remnants().await?;

        let derivation = derive_stocks(&remnants, &offer_ids)?;
        tracing::info!(
            "Stocks derived: {} matched in remnants, {} missing set to 0",
            derivation.stocks.len() - derivation.remaining.len(),
            derivation.remaining.len()
        );
        let stocks_summary = dispatch_stocks(
            self.api.as_ref(),
            &derivation.stocks,
            self.config.batch.stock_chunk()?,
        )
        .await?;

        let prices = derive_prices(&remnants, &offer_ids)?;
        tracing::info!("Prices derived: {}", prices.len());
        let prices_summary = dispatch_prices(
            self.api.as_ref(),
            &prices,
            self.config.batch.price_chunk()?,
        )
        .await?;

        let report = SyncReport {
            offer_ids: offer_ids.len(),
            remnant_rows: remnants.len(),
            in_stock: in_stock(&derivation.stocks).len(),
            stocks: stocks_summary,
            prices: prices_summary,
        };
        tracing::info!("{} finished: {:?}", SyncRemnantsToOzon::full_name(), report);
        Ok(report)
    }

    /// Обновить только остатки.
    ///
    /// Возвращает товары с ненулевым остатком и полный список остатков.
    pub async fn upload_stocks(
        &self,
        remnants: &[RemnantRow],
    ) -> Result<(Vec<StockUpdate>, Vec<StockUpdate>), SyncError> {
        let offer_ids = self.fetch_offer_ids().await?;
        let stocks = derive_stocks(remnants, &offer_ids)?.stocks;
        dispatch_stocks(
            self.api.as_ref(),
            &stocks,
            self.config.batch.stock_chunk()?,
        )
        .await?;

        let not_empty = in_stock(&stocks).into_iter().cloned().collect();
        Ok((not_empty, stocks))
    }

    /// Обновить только цены
    pub async fn upload_prices(&self, remnants: &[RemnantRow]) -> Result<Vec<PriceUpdate>, SyncError> {
        let offer_ids = self.fetch_offer_ids().await?;
        let prices = derive_prices(remnants, &offer_ids)?;
        dispatch_prices(
            self.api.as_ref(),
            &prices,
            self.config.batch.price_chunk()?,
        )
        .await?;
        Ok(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{row, MockSellerApi, StaticRemnants};
    use super::*;
    use crate::shared::config::default_config;
    use contracts::usecases::u508_sync_remnants_to_ozon::DispatchSummary;

    fn build_executor(api: Arc<MockSellerApi>, remnants: Vec<RemnantRow>) -> SyncExecutor {
        SyncExecutor::new(
            api,
            Arc::new(StaticRemnants(remnants)),
            default_config().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let api = Arc::new(MockSellerApi::with_catalog(&["A", "B"], 1000));
        let executor = build_executor(api.clone(), vec![row("A", ">10", "1'000.00")]);

        let report = executor.run().await.unwrap();

        let stock_batches = api.stock_batches.lock().unwrap();
        assert_eq!(
            *stock_batches,
            vec![vec![StockUpdate::new("A", 100), StockUpdate::new("B", 0)]]
        );
        let price_batches = api.price_batches.lock().unwrap();
        assert_eq!(*price_batches, vec![vec![PriceUpdate::new("A", "1000")]]);

        assert_eq!(
            report,
            SyncReport {
                offer_ids: 2,
                remnant_rows: 1,
                in_stock: 1,
                stocks: DispatchSummary {
                    items: 2,
                    batches: 1,
                    rejected: 0
                },
                prices: DispatchSummary {
                    items: 1,
                    batches: 1,
                    rejected: 0
                },
            }
        );
    }

    #[tokio::test]
    async fn test_run_stops_before_prices_when_stocks_fail() {
        let mut mock = MockSellerApi::with_catalog(&["A"], 1000);
        mock.fail_stock_call = Some(0);
        let api = Arc::new(mock);
        let executor = build_executor(api.clone(), vec![row("A", "3", "10.00")]);

        let result = executor.run().await;

        assert!(matches!(result, Err(SyncError::Server { .. })));
        assert!(api.price_batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_bad_quantity_aborts_before_upload() {
        let api = Arc::new(MockSellerApi::with_catalog(&["A"], 1000));
        let executor = build_executor(api.clone(), vec![row("A", "n/a", "10.00")]);

        let result = executor.run().await;

        assert!(matches!(result, Err(SyncError::DataShape(_))));
        assert!(api.stock_batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_stocks_returns_not_empty() {
        let api = Arc::new(MockSellerApi::with_catalog(&["A", "B", "C"], 2));
        let executor = build_executor(api.clone(), Vec::new());
        let remnants = vec![row("A", "5", "1.00"), row("B", "1", "1.00")];

        let (not_empty, stocks) = executor.upload_stocks(&remnants).await.unwrap();

        assert_eq!(not_empty, vec![StockUpdate::new("A", 5)]);
        assert_eq!(stocks.len(), 3);
        assert_eq!(api.stock_batches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_prices_skips_unknown_offers() {
        let api = Arc::new(MockSellerApi::with_catalog(&["A"], 1000));
        let executor = build_executor(api.clone(), Vec::new());
        let remnants = vec![row("A", "5", "2'500.00"), row("Q", "5", "3'000.00")];

        let prices = executor.upload_prices(&remnants).await.unwrap();

        assert_eq!(prices, vec![PriceUpdate::new("A", "2500")]);
    }

    #[tokio::test]
    async fn test_empty_catalog_uploads_nothing() {
        let api = Arc::new(MockSellerApi::with_catalog(&[], 1000));
        let executor = build_executor(api.clone(), vec![row("A", "5", "1.00")]);

        let report = executor.run().await.unwrap();

        assert_eq!(report.offer_ids, 0);
        assert_eq!(report.stocks, DispatchSummary::default());
        assert_eq!(report.prices, DispatchSummary::default());
        assert!(api.stock_batches.lock().unwrap().is_empty());
        assert!(api.price_batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stocks_only_from_fetched_remnants() {
        let api = Arc::new(MockSellerApi::with_catalog(&["A", "B"], 1000));
        let executor = build_executor(api.clone(), vec![row("B", ">10", "1.00")]);

        let remnants = executor.fetch_remnants().await.unwrap();
        let (not_empty, _) = executor.upload_stocks(&remnants).await.unwrap();

        assert_eq!(not_empty, vec![StockUpdate::new("B", 100)]);
        assert!(api.price_batches.lock().unwrap().is_empty());
    }
}
