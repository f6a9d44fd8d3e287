use super::ozon_api_client::SellerApi;
use crate::shared::error::SyncError;
use contracts::usecases::u508_sync_remnants_to_ozon::{
    DispatchSummary, ImportResponse, PriceUpdate, StockUpdate,
};
use std::num::NonZeroUsize;

/// Разделить список на части не больше `size` элементов
pub fn chunk<T>(items: &[T], size: NonZeroUsize) -> Vec<&[T]> {
    items.chunks(size.get()).collect()
}

/// Отправить остатки пачками по `size`
pub async fn dispatch_stocks(
    api: &dyn SellerApi,
    stocks: &[StockUpdate],
    size: NonZeroUsize,
) -> Result<DispatchSummary, SyncError> {
    let batches = chunk(stocks, size);
    let total = batches.len();
    let mut summary = DispatchSummary::default();

    for (idx, batch) in batches.into_iter().enumerate() {
        let response = api.import_stocks(batch).await.map_err(|e| {
            log_batch_failure("stocks", idx, total, summary.items, &e);
            e
        })?;
        record_batch("stocks", idx, total, batch.len(), &response, &mut summary);
    }

    tracing::info!(
        "Stocks uploaded: {} items in {} batches, {} rejected",
        summary.items,
        summary.batches,
        summary.rejected
    );
    Ok(summary)
}

/// Отправить цены пачками по `size`
pub async fn dispatch_prices(
    api: &dyn SellerApi,
    prices: &[PriceUpdate],
    size: NonZeroUsize,
) -> Result<DispatchSummary, SyncError> {
    let batches = chunk(prices, size);
    let total = batches.len();
    let mut summary = DispatchSummary::default();

    for (idx, batch) in batches.into_iter().enumerate() {
        let response = api.import_prices(batch).await.map_err(|e| {
            log_batch_failure("prices", idx, total, summary.items, &e);
            e
        })?;
        record_batch("prices", idx, total, batch.len(), &response, &mut summary);
    }

    tracing::info!(
        "Prices uploaded: {} items in {} batches, {} rejected",
        summary.items,
        summary.batches,
        summary.rejected
    );
    Ok(summary)
}

fn record_batch(
    kind: &str,
    idx: usize,
    total: usize,
    len: usize,
    response: &ImportResponse,
    summary: &mut DispatchSummary,
) {
    summary.items += len;
    summary.batches += 1;

    // HTTP 200 не гарантирует, что обновлены все товары пачки
    for item in response.rejected() {
        summary.rejected += 1;
        let reasons: Vec<String> = item
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect();
        tracing::warn!(
            "OZON did not update {} for offer '{}': {}",
            kind,
            item.offer_id,
            reasons.join("; ")
        );
    }

    tracing::info!("{} chunk {}/{} applied ({} items)", kind, idx + 1, total, len);
}

fn log_batch_failure(kind: &str, idx: usize, total: usize, applied_items: usize, e: &SyncError) {
    tracing::error!(
        "{} chunk {}/{} failed: {}. {} earlier chunks ({} items) remain applied",
        kind,
        idx + 1,
        total,
        e,
        idx,
        applied_items
    );
}
