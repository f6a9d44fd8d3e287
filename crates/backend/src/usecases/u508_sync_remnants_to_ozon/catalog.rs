use super::ozon_api_client::SellerApi;
use crate::shared::error::SyncError;

/// Получить артикулы всех товаров магазина OZON.
///
/// Страницы запрашиваются по курсору `last_id`, пока число собранных товаров
/// не сравняется с `total`. Пустая страница, курсор, который не сдвинулся,
/// или превышение `max_pages` при недобранном `total` считаются ошибкой:
/// иначе цикл никогда не закончится.
pub async fn list_offer_ids(
    api: &dyn SellerApi,
    page_limit: u32,
    max_pages: u32,
) -> Result<Vec<String>, SyncError> {
    let mut last_id = String::new();
    let mut offer_ids: Vec<String> = Vec::new();
    let mut pages = 0u32;

    loop {
        if pages >= max_pages {
            return Err(SyncError::PaginationStalled(format!(
                "exceeded {} pages with {} items collected",
                max_pages,
                offer_ids.len()
            )));
        }

        let page = api.fetch_product_list(&last_id, page_limit).await?;
        pages += 1;

        let received = page.items.len();
        offer_ids.extend(page.items.into_iter().map(|item| item.offer_id));
        tracing::debug!(
            "Product list page {}: {} items, {}/{} collected",
            pages,
            received,
            offer_ids.len(),
            page.total
        );

        if offer_ids.len() as u64 >= page.total {
            break;
        }
        if received == 0 {
            return Err(SyncError::PaginationStalled(format!(
                "empty page after {} of {} items",
                offer_ids.len(),
                page.total
            )));
        }
        if page.last_id == last_id {
            return Err(SyncError::PaginationStalled(format!(
                "cursor '{}' did not advance after {} of {} items",
                last_id,
                offer_ids.len(),
                page.total
            )));
        }
        last_id = page.last_id;
    }

    tracing::info!(
        "Fetched {} offer ids from OZON in {} pages",
        offer_ids.len(),
        pages
    );
    Ok(offer_ids)
}
