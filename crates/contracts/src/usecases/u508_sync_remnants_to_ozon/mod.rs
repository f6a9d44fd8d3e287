pub mod import_result;
pub mod price;
pub mod report;
pub mod stock;

pub use import_result::{ImportItemError, ImportItemResult, ImportResponse};
pub use price::PriceUpdate;
pub use report::{DispatchSummary, SyncReport};
pub use stock::StockUpdate;

/// Синхронизация остатков и цен поставщика с OZON
pub struct SyncRemnantsToOzon;

impl SyncRemnantsToOzon {
    pub const INDEX: &'static str = "u508";
    pub const NAME: &'static str = "sync_remnants_to_ozon";
    pub const DISPLAY_NAME: &'static str = "Выгрузка остатков и цен в OZON";
    pub const DESCRIPTION: &'static str =
        "Загрузка файла остатков поставщика и обновление остатков и цен товаров OZON";

    /// Полное имя вида "u508_sync_remnants_to_ozon"
    pub fn full_name() -> String {
        format!("{}_{}", Self::INDEX, Self::NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(SyncRemnantsToOzon::full_name(), "u508_sync_remnants_to_ozon");
    }
}
