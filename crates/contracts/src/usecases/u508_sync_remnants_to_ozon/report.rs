use serde::{Deserialize, Serialize};

/// Итог выгрузки одного вида обновлений (цены или остатки)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    /// Сколько записей отправлено
    pub items: usize,
    /// Сколько пачек успешно принято API
    pub batches: usize,
    /// Товары, которые OZON принял с ошибкой
    pub rejected: usize,
}

/// Итог запуска синхронизации
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Артикулов в каталоге OZON
    pub offer_ids: usize,
    /// Строк в файле остатков
    pub remnant_rows: usize,
    /// Товаров с ненулевым остатком
    pub in_stock: usize,
    pub stocks: DispatchSummary,
    pub prices: DispatchSummary,
}
