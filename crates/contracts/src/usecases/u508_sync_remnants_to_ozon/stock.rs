use serde::{Deserialize, Serialize};

/// Остаток товара для POST /v1/product/import/stocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    /// Артикул товара в системе продавца
    pub offer_id: String,

    /// Количество товара (всегда неотрицательное)
    pub stock: u32,
}

impl StockUpdate {
    pub fn new(offer_id: impl Into<String>, stock: u32) -> Self {
        Self {
            offer_id: offer_id.into(),
            stock,
        }
    }

    /// Товар, которого нет у поставщика
    pub fn out_of_stock(offer_id: impl Into<String>) -> Self {
        Self::new(offer_id, 0)
    }
}
