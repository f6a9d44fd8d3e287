use serde::{Deserialize, Serialize};

/// Ответ OZON на импорт цен или остатков
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportResponse {
    #[serde(default)]
    pub result: Vec<ImportItemResult>,
}

/// Результат обновления одного товара
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportItemResult {
    #[serde(default)]
    pub product_id: i64,
    pub offer_id: String,
    #[serde(default)]
    pub updated: bool,
    #[serde(default)]
    pub errors: Vec<ImportItemError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportItemError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl ImportItemResult {
    /// OZON вернул 200, но товар не обновлен
    pub fn is_rejected(&self) -> bool {
        !self.updated || !self.errors.is_empty()
    }
}

impl ImportResponse {
    pub fn rejected(&self) -> impl Iterator<Item = &ImportItemResult> {
        self.result.iter().filter(|item| item.is_rejected())
    }
}
