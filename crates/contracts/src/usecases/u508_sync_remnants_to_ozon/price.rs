use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY_CODE: &str = "RUB";
pub const DEFAULT_OLD_PRICE: &str = "0";
pub const DEFAULT_AUTO_ACTION: &str = "UNKNOWN";

/// Цена товара для POST /v1/product/import/prices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub auto_action_enabled: String,
    pub currency_code: String,
    pub offer_id: String,
    pub old_price: String,
    /// Цена без копеек и разделителей, например "5990"
    pub price: String,
}

impl PriceUpdate {
    pub fn new(offer_id: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            auto_action_enabled: DEFAULT_AUTO_ACTION.to_string(),
            currency_code: DEFAULT_CURRENCY_CODE.to_string(),
            offer_id: offer_id.into(),
            old_price: DEFAULT_OLD_PRICE.to_string(),
            price: price.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_update_serializes_ozon_fields() {
        let price = PriceUpdate::new("087987", "5990");
        let json = serde_json::to_value(&price).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "auto_action_enabled": "UNKNOWN",
                "currency_code": "RUB",
                "offer_id": "087987",
                "old_price": "0",
                "price": "5990",
            })
        );
    }
}
