//! Сопоставление файла остатков с каталогом OZON.
//!
//! Каталог (`OfferIds`) не изменяется при расчете остатков: те артикулы,
//! которых не оказалось в файле, возвращаются отдельным списком `remaining`,
//! а расчет цен получает исходный набор.

use super::remnants_source::{Cell, RemnantRow};
use crate::shared::error::SyncError;
use contracts::usecases::u508_sync_remnants_to_ozon::{PriceUpdate, StockUpdate};
use std::collections::HashSet;

/// Остаток, который выставляется при ">10" у поставщика
pub const PLENTY_STOCK: u32 = 100;

/// Артикулы каталога OZON в порядке получения, без повторов
#[derive(Debug, Clone, Default)]
pub struct OfferIds {
    ordered: Vec<String>,
    lookup: HashSet<String>,
}

impl OfferIds {
    pub fn new(offer_ids: impl IntoIterator<Item = String>) -> Self {
        let mut ordered = Vec::new();
        let mut lookup = HashSet::new();
        for offer_id in offer_ids {
            if lookup.insert(offer_id.clone()) {
                ordered.push(offer_id);
            }
        }
        Self { ordered, lookup }
    }

    pub fn contains(&self, offer_id: &str) -> bool {
        self.lookup.contains(offer_id)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.ordered.iter()
    }
}

/// Результат расчета остатков
#[derive(Debug, Clone, Default)]
pub struct StockDerivation {
    pub stocks: Vec<StockUpdate>,
    /// Артикулы каталога, которых нет в файле остатков
    pub remaining: Vec<String>,
}

/// Остатки для всех товаров каталога.
///
/// Сначала идут найденные в файле товары (в порядке файла), затем
/// отсутствующие в файле с остатком 0. Повтор артикула в файле
/// игнорируется: учитывается первая строка.
pub fn derive_stocks(
    remnants: &[RemnantRow],
    offer_ids: &OfferIds,
) -> Result<StockDerivation, SyncError> {
    let mut consumed: HashSet<String> = HashSet::new();
    let mut stocks = Vec::with_capacity(offer_ids.len());

    for row in remnants {
        let offer_id = row.offer_id();
        if !offer_ids.contains(&offer_id) || consumed.contains(&offer_id) {
            continue;
        }
        let stock = parse_quantity(&quantity_token(&row.quantity)).map_err(|e| {
            SyncError::data_shape(format!("offer '{}': {}", offer_id, e))
        })?;
        stocks.push(StockUpdate::new(offer_id.clone(), stock));
        consumed.insert(offer_id);
    }

    let remaining: Vec<String> = offer_ids
        .iter()
        .filter(|offer_id| !consumed.contains(offer_id.as_str()))
        .cloned()
        .collect();
    stocks.extend(remaining.iter().map(StockUpdate::out_of_stock));

    Ok(StockDerivation { stocks, remaining })
}

/// Количество у поставщика: ">10" → 100, "1" → 0, иначе целое число.
///
/// Единичный остаток не выставляется на продажу.
pub fn parse_quantity(raw: &str) -> Result<u32, SyncError> {
    match raw {
        ">10" => Ok(PLENTY_STOCK),
        "1" => Ok(0),
        other => other
            .parse::<u32>()
            .map_err(|e| SyncError::data_shape(format!("invalid quantity '{}': {}", other, e))),
    }
}

/// Текст количества для `parse_quantity`; дробное число в ячейке
/// усекается до целого (3.5 → "3")
fn quantity_token(cell: &Cell) -> String {
    match cell {
        Cell::Number(n) if n.is_finite() => {
            let whole = n.trunc();
            if whole == 0.0 {
                "0".to_string()
            } else {
                whole.to_string()
            }
        }
        other => other.render(),
    }
}

/// Цены для товаров, которые есть и в файле, и в каталоге
pub fn derive_prices(
    remnants: &[RemnantRow],
    offer_ids: &OfferIds,
) -> Result<Vec<PriceUpdate>, SyncError> {
    let mut prices = Vec::new();
    for row in remnants {
        let offer_id = row.offer_id();
        if !offer_ids.contains(&offer_id) {
            continue;
        }
        let raw = row
            .price
            .as_text()
            .map_err(|e| SyncError::data_shape(format!("offer '{}' price: {}", offer_id, e)))?;
        prices.push(PriceUpdate::new(offer_id, normalize_price(raw)));
    }
    Ok(prices)
}

/// "5'990.00" → "5990": отбросить копейки и все, кроме цифр
pub fn normalize_price(raw: &str) -> String {
    let integer_part = raw.split('.').next().unwrap_or_default();
    integer_part.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Товары с ненулевым остатком
pub fn in_stock(stocks: &[StockUpdate]) -> Vec<&StockUpdate> {
    stocks.iter().filter(|s| s.stock != 0).collect()
}
