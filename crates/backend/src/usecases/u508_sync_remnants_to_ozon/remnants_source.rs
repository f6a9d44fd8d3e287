use crate::shared::config::RemnantsConfig;
use crate::shared::error::SyncError;
use async_trait::async_trait;
use calamine::{Data, Range, Reader};
use std::io::{Cursor, Read};

pub const COL_CODE: &str = "Код";
pub const COL_NAME: &str = "Наименование товара";
pub const COL_IMAGE: &str = "Изображение";
pub const COL_PRICE: &str = "Цена";
pub const COL_QUANTITY: &str = "Количество";
pub const COL_ORDER: &str = "Заказ";

const SPREADSHEET_EXTENSIONS: [&str; 3] = [".xls", ".xlsx", ".ods"];

/// Значение ячейки в том виде, в каком его хранит таблица
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn from_data(data: &Data) -> Self {
        match data {
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Empty => Cell::Empty,
            other => Cell::Text(other.to_string()),
        }
    }

    /// Текстовое представление ("136748" для числа 136748.0)
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }

    /// Значение, только если ячейка хранит текст
    pub fn as_text(&self) -> Result<&str, SyncError> {
        match self {
            Cell::Text(s) => Ok(s),
            other => Err(SyncError::data_shape(format!(
                "expected text cell, got {:?}",
                other
            ))),
        }
    }
}

/// Строка файла остатков
#[derive(Debug, Clone, PartialEq)]
pub struct RemnantRow {
    pub code: Cell,
    pub name: Cell,
    pub image: Cell,
    pub price: Cell,
    pub quantity: Cell,
    /// Не используется
    pub order: Cell,
}

impl RemnantRow {
    /// Артикул строки как строка
    pub fn offer_id(&self) -> String {
        self.code.render()
    }
}

#[async_trait]
pub trait RemnantsSource: Send + Sync {
    async fn fetch_remnants(&self) -> Result<Vec<RemnantRow>, SyncError>;
}

/// Скачивает архив остатков поставщика и разбирает таблицу из него
pub struct HttpRemnantsSource {
    client: reqwest::Client,
    config: RemnantsConfig,
}

impl HttpRemnantsSource {
    pub fn new(config: RemnantsConfig, timeout_secs: u64) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SyncError::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl RemnantsSource for HttpRemnantsSource {
    async fn fetch_remnants(&self) -> Result<Vec<RemnantRow>, SyncError> {
        tracing::info!("Downloading remnants from {}", self.config.url);

        let response = self.client.get(&self.config.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Remnants download failed with status {}", status);
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let archive = response.bytes().await?;
        tracing::info!("Remnants archive downloaded: {} bytes", archive.len());

        let spreadsheet = extract_spreadsheet(&archive, &self.config.file_name)?;
        let rows = parse_spreadsheet(spreadsheet, self.config.header_row)?;

        tracing::info!("Parsed {} remnant rows", rows.len());
        Ok(rows)
    }
}

/// Достает таблицу из zip-архива в память.
///
/// Если файла с именем `file_name` нет, но в архиве ровно одна таблица,
/// берется она.
pub fn extract_spreadsheet(archive: &[u8], file_name: &str) -> Result<Vec<u8>, SyncError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(archive))?;

    let names: Vec<String> = archive.file_names().map(|n| n.to_string()).collect();
    let entry = if names.iter().any(|n| n == file_name) {
        file_name.to_string()
    } else {
        let candidates: Vec<&String> = names
            .iter()
            .filter(|n| {
                let lower = n.to_lowercase();
                SPREADSHEET_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
            })
            .collect();
        match candidates.as_slice() {
            [single] => {
                tracing::warn!(
                    "'{}' not found in remnants archive, using '{}'",
                    file_name,
                    single
                );
                single.to_string()
            }
            _ => {
                return Err(SyncError::data_shape(format!(
                    "'{}' not found in remnants archive (entries: {:?})",
                    file_name, names
                )))
            }
        }
    };

    let mut file = archive.by_name(&entry)?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)
        .map_err(|e| SyncError::data_shape(format!("failed to unpack '{}': {}", entry, e)))?;
    Ok(buf)
}

/// Разбирает первый лист таблицы (xls/xlsx/ods)
pub fn parse_spreadsheet(bytes: Vec<u8>, header_row: usize) -> Result<Vec<RemnantRow>, SyncError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SyncError::data_shape("remnants spreadsheet has no sheets"))??;
    rows_from_range(&range, header_row)
}

/// Пропускает `header_row` строк шапки, следующую строку считает заголовком
pub fn rows_from_range(range: &Range<Data>, header_row: usize) -> Result<Vec<RemnantRow>, SyncError> {
    // calamine обрезает пустые строки сверху, поэтому считаем от начала листа
    let start_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let skip = header_row.saturating_sub(start_row);

    let mut rows = range.rows().skip(skip);
    let header = rows
        .next()
        .ok_or_else(|| SyncError::data_shape(format!("no header at row {}", header_row)))?;
    let headers: Vec<String> = header
        .iter()
        .map(|data| Cell::from_data(data).render().trim().to_string())
        .collect();

    let column = |name: &str| headers.iter().position(|h| h == name);
    let required = |name: &str| {
        column(name).ok_or_else(|| {
            SyncError::data_shape(format!(
                "column '{}' missing in remnants header {:?}",
                name, headers
            ))
        })
    };

    let code = required(COL_CODE)?;
    let price = required(COL_PRICE)?;
    let quantity = required(COL_QUANTITY)?;
    let name = column(COL_NAME);
    let image = column(COL_IMAGE);
    let order = column(COL_ORDER);

    let mut result = Vec::new();
    for cells in rows {
        if cells.iter().all(|data| matches!(data, Data::Empty)) {
            continue;
        }
        let cell_at = |idx: Option<usize>| {
            idx.and_then(|i| cells.get(i))
                .map(Cell::from_data)
                .unwrap_or(Cell::Empty)
        };

        result.push(RemnantRow {
            code: cell_at(Some(code)),
            name: cell_at(name),
            image: cell_at(image),
            price: cell_at(Some(price)),
            quantity: cell_at(Some(quantity)),
            order: cell_at(order),
        });
    }

    Ok(result)
}
