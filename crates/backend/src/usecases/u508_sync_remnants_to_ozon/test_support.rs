//! Заглушки SellerApi/RemnantsSource для тестов

use super::ozon_api_client::{OzonProductListItem, OzonProductListResult, SellerApi};
use super::remnants_source::{Cell, RemnantRow, RemnantsSource};
use crate::shared::error::SyncError;
use async_trait::async_trait;
use contracts::usecases::u508_sync_remnants_to_ozon::{
    ImportItemError, ImportItemResult, ImportResponse, PriceUpdate, StockUpdate,
};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Mutex;
use std::time::Duration;

type PageFn = Box<dyn Fn(&str, usize) -> OzonProductListResult + Send + Sync>;

pub fn page(offer_ids: &[String], total: u64, last_id: &str) -> OzonProductListResult {
    OzonProductListResult {
        items: offer_ids
            .iter()
            .map(|offer_id| OzonProductListItem {
                offer_id: offer_id.clone(),
            })
            .collect(),
        total,
        last_id: last_id.to_string(),
    }
}

pub fn row(code: &str, quantity: &str, price: &str) -> RemnantRow {
    RemnantRow {
        code: Cell::Text(code.to_string()),
        name: Cell::Text(format!("Часы {}", code)),
        image: Cell::Empty,
        price: Cell::Text(price.to_string()),
        quantity: Cell::Text(quantity.to_string()),
        order: Cell::Empty,
    }
}

pub struct MockSellerApi {
    page_fn: PageFn,
    pub cursors: Mutex<Vec<String>>,
    pub price_batches: Mutex<Vec<Vec<PriceUpdate>>>,
    pub stock_batches: Mutex<Vec<Vec<StockUpdate>>>,
    /// Номер вызова import_stocks, который вернет 500
    pub fail_stock_call: Option<usize>,
    /// Артикул, который OZON "не обновит"
    pub reject_offer: Option<String>,
}

impl MockSellerApi {
    pub fn with_page_fn(
        page_fn: impl Fn(&str, usize) -> OzonProductListResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            page_fn: Box::new(page_fn),
            cursors: Mutex::new(Vec::new()),
            price_batches: Mutex::new(Vec::new()),
            stock_batches: Mutex::new(Vec::new()),
            fail_stock_call: None,
            reject_offer: None,
        }
    }

    /// Каталог, отдаваемый страницами по `page_size`; курсор = смещение
    pub fn with_catalog(offer_ids: &[&str], page_size: usize) -> Self {
        let all: Vec<String> = offer_ids.iter().map(|s| s.to_string()).collect();
        Self::with_page_fn(move |cursor, _call| {
            let offset: usize = cursor.parse().unwrap_or(0);
            let end = (offset + page_size).min(all.len());
            page(&all[offset..end], all.len() as u64, &end.to_string())
        })
    }

    fn respond<'a>(&self, offer_ids: impl Iterator<Item = &'a String>) -> ImportResponse {
        ImportResponse {
            result: offer_ids
                .map(|offer_id| {
                    let rejected = self.reject_offer.as_deref() == Some(offer_id.as_str());
                    ImportItemResult {
                        product_id: 1,
                        offer_id: offer_id.clone(),
                        updated: !rejected,
                        errors: if rejected {
                            vec![ImportItemError {
                                code: "NOT_FOUND".to_string(),
                                message: "product not found".to_string(),
                            }]
                        } else {
                            Vec::new()
                        },
                    }
                })
                .collect(),
        }
    }
}

#[async_trait]
impl SellerApi for MockSellerApi {
    async fn fetch_product_list(
        &self,
        last_id: &str,
        _limit: u32,
    ) -> Result<OzonProductListResult, SyncError> {
        let call = {
            let mut cursors = self.cursors.lock().unwrap();
            cursors.push(last_id.to_string());
            cursors.len() - 1
        };
        Ok((self.page_fn)(last_id, call))
    }

    async fn import_prices(&self, prices: &[PriceUpdate]) -> Result<ImportResponse, SyncError> {
        self.price_batches.lock().unwrap().push(prices.to_vec());
        Ok(self.respond(prices.iter().map(|p| &p.offer_id)))
    }

    async fn import_stocks(&self, stocks: &[StockUpdate]) -> Result<ImportResponse, SyncError> {
        let call = {
            let mut batches = self.stock_batches.lock().unwrap();
            batches.push(stocks.to_vec());
            batches.len() - 1
        };
        if self.fail_stock_call == Some(call) {
            return Err(SyncError::Server {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(self.respond(stocks.iter().map(|s| &s.offer_id)))
    }
}

pub struct StaticRemnants(pub Vec<RemnantRow>);

#[async_trait]
impl RemnantsSource for StaticRemnants {
    async fn fetch_remnants(&self) -> Result<Vec<RemnantRow>, SyncError> {
        Ok(self.0.clone())
    }
}

fn read_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= pos + 4 + content_length {
                return;
            }
        }
    }
}

/// Локальный сервер, отвечающий на один запрос заданным HTTP-ответом
pub fn serve_once(response: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            read_request(&mut stream);
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{}", addr)
}

/// Сервер, который принимает запрос и молчит дольше таймаута клиента
pub fn serve_stalled(hold: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            read_request(&mut stream);
            std::thread::sleep(hold);
        }
    });
    format!("http://{}", addr)
}

/// Адрес, на котором никто не слушает
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    )
}
