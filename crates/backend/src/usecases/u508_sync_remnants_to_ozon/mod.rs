pub mod catalog;
pub mod dispatcher;
pub mod executor;
pub mod ozon_api_client;
pub mod reconciler;
pub mod remnants_source;

#[cfg(test)]
mod test_support;

pub use executor::SyncExecutor;
