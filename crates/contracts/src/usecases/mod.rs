pub mod u508_sync_remnants_to_ozon;
