pub mod cfb_api;

pub use cfb_api::CfbApiClient;
