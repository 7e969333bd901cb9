pub mod app_config;
pub mod test_config;

pub use app_config::AppConfig;
pub use test_config::create_test_config;
