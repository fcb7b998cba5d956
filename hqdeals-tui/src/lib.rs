pub mod browser;

pub use browser::{DealsBrowser, Focus, LogLevel, run_browser};
