pub mod client;
pub mod endpoints;
pub mod error;
pub mod model;

pub use client::{ClientConfig, DealsClient};
pub use endpoints::{DEFAULT_BASE_URL, Endpoints};
pub use error::FetchError;
pub use model::{Category, CategoryManifest, Link, Offer, Price, Reviews};
