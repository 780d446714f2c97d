//! Recognition Layer
//!
//! Sends images to the cloud OCR / image-classification service and turns
//! the category-specific JSON replies into readable text.
//!
//! - [`Category`] fixes the endpoint and parser for each document class
//! - [`client::ApiClient`] performs the token and upload requests
//! - [`RecognizerManager`] dispatches a request to the right category

pub mod category;
pub mod client;
pub mod error;
pub mod manager;
pub mod parsers;

pub use category::Category;
pub use manager::RecognizerManager;
