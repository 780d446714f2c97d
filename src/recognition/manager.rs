//! Recognizer manager
//!
//! Routes an image and a category to the category's endpoint and parser.

use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

use super::category::Category;
use super::client::{load_image_base64, ApiClient};
use super::error::RecognitionError;
use crate::config::AppConfig;

/// Dispatches recognition requests by category
pub struct RecognizerManager {
    client: ApiClient,
    fallback: Option<Category>,
}

impl RecognizerManager {
    /// Create a manager from the application configuration
    pub fn new(config: &AppConfig) -> Result<Self, RecognitionError> {
        let client = ApiClient::new(&config.service, config.credentials.clone())?;

        Ok(Self {
            client,
            fallback: config.recognition.fallback_category,
        })
    }

    /// Resolve a category name or index, applying the configured fallback
    pub fn resolve(&self, selector: &str) -> Result<Category, RecognitionError> {
        match selector.parse::<Category>() {
            Ok(category) => Ok(category),
            Err(err) => match self.fallback {
                Some(fallback) => {
                    warn!(
                        "Unknown category '{}', falling back to {}",
                        selector.trim(),
                        fallback
                    );
                    Ok(fallback)
                }
                None => Err(err),
            },
        }
    }

    /// Recognize an image for a category selected by name or index
    pub async fn recognize_selector(
        &self,
        image: &Path,
        selector: &str,
    ) -> Result<String, RecognitionError> {
        let category = self.resolve(selector).inspect_err(|e| error!("{}", e))?;
        self.recognize(image, category).await
    }

    /// Recognize an image and return the formatted result
    pub async fn recognize(
        &self,
        image: &Path,
        category: Category,
    ) -> Result<String, RecognitionError> {
        info!("Recognizing {:?} as {}", image, category.display_name());
        let start = Instant::now();

        match self.run(image, category).await {
            Ok(text) => {
                info!(
                    "{} recognition finished in {:?}",
                    category.display_name(),
                    start.elapsed()
                );
                Ok(text)
            }
            Err(e) => {
                error!("{} recognition failed: {}", category.display_name(), e);
                Err(e)
            }
        }
    }

    async fn run(&self, image: &Path, category: Category) -> Result<String, RecognitionError> {
        let image_b64 = load_image_base64(image)?;
        let token = self.client.fetch_access_token().await?;
        let data = self.client.submit_image(category, &token, &image_b64).await?;

        info!("Processing {} data", category.display_name());
        (category.parser())(&data)
    }
}
