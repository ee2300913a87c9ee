//! The upload/storage gateway.
//!
//! Durable storage, public URLs, the naming of unmatched files and any
//! downstream classification all belong to the gateway. The pipeline only
//! hands it an encoded image and what it learned from the filename.

pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;

#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockGateway;
use self::error::Result;
use async_trait::async_trait;

/// One encoded image on its way to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub data: Vec<u8>,
    pub content_type: String,
    pub brand_name: String,
    /// Batch-unique name allocated for a matched file. `None` for unmatched
    /// files, which the gateway names itself.
    pub filename: Option<String>,
    pub matched_sku: Option<String>,
    pub confidence: Option<f32>,
    /// Name of the file as it was submitted.
    pub original_filename: String,
}

/// Where the gateway put the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub final_filename: String,
    pub url: String,
}

/// Stores encoded images.
///
/// # Examples
///
/// ```
/// use snapsku_pipeline::gateway::{UploadGateway, UploadRequest, error::Result};
///
/// async fn store(gateway: &dyn UploadGateway, data: Vec<u8>) -> Result<String> {
///     let receipt = gateway
///         .upload(UploadRequest {
///             data,
///             content_type: "image/webp".to_string(),
///             brand_name: "Acme".to_string(),
///             filename: Some("7788.webp".to_string()),
///             matched_sku: Some("7788".to_string()),
///             confidence: Some(1.0),
///             original_filename: "acme_red_7788.png".to_string(),
///         })
///         .await?;
///     Ok(receipt.url)
/// }
/// ```
#[async_trait]
pub trait UploadGateway: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<UploadReceipt>;
}
