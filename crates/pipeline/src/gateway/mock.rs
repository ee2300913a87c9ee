//! In-memory upload gateway for testing.

use super::error::{ErrorKind, Result};
use super::{UploadGateway, UploadReceipt, UploadRequest};
use async_trait::async_trait;
use snapsku_encode::OutputFormat;
use snapsku_matcher::{file_name, strip_extension};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory upload gateway for testing.
///
/// Matched files keep the filename the pipeline allocated. Unmatched files
/// are named after the lowercased stem of their original filename plus the
/// extension implied by the content type. Every request is recorded,
/// including the ones configured to fail.
#[derive(Default)]
pub struct MockGateway {
    failures: HashMap<String, ErrorKind>,
    requests: RwLock<Vec<UploadRequest>>,
}

impl MockGateway {
    /// Fail every upload whose original filename is `original_filename`.
    pub fn with_failure(mut self, original_filename: impl Into<String>, kind: ErrorKind) -> Self {
        self.failures.insert(original_filename.into(), kind);
        self
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<UploadRequest> {
        self.requests.read().await.clone()
    }

    fn unmatched_name(request: &UploadRequest) -> String {
        let stem = strip_extension(file_name(&request.original_filename)).to_lowercase();
        let extension = OutputFormat::from_mime_type(&request.content_type).map_or("bin", OutputFormat::extension);
        format!("{stem}.{extension}")
    }
}

#[async_trait]
impl UploadGateway for MockGateway {
    async fn upload(&self, request: UploadRequest) -> Result<UploadReceipt> {
        let failure = self.failures.get(&request.original_filename).cloned();
        let final_filename = request.filename.clone().unwrap_or_else(|| Self::unmatched_name(&request));
        let url = format!("mock://uploads/{}/{final_filename}", request.brand_name.to_lowercase());
        self.requests.write().await.push(request);
        if let Some(kind) = failure {
            exn::bail!(kind);
        }
        Ok(UploadReceipt { final_filename, url })
    }
}
