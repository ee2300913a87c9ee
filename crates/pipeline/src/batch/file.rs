use super::{Pipeline, SourceFile};
use crate::allocate::FilenameAllocator;
use crate::error::{ErrorKind, Result};
use crate::gateway::{UploadReceipt, UploadRequest};
use crate::progress::ProcessingResult;
use snapsku_catalog::{BrandPattern, SkuIndex};
use snapsku_matcher::MatchResult;
use tracing::instrument;

impl Pipeline {
    /// Match, encode, name and upload one file. Never fails: any error is
    /// recorded in the returned [`ProcessingResult`].
    #[instrument(skip_all, fields(filename = %file.filename))]
    pub(super) async fn process_file(
        &self,
        file: SourceFile,
        brand: &str,
        index: &SkuIndex,
        pattern: Option<&BrandPattern>,
        allocator: &mut FilenameAllocator,
    ) -> ProcessingResult {
        let SourceFile { filename, data } = file;
        let matched = self.matcher.match_filename(&filename, index, pattern, Some(brand));
        let mut allocated = None;
        match self.encode_and_upload(&filename, data, brand, matched.as_ref(), allocator, &mut allocated).await {
            Ok(receipt) => {
                tracing::debug!(final_filename = %receipt.final_filename, matched = matched.is_some(), "Uploaded file");
                ProcessingResult::uploaded(filename, receipt, matched.as_ref())
            },
            Err(e) => {
                let kind: &ErrorKind = &e;
                tracing::warn!(error = %kind, retryable = kind.is_retryable(), "File failed; continuing with batch");
                ProcessingResult::failed(filename, allocated, matched.as_ref(), kind.to_string())
            },
        }
    }

    /// A name is only allocated once the image has been encoded, so files
    /// that fail to encode never consume one. `allocated` receives the name
    /// even if the upload then fails.
    async fn encode_and_upload(
        &self,
        filename: &str,
        data: Vec<u8>,
        brand: &str,
        matched: Option<&MatchResult>,
        allocator: &mut FilenameAllocator,
        allocated: &mut Option<String>,
    ) -> Result<UploadReceipt> {
        let encoded = self.encoder.encode(data).await.map_err(ErrorKind::encode)?;
        *allocated = matched.map(|m| allocator.allocate(&m.sku));
        let request = UploadRequest {
            data: encoded.data,
            content_type: encoded.format.mime_type().to_string(),
            brand_name: brand.to_string(),
            filename: allocated.clone(),
            matched_sku: matched.map(|m| m.sku.clone()),
            confidence: matched.map(|m| m.confidence),
            original_filename: filename.to_string(),
        };
        self.gateway.upload(request).await.map_err(ErrorKind::upload)
    }
}
