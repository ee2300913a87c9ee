use std::collections::HashSet;

/// Hands out collision-free output filenames for matched SKUs within one
/// batch.
///
/// The first file for a SKU gets `<sku>.<ext>` (SKU lowercased), later ones
/// get `<sku>_1.<ext>`, `<sku>_2.<ext>` and so on. Path separators in a SKU
/// are replaced with `-`.
///
/// Allocation is a side effect: every call reserves the returned name, so
/// call [`allocate`](Self::allocate) exactly once per file.
///
/// ```
/// use snapsku_pipeline::FilenameAllocator;
///
/// let mut allocator = FilenameAllocator::new("webp");
/// assert_eq!(allocator.allocate("ABC-123"), "abc-123.webp");
/// assert_eq!(allocator.allocate("abc-123"), "abc-123_1.webp");
/// assert_eq!(allocator.allocate("ABC-123"), "abc-123_2.webp");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilenameAllocator {
    extension: String,
    allocated: HashSet<String>,
}

impl FilenameAllocator {
    /// `extension` may be given with or without its leading dot.
    pub fn new(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            allocated: HashSet::new(),
        }
    }

    pub fn allocate(&mut self, sku: &str) -> String {
        let stem = sku.trim().to_lowercase().replace(['/', '\\'], "-");
        let mut candidate = self.filename(&stem);
        let mut suffix = 0;
        while self.allocated.contains(&candidate) {
            suffix += 1;
            candidate = self.filename(&format!("{stem}_{suffix}"));
        }
        self.allocated.insert(candidate.clone());
        candidate
    }

    fn filename(&self, stem: &str) -> String {
        if self.extension.is_empty() {
            stem.to_string()
        } else {
            format!("{stem}.{}", self.extension)
        }
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.allocated.contains(filename)
    }

    pub fn len(&self) -> usize {
        self.allocated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocated.is_empty()
    }
}
