use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewRef(u64);

/// Every reference must be released once its file leaves the selection.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    next_id: u64,
    live: HashMap<PreviewRef, PathBuf>,
}

impl PreviewRegistry {
    pub fn acquire(&mut self, path: &Path) -> PreviewRef {
        self.next_id += 1;
        let preview = PreviewRef(self.next_id);
        self.live.insert(preview, path.to_path_buf());
        preview
    }

    pub fn release(&mut self, preview: PreviewRef) {
        if self.live.remove(&preview).is_none() {
            tracing::debug!(?preview, "preview reference was already released");
        }
    }

    pub fn resolve(&self, preview: PreviewRef) -> Option<&Path> {
        self.live.get(&preview).map(PathBuf::as_path)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
