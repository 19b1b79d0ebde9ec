//! Interactive selection of relation files.

use std::path::{Path, PathBuf};

use skim::prelude::*;
use walkdir::WalkDir;

/// List files with the given suffix under `dir` and let the user fuzzy-pick
/// one. Returns None when nothing matches or the selection is cancelled.
pub fn select_file_with_suffix(dir: &Path, suffix: &str) -> Option<PathBuf> {
    let files: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !e.path().is_dir())
        .filter(|e| e.path().to_string_lossy().ends_with(suffix))
        .map(|e| e.path().to_string_lossy().into_owned())
        .collect();

    if files.is_empty() {
        return None;
    }

    let options = SkimOptionsBuilder::default()
        .height(Some("50%"))
        .multi(false)
        .build()
        .ok()?;

    let (tx, rx): (SkimItemSender, SkimItemReceiver) = unbounded();
    for file in &files {
        let item: Arc<dyn SkimItem> = Arc::new(file.clone());
        tx.send(item).ok()?;
    }
    // Close the channel so skim knows the item stream is complete
    drop(tx);

    let selected_items = Skim::run_with(&options, Some(rx))
        .filter(|out| !out.is_abort)
        .map(|out| out.selected_items)
        .unwrap_or_default();

    selected_items
        .first()
        .map(|item| PathBuf::from(item.output().to_string()))
}
