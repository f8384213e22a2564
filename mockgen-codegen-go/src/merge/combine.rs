use std::collections::HashSet;

use mockgen_core::Result;

use super::extract::{FunctionBlock, extract};

/// Outcome of merging a fresh mock into an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// The merged file.
    pub content: String,
    /// Methods whose existing text was kept.
    pub preserved: Vec<String>,
    /// Methods not present in the existing file.
    pub added: Vec<String>,
    /// Methods of the existing file that no longer exist.
    pub removed: Vec<String>,
}

/// Combine existing and freshly generated blocks.
///
/// A fresh block is replaced by the existing block with the same
/// signature prefix. Methods known to the existing file keep their
/// position; new methods follow in fresh order.
pub fn combine(existing: &[FunctionBlock], fresh: Vec<FunctionBlock>) -> Vec<FunctionBlock> {
    let substituted: Vec<FunctionBlock> = fresh
        .into_iter()
        .map(|block| {
            existing
                .iter()
                .find(|e| e.signature_prefix == block.signature_prefix)
                .cloned()
                .unwrap_or(block)
        })
        .collect();

    let mut emitted = HashSet::new();
    let mut result = Vec::with_capacity(substituted.len());
    for old in existing {
        if emitted.contains(old.name.as_str()) {
            continue;
        }
        if let Some(block) = substituted.iter().find(|b| b.name == old.name) {
            emitted.insert(old.name.as_str());
            result.push(block.clone());
        }
    }
    for block in &substituted {
        if emitted.insert(block.name.as_str()) {
            result.push(block.clone());
        }
    }
    result
}

/// Merge `fresh_src` into `existing_src`.
///
/// The preamble always comes from the fresh source. Nothing is returned
/// unless both sources split cleanly.
pub fn merge(existing_src: &str, fresh_src: &str, filename: &str) -> Result<MergeResult> {
    let existing = extract(existing_src, filename)?;
    let fresh = extract(fresh_src, "<generated>")?;

    let fresh_names: HashSet<&str> = fresh.blocks.iter().map(|b| b.name.as_str()).collect();
    let existing_names: HashSet<&str> = existing.blocks.iter().map(|b| b.name.as_str()).collect();
    let removed: Vec<String> = existing
        .blocks
        .iter()
        .filter(|b| !fresh_names.contains(b.name.as_str()))
        .map(|b| b.name.clone())
        .collect();
    let added: Vec<String> = fresh
        .blocks
        .iter()
        .filter(|b| !existing_names.contains(b.name.as_str()))
        .map(|b| b.name.clone())
        .collect();

    let blocks = combine(&existing.blocks, fresh.blocks);
    let preserved: Vec<String> = blocks
        .iter()
        .filter(|b| existing.blocks.contains(b))
        .map(|b| b.name.clone())
        .collect();

    for name in &preserved {
        tracing::debug!(method = %name, "kept existing method");
    }
    for name in &added {
        tracing::debug!(method = %name, "added method");
    }
    for name in &removed {
        tracing::debug!(method = %name, "removed method");
    }

    let mut content = fresh.preamble;
    content.push('\n');
    if !blocks.is_empty() {
        content.push('\n');
        let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
        content.push_str(&texts.join("\n\n"));
        content.push('\n');
    }

    Ok(MergeResult {
        content,
        preserved,
        added,
        removed,
    })
}
