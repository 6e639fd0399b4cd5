use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use attrmerge::attrmerge_core::{MergeWarning, PageInfo, SpatialAttribute};
use attrmerge::{MergeOptions, SpatialMergeEngine};
use serde::Deserialize;

use crate::cli::OptionArgs;

/// Page geometry entry of a document file.
#[derive(Debug, Deserialize)]
struct PageEntry {
    page: u32,
    width: i64,
    height: i64,
}

#[derive(Debug, Deserialize)]
struct DocumentFile {
    #[serde(default)]
    pages: Vec<PageEntry>,
    attributes: Vec<SpatialAttribute>,
}

/// Attributes of one document together with its page geometry.
#[derive(Debug)]
pub struct Document {
    pub pages: BTreeMap<u32, PageInfo>,
    pub attributes: Vec<SpatialAttribute>,
}

fn read_file(file: &Path) -> Result<String, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }
    fs::read_to_string(file).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", file.display());
        1
    })
}

/// Load a document JSON file with user-friendly error messages.
pub fn load_document(file: &Path) -> Result<Document, i32> {
    let content = read_file(file)?;
    let parsed: DocumentFile = serde_json::from_str(&content).map_err(|e| {
        eprintln!("Error: invalid document {}: {e}", file.display());
        1
    })?;
    Ok(Document {
        pages: parsed
            .pages
            .into_iter()
            .map(|p| (p.page, PageInfo::new(p.width, p.height)))
            .collect(),
        attributes: parsed.attributes,
    })
}

/// Build merge options from an optional JSON file plus command-line overrides.
pub fn load_options(args: &OptionArgs) -> Result<MergeOptions, i32> {
    let mut options = match &args.options {
        Some(path) => {
            let content = read_file(path)?;
            serde_json::from_str(&content).map_err(|e| {
                eprintln!("Error: invalid options {}: {e}", path.display());
                1
            })?
        }
        None => MergeOptions::default(),
    };

    if let Some(threshold) = args.threshold {
        options.overlap_threshold_percent = threshold;
    }
    options.use_mutual_overlap |= args.mutual;
    options.create_merged_region |= args.merged_region;
    options.preserve_as_sub_attributes |= args.sub_attributes;
    Ok(options)
}

/// Create an engine, reporting rejected options.
pub fn build_engine(args: &OptionArgs) -> Result<SpatialMergeEngine, i32> {
    let options = load_options(args)?;
    SpatialMergeEngine::new(options).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })
}

/// Print collected diagnostics to stderr.
pub fn report_warnings(warnings: &[MergeWarning]) {
    for w in warnings {
        eprintln!("warning: {w}");
    }
}
