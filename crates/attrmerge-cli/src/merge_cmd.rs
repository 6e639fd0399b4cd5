use std::fs;
use std::path::Path;

use attrmerge::attrmerge_core::SpatialAttribute;

use crate::cli::{OptionArgs, OutputFormat};
use crate::shared::{build_engine, load_document, report_warnings};

pub fn run(
    file: &Path,
    options: &OptionArgs,
    format: &OutputFormat,
    output: Option<&Path>,
) -> Result<(), i32> {
    let mut engine = build_engine(options)?;
    let mut doc = load_document(file)?;

    let summary = engine
        .merge_attributes(&mut doc.attributes, &doc.pages)
        .map_err(|e| {
            eprintln!("Error: merge failed: {e}");
            1
        })?;
    report_warnings(engine.warnings());
    eprintln!(
        "merged: {} result(s) added, {} original(s) removed",
        summary.results_added, summary.originals_removed
    );

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&doc.attributes).map_err(|e| {
            eprintln!("Error: failed to serialize attributes: {e}");
            1
        })?,
        OutputFormat::Text => render_text(&doc.attributes),
    };

    match output {
        Some(path) => fs::write(path, rendered + "\n").map_err(|e| {
            eprintln!("Error: failed to write {}: {e}", path.display());
            1
        }),
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}

/// One tab-separated row per attribute: name, type, pages, text.
fn render_text(attributes: &[SpatialAttribute]) -> String {
    let mut lines = vec!["name\ttype\tpages\ttext".to_string()];
    for attr in attributes {
        let pages: Vec<String> = attr.value.pages().iter().map(u32::to_string).collect();
        lines.push(format!(
            "{}\t{}\t{}\t{}",
            attr.name,
            attr.attr_type,
            pages.join(","),
            attr.value.text.replace('\n', "\\n"),
        ));
    }
    lines.join("\n")
}
