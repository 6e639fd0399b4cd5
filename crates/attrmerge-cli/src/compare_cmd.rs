use std::path::Path;

use crate::cli::OptionArgs;
use crate::shared::{build_engine, load_document, report_warnings};

/// Exit code reported when the two sets do not match.
const MISMATCH_EXIT_CODE: i32 = 2;

pub fn run(file_a: &Path, file_b: &Path, options: &OptionArgs) -> Result<(), i32> {
    let mut engine = build_engine(options)?;
    let doc_a = load_document(file_a)?;
    let doc_b = load_document(file_b)?;

    // Page geometry of the first document wins where both describe a page.
    let mut pages = doc_b.pages;
    pages.extend(doc_a.pages);

    let matching = engine
        .compare_attribute_sets(&doc_a.attributes, &doc_b.attributes, &pages)
        .map_err(|e| {
            eprintln!("Error: comparison failed: {e}");
            1
        })?;
    report_warnings(engine.warnings());

    if matching {
        println!("match");
        Ok(())
    } else {
        println!("mismatch");
        Err(MISMATCH_EXIT_CODE)
    }
}
