//! HTML and CSV reports of a catalog
//!
//! Both reports share one column layout. The HTML report carries a style
//! hint per column which becomes the cell's `class`.

pub mod csv;
pub mod html;

pub use csv::render_csv;
pub use html::render_html;

use crate::catalog::ProjectCatalog;
use crate::config::OutputConfig;
use crate::core::path::ensure_dir;
use crate::core::OsslistResult;
use std::fs;
use std::path::Path;
use tracing::info;

/// Style hint for wide free text columns.
pub const DESCRIPTION: Option<&str> = Some("description");
/// Style hint for columns that must not wrap (dates, license names).
pub const NOWRAP: Option<&str> = Some("nowrap");

/// Report columns in order, with their style hint.
pub fn list_headers() -> [(&'static str, Option<&'static str>); 10] {
    [
        ("Project", None),
        ("Repository", None),
        ("Description", DESCRIPTION),
        ("Homepage", None),
        ("License", NOWRAP),
        ("Languages", None),
        ("Tags", None),
        ("Last Update", NOWRAP),
        ("Latest Release", NOWRAP),
        ("First Release", NOWRAP),
    ]
}

/// Write the HTML and CSV report of `catalog`.
pub fn write_reports(catalog: &ProjectCatalog, output: &OutputConfig) -> OsslistResult<()> {
    write_file(&output.html, &render_html(catalog))?;
    write_file(&output.csv, &render_csv(catalog))?;
    info!(
        html = %output.html.display(),
        csv = %output.csv.display(),
        projects = catalog.len(),
        "reports written"
    );
    Ok(())
}

fn write_file(path: &Path, content: &str) -> OsslistResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
