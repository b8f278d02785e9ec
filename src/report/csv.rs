use crate::catalog::ProjectCatalog;
use crate::project::{Activity, ProjectRecord};
use crate::report::list_headers;

const SEPARATOR: char = ';';

/// Make a value safe for a `;` separated line.
fn sanitize(value: &str) -> String {
    value
        .replace(SEPARATOR, ",")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

fn activity(value: &Option<Activity>) -> String {
    value.as_ref().map(Activity::to_string).unwrap_or_default()
}

impl ProjectRecord {
    /// Plain values in column order, ready to be joined with `;`.
    pub fn csv_cells(&self) -> Vec<String> {
        let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        [
            self.name.clone(),
            self.repository_url.clone(),
            self.description.clone(),
            self.homepage.clone().unwrap_or_default(),
            self.license.as_ref().map(|l| l.name.clone()).unwrap_or_default(),
            self.languages
                .as_ref()
                .map(|languages| languages.join(", "))
                .unwrap_or_default(),
            tags.join(", "),
            activity(&self.last_update),
            activity(&self.latest_release),
            activity(&self.first_release),
        ]
        .iter()
        .map(|value| sanitize(value))
        .collect()
    }
}

/// The catalog as `;` separated lines, first column the category.
pub fn render_csv(catalog: &ProjectCatalog) -> String {
    let mut header = vec!["Category"];
    header.extend(list_headers().iter().map(|(title, _)| *title));

    let mut out = header.join(";");
    out.push('\n');
    for category in catalog.categories() {
        for record in &category.records {
            out.push_str(&sanitize(&category.name));
            for cell in record.csv_cells() {
                out.push(SEPARATOR);
                out.push_str(&cell);
            }
            out.push('\n');
        }
    }
    out
}
