use crate::catalog::ProjectCatalog;
use crate::project::{Activity, ProjectRecord};
use crate::report::{list_headers, DESCRIPTION, NOWRAP};

const STYLE: &str = "\
table { border-collapse: collapse; font-family: sans-serif; font-size: 0.9em; }
th, td { border: 1px solid #ccc; padding: 4px 8px; vertical-align: top; }
tr.category th { background: #eee; text-align: left; }
td.nowrap { white-space: nowrap; }
td.description { min-width: 20em; }";

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn anchor(url: &str, text: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape(url), escape(text))
}

fn activity(value: &Option<Activity>) -> String {
    match value {
        Some(Activity { url: Some(url), .. }) => anchor(url, &value_text(value)),
        Some(_) => value_text(value),
        None => String::new(),
    }
}

fn value_text(value: &Option<Activity>) -> String {
    value.as_ref().map(Activity::to_string).unwrap_or_default()
}

impl ProjectRecord {
    /// Escaped HTML cell contents with style hints, in column order.
    pub fn html_cells(&self) -> Vec<(String, Option<&'static str>)> {
        let license = match &self.license {
            Some(license) => match &license.url {
                Some(url) => anchor(url, &license.name),
                None => escape(&license.name),
            },
            None => String::new(),
        };
        let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();

        vec![
            (escape(&self.name), None),
            (anchor(&self.repository_url, &self.repository_url), None),
            (escape(&self.description), DESCRIPTION),
            (
                self.homepage
                    .as_deref()
                    .map(|url| anchor(url, url))
                    .unwrap_or_default(),
                None,
            ),
            (license, NOWRAP),
            (
                self.languages
                    .as_ref()
                    .map(|languages| escape(&languages.join(", ")))
                    .unwrap_or_default(),
                None,
            ),
            (escape(&tags.join(", ")), None),
            (activity(&self.last_update), NOWRAP),
            (activity(&self.latest_release), NOWRAP),
            (activity(&self.first_release), NOWRAP),
        ]
    }
}

fn class_attr(hint: Option<&str>) -> String {
    hint.map(|class| format!(" class=\"{}\"", class))
        .unwrap_or_default()
}

/// The catalog as a standalone HTML document with a single table.
pub fn render_html(catalog: &ProjectCatalog) -> String {
    let headers = list_headers();
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Open source projects</title>\n");
    out.push_str(&format!("<style>\n{}\n</style>\n", STYLE));
    out.push_str("</head>\n<body>\n<table>\n<thead>\n<tr>");
    for (title, hint) in &headers {
        out.push_str(&format!("<th{}>{}</th>", class_attr(*hint), escape(title)));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for category in catalog.categories() {
        out.push_str(&format!(
            "<tr class=\"category\"><th colspan=\"{}\">{}</th></tr>\n",
            headers.len(),
            escape(&category.name)
        ));
        for record in &category.records {
            out.push_str("<tr>");
            for (cell, hint) in record.html_cells() {
                out.push_str(&format!("<td{}>{}</td>", class_attr(hint), cell));
            }
            out.push_str("</tr>\n");
        }
    }

    out.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    out
}
