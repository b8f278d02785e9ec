use reqwest::header::{HeaderMap, LINK};

/// Extract the URL for `rel` from an RFC 8288 `Link` header, as sent by both
/// GitHub and GitLab on paginated endpoints.
pub fn link_rel(headers: &HeaderMap, rel: &str) -> Option<String> {
    let value = headers.get(LINK)?.to_str().ok()?;
    let wanted = format!("rel=\"{}\"", rel);

    value.split(',').find_map(|part| {
        let mut pieces = part.split(';').map(str::trim);
        let target = pieces.next()?;
        if !pieces.any(|p| p == wanted) {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

/// Next and last page links of a paginated response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<String>,
    pub last: Option<String>,
}

impl PageLinks {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            next: link_rel(headers, "next"),
            last: link_rel(headers, "last"),
        }
    }
}
