//! Page analysis shared by the engines
//!
//! A fetched document yields its title, the http(s) links it points at, and
//! the values captured by the active custom fields.

use crate::fields::{FieldMatch, FieldRegistry};
use scraper::{ElementRef, Html, Selector};
use url::Url;

const LINK_SELECTOR: &str = "a[href], link[rel='canonical'][href]";

/// Title and outgoing links of an HTML document
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    pub title: Option<String>,

    /// Absolute http(s) URLs, deduplicated, in document order
    pub links: Vec<String>,
}

/// Everything learned from one crawled page
#[derive(Debug, Clone)]
pub struct PageReport {
    pub url: String,
    pub title: Option<String>,
    pub links: Vec<String>,
    pub fields: Vec<FieldMatch>,
}

impl PageReport {
    /// Emits the report as tracing events
    ///
    /// One `info` event per page and per field value; discovered links are
    /// reported at `debug`.
    pub fn log(&self) {
        tracing::info!(
            url = %self.url,
            title = self.title.as_deref().unwrap_or(""),
            links = self.links.len(),
            fields = self.fields.len(),
            "crawled"
        );
        for m in &self.fields {
            tracing::info!(url = %self.url, field = %m.field, value = %m.value, "field");
        }
        for link in &self.links {
            tracing::debug!(url = %self.url, link = %link, "link");
        }
    }
}

/// Parses a fetched document and runs the active fields over it
pub fn analyze_page(url: &Url, body: &str, registry: &FieldRegistry) -> PageReport {
    let parsed = parse_html(body, url);
    PageReport {
        url: url.to_string(),
        title: parsed.title,
        links: parsed.links,
        fields: registry.extract(body),
    }
}

/// Extracts the title and outgoing links of `html`
///
/// Links come from `<a href>` and `<link rel="canonical">`. Fragment-only
/// hrefs, `download` anchors and anything that does not resolve to http(s)
/// (`mailto:`, `javascript:`, `data:` ...) are dropped.
///
/// ```
/// use sumi_harvest::engine::parse_html;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html("<title>Test</title><a href='/a'>a</a>", &base);
/// assert_eq!(parsed.title.as_deref(), Some("Test"));
/// assert_eq!(parsed.links, vec!["https://example.com/a"]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    let title = Selector::parse("title").ok().and_then(|selector| {
        document
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty())
    });

    let mut links: Vec<String> = Vec::new();
    if let Ok(selector) = Selector::parse(LINK_SELECTOR) {
        for link in document
            .select(&selector)
            .filter_map(|element| link_target(element, base_url))
        {
            if !links.contains(&link) {
                links.push(link);
            }
        }
    }

    ParsedPage { title, links }
}

fn link_target(element: ElementRef<'_>, base_url: &Url) -> Option<String> {
    let node = element.value();
    if node.name() == "a" && node.attr("download").is_some() {
        return None;
    }

    let href = node.attr("href")?.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let target = base_url.join(href).ok()?;
    matches!(target.scheme(), "http" | "https").then(|| target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{default_fields, FieldDefinition};

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_title_is_trimmed_and_optional() {
        let parsed = parse_html("<title>  Test Page  </title>", &base_url());
        assert_eq!(parsed.title.as_deref(), Some("Test Page"));

        assert_eq!(parse_html("<p>no title</p>", &base_url()).title, None);
        assert_eq!(parse_html("<title>   </title>", &base_url()).title, None);
    }

    #[test]
    fn test_links_are_resolved_filtered_and_deduplicated() {
        let html = r##"
            <html>
            <head><link rel="canonical" href="https://example.com/canonical" /></head>
            <body>
                <a href="/valid">Valid</a>
                <a href="javascript:alert('no')">Script</a>
                <a href="mailto:test@example.com">Mail</a>
                <a href="tel:+1234567890">Phone</a>
                <a href="#section">Fragment</a>
                <a href="/file.pdf" download>Download</a>
                <a href="ftp://example.com/file">FTP</a>
                <a href="other">Relative</a>
                <a href="/valid">Again</a>
            </body>
            </html>
        "##;

        let parsed = parse_html(html, &base_url());

        assert_eq!(
            parsed.links,
            vec![
                "https://example.com/canonical",
                "https://example.com/valid",
                "https://example.com/other",
            ]
        );
    }

    #[test]
    fn test_analyze_page_captures_active_fields() {
        let registry = FieldRegistry::new();
        let mut email = default_fields().remove(0);
        email.compile().unwrap();
        let mut ids = FieldDefinition::new("ticket", 1, vec![r"TICKET-(\d+)".to_string()]);
        ids.compile().unwrap();
        registry.merge(vec![email, ids]);

        let html = r#"<html><head><title>Support</title></head>
            <body><a href="mailto:help@example.com">help@example.com</a> TICKET-12</body></html>"#;
        let report = analyze_page(&base_url(), html, &registry);

        assert_eq!(report.title.as_deref(), Some("Support"));
        assert!(report.links.is_empty());
        let values: Vec<(&str, &str)> = report
            .fields
            .iter()
            .map(|m| (m.field.as_str(), m.value.as_str()))
            .collect();
        assert_eq!(values, vec![("email", "help@example.com"), ("ticket", "12")]);
    }

    #[test]
    fn test_analyze_page_without_fields() {
        let report = analyze_page(&base_url(), "plain text a@b.com", &FieldRegistry::new());
        assert!(report.fields.is_empty());
        assert_eq!(report.url, "https://example.com/page");
    }
}
