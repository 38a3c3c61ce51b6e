//! Narrow tree queries over a parsed HTML document.
//!
//! Lookups distinguish "nothing matched" (`Ok(None)` / an empty list) from a query that
//! could not be evaluated at all (`Err(QueryError)`); callers treat the two differently.
use scraper::{ElementRef, Html, Selector};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("invalid tag name {0:?}")]
    InvalidTag(String),
    #[error("invalid class name {0:?}")]
    InvalidClass(String),
    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
}

pub struct Document {
    html: Html,
}

/// An element inside a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl Document {
    /// Parse bytes as an HTML document; invalid UTF-8 is replaced, malformed markup is
    /// repaired by the parser.
    pub fn parse(bytes: &[u8]) -> Self {
        Self {
            html: Html::parse_document(&String::from_utf8_lossy(bytes)),
        }
    }

    /// Every `tag` element carrying `class`, in document order.
    pub fn find_all(&self, tag: &str, class: &str) -> Result<Vec<Node<'_>>, QueryError> {
        let selector = build_selector(tag, Some(class))?;
        Ok(self
            .html
            .select(&selector)
            .map(|element| Node { element })
            .collect())
    }
}

impl<'a> Node<'a> {
    /// First descendant `tag` element, optionally restricted to `class`.
    pub fn find_first(&self, tag: &str, class: Option<&str>) -> Result<Option<Node<'a>>, QueryError> {
        let selector = build_selector(tag, class)?;
        Ok(self
            .element
            .select(&selector)
            .next()
            .map(|element| Node { element }))
    }

    /// Concatenated text of the element and its descendants, untrimmed.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with(|c: char| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn build_selector(tag: &str, class: Option<&str>) -> Result<Selector, QueryError> {
    if !is_identifier(tag) {
        return Err(QueryError::InvalidTag(tag.to_string()));
    }
    let css = match class {
        Some(class) if !is_identifier(class) => {
            return Err(QueryError::InvalidClass(class.to_string()));
        }
        Some(class) => format!("{tag}.{class}"),
        None => tag.to_string(),
    };
    Selector::parse(&css).map_err(|e| QueryError::Selector {
        reason: e.to_string(),
        selector: css.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &[u8] = br#"
        <html><body>
          <div class="day first"><span>one</span><a>x</a><a>y</a></div>
          <div class="day"><span class="inner">two</span></div>
          <p class="day">not a div</p>
        </body></html>"#;

    #[test]
    fn find_all_matches_class_membership_in_order() {
        let doc = Document::parse(PAGE);
        let days = doc.find_all("div", "day").unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].text(), "onexy");
        assert_eq!(days[1].text(), "two");
    }

    #[test]
    fn find_first_returns_none_when_absent() {
        let doc = Document::parse(PAGE);
        let days = doc.find_all("div", "day").unwrap();
        assert!(days[1].find_first("a", None).unwrap().is_none());
        let first = days[0].find_first("a", None).unwrap().unwrap();
        assert_eq!(first.text(), "x");
    }

    #[test]
    fn find_first_can_filter_by_class() {
        let doc = Document::parse(PAGE);
        let days = doc.find_all("div", "day").unwrap();
        assert!(days[0].find_first("span", Some("inner")).unwrap().is_none());
        assert!(days[1].find_first("span", Some("inner")).unwrap().is_some());
    }

    #[test]
    fn malformed_query_is_an_error_not_an_absence() {
        let doc = Document::parse(PAGE);
        assert_eq!(
            doc.find_all("div", "two words").err(),
            Some(QueryError::InvalidClass("two words".into()))
        );
        assert_eq!(
            doc.find_all("", "day").err(),
            Some(QueryError::InvalidTag(String::new()))
        );
    }

    #[test]
    fn invalid_utf8_is_tolerated() {
        let doc = Document::parse(b"<div class=\"day\">\xff ok</div>");
        let days = doc.find_all("div", "day").unwrap();
        assert!(days[0].text().ends_with("ok"));
    }
}
