//! Data-binding tokens embedded in text content.
//!
//! Text may contain placeholders such as `{time.formatted24}` or
//! `{weather.temp}`. The engine stores them verbatim; resolving them to live
//! values belongs to a [`DataProvider`] supplied by the host.

use std::collections::HashMap;
use std::ops::Range;

use crate::document::Document;
use crate::element::{ElementId, ElementKind};

/// One `{namespace.key}` placeholder found in a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingToken {
    /// Leading segment, e.g. `time`.
    pub namespace: String,
    /// Everything after the first dot, e.g. `formatted24`.
    pub key: String,
    /// Byte range of the token in the source, braces included.
    pub span: Range<usize>,
}

impl BindingToken {
    /// Full dotted path, e.g. `time.formatted24`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}.{}", self.namespace, self.key)
    }
}

/// Supplies display values for binding paths.
pub trait DataProvider {
    /// Current value for a dotted path, or `None` if unknown.
    fn value(&self, path: &str) -> Option<String>;
}

impl DataProvider for HashMap<String, String> {
    fn value(&self, path: &str) -> Option<String> {
        self.get(path).cloned()
    }
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse the inside of a brace pair.
fn parse_token(inner: &str) -> Option<(&str, &str)> {
    let (namespace, key) = inner.split_once('.')?;
    let valid = !namespace.is_empty()
        && namespace.chars().all(is_ident)
        && !key.is_empty()
        && key.split('.').all(|seg| !seg.is_empty() && seg.chars().all(is_ident));
    valid.then_some((namespace, key))
}

/// List the binding tokens in `content`, left to right.
///
/// Anything between braces that is not `ident.ident[.ident...]` is plain
/// text, so `{}`, `{ time.now }` and `{time}` are not tokens.
#[must_use]
pub fn tokens(content: &str) -> Vec<BindingToken> {
    let mut found = Vec::new();
    let mut search_from = 0;
    while let Some(open) = content[search_from..].find('{').map(|i| i + search_from) {
        let Some(close) = content[open + 1..].find(['{', '}']).map(|i| i + open + 1) else {
            break;
        };
        if content[close..].starts_with('{') {
            search_from = close;
            continue;
        }
        if let Some((namespace, key)) = parse_token(&content[open + 1..close]) {
            found.push(BindingToken {
                namespace: namespace.to_string(),
                key: key.to_string(),
                span: open..close + 1,
            });
        }
        search_from = close + 1;
    }
    found
}

/// Substitute every token the provider knows; unknown tokens stay verbatim.
#[must_use]
pub fn resolve(content: &str, provider: &dyn DataProvider) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for token in tokens(content) {
        if let Some(value) = provider.value(&token.path()) {
            out.push_str(&content[last..token.span.start]);
            out.push_str(&value);
            last = token.span.end;
        }
    }
    out.push_str(&content[last..]);
    out
}

impl Document {
    /// Binding tokens used by text elements, in paint order.
    #[must_use]
    pub fn binding_tokens(&self) -> Vec<(ElementId, BindingToken)> {
        self.flattened_ids()
            .into_iter()
            .filter_map(|id| self.element(id))
            .flat_map(|element| {
                let content = match &element.kind {
                    ElementKind::Text { content, .. } | ElementKind::CurvedText { content, .. } => {
                        content.as_str()
                    }
                    _ => "",
                };
                tokens(content)
                    .into_iter()
                    .map(move |token| (element.id, token))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::document::CanvasSize;
    use crate::element::Element;

    fn paths(content: &str) -> Vec<String> {
        tokens(content).iter().map(BindingToken::path).collect()
    }

    #[test]
    fn test_tokens_found_in_order() {
        assert_eq!(
            paths("It is {time.formatted24}, {weather.temp} out"),
            vec!["time.formatted24", "weather.temp"]
        );
    }

    #[test]
    fn test_token_span_covers_braces() {
        let found = tokens("a {b.c} d");
        assert_eq!(found[0].span, 2..7);
        assert_eq!(found[0].namespace, "b");
        assert_eq!(found[0].key, "c");
    }

    #[test]
    fn test_dotted_keys() {
        assert_eq!(paths("{battery.level.percent}"), vec!["battery.level.percent"]);
    }

    #[test]
    fn test_non_tokens_ignored() {
        assert!(paths("{} {time} { time.now } {time.} {.now} {a..b}").is_empty());
        assert!(paths("unclosed {time.now").is_empty());
    }

    #[test]
    fn test_nested_open_brace_restarts() {
        assert_eq!(paths("{{time.now}}"), vec!["time.now"]);
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        let mut values = HashMap::new();
        values.insert("time.now".to_string(), "12:00".to_string());
        assert_eq!(
            resolve("{time.now} / {weather.temp}", &values),
            "12:00 / {weather.temp}"
        );
    }

    #[test]
    fn test_document_binding_tokens() {
        let text = Element::new(ElementKind::text("{time.now}", 24.0));
        let rect = Element::new(ElementKind::Rectangle);
        let order = vec![rect.id, text.id];
        let text_id = text.id;
        let elements: BTreeMap<_, _> = [(rect.id, rect), (text.id, text)].into_iter().collect();
        let document =
            Document::from_parts(elements, order, CanvasSize::default()).expect("valid");

        let found = document.binding_tokens();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, text_id);
        assert_eq!(found[0].1.path(), "time.now");
    }
}
