//! Minimal XML element tokenizer for icon documents.
//!
//! Produces the flat, document-ordered list of start tags the renderer
//! walks. Nesting is not tracked: close tags and character data are
//! dropped, and comments, `<?...?>`, `<!DOCTYPE>` and CDATA sections are
//! skipped. Tag and attribute names are kept verbatim (SVG is
//! case-sensitive). The usual predefined and numeric entities are decoded
//! in attribute values.

use crate::error::{RasterError, Result};
use std::collections::HashMap;

/// One start (or empty-element) tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SvgElement {
    pub name: String,
    pub attrs: HashMap<String, String>,
}

impl SvgElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: HashMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }
}

/// Tokenize `source` into its start tags, in document order.
///
/// Fails only on structurally broken markup: an unterminated tag, comment
/// or quoted attribute value.
pub fn parse_elements(source: &str) -> Result<Vec<SvgElement>> {
    let mut elements = Vec::new();
    let mut rest = source;

    while let Some(lt) = rest.find('<') {
        rest = &rest[lt..];
        if let Some(body) = rest.strip_prefix("<!--") {
            rest = skip_past(body, "-->", "comment")?;
        } else if let Some(body) = rest.strip_prefix("<![CDATA[") {
            rest = skip_past(body, "]]>", "CDATA section")?;
        } else if let Some(body) = rest.strip_prefix("<?") {
            rest = skip_past(body, "?>", "processing instruction")?;
        } else if let Some(body) = rest.strip_prefix("<!") {
            rest = skip_past(body, ">", "declaration")?;
        } else if let Some(body) = rest.strip_prefix("</") {
            rest = skip_past(body, ">", "close tag")?;
        } else {
            let body = &rest[1..];
            let end = find_tag_end(body)?;
            let inner = body[..end].trim_end();
            let inner = inner.strip_suffix('/').unwrap_or(inner);
            if let Some(el) = parse_tag_inner(inner)? {
                elements.push(el);
            }
            rest = &body[end + 1..];
        }
    }
    Ok(elements)
}

fn skip_past<'a>(s: &'a str, needle: &str, what: &str) -> Result<&'a str> {
    s.find(needle)
        .map(|i| &s[i + needle.len()..])
        .ok_or_else(|| RasterError::Parse(format!("unterminated {}", what)))
}

/// Byte offset of the `>` closing a tag, skipping quoted values.
fn find_tag_end(s: &str) -> Result<usize> {
    let mut quote: Option<u8> = None;
    for (i, b) in s.bytes().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Ok(i),
            _ => {}
        }
    }
    Err(RasterError::Parse("unterminated tag".to_string()))
}

fn is_xml_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Parse `name key="value" ...`. An empty name yields `None`.
fn parse_tag_inner(inner: &str) -> Result<Option<SvgElement>> {
    let inner = inner.trim_matches(is_xml_space);
    let name_end = inner.find(is_xml_space).unwrap_or(inner.len());
    let name = &inner[..name_end];
    if name.is_empty() {
        return Ok(None);
    }
    let mut el = SvgElement::new(name);
    let mut rest = inner[name_end..].trim_start_matches(is_xml_space);

    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c == '=' || is_xml_space(c))
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = rest[key_end..].trim_start_matches(is_xml_space);

        let Some(after_eq) = rest.strip_prefix('=') else {
            // Attribute without a value
            if !key.is_empty() {
                el.attrs.insert(key.to_string(), key.to_string());
            }
            if key.is_empty() {
                // Stray '=' or junk; drop one character to make progress.
                let mut chars = rest.chars();
                chars.next();
                rest = chars.as_str();
            }
            rest = rest.trim_start_matches(is_xml_space);
            continue;
        };
        rest = after_eq.trim_start_matches(is_xml_space);

        let value;
        match rest.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let body = &rest[1..];
                let close = body.find(q).ok_or_else(|| {
                    RasterError::Parse(format!("unterminated value for attribute {:?}", key))
                })?;
                value = decode_entities(&body[..close]);
                rest = &body[close + 1..];
            }
            _ => {
                let end = rest.find(is_xml_space).unwrap_or(rest.len());
                value = decode_entities(&rest[..end]);
                rest = &rest[end..];
            }
        }
        if !key.is_empty() {
            el.attrs.insert(key.to_string(), value);
        }
        rest = rest.trim_start_matches(is_xml_space);
    }
    Ok(Some(el))
}

// ============================================================================
// Entity decoding
// ============================================================================

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let c = match &rest[1..semi] {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                e => e
                    .strip_prefix("#x")
                    .or_else(|| e.strip_prefix("#X"))
                    .map(|h| u32::from_str_radix(h, 16))
                    .or_else(|| e.strip_prefix('#').map(|d| d.parse::<u32>()))
                    .and_then(|n| n.ok())
                    .and_then(char::from_u32),
            };
            c.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_document() {
        let src = r##"<?xml version="1.0"?>
<!DOCTYPE svg>
<!-- icon -->
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16" width="16">
  <title>Save</title>
  <path d="M0 0 L16 16" fill="#ff0000"/>
  <rect x='1' y='2' width="3" height="4" />
</svg>"##;
        let els = parse_elements(src).unwrap();
        let names: Vec<&str> = els.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["svg", "title", "path", "rect"]);
        assert_eq!(els[0].attr("viewBox"), Some("0 0 16 16"));
        assert_eq!(els[2].attr("fill"), Some("#ff0000"));
        assert_eq!(els[3].attr("y"), Some("2"));
        assert_eq!(els[3].attr("height"), Some("4"));
    }

    #[test]
    fn test_quoted_gt_in_value() {
        let els = parse_elements(r#"<svg><path d="M0 0" data-x="a>b"/></svg>"#).unwrap();
        assert_eq!(els[1].attr("data-x"), Some("a>b"));
    }

    #[test]
    fn test_entities() {
        let els = parse_elements(r#"<svg><text v="a &amp; b &#65;&#x42; &bogus;"/></svg>"#).unwrap();
        assert_eq!(els[1].attr("v"), Some("a & b AB &bogus;"));
    }

    #[test]
    fn test_unquoted_and_bare_attributes() {
        let els = parse_elements("<svg width=16 hidden height = '8'>").unwrap();
        assert_eq!(els[0].attr("width"), Some("16"));
        assert_eq!(els[0].attr("hidden"), Some("hidden"));
        assert_eq!(els[0].attr("height"), Some("8"));
    }

    #[test]
    fn test_cdata_skipped() {
        let els = parse_elements("<svg><style><![CDATA[ a < b > c ]]></style><path/></svg>").unwrap();
        let names: Vec<&str> = els.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["svg", "style", "path"]);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse_elements("<svg"), Err(RasterError::Parse(_))));
        assert!(matches!(parse_elements("<svg a=\"x>"), Err(RasterError::Parse(_))));
        assert!(matches!(parse_elements("<!-- never ends"), Err(RasterError::Parse(_))));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_elements("").unwrap().is_empty());
        assert!(parse_elements("just text").unwrap().is_empty());
    }

    #[test]
    fn test_element_builder() {
        let el = SvgElement::new("circle").with_attr("r", "4");
        assert_eq!(el.attr("r"), Some("4"));
        assert_eq!(el.attr("cx"), None);
    }
}
