// Per-type sanitization of panel input
//
// Best-effort and never fatal: a malformed value is persisted in its best
// sanitized form and a warning is surfaced to the panel caller. An
// operator's edit is never dropped over a format error.

use serde_json::Value;

use crate::model::FieldType;

/// Non-fatal sanitization warning attached to a panel batch outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizeWarning {
    pub key: String,
    pub field_type: FieldType,
    pub message: String,
}

impl std::fmt::Display for SanitizeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.key, self.field_type, self.message)
    }
}

/// Sanitize a raw panel value per field type. Returns the cleaned value
/// and an optional warning message.
pub fn sanitize(field_type: FieldType, raw: &Value) -> (Value, Option<String>) {
    match field_type {
        FieldType::Text | FieldType::Select | FieldType::Radio => {
            (Value::String(strip_tags(&coerce_string(raw)).trim().to_string()), None)
        }
        FieldType::Textarea => {
            // Strip markup but keep interior newlines.
            (Value::String(strip_tags(&coerce_string(raw)).trim().to_string()), None)
        }
        FieldType::RichText => rich_text(raw),
        FieldType::Checkbox => (Value::Bool(truthy(raw)), None),
        FieldType::Number => number(raw),
        FieldType::Color => color(raw),
        FieldType::Image => image(raw),
        FieldType::Schedule | FieldType::RawJson | FieldType::MenuStructure => {
            structured(field_type, raw)
        }
    }
}

fn coerce_string(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Drop everything between `<` and `>`. Unterminated tags swallow the
/// remainder, matching the conservative reading of malformed markup.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn truthy(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => {
            matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes")
        }
        _ => false,
    }
}

fn number(raw: &Value) -> (Value, Option<String>) {
    match raw {
        Value::Number(_) => (raw.clone(), None),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(int) = trimmed.parse::<i64>() {
                (Value::from(int), None)
            } else if let Ok(float) = trimmed.parse::<f64>() {
                (Value::from(float), None)
            } else {
                (
                    Value::String(trimmed.to_string()),
                    Some(format!("expected a number, kept \"{trimmed}\" as-is")),
                )
            }
        }
        other => (other.clone(), Some("expected a number".to_string())),
    }
}

fn color(raw: &Value) -> (Value, Option<String>) {
    let cleaned = strip_tags(&coerce_string(raw)).trim().to_string();
    let valid = cleaned.strip_prefix('#').map_or(false, |hex| {
        matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
    });
    if valid || cleaned.is_empty() {
        (Value::String(cleaned), None)
    } else {
        let warning = format!("\"{cleaned}\" is not a hex color");
        (Value::String(cleaned), Some(warning))
    }
}

fn image(raw: &Value) -> (Value, Option<String>) {
    let cleaned = strip_tags(&coerce_string(raw)).trim().to_string();
    let valid = cleaned.is_empty()
        || cleaned.starts_with("http://")
        || cleaned.starts_with("https://")
        || cleaned.starts_with('/');
    if valid {
        (Value::String(cleaned), None)
    } else {
        let warning = format!("\"{cleaned}\" is not an http(s) or site-relative URL");
        (Value::String(cleaned), Some(warning))
    }
}

fn structured(field_type: FieldType, raw: &Value) -> (Value, Option<String>) {
    let value = match raw {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed) => parsed,
            Err(e) => {
                // Keep the operator's text rather than losing the edit.
                return (Value::String(s.clone()), Some(format!("invalid JSON kept as raw text: {e}")));
            }
        },
        other => other.clone(),
    };
    let shape_warning = match field_type {
        FieldType::Schedule if !value.is_object() => {
            Some("schedule should be an object keyed by day".to_string())
        }
        FieldType::MenuStructure if !value.is_array() => {
            Some("menu structure should be an array of items".to_string())
        }
        _ => None,
    };
    (value, shape_warning)
}

// ---------------------------------------------------------------------------
// Rich text
// ---------------------------------------------------------------------------

const ALLOWED_TAGS: &[&str] = &[
    "a", "em", "strong", "b", "i", "u", "p", "br", "ul", "ol", "li", "h1", "h2", "h3", "h4", "h5",
    "h6", "blockquote", "code", "pre", "img", "span",
];

fn rich_text(raw: &Value) -> (Value, Option<String>) {
    let input = coerce_string(raw);
    let (filtered, removed) = filter_html(&input);
    let warning = removed.then(|| "disallowed markup removed".to_string());
    (Value::String(filtered.trim().to_string()), warning)
}

/// Allow-list HTML filter. Disallowed tags are dropped whole; allowed tags
/// are re-emitted with event-handler and script-URL attributes removed.
fn filter_html(input: &str) -> (String, bool) {
    let mut out = String::with_capacity(input.len());
    let mut removed = false;
    let mut rest = input;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('>') {
            Some(end) => {
                match clean_tag(&after[..end]) {
                    Some((tag, attr_dropped)) => {
                        out.push_str(&tag);
                        removed |= attr_dropped;
                    }
                    None => removed = true,
                }
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated tag: drop the remainder.
                removed = true;
                rest = "";
            }
        }
    }
    out.push_str(rest);
    (out, removed)
}

/// Rebuild one tag if its name is allowed. Returns the emitted tag text and
/// whether any attribute was dropped; `None` means the whole tag is out.
fn clean_tag(body: &str) -> Option<(String, bool)> {
    let inner = body.trim();
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, inner),
    };

    let name_end = inner
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();
    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return None;
    }
    if closing {
        return Some((format!("</{name}>"), false));
    }

    let attrs_raw = &inner[name_end..];
    let self_closing = attrs_raw.trim_end().ends_with('/');
    let (kept_attrs, dropped) = clean_attrs(attrs_raw);

    let mut tag = String::with_capacity(name.len() + kept_attrs.len() + 4);
    tag.push('<');
    tag.push_str(&name);
    tag.push_str(&kept_attrs);
    if self_closing {
        tag.push_str(" /");
    }
    tag.push('>');
    Some((tag, dropped))
}

fn clean_attrs(raw: &str) -> (String, bool) {
    let mut kept = String::new();
    let mut dropped = false;
    let mut rest = raw.trim().trim_end_matches('/').trim_end();

    while !rest.is_empty() {
        let name_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let mut value: Option<&str> = None;
        if let Some(eq_rest) = rest.strip_prefix('=') {
            let eq_rest = eq_rest.trim_start();
            if let Some(quoted) = eq_rest.strip_prefix('"') {
                let end = quoted.find('"').unwrap_or(quoted.len());
                value = Some(&quoted[..end]);
                rest = quoted.get(end + 1..).unwrap_or("");
            } else if let Some(quoted) = eq_rest.strip_prefix('\'') {
                let end = quoted.find('\'').unwrap_or(quoted.len());
                value = Some(&quoted[..end]);
                rest = quoted.get(end + 1..).unwrap_or("");
            } else {
                let end = eq_rest.find(char::is_whitespace).unwrap_or(eq_rest.len());
                value = Some(&eq_rest[..end]);
                rest = &eq_rest[end..];
            }
            rest = rest.trim_start();
        }

        if name.is_empty() {
            // Malformed attribute soup; stop rather than loop.
            dropped = true;
            break;
        }

        let lower = name.to_ascii_lowercase();
        let unsafe_attr = lower.starts_with("on")
            || value.map_or(false, |v| {
                v.trim().to_ascii_lowercase().starts_with("javascript:")
            });
        if unsafe_attr {
            dropped = true;
            continue;
        }

        kept.push(' ');
        kept.push_str(name);
        if let Some(v) = value {
            kept.push_str("=\"");
            kept.push_str(v);
            kept.push('"');
        }
    }

    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_strips_tags_and_trims() {
        let (clean, warning) = sanitize(FieldType::Text, &json!("  <b>Custom</b>  "));
        assert_eq!(clean, json!("Custom"));
        assert!(warning.is_none());
    }

    #[test]
    fn textarea_keeps_interior_newlines() {
        let (clean, _) = sanitize(FieldType::Textarea, &json!("line one\n<i>line two</i>\n"));
        assert_eq!(clean, json!("line one\nline two"));
    }

    #[test]
    fn checkbox_truthy_coercion() {
        for raw in [json!(true), json!("1"), json!("on"), json!("Yes"), json!(2)] {
            assert_eq!(sanitize(FieldType::Checkbox, &raw).0, json!(true), "raw: {raw}");
        }
        for raw in [json!(false), json!(""), json!("off"), json!(0), json!(null), json!([1])] {
            assert_eq!(sanitize(FieldType::Checkbox, &raw).0, json!(false), "raw: {raw}");
        }
    }

    #[test]
    fn number_parses_strings_and_keeps_garbage_with_warning() {
        assert_eq!(sanitize(FieldType::Number, &json!("42")).0, json!(42));
        assert_eq!(sanitize(FieldType::Number, &json!(" 2.5 ")).0, json!(2.5));
        assert_eq!(sanitize(FieldType::Number, &json!(7)).0, json!(7));

        let (clean, warning) = sanitize(FieldType::Number, &json!("a lot"));
        assert_eq!(clean, json!("a lot"));
        assert!(warning.is_some());
    }

    #[test]
    fn color_validates_hex_shapes() {
        assert!(sanitize(FieldType::Color, &json!("#fff")).1.is_none());
        assert!(sanitize(FieldType::Color, &json!("#00ff99")).1.is_none());
        assert!(sanitize(FieldType::Color, &json!("#00ff99cc")).1.is_none());

        let (clean, warning) = sanitize(FieldType::Color, &json!("red"));
        assert_eq!(clean, json!("red"));
        assert!(warning.is_some());
    }

    #[test]
    fn image_accepts_http_and_relative_urls() {
        assert!(sanitize(FieldType::Image, &json!("https://cdn.example.com/a.png")).1.is_none());
        assert!(sanitize(FieldType::Image, &json!("/uploads/a.png")).1.is_none());
        assert!(sanitize(FieldType::Image, &json!("ftp://example.com/a.png")).1.is_some());
    }

    #[test]
    fn rich_text_keeps_allowed_tags() {
        let (clean, warning) =
            sanitize(FieldType::RichText, &json!("<p>Hello <strong>world</strong></p>"));
        assert_eq!(clean, json!("<p>Hello <strong>world</strong></p>"));
        assert!(warning.is_none());
    }

    #[test]
    fn rich_text_drops_script_tags_and_event_handlers() {
        let (clean, warning) =
            sanitize(FieldType::RichText, &json!("<p onclick=\"steal()\">hi</p><script>x</script>"));
        assert_eq!(clean, json!("<p>hi</p>x"));
        assert!(warning.is_some());
    }

    #[test]
    fn rich_text_drops_javascript_urls() {
        let (clean, warning) =
            sanitize(FieldType::RichText, &json!("<a href=\"javascript:alert(1)\">x</a>"));
        assert_eq!(clean, json!("<a>x</a>"));
        assert!(warning.is_some());
    }

    #[test]
    fn structured_parses_json_strings() {
        let (clean, warning) = sanitize(FieldType::RawJson, &json!("{\"a\": 1}"));
        assert_eq!(clean, json!({"a": 1}));
        assert!(warning.is_none());
    }

    #[test]
    fn structured_keeps_raw_text_on_parse_failure() {
        let (clean, warning) = sanitize(FieldType::Schedule, &json!("mon 9-5, tue 9-5"));
        assert_eq!(clean, json!("mon 9-5, tue 9-5"));
        assert!(warning.is_some());
    }

    #[test]
    fn schedule_and_menu_shape_warnings() {
        let (clean, warning) = sanitize(FieldType::Schedule, &json!({"mon": "9-5"}));
        assert_eq!(clean, json!({"mon": "9-5"}));
        assert!(warning.is_none());

        let (_, warning) = sanitize(FieldType::Schedule, &json!([1, 2]));
        assert!(warning.is_some());

        let (_, warning) = sanitize(FieldType::MenuStructure, &json!({"home": "/"}));
        assert!(warning.is_some());
    }
}
