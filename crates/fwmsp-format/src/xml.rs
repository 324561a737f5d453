//! XML escaping and the generic value-to-XML serializer.

use serde_json::Value;

/// Escape the five reserved XML characters.
///
/// Ampersand is substituted first so the later entity replacements are
/// not re-escaped. Applied to every string that becomes XML text,
/// attribute content, or an element name derived from an upstream key.
pub fn escape_xml(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render an arbitrary JSON value as a nested XML tree with typed leaf
/// tags, indented two spaces per depth level.
///
/// Scalars become `<value>` elements (strings escaped, numbers and
/// booleans verbatim, null as the literal text `null`); arrays become
/// `<array>` with one `<item index="N">` per element; objects become one
/// child element per key, the element named after the escaped key.
/// serde_json values are acyclic by construction, so the recursion
/// always terminates.
pub fn value_to_xml(value: &Value, depth: usize) -> String {
    let pad = "  ".repeat(depth);
    match value {
        Value::Null => format!("{pad}<value>null</value>\n"),
        Value::String(s) => format!("{pad}<value>{}</value>\n", escape_xml(s)),
        Value::Number(n) => format!("{pad}<value>{n}</value>\n"),
        Value::Bool(b) => format!("{pad}<value>{b}</value>\n"),
        Value::Array(items) => {
            if items.is_empty() {
                return format!("{pad}<array />\n");
            }
            let mut out = format!("{pad}<array>\n");
            for (index, item) in items.iter().enumerate() {
                out.push_str(&format!("{pad}  <item index=\"{index}\">\n"));
                out.push_str(&value_to_xml(item, depth + 2));
                out.push_str(&format!("{pad}  </item>\n"));
            }
            out.push_str(&format!("{pad}</array>\n"));
            out
        }
        Value::Object(map) => {
            if map.is_empty() {
                return format!("{pad}<object />\n");
            }
            let mut out = String::new();
            for (key, child) in map {
                let tag = escape_xml(key);
                out.push_str(&format!("{pad}<{tag}>\n"));
                out.push_str(&value_to_xml(child, depth + 1));
                out.push_str(&format!("{pad}</{tag}>\n"));
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn escapes_all_five_reserved_characters() {
        let escaped = escape_xml(r#"a&b<c>d"e'f"#);
        assert_eq!(escaped, "a&amp;b&lt;c&gt;d&quot;e&#39;f");
        for raw in ['&', '<', '>', '"', '\''] {
            assert!(!escaped.contains(raw), "raw {raw} left in output");
        }
    }

    #[test]
    fn ampersand_escaped_exactly_once() {
        assert_eq!(escape_xml("&lt;"), "&amp;lt;");
        assert_eq!(escape_xml("&&"), "&amp;&amp;");
    }

    #[test]
    fn scalars_become_typed_leaves() {
        assert_eq!(value_to_xml(&json!(null), 0), "<value>null</value>\n");
        assert_eq!(value_to_xml(&json!("hi"), 0), "<value>hi</value>\n");
        assert_eq!(value_to_xml(&json!(42), 0), "<value>42</value>\n");
        assert_eq!(value_to_xml(&json!(true), 0), "<value>true</value>\n");
        assert_eq!(
            value_to_xml(&json!("a<b"), 0),
            "<value>a&lt;b</value>\n"
        );
    }

    #[test]
    fn empty_containers_self_close() {
        assert_eq!(value_to_xml(&json!([]), 0), "<array />\n");
        assert_eq!(value_to_xml(&json!({}), 0), "<object />\n");
    }

    #[test]
    fn arrays_index_items() {
        let xml = value_to_xml(&json!(["a", "b"]), 0);
        assert_eq!(
            xml,
            "<array>\n  <item index=\"0\">\n    <value>a</value>\n  </item>\n  <item index=\"1\">\n    <value>b</value>\n  </item>\n</array>\n"
        );
    }

    #[test]
    fn objects_use_keys_as_element_names() {
        let xml = value_to_xml(&json!({ "name": "box", "online": true }), 0);
        assert_eq!(
            xml,
            "<name>\n  <value>box</value>\n</name>\n<online>\n  <value>true</value>\n</online>\n"
        );
    }

    #[test]
    fn unsafe_keys_are_escaped() {
        let xml = value_to_xml(&json!({ "a<b": 1 }), 0);
        assert!(xml.contains("<a&lt;b>"));
        assert!(xml.contains("</a&lt;b>"));
    }

    #[test]
    fn nested_structure_round_trips_shape() {
        let value = json!({
            "results": [{ "name": "x", "count": 2 }],
            "nextCursor": null
        });
        let xml = value_to_xml(&value, 0);
        assert!(xml.contains("<results>"));
        assert!(xml.contains("<item index=\"0\">"));
        assert!(xml.contains("<name>"));
        assert!(xml.contains("<value>x</value>"));
        assert!(xml.contains("<value>2</value>"));
        assert!(xml.contains("<nextCursor>\n  <value>null</value>\n</nextCursor>"));
    }

    #[test]
    fn indentation_is_stable() {
        let once = value_to_xml(&json!({ "a": [1] }), 1);
        let twice = value_to_xml(&json!({ "a": [1] }), 1);
        assert_eq!(once, twice);
        assert!(once.starts_with("  <a>"));
    }
}
