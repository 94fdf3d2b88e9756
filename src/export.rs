use std::fmt::Write as _;

use crate::catalog::{Catalog, Topic, CODE_FIELD};

/// Render the page script which loads samples into the code field.
///
/// Every topic gets a function, even with no flavors defined, so the page can
/// call it unconditionally and have the field cleared.
pub fn render_js(catalog: &Catalog) -> String {
    let mut out = String::new();
    for topic in Topic::ALL {
        render_function(&mut out, catalog, topic);
    }
    out
}

fn render_function(out: &mut String, catalog: &Catalog, topic: Topic) {
    // Writing to a `String` cannot fail
    let _ = writeln!(out, "function {}(flavor) {{", topic.function_name());
    out.push_str("\tlet codeString = '';\n");
    for (i, flavor) in catalog.flavors(topic).enumerate() {
        let keyword = if i == 0 { "if" } else { "else if" };
        let text = catalog.get(topic, flavor).unwrap_or("");
        let _ = writeln!(out, "\t{keyword} (flavor === '{}'){{", flavor.tag());
        let _ = writeln!(out, "\t\tcodeString += {};", js_string(text));
        out.push_str("\t}\n");
    }
    let _ = writeln!(
        out,
        "\tdocument.getElementById('{CODE_FIELD}').value = codeString;"
    );
    out.push_str("}\n");
}

/// Single-quoted JavaScript literal for `text`.
fn js_string(text: &str) -> String {
    let mut lit = String::with_capacity(text.len() + 2);
    lit.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => lit.push_str("\\\\"),
            '\'' => lit.push_str("\\'"),
            '\n' => lit.push_str("\\n"),
            '\r' => lit.push_str("\\r"),
            '\t' => lit.push_str("\\t"),
            // Line terminators inside JS string literals
            '\u{2028}' => lit.push_str("\\u2028"),
            '\u{2029}' => lit.push_str("\\u2029"),
            ch if ch.is_control() => {
                let _ = write!(lit, "\\x{:02x}", ch as u32);
            }
            ch => lit.push(ch),
        }
    }
    lit.push('\'');
    lit
}
