//! Template interpolation helpers
//!
//! Templates carry `%{name}` placeholders resolved from a string context.
//! Interpolation is total: unknown placeholders are left verbatim so a
//! sparse context can never make message composition fail.

use std::collections::BTreeMap;

/// Replace `%{name}` placeholders from the context, leaving misses verbatim
pub(crate) fn interpolate(template: &str, context: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("%{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match context.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("%{");
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Join items as a natural-language list: "a", "a and b", "a, b, and c"
pub(crate) fn to_sentence(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [single] => single.clone(),
        [first, second] => format!("{} and {}", first, second),
        [head @ .., last] => format!("{}, and {}", head.join(", "), last),
    }
}

/// Turn an identifier into prose: punctuation stripped, underscores to spaces
pub(crate) fn humanize(name: &str) -> String {
    name.trim_end_matches(['?', '!']).replace('_', " ")
}
