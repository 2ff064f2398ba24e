/// Uppercase the first character, leaving the rest untouched.
///
/// Model file names use this form: `widgetItem` -> `WidgetItem`.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character, leaving the rest untouched.
///
/// Definition keys inside model documents use this form: `WidgetItem` -> `widgetItem`.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
