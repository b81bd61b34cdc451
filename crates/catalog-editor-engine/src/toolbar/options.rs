//! Choices offered by the font dropdowns: `(label, css value)` pairs.

pub const FONT_FAMILY_OPTIONS: [(&str, &str); 4] = [
    ("Default (Arial)", "Arial"),
    ("Courier New", "Courier New"),
    ("Georgia", "Georgia"),
    ("Times New Roman", "Times New Roman"),
];

pub const FONT_SIZE_OPTIONS: [(&str, &str); 4] = [
    ("Small (12px)", "12px"),
    ("Normal (16px)", "16px"),
    ("Large (20px)", "20px"),
    ("Huge (24px)", "24px"),
];

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_FONT_SIZE: &str = "16px";

/// Label shown for a css value, falling back to the value itself
pub fn label_for<'a>(options: &'a [(&'a str, &'a str)], value: &'a str) -> &'a str {
    options
        .iter()
        .find(|(_, css)| *css == value)
        .map(|(label, _)| *label)
        .unwrap_or(value)
}
