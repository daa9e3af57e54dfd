use crate::models::GeneratedImage;

pub const LABEL_CHARS: usize = 10;

/// Draws the first [`LABEL_CHARS`] characters of `label` on a grey 200x200 tile.
///
/// Truncation happens before XML escaping, so `&`, `<`, `>` and quotes in the
/// label show up as entities in the markup and as literal text when rendered.
pub fn placeholder_svg(label: &str) -> String {
    let text: String = label.chars().take(LABEL_CHARS).collect();
    format!(
        concat!(
            r##"<svg width="200" height="200" xmlns="http://www.w3.org/2000/svg">"##,
            r##"<rect width="100%" height="100%" fill="#f0f0f0"/>"##,
            r##"<text x="50%" y="50%" font-family="Arial" font-size="20" fill="#333" "##,
            r##"text-anchor="middle" dominant-baseline="middle">{}</text>"##,
            "</svg>"
        ),
        escape_xml(&text)
    )
}

/// Never fails and performs no I/O.
pub fn placeholder_image(label: &str) -> GeneratedImage {
    GeneratedImage::from_svg_markup(placeholder_svg(label))
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
