//! Colour-code stripping for stored display names

const COLOR_MARKERS: [char; 2] = ['§', '&'];

fn is_color_code(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), '0'..='9' | 'a'..='f' | 'k'..='o' | 'r' | 'x')
}

/// Remove `§x` / `&x` formatting codes, leaving every other character intact
pub fn strip_colors(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if COLOR_MARKERS.contains(&c) {
            if let Some(&next) = chars.peek() {
                if is_color_code(next) {
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }

    out
}
