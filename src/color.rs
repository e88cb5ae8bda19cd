use palette::Srgb;

/// 8-bit sRGB colour used throughout the chart model.
pub type Rgb = Srgb<u8>;

pub const ORANGE: Rgb = palette::named::ORANGE;
pub const BLUE: Rgb = palette::named::BLUE;
pub const RED: Rgb = palette::named::RED;

// ---------------------------------------------------------------------------
// Colour specification parsing
// ---------------------------------------------------------------------------

/// Parse a user colour specification.
///
/// Accepted forms:
/// * CSS / X11 names – `"orange"`, `"steelblue"`
/// * hex – `"#ff8800"`, `"#f80"`
/// * single-letter shorthands – `"r"`, `"g"`, `"b"`, `"c"`, `"m"`, `"y"`, `"k"`, `"w"`
/// * the ten-colour default cycle – `"C0"`..`"C9"` or `"tab:blue"` etc.
pub fn parse_color(spec: &str) -> Option<Rgb> {
    let spec = spec.trim();
    if spec.is_empty() {
        return None;
    }

    if let Some(hex) = spec.strip_prefix('#') {
        return hex.parse::<Rgb>().ok();
    }

    let lower = spec.to_ascii_lowercase();
    if let Some(c) = shorthand(&lower) {
        return Some(c);
    }
    if let Some(c) = cycle_color(&lower) {
        return Some(c);
    }
    palette::named::from_str(&lower)
}

fn shorthand(spec: &str) -> Option<Rgb> {
    let c = match spec {
        "b" => Srgb::new(0, 0, 255),
        "g" => Srgb::new(0, 128, 0),
        "r" => Srgb::new(255, 0, 0),
        "c" => Srgb::new(0, 191, 191),
        "m" => Srgb::new(191, 0, 191),
        "y" => Srgb::new(191, 191, 0),
        "k" => Srgb::new(0, 0, 0),
        "w" => Srgb::new(255, 255, 255),
        _ => return None,
    };
    Some(c)
}

const CYCLE: [(&str, Rgb); 10] = [
    ("blue", Srgb::new(0x1f, 0x77, 0xb4)),
    ("orange", Srgb::new(0xff, 0x7f, 0x0e)),
    ("green", Srgb::new(0x2c, 0xa0, 0x2c)),
    ("red", Srgb::new(0xd6, 0x27, 0x28)),
    ("purple", Srgb::new(0x94, 0x67, 0xbd)),
    ("brown", Srgb::new(0x8c, 0x56, 0x4b)),
    ("pink", Srgb::new(0xe3, 0x77, 0xc2)),
    ("gray", Srgb::new(0x7f, 0x7f, 0x7f)),
    ("olive", Srgb::new(0xbc, 0xbd, 0x22)),
    ("cyan", Srgb::new(0x17, 0xbe, 0xcf)),
];

fn cycle_color(spec: &str) -> Option<Rgb> {
    if let Some(name) = spec.strip_prefix("tab:") {
        let name = if name == "grey" { "gray" } else { name };
        return CYCLE.iter().find(|(n, _)| *n == name).map(|(_, c)| *c);
    }
    let idx: usize = spec.strip_prefix('c')?.parse().ok()?;
    CYCLE.get(idx).map(|(_, c)| *c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colours() {
        assert_eq!(parse_color("orange"), Some(Srgb::new(255, 165, 0)));
        assert_eq!(parse_color("Blue"), Some(Srgb::new(0, 0, 255)));
        assert_eq!(parse_color(" red "), Some(RED));
    }

    #[test]
    fn hex_colours() {
        assert_eq!(parse_color("#ff8800"), Some(Srgb::new(255, 136, 0)));
        assert_eq!(parse_color("#f80"), Some(Srgb::new(255, 136, 0)));
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[test]
    fn shorthands_and_cycle() {
        assert_eq!(parse_color("k"), Some(Srgb::new(0, 0, 0)));
        assert_eq!(parse_color("C1"), Some(Srgb::new(0xff, 0x7f, 0x0e)));
        assert_eq!(parse_color("tab:red"), parse_color("C3"));
        assert_eq!(parse_color("C10"), None);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(parse_color("not-a-colour"), None);
        assert_eq!(parse_color(""), None);
    }
}
