use colored::Color;

/// Colors for the banner, help screens and command output.
pub struct Palette {
    pub ok: Color,
    pub failure: Color,
    pub caution: Color,
    pub heading: Color,
    pub dim: Color,
    pub title: Color,
    pub marker: Color,
    pub label: Color,
    pub text: Color,
}

pub const PALETTE: Palette = Palette {
    ok: Color::Green,
    failure: Color::Red,
    caution: Color::Yellow,
    heading: Color::Cyan,
    dim: Color::BrightBlack,
    title: Color::BrightMagenta,
    marker: Color::Magenta,
    label: Color::BrightCyan,
    text: Color::White,
};

pub const CHECK: &str = "✓";
pub const ARROW: &str = "→";
pub const BULLET: &str = "•";
