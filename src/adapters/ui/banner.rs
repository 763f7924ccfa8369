//! Startup banner: "RAIL DESK" in the standard figlet font with a blue-to-green gradient.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};
use tracing::debug;

const TITLE: &str = "RAIL DESK";

/// Signal blue (#1e6fd9).
const SIGNAL_BLUE: (u8, u8, u8) = (0x1e, 0x6f, 0xd9);
/// Clear-track green (#2ecc71).
const TRACK_GREEN: (u8, u8, u8) = (0x2e, 0xcc, 0x71);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let mix = |x: u8, y: u8| (f64::from(x) * (1.0 - t) + f64::from(y) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// ASCII art for the title, or the plain title when the font cannot render it.
fn title_art() -> String {
    match FIGfont::standard() {
        Ok(font) => match font.convert(TITLE) {
            Some(figure) => figure.to_string(),
            None => TITLE.to_string(),
        },
        Err(e) => {
            debug!(error = %e, "figlet font unavailable, plain banner");
            TITLE.to_string()
        }
    }
}

/// Prints the banner with a per-line gradient, then the version line.
pub fn print_welcome() {
    let mut out = stdout();
    let art = title_art();
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(SIGNAL_BLUE, TRACK_GREEN, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let (r, g, b) = TRACK_GREEN;
    let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
    let _ = out.execute(Print(format!(
        "v{}  railway complaint desk\r\n\r\n",
        env!("CARGO_PKG_VERSION")
    )));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_endpoints() {
        assert_eq!(lerp_rgb(SIGNAL_BLUE, TRACK_GREEN, 0.0), SIGNAL_BLUE);
        assert_eq!(lerp_rgb(SIGNAL_BLUE, TRACK_GREEN, 1.0), TRACK_GREEN);
    }

    #[test]
    fn art_is_never_empty() {
        assert!(!title_art().trim().is_empty());
    }
}
