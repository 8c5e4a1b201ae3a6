//! Color themes for the dashboard
//!
//! Dark is the product palette: green on black, terminal aesthetic.
//! A light variant exists for washed-out terminals.

use ratatui::style::Color;

use crate::config::ThemeChoice;

const POSITIVE_RGB: (u8, u8, u8) = (16, 185, 129);
const NEGATIVE_RGB: (u8, u8, u8) = (239, 68, 68);

/// Theme colors for the application.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub panel_bg: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub border: Color,
    pub accent: Color,
    pub selection_bg: Color,

    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
}

impl Theme {
    /// Dark theme: green-on-black with a faint grid of panels.
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(0, 0, 0),
            panel_bg: Color::Rgb(17, 17, 17),

            text: Color::Rgb(0, 255, 0),
            text_secondary: Color::Rgb(0, 204, 0),
            text_muted: Color::Rgb(0, 119, 0),

            border: Color::Rgb(0, 85, 0),
            accent: Color::Rgb(0, 255, 0),
            selection_bg: Color::Rgb(0, 51, 0),

            positive: rgb(POSITIVE_RGB),
            negative: rgb(NEGATIVE_RGB),
            warning: Color::Rgb(245, 158, 11),
        }
    }

    /// Light variant.
    pub fn light() -> Self {
        Self {
            background: Color::Rgb(247, 250, 247),
            panel_bg: Color::Rgb(255, 255, 255),

            text: Color::Rgb(16, 48, 16),
            text_secondary: Color::Rgb(44, 84, 44),
            text_muted: Color::Rgb(110, 140, 110),

            border: Color::Rgb(178, 204, 178),
            accent: Color::Rgb(0, 130, 0),
            selection_bg: Color::Rgb(212, 235, 212),

            positive: rgb(POSITIVE_RGB),
            negative: rgb(NEGATIVE_RGB),
            warning: Color::Rgb(217, 119, 6),
        }
    }

    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }

    /// Heat-tile color for a signed percent change: the positive or
    /// negative base scaled by `intensity` in `[0, 1]`.
    pub fn heat(&self, change_percent: f64, intensity: f64) -> Color {
        let (r, g, b) = if change_percent >= 0.0 {
            POSITIVE_RGB
        } else {
            NEGATIVE_RGB
        };
        let scale = intensity.clamp(0.0, 1.0);
        Color::Rgb(
            (f64::from(r) * scale) as u8,
            (f64::from(g) * scale) as u8,
            (f64::from(b) * scale) as u8,
        )
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}
