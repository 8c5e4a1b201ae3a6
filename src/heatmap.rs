//! Heatmap view
//!
//! One tile per holding, sized by its share of the largest position and
//! colored by signed percent change. Tiles wrap into rows.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::api::Holding;
use crate::app::{App, LoadingState};
use crate::portfolio::format_amount;

const TILE_HEIGHT: u16 = 5;
const MIN_TILE_WIDTH: u16 = 14;
const MAX_TILE_WIDTH: u16 = 36;

/// Color intensity for a tile: a floor of 0.3 so small moves stay
/// visible, saturating at 0.8 for moves of 25% and beyond.
pub fn heat_intensity(change_percent: f64) -> f64 {
    (0.3 + change_percent.abs() / 50.0).min(0.8)
}

/// Tile width in cells, proportional to the holding's share of the
/// largest market value.
pub fn tile_width(value: f64, max_value: f64) -> u16 {
    if max_value <= 0.0 {
        return MIN_TILE_WIDTH;
    }
    let ratio = (value / max_value).clamp(0.0, 1.0);
    let span = f64::from(MAX_TILE_WIDTH - MIN_TILE_WIDTH);
    MIN_TILE_WIDTH + (ratio * span) as u16
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    match &app.holdings {
        LoadingState::NotStarted | LoadingState::Loading => {
            centered_notice(frame, area, "Loading holdings…", theme.text_muted);
        }
        LoadingState::Error(err) => {
            centered_notice(frame, area, err, theme.negative);
        }
        LoadingState::Loaded(holdings) if holdings.is_empty() => {
            centered_notice(frame, area, "Nothing to map yet", theme.text_muted);
        }
        LoadingState::Loaded(holdings) => {
            render_tiles(frame, area, app, holdings);
        }
    }
}

fn render_tiles(frame: &mut Frame, area: Rect, app: &App, holdings: &[Holding]) {
    if area.width < MIN_TILE_WIDTH || area.height < TILE_HEIGHT {
        return;
    }
    let theme = &app.theme;
    let max_value = holdings
        .iter()
        .map(Holding::market_value)
        .fold(0.0_f64, f64::max);

    let mut x = area.x;
    let mut y = area.y;
    for holding in holdings {
        let width = tile_width(holding.market_value(), max_value).min(area.width.max(1));
        if x + width > area.x + area.width {
            x = area.x;
            y += TILE_HEIGHT + 1;
        }
        if y + TILE_HEIGHT > area.y + area.height {
            break;
        }
        let tile = Rect {
            x,
            y,
            width,
            height: TILE_HEIGHT,
        };
        let pct = holding.change_percent();
        let bg = theme.heat(pct, heat_intensity(pct));
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                holding.symbol.clone(),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("${}", format_amount(holding.market_value())),
                Style::default().fg(theme.text_secondary),
            )),
            Line::from(Span::styled(
                format!("{}{:.2}%", if pct >= 0.0 { "+" } else { "-" }, pct.abs()),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .style(Style::default().bg(bg)),
            tile,
        );
        x += width + 1;
    }
}

fn centered_notice(frame: &mut Frame, area: Rect, message: &str, color: ratatui::style::Color) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(color),
        )))
        .alignment(Alignment::Center),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_floor_and_cap() {
        assert_eq!(heat_intensity(0.0), 0.3);
        assert!((heat_intensity(5.0) - 0.4).abs() < 1e-9);
        assert!((heat_intensity(-5.0) - 0.4).abs() < 1e-9);
        assert_eq!(heat_intensity(25.0), 0.8);
        assert_eq!(heat_intensity(400.0), 0.8);
    }

    #[test]
    fn test_tile_width_scales_with_value() {
        let max = tile_width(1000.0, 1000.0);
        let half = tile_width(500.0, 1000.0);
        let tiny = tile_width(1.0, 1000.0);
        assert_eq!(max, MAX_TILE_WIDTH);
        assert!(half < max);
        assert!(tiny >= MIN_TILE_WIDTH);
    }

    #[test]
    fn test_tile_width_zero_max_value() {
        assert_eq!(tile_width(0.0, 0.0), MIN_TILE_WIDTH);
    }
}
