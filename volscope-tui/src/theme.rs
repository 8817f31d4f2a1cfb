//! Parrot/neon theme tokens for the chart view
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (borders, focus)
//! - **Positive**: Neon green (calm tickers)
//! - **Negative**: Hot pink (most volatile tickers)
//! - **Warning**: Neon orange (elevated volatility)
//! - **Neutral**: Cool purple (secondary series)
//! - **Muted**: Steel blue (axes, hints)

use ratatui::style::{Color, Style};

/// Parrot/neon theme
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Near-black background (primary surface)
    pub background: Color,
    /// Electric cyan accent
    pub accent: Color,
    /// Neon green
    pub positive: Color,
    /// Hot pink
    pub negative: Color,
    /// Neon orange
    pub warning: Color,
    /// Cool purple
    pub neutral: Color,
    /// Steel blue (axes, hints)
    pub muted: Color,
    /// White (primary text)
    pub text_primary: Color,
    /// Light gray (secondary text)
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    /// Line colour for the i-th ticker; cycles once the palette runs out.
    pub fn series_color(&self, index: usize) -> Color {
        let palette = [
            self.accent,
            self.negative,
            self.positive,
            self.warning,
            self.neutral,
            self.muted,
            self.text_primary,
        ];
        palette[index % palette.len()]
    }

    /// Bar colour by annualized volatility.
    pub fn volatility_color(&self, annualized: f64) -> Color {
        match annualized {
            v if v >= 0.50 => self.negative,
            v if v >= 0.30 => self.warning,
            v if v >= 0.15 => self.accent,
            _ => self.positive,
        }
    }

    pub fn axis(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn label(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }
}
