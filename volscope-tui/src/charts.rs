//! Chart widgets: rolling volatility lines and annualized volatility bars.
//!
//! Both widgets render straight into a `Buffer` so they can be tested without
//! a terminal. Dates are plotted as days since the common era.

use chrono::{Datelike, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::{Direction, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

use volscope_runner::report::format_pct;
use volscope_runner::AnalysisReport;

use crate::theme::Theme;

/// One ticker's rolling volatility as plot coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub ticker: String,
    pub points: Vec<(f64, f64)>,
}

/// Everything the chart view draws, extracted from a ranked report.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Tickers with at least one full rolling window, in ranking order.
    pub rolling: Vec<LineSeries>,
    /// `(ticker, annualized volatility)` in ranking order.
    pub bars: Vec<(String, f64)>,
}

impl ChartData {
    pub fn from_report(report: &AnalysisReport) -> Self {
        let rolling = report
            .results
            .iter()
            .filter(|r| !r.rolling.points.is_empty())
            .map(|r| LineSeries {
                ticker: r.rolling.ticker.clone(),
                points: r
                    .rolling
                    .points
                    .iter()
                    .map(|(d, v)| (date_to_x(*d), *v))
                    .collect(),
            })
            .collect();

        let bars = report
            .summaries()
            .map(|s| (s.ticker.clone(), s.annualized_volatility))
            .collect();

        Self {
            start: report.start,
            end: report.end,
            rolling,
            bars,
        }
    }

    /// Smallest and largest x over every rolling series.
    fn x_bounds(&self) -> Option<(f64, f64)> {
        let xs = self.rolling.iter().flat_map(|s| s.points.iter().map(|p| p.0));
        let (lo, hi) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
        (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
    }

    fn y_max(&self) -> f64 {
        self.rolling
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1))
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }
}

pub fn date_to_x(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

fn date_label(x: f64) -> String {
    x_to_date(x).map(|d| d.to_string()).unwrap_or_default()
}

fn empty_message(block: Block<'_>, text: &str, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(text.to_string(), Style::default().fg(theme.muted))),
    ];
    Paragraph::new(lines).block(block).render(area, buf);
}

// ─── Rolling volatility ─────────────────────────────────────────────

/// Line chart of rolling annualized volatility, one line per ticker.
pub struct RollingVolChart<'a> {
    data: &'a ChartData,
    theme: &'a Theme,
}

impl<'a> RollingVolChart<'a> {
    pub fn new(data: &'a ChartData, theme: &'a Theme) -> Self {
        Self { data, theme }
    }
}

impl<'a> Widget for RollingVolChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let block = Block::default()
            .title(format!(
                " Rolling Annualized Volatility | {} to {} ",
                self.data.start, self.data.end
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.background));

        let Some((x_min, x_max)) = self.data.x_bounds() else {
            empty_message(
                block,
                "Not enough history for a full rolling window.",
                theme,
                area,
                buf,
            );
            return;
        };

        // A single date still needs a non-zero axis span
        let x_max = if x_max > x_min { x_max } else { x_min + 1.0 };
        let y_top = match self.data.y_max() {
            y if y > 0.0 => y * 1.1,
            _ => 1.0,
        };

        let datasets: Vec<Dataset> = self
            .data
            .rolling
            .iter()
            .enumerate()
            .map(|(i, series)| {
                Dataset::default()
                    .name(series.ticker.clone())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(theme.series_color(i)))
                    .data(&series.points)
            })
            .collect();

        let x_mid = (x_min + x_max) / 2.0;
        let x_labels = vec![
            Span::raw(date_label(x_min)),
            Span::raw(date_label(x_mid)),
            Span::raw(date_label(x_max)),
        ];
        let y_labels = vec![
            Span::raw(format_pct(0.0)),
            Span::raw(format_pct(y_top / 2.0)),
            Span::raw(format_pct(y_top)),
        ];

        Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .title(Span::styled("Date", theme.label()))
                    .style(theme.axis())
                    .bounds([x_min, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled("Volatility", theme.label()))
                    .style(theme.axis())
                    .bounds([0.0, y_top])
                    .labels(y_labels),
            )
            .render(area, buf);
    }
}

// ─── Annualized volatility bars ─────────────────────────────────────

/// Horizontal bars of annualized volatility, in ranking order.
pub struct VolBarChart<'a> {
    data: &'a ChartData,
    theme: &'a Theme,
}

impl<'a> VolBarChart<'a> {
    pub fn new(data: &'a ChartData, theme: &'a Theme) -> Self {
        Self { data, theme }
    }
}

/// Bar heights are integers; volatility is plotted in basis points.
fn basis_points(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        (value * 10_000.0).round() as u64
    } else {
        0
    }
}

impl<'a> Widget for VolBarChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let block = Block::default()
            .title(" Annualized Volatility ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.neutral))
            .style(Style::default().bg(theme.background));

        if self.data.bars.is_empty() {
            empty_message(block, "No tickers to compare.", theme, area, buf);
            return;
        }

        let bars: Vec<Bar> = self
            .data
            .bars
            .iter()
            .map(|(ticker, vol)| {
                let color = theme.volatility_color(*vol);
                Bar::default()
                    .label(Line::from(ticker.clone()))
                    .value(basis_points(*vol))
                    .text_value(format_pct(*vol))
                    .style(Style::default().fg(color))
                    .value_style(
                        Style::default()
                            .fg(theme.background)
                            .bg(color)
                            .add_modifier(Modifier::BOLD),
                    )
            })
            .collect();

        let max = bars_max(&self.data.bars);

        BarChart::default()
            .block(block)
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .max(max)
            .label_style(theme.label())
            .data(BarGroup::default().bars(&bars))
            .render(area, buf);
    }
}

fn bars_max(bars: &[(String, f64)]) -> u64 {
    bars.iter()
        .map(|(_, v)| basis_points(*v))
        .max()
        .unwrap_or(0)
        .max(1)
}
