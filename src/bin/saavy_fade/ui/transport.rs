//! Status bar widget - shows fade stage, gain, lengths and fault count

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};
use saavy_fade::FadeStage;

use super::{FadeSnapshot, UiStateInit};

fn stage_color(stage: FadeStage) -> Color {
    match stage {
        FadeStage::Idle => Color::DarkGray,
        FadeStage::FadingIn => Color::Green,
        FadeStage::Steady => Color::Cyan,
        FadeStage::FadingOut => Color::Yellow,
    }
}

fn format_ms(ms: Option<f32>) -> String {
    ms.map_or_else(|| "-".to_string(), |ms| format!("{:.0}ms", ms))
}

/// Render the status bar
pub fn render_transport(frame: &mut Frame, area: Rect, init: &UiStateInit, snapshot: &FadeSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(30)])
        .split(area);

    let block = Block::default().title(" saavy-fade ").borders(Borders::ALL);

    let sample_rate_khz = init.sample_rate / 1000.0;

    let line = Line::from(vec![
        Span::styled(
            format!(" {}  ", snapshot.stage),
            Style::default().fg(stage_color(snapshot.stage)),
        ),
        Span::styled(
            format!(
                "in {} ({} fr)  out {} ({} fr)  ",
                format_ms(snapshot.fade_in_ms),
                snapshot.config.fade_in_frames,
                format_ms(snapshot.fade_out_ms),
                snapshot.config.fade_out_frames,
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.0}Hz  {:.1}kHz x{}  ", init.frequency, sample_rate_khz, init.channels),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Faults: {}", snapshot.faults),
            Style::default().fg(if snapshot.faults > 0 {
                Color::Red
            } else {
                Color::DarkGray
            }),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().title(" Gain ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(stage_color(snapshot.stage)))
        .ratio(snapshot.gain.clamp(0.0, 1.0) as f64)
        .label(format!("{:.3}", snapshot.gain));
    frame.render_widget(gauge, chunks[1]);
}
