//! Scope widget - output waveform with the gain envelope on top

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

fn to_points(values: &[f32]) -> Vec<(f64, f64)> {
    let len = values.len().max(1) as f64;
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64 / len, v as f64))
        .collect()
}

/// Render the scope. Audio is drawn in cyan, the recent gain history in
/// yellow on the same [-1, 1] axis.
pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32], gain_history: &[f32]) {
    let block = Block::default().title(" Output ").borders(Borders::ALL);

    let audio = to_points(audio_buffer);
    let gain = to_points(gain_history);

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&audio),
        Dataset::default()
            .name("gain")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&gain),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
