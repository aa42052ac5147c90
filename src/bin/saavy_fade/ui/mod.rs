//! TUI module for saavy-fade
//!
//! The UI loop doubles as the control thread: it arms fades on key presses
//! and drains completions once per frame.

pub mod state;
mod transport;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use saavy_fade::{FadeHandle, FadeKind};
use std::sync::mpsc::Receiver;
use std::time::Duration;

pub use state::{EventLog, FadeSnapshot, UiStateInit};

use transport::render_transport;
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

/// UI application state
pub struct UiApp {
    /// Control side of the fade filter
    handle: FadeHandle,
    /// Ring buffer receiver for audio samples
    audio_rx: Consumer<f32>,
    /// Completions forwarded by the fade listener
    events_rx: Receiver<FadeKind>,
    /// Static stream info
    init: UiStateInit,
    /// Audio sample buffer for visualization
    audio_buffer: Vec<f32>,
    /// Gain history, one point per UI frame
    gain_history: Vec<f32>,
    /// Messages shown in the event pane
    log: EventLog,
    /// Whether the app should quit
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        handle: FadeHandle,
        audio_rx: Consumer<f32>,
        events_rx: Receiver<FadeKind>,
        init: UiStateInit,
    ) -> Self {
        Self {
            handle,
            audio_rx,
            events_rx,
            init,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            gain_history: vec![0.0; VIS_BUFFER_SIZE / 8],
            log: EventLog::default(),
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.dispatch_completions();
            self.poll_audio();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    fn dispatch_completions(&mut self) {
        if let Err(err) = self.handle.dispatch() {
            self.log.push(format!("callback error: {}", err));
        }
        while let Ok(kind) = self.events_rx.try_recv() {
            self.log.push(format!("{} complete", kind));
        }
    }

    /// Poll for new audio samples from ring buffer
    fn poll_audio(&mut self) {
        let available = self.audio_rx.slots();
        if available > 0 {
            if let Ok(chunk) = self.audio_rx.read_chunk(available) {
                let (first, second) = chunk.as_slices();
                self.audio_buffer.extend_from_slice(first);
                self.audio_buffer.extend_from_slice(second);
                chunk.commit_all();
            }
        }

        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }

        self.gain_history.remove(0);
        self.gain_history.push(self.handle.gain());
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('i') | KeyCode::Char('I') => match self.handle.arm_fade_in() {
                Ok(()) => self.log.push("fade-in armed".to_string()),
                Err(err) => self.log.push(err.to_string()),
            },
            KeyCode::Char('o') | KeyCode::Char('O') => match self.handle.arm_fade_out() {
                Ok(()) => self.log.push("fade-out armed".to_string()),
                Err(err) => self.log.push(err.to_string()),
            },
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(8),    // Scope
                Constraint::Length(8), // Event log
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let snapshot = FadeSnapshot::from_handle(&self.handle);
        render_transport(frame, chunks[0], &self.init, &snapshot);
        render_waveform(frame, chunks[1], &self.audio_buffer, &self.gain_history);

        let lines: Vec<Line> = self.log.iter().map(|msg| Line::from(msg.as_str())).collect();
        let events = Paragraph::new(lines).block(Block::default().title(" Events ").borders(Borders::ALL));
        frame.render_widget(events, chunks[2]);

        let help = Paragraph::new(" [I] Fade in  [O] Fade out  [Q] Quit")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
