//! FadeApp - audio setup and hand-off to the UI

use clap::Parser;
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use std::sync::mpsc;

use saavy_fade::{
    graph::{extensions::NodeExt, oscillator::ToneNode, GraphNode, RenderCtx},
    FadeConfig, FadeKind, FadeListener,
};

use super::ui::{UiApp, UiStateInit};

/// Samples buffered for the scope between UI frames
const SCOPE_QUEUE_SIZE: usize = 16_384;

#[derive(Parser, Debug)]
#[command(name = "saavy-fade", about = "Play a test tone through the fade filter")]
pub struct Args {
    /// Fade-in duration in milliseconds
    #[arg(long, default_value_t = 500.0)]
    pub fade_in_ms: f32,

    /// Fade-out duration in milliseconds
    #[arg(long, default_value_t = 1000.0)]
    pub fade_out_ms: f32,

    /// Tone frequency in Hz
    #[arg(long, default_value_t = 440.0)]
    pub frequency: f32,

    /// Tone amplitude (0.0 - 1.0)
    #[arg(long, default_value_t = 0.2)]
    pub amplitude: f32,

    /// Start at full volume, ready to fade out
    #[arg(long)]
    pub start_steady: bool,
}

/// Forwards completions to the UI thread's event log
struct CompletionForwarder {
    tx: mpsc::Sender<FadeKind>,
}

impl FadeListener for CompletionForwarder {
    fn on_fade_in_complete(&mut self) {
        let _ = self.tx.send(FadeKind::In);
    }

    fn on_fade_out_complete(&mut self) {
        let _ = self.tx.send(FadeKind::Out);
    }
}

pub struct FadeApp {
    args: Args,
}

impl FadeApp {
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    /// Run the application (takes over the terminal, plays audio)
    pub fn run(self) -> EyreResult<()> {
        let args = self.args;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let tone = ToneNode::sine(args.frequency).with_amplitude(args.amplitude.clamp(0.0, 1.0));
        let (mut node, mut handle) = if args.start_steady {
            tone.fade_out_ready(FadeConfig::default())
        } else {
            tone.fade(FadeConfig::default())
        };
        handle
            .configure(args.fade_in_ms, args.fade_out_ms, sample_rate)
            .wrap_err("failed to configure fade lengths")?;

        let (events_tx, events_rx) = mpsc::channel();
        handle.set_listener(CompletionForwarder { tx: events_tx });

        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_QUEUE_SIZE);
        let ctx = RenderCtx::new(sample_rate, channels);

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                node.render_block(data, &ctx);

                // First channel only; drop samples if the UI falls behind
                for frame in data.chunks(channels.max(1)) {
                    if scope_tx.push(frame[0]).is_err() {
                        break;
                    }
                }
            },
            |err| log::error!("audio stream error: {}", err),
            None,
        )?;

        stream.play()?;

        let init = UiStateInit {
            sample_rate,
            channels,
            frequency: args.frequency,
        };
        let mut ui = UiApp::new(handle, scope_rx, events_rx, init);

        let mut terminal = ratatui::init();
        let result = ui.run(&mut terminal);
        ratatui::restore();

        drop(stream);
        result
    }
}
