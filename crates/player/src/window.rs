//! Contains [run_window], which plays inside an `eframe` window.
//!
//! Playback runs on its own thread (the scheduler sleeps between frames, the
//! UI can't) and hands finished images to the UI through a message channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use eframe::{App, Frame, NativeOptions};
use egui::{CentralPanel, ColorImage, Context, Key, TextureHandle, TextureOptions, Vec2};
use egui::{ViewportBuilder, ViewportCommand};

use media::frame::{ChannelOrder, ImageFrame};
use media::{Display, PlaybackControl, PlaybackError, PlaybackReport};
use util::channels::message_channel::{self, Inbox, Outbox};
use util::drop_join_thread::{self, DropJoinHandle};

use crate::playback::{PlaybackJob, PlayerError};

const WINDOW_TITLE: &str = "Player";

/// Open a window and play `job` in it, returning once the window is closed.
/// Closing the window stops playback and playback finishing closes the window.
///
/// Space toggles pause, Q or Escape quit.
///
/// This function can only be run from the main thread.
pub fn run_window(job: PlaybackJob) -> Result<PlaybackReport, PlayerError> {
    let dimensions = job.format().dimensions();
    let video_size = Vec2::new(dimensions.width() as f32, dimensions.height() as f32);

    let mut outcome = None;
    let outcome_slot = &mut outcome;

    eframe::run_native(
        WINDOW_TITLE,
        NativeOptions {
            viewport: ViewportBuilder::default()
                .with_title(WINDOW_TITLE)
                .with_inner_size(video_size)
                .with_min_inner_size(Vec2::splat(64.0)),
            centered: true,
            ..Default::default()
        },
        Box::new(move |cc| {
            let app = PlayerWindow::start(job, cc.egui_ctx.clone(), outcome_slot)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| {
        util::debug_log_error!("UI (run native) failed: {e}");
        PlayerError::Window(e.to_string())
    })?;

    outcome.unwrap_or_else(|| Err(PlayerError::Window("Playback never started.".into())))
}

/// The window's state. Dropping it stops playback and waits for the playback
/// thread, leaving its result in the outcome slot.
struct PlayerWindow<'a> {
    images: Inbox<ColorImage>,
    texture: Option<TextureHandle>,
    control: PlaybackControl,
    stop: Arc<AtomicBool>,
    outcome: &'a mut Option<Result<PlaybackReport, PlayerError>>,
    playback_thread: Option<DropJoinHandle<Result<PlaybackReport, PlayerError>>>,
}

impl<'a> PlayerWindow<'a> {
    fn start(
        job: PlaybackJob,
        ctx: Context,
        outcome: &'a mut Option<Result<PlaybackReport, PlayerError>>,
    ) -> Result<Self, PlayerError> {
        let (images, outbox) = message_channel::new();
        let control = PlaybackControl::new();
        let stop = Arc::new(AtomicBool::new(false));

        let mut display = WindowDisplay {
            images: outbox,
            stop: stop.clone(),
            ctx,
        };
        let thread_control = control.clone();

        let playback_thread = drop_join_thread::spawn_named("playback", move || {
            job.run(thread_control, &mut display)
        })
        .map_err(PlayerError::Thread)?;

        Ok(Self {
            images,
            texture: None,
            control,
            stop,
            outcome,
            playback_thread: Some(playback_thread),
        })
    }

    fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.control.stop();
    }

    fn handle_input(&self, ctx: &Context) {
        let (toggle_pause, quit, close_requested) = ctx.input(|i| {
            (
                i.key_pressed(Key::Space),
                i.key_pressed(Key::Q) || i.key_pressed(Key::Escape),
                i.viewport().close_requested(),
            )
        });

        if toggle_pause {
            let state = self.control.toggle_pause();
            util::debug_log_info!("Playback is now {state:?}.");
        }

        if quit {
            self.request_stop();
            ctx.send_viewport_cmd(ViewportCommand::Close);
        } else if close_requested {
            self.request_stop();
        }
    }

    /// Upload the newest image (older ones that piled up are skipped).
    /// Returns `false` once playback is over and nothing is left to show.
    fn receive_images(&mut self, ctx: &Context) -> bool {
        match self.images.check_all() {
            Ok(mut images) => {
                let Some(image) = images.pop_back() else {
                    return true;
                };

                match &mut self.texture {
                    Some(texture) => texture.set(image, TextureOptions::LINEAR),
                    None => {
                        self.texture =
                            Some(ctx.load_texture("video", image, TextureOptions::LINEAR));
                    }
                }
                true
            }

            Err(_) => false,
        }
    }
}

impl App for PlayerWindow<'_> {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        self.handle_input(ctx);

        if !self.receive_images(ctx) {
            util::debug_log_info!("Playback ended, closing the window...");
            ctx.send_viewport_cmd(ViewportCommand::Close);
        }

        CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let Some(texture) = &self.texture else {
                    return;
                };

                // Scale to fit, keeping the aspect ratio.
                let available = ui.available_size();
                let size = texture.size_vec2();
                let scale = (available.x / size.x).min(available.y / size.y);

                ui.centered_and_justified(|ui| {
                    ui.image(egui::load::SizedTexture::new(texture.id(), size * scale));
                });
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.request_stop();

        util::debug_log_info!("Closing the player window...");
    }
}

impl Drop for PlayerWindow<'_> {
    fn drop(&mut self) {
        self.request_stop();

        let result = self.playback_thread.take().and_then(DropJoinHandle::join);
        *self.outcome = Some(result.unwrap_or_else(|| {
            Err(PlayerError::Window("The playback thread panicked.".into()))
        }));
    }
}

/// The [Display] half that lives on the playback thread.
struct WindowDisplay {
    images: Outbox<ColorImage>,
    stop: Arc<AtomicBool>,
    ctx: Context,
}

impl Display for WindowDisplay {
    fn show(&mut self, frame: &ImageFrame) -> Result<(), PlaybackError> {
        let (width, height): (usize, usize) = frame.dimensions().into();
        let rgb = frame.bytes_in_order(ChannelOrder::Rgb);
        let image = ColorImage::from_rgb([width, height], &rgb);

        if self.images.send(image).is_err() {
            // The window is gone, `stop_requested` will pick that up.
            self.stop.store(true, Ordering::SeqCst);
        } else {
            self.ctx.request_repaint();
        }

        Ok(())
    }

    fn stop_requested(&mut self) -> bool {
        self.stop.load(Ordering::SeqCst) || self.images.connection_closed()
    }
}
