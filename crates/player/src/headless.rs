//! Contains [HeadlessDisplay], used when playing without a window.

use std::fs;
use std::path::{Path, PathBuf};

use media::frame::{ChannelOrder, ImageFrame};
use media::{Display, PlaybackError};
use util::stop_signals;

/// A [Display] that shows nothing, optionally writing each frame to a
/// directory as `frame_000000.png`, `frame_000001.png`, ...
///
/// Stops when the process gets a stop signal (see [stop_signals::polling]).
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    dump_dir: Option<PathBuf>,
    frames_shown: usize,
}

impl HeadlessDisplay {
    pub fn new(dump_dir: Option<PathBuf>) -> Self {
        Self {
            dump_dir,
            frames_shown: 0,
        }
    }

    fn dump(&self, dir: &Path, frame: &ImageFrame) -> Result<(), PlaybackError> {
        if self.frames_shown == 0 {
            fs::create_dir_all(dir).map_err(|e| {
                PlaybackError::ResourceUnavailable(format!(
                    "Couldn't create `{}`: {e}",
                    dir.display()
                ))
            })?;
        }

        // PNGs are always RGB, whatever order the frame was prepared in.
        let rgb = frame.bytes_in_order(ChannelOrder::Rgb).into_owned();
        let (width, height): (usize, usize) = frame.dimensions().into();
        let png = u32::try_from(width)
            .ok()
            .zip(u32::try_from(height).ok())
            .and_then(|(width, height)| image::RgbImage::from_raw(width, height, rgb))
            .ok_or_else(|| {
                PlaybackError::ResourceUnavailable(format!(
                    "A {} frame is too large to write as a PNG.",
                    frame.dimensions()
                ))
            })?;

        let path = dir.join(format!("frame_{:06}.png", self.frames_shown));
        png.save(&path).map_err(|e| {
            PlaybackError::ResourceUnavailable(format!(
                "Couldn't write `{}`: {e}",
                path.display()
            ))
        })
    }
}

impl Display for HeadlessDisplay {
    fn show(&mut self, frame: &ImageFrame) -> Result<(), PlaybackError> {
        if let Some(dir) = &self.dump_dir {
            self.dump(dir, frame)?;
        }

        self.frames_shown += 1;
        Ok(())
    }

    fn stop_requested(&mut self) -> bool {
        stop_signals::polling::poll()
    }
}
