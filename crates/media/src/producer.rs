//! Contains [FrameProducer], which loads [CombinedFrame]s on a worker thread a
//! bounded number of frames ahead of playback.
//!
//! This is the streaming alternative to loading a whole video into a
//! [PlaybackSequence](crate::PlaybackSequence) up front. Frames come out of a
//! producer exactly as [FrameLoader::load](crate::FrameLoader::load) would have
//! built them.

use std::borrow::Cow;
use std::io::{self, Read};
use std::iter;
use std::num::NonZeroUsize;

use util::channels::ChannelResult;
use util::channels::message_channel::{self, Inbox, Outbox};
use util::drop_join_thread::{self, DropJoinHandle};

use crate::audio::PcmSource;
use crate::format::Format;
use crate::frame::CombinedFrame;
use crate::loader::{FrameAssembler, LoadError};
use crate::source::FrameSource;

/// Starts up a worker thread that reads raw frames from a video reader, pairs
/// them with audio, and keeps up to `lookahead` of them ready. Taking a frame
/// out lets the worker load one more.
///
/// Dropping the producer disconnects the worker and joins it.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use std::num::NonZeroUsize;
///
/// use media::audio::{MemoryPcm, PcmSpec, SampleFormat};
/// use media::{Format, FormatConfig, FrameProducer, FrameSource};
///
/// let format = Format::new(FormatConfig::new(2, 2, 10, 100)).unwrap();
/// let spec = PcmSpec::new(2, 1, 100, SampleFormat::Int).unwrap();
/// let audio = MemoryPcm::new(spec, vec![0; 200]);
///
/// let video = Cursor::new(vec![0u8; 12 * 3]);
/// let mut producer = FrameProducer::spawn(format, video, audio, NonZeroUsize::MIN);
///
/// let mut frames = 0;
/// while let Some(frame) = producer.next_frame().unwrap() {
///     assert_eq!(frame.audio().frames(), 10);
///     frames += 1;
/// }
/// assert_eq!(frames, 3);
/// ```
pub struct FrameProducer {
    buffered_frames: Inbox<Produced>,
    frame_fetched_signal: Outbox<()>,
    format: Format,
    lookahead: NonZeroUsize,
    finished: bool,
    // Dropped after the channels so the worker sees the disconnect first.
    worker: DropJoinHandle<()>,
}

impl FrameProducer {
    /// Start loading frames from `video` (raw frames back to back) and `audio`.
    pub fn spawn<R, S>(format: Format, video: R, audio: S, lookahead: NonZeroUsize) -> Self
    where
        R: Read + Send + 'static,
        S: PcmSource + Send + 'static,
    {
        let (buffered_frames_inbox, buffered_frames_outbox) =
            message_channel::with_capacity(lookahead.get());

        let (frame_fetched_signal_inbox, frame_fetched_signal_outbox) =
            message_channel::with_capacity(lookahead.get());

        let worker = drop_join_thread::spawn(move || {
            let frame_maker = FrameMaker {
                reader: RawFrameReader::new(video, format.frame_byte_size()),
                assembler: FrameAssembler::new(format, audio.spec()),
                audio,
            };

            _ = run_worker(
                buffered_frames_outbox,
                frame_fetched_signal_inbox,
                frame_maker,
                lookahead.get(),
            );
        });

        Self {
            buffered_frames: buffered_frames_inbox,
            frame_fetched_signal: frame_fetched_signal_outbox,
            format,
            lookahead,
            finished: false,
            worker,
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// The most frames that are ever loaded ahead of the last one taken out.
    pub fn lookahead(&self) -> NonZeroUsize {
        self.lookahead
    }

    /// Whether the worker thread has stopped (it stops at the end of the
    /// video, after an error, or once the producer is being dropped).
    pub fn worker_finished(&self) -> bool {
        self.worker.is_finished()
    }
}

impl FrameSource for FrameProducer {
    /// Blocks until the worker has the next frame ready (usually it already
    /// does).
    fn next_frame(&mut self) -> Result<Option<Cow<'_, CombinedFrame>>, LoadError> {
        if self.finished {
            return Ok(None);
        }

        match self.buffered_frames.wait() {
            Ok(Produced::Frame(frame)) => {
                // The worker may already be gone if it hit the end of the
                // video, that's fine.
                _ = self.frame_fetched_signal.send(());
                Ok(Some(Cow::Owned(frame)))
            }

            Ok(Produced::End) => {
                self.finished = true;
                Ok(None)
            }

            Ok(Produced::Failed(err)) => {
                self.finished = true;
                Err(err)
            }

            Err(_) => {
                self.finished = true;
                Err(LoadError::ProducerDisconnected)
            }
        }
    }
}

/// What the worker sends back.
enum Produced {
    Frame(CombinedFrame),
    End,
    Failed(LoadError),
}

/// Everything the worker needs to make the next frame.
struct FrameMaker<R, S> {
    reader: RawFrameReader<R>,
    assembler: FrameAssembler,
    audio: S,
}

impl<R: Read, S: PcmSource> FrameMaker<R, S> {
    fn make_frame(&mut self) -> Produced {
        let raw_frame = match self.reader.read_frame() {
            Ok(Some(raw_frame)) => raw_frame,
            Ok(None) => return Produced::End,
            Err(err) => return Produced::Failed(LoadError::VideoStream(err)),
        };

        match self.assembler.assemble(raw_frame, &mut self.audio) {
            Ok(frame) => Produced::Frame(frame),
            Err(err) => Produced::Failed(err),
        }
    }
}

/// Reads one whole raw frame at a time.
struct RawFrameReader<R> {
    reader: R,
    frame_byte_size: usize,
}

impl<R: Read> RawFrameReader<R> {
    fn new(reader: R, frame_byte_size: usize) -> Self {
        Self {
            reader,
            frame_byte_size,
        }
    }

    /// [None] once the reader runs out. A partial frame at the very end counts
    /// as running out.
    fn read_frame(&mut self) -> io::Result<Option<Box<[u8]>>> {
        let mut frame = vec![0; self.frame_byte_size];
        let mut filled = 0;

        while filled < frame.len() {
            match self.reader.read(&mut frame[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }

        if filled == frame.len() {
            Ok(Some(frame.into_boxed_slice()))
        } else {
            if filled != 0 {
                util::debug_log_warning!(
                    "Dropping {filled} byte(s) at the end of the video (not a whole frame)."
                );
            }
            Ok(None)
        }
    }
}

fn run_worker<R: Read, S: PcmSource>(
    buffered_frames: Outbox<Produced>,
    frame_fetched_signal: Inbox<()>,
    mut frame_maker: FrameMaker<R, S>,
    lookahead: usize,
) -> ChannelResult<()> {
    // Prefetch `lookahead` frames without waiting, then only make a new frame
    // once one has been taken out of the queue.
    let mut prefetch_then_wait_for_fetch_signal = (0..lookahead)
        .map(|_| ())
        .chain(iter::repeat(()).take_while(|_| frame_fetched_signal.wait().is_ok()));

    while prefetch_then_wait_for_fetch_signal.next().is_some() {
        let produced = frame_maker.make_frame();
        let last = !matches!(produced, Produced::Frame(_));

        buffered_frames.send(produced)?;

        if last {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::FrameLoader;
    use crate::audio::{MemoryPcm, PcmSpec, SampleFormat};
    use crate::format::FormatConfig;

    fn format() -> Format {
        Format::new(FormatConfig::new(2, 2, 10, 100)).unwrap()
    }

    fn audio() -> MemoryPcm {
        let spec = PcmSpec::new(2, 1, 100, SampleFormat::Int).unwrap();
        MemoryPcm::new(spec, (0..500u16).flat_map(|n| n.to_le_bytes()).collect())
    }

    fn lookahead(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn drain(producer: &mut FrameProducer) -> Vec<CombinedFrame> {
        let mut frames = Vec::new();
        while let Some(frame) = producer.next_frame().unwrap() {
            frames.push(frame.into_owned());
        }
        frames
    }

    /// Counts the bytes read through it.
    struct CountingReader {
        inner: Cursor<Vec<u8>>,
        bytes_read: Arc<AtomicUsize>,
    }

    impl Read for CountingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.inner.read(buf)?;
            self.bytes_read.fetch_add(n, Ordering::SeqCst);
            Ok(n)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn matches_the_eager_loader() {
        let video: Vec<u8> = (0..=255).cycle().take(12 * 7 + 5).collect();

        let eager = FrameLoader::new(format()).load(&video, audio()).unwrap();

        let video = Cursor::new(video);
        let mut producer = FrameProducer::spawn(format(), video, audio(), lookahead(3));
        let streamed = drain(&mut producer);

        assert_eq!(streamed.len(), 7);
        assert_eq!(streamed, eager.into_frames());
    }

    #[test]
    fn planar_frames_are_packed() {
        let format = Format::new(FormatConfig::new(2, 1, 10, 100)).unwrap();
        let video = Cursor::new(vec![1u8, 2, 3, 4, 5, 6]);
        let mut producer = FrameProducer::spawn(format, video, audio(), lookahead(1));

        let frames = drain(&mut producer);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].image().as_bytes(), &[5, 3, 1, 6, 4, 2]);
    }

    #[test]
    fn stays_within_lookahead() {
        let bytes_read = Arc::new(AtomicUsize::new(0));
        let reader = CountingReader {
            inner: Cursor::new(vec![0; 12 * 10]),
            bytes_read: Arc::clone(&bytes_read),
        };

        let mut producer = FrameProducer::spawn(format(), reader, audio(), lookahead(2));

        thread::sleep(Duration::from_millis(100));
        assert_eq!(bytes_read.load(Ordering::SeqCst), 12 * 2);

        producer.next_frame().unwrap().unwrap();
        thread::sleep(Duration::from_millis(100));
        assert_eq!(bytes_read.load(Ordering::SeqCst), 12 * 3);

        assert_eq!(drain(&mut producer).len(), 9);
    }

    #[test]
    fn empty_video_ends_immediately() {
        let mut producer =
            FrameProducer::spawn(format(), Cursor::new(vec![0; 5]), audio(), lookahead(4));

        assert!(producer.next_frame().unwrap().is_none());
        assert!(producer.next_frame().unwrap().is_none());
    }

    #[test]
    fn read_errors_end_the_stream() {
        let mut producer = FrameProducer::spawn(format(), FailingReader, audio(), lookahead(1));

        assert!(matches!(producer.next_frame(), Err(LoadError::VideoStream(_))));
        assert!(producer.next_frame().unwrap().is_none());
    }

    #[test]
    fn dropping_early_joins_the_worker() {
        let mut producer = FrameProducer::spawn(
            format(),
            Cursor::new(vec![0; 12 * 100]),
            audio(),
            lookahead(4),
        );

        producer.next_frame().unwrap().unwrap();
        drop(producer);
    }
}
