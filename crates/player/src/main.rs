mod args;
mod audio_device;
mod config;
mod headless;
mod playback;
mod window;

use std::process::ExitCode;

use media::{Format, PlaybackControl, PlaybackReport};
use util::stop_signals;

use args::Args;
use headless::HeadlessDisplay;
use playback::{PlaybackJob, PlayerError};

const GENERIC_ERROR_MSG: &str = "Something went wrong.";

fn main() -> ExitCode {
    let args = Args::default();

    #[cfg(debug_assertions)]
    {
        use util::debug_log;
        if args.no_debug_logging {
            debug_log::disable();
        }
    }

    let config = match config::format_config(&args) {
        Ok(config) => config,
        Err(e) => util::eprintln_and_exit!("{e}"),
    };
    let format = match Format::new(config) {
        Ok(format) => format,
        Err(e) => util::eprintln_and_exit!("Invalid format: {e}"),
    };

    let job = PlaybackJob::new(&args, format);
    let result = if args.headless {
        run_headless(&job, &args)
    } else {
        window::run_window(job)
    };

    match result {
        Ok(report) => {
            util::debug_log_info!(
                "Done: {} frames shown, {} skipped.",
                report.frames_shown,
                report.frames_skipped
            );
            ExitCode::SUCCESS
        }

        Err(PlayerError::Window(e)) => {
            util::debug_log_error!("The window failed: {e}");
            eprintln!("{GENERIC_ERROR_MSG}");
            ExitCode::FAILURE
        }

        Err(e) => {
            util::debug_log_error!("Playback failed: {e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_headless(job: &PlaybackJob, args: &Args) -> Result<PlaybackReport, PlayerError> {
    stop_signals::polling::enable().map_err(PlayerError::StopSignals)?;

    let mut display = HeadlessDisplay::new(args.dump_frames.clone());
    let report = job.run(PlaybackControl::new(), &mut display);

    stop_signals::polling::disable();
    report
}
