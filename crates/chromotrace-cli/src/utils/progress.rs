use chromotrace::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

struct PassState {
    bar: ProgressBar,
    phase: &'static str,
    failed_frames: usize,
}

impl PassState {
    fn phase_summary(&self) -> String {
        match self.failed_frames {
            0 => format!("✓ {}", self.phase),
            n => format!("✓ {} ({} frame(s) failed)", self.phase, n),
        }
    }
}

/// Renders engine progress events as a spinner per phase and a bar over the frames.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<PassState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// A handler that never draws, for `--quiet` runs.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target)
            .with_style(Self::spinner_style())
            .with_message("Loading trajectory...");
        bar.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(PassState {
                bar,
                phase: "",
                failed_frames: 0,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut guard) = state.lock() else {
                warn!("Progress state mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    guard.phase = name;
                    guard.failed_frames = 0;
                    let bar = &guard.bar;
                    bar.reset();
                    bar.set_length(0);
                    bar.set_style(Self::spinner_style());
                    bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    bar.set_message(name);
                }
                Progress::PhaseFinish => {
                    let summary = guard.phase_summary();
                    guard.bar.disable_steady_tick();
                    guard.bar.finish_with_message(summary);
                }
                Progress::TaskStart { total_steps } => {
                    let bar = &guard.bar;
                    bar.disable_steady_tick();
                    bar.reset();
                    bar.set_length(total_steps);
                    bar.set_position(0);
                    bar.set_style(Self::frame_bar_style());
                }
                Progress::TaskIncrement => guard.bar.inc(1),
                Progress::TaskFinish => {
                    let frames = guard.bar.length().unwrap_or(0);
                    guard.bar.set_position(frames);
                    guard.bar.finish();
                }
                Progress::FrameFailed { frame, reason } => {
                    guard.failed_frames += 1;
                    guard.bar.println(format!("  ⚠ frame {}: {}", frame, reason));
                }
                Progress::Message(msg) => {
                    if guard.bar.is_finished() {
                        guard.bar.set_message(msg);
                    } else {
                        guard.bar.println(format!("  {}", msg));
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn frame_bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{msg:<24} [{bar:40.cyan/blue}] {pos}/{len} frames ({per_sec}, {eta_s})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key(
            "eta_s",
            |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
            },
        )
        .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn message(handler: &CliProgressHandler) -> String {
        handler.state.lock().unwrap().bar.message()
    }

    #[test]
    fn handler_starts_finished_and_empty() {
        let handler = CliProgressHandler::hidden();
        let state = handler.state.lock().unwrap();
        assert_eq!(state.bar.length(), Some(0));
        assert!(state.bar.is_finished());
        assert_eq!(state.failed_frames, 0);
    }

    #[test]
    fn callback_tracks_a_frame_pass() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Frame Geometry",
        });
        assert_eq!(message(&handler), "Frame Geometry");
        assert!(!handler.state.lock().unwrap().bar.is_finished());

        callback(Progress::TaskStart { total_steps: 50 });
        callback(Progress::TaskIncrement);
        callback(Progress::TaskIncrement);
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.bar.length(), Some(50));
            assert_eq!(state.bar.position(), 2);
        }

        callback(Progress::TaskFinish);
        {
            let state = handler.state.lock().unwrap();
            assert!(state.bar.is_finished());
            assert_eq!(state.bar.position(), 50);
        }

        callback(Progress::FrameFailed {
            frame: 7,
            reason: "Frame has 8 atoms, expected 15".to_string(),
        });
        callback(Progress::PhaseFinish);
        assert_eq!(message(&handler), "✓ Frame Geometry (1 frame(s) failed)");
    }

    #[test]
    fn failure_count_resets_with_each_phase() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Frame Geometry" });
        callback(Progress::FrameFailed {
            frame: 0,
            reason: "Ring atoms do not span a plane".to_string(),
        });
        callback(Progress::PhaseFinish);
        callback(Progress::PhaseStart { name: "Statistics" });
        callback(Progress::PhaseFinish);

        assert_eq!(message(&handler), "✓ Statistics");
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Statistics" });
            callback(Progress::TaskIncrement);
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        assert!(handler.state.lock().unwrap().bar.is_finished());
        assert_eq!(message(&handler), "✓ Statistics");
    }
}
