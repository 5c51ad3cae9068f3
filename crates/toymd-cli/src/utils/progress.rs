use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::time::Duration;
use toymd::engine::progress::{Progress, ProgressCallback, StepReport};

const SPINNER_TICK_MS: u64 = 80;
/// The step summary in the bar message is refreshed every this many steps.
const SUMMARY_STRIDE: usize = 10;

/// Drives a terminal progress bar from engine [`Progress`] events.
///
/// Phases are shown as a spinner, the dynamics run as a bar over all steps
/// with the latest temperature and total energy as its message.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// A handler whose bar is never drawn, used when log lines own the console.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        Self { bar }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();
        Box::new(move |event| apply(&bar, event))
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(bar: &ProgressBar, event: Progress) {
    match event {
        Progress::PhaseStart { name } => {
            bar.reset();
            bar.set_length(0);
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
            bar.set_message(name);
        }
        Progress::PhaseFinish => {
            bar.disable_steady_tick();
            bar.finish_with_message("✓ Done");
        }
        Progress::RunStart { total_steps } => {
            bar.disable_steady_tick();
            bar.reset();
            bar.set_length(total_steps);
            bar.set_style(run_style());
            bar.set_message("Dynamics");
        }
        Progress::StepCompleted(report) => {
            bar.inc(1);
            if report.step % SUMMARY_STRIDE == 0 {
                bar.set_message(step_summary(&report));
            }
        }
        Progress::RunFinish => {
            if let Some(len) = bar.length() {
                bar.set_position(len);
            }
            bar.finish();
        }
        Progress::Message(msg) if bar.is_finished() => bar.set_message(msg),
        Progress::Message(msg) => bar.println(format!("  {msg}")),
    }
}

fn step_summary(report: &StepReport) -> String {
    format!(
        "T {:7.2} K  Etot {:10.3}",
        report.temperature,
        report.total_energy()
    )
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .expect("Failed to create spinner style template")
}

fn run_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{msg:<32} [{bar:40.cyan/blue}] {pos}/{len} steps ({steps_per_sec}, {eta})",
    )
    .expect("Failed to create run style template")
    .with_key(
        "steps_per_sec",
        |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.0} steps/s", state.per_sec());
        },
    )
    .progress_chars("##-")
}
