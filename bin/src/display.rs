//! Progress reporting and summary output for the chatgrep CLI.

use chatgrep_lib::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::io::Write;
use std::time::Duration;

const BYTES_PER_MB: f64 = 1_000_000.0;

/// Writes every event as one JSON line.
#[derive(Debug)]
pub(crate) struct JsonReporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonReporter<W> {
    pub(crate) const fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, event: &SearchEvent) {
        let written = serde_json::to_writer(&mut self.writer, event)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush());
        if let Err(e) = written {
            tracing::debug!(error = %e, "Failed to write progress event");
        }
    }
}

/// Only surfaces fetch errors.
#[derive(Debug)]
pub(crate) struct QuietReporter;

impl Reporter for QuietReporter {
    fn report(&mut self, event: &SearchEvent) {
        if let SearchEvent::FetchError { channel, error, .. } = event {
            eprintln!("Error while fetching logs of #{channel}: {error}");
        }
    }
}

/// Renders a progress bar per channel and a summary at the end.
#[derive(Debug)]
pub(crate) struct HumanReporter {
    bar: Option<ProgressBar>,
}

impl HumanReporter {
    pub(crate) const fn new() -> Self {
        Self { bar: None }
    }

    fn finish_bar(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }

    fn new_bar() -> ProgressBar {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(200));
        bar
    }
}

impl Reporter for HumanReporter {
    fn report(&mut self, event: &SearchEvent) {
        match event {
            SearchEvent::NextChannel {
                channel,
                current_channel_num,
                count_channels,
                ..
            } => {
                self.finish_bar();
                eprintln!(
                    "Now scanning #{channel} ({}/{count_channels})",
                    current_channel_num + 1
                );
                self.bar = Some(Self::new_bar());
            }
            SearchEvent::NextStep {
                found,
                next_date,
                total_steps,
                left_steps,
                progress,
                ..
            } => {
                if let Some(bar) = &self.bar {
                    let total = total_steps.max(0.0) as u64;
                    let done = (total_steps - left_steps).max(0.0) as u64;
                    bar.set_length(total);
                    bar.set_position(done.min(total));
                    let day = next_date.get(..10).unwrap_or(next_date);
                    bar.set_message(format!(
                        "{found} found, at {day}, {}",
                        throughput(progress, elapsed_since(progress))
                    ));
                }
            }
            SearchEvent::FetchError { channel, error, .. } => {
                let line = format!("Error while fetching logs of #{channel}: {error}");
                match &self.bar {
                    Some(bar) => bar.println(line),
                    None => eprintln!("{line}"),
                }
            }
            SearchEvent::SummaryFinished { results, progress } => {
                self.finish_bar();
                eprint!("{}", format_summary(results, progress, elapsed_since(progress)));
            }
        }
    }
}

fn elapsed_since(progress: &ProgressSnapshot) -> Duration {
    (chrono::Utc::now() - progress.begin_time)
        .to_std()
        .unwrap_or_default()
}

fn throughput(progress: &ProgressSnapshot, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64().max(0.001);
    format!(
        "{:.0} lines/s, {:.2} MB/s",
        progress.count_lines as f64 / secs,
        progress.count_bytes as f64 / BYTES_PER_MB / secs
    )
}

/// Renders the end-of-run summary.
pub(crate) fn format_summary(
    results: &OutcomeCounts,
    progress: &ProgressSnapshot,
    elapsed: Duration,
) -> String {
    let mut out = String::new();

    let Some(average) = progress.average_line_length() else {
        out.push_str("Nothing here. No lines were processed.\n");
        return out;
    };

    out.push_str("Summary:\n");
    for (category, count) in results.iter() {
        let _ = writeln!(out, "  {category:<16} {count}");
    }

    let secs = elapsed.as_secs_f64().max(0.001);
    let megabytes = progress.count_bytes as f64 / BYTES_PER_MB;
    let _ = writeln!(
        out,
        "Processed {megabytes:.2} MB ({:.2} MB/s)",
        megabytes / secs
    );
    let _ = writeln!(out, "Lines processed: {}", progress.count_lines);
    let _ = writeln!(out, "Average line length: {average} bytes");
    let _ = writeln!(out, "Time taken: {:.1}s", elapsed.as_secs_f64());
    out
}
