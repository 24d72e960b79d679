//! Colorful console output for formation runs.
//!
//! Provides a custom `tracing` layer that formats engine events with colors.
//! Auto-initialized by the entry points when the `console` feature is enabled.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. Does nothing
/// if another global subscriber is already installed.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("teamforge_engine=info"));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(FormationConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats formation events with colors.
pub struct FormationConsoleLayer;

impl<S: Subscriber> Layer<S> for FormationConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("teamforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(*metadata.level(), &visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    mode: Option<String>,
    error: Option<String>,
    stop_reason: Option<String>,
    pool_size: Option<u64>,
    team_size: Option<u64>,
    workers: Option<u64>,
    batch: Option<u64>,
    teams: Option<u64>,
    unassigned: Option<u64>,
    leftover: Option<u64>,
    attempts: Option<u64>,
    assigned: Option<u64>,
    counter: Option<u64>,
    duration_ms: Option<u64>,
    global_target_skill: Option<f64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "mode" => self.mode = Some(s),
            "error" => self.error = Some(s),
            "stop_reason" => self.stop_reason = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "pool_size" => self.pool_size = Some(value),
            "team_size" => self.team_size = Some(value),
            "workers" => self.workers = Some(value),
            "batch" => self.batch = Some(value),
            "teams" => self.teams = Some(value),
            "unassigned" => self.unassigned = Some(value),
            "leftover" => self.leftover = Some(value),
            "attempts" => self.attempts = Some(value),
            "assigned" => self.assigned = Some(value),
            "counter" => self.counter = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "global_target_skill" {
            self.global_target_skill = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_debug(field, &value);
    }
}

fn format_event(level: Level, v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "formation_start" => format_formation_start(v),
        "batch_end" => format_batch_end(v),
        "formation_end" => format_formation_end(v),
        "run_committed" => format_run_committed(v),
        "run_discarded" => format_run_discarded(v),
        other if level == Level::WARN => format_warning(other, v),
        _ => String::new(),
    }
}

fn format_formation_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} pool size ({}), team size ({}), mode ({}), workers ({}), target skill ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Formation]".bright_cyan(),
        count(v.pool_size).bright_yellow(),
        count(v.team_size).bright_yellow(),
        v.mode.as_deref().unwrap_or("Unknown").white().bold(),
        count(v.workers).bright_yellow(),
        format!("{:.2}", v.global_target_skill.unwrap_or(0.0)).bright_magenta()
    )
}

fn format_batch_end(v: &EventVisitor) -> String {
    format!(
        "    {} Batch {:>3} | teams {:>4} | leftover {:>4} | attempts {:>6} | {}",
        "->".bright_blue(),
        v.batch.unwrap_or(0).to_string().yellow(),
        count(v.teams).white(),
        count(v.leftover).white(),
        count(v.attempts).white(),
        v.stop_reason.as_deref().unwrap_or("").bright_black()
    )
}

fn format_formation_end(v: &EventVisitor) -> String {
    let teams = v.teams.unwrap_or(0);
    let unassigned = v.unassigned.unwrap_or(0);

    let mut output = format!(
        "{} {} {} Formation ended: time spent ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Formation]".bright_cyan(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow()
    );

    output.push_str("\n\n");
    output.push_str(&"╔══════════════════════════════════════════════════════════╗".bright_cyan().to_string());
    output.push('\n');
    output.push_str(&summary_line("Teams formed:", &count(Some(teams))));
    output.push('\n');
    output.push_str(&summary_line("Unassigned:", &count(Some(unassigned))));
    output.push('\n');
    output.push_str(&"╚══════════════════════════════════════════════════════════╝".bright_cyan().to_string());
    output.push('\n');

    output
}

fn summary_line(label: &str, value: &str) -> String {
    format!(
        "{}  {:<18}{:>36}  {}",
        "║".bright_cyan(),
        label,
        value,
        "║".bright_cyan()
    )
}

fn format_run_committed(v: &EventVisitor) -> String {
    format!(
        "{} {} {} Committed {} teams, {} participants assigned, counter at {}",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Session]".bright_cyan(),
        count(v.teams).bright_yellow(),
        count(v.assigned).bright_yellow(),
        format!("TEAM{:04}", v.counter.unwrap_or(0)).white().bold()
    )
}

fn format_run_discarded(v: &EventVisitor) -> String {
    format!(
        "{} {} {} Discarded {} teams, counter back at {}",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Session]".bright_cyan(),
        count(v.teams).bright_yellow(),
        format!("TEAM{:04}", v.counter.unwrap_or(0)).white().bold()
    )
}

fn format_warning(event: &str, v: &EventVisitor) -> String {
    format!(
        "{} {} {} {}{}",
        timestamp().bright_black(),
        "WARN".bright_red(),
        "[Formation]".bright_cyan(),
        event.replace('_', " ").white(),
        v.error
            .as_deref()
            .map(|e| format!(": {e}"))
            .unwrap_or_default()
            .bright_red()
    )
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
