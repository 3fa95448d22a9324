//! Colorful console output for rota generation.
//!
//! Provides a custom `tracing` layer that formats RotaForge events with
//! colors. Enabled with the `console` feature.

use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Initializes the console output.
///
/// Safe to call multiple times - only the first call has effect. `RUST_LOG`
/// is honored; without it RotaForge events are shown at `info`.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy();

        // A subscriber installed elsewhere wins.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(RotaConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let version_line = format!(
        "RotaForge v{} - duty rotas on a 0/1 integer program",
        env!("CARGO_PKG_VERSION")
    );

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", version_line.bright_cyan().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats rota events with colors.
pub struct RotaConsoleLayer;

impl<S: Subscriber> Layer<S> for RotaConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("rotaforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    title: Option<String>,
    flavor: Option<String>,
    outcome: Option<String>,
    params: Option<String>,
    rule: Option<String>,
    error: Option<String>,
    variables: Option<u64>,
    constraints: Option<u64>,
    elapsed_ms: Option<u64>,
    candidates: Option<u64>,
    candidate: Option<u64>,
    workers: Option<u64>,
    attempts: Option<u64>,
    people: Option<u64>,
    periods: Option<u64>,
    period: Option<u64>,
    swaps: Option<u64>,
    seed: Option<u64>,
}

impl EventVisitor {
    fn text(&mut self, name: &str, value: String) {
        let slot = match name {
            "event" => &mut self.event,
            "title" => &mut self.title,
            "flavor" => &mut self.flavor,
            "outcome" => &mut self.outcome,
            "params" | "limits" => &mut self.params,
            "rule" => &mut self.rule,
            "error" => &mut self.error,
            _ => return,
        };
        *slot = Some(value);
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.text(field.name(), s.trim_matches('"').to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let slot = match field.name() {
            "variables" => &mut self.variables,
            "constraints" => &mut self.constraints,
            "elapsed_ms" => &mut self.elapsed_ms,
            "candidates" => &mut self.candidates,
            "candidate" => &mut self.candidate,
            "workers" => &mut self.workers,
            "attempts" => &mut self.attempts,
            "people" => &mut self.people,
            "weeks" | "days" => &mut self.periods,
            "period" => &mut self.period,
            "swaps" => &mut self.swaps,
            "seed" => &mut self.seed,
            _ => return,
        };
        *slot = Some(value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value as u64);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.text(field.name(), value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.text(field.name(), value.to_string());
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "rota_start" => format_rota_start(v),
        "rota_end" => format_rota_end(v),
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "search_start" => format_search_start(v),
        "search_end" => format_search_end(v),
        "solver_fault" => format_solver_fault(v),
        "attempt_failed" => format_attempt_failed(v),
        _ => String::new(),
    }
}

fn prefix(level: Level, tag: &str) -> String {
    let level = match level {
        Level::ERROR => "ERROR".bright_red().to_string(),
        Level::WARN => " WARN".bright_yellow().to_string(),
        Level::INFO => " INFO".bright_green().to_string(),
        _ => "DEBUG".bright_black().to_string(),
    };
    format!(
        "{} {} {}",
        timestamp().bright_black(),
        level,
        format!("[{}]", tag).bright_cyan()
    )
}

fn format_rota_start(v: &EventVisitor) -> String {
    format!(
        "{} generating {} periods for {} people (seed {})",
        prefix(Level::INFO, v.flavor.as_deref().unwrap_or("rota")),
        v.periods.unwrap_or(0).to_string().bright_yellow(),
        v.people.unwrap_or(0).to_string().bright_yellow(),
        v.seed.unwrap_or(0).to_string().bright_magenta()
    )
}

fn format_rota_end(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {}",
        prefix(Level::INFO, v.flavor.as_deref().unwrap_or("rota")),
        "rota generated".bright_green().bold()
    );
    if let Some(swaps) = v.swaps {
        output.push_str(&format!(", seniority swaps ({})", swaps.to_string().yellow()));
    }
    if let Some(params) = &v.params {
        output.push_str(&format!(
            ", limits ({}), attempts ({})",
            params.white().bold(),
            v.attempts.unwrap_or(0).to_string().yellow()
        ));
    }
    output
}

fn format_solve_start(v: &EventVisitor) -> String {
    format!(
        "{} {}: variables ({}), constraints ({})",
        prefix(Level::INFO, "Optimizer"),
        v.title.as_deref().unwrap_or("model").white().bold(),
        v.variables.unwrap_or(0).to_string().bright_yellow(),
        v.constraints.unwrap_or(0).to_string().bright_yellow()
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let outcome = v.outcome.as_deref().unwrap_or("unknown");
    let outcome = if outcome == "solved" {
        outcome.bright_green().to_string()
    } else {
        outcome.bright_red().to_string()
    };
    format!(
        "{} {}: {} in {}",
        prefix(Level::INFO, "Optimizer"),
        v.title.as_deref().unwrap_or("model").white().bold(),
        outcome,
        format_duration_ms(v.elapsed_ms.unwrap_or(0)).yellow()
    )
}

fn format_search_start(v: &EventVisitor) -> String {
    format!(
        "{} trying {} candidates on {} workers",
        prefix(Level::INFO, "Relaxation"),
        v.candidates.unwrap_or(0).to_string().bright_yellow(),
        v.workers.unwrap_or(0).to_string().bright_yellow()
    )
}

fn format_search_end(v: &EventVisitor) -> String {
    let attempts = v.attempts.unwrap_or(0).to_string();
    match v.outcome.as_deref() {
        Some("found") => format!(
            "{} candidate {} ({}) succeeded after {} attempts",
            prefix(Level::INFO, "Relaxation"),
            v.candidate.unwrap_or(0).to_string().bright_magenta(),
            v.params.as_deref().unwrap_or("").white().bold(),
            attempts.yellow()
        ),
        _ => format!(
            "{} {} after {} attempts",
            prefix(Level::INFO, "Relaxation"),
            "no candidate produced a rota".bright_red().bold(),
            attempts.yellow()
        ),
    }
}

fn format_attempt_failed(v: &EventVisitor) -> String {
    format!(
        "{} candidate {} ({}): {}",
        prefix(Level::DEBUG, "Relaxation"),
        v.candidate.unwrap_or(0),
        v.params.as_deref().unwrap_or(""),
        v.error.as_deref().unwrap_or("failed")
    )
}

fn format_solver_fault(v: &EventVisitor) -> String {
    format!(
        "{} {}: period {} breaks {}",
        prefix(Level::WARN, "Validator"),
        v.title.as_deref().unwrap_or("model").white().bold(),
        v.period.unwrap_or(0).to_string().bright_yellow(),
        v.rule.as_deref().unwrap_or("a rule").bright_red()
    )
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
