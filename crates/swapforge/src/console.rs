//! Colorful console output for optimizer events.
//!
//! Provides a custom `tracing` layer that formats the solver's structured
//! events. The `RUST_LOG` environment variable overrides the default
//! `swapforge_solver=info` filter.

use std::io::{self, Write};
use std::sync::OnceLock;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_DIRECTIVE: &str = "swapforge_solver=info";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. Does
/// nothing if another global subscriber is already installed.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SwapForgeConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats optimizer events with colors.
pub struct SwapForgeConsoleLayer;

impl<S: Subscriber> Layer<S> for SwapForgeConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("swapforge_solver") {
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

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    strategy: Option<String>,
    algorithm: Option<String>,
    target: Option<String>,
    reason: Option<String>,
    colors: Option<u64>,
    slots: Option<u64>,
    swaps: Option<u64>,
    iterations: Option<u64>,
    iteration: Option<u64>,
    best_cost: Option<u64>,
    duration_ms: Option<u64>,
    sources: Option<u64>,
    affected_layers: Option<u64>,
    version: Option<u64>,
    start_layer: Option<u64>,
    end_layer: Option<u64>,
    max_colors_required: Option<u64>,
    acceptance_rate: Option<f64>,
    temperature: Option<f64>,
    is_valid: Option<bool>,
    terminated_early: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        match field.name() {
            "strategy" => self.strategy = Some(s),
            "algorithm" => self.algorithm = Some(s),
            "target" => self.target = Some(s),
            "reason" => self.reason = Some(s),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "phase" => self.phase = Some(value.to_string()),
            "strategy" => self.strategy = Some(value.to_string()),
            "reason" => self.reason = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "colors" => self.colors = Some(value),
            "slots" => self.slots = Some(value),
            "swaps" => self.swaps = Some(value),
            "iterations" => self.iterations = Some(value),
            "iteration" => self.iteration = Some(value),
            "best_cost" => self.best_cost = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "sources" => self.sources = Some(value),
            "affected_layers" => self.affected_layers = Some(value),
            "version" => self.version = Some(value),
            "start_layer" => self.start_layer = Some(value),
            "end_layer" => self.end_layer = Some(value),
            "max_colors_required" => self.max_colors_required = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "acceptance_rate" => self.acceptance_rate = Some(value),
            "temperature" => self.temperature = Some(value),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "is_valid" => self.is_valid = Some(value),
            "terminated_early" => self.terminated_early = Some(value),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "optimize_start" => format_optimize_start(v),
        "optimize_end" => format_optimize_end(v),
        "phase_start" => format_phase_start(v),
        "phase_end" => format_phase_end(v),
        "progress" => format_progress(v),
        "violation_range" => format_violation(v),
        "merge_applied" => format_merge_applied(v),
        "merge_rejected" => format_merge_rejected(v),
        _ => String::new(),
    }
}

fn format_optimize_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} {} colors into {} slots, strategy ({}), algorithm ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Optimizer]".bright_cyan(),
        count(v.colors).bright_yellow(),
        count(v.slots).bright_yellow(),
        v.strategy.as_deref().unwrap_or("?").white().bold(),
        v.algorithm.as_deref().unwrap_or("?").white().bold(),
    )
}

fn format_optimize_end(v: &EventVisitor) -> String {
    let valid = if v.is_valid.unwrap_or(true) {
        "valid".bright_green().to_string()
    } else {
        "overlapping colors share a slot".bright_red().to_string()
    };
    format!(
        "{} {} {} Optimization ended: time spent ({}), manual swaps ({}), {}",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Optimizer]".bright_cyan(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        count(v.swaps).bright_magenta().bold(),
        valid,
    )
}

fn format_phase_start(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    format!(
        "{} {} {} {} started, iteration budget ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        format!("[{}]", phase).bright_cyan(),
        phase.white().bold(),
        count(v.iterations).yellow(),
    )
}

fn format_phase_end(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    let mut output = format!(
        "{} {} {} {} ended: time spent ({}), best cost ({}), acceptance rate ({:.1}%), iterations ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        format!("[{}]", phase).bright_cyan(),
        phase.white().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        count(v.best_cost).bright_magenta().bold(),
        v.acceptance_rate.unwrap_or(0.0) * 100.0,
        count(v.iterations).white(),
    );
    if v.terminated_early == Some(true) {
        output.push_str(&format!(" {}", "(terminated early)".yellow()));
    }
    output
}

fn format_progress(v: &EventVisitor) -> String {
    format!(
        "    {} Iteration {:>9} | temperature {:>10.2} | best cost {}",
        "->".bright_blue(),
        count(v.iteration).white(),
        v.temperature.unwrap_or(0.0),
        count(v.best_cost).bright_green(),
    )
}

fn format_violation(v: &EventVisitor) -> String {
    format!(
        "{} {} {} layers {}..={} need {} slots, {} available",
        timestamp().bright_black(),
        "DEBUG".bright_blue(),
        "[Feasibility]".bright_cyan(),
        count(v.start_layer).yellow(),
        count(v.end_layer).yellow(),
        count(v.max_colors_required).bright_red().bold(),
        count(v.slots),
    )
}

fn format_merge_applied(v: &EventVisitor) -> String {
    format!(
        "{} {} {} merged {} color(s) into {}, {} layers affected, version {}",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Merge]".bright_cyan(),
        count(v.sources).yellow(),
        v.target.as_deref().unwrap_or("?").white().bold(),
        count(v.affected_layers).yellow(),
        count(v.version),
    )
}

fn format_merge_rejected(v: &EventVisitor) -> String {
    format!(
        "{} {} {} merge into {} rejected: {}",
        timestamp().bright_black(),
        "WARN".bright_yellow(),
        "[Merge]".bright_cyan(),
        v.target.as_deref().unwrap_or("?").white().bold(),
        v.reason.as_deref().unwrap_or("unknown reason").bright_red(),
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
