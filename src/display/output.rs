use crate::analysis::audit::BlockEvent;
use crate::analysis::performance::PerformanceRow;
use crate::pipeline::{Reporter, RunSummary};
use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Stdout, Write};
use std::time::Duration;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct PerformanceTableRow {
    color: String,
    #[tabled(rename = "time control")]
    time_control: String,
    games: String,
    performance: String,
}

pub fn performance_table(rows: &[PerformanceRow]) -> String {
    let rows: Vec<PerformanceTableRow> = rows
        .iter()
        .map(|row| PerformanceTableRow {
            color: row.color.to_string(),
            time_control: row.time_control.to_string(),
            games: row.games.to_string(),
            performance: format!("{:.2}", row.average),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

pub fn format_block_event(event: &BlockEvent) -> String {
    let mut line = format!("Blocked {} after playing", event.opponent_id.bold());
    if event.banned {
        line.push_str(&format!(" {}", "and they got banned".red()));
    }
    format!(
        "{}\npercentage of those blocked who were banned: {:.1}% ({}/{})",
        line, event.percentage, event.blocked_and_banned, event.blocked
    )
}

/// Spinner plus colored report lines.
///
/// Lines go to `out` with the spinner suspended, so they are still written
/// when the bar is hidden (stderr redirected, cron, ...).
pub struct ConsoleReporter<W: Write = Stdout> {
    pb: ProgressBar,
    out: W,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        ConsoleReporter::with_target(io::stdout(), ProgressDrawTarget::stderr())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn with_target(out: W, draw_target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(None, draw_target);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {pos} games processed {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        if !pb.is_hidden() {
            pb.enable_steady_tick(Duration::from_millis(120));
        }
        ConsoleReporter { pb, out }
    }

    fn emit(&mut self, text: &str) {
        let out = &mut self.out;
        self.pb.suspend(|| {
            let _ = writeln!(out, "{}", text);
        });
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn game_processed(&mut self) {
        self.pb.inc(1);
    }

    fn progress(&mut self, games_processed: usize, rows: &[PerformanceRow]) {
        let header = format!("📊 Average performance after {} games", games_processed);
        self.emit(&format!("\n{}", header.bold().cyan()));
        self.emit(&performance_table(rows));
    }

    fn blocked(&mut self, event: &BlockEvent) {
        self.emit(&format!("\n{}\n", format_block_event(event)));
    }

    fn finished(&mut self, summary: &RunSummary) {
        self.pb.finish_and_clear();

        self.emit(&format!("\n{}", "🏁 Final statistics".bold().cyan()));
        self.emit(&format!("{}\n", "=".repeat(60).cyan()));
        self.emit(&format!(
            "{} {} games ({} decided, {} without a result)",
            "Processed:".bold(),
            summary.games,
            summary.decided,
            summary.undecided
        ));

        if !summary.rows.is_empty() {
            self.emit(&performance_table(&summary.rows));
        }

        if summary.opponents_checked > 0 {
            self.emit(&format!(
                "\n{} {} opponents checked, {} blocked, {} of those banned",
                "Audit:".bold(),
                summary.opponents_checked,
                summary.blocked.to_string().yellow(),
                summary.blocked_and_banned.to_string().red()
            ));
            match summary.ban_percentage {
                Some(pct) => self.emit(&format!("• {:.1}% of blocked opponents were banned", pct)),
                None => self.emit("• No blocked opponents in the window"),
            }
        }

        self.emit("");
    }
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
