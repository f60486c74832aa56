use crate::analysis::audit::{BlockEvent, OpponentAuditor, ProfileLookup};
use crate::analysis::classifier::{classify, TimeControl};
use crate::analysis::performance::{PerformanceRow, PerformanceTracker};
use crate::api::models::GameDto;
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;

/// Which aggregations a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Performance averages and the block/ban audit
    #[default]
    Full,
    /// Performance averages only
    Performance,
    /// Block/ban audit only
    Blocks,
}

impl Mode {
    pub fn tracks_performance(self) -> bool {
        matches!(self, Mode::Full | Mode::Performance)
    }

    pub fn audits_blocks(self) -> bool {
        matches!(self, Mode::Full | Mode::Blocks)
    }
}

/// Receives progress from a run. The pipeline never reads anything back.
pub trait Reporter {
    fn game_processed(&mut self) {}
    fn progress(&mut self, games_processed: usize, rows: &[PerformanceRow]);
    fn blocked(&mut self, event: &BlockEvent);
    fn finished(&mut self, summary: &RunSummary);
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub username: String,
    pub mode: Mode,
    pub time_controls: Vec<TimeControl>,
    /// Report every Nth game; 0 disables periodic reports.
    pub report_every: usize,
    pub window: Duration,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub games: usize,
    pub decided: u32,
    pub undecided: usize,
    pub rows: Vec<PerformanceRow>,
    pub opponents_checked: usize,
    pub blocked: u32,
    pub blocked_and_banned: u32,
    pub ban_percentage: Option<f64>,
}

pub struct Pipeline {
    options: PipelineOptions,
    performances: PerformanceTracker,
    auditor: OpponentAuditor,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        let auditor = OpponentAuditor::new(options.window);
        Pipeline {
            options,
            performances: PerformanceTracker::new(),
            auditor,
        }
    }

    #[cfg(test)]
    pub fn performances(&self) -> &PerformanceTracker {
        &self.performances
    }

    /// Consumes `games` front to back; the first error ends the run.
    pub fn run<I>(
        &mut self,
        games: I,
        lookup: &dyn ProfileLookup,
        reporter: &mut dyn Reporter,
        now: DateTime<Utc>,
    ) -> Result<RunSummary, AppError>
    where
        I: IntoIterator<Item = Result<GameDto, AppError>>,
    {
        let mode = self.options.mode;
        let report_every = self.options.report_every;
        let mut games_processed = 0;
        let mut undecided = 0;

        for (i, game) in games.into_iter().enumerate() {
            let game = game?;
            let c = classify(&game, &self.options.username)?;
            games_processed += 1;
            reporter.game_processed();

            if c.outcome.is_none() {
                undecided += 1;
            }

            if mode.tracks_performance() {
                self.performances
                    .record(c.outcome, c.opponent_rating, c.color, c.time_control);

                if report_every > 0 && i % report_every == 0 {
                    reporter.progress(games_processed, &self.rows());
                }
            }

            if mode.audits_blocks() {
                if let Some(event) = self.auditor.audit(&c.opponent_id, c.created_at, now, lookup)? {
                    reporter.blocked(&event);
                }
            }
        }

        let summary = RunSummary {
            games: games_processed,
            decided: self.performances.total_games(),
            undecided,
            rows: if mode.tracks_performance() { self.rows() } else { Vec::new() },
            opponents_checked: self.auditor.opponents_checked(),
            blocked: self.auditor.blocked(),
            blocked_and_banned: self.auditor.blocked_and_banned(),
            ban_percentage: self.auditor.percentage(),
        };
        log::info!(
            "processed {} games, {} opponents checked",
            summary.games,
            summary.opponents_checked
        );
        reporter.finished(&summary);

        Ok(summary)
    }

    fn rows(&self) -> Vec<PerformanceRow> {
        self.performances.rows(&self.options.time_controls)
    }
}
