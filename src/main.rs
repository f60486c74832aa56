mod analysis;
mod api;
mod config;
mod display;
mod error;
mod pipeline;

use analysis::audit::{DEFAULT_WINDOW_WEEKS, MAX_WINDOW_WEEKS};
use analysis::classifier::TimeControl;
use anyhow::Context;
use api::client::{ExportQuery, LichessClient};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::Parser;
use config::{Config, ConfigOverrides};
use display::output::{display_error, display_info, display_success, ConsoleReporter};
use pipeline::{Mode, Pipeline, PipelineOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "Lichess Stats")]
#[command(about = "Average performance by color and time control, and how many blocked opponents got banned", long_about = None)]
struct Args {
    /// Lichess username to analyze (default: first line of username.txt)
    #[arg(short, long)]
    username: Option<String>,

    /// File holding the API token (default: api-key.txt)
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// File holding the username (default: username.txt)
    #[arg(long)]
    username_file: Option<PathBuf>,

    /// Which statistics to compute
    #[arg(short, long, value_enum, default_value_t = Mode::Full)]
    mode: Mode,

    /// Time controls to fetch and report, comma separated
    #[arg(short, long, value_enum, value_delimiter = ',', default_values_t = [TimeControl::Rapid, TimeControl::Classical])]
    perf: Vec<TimeControl>,

    /// Print the performance table every N games (0 = only at the end)
    #[arg(short, long, default_value = "100")]
    report_every: usize,

    /// Only audit opponents from games played in the last N weeks
    #[arg(short, long, default_value_t = DEFAULT_WINDOW_WEEKS,
          value_parser = clap::value_parser!(i64).range(0..=MAX_WINDOW_WEEKS))]
    window_weeks: i64,

    /// Only fetch games played on or after this date (YYYY-MM-DD)
    #[arg(long)]
    since: Option<NaiveDate>,

    /// Only fetch games played before this date (YYYY-MM-DD)
    #[arg(long)]
    until: Option<NaiveDate>,

    /// Maximum number of games to fetch
    #[arg(long)]
    max: Option<u32>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::load(ConfigOverrides {
        username: args.username,
        token_file: args.token_file,
        username_file: args.username_file,
    })
    .context("loading credentials")?;

    let query = ExportQuery {
        perf_types: args.perf.clone(),
        rated: true,
        since: args.since.map(start_of_day),
        until: args.until.map(start_of_day),
        max: args.max,
    };

    display_info(&format!(
        "Fetching rated {} games for {}",
        query.perf_type_param(),
        config.username
    ));

    let client = LichessClient::new(config.clone());
    let games = client
        .export_games(&config.username, &query)
        .context("requesting game export")?;

    let mut pipeline = Pipeline::new(PipelineOptions {
        username: config.username.clone(),
        mode: args.mode,
        time_controls: args.perf,
        report_every: args.report_every,
        window: Duration::weeks(args.window_weeks),
    });
    let mut reporter = ConsoleReporter::new();

    let summary = pipeline
        .run(games, &client, &mut reporter, Utc::now())
        .context("processing games")?;

    display_success(&format!("Analyzed {} games", summary.games));
    Ok(())
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::try_parse_from(["lichess_stats"]).unwrap();
        assert_eq!(args.mode, Mode::Full);
        assert_eq!(args.perf, vec![TimeControl::Rapid, TimeControl::Classical]);
        assert_eq!(args.report_every, 100);
        assert_eq!(args.window_weeks, 4);
        assert!(args.username.is_none());
    }

    #[test]
    fn test_parse_perf_list_and_mode() {
        let args = Args::try_parse_from([
            "lichess_stats",
            "--perf",
            "blitz,ultraBullet",
            "--mode",
            "blocks",
            "--since",
            "2024-01-31",
        ])
        .unwrap();
        assert_eq!(args.perf, vec![TimeControl::Blitz, TimeControl::UltraBullet]);
        assert_eq!(args.mode, Mode::Blocks);
        assert_eq!(args.since, NaiveDate::from_ymd_opt(2024, 1, 31));
    }

    #[test]
    fn test_window_weeks_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["lichess_stats", "--window-weeks", "100000000"]).is_err());
        assert!(Args::try_parse_from(["lichess_stats", "--window-weeks", "99999999999999999"]).is_err());
        assert!(Args::try_parse_from(["lichess_stats", "--window-weeks", "-1"]).is_err());

        let args = Args::try_parse_from(["lichess_stats", "--window-weeks", "5200"]).unwrap();
        assert_eq!(args.window_weeks, MAX_WINDOW_WEEKS);
    }

    #[test]
    fn test_start_of_day_is_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(start_of_day(date).timestamp_millis(), 1_704_067_200_000);
    }
}
