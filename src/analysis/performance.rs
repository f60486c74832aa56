use super::classifier::{Color, Outcome, TimeControl};
use std::collections::HashMap;

/// Opponent rating shifted by the result: +400 for a win, -400 for a loss.
pub fn performance_value(outcome: Option<Outcome>, opponent_rating: u32) -> Option<i64> {
    outcome.map(|o| opponent_rating as i64 + o.rating_offset() as i64)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Bucket {
    pub sum: i64,
    pub games: u32,
}

impl Bucket {
    pub fn average(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            round2(self.sum as f64 / self.games as f64)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRow {
    pub color: Color,
    pub time_control: TimeControl,
    pub average: f64,
    pub games: u32,
}

pub struct PerformanceTracker {
    buckets: HashMap<(Color, TimeControl), Bucket>,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        PerformanceTracker {
            buckets: HashMap::new(),
        }
    }

    /// Unknown outcomes are dropped.
    pub fn record(
        &mut self,
        outcome: Option<Outcome>,
        opponent_rating: u32,
        color: Color,
        time_control: TimeControl,
    ) {
        let Some(value) = performance_value(outcome, opponent_rating) else {
            return;
        };

        let bucket = self.buckets.entry((color, time_control)).or_default();
        bucket.sum += value;
        bucket.games += 1;
    }

    /// Mean performance rounded to two decimals; 0 for an empty bucket.
    pub fn average(&self, color: Color, time_control: TimeControl) -> f64 {
        self.buckets
            .get(&(color, time_control))
            .map(Bucket::average)
            .unwrap_or(0.0)
    }

    pub fn count(&self, color: Color, time_control: TimeControl) -> u32 {
        self.buckets
            .get(&(color, time_control))
            .map(|b| b.games)
            .unwrap_or(0)
    }

    pub fn total_games(&self) -> u32 {
        self.buckets.values().map(|b| b.games).sum()
    }

    pub fn rows(&self, time_controls: &[TimeControl]) -> Vec<PerformanceRow> {
        Color::ALL
            .iter()
            .flat_map(|&color| {
                time_controls.iter().map(move |&time_control| PerformanceRow {
                    color,
                    time_control,
                    average: self.average(color, time_control),
                    games: self.count(color, time_control),
                })
            })
            .collect()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
