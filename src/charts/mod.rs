// Public API - what other modules can use
pub use handlers::progress_chart;

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::modes::GameMode;
use crate::score::ScoreModel;

/// One (x, y) point of a chart series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    pub x: DateTime<Utc>,
    pub y: f64,
}

/// A labeled tabular series. The server only assembles these; drawing
/// them is the client-side charting component's job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSeries {
    pub mode: String,
    pub name: String,
    pub points: Vec<ChartPoint>,
}

/// Folds a player's score history into one chronological
/// (recorded_at, score) series per mode.
///
/// With a requested mode the result is that single series, even when
/// empty; otherwise only modes the player has actually played appear.
pub fn progress_series(entries: &[ScoreModel], mode: Option<GameMode>) -> Vec<ChartSeries> {
    let modes: Vec<GameMode> = match mode {
        Some(mode) => vec![mode],
        None => GameMode::iter().collect(),
    };

    let mut series: Vec<ChartSeries> = Vec::new();
    for current in modes {
        let mut points: Vec<ChartPoint> = entries
            .iter()
            .filter(|e| e.mode == current.code())
            .map(|e| ChartPoint {
                x: e.recorded_at,
                y: e.score,
            })
            .collect();
        points.sort_by_key(|p| p.x);

        if points.is_empty() && mode.is_none() {
            continue;
        }

        series.push(ChartSeries {
            mode: current.code().to_string(),
            name: current.display_name().to_string(),
            points,
        });
    }

    series
}
