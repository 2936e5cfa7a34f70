// 📈 Trend - one user's BMI history as a time-ordered series

use crate::classifier::Category;
use crate::record::BmiRecord;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: NaiveDateTime,
    pub bmi: f64,
    pub category: Category,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trend {
    points: Vec<TrendPoint>,
}

impl Trend {
    /// Sort by timestamp; equal timestamps keep insertion order
    pub fn from_records(records: &[BmiRecord]) -> Self {
        let mut points: Vec<TrendPoint> = records
            .iter()
            .map(|r| TrendPoint {
                timestamp: r.timestamp(),
                bmi: r.bmi(),
                category: r.category(),
            })
            .collect();
        points.sort_by_key(|p| p.timestamp);

        Trend { points }
    }

    pub fn points(&self) -> &[TrendPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> Option<&TrendPoint> {
        self.points.first()
    }

    pub fn latest(&self) -> Option<&TrendPoint> {
        self.points.last()
    }

    /// Latest minus first BMI, rounded to 2 decimals
    pub fn change(&self) -> Option<f64> {
        match (self.first(), self.latest()) {
            (Some(first), Some(latest)) => Some(crate::classifier::round2(latest.bmi - first.bmi)),
            _ => None,
        }
    }

    pub fn min_bmi(&self) -> Option<f64> {
        self.points.iter().map(|p| p.bmi).reduce(f64::min)
    }

    pub fn max_bmi(&self) -> Option<f64> {
        self.points.iter().map(|p| p.bmi).reduce(f64::max)
    }

    /// Axis bounds for plotting: ([t_min, t_max] as unix seconds, [bmi_min, bmi_max]).
    /// A single point or flat series is padded so the bounds never collapse.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let first = self.first()?;
        let latest = self.latest()?;

        let mut x = [
            first.timestamp.and_utc().timestamp() as f64,
            latest.timestamp.and_utc().timestamp() as f64,
        ];
        if x[1] <= x[0] {
            x = [x[0] - 43_200.0, x[0] + 43_200.0];
        }

        let lo = self.min_bmi()?;
        let hi = self.max_bmi()?;
        let pad = ((hi - lo) * 0.1).max(1.0);

        Some((x, [(lo - pad).max(0.0), hi + pad]))
    }

    /// (unix seconds, bmi) pairs in time order
    pub fn series(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.timestamp.and_utc().timestamp() as f64, p.bmi))
            .collect()
    }
}
