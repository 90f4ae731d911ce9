use crate::types::{Period, RateObservation};

/// Compounding factors over a sorted monthly rate series.
///
/// `factor(p)` multiplies `1 + rate/100` for every observation up to and
/// including `p`, starting from the first month of the series (not from the
/// base period). The base period itself always has factor `1.0`. Missing
/// rates contribute nothing.
#[derive(Debug, Clone)]
pub struct InflationAccumulator<'a> {
    series: &'a [RateObservation],
    base: Period,
}

impl<'a> InflationAccumulator<'a> {
    /// `series` must be sorted ascending by period, as produced by the
    /// normalizer.
    pub fn new(series: &'a [RateObservation], base: Period) -> Self {
        InflationAccumulator { series, base }
    }

    pub fn base(&self) -> Period {
        self.base
    }

    pub fn factor(&self, period: Period) -> f64 {
        if period == self.base {
            return 1.0;
        }
        // Left-to-right fold in period order; do not reorder.
        self.series
            .iter()
            .take_while(|obs| obs.period <= period)
            .filter_map(|obs| obs.rate)
            .fold(1.0, |acc, rate| acc * (1.0 + rate / 100.0))
    }
}
