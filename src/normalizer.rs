use crate::scanner::RawMonthRow;
use crate::types::{InflationRow, Period, RateObservation};
use crate::util::{month_ordinal, parse_decimal_comma};
use log::warn;

/// Turn scanned `(year, month label, value)` rows into an ordered rate series.
///
/// Unknown month labels are dropped with a warning. Values that do not parse
/// become `rate: None`. When two rows land on the same period the later one
/// wins.
pub fn normalize(rows: &[RawMonthRow]) -> Vec<RateObservation> {
    let observations = rows.iter().filter_map(|row| {
        let Some(period) = month_ordinal(&row.month_label).and_then(|m| Period::new(row.year, m))
        else {
            warn!(
                "dropping {} row with unrecognized month label '{}'",
                row.year, row.month_label
            );
            return None;
        };
        Some(RateObservation {
            period,
            rate: parse_decimal_comma(Some(&row.value)),
        })
    });
    into_series(observations)
}

/// Same as [`normalize`] for rows read back from the inflation CSV.
pub fn from_inflation_rows(rows: &[InflationRow]) -> Vec<RateObservation> {
    let observations = rows.iter().filter_map(|row| {
        let Some(period) = month_ordinal(&row.month).and_then(|m| Period::new(row.year, m)) else {
            warn!(
                "dropping {} row with unrecognized month label '{}'",
                row.year, row.month
            );
            return None;
        };
        Some(RateObservation {
            period,
            rate: row.rate,
        })
    });
    into_series(observations)
}

/// Stable sort by period, then keep the last observation of each period.
fn into_series(observations: impl Iterator<Item = RateObservation>) -> Vec<RateObservation> {
    let mut sorted: Vec<RateObservation> = observations.collect();
    sorted.sort_by_key(|obs| obs.period);

    let mut series: Vec<RateObservation> = Vec::with_capacity(sorted.len());
    for obs in sorted {
        match series.last_mut() {
            Some(last) if last.period == obs.period => {
                warn!("duplicate rate for {}; keeping the later value", obs.period);
                *last = obs;
            }
            _ => series.push(obs),
        }
    }
    series
}
