use crate::accumulator::InflationAccumulator;
use crate::types::{Period, RateObservation, ReconstructedRecord, SalesRecord};

/// Build a fictitious monthly history from one month of real purchases.
///
/// Every store in `bases` gets one row per period of `series` (plus the base
/// period when the series lacks it). At the base period the quantity is the
/// base quantity; elsewhere it is the base quantity divided by that period's
/// compounding factor. Quantities are truncated toward zero.
///
/// Rows come out period-major, stores in input order.
pub fn synthesize(
    series: &[RateObservation],
    base: Period,
    bases: &[SalesRecord],
) -> Vec<ReconstructedRecord> {
    let accumulator = InflationAccumulator::new(series, base);

    let mut periods: Vec<Period> = series.iter().map(|obs| obs.period).collect();
    if let Err(pos) = periods.binary_search(&base) {
        periods.insert(pos, base);
    }

    let mut records = Vec::with_capacity(periods.len() * bases.len());
    for period in periods {
        let factor = accumulator.factor(period);
        for store in bases {
            let quantity = if period == base {
                store.base_quantity
            } else {
                store.base_quantity / factor
            };
            records.push(ReconstructedRecord {
                period,
                uf: store.uf.clone(),
                id: store.id.clone(),
                pet_shop: store.pet_shop.clone(),
                quantity: quantity as i64,
            });
        }
    }
    records
}
