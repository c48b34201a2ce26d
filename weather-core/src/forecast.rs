//! Reduces the 3-hour forecast series to one sample per upcoming day.

use crate::model::{DailyForecast, ForecastSample};

/// Clock time used to pick the representative sample of each day.
pub const REFERENCE_TIME: &str = "12:00:00";

/// Pick the noon sample of every day after the first one in the series.
///
/// The date of the first entry is treated as today and skipped. Days
/// without an exact noon sample are left out rather than interpolated.
pub fn select_daily(series: &[ForecastSample]) -> DailyForecast {
    let Some(first) = series.first() else {
        return Vec::new();
    };
    let anchor = first.date_part();

    let mut daily: DailyForecast = Vec::new();
    for sample in series {
        if sample.time_part() != REFERENCE_TIME || sample.date_part() == anchor {
            continue;
        }
        if daily
            .last()
            .is_some_and(|prev| prev.date_part() == sample.date_part())
        {
            continue;
        }
        daily.push(sample.clone());
    }
    daily
}
