//! Current vs previous period trend alignment
//!
//! Two months are lined up by day of month rather than absolute date, so
//! day 5 of March sits next to day 5 of February.

use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

use costboard_types::{ChartType, Series, TrendPoint};

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = (date.year(), date.month());
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Turn a daily series into a running total
///
/// Points keep their order; each `y` becomes the sum of itself and every
/// point before it.
pub fn accumulate(series: &Series) -> Series {
    let mut running = 0.0;
    let points = series
        .points
        .iter()
        .map(|p| {
            running += p.y;
            let mut point = p.clone();
            point.y = running;
            point
        })
        .collect();

    Series {
        points,
        ..series.clone()
    }
}

/// Apply a chart type to a date series
pub fn apply_chart_type(series: Series, chart: ChartType) -> Series {
    match chart {
        ChartType::Daily => series,
        ChartType::Rolling => accumulate(&series),
    }
}

/// Month holding the most points of a date series; ties go to the later month
fn anchor_month(series: &Series) -> Option<NaiveDate> {
    let mut counts: BTreeMap<(i32, u32), (usize, NaiveDate)> = BTreeMap::new();
    for date in series.points.iter().filter_map(|p| p.x.as_date()) {
        counts
            .entry((date.year(), date.month()))
            .or_insert((0, date))
            .0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(a_month, (a_count, _)), (b_month, (b_count, _))| {
            a_count.cmp(b_count).then_with(|| a_month.cmp(b_month))
        })
        .map(|(_, (_, date))| date)
}

/// Values of a date series indexed by day of month
///
/// Only dates inside the anchor month are kept; a series that spills
/// into a neighbouring month would otherwise collide on offsets.
fn by_day(series: &Series) -> (Option<NaiveDate>, BTreeMap<u32, (NaiveDate, f64)>) {
    let mut days = BTreeMap::new();

    let Some(anchor) = anchor_month(series) else {
        return (None, days);
    };

    for point in &series.points {
        let Some(date) = point.x.as_date() else {
            continue;
        };
        if date.year() != anchor.year() || date.month() != anchor.month() {
            tracing::debug!(
                %date,
                %anchor,
                "Point outside the anchor month ignored for trend alignment"
            );
            continue;
        }
        days.insert(date.day(), (date, point.y));
    }

    (Some(anchor), days)
}

/// Align two date series by day-of-month offset
///
/// Offsets past the shorter month's length are dropped. A side with no
/// point at an offset is `None`; nothing is zero-padded.
pub fn align_by_day(current: &Series, previous: &Series) -> Vec<TrendPoint> {
    let (current_anchor, current_days) = by_day(current);
    let (previous_anchor, previous_days) = by_day(previous);

    let limit = match (current_anchor, previous_anchor) {
        (Some(c), Some(p)) => days_in_month(c).min(days_in_month(p)),
        (Some(only), None) | (None, Some(only)) => days_in_month(only),
        (None, None) => return Vec::new(),
    };

    let offsets: BTreeSet<u32> = current_days
        .keys()
        .chain(previous_days.keys())
        .copied()
        .filter(|&day| day <= limit)
        .collect();

    offsets
        .into_iter()
        .map(|offset| {
            let current = current_days.get(&offset);
            let previous = previous_days.get(&offset);
            TrendPoint {
                offset,
                current: current.map(|(_, v)| *v),
                previous: previous.map(|(_, v)| *v),
                current_date: current.map(|(d, _)| *d),
                previous_date: previous.map(|(d, _)| *d),
            }
        })
        .collect()
}
