//! Pure series transforms: seeded salting and centred smoothing.
//!
//! Both return a new, re-validated series and leave the input untouched.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::TradesimError;
use super::price::{PriceRecord, PriceSeries};

/// Add independent uniform noise in `[-range, range]` to every price field.
///
/// Dates and volumes are kept. The same `seed` always yields the same series.
pub fn salt(series: &PriceSeries, range: f64, seed: u64) -> Result<PriceSeries, TradesimError> {
    if !range.is_finite() || range < 0.0 {
        return Err(TradesimError::ConfigInvalid {
            section: "salt".into(),
            key: "range".into(),
            reason: format!("must be a non-negative number, got {}", range),
        });
    }
    // The sampled span is 2 * range and must stay finite.
    if !(2.0 * range).is_finite() {
        return Err(TradesimError::ConfigInvalid {
            section: "salt".into(),
            key: "range".into(),
            reason: format!("{} is too large to sample from", range),
        });
    }
    if range == 0.0 {
        return Ok(series.clone());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut jitter = |v: f64| v + rng.gen_range(-range..=range);

    let records = series
        .records()
        .iter()
        .map(|r| PriceRecord {
            date: r.date,
            open: jitter(r.open),
            high: jitter(r.high),
            low: jitter(r.low),
            close: jitter(r.close),
            adj_close: jitter(r.adj_close),
            volume: r.volume,
        })
        .collect();

    PriceSeries::new(records)
}

/// Centred simple moving average of every price field over `window` records.
///
/// `window` must be odd. Windows are truncated at both ends of the series.
pub fn smooth(series: &PriceSeries, window: usize) -> Result<PriceSeries, TradesimError> {
    if window == 0 || window % 2 == 0 {
        return Err(TradesimError::ConfigInvalid {
            section: "smooth".into(),
            key: "window".into(),
            reason: format!("must be an odd number of records, got {}", window),
        });
    }

    let src = series.records();
    let half = window / 2;
    let last = src.len() - 1;

    let records = (0..src.len())
        .map(|i| {
            let span = &src[i.saturating_sub(half)..=(i + half).min(last)];
            let mean = |field: fn(&PriceRecord) -> f64| {
                span.iter().map(field).sum::<f64>() / span.len() as f64
            };
            PriceRecord {
                date: src[i].date,
                open: mean(|r| r.open),
                high: mean(|r| r.high),
                low: mean(|r| r.low),
                close: mean(|r| r.close),
                adj_close: mean(|r| r.adj_close),
                volume: src[i].volume,
            }
        })
        .collect();

    PriceSeries::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::TradeDate;
    use approx::assert_relative_eq;

    fn series_from(closes: &[f64]) -> PriceSeries {
        let records = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceRecord {
                date: TradeDate::Ordinal(i as u64),
                open: close,
                high: close + 2.0,
                low: close - 2.0,
                close,
                adj_close: close,
                volume: 10 * i as u64,
            })
            .collect();
        PriceSeries::new(records).unwrap()
    }

    #[test]
    fn salt_is_reproducible_for_a_seed() {
        let series = series_from(&[100.0, 101.0, 102.0, 103.0]);
        let a = salt(&series, 1.0, 42).unwrap();
        let b = salt(&series, 1.0, 42).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, series);
    }

    #[test]
    fn salt_differs_between_seeds() {
        let series = series_from(&[100.0, 101.0, 102.0, 103.0]);
        assert_ne!(salt(&series, 1.0, 1).unwrap(), salt(&series, 1.0, 2).unwrap());
    }

    #[test]
    fn salt_stays_within_range_and_keeps_dates() {
        let series = series_from(&[50.0, 60.0, 70.0, 80.0, 90.0]);
        let salted = salt(&series, 0.5, 7).unwrap();

        for (orig, new) in series.records().iter().zip(salted.records()) {
            assert_eq!(orig.date, new.date);
            assert_eq!(orig.volume, new.volume);
            assert!((orig.close - new.close).abs() <= 0.5);
            assert!((orig.open - new.open).abs() <= 0.5);
        }
    }

    #[test]
    fn salt_zero_range_is_identity() {
        let series = series_from(&[1.0, 2.0]);
        assert_eq!(salt(&series, 0.0, 9).unwrap(), series);
    }

    #[test]
    fn salt_rejects_negative_range() {
        let series = series_from(&[1.0, 2.0]);
        assert!(matches!(
            salt(&series, -1.0, 0),
            Err(TradesimError::ConfigInvalid { key, .. }) if key == "range"
        ));
    }

    #[test]
    fn salt_rejects_range_whose_span_overflows() {
        let series = series_from(&[10.0, 11.0, 12.0]);
        for range in [1e308, f64::MAX] {
            assert!(matches!(
                salt(&series, range, 1),
                Err(TradesimError::ConfigInvalid { section, key, .. })
                    if section == "salt" && key == "range"
            ));
        }
    }

    #[test]
    fn salt_accepts_large_finite_span() {
        let series = series_from(&[10.0, 11.0, 12.0]);
        // 2 * 1e300 is finite, so sampling works; closes may go non-positive.
        match salt(&series, 1e300, 1) {
            Ok(salted) => assert_eq!(salted.len(), 3),
            Err(e) => assert!(matches!(e, TradesimError::InvalidRecord { .. })),
        }
    }

    #[test]
    fn salt_that_drives_close_non_positive_is_rejected() {
        let closes: Vec<f64> = (1..=40).map(|i| i as f64 * 0.001).collect();
        let series = series_from(&closes);
        let err = salt(&series, 100.0, 3).unwrap_err();
        assert!(matches!(err, TradesimError::InvalidRecord { .. }));
    }

    #[test]
    fn smooth_window_three() {
        let series = series_from(&[3.0, 6.0, 9.0, 3.0]);
        let smoothed = smooth(&series, 3).unwrap();
        let closes = smoothed.closes();

        assert_relative_eq!(closes[0], 4.5);
        assert_relative_eq!(closes[1], 6.0);
        assert_relative_eq!(closes[2], 6.0);
        assert_relative_eq!(closes[3], 6.0);
        assert_eq!(smoothed.records()[2].volume, 20);
    }

    #[test]
    fn smooth_reads_unsmoothed_neighbours() {
        let series = series_from(&[1.0, 10.0, 1.0, 10.0]);
        let closes = smooth(&series, 3).unwrap().closes();
        assert_relative_eq!(closes[1], 4.0);
        assert_relative_eq!(closes[2], 7.0);
    }

    #[test]
    fn smooth_window_one_is_identity() {
        let series = series_from(&[5.0, 7.0, 6.0]);
        assert_eq!(smooth(&series, 1).unwrap(), series);
    }

    #[test]
    fn smooth_rejects_even_window() {
        let series = series_from(&[5.0, 7.0]);
        assert!(smooth(&series, 2).is_err());
        assert!(smooth(&series, 0).is_err());
    }
}
