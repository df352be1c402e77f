//! Year-over-year revenue growth.

use prime_traits::{EventSeries, Observation};

/// Computes year-over-year growth between consecutive annual revenue observations.
///
/// Each observation except the oldest is paired with the one immediately
/// before it: `growth = (revenue - prior) / prior`, stamped with the newer
/// date. The oldest observation has no prior and is dropped. Growth is `None`
/// when either revenue is missing or the prior revenue is zero.
///
/// # Example
///
/// ```
/// use prime_align::yoy_growth;
/// use prime_traits::{Date, EventSeries};
///
/// let d = |y| Date::from_ymd_opt(y, 1, 31).unwrap();
/// let revenue = EventSeries::from_pairs([(d(2022), Some(100.0)), (d(2023), Some(125.0))]);
/// let growth = yoy_growth(&revenue);
///
/// assert_eq!(growth.len(), 1);
/// assert_eq!(growth.get(d(2023)), Some(&Some(0.25)));
/// ```
pub fn yoy_growth(revenue: &EventSeries<Option<f64>>) -> EventSeries<Option<f64>> {
    revenue
        .observations()
        .windows(2)
        .map(|pair| {
            let (prior, current) = (&pair[0], &pair[1]);
            Observation::new(current.date, growth(current.value, prior.value))
        })
        .collect()
}

fn growth(current: Option<f64>, prior: Option<f64>) -> Option<f64> {
    let (current, prior) = (current?, prior?);
    if prior == 0.0 {
        return None;
    }
    let g = (current - prior) / prior;
    g.is_finite().then_some(g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use prime_traits::Date;

    fn date(y: i32) -> Date {
        Date::from_ymd_opt(y, 1, 31).unwrap()
    }

    #[test]
    fn test_growth_pairs_consecutive_years() {
        // Provider order is most recent first; the series sorts it.
        let revenue = EventSeries::from_pairs([
            (date(2024), Some(60.9)),
            (date(2023), Some(27.0)),
            (date(2022), Some(26.9)),
        ]);
        let growth = yoy_growth(&revenue);

        assert_eq!(growth.len(), 2);
        assert!(growth.get(date(2022)).is_none());
        assert_relative_eq!(
            growth.get(date(2023)).unwrap().unwrap(),
            (27.0 - 26.9) / 26.9
        );
        assert_relative_eq!(
            growth.get(date(2024)).unwrap().unwrap(),
            (60.9 - 27.0) / 27.0
        );
    }

    #[test]
    fn test_missing_or_zero_prior_yields_none() {
        let revenue = EventSeries::from_pairs([
            (date(2020), Some(0.0)),
            (date(2021), Some(10.0)),
            (date(2022), None),
            (date(2023), Some(12.0)),
        ]);
        let growth = yoy_growth(&revenue);

        assert_eq!(growth.get(date(2021)), Some(&None));
        assert_eq!(growth.get(date(2022)), Some(&None));
        assert_eq!(growth.get(date(2023)), Some(&None));
    }

    #[test]
    fn test_single_observation_has_no_growth() {
        let revenue = EventSeries::from_pairs([(date(2023), Some(10.0))]);
        assert!(yoy_growth(&revenue).is_empty());
        assert!(yoy_growth(&EventSeries::default()).is_empty());
    }
}
