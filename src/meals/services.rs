//! Diet metrics over a user's meals.

use serde::{Serialize, Serializer};
use time::{OffsetDateTime, UtcOffset};

use crate::meals::repo_types::Meal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub total_meals: usize,
    pub total_in_diet: usize,
    pub total_off_diet: usize,
    /// Most in-diet meals logged on a single calendar day.
    pub max_days_meals_in_diet: usize,
}

/// Result of `GET /meals/metrics`. Serializes as the bare number `0` when
/// the user has no in-diet meal, and as a [`MetricsSummary`] otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DietMetrics {
    NoMealsInDiet,
    Summary(MetricsSummary),
}

impl Serialize for DietMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NoMealsInDiet => serializer.serialize_u64(0),
            Self::Summary(summary) => summary.serialize(serializer),
        }
    }
}

/// Calendar days are taken in `offset`.
pub fn compute_metrics(meals: &[Meal], offset: UtcOffset) -> DietMetrics {
    let mut in_diet: Vec<OffsetDateTime> = meals
        .iter()
        .filter(|m| m.is_in_diet)
        .map(|m| m.datetime)
        .collect();

    if in_diet.is_empty() {
        return DietMetrics::NoMealsInDiet;
    }

    in_diet.sort();

    let total_in_diet = in_diet.len();
    DietMetrics::Summary(MetricsSummary {
        total_meals: meals.len(),
        total_in_diet,
        total_off_diet: meals.len() - total_in_diet,
        max_days_meals_in_diet: largest_day_run(&in_diet, offset),
    })
}

/// Size of the longest run of consecutive timestamps sharing a calendar date.
fn largest_day_run(sorted: &[OffsetDateTime], offset: UtcOffset) -> usize {
    let mut best = 0;
    let mut run = 0;
    let mut current_day = None;

    for datetime in sorted {
        // Near the ends of the supported range the shift can overflow;
        // the stored UTC date is used then.
        let day = datetime
            .checked_to_offset(offset)
            .unwrap_or(*datetime)
            .date();
        if current_day == Some(day) {
            run += 1;
        } else {
            current_day = Some(day);
            run = 1;
        }
        best = best.max(run);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};
    use uuid::Uuid;

    fn meal(at: OffsetDateTime, is_in_diet: bool) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            name: "meal".into(),
            description: String::new(),
            datetime: at,
            is_in_diet,
            user_id: Uuid::nil(),
            created_at: at,
            updated_at: at,
        }
    }

    fn summary(metrics: DietMetrics) -> MetricsSummary {
        match metrics {
            DietMetrics::Summary(s) => s,
            DietMetrics::NoMealsInDiet => panic!("expected a summary"),
        }
    }

    #[test]
    fn no_in_diet_meals_is_zero() {
        assert_eq!(compute_metrics(&[], UtcOffset::UTC), DietMetrics::NoMealsInDiet);

        let meals = vec![
            meal(datetime!(2023-04-25 12:00 UTC), false),
            meal(datetime!(2023-04-26 12:00 UTC), false),
        ];
        let metrics = compute_metrics(&meals, UtcOffset::UTC);
        assert_eq!(metrics, DietMetrics::NoMealsInDiet);
        assert_eq!(serde_json::to_string(&metrics).unwrap(), "0");
    }

    #[test]
    fn single_in_diet_meal() {
        let meals = vec![meal(datetime!(2023-04-25 08:00 UTC), true)];
        let s = summary(compute_metrics(&meals, UtcOffset::UTC));
        assert_eq!(s.max_days_meals_in_diet, 1);
        assert_eq!(s.total_meals, 1);
        assert_eq!(s.total_in_diet, 1);
        assert_eq!(s.total_off_diet, 0);
    }

    #[test]
    fn busiest_day_wins_regardless_of_input_order() {
        let meals = vec![
            meal(datetime!(2023-04-26 09:00 UTC), true),
            meal(datetime!(2023-04-25 19:00 UTC), true),
            meal(datetime!(2023-04-25 08:00 UTC), true),
            meal(datetime!(2023-04-25 12:30 UTC), true),
            meal(datetime!(2023-04-25 15:00 UTC), false),
        ];
        let s = summary(compute_metrics(&meals, UtcOffset::UTC));
        assert_eq!(s.max_days_meals_in_diet, 3);
        assert_eq!(s.total_in_diet, 4);
        assert_eq!(s.total_off_diet, 1);
        assert_eq!(s.total_meals, 5);
    }

    #[test]
    fn same_time_of_day_on_different_dates_are_separate_runs() {
        let meals = vec![
            meal(datetime!(2023-04-25 12:00 UTC), true),
            meal(datetime!(2023-04-26 12:00 UTC), true),
            meal(datetime!(2023-04-27 12:00 UTC), true),
        ];
        let s = summary(compute_metrics(&meals, UtcOffset::UTC));
        assert_eq!(s.max_days_meals_in_diet, 1);
    }

    #[test]
    fn calendar_day_follows_configured_offset() {
        // 01:00Z on the 26th is still the 25th at -03:00.
        let meals = vec![
            meal(datetime!(2023-04-25 20:00 UTC), true),
            meal(datetime!(2023-04-26 01:00 UTC), true),
        ];
        let utc = summary(compute_metrics(&meals, UtcOffset::UTC));
        assert_eq!(utc.max_days_meals_in_diet, 1);

        let brt = summary(compute_metrics(&meals, offset!(-3)));
        assert_eq!(brt.max_days_meals_in_diet, 2);
    }

    #[test]
    fn summary_uses_camel_case_keys() {
        let meals = vec![meal(datetime!(2023-04-25 08:00 UTC), true)];
        let json = serde_json::to_value(compute_metrics(&meals, UtcOffset::UTC)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "totalMeals": 1,
                "totalInDiet": 1,
                "totalOffDiet": 0,
                "maxDaysMealsInDiet": 1
            })
        );
    }

    #[test]
    fn offset_shift_past_supported_range_uses_utc_date() {
        let meals = vec![
            meal(datetime!(9999-12-31 22:00 UTC), true),
            meal(datetime!(9999-12-31 23:30 UTC), true),
            meal(datetime!(2023-04-25 12:00 UTC), true),
        ];

        let ahead = summary(compute_metrics(&meals, offset!(+1)));
        assert_eq!(ahead.max_days_meals_in_diet, 2);

        let behind = summary(compute_metrics(&meals, offset!(-23:59)));
        assert_eq!(behind.total_in_diet, 3);
        assert_eq!(behind.max_days_meals_in_diet, 2);
    }
}
