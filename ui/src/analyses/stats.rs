//! Aggregate statistics behind the dashboard.

use time::{Date, OffsetDateTime};

use crate::core::format::format_wire_date;
use crate::core::grouping::{fold_by, tally};
use crate::core::model::{AnalysisRecord, NoiseCategory};

/// Quarter-of-day buckets used by the "time of day" panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPeriod {
    EarlyMorning,
    Morning,
    Afternoon,
    Evening,
}

impl DayPeriod {
    pub const ALL: [DayPeriod; 4] = [
        DayPeriod::EarlyMorning,
        DayPeriod::Morning,
        DayPeriod::Afternoon,
        DayPeriod::Evening,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DayPeriod::EarlyMorning => "Early morning",
            DayPeriod::Morning => "Morning",
            DayPeriod::Afternoon => "Afternoon",
            DayPeriod::Evening => "Evening",
        }
    }

    /// Hour range shown under the period name.
    pub fn hours_label(self) -> &'static str {
        match self {
            DayPeriod::EarlyMorning => "00:00 to 05:59",
            DayPeriod::Morning => "06:00 to 11:59",
            DayPeriod::Afternoon => "12:00 to 17:59",
            DayPeriod::Evening => "18:00 to 23:59",
        }
    }

    pub fn from_hour(hour: u8) -> Self {
        match hour / 6 {
            0 => DayPeriod::EarlyMorning,
            1 => DayPeriod::Morning,
            2 => DayPeriod::Afternoon,
            _ => DayPeriod::Evening,
        }
    }

    /// Position in [`DayPeriod::ALL`], also the index into
    /// [`AggregateStats::period_counts`].
    pub fn index(self) -> usize {
        match self {
            DayPeriod::EarlyMorning => 0,
            DayPeriod::Morning => 1,
            DayPeriod::Afternoon => 2,
            DayPeriod::Evening => 3,
        }
    }
}

/// Period bucket for one record. Records without a parseable time land in
/// the evening bucket, so the four counts always sum to the total.
pub fn period_of(record: &AnalysisRecord) -> DayPeriod {
    match record.identified_clock() {
        Some(clock) => DayPeriod::from_hour(clock.hour()),
        None => DayPeriod::Evening,
    }
}

/// Everything the dashboard derives from the record list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateStats {
    pub total: usize,
    /// Mean response time in seconds; `0.0` when there are no records.
    pub mean_response_s: f64,
    pub analyses_today: usize,
    pub distinct_categories: usize,
    /// Mean analyses per distinct day seen; `0.0` when there are no records.
    pub mean_per_day: f64,
    /// Count per category, in first-encounter order.
    pub category_counts: Vec<(NoiseCategory, u32)>,
    /// Count per formatted day label, in first-encounter order.
    pub daily_counts: Vec<(String, u32)>,
    /// Counts for the four day periods, indexed like [`DayPeriod::ALL`].
    pub period_counts: [u32; 4],
}

impl AggregateStats {
    /// Derives the dashboard statistics with "today" from the wall clock.
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        Self::from_records_at(records, OffsetDateTime::now_utc().date())
    }

    /// Same derivation with an explicit notion of today.
    pub fn from_records_at(records: &[AnalysisRecord], today: Date) -> Self {
        let total = records.len();
        let mean_response_s = if total == 0 {
            0.0
        } else {
            records.iter().map(|r| r.response_time_s).sum::<f64>() / total as f64
        };

        let category_counts = tally(records.iter(), |record| record.category.clone());
        let daily_counts = tally(records.iter(), |record| {
            format_wire_date(&record.identified_date)
        });

        let mut period_counts = [0u32; 4];
        for record in records {
            period_counts[period_of(record).index()] += 1;
        }

        let analyses_today = records
            .iter()
            .filter(|record| record.identified_on() == Some(today))
            .count();

        let distinct_days = daily_counts.len();
        let mean_per_day = if distinct_days == 0 {
            0.0
        } else {
            total as f64 / distinct_days as f64
        };

        Self {
            total,
            mean_response_s,
            analyses_today,
            distinct_categories: category_counts.len(),
            mean_per_day,
            category_counts,
            daily_counts,
            period_counts,
        }
    }
}

/// Mean response time per category, in first-encounter order.
pub fn mean_response_by_category(records: &[AnalysisRecord]) -> Vec<(NoiseCategory, f64)> {
    fold_by(
        records.iter(),
        |record| record.category.clone(),
        |acc: &mut (f64, u32), record| {
            acc.0 += record.response_time_s;
            acc.1 += 1;
        },
    )
    .into_iter()
    .map(|(category, (sum, count))| (category, sum / f64::from(count)))
    .collect()
}

/// The `limit` fastest analyses by response time. The sort is stable, so
/// ties keep their incoming order; fewer records than `limit` yields them
/// all.
pub fn fastest_responses(records: &[AnalysisRecord], limit: usize) -> Vec<AnalysisRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| a.response_time_s.total_cmp(&b.response_time_s));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, category: &str, date: &str, time: &str, response: f64) -> AnalysisRecord {
        AnalysisRecord {
            id: name.to_string(),
            name: name.to_string(),
            category: NoiseCategory::from(category.to_string()),
            identified_date: date.to_string(),
            identified_time: time.to_string(),
            response_time_s: response,
            audio: None,
            spectrogram: None,
            waveform: None,
        }
    }

    fn may(day: &str) -> Date {
        crate::core::model::parse_wire_date(&format!("2024-05-{day}")).unwrap()
    }

    #[test]
    fn mean_and_counts_over_two_records() {
        let records = vec![
            record("latido", "dog", "2024-05-01", "09:00:00", 1.0),
            record("transito", "traffic", "2024-05-01", "10:00:00", 3.0),
        ];
        let stats = AggregateStats::from_records_at(&records, may("02"));

        assert_eq!(stats.total, 2);
        assert_eq!(stats.mean_response_s, 2.0);
        assert_eq!(stats.distinct_categories, 2);
        assert_eq!(
            stats.category_counts,
            vec![(NoiseCategory::Dog, 1), (NoiseCategory::Traffic, 1)]
        );
    }

    #[test]
    fn empty_input_yields_zeroes_not_nan() {
        let stats = AggregateStats::from_records_at(&[], may("01"));
        assert_eq!(stats.total, 0);
        assert_eq!(stats.mean_response_s, 0.0);
        assert_eq!(stats.mean_per_day, 0.0);
        assert_eq!(stats.analyses_today, 0);
        assert!(stats.category_counts.is_empty());
        assert_eq!(stats.period_counts, [0, 0, 0, 0]);
    }

    #[test]
    fn period_counts_partition_the_records() {
        let records = vec![
            record("madrugada", "dog", "2024-05-01", "03:10:00", 1.0),
            record("manha", "dog", "2024-05-01", "06:00:00", 1.0),
            record("tarde", "dog", "2024-05-01", "15:45:00", 1.0),
            record("noite", "dog", "2024-05-01", "23:59:59", 1.0),
            record("sem_horario", "dog", "2024-05-01", "???", 1.0),
        ];
        let stats = AggregateStats::from_records_at(&records, may("01"));
        assert_eq!(stats.period_counts, [1, 1, 1, 2]);
        assert_eq!(
            stats.period_counts.iter().sum::<u32>() as usize,
            stats.total
        );
    }

    #[test]
    fn hour_buckets_split_on_the_sixes() {
        assert_eq!(DayPeriod::from_hour(0), DayPeriod::EarlyMorning);
        assert_eq!(DayPeriod::from_hour(5), DayPeriod::EarlyMorning);
        assert_eq!(DayPeriod::from_hour(6), DayPeriod::Morning);
        assert_eq!(DayPeriod::from_hour(11), DayPeriod::Morning);
        assert_eq!(DayPeriod::from_hour(12), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::from_hour(17), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::from_hour(18), DayPeriod::Evening);
        assert_eq!(DayPeriod::from_hour(23), DayPeriod::Evening);
    }

    #[test]
    fn todays_records_are_counted_against_the_given_day() {
        let records = vec![
            record("ontem", "dog", "2024-05-01", "09:00:00", 1.0),
            record("hoje_a", "dog", "2024-05-02", "09:00:00", 1.0),
            record("hoje_b", "dog", "2024-05-02", "10:00:00", 1.0),
        ];
        let stats = AggregateStats::from_records_at(&records, may("02"));
        assert_eq!(stats.analyses_today, 2);
    }

    #[test]
    fn mean_per_day_divides_by_distinct_days() {
        let records = vec![
            record("a", "dog", "2024-05-01", "09:00:00", 1.0),
            record("b", "dog", "2024-05-01", "11:00:00", 1.0),
            record("c", "dog", "2024-05-02", "09:00:00", 1.0),
        ];
        let stats = AggregateStats::from_records_at(&records, may("02"));
        assert_eq!(stats.daily_counts.len(), 2);
        assert_eq!(stats.mean_per_day, 1.5);
    }

    #[test]
    fn category_means_keep_encounter_order() {
        let records = vec![
            record("a", "dog", "2024-05-01", "09:00:00", 1.0),
            record("b", "traffic", "2024-05-01", "10:00:00", 4.0),
            record("c", "dog", "2024-05-01", "11:00:00", 3.0),
        ];
        let means = mean_response_by_category(&records);
        assert_eq!(
            means,
            vec![(NoiseCategory::Dog, 2.0), (NoiseCategory::Traffic, 4.0)]
        );
    }

    #[test]
    fn ranking_keeps_the_five_fastest_in_order() {
        let records: Vec<AnalysisRecord> = [3.0, 1.0, 2.5, 0.5, 4.0, 2.0, 0.9]
            .iter()
            .enumerate()
            .map(|(i, t)| record(&format!("r{i}"), "dog", "2024-05-01", "09:00:00", *t))
            .collect();
        let ranked = fastest_responses(&records, 5);
        let times: Vec<f64> = ranked.iter().map(|r| r.response_time_s).collect();
        assert_eq!(times, vec![0.5, 0.9, 1.0, 2.0, 2.5]);
    }

    #[test]
    fn ranking_short_input_returns_everything() {
        let records = vec![
            record("a", "dog", "2024-05-01", "09:00:00", 2.0),
            record("b", "dog", "2024-05-01", "09:00:00", 1.0),
        ];
        let ranked = fastest_responses(&records, 5);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "b");
    }

    #[test]
    fn ranking_is_idempotent_and_stable_on_ties() {
        let records = vec![
            record("primeiro", "dog", "2024-05-01", "09:00:00", 1.0),
            record("segundo", "dog", "2024-05-01", "09:30:00", 1.0),
            record("terceiro", "dog", "2024-05-01", "10:00:00", 0.5),
        ];
        let once = fastest_responses(&records, 5);
        let twice = fastest_responses(&once, 5);
        assert_eq!(once, twice);
        assert_eq!(once[1].name, "primeiro");
        assert_eq!(once[2].name, "segundo");
    }
}
