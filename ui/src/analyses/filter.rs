//! Filtering, ordering and pagination for the analyses list.

use time::Date;

use crate::core::model::{AnalysisRecord, NoiseCategory};

/// Cards shown per page of the analyses list.
pub const PAGE_SIZE: usize = 6;

/// Category restriction with an explicit "everything" state instead of a
/// magic string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(NoiseCategory),
}

impl CategoryFilter {
    pub fn admits(&self, category: &NoiseCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }

    /// Maps the `<select>` value back to a filter; `"all"` is the sentinel
    /// for the unrestricted option.
    pub fn from_select_value(value: &str) -> Self {
        if value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(NoiseCategory::from(value.to_string()))
        }
    }

    /// The `<select>` value for the current state.
    pub fn select_value(&self) -> String {
        match self {
            CategoryFilter::All => "all".to_string(),
            CategoryFilter::Only(category) => category.wire_label().to_string(),
        }
    }
}

/// Everything the list view lets the user narrow by. Criteria combine
/// conjunctively; each one alone leaves untouched records through.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub query: String,
    pub category: CategoryFilter,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl FilterCriteria {
    /// Whether `record` survives every active criterion.
    pub fn matches(&self, record: &AnalysisRecord) -> bool {
        self.matches_query(record)
            && self.category.admits(&record.category)
            && self.matches_dates(record)
    }

    /// Case-insensitive substring match against the name or the category.
    fn matches_query(&self, record: &AnalysisRecord) -> bool {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        record.name.to_lowercase().contains(&query)
            || record.category.wire_label().to_lowercase().contains(&query)
    }

    /// Both bounds are inclusive and independent. Records whose date does
    /// not parse fail any active bound.
    fn matches_dates(&self, record: &AnalysisRecord) -> bool {
        if self.start_date.is_none() && self.end_date.is_none() {
            return true;
        }
        let Some(date) = record.identified_on() else {
            return false;
        };
        if let Some(start) = self.start_date {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }
        true
    }
}

/// Applies `criteria` to `records`, preserving their order.
pub fn apply(records: &[AnalysisRecord], criteria: &FilterCriteria) -> Vec<AnalysisRecord> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

/// Sorts records by classification timestamp, newest first. Records without
/// a parseable date go last; ties keep their incoming order.
pub fn sort_newest_first(records: &mut [AnalysisRecord]) {
    records.sort_by(|a, b| match (a.identified_at(), b.identified_at()) {
        (Some(lhs), Some(rhs)) => rhs.cmp(&lhs),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Number of pages needed for `total` records.
pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// The slice of `records` shown on 1-based `page`. Out-of-range pages
/// yield an empty slice.
pub fn page_slice(records: &[AnalysisRecord], page: usize) -> &[AnalysisRecord] {
    let start = page
        .saturating_sub(1)
        .saturating_mul(PAGE_SIZE)
        .min(records.len());
    let end = (start + PAGE_SIZE).min(records.len());
    &records[start..end]
}
