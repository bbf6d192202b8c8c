//! Transaction query pipeline.
//!
//! [`query`] turns a full collection of transactions into one page of
//! results in four steps:
//!
//! 1. filter: keep a record iff it satisfies every present constraint;
//! 2. sort: stable sort of the whole filtered set (optional);
//! 3. paginate: slice `[index * size, index * size + size)`, clamped;
//! 4. enumerate categories of the full, unfiltered collection.
//!
//! The pipeline only borrows the collection and has no side effects: the
//! same inputs always give the same output.

use std::{cmp::Ordering, fmt, num::NonZeroUsize, ops::Range, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, MoneyCents, PaymentMethod, ResultEngine, Transaction, TransactionStatus,
    util::{compare_text, contains_ignore_case},
};

/// Filter value meaning "no constraint" for enum-like fields.
pub const ALL: &str = "all";

/// Returns the value only when it actually constrains something.
fn active_choice(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ALL)
}

/// Parse an optional raw filter value, mapping `"all"` and empty strings to
/// `None`.
///
/// ```rust
/// use engine::{TransactionStatus, query::parse_choice};
///
/// assert_eq!(parse_choice::<TransactionStatus>(Some("all")).unwrap(), None);
/// assert_eq!(
///     parse_choice::<TransactionStatus>(Some("pending")).unwrap(),
///     Some(TransactionStatus::Pending)
/// );
/// assert!(parse_choice::<TransactionStatus>(Some("lost")).is_err());
/// ```
pub fn parse_choice<T>(raw: Option<&str>) -> ResultEngine<Option<T>>
where
    T: FromStr<Err = EngineError>,
{
    active_choice(raw.map(str::trim)).map(T::from_str).transpose()
}

/// Parse an optional `YYYY-MM-DD` bound. Empty means no bound.
pub fn parse_date(raw: Option<&str>) -> ResultEngine<Option<NaiveDate>> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .map_err(|_| EngineError::InvalidDate(v.to_string()))
        })
        .transpose()
}

/// Parse an optional `true`/`false` flag, mapping `"all"` and empty strings
/// to `None`.
pub fn parse_flag(raw: Option<&str>) -> ResultEngine<Option<bool>> {
    active_choice(raw.map(str::trim))
        .map(|v| match v {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(EngineError::InvalidField(format!("is_recurring: {other}"))),
        })
        .transpose()
}

/// Sparse set of constraints. An absent field does not constrain.
///
/// Date and amount bounds are inclusive. `is_recurring: Some(false)` is a
/// real constraint, not the same as `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Exact category; `"all"` means no constraint.
    pub category: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<TransactionStatus>,
    /// Case-insensitive substring of the description.
    pub search_term: Option<String>,
    pub is_recurring: Option<bool>,
    pub min_amount: Option<MoneyCents>,
    pub max_amount: Option<MoneyCents>,
}

impl TransactionFilter {
    /// Returns `true` if `tx` satisfies every present constraint.
    pub fn matches(&self, tx: &Transaction) -> bool {
        if self.start_date.is_some_and(|start| tx.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| tx.date > end) {
            return false;
        }
        if let Some(category) = active_choice(self.category.as_deref())
            && tx.category != category
        {
            return false;
        }
        if self.payment_method.is_some_and(|m| tx.payment_method != m) {
            return false;
        }
        if self.status.is_some_and(|s| tx.status != s) {
            return false;
        }
        if let Some(term) = self.search_term.as_deref().filter(|t| !t.is_empty())
            && !contains_ignore_case(&tx.description, term)
        {
            return false;
        }
        if self.is_recurring.is_some_and(|r| tx.is_recurring != r) {
            return false;
        }
        if self.min_amount.is_some_and(|min| tx.amount < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| tx.amount > max) {
            return false;
        }
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Description,
    Amount,
    Category,
    Date,
    Status,
    PaymentMethod,
    IsRecurring,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Date => "date",
            Self::Status => "status",
            Self::PaymentMethod => "payment_method",
            Self::IsRecurring => "is_recurring",
        }
    }

    /// Ascending comparison of two records on this field.
    fn compare(self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            Self::Description => compare_text(&a.description, &b.description),
            Self::Amount => a.amount.cmp(&b.amount),
            Self::Category => compare_text(&a.category, &b.category),
            Self::Date => a.date.cmp(&b.date),
            Self::Status => compare_text(a.status.as_str(), b.status.as_str()),
            Self::PaymentMethod => {
                compare_text(a.payment_method.as_str(), b.payment_method.as_str())
            }
            Self::IsRecurring => a.is_recurring.cmp(&b.is_recurring),
        }
    }
}

impl FromStr for SortField {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "description" => Ok(Self::Description),
            "amount" => Ok(Self::Amount),
            "category" => Ok(Self::Category),
            "date" => Ok(Self::Date),
            "status" => Ok(Self::Status),
            "payment_method" | "paymentMethod" => Ok(Self::PaymentMethod),
            "is_recurring" | "isRecurring" => Ok(Self::IsRecurring),
            other => Err(EngineError::InvalidField(format!(
                "cannot sort by: {other}"
            ))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(EngineError::InvalidField(format!(
                "invalid sort direction: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let ordering = self.field.compare(a, b);
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Zero-based page index plus a page size that is never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    index: usize,
    size: NonZeroUsize,
}

impl PageRequest {
    pub fn new(index: usize, size: usize) -> ResultEngine<Self> {
        let size = NonZeroUsize::new(size)
            .ok_or_else(|| EngineError::InvalidPage("page size must be > 0".to_string()))?;
        Ok(Self { index, size })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> usize {
        self.size.get()
    }

    /// Slice bounds of this page inside a set of `len` items.
    ///
    /// Pages past the end give an empty range.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = self.index.saturating_mul(self.size()).min(len);
        let end = start.saturating_add(self.size()).min(len);
        start..end
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            index: 0,
            size: NonZeroUsize::MIN.saturating_add(9),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult<T> {
    /// The requested page.
    pub items: Vec<T>,
    /// Matches before pagination.
    pub total: usize,
    /// Distinct categories of the full collection, sorted.
    pub categories: Vec<String>,
}

impl<T> QueryResult<T> {
    /// Number of pages of `size` items needed to show every match.
    pub fn page_count(&self, size: usize) -> usize {
        if size == 0 {
            return 0;
        }
        self.total.div_ceil(size)
    }
}

/// Sorted, deduplicated, non-empty category names.
pub fn distinct_categories<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = names
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect();
    out.sort_by(|a, b| compare_text(a, b));
    out.dedup();
    out
}

/// Run the filter → sort → paginate pipeline over `collection`.
///
/// Without a sort the input order is kept. The sort is stable, so records
/// with equal keys keep their input order.
pub fn query(
    collection: &[Transaction],
    filter: &TransactionFilter,
    sort: Option<&SortSpec>,
    page: &PageRequest,
) -> QueryResult<Transaction> {
    let mut matched: Vec<&Transaction> = collection.iter().filter(|tx| filter.matches(tx)).collect();

    if let Some(sort) = sort {
        matched.sort_by(|a, b| sort.compare(a, b));
    }

    let total = matched.len();
    let items = matched[page.range(total)]
        .iter()
        .map(|tx| (*tx).clone())
        .collect();

    QueryResult {
        items,
        total,
        categories: distinct_categories(collection.iter().map(|tx| tx.category.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::TransactionKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(description: &str, cents: i64, category: &str, day: u32) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            kind: TransactionKind::Expense,
            description: description.to_string(),
            amount: MoneyCents::new(cents),
            category: category.to_string(),
            date: date(2024, 1, day),
            status: TransactionStatus::Completed,
            payment_method: PaymentMethod::Cash,
            is_recurring: false,
            tags: Vec::new(),
            notes: None,
        }
    }

    fn sample() -> Vec<Transaction> {
        let mut rent = tx("Rent", 120_000, "Housing", 1);
        rent.is_recurring = true;
        rent.payment_method = PaymentMethod::BankTransfer;
        let mut coffee = tx("Coffee shop", 450, "Food", 2);
        coffee.payment_method = PaymentMethod::Credit;
        let mut groceries = tx("Groceries", 8_000, "Food", 3);
        groceries.status = TransactionStatus::Pending;
        let mut netflix = tx("Netflix", 1_299, "Entertainment", 4);
        netflix.is_recurring = true;
        netflix.payment_method = PaymentMethod::Online;
        let mut taxi = tx("Taxi to airport", 4_500, "Transport", 5);
        taxi.status = TransactionStatus::Cancelled;
        vec![rent, coffee, groceries, netflix, taxi]
    }

    fn all_pages() -> PageRequest {
        PageRequest::new(0, 100).unwrap()
    }

    fn descriptions(items: &[Transaction]) -> Vec<&str> {
        items.iter().map(|tx| tx.description.as_str()).collect()
    }

    #[test]
    fn start_date_and_amount_desc_example() {
        let collection = vec![tx("a", 1_000, "X", 1), tx("b", 2_000, "X", 2), tx("c", 3_000, "X", 3)];
        let filter = TransactionFilter {
            start_date: Some(date(2024, 1, 2)),
            ..Default::default()
        };
        let sort = SortSpec::new(SortField::Amount, SortDirection::Desc);
        let result = query(&collection, &filter, Some(&sort), &PageRequest::new(0, 10).unwrap());

        assert_eq!(result.total, 2);
        assert_eq!(descriptions(&result.items), ["c", "b"]);
        assert_eq!(result.items[0].date, date(2024, 1, 3));
        assert_eq!(result.items[1].amount, MoneyCents::new(2_000));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let collection = vec![tx("Coffee shop", 450, "Food", 1), tx("Groceries", 8_000, "Food", 2)];
        let filter = TransactionFilter {
            search_term: Some("coffee".to_string()),
            ..Default::default()
        };
        let result = query(&collection, &filter, None, &all_pages());
        assert_eq!(descriptions(&result.items), ["Coffee shop"]);
    }

    #[test]
    fn every_item_satisfies_every_constraint() {
        let collection = sample();
        let filter = TransactionFilter {
            category: Some("Food".to_string()),
            status: Some(TransactionStatus::Completed),
            ..Default::default()
        };
        let result = query(&collection, &filter, None, &all_pages());
        assert_eq!(descriptions(&result.items), ["Coffee shop"]);
        assert!(result.items.iter().all(|tx| collection.contains(tx) && filter.matches(tx)));
    }

    #[test]
    fn all_sentinel_means_no_constraint() {
        let collection = sample();
        let filter = TransactionFilter {
            category: Some(ALL.to_string()),
            ..Default::default()
        };
        assert_eq!(query(&collection, &filter, None, &all_pages()).total, collection.len());
    }

    #[test]
    fn recurring_false_is_a_real_constraint() {
        let collection = sample();
        let only_once = TransactionFilter {
            is_recurring: Some(false),
            ..Default::default()
        };
        let result = query(&collection, &only_once, None, &all_pages());
        assert_eq!(descriptions(&result.items), ["Coffee shop", "Groceries", "Taxi to airport"]);

        let unconstrained = query(&collection, &TransactionFilter::default(), None, &all_pages());
        assert_eq!(unconstrained.total, collection.len());
    }

    #[test]
    fn date_and_amount_bounds_are_inclusive() {
        let collection = sample();
        let filter = TransactionFilter {
            start_date: Some(date(2024, 1, 2)),
            end_date: Some(date(2024, 1, 4)),
            min_amount: Some(MoneyCents::new(450)),
            max_amount: Some(MoneyCents::new(1_299)),
            ..Default::default()
        };
        let result = query(&collection, &filter, None, &all_pages());
        assert_eq!(descriptions(&result.items), ["Coffee shop", "Netflix"]);
    }

    #[test]
    fn payment_method_filter_is_exact() {
        let collection = sample();
        let filter = TransactionFilter {
            payment_method: Some(PaymentMethod::Online),
            ..Default::default()
        };
        let result = query(&collection, &filter, None, &all_pages());
        assert_eq!(descriptions(&result.items), ["Netflix"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let collection = sample();
        let filter = TransactionFilter {
            search_term: Some("o".to_string()),
            max_amount: Some(MoneyCents::new(10_000)),
            ..Default::default()
        };
        let once = query(&collection, &filter, None, &all_pages());
        let twice = query(&once.items, &filter, None, &all_pages());
        assert_eq!(once.items, twice.items);
    }

    #[test]
    fn total_does_not_depend_on_page_size() {
        let collection = sample();
        let filter = TransactionFilter::default();
        for size in 1..=7 {
            let result = query(&collection, &filter, None, &PageRequest::new(0, size).unwrap());
            assert_eq!(result.total, 5);
            assert_eq!(result.items.len(), size.min(5));
        }
    }

    #[test]
    fn last_partial_page_and_past_the_end() {
        let collection = sample();
        let filter = TransactionFilter::default();
        let sort = SortSpec::new(SortField::Date, SortDirection::Asc);

        let last = query(&collection, &filter, Some(&sort), &PageRequest::new(2, 2).unwrap());
        assert_eq!(descriptions(&last.items), ["Taxi to airport"]);
        assert_eq!(last.page_count(2), 3);

        let beyond = query(&collection, &filter, Some(&sort), &PageRequest::new(3, 2).unwrap());
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 5);

        let exact = query(&collection, &filter, None, &PageRequest::new(1, 5).unwrap());
        assert!(exact.items.is_empty());

        let huge = query(&collection, &filter, None, &PageRequest::new(usize::MAX, 5).unwrap());
        assert!(huge.items.is_empty());
    }

    #[test]
    fn amount_desc_reverses_amount_asc() {
        let collection = sample();
        let filter = TransactionFilter::default();
        let asc = query(
            &collection,
            &filter,
            Some(&SortSpec::new(SortField::Amount, SortDirection::Asc)),
            &all_pages(),
        );
        let mut desc = query(
            &collection,
            &filter,
            Some(&SortSpec::new(SortField::Amount, SortDirection::Desc)),
            &all_pages(),
        );
        desc.items.reverse();
        assert_eq!(asc.items, desc.items);
        assert_eq!(
            descriptions(&asc.items),
            ["Coffee shop", "Netflix", "Taxi to airport", "Groceries", "Rent"]
        );
    }

    #[test]
    fn sort_applies_to_whole_set_before_paging() {
        let collection = sample();
        let sort = SortSpec::new(SortField::Amount, SortDirection::Desc);
        let first = query(
            &collection,
            &TransactionFilter::default(),
            Some(&sort),
            &PageRequest::new(0, 1).unwrap(),
        );
        assert_eq!(descriptions(&first.items), ["Rent"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let collection = sample();
        let sort = SortSpec::new(SortField::Category, SortDirection::Asc);
        let result = query(&collection, &TransactionFilter::default(), Some(&sort), &all_pages());
        assert_eq!(
            descriptions(&result.items),
            ["Netflix", "Coffee shop", "Groceries", "Rent", "Taxi to airport"]
        );
    }

    #[test]
    fn string_sort_is_locale_aware() {
        let collection = vec![
            tx("zucchini", 1, "X", 1),
            tx("Éclair", 1, "X", 2),
            tx("apple", 1, "X", 3),
            tx("Banana", 1, "X", 4),
        ];
        let sort = SortSpec::new(SortField::Description, SortDirection::Asc);
        let result = query(&collection, &TransactionFilter::default(), Some(&sort), &all_pages());
        assert_eq!(descriptions(&result.items), ["apple", "Banana", "Éclair", "zucchini"]);
    }

    #[test]
    fn without_sort_input_order_is_kept() {
        let collection = sample();
        let result = query(&collection, &TransactionFilter::default(), None, &all_pages());
        assert_eq!(result.items, collection);
    }

    #[test]
    fn categories_come_from_full_collection() {
        let collection = sample();
        let filter = TransactionFilter {
            category: Some("Food".to_string()),
            ..Default::default()
        };
        let result = query(&collection, &filter, None, &all_pages());
        assert_eq!(
            result.categories,
            ["Entertainment", "Food", "Housing", "Transport"]
        );
    }

    #[test]
    fn query_is_repeatable_and_leaves_input_alone() {
        let collection = sample();
        let before = collection.clone();
        let filter = TransactionFilter {
            search_term: Some("e".to_string()),
            ..Default::default()
        };
        let sort = SortSpec::new(SortField::Description, SortDirection::Desc);
        let page = PageRequest::new(0, 2).unwrap();
        let first = query(&collection, &filter, Some(&sort), &page);
        let second = query(&collection, &filter, Some(&sort), &page);
        assert_eq!(first, second);
        assert_eq!(collection, before);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(matches!(PageRequest::new(0, 0), Err(EngineError::InvalidPage(_))));
    }

    #[test]
    fn parse_choice_maps_sentinel_and_blank_to_none() {
        assert_eq!(parse_choice::<PaymentMethod>(None).unwrap(), None);
        assert_eq!(parse_choice::<PaymentMethod>(Some("")).unwrap(), None);
        assert_eq!(parse_choice::<PaymentMethod>(Some("all")).unwrap(), None);
        assert_eq!(
            parse_choice::<PaymentMethod>(Some(" debit ")).unwrap(),
            Some(PaymentMethod::Debit)
        );
    }

    #[test]
    fn blank_date_and_flag_mean_no_bound() {
        assert_eq!(parse_date(Some("")).unwrap(), None);
        assert_eq!(parse_date(Some(" 2024-01-05 ")).unwrap(), Some(date(2024, 1, 5)));
        assert!(matches!(parse_date(Some("05/01/2024")), Err(EngineError::InvalidDate(_))));

        assert_eq!(parse_flag(None).unwrap(), None);
        assert_eq!(parse_flag(Some("")).unwrap(), None);
        assert_eq!(parse_flag(Some("all")).unwrap(), None);
        assert_eq!(parse_flag(Some("false")).unwrap(), Some(false));
        assert!(matches!(parse_flag(Some("yes")), Err(EngineError::InvalidField(_))));
    }

    #[test]
    fn sort_field_accepts_camel_case() {
        assert_eq!("paymentMethod".parse::<SortField>().unwrap(), SortField::PaymentMethod);
        assert_eq!("is_recurring".parse::<SortField>().unwrap(), SortField::IsRecurring);
        assert!("tags".parse::<SortField>().is_err());
    }
}
