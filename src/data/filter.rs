use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{CategoricalField, Dimension, Transaction, ALLOWED_HS_CODES, UNKNOWN_BUYER};

// ---------------------------------------------------------------------------
// Filter state: the only mutable entity of a session
// ---------------------------------------------------------------------------

/// Current selection per dimension. `None` means "no constraint".
///
/// Dates are kept as the text the user typed; they are parsed when the
/// filter is evaluated so an invalid bound simply imposes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub buyer: Option<String>,
    pub seller: Option<String>,
    pub hs_code: Option<String>,
    pub country: Option<String>,
    pub category: Option<String>,
}

impl FilterState {
    pub fn get(&self, dimension: Dimension) -> Option<&str> {
        self.slot(dimension).as_deref()
    }

    /// Set one dimension. Blank text unsets it.
    pub fn set(&mut self, dimension: Dimension, value: Option<String>) {
        *self.slot_mut(dimension) = value.filter(|v| !v.trim().is_empty());
    }

    pub fn clear(&mut self, dimension: Dimension) {
        *self.slot_mut(dimension) = None;
    }

    pub fn is_unconstrained(&self) -> bool {
        self.predicates().is_empty()
    }

    /// The active constraints, one per set (and, for dates, parseable) dimension.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(d) = self.start_date.as_deref().and_then(parse_date_input) {
            out.push(Predicate::OnOrAfter(d));
        }
        if let Some(d) = self.end_date.as_deref().and_then(parse_date_input) {
            out.push(Predicate::OnOrBefore(d));
        }
        for field in CategoricalField::ALL {
            if let Some(v) = self.get(Dimension::Categorical(field)) {
                out.push(Predicate::Equals(field, v.to_string()));
            }
        }
        out
    }

    fn slot(&self, dimension: Dimension) -> &Option<String> {
        match dimension {
            Dimension::StartDate => &self.start_date,
            Dimension::EndDate => &self.end_date,
            Dimension::Categorical(CategoricalField::Buyer) => &self.buyer,
            Dimension::Categorical(CategoricalField::Seller) => &self.seller,
            Dimension::Categorical(CategoricalField::HsCode) => &self.hs_code,
            Dimension::Categorical(CategoricalField::Country) => &self.country,
            Dimension::Categorical(CategoricalField::Category) => &self.category,
        }
    }

    fn slot_mut(&mut self, dimension: Dimension) -> &mut Option<String> {
        match dimension {
            Dimension::StartDate => &mut self.start_date,
            Dimension::EndDate => &mut self.end_date,
            Dimension::Categorical(CategoricalField::Buyer) => &mut self.buyer,
            Dimension::Categorical(CategoricalField::Seller) => &mut self.seller,
            Dimension::Categorical(CategoricalField::HsCode) => &mut self.hs_code,
            Dimension::Categorical(CategoricalField::Country) => &mut self.country,
            Dimension::Categorical(CategoricalField::Category) => &mut self.category,
        }
    }
}

/// Parse a user-entered `MM/DD/YYYY` bound. Anything else is `None`.
pub fn parse_date_input(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    parse_us_date(text)
}

/// Strict `MM/DD/YYYY`: chrono's `%Y` alone also takes short or signed years.
pub(crate) fn parse_us_date(text: &str) -> Option<NaiveDate> {
    let (_, year) = text.rsplit_once('/')?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%m/%d/%Y").ok()
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// A single conjunctive constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Inclusive lower date bound. Records without a date fail.
    OnOrAfter(NaiveDate),
    /// Inclusive upper date bound. Records without a date fail.
    OnOrBefore(NaiveDate),
    /// Exact text equality on a categorical field. Null fields fail.
    Equals(CategoricalField, String),
}

impl Predicate {
    pub fn matches(&self, record: &Transaction) -> bool {
        match self {
            Predicate::OnOrAfter(bound) => record.date.is_some_and(|d| d >= *bound),
            Predicate::OnOrBefore(bound) => record.date.is_some_and(|d| d <= *bound),
            Predicate::Equals(field, wanted) => record.field(*field) == Some(wanted.as_str()),
        }
    }
}

/// Narrow `records` by each predicate in turn.
///
/// Each step is a pure intersection, so the order of `predicates` never
/// changes the result.
pub fn apply_predicates<'a, I>(records: I, predicates: &[Predicate]) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut current: Vec<&'a Transaction> = records.into_iter().collect();
    for predicate in predicates {
        current.retain(|t| predicate.matches(t));
    }
    current
}

/// Records passing every active filter in `state`, in source order.
pub fn apply_filters<'a, I>(records: I, state: &FilterState) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    apply_predicates(records, &state.predicates())
}

// ---------------------------------------------------------------------------
// Progressive option narrowing
// ---------------------------------------------------------------------------

/// Sorted distinct values of `field` among already-filtered records.
fn project_options(filtered: &[&Transaction], field: CategoricalField) -> Vec<String> {
    let present: BTreeSet<&str> = filtered.iter().filter_map(|t| t.field(field)).collect();
    match field {
        CategoricalField::Buyer => present
            .into_iter()
            .filter(|v| *v != UNKNOWN_BUYER)
            .map(str::to_string)
            .collect(),
        CategoricalField::HsCode => ALLOWED_HS_CODES
            .iter()
            .filter(|code| present.contains(*code))
            .map(|code| code.to_string())
            .collect(),
        _ => present.into_iter().map(str::to_string).collect(),
    }
}

/// Choices for one dropdown under the current state.
///
/// The dimension's own selection is part of the narrowing, so a selected
/// value keeps its list down to that one value.
pub fn available_options(
    records: &[Transaction],
    state: &FilterState,
    field: CategoricalField,
) -> Vec<String> {
    let filtered = apply_filters(records, state);
    project_options(&filtered, field)
}

/// Option lists for every dropdown, computed from one filtered pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownOptions {
    pub buyers: Vec<String>,
    pub sellers: Vec<String>,
    pub hs_codes: Vec<String>,
    pub countries: Vec<String>,
    pub categories: Vec<String>,
}

impl DropdownOptions {
    pub fn from_filtered(filtered: &[&Transaction]) -> Self {
        DropdownOptions {
            buyers: project_options(filtered, CategoricalField::Buyer),
            sellers: project_options(filtered, CategoricalField::Seller),
            hs_codes: project_options(filtered, CategoricalField::HsCode),
            countries: project_options(filtered, CategoricalField::Country),
            categories: project_options(filtered, CategoricalField::Category),
        }
    }

    pub fn get(&self, field: CategoricalField) -> &[String] {
        match field {
            CategoricalField::Buyer => &self.buyers,
            CategoricalField::Seller => &self.sellers,
            CategoricalField::HsCode => &self.hs_codes,
            CategoricalField::Country => &self.countries,
            CategoricalField::Category => &self.categories,
        }
    }
}

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

/// A state transition requested by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterIntent {
    Apply {
        dimension: Dimension,
        value: Option<String>,
    },
    Reset(Dimension),
    ResetAll,
}

/// Pure reducer over [`FilterState`].
pub fn apply_intent(state: &FilterState, intent: FilterIntent) -> FilterState {
    match intent {
        FilterIntent::Apply { dimension, value } => {
            let mut next = state.clone();
            next.set(dimension, value);
            next
        }
        FilterIntent::Reset(dimension) => {
            let mut next = state.clone();
            next.clear(dimension);
            next
        }
        FilterIntent::ResetAll => FilterState::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{is_allowed_hs_code, sample_transaction};
    use proptest::prelude::*;

    fn record(buyer: &str, hs: &str, country: &str, date: (i32, u32, u32)) -> Transaction {
        let mut t = sample_transaction(buyer, hs);
        t.country_of_origin = Some(country.to_string());
        t.seller = Some(format!("{buyer} Shipping"));
        t.category = Some(if hs.starts_with("74") { "Copper" } else { "Cable" }.to_string());
        t.date = NaiveDate::from_ymd_opt(date.0, date.1, date.2);
        t
    }

    fn fixture() -> Vec<Transaction> {
        vec![
            record("Acme", "854442", "Chile", (2024, 1, 10)),
            record("Beta", "854449", "Peru", (2024, 1, 15)),
            record("Acme", "740311", "Peru", (2024, 2, 1)),
            record(UNKNOWN_BUYER, "854460", "Chile", (2024, 3, 5)),
            record("Gamma", "854442", "Mexico", (2023, 12, 31)),
        ]
    }

    fn state_with(pairs: &[(Dimension, &str)]) -> FilterState {
        let mut s = FilterState::default();
        for (d, v) in pairs {
            s.set(*d, Some(v.to_string()));
        }
        s
    }

    const BUYER: Dimension = Dimension::Categorical(CategoricalField::Buyer);
    const COUNTRY: Dimension = Dimension::Categorical(CategoricalField::Country);
    const HS: Dimension = Dimension::Categorical(CategoricalField::HsCode);

    #[test]
    fn unset_state_keeps_everything() {
        let records = fixture();
        assert_eq!(apply_filters(&records, &FilterState::default()).len(), records.len());
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let records = fixture();
        let s = state_with(&[(Dimension::StartDate, "01/15/2024")]);
        let out = apply_filters(&records, &s);
        assert_eq!(out.len(), 3);
        assert!(out
            .iter()
            .all(|t| t.date.unwrap() >= NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));

        let s = state_with(&[(Dimension::StartDate, "01/15/2024"), (Dimension::EndDate, "02/01/2024")]);
        assert_eq!(apply_filters(&records, &s).len(), 2);
    }

    #[test]
    fn invalid_date_imposes_no_bound() {
        let records = fixture();
        for text in ["13/40/2024", "2024-01-15", "garbage", "  "] {
            let s = state_with(&[(Dimension::StartDate, text)]);
            assert_eq!(apply_filters(&records, &s).len(), records.len(), "{text}");
        }
        assert_eq!(parse_date_input("13/40/2024"), None);
        assert_eq!(parse_date_input(" 01/15/2024 "), NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn short_or_signed_year_is_no_bound() {
        assert_eq!(parse_date_input("01/15/24"), None);
        assert_eq!(parse_date_input("1/5/+2024"), None);
        assert_eq!(parse_date_input("01/15/02024"), None);
        assert_eq!(parse_date_input("1/5/2024"), NaiveDate::from_ymd_opt(2024, 1, 5));

        let records = fixture();
        let s = state_with(&[(Dimension::EndDate, "01/15/24")]);
        assert_eq!(apply_filters(&records, &s).len(), records.len());
    }

    #[test]
    fn records_without_date_fail_a_set_bound() {
        let mut records = fixture();
        records[0].date = None;
        let s = state_with(&[(Dimension::EndDate, "12/31/2030")]);
        assert_eq!(apply_filters(&records, &s).len(), records.len() - 1);
    }

    #[test]
    fn categorical_filters_combine_conjunctively() {
        let records = fixture();
        let s = state_with(&[(BUYER, "Acme"), (COUNTRY, "Peru")]);
        let out = apply_filters(&records, &s);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].hs_code, "740311");
    }

    #[test]
    fn buyer_options_skip_unknown() {
        let records = fixture();
        let opts = available_options(&records, &FilterState::default(), CategoricalField::Buyer);
        assert_eq!(opts, vec!["Acme", "Beta", "Gamma"]);
    }

    #[test]
    fn options_narrow_with_other_filters() {
        let records = fixture();
        let s = state_with(&[(COUNTRY, "Chile")]);
        assert_eq!(available_options(&records, &s, CategoricalField::Buyer), vec!["Acme"]);
        assert_eq!(
            available_options(&records, &s, CategoricalField::HsCode),
            vec!["854442", "854460"]
        );
    }

    #[test]
    fn own_selection_narrows_its_own_list() {
        let records = fixture();
        let s = state_with(&[(COUNTRY, "Peru")]);
        assert_eq!(available_options(&records, &s, CategoricalField::Country), vec!["Peru"]);
    }

    #[test]
    fn dropdown_options_match_single_field_queries() {
        let records = fixture();
        let s = state_with(&[(Dimension::StartDate, "01/01/2024")]);
        let filtered = apply_filters(&records, &s);
        let all = DropdownOptions::from_filtered(&filtered);
        for field in CategoricalField::ALL {
            assert_eq!(all.get(field), available_options(&records, &s, field).as_slice());
        }
    }

    #[test]
    fn reset_leaves_other_dimensions() {
        let s = state_with(&[(BUYER, "Acme"), (COUNTRY, "Peru"), (Dimension::StartDate, "01/01/2024")]);
        let next = apply_intent(&s, FilterIntent::Reset(BUYER));
        assert_eq!(next.buyer, None);
        assert_eq!(next.country.as_deref(), Some("Peru"));
        assert_eq!(next.start_date.as_deref(), Some("01/01/2024"));
    }

    #[test]
    fn reset_all_clears_everything() {
        let s = state_with(&[(BUYER, "Acme"), (HS, "854442"), (Dimension::EndDate, "01/01/2024")]);
        assert_eq!(apply_intent(&s, FilterIntent::ResetAll), FilterState::default());
    }

    #[test]
    fn applying_blank_unsets() {
        let s = state_with(&[(BUYER, "Acme")]);
        let next = apply_intent(
            &s,
            FilterIntent::Apply { dimension: BUYER, value: Some("  ".into()) },
        );
        assert!(next.is_unconstrained());
    }

    // -- properties --

    fn arb_record() -> impl Strategy<Value = Transaction> {
        (
            prop::sample::select(vec!["Acme", "Beta", "Gamma", UNKNOWN_BUYER]),
            prop::sample::select(ALLOWED_HS_CODES.to_vec()),
            prop::sample::select(vec!["Chile", "Peru", "Mexico"]),
            prop::option::of(prop::sample::select(vec!["Nexans", "Aurubis", "Acme Shipping"])),
            1u32..13,
            1u32..29,
        )
            .prop_map(|(buyer, hs, country, seller, m, d)| {
                let mut t = record(buyer, hs, country, (2024, m, d));
                t.seller = seller.map(str::to_string);
                t
            })
    }

    fn arb_state() -> impl Strategy<Value = FilterState> {
        (
            prop::option::of(prop::sample::select(vec!["01/15/2024", "06/01/2024", "bad"])),
            prop::option::of(prop::sample::select(vec!["03/31/2024", "12/31/2024"])),
            prop::option::of(prop::sample::select(vec!["Acme", "Beta", UNKNOWN_BUYER])),
            prop::option::of(prop::sample::select(vec!["Nexans", "Aurubis"])),
            prop::option::of(prop::sample::select(ALLOWED_HS_CODES.to_vec())),
            prop::option::of(prop::sample::select(vec!["Chile", "Peru"])),
            prop::option::of(prop::sample::select(vec!["Copper", "Cable"])),
        )
            .prop_map(|(start, end, buyer, seller, hs, country, category)| FilterState {
                start_date: start.map(str::to_string),
                end_date: end.map(str::to_string),
                buyer: buyer.map(str::to_string),
                seller: seller.map(str::to_string),
                hs_code: hs.map(str::to_string),
                country: country.map(str::to_string),
                category: category.map(str::to_string),
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn predicate_order_does_not_matter(
            records in prop::collection::vec(arb_record(), 0..40),
            state in arb_state(),
            rotation in 0usize..8,
        ) {
            let forward = state.predicates();
            let mut reversed = forward.clone();
            reversed.reverse();
            let mut rotated = forward.clone();
            if !rotated.is_empty() {
                let k = rotation % rotated.len();
                rotated.rotate_left(k);
            }

            let a = apply_predicates(&records, &forward);
            prop_assert_eq!(&a, &apply_predicates(&records, &reversed));
            prop_assert_eq!(&a, &apply_predicates(&records, &rotated));
        }

        #[test]
        fn filtering_is_idempotent(
            records in prop::collection::vec(arb_record(), 0..40),
            state in arb_state(),
        ) {
            let once = apply_filters(&records, &state);
            let twice = apply_filters(once.iter().copied(), &state);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn filtered_codes_stay_in_allow_list(
            records in prop::collection::vec(arb_record(), 0..40),
            state in arb_state(),
        ) {
            for t in apply_filters(&records, &state) {
                prop_assert!(is_allowed_hs_code(&t.hs_code));
            }
            let codes = available_options(&records, &state, CategoricalField::HsCode);
            prop_assert!(codes.iter().all(|c| is_allowed_hs_code(c)));
        }
    }
}
