use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Classification allow-list and source schema
// ---------------------------------------------------------------------------

/// The four HS codes the dashboard is scoped to. Kept sorted.
pub const ALLOWED_HS_CODES: [&str; 4] = ["740311", "854442", "854449", "854460"];

/// Buyer value used when no competitor column names a counterparty.
pub const UNKNOWN_BUYER: &str = "Unknown";

/// Whether a classification code is one of [`ALLOWED_HS_CODES`].
pub fn is_allowed_hs_code(code: &str) -> bool {
    ALLOWED_HS_CODES.contains(&code)
}

/// Column names of the source spreadsheet.
pub mod columns {
    pub const DATE: &str = "Date";
    pub const SHIPPER_DECLARED: &str = "Shipper Declared";
    pub const INTERNATIONAL_COMPETITOR: &str = "International Competitor";
    pub const DOMESTIC_COMPETITOR: &str = "Domestic Competitor";
    pub const HS_CODE: &str = "HS Code";
    pub const COUNTRY_OF_ORIGIN: &str = "Country of Origin";
    pub const CATEGORY: &str = "Category";
    pub const METRIC_TONS: &str = "Metric Tons";
    pub const TOTAL_VALUE: &str = "Total calculated value ($)";
    pub const VALUE_PER_KG: &str = "Val/KG ($)";

    /// Every column the loader looks up, in spreadsheet order.
    pub const REQUIRED: [&str; 10] = [
        DATE,
        SHIPPER_DECLARED,
        INTERNATIONAL_COMPETITOR,
        DOMESTIC_COMPETITOR,
        HS_CODE,
        COUNTRY_OF_ORIGIN,
        CATEGORY,
        METRIC_TONS,
        TOTAL_VALUE,
        VALUE_PER_KG,
    ];
}

// ---------------------------------------------------------------------------
// Transaction – one validated row
// ---------------------------------------------------------------------------

/// One import transaction after coercion and buyer/seller resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: Option<NaiveDate>,
    pub shipper_declared: Option<String>,
    pub international_competitor: Option<String>,
    pub domestic_competitor: Option<String>,
    /// Always one of [`ALLOWED_HS_CODES`] once the record is in a [`Dataset`].
    pub hs_code: String,
    pub country_of_origin: Option<String>,
    pub category: Option<String>,
    pub metric_tons: Option<f64>,
    pub total_value: Option<f64>,
    pub value_per_kg: Option<f64>,
    /// Resolved counterparty, or [`UNKNOWN_BUYER`].
    pub buyer: String,
    /// The declaring shipper, verbatim.
    pub seller: Option<String>,
}

impl Transaction {
    /// Text of a categorical field, as compared by filters and listed in dropdowns.
    pub fn field(&self, field: CategoricalField) -> Option<&str> {
        match field {
            CategoricalField::Buyer => Some(self.buyer.as_str()),
            CategoricalField::Seller => self.seller.as_deref(),
            CategoricalField::HsCode => Some(self.hs_code.as_str()),
            CategoricalField::Country => self.country_of_origin.as_deref(),
            CategoricalField::Category => self.category.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter dimensions
// ---------------------------------------------------------------------------

/// The five dropdown-backed dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoricalField {
    Buyer,
    Seller,
    HsCode,
    Country,
    Category,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::Buyer,
        CategoricalField::Seller,
        CategoricalField::HsCode,
        CategoricalField::Country,
        CategoricalField::Category,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CategoricalField::Buyer => "Buyer",
            CategoricalField::Seller => "Seller",
            CategoricalField::HsCode => "HS Code",
            CategoricalField::Country => "Country",
            CategoricalField::Category => "Category",
        }
    }
}

/// Every independently settable / resettable piece of the filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    StartDate,
    EndDate,
    Categorical(CategoricalField),
}

impl Dimension {
    pub fn label(self) -> &'static str {
        match self {
            Dimension::StartDate => "Start Date",
            Dimension::EndDate => "End Date",
            Dimension::Categorical(field) => field.label(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded record set
// ---------------------------------------------------------------------------

/// The validated record set. Never mutated after load; shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Transaction>,
}

impl Dataset {
    /// Build a dataset, dropping records outside the classification allow-list.
    pub fn from_records(records: Vec<Transaction>) -> Self {
        let records = records
            .into_iter()
            .filter(|t| is_allowed_hs_code(&t.hs_code))
            .collect();
        Dataset { records }
    }

    pub fn empty() -> Self {
        Dataset::default()
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Minimal record builder for unit tests across the data layer.
#[cfg(test)]
pub(crate) fn sample_transaction(buyer: &str, hs_code: &str) -> Transaction {
    Transaction {
        date: None,
        shipper_declared: None,
        international_competitor: None,
        domestic_competitor: None,
        hs_code: hs_code.to_string(),
        country_of_origin: None,
        category: None,
        metric_tons: None,
        total_value: None,
        value_per_kg: None,
        buyer: buyer.to_string(),
        seller: None,
    }
}
