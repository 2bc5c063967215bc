use std::cmp::Ordering;

use super::model::Transaction;

// ---------------------------------------------------------------------------
// Fixed table schema
// ---------------------------------------------------------------------------

/// Columns of the transaction table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableColumn {
    Date,
    Buyer,
    Seller,
    Country,
    HsCode,
    Category,
    MetricTons,
    TotalValue,
    ValuePerKg,
}

impl TableColumn {
    pub const ALL: [TableColumn; 9] = [
        TableColumn::Date,
        TableColumn::Buyer,
        TableColumn::Seller,
        TableColumn::Country,
        TableColumn::HsCode,
        TableColumn::Category,
        TableColumn::MetricTons,
        TableColumn::TotalValue,
        TableColumn::ValuePerKg,
    ];

    pub fn title(self) -> &'static str {
        match self {
            TableColumn::Date => "Date",
            TableColumn::Buyer => "Buyer",
            TableColumn::Seller => "Seller",
            TableColumn::Country => "Country",
            TableColumn::HsCode => "HS Code",
            TableColumn::Category => "Category",
            TableColumn::MetricTons => "Metric Tons",
            TableColumn::TotalValue => "Total Value ($)",
            TableColumn::ValuePerKg => "Val/KG ($)",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TableColumn::MetricTons | TableColumn::TotalValue | TableColumn::ValuePerKg
        )
    }

    fn number(self, t: &Transaction) -> Option<f64> {
        match self {
            TableColumn::MetricTons => t.metric_tons,
            TableColumn::TotalValue => t.total_value,
            TableColumn::ValuePerKg => t.value_per_kg,
            _ => None,
        }
    }

    fn text(self, t: &Transaction) -> Option<&str> {
        match self {
            TableColumn::Buyer => Some(t.buyer.as_str()),
            TableColumn::Seller => t.seller.as_deref(),
            TableColumn::Country => t.country_of_origin.as_deref(),
            TableColumn::HsCode => Some(t.hs_code.as_str()),
            TableColumn::Category => t.category.as_deref(),
            _ => None,
        }
    }

    /// Display text of one cell. Null cells render empty.
    pub fn cell(self, t: &Transaction) -> String {
        match self {
            TableColumn::Date => t.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            TableColumn::MetricTons => t.metric_tons.map(|v| format!("{v:.2}")).unwrap_or_default(),
            TableColumn::TotalValue => t.total_value.map(format_dollars).unwrap_or_default(),
            TableColumn::ValuePerKg => t.value_per_kg.map(|v| format!("${v:.2}")).unwrap_or_default(),
            _ => self.text(t).unwrap_or_default().to_string(),
        }
    }

    fn is_null(self, t: &Transaction) -> bool {
        match self {
            TableColumn::Date => t.date.is_none(),
            c if c.is_numeric() => c.number(t).is_none(),
            c => c.text(t).is_none(),
        }
    }

    /// Ascending order with nulls last.
    fn compare(self, a: &Transaction, b: &Transaction) -> Ordering {
        fn nulls_last<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(T, T) -> Ordering) -> Ordering {
            match (a, b) {
                (Some(x), Some(y)) => cmp(x, y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
        match self {
            TableColumn::Date => nulls_last(a.date, b.date, |x, y| x.cmp(&y)),
            c if c.is_numeric() => nulls_last(c.number(a), c.number(b), |x, y| x.total_cmp(&y)),
            c => nulls_last(c.text(a), c.text(b), |x, y| x.cmp(y)),
        }
    }
}

/// Whole dollars with thousands separators, e.g. `$1,234,567`.
pub fn format_dollars(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let sign = if value < 0.0 && rounded != "0" { "-" } else { "" };
    format!("{sign}${}", group_thousands(&rounded))
}

/// Insert `,` every three digits of an unsigned digit string.
pub fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Sorting and search
// ---------------------------------------------------------------------------

/// Column sort applied to the table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
    pub column: TableColumn,
    pub descending: bool,
}

impl TableSort {
    /// Clicking a header: same column flips direction, new column sorts ascending.
    pub fn toggled(current: Option<TableSort>, column: TableColumn) -> TableSort {
        match current {
            Some(s) if s.column == column => TableSort {
                column,
                descending: !s.descending,
            },
            _ => TableSort {
                column,
                descending: false,
            },
        }
    }
}

/// Stable sort of `rows`. Null cells stay at the bottom in both directions.
pub fn sort_rows(rows: &mut [&Transaction], sort: TableSort) {
    rows.sort_by(|a, b| {
        let ord = sort.column.compare(a, b);
        if sort.descending && !sort.column.is_null(a) && !sort.column.is_null(b) {
            ord.reverse()
        } else {
            ord
        }
    });
}

/// Rows where any displayed cell contains `query`, ignoring case.
pub fn search_rows<'a>(rows: &[&'a Transaction], query: &str) -> Vec<&'a Transaction> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .copied()
        .filter(|t| {
            TableColumn::ALL
                .iter()
                .any(|c| c.cell(t).to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::sample_transaction;
    use chrono::NaiveDate;

    fn row(buyer: &str, value: Option<f64>) -> Transaction {
        let mut t = sample_transaction(buyer, "854442");
        t.total_value = value;
        t
    }

    #[test]
    fn dollars_are_grouped() {
        assert_eq!(format_dollars(0.0), "$0");
        assert_eq!(format_dollars(999.4), "$999");
        assert_eq!(format_dollars(1234.4), "$1,234");
        assert_eq!(format_dollars(1234567.0), "$1,234,567");
        assert_eq!(format_dollars(-2500.0), "-$2,500");
        assert_eq!(group_thousands("12345"), "12,345");
    }

    #[test]
    fn cells_follow_column_formats() {
        let mut t = row("Acme", Some(12500.0));
        t.date = NaiveDate::from_ymd_opt(2024, 1, 5);
        t.metric_tons = Some(3.14659);
        t.value_per_kg = None;
        assert_eq!(TableColumn::Date.cell(&t), "2024-01-05");
        assert_eq!(TableColumn::MetricTons.cell(&t), "3.15");
        assert_eq!(TableColumn::TotalValue.cell(&t), "$12,500");
        assert_eq!(TableColumn::ValuePerKg.cell(&t), "");
        assert_eq!(TableColumn::HsCode.cell(&t), "854442");
    }

    #[test]
    fn numeric_sort_keeps_nulls_last() {
        let rows = [row("A", Some(5.0)), row("B", None), row("C", Some(50.0)), row("D", Some(1.0))];
        let mut refs: Vec<&Transaction> = rows.iter().collect();

        sort_rows(&mut refs, TableSort { column: TableColumn::TotalValue, descending: false });
        let order: Vec<&str> = refs.iter().map(|t| t.buyer.as_str()).collect();
        assert_eq!(order, vec!["D", "A", "C", "B"]);

        sort_rows(&mut refs, TableSort { column: TableColumn::TotalValue, descending: true });
        let order: Vec<&str> = refs.iter().map(|t| t.buyer.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "D", "B"]);
    }

    #[test]
    fn header_click_toggles_direction() {
        let s = TableSort::toggled(None, TableColumn::Buyer);
        assert!(!s.descending);
        let s = TableSort::toggled(Some(s), TableColumn::Buyer);
        assert!(s.descending);
        let s = TableSort::toggled(Some(s), TableColumn::Seller);
        assert_eq!(s, TableSort { column: TableColumn::Seller, descending: false });
    }

    #[test]
    fn search_is_case_insensitive() {
        let rows = [row("Acme Cables", None), row("Beta Copper", None)];
        let refs: Vec<&Transaction> = rows.iter().collect();
        assert_eq!(search_rows(&refs, "copper").len(), 1);
        assert_eq!(search_rows(&refs, "854442").len(), 2);
        assert_eq!(search_rows(&refs, "  ").len(), 2);
    }
}
