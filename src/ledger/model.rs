//! The transaction record as delivered by the upstream store, plus the
//! default-resolution functions for its optional/legacy fields.
//!
//! Records come from several generations of the booking system, so most
//! fields are optional on the wire. Each grouping key has a single resolver
//! here so the fallback policy is testable independently of any view.

use serde::Deserialize;

/// Group key used when a transaction is missing the field a rollup groups by.
pub(crate) const UNKNOWN_KEY: &str = "Unknown";

/// Category assigned to transactions that predate structured category codes.
pub(crate) const GENERAL_DONATIONS_KEY: &str = "GENERAL_DONATIONS";

/// A single booked transaction from the upstream transaction store.
///
/// Field names mirror the upstream JSON. Older records carry only the legacy
/// `ServiceType` label and no structured category fields, so everything
/// beyond the identifying fields is defaulted when absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    /// Opaque unique identifier for the transaction.
    #[serde(rename = "TransactionId", default)]
    pub transaction_id: String,

    /// Name of the payer. Repeats across transactions; not a unique key.
    #[serde(rename = "DevoteeName", default)]
    pub devotee_name: String,

    /// Email address of the payer.
    #[serde(rename = "DevoteeEmail", default)]
    pub devotee_email: String,

    /// Non-negative monetary amount in USD.
    #[serde(rename = "Amount", default)]
    pub amount: f64,

    /// Date the transaction was booked, as a date string.
    #[serde(rename = "BookedDate", default)]
    pub booked_date: String,

    /// Payment method label.
    #[serde(rename = "PaymentType", default)]
    pub payment_type: String,

    /// Legacy free-text service label, kept for records that predate the
    /// structured category fields.
    #[serde(rename = "ServiceType", default)]
    pub service_type: String,

    /// Year-month string whose first four characters are the four-digit year.
    #[serde(rename = "YearMonth", default)]
    pub year_month: String,

    /// Coarse category code, e.g. `POOJA` or `VIGRAHAM`.
    #[serde(default)]
    pub service_parent: Option<String>,

    /// Human-readable label for the specific service.
    #[serde(default)]
    pub service_display: Option<String>,

    /// Fine-grained service key within a category.
    #[serde(default)]
    pub service_id: Option<String>,

    /// Marks a transaction that negates a prior charge.
    #[serde(rename = "IsReversal", default)]
    pub is_reversal: bool,
}

impl Transaction {
    /// The contribution of this transaction to any aggregate sum.
    ///
    /// Reversals always deduct: the stored amount is normalized to its
    /// absolute value before negation, so a reversal recorded with either
    /// sign counts the same. Every sum in the crate goes through this.
    pub fn signed_amount(&self) -> f64 {
        if self.is_reversal {
            -self.amount.abs()
        } else {
            self.amount
        }
    }

    /// The four-digit year this transaction is grouped under.
    ///
    /// Taken from the first four characters of `YearMonth`; a missing or
    /// too-short value resolves to [UNKNOWN_KEY].
    pub(crate) fn year_key(&self) -> &str {
        match self.year_month.get(..4) {
            Some(year) => year,
            None => UNKNOWN_KEY,
        }
    }

    /// The category code this transaction is grouped under, falling back to
    /// [GENERAL_DONATIONS_KEY] for unstructured legacy records.
    pub(crate) fn category_key(&self) -> &str {
        non_empty(self.service_parent.as_deref()).unwrap_or(GENERAL_DONATIONS_KEY)
    }

    /// The service key this transaction is grouped under, falling back to
    /// [UNKNOWN_KEY].
    pub(crate) fn service_key(&self) -> &str {
        non_empty(self.service_id.as_deref()).unwrap_or(UNKNOWN_KEY)
    }

    /// The devotee name this transaction is grouped under, falling back to
    /// [UNKNOWN_KEY].
    pub(crate) fn devotee_key(&self) -> &str {
        non_empty(Some(self.devotee_name.as_str())).unwrap_or(UNKNOWN_KEY)
    }

    /// The display label for this transaction's service: the structured
    /// display name when present, otherwise the legacy `ServiceType` label.
    pub(crate) fn service_label(&self) -> &str {
        non_empty(self.service_display.as_deref()).unwrap_or(&self.service_type)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::Transaction;

    /// Shorthand for building transactions in tests. Fields not covered by
    /// the arguments are filled with plausible defaults.
    pub(crate) fn transaction(
        id: &str,
        amount: f64,
        year_month: &str,
        category: Option<&str>,
        service_id: Option<&str>,
        is_reversal: bool,
    ) -> Transaction {
        Transaction {
            transaction_id: id.to_owned(),
            devotee_name: "Asha Patel".to_owned(),
            devotee_email: "asha@example.com".to_owned(),
            amount,
            booked_date: format!(
                "{}-{}-15",
                year_month.get(..4).unwrap_or("2024"),
                year_month.get(4..6).unwrap_or("01")
            ),
            payment_type: "Card".to_owned(),
            service_type: "Archana".to_owned(),
            year_month: year_month.to_owned(),
            service_parent: category.map(str::to_owned),
            service_display: None,
            service_id: service_id.map(str::to_owned),
            is_reversal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GENERAL_DONATIONS_KEY, Transaction, UNKNOWN_KEY, test_utils::transaction};

    #[test]
    fn signed_amount_negates_reversals_regardless_of_stored_sign() {
        let charge = transaction("t1", 100.0, "202401", None, None, false);
        let reversal = transaction("t2", 30.0, "202401", None, None, true);
        let negative_reversal = transaction("t3", -30.0, "202401", None, None, true);

        assert_eq!(charge.signed_amount(), 100.0);
        assert_eq!(reversal.signed_amount(), -30.0);
        assert_eq!(negative_reversal.signed_amount(), -30.0);
    }

    #[test]
    fn year_key_takes_first_four_characters() {
        let t = transaction("t1", 1.0, "202403", None, None, false);
        assert_eq!(t.year_key(), "2024");
    }

    #[test]
    fn year_key_falls_back_on_short_or_missing_year_month() {
        let missing = transaction("t1", 1.0, "", None, None, false);
        let short = transaction("t2", 1.0, "20", None, None, false);

        assert_eq!(missing.year_key(), UNKNOWN_KEY);
        assert_eq!(short.year_key(), UNKNOWN_KEY);
    }

    #[test]
    fn category_key_falls_back_to_general_donations() {
        let tagged = transaction("t1", 1.0, "202401", Some("POOJA"), None, false);
        let untagged = transaction("t2", 1.0, "202401", None, None, false);
        let empty = transaction("t3", 1.0, "202401", Some(""), None, false);

        assert_eq!(tagged.category_key(), "POOJA");
        assert_eq!(untagged.category_key(), GENERAL_DONATIONS_KEY);
        assert_eq!(empty.category_key(), GENERAL_DONATIONS_KEY);
    }

    #[test]
    fn service_key_falls_back_to_unknown() {
        let with_id = transaction("t1", 1.0, "202401", None, Some("abhishekam"), false);
        let without_id = transaction("t2", 1.0, "202401", None, None, false);

        assert_eq!(with_id.service_key(), "abhishekam");
        assert_eq!(without_id.service_key(), UNKNOWN_KEY);
    }

    #[test]
    fn devotee_key_falls_back_to_unknown() {
        let mut t = transaction("t1", 1.0, "202401", None, None, false);
        assert_eq!(t.devotee_key(), "Asha Patel");

        t.devotee_name.clear();
        assert_eq!(t.devotee_key(), UNKNOWN_KEY);
    }

    #[test]
    fn service_label_prefers_display_name_over_legacy_label() {
        let mut t = transaction("t1", 1.0, "202401", None, Some("abhishekam"), false);
        assert_eq!(t.service_label(), "Archana");

        t.service_display = Some("Ganapathi Abhishekam".to_owned());
        assert_eq!(t.service_label(), "Ganapathi Abhishekam");
    }

    #[test]
    fn deserializes_legacy_records_with_missing_fields() {
        let json = r#"{"TransactionId": "t-9", "Amount": 21.5, "ServiceType": "Donation"}"#;

        let t: Transaction = serde_json::from_str(json).expect("legacy record should parse");

        assert_eq!(t.transaction_id, "t-9");
        assert_eq!(t.amount, 21.5);
        assert!(!t.is_reversal);
        assert_eq!(t.year_key(), UNKNOWN_KEY);
        assert_eq!(t.category_key(), GENERAL_DONATIONS_KEY);
        assert_eq!(t.service_label(), "Donation");
    }
}
