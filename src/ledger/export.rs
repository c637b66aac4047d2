//! CSV export of the full flat transaction list.
//!
//! The export is independent of the rollups and of whatever view or filter
//! is active: every transaction goes out, one row each, in a fixed column
//! order. Quoting and quote-escaping are delegated to the CSV writer, so
//! names and service labels with embedded commas survive a round trip.

use time::Date;

use crate::Error;

use super::model::Transaction;

/// The fixed export column order. No column is omitted even when every value
/// in it is empty.
const CSV_HEADER: [&str; 8] = [
    "Transaction ID",
    "Date",
    "Name",
    "Email",
    "Amount",
    "Service",
    "Payment Type",
    "Is Reversal",
];

/// Serializes `transactions` as CSV bytes.
///
/// The Amount column carries the signed value, so reversal rows are negative
/// regardless of the sign they were stored with.
pub(crate) fn export_csv(transactions: &[Transaction]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|error| Error::CsvExport(error.to_string()))?;

    for transaction in transactions {
        writer
            .write_record([
                transaction.transaction_id.as_str(),
                transaction.booked_date.as_str(),
                transaction.devotee_name.as_str(),
                transaction.devotee_email.as_str(),
                &transaction.signed_amount().to_string(),
                transaction.service_label(),
                transaction.payment_type.as_str(),
                if transaction.is_reversal { "Yes" } else { "No" },
            ])
            .map_err(|error| Error::CsvExport(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvExport(error.to_string()))
}

/// The attachment filename for an export generated on `date`.
pub(crate) fn export_filename(date: Date) -> String {
    format!("Transactions_{date}.csv")
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{export_csv, export_filename};
    use crate::ledger::model::test_utils::transaction;

    #[test]
    fn exports_header_plus_one_row_per_transaction() {
        let mut comma_name = transaction("t1", 100.0, "202401", Some("POOJA"), Some("A"), false);
        comma_name.devotee_name = "Patel, Asha".to_owned();
        let plain = transaction("t2", 50.0, "202402", Some("POOJA"), Some("A"), false);
        let reversal = transaction("t3", 30.0, "202401", Some("POOJA"), Some("A"), true);

        let bytes = export_csv(&[comma_name, plain, reversal]).expect("export should succeed");
        let text = String::from_utf8(bytes).expect("export should be UTF-8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4, "header plus three rows");
        assert_eq!(
            lines[0],
            "Transaction ID,Date,Name,Email,Amount,Service,Payment Type,Is Reversal"
        );
        assert!(
            lines[1].contains("\"Patel, Asha\""),
            "comma-bearing name should be quoted: {}",
            lines[1]
        );
        assert!(lines[3].contains(",-30,"), "reversal amount should be negative: {}", lines[3]);
        assert!(lines[3].ends_with("Yes"));
        assert!(lines[2].ends_with("No"));
    }

    #[test]
    fn doubles_embedded_quotes() {
        let mut quoted = transaction("t1", 10.0, "202401", None, None, false);
        quoted.devotee_name = "Asha \"AJ\" Patel".to_owned();

        let bytes = export_csv(&[quoted]).expect("export should succeed");
        let text = String::from_utf8(bytes).expect("export should be UTF-8");

        assert!(text.contains("\"Asha \"\"AJ\"\" Patel\""), "got: {text}");
    }

    #[test]
    fn reversal_amounts_are_negative_even_when_stored_negative() {
        let mut reversal = transaction("t1", -25.0, "202401", None, None, true);
        reversal.devotee_name = "Asha".to_owned();

        let bytes = export_csv(&[reversal]).expect("export should succeed");
        let text = String::from_utf8(bytes).expect("export should be UTF-8");

        assert!(text.lines().nth(1).unwrap().contains(",-25,"), "got: {text}");
    }

    #[test]
    fn empty_list_still_exports_every_column() {
        let bytes = export_csv(&[]).expect("export should succeed");
        let text = String::from_utf8(bytes).expect("export should be UTF-8");

        assert_eq!(
            text.trim_end(),
            "Transaction ID,Date,Name,Email,Amount,Service,Payment Type,Is Reversal"
        );
    }

    #[test]
    fn filename_embeds_the_date() {
        assert_eq!(
            export_filename(date!(2026 - 08 - 06)),
            "Transactions_2026-08-06.csv"
        );
    }
}
