//! Wire types for the two upstream responses.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::{Error, ledger::Transaction};

/// Response to the presigned-URL request.
#[derive(Debug, Deserialize)]
pub(super) struct PresignedResponse {
    #[serde(rename = "presignedUrl", default)]
    pub(super) presigned_url: Option<String>,
}

/// The ledger payload behind the presigned URL.
///
/// `transactions` maps opaque keys to records; only the values matter. The
/// field is kept as raw JSON so a missing or non-object value can be
/// reported as a payload-shape error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub(super) struct LedgerPayload {
    #[serde(default)]
    pub(super) transactions: Option<Value>,
    #[serde(default)]
    pub(super) last_updated_michigan: Option<String>,
}

impl LedgerPayload {
    /// Validates the payload shape and extracts the flat transaction list.
    ///
    /// The map is walked in key order so the extracted list is deterministic.
    pub(super) fn into_transactions(self) -> Result<Vec<Transaction>, Error> {
        let Some(Value::Object(entries)) = self.transactions else {
            return Err(Error::InvalidPayload(
                "missing or non-object transactions field".to_owned(),
            ));
        };

        let ordered: BTreeMap<String, Value> = entries.into_iter().collect();

        ordered
            .into_values()
            .map(|record| {
                serde_json::from_value(record).map_err(|error| {
                    Error::InvalidPayload(format!("malformed transaction record: {error}"))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::LedgerPayload;
    use crate::Error;

    #[test]
    fn extracts_transactions_in_key_order() {
        let payload: LedgerPayload = serde_json::from_str(
            r#"{
                "transactions": {
                    "b": {"TransactionId": "t2", "Amount": 2.0},
                    "a": {"TransactionId": "t1", "Amount": 1.0}
                },
                "last_updated_michigan": "2024-03-01 09:00 EST"
            }"#,
        )
        .unwrap();

        assert_eq!(
            payload.last_updated_michigan.as_deref(),
            Some("2024-03-01 09:00 EST")
        );

        let transactions = payload.into_transactions().expect("payload should parse");
        let ids: Vec<&str> = transactions
            .iter()
            .map(|t| t.transaction_id.as_str())
            .collect();
        assert_eq!(ids, ["t1", "t2"]);
    }

    #[test]
    fn missing_transactions_field_is_a_payload_error() {
        let payload: LedgerPayload = serde_json::from_str("{}").unwrap();

        assert!(matches!(
            payload.into_transactions(),
            Err(Error::InvalidPayload(_))
        ));
    }

    #[test]
    fn non_object_transactions_field_is_a_payload_error() {
        let payload: LedgerPayload =
            serde_json::from_str(r#"{"transactions": [1, 2, 3]}"#).unwrap();

        assert!(matches!(
            payload.into_transactions(),
            Err(Error::InvalidPayload(_))
        ));
    }

    #[test]
    fn malformed_record_is_a_payload_error() {
        let payload: LedgerPayload =
            serde_json::from_str(r#"{"transactions": {"a": {"Amount": "not a number"}}}"#).unwrap();

        assert!(matches!(
            payload.into_transactions(),
            Err(Error::InvalidPayload(_))
        ));
    }
}
