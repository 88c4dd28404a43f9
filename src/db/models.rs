use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::gateway::ChargeOutcome;

pub const TRANSACTION_SUCCESS: &str = "success";
pub const TRANSACTION_FAILED: &str = "failed";

pub const SUBSCRIPTION_ACTIVE: &str = "active";
pub const SUBSCRIPTION_CANCELED: &str = "canceled";

/// One attempted charge. Written exactly once per attempt, success or not,
/// and never updated afterwards.
#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: BigDecimal,
    pub status: String,
    /// Gateway-assigned id. None when the gateway declined without one.
    pub transaction_id: Option<String>,
    pub error_message: Option<String>,
    pub card_last4: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds the record for a finished charge attempt. Only the last four
    /// characters of the card number are kept.
    pub fn from_charge(amount: BigDecimal, card_number: &str, outcome: &ChargeOutcome) -> Self {
        let status = if outcome.success {
            TRANSACTION_SUCCESS
        } else {
            TRANSACTION_FAILED
        };

        Self {
            id: Uuid::new_v4(),
            amount,
            status: status.to_string(),
            transaction_id: if outcome.transaction_id.is_empty() {
                None
            } else {
                Some(outcome.transaction_id.clone())
            },
            error_message: if outcome.success {
                None
            } else {
                Some(outcome.message.clone())
            },
            card_last4: card_last4(card_number),
            created_at: Utc::now(),
        }
    }
}

/// Last 4 characters of the card number; shorter inputs are kept whole.
pub fn card_last4(card_number: &str) -> String {
    let len = card_number.chars().count();
    card_number.chars().skip(len.saturating_sub(4)).collect()
}

/// Recurring billing agreement. Created outside this service; the only
/// mutation here is the active -> canceled transition.
#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub subscription_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn approved() -> ChargeOutcome {
        ChargeOutcome {
            success: true,
            transaction_id: "txn_1".to_string(),
            message: "Successful.".to_string(),
        }
    }

    fn declined(transaction_id: &str) -> ChargeOutcome {
        ChargeOutcome {
            success: false,
            transaction_id: transaction_id.to_string(),
            message: "This transaction has been declined.".to_string(),
        }
    }

    #[test]
    fn approved_charge_produces_success_record() {
        let amount = BigDecimal::from_str("10.00").unwrap();
        let tx = Transaction::from_charge(amount.clone(), "4111111111111111", &approved());

        assert_eq!(tx.status, TRANSACTION_SUCCESS);
        assert_eq!(tx.transaction_id.as_deref(), Some("txn_1"));
        assert_eq!(tx.error_message, None);
        assert_eq!(tx.card_last4, "1111");
        assert_eq!(tx.amount, amount);
    }

    #[test]
    fn declined_charge_keeps_error_message() {
        let amount = BigDecimal::from_str("10.00").unwrap();
        let tx = Transaction::from_charge(amount, "4111111111111111", &declined("txn_9"));

        assert_eq!(tx.status, TRANSACTION_FAILED);
        assert_eq!(tx.transaction_id.as_deref(), Some("txn_9"));
        assert_eq!(
            tx.error_message.as_deref(),
            Some("This transaction has been declined.")
        );
    }

    #[test]
    fn empty_gateway_id_is_stored_as_null() {
        let amount = BigDecimal::from_str("10.00").unwrap();
        let tx = Transaction::from_charge(amount, "4111111111111111", &declined(""));

        assert_eq!(tx.transaction_id, None);
    }

    #[test]
    fn card_last4_never_keeps_the_full_number() {
        assert_eq!(card_last4("4111111111111111"), "1111");
        assert_eq!(card_last4("378282246310005"), "0005");
        assert_eq!(card_last4("123"), "123");
        assert_eq!(card_last4(""), "");
    }
}
