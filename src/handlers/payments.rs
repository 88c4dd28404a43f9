use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;

use crate::AppState;
use crate::db::{models::Transaction, queries};
use crate::error::AppError;
use crate::gateway::{BillingAddress, ChargeRequest};
use crate::validation::{ValidationError, require_positive_amount, require_string};

/// Incoming charge payload. Every field is optional at the serde layer so
/// that missing fields come back as structured issues instead of a bare
/// deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Option<BigDecimal>,
    pub card_number: Option<String>,
    pub expiration_month: Option<String>,
    pub expiration_year: Option<String>,
    pub cvv: Option<String>,
    pub billing_info: Option<BillingInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentResponse {
    transaction_id: String,
    status: String,
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionView {
    transaction_id: String,
    status: String,
    amount: BigDecimal,
    card_last4: String,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionView {
    fn from(tx: Transaction) -> Self {
        Self {
            transaction_id: tx.transaction_id.unwrap_or_default(),
            status: tx.status,
            amount: tx.amount,
            card_last4: tx.card_last4,
            error_message: tx.error_message,
            created_at: tx.created_at,
        }
    }
}

/// POST /payment/process
///
/// A gateway decline is a business outcome and still answers 200 with
/// status "failed"; only validation problems (400) and infrastructure
/// failures (500) use error statuses. Exactly one transaction record is
/// written per attempt either way.
pub async fn process_payment(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AppError> {
    let payload: PaymentRequest = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(vec![ValidationError::new("body", e.to_string())]))?;

    let charge = validate_payment(payload).map_err(AppError::Validation)?;

    let amount = charge.amount.clone();
    let card_number = charge.card_number.clone();

    let outcome = state.gateway.charge(&charge).await.map_err(|e| {
        tracing::error!(error = %e, "payment gateway call failed");
        AppError::Internal("Failed to process payment".to_string())
    })?;

    let record = Transaction::from_charge(amount, &card_number, &outcome);
    let inserted = queries::insert_transaction(&state.db, &record)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to persist transaction");
            AppError::Internal("Failed to process payment".to_string())
        })?;

    Ok(Json(PaymentResponse {
        transaction_id: outcome.transaction_id,
        status: inserted.status,
        message: outcome.message,
    }))
}

/// GET /payment/transaction/:id — lookup by gateway-assigned id.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tx = queries::get_transaction_by_gateway_id(&state.db, &id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to fetch transaction");
            AppError::Internal("Failed to fetch transaction".to_string())
        })?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

    Ok(Json(TransactionView::from(tx)))
}

/// Checks every field and reports all issues at once.
fn validate_payment(payload: PaymentRequest) -> Result<ChargeRequest, Vec<ValidationError>> {
    let mut issues = Vec::new();

    let amount = require_positive_amount("amount", payload.amount, &mut issues);
    let card_number = require_string("cardNumber", payload.card_number, &mut issues);
    let expiration_month = require_string("expirationMonth", payload.expiration_month, &mut issues);
    let expiration_year = require_string("expirationYear", payload.expiration_year, &mut issues);
    let cvv = require_string("cvv", payload.cvv, &mut issues);

    let billing = match payload.billing_info {
        None => {
            issues.push(ValidationError::new("billingInfo", "is required"));
            None
        }
        Some(info) => {
            let first_name = require_string("billingInfo.firstName", info.first_name, &mut issues);
            let last_name = require_string("billingInfo.lastName", info.last_name, &mut issues);
            let address = require_string("billingInfo.address", info.address, &mut issues);
            let city = require_string("billingInfo.city", info.city, &mut issues);
            let state = require_string("billingInfo.state", info.state, &mut issues);
            let zip = require_string("billingInfo.zip", info.zip, &mut issues);

            match (first_name, last_name, address, city, state, zip) {
                (Some(first_name), Some(last_name), Some(address), Some(city), Some(state), Some(zip)) => {
                    Some(BillingAddress {
                        first_name,
                        last_name,
                        address,
                        city,
                        state,
                        zip,
                    })
                }
                _ => None,
            }
        }
    };

    match (amount, card_number, expiration_month, expiration_year, cvv, billing) {
        (Some(amount), Some(card_number), Some(expiration_month), Some(expiration_year), Some(cvv), Some(billing))
            if issues.is_empty() =>
        {
            Ok(ChargeRequest {
                amount,
                card_number,
                expiration_month,
                expiration_year,
                cvv,
                billing,
            })
        }
        _ => Err(issues),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn valid_payload() -> PaymentRequest {
        PaymentRequest {
            amount: Some(BigDecimal::from_str("10.00").unwrap()),
            card_number: Some("4111111111111111".to_string()),
            expiration_month: Some("12".to_string()),
            expiration_year: Some("2030".to_string()),
            cvv: Some("123".to_string()),
            billing_info: Some(BillingInfo {
                first_name: Some("A".to_string()),
                last_name: Some("B".to_string()),
                address: Some("1 Main St".to_string()),
                city: Some("X".to_string()),
                state: Some("CA".to_string()),
                zip: Some("90001".to_string()),
            }),
        }
    }

    #[test]
    fn valid_payload_passes() {
        let charge = validate_payment(valid_payload()).unwrap();
        assert_eq!(charge.card_number, "4111111111111111");
        assert_eq!(charge.billing.zip, "90001");
    }

    #[test]
    fn negative_amount_is_reported_against_the_amount_field() {
        let payload = PaymentRequest {
            amount: Some(BigDecimal::from(-5)),
            ..valid_payload()
        };

        let issues = validate_payment(payload).unwrap_err();
        assert!(issues.iter().any(|issue| issue.field == "amount"));
    }

    #[test]
    fn missing_billing_info_is_a_single_issue() {
        let payload = PaymentRequest {
            billing_info: None,
            ..valid_payload()
        };

        let issues = validate_payment(payload).unwrap_err();
        assert_eq!(issues, vec![ValidationError::new("billingInfo", "is required")]);
    }

    #[test]
    fn all_issues_are_collected_at_once() {
        let payload = PaymentRequest {
            amount: None,
            cvv: Some("".to_string()),
            billing_info: Some(BillingInfo {
                first_name: None,
                ..BillingInfo::default()
            }),
            ..valid_payload()
        };

        let issues = validate_payment(payload).unwrap_err();
        let fields: Vec<&str> = issues.iter().map(|issue| issue.field.as_str()).collect();
        assert!(fields.contains(&"amount"));
        assert!(fields.contains(&"cvv"));
        assert!(fields.contains(&"billingInfo.firstName"));
        assert!(fields.contains(&"billingInfo.zip"));
    }

    #[test]
    fn payment_payload_deserializes_from_camel_case() {
        let payload: PaymentRequest = serde_json::from_value(serde_json::json!({
            "amount": 10.00,
            "cardNumber": "4111111111111111",
            "expirationMonth": "12",
            "expirationYear": "2030",
            "cvv": "123",
            "billingInfo": {
                "firstName": "A",
                "lastName": "B",
                "address": "1 Main St",
                "city": "X",
                "state": "CA",
                "zip": "90001"
            }
        }))
        .unwrap();

        assert!(validate_payment(payload).is_ok());
    }

    #[test]
    fn transaction_view_serializes_camel_case() {
        let view = TransactionView {
            transaction_id: "txn_1".to_string(),
            status: "success".to_string(),
            amount: BigDecimal::from_str("10.00").unwrap(),
            card_last4: "1111".to_string(),
            error_message: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["transactionId"], "txn_1");
        assert_eq!(json["cardLast4"], "1111");
        assert!(json["errorMessage"].is_null());
        assert!(json.get("createdAt").is_some());
    }
}
