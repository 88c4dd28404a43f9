//! HTTP client for the Authorize.Net createTransaction API.
//!
//! Only the request/response contract is modeled here; a declined charge is
//! a normal `ChargeOutcome`, never an error. Errors are reserved for the
//! call itself failing (transport, timeout, unparseable response).

use bigdecimal::BigDecimal;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

/// Message used when the gateway declines without any error text.
const FALLBACK_DECLINE_MESSAGE: &str = "Transaction failed";

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Invalid response from gateway: {0}")]
    InvalidResponse(String),
}

/// Input for a single card charge.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub amount: BigDecimal,
    pub card_number: String,
    pub expiration_month: String,
    pub expiration_year: String,
    pub cvv: String,
    pub billing: BillingAddress,
}

#[derive(Debug, Clone)]
pub struct BillingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Normalized result of a charge attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeOutcome {
    pub success: bool,
    /// Gateway-assigned id, empty when the gateway did not return one.
    pub transaction_id: String,
    pub message: String,
}

/// Client for the gateway's createTransaction operation. Merchant
/// credentials and the target endpoint are fixed at construction.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    endpoint: String,
    api_login_id: String,
    transaction_key: String,
}

impl GatewayClient {
    pub fn new(api_login_id: String, transaction_key: String, endpoint: String) -> Self {
        // Explicit timeout so a gateway that never answers surfaces as a
        // transport error instead of hanging the request.
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        GatewayClient {
            client,
            endpoint,
            api_login_id,
            transaction_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.gateway_api_login_id.clone(),
            config.gateway_transaction_key.clone(),
            config.gateway_environment.endpoint().to_string(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submits an authCaptureTransaction for the given card and amount.
    pub async fn charge(&self, request: &ChargeRequest) -> Result<ChargeOutcome, GatewayError> {
        let envelope = CreateTransactionEnvelope {
            create_transaction_request: CreateTransactionRequest {
                merchant_authentication: MerchantAuthentication {
                    name: &self.api_login_id,
                    transaction_key: &self.transaction_key,
                },
                transaction_request: TransactionRequest {
                    transaction_type: "authCaptureTransaction",
                    amount: request.amount.to_string(),
                    payment: Payment {
                        credit_card: CreditCard {
                            card_number: &request.card_number,
                            expiration_date: format!(
                                "{}-{}",
                                request.expiration_year, request.expiration_month
                            ),
                            card_code: &request.cvv,
                        },
                    },
                    bill_to: BillTo {
                        first_name: &request.billing.first_name,
                        last_name: &request.billing.last_name,
                        address: &request.billing.address,
                        city: &request.billing.city,
                        state: &request.billing.state,
                        zip: &request.billing.zip,
                        country: "US",
                    },
                },
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&envelope)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: CreateTransactionResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(format!("status {}: {}", status, e)))?;

        Ok(outcome_from(parsed))
    }
}

/// Applies the gateway success policy: result code "Ok" plus a non-empty
/// transaction id. Everything else is a decline.
fn outcome_from(response: CreateTransactionResponse) -> ChargeOutcome {
    let transaction_id = response
        .transaction_response
        .as_ref()
        .and_then(|t| t.trans_id.clone())
        .unwrap_or_default();

    let approved =
        response.messages.result_code.eq_ignore_ascii_case("ok") && !transaction_id.is_empty();

    if approved {
        let message = response
            .messages
            .message
            .first()
            .and_then(|m| m.text.clone())
            .unwrap_or_default();

        return ChargeOutcome {
            success: true,
            transaction_id,
            message,
        };
    }

    let message = response
        .transaction_response
        .as_ref()
        .and_then(|t| t.errors.as_ref())
        .and_then(|errors| errors.first())
        .and_then(|e| e.error_text.clone())
        .unwrap_or_else(|| FALLBACK_DECLINE_MESSAGE.to_string());

    ChargeOutcome {
        success: false,
        transaction_id,
        message,
    }
}

// --- Wire types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTransactionEnvelope<'a> {
    create_transaction_request: CreateTransactionRequest<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTransactionRequest<'a> {
    merchant_authentication: MerchantAuthentication<'a>,
    transaction_request: TransactionRequest<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MerchantAuthentication<'a> {
    name: &'a str,
    transaction_key: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRequest<'a> {
    transaction_type: &'static str,
    amount: String,
    payment: Payment<'a>,
    bill_to: BillTo<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Payment<'a> {
    credit_card: CreditCard<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreditCard<'a> {
    card_number: &'a str,
    // "YYYY-MM"
    expiration_date: String,
    card_code: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BillTo<'a> {
    first_name: &'a str,
    last_name: &'a str,
    address: &'a str,
    city: &'a str,
    state: &'a str,
    zip: &'a str,
    country: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTransactionResponse {
    #[serde(default)]
    transaction_response: Option<TransactionResponse>,
    messages: ResponseMessages,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionResponse {
    #[serde(default)]
    trans_id: Option<String>,
    #[serde(default)]
    errors: Option<Vec<TransactionError>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionError {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseMessages {
    result_code: String,
    #[serde(default)]
    message: Vec<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    text: Option<String>,
}
