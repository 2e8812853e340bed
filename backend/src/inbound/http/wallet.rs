//! Withdrawal HTTP handlers.
//!
//! ```text
//! POST /api/v1/withdrawals
//! GET  /api/v1/withdrawals
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{WithdrawalReceipt, WithdrawalRequestForm, WithdrawalView};
use crate::domain::{DomainError, Taka, WithdrawalMethod, WithdrawalRequest};
use crate::inbound::http::auth::TelegramAuth;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Body for creating a withdrawal request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawBody {
    /// Amount in whole taka.
    pub amount: i64,
    /// Payout channel tag (`bkash`, `nagad`, `rocket`, `upay`, `bank`,
    /// `crypto`).
    pub method: String,
    pub account_number: Option<String>,
    pub account_name: Option<String>,
    pub bank_name: Option<String>,
    pub crypto_symbol: Option<String>,
}

/// A withdrawal request as stored.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalResponse {
    pub id: String,
    /// Amount in whole taka.
    pub amount: i64,
    pub method: String,
    pub account_number: String,
    pub account_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crypto_symbol: Option<String>,
    /// `pending`, `approved`, or `rejected`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<String>,
    pub created_at: String,
}

impl From<WithdrawalRequest> for WithdrawalResponse {
    fn from(request: WithdrawalRequest) -> Self {
        Self {
            id: request.id.to_string(),
            amount: request.amount.amount(),
            method: request.method.as_str().to_owned(),
            account_number: request.account_number,
            account_name: request.account_name,
            bank_name: request.bank_name,
            crypto_symbol: request.crypto_symbol,
            status: request.status.as_str().to_owned(),
            admin_notes: request.admin_notes,
            processed_at: request.processed_at.map(|at| at.to_rfc3339()),
            created_at: request.created_at.to_rfc3339(),
        }
    }
}

/// Receipt for a freshly queued withdrawal.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalReceiptResponse {
    pub request: WithdrawalResponse,
    /// Balance confirmed by the store after deduction.
    pub new_balance: i64,
}

impl From<WithdrawalReceipt> for WithdrawalReceiptResponse {
    fn from(receipt: WithdrawalReceipt) -> Self {
        Self {
            request: receipt.request.into(),
            new_balance: receipt.new_balance.amount(),
        }
    }
}

/// A history row with its refund classification.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalViewResponse {
    #[serde(flatten)]
    pub request: WithdrawalResponse,
    /// `refunded` or `forfeited`; present only for rejected requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
}

impl From<WithdrawalView> for WithdrawalViewResponse {
    fn from(view: WithdrawalView) -> Self {
        Self {
            request: view.request.into(),
            rejection: view.rejection.map(|outcome| {
                match outcome {
                    crate::domain::RejectionOutcome::Refunded => "refunded",
                    crate::domain::RejectionOutcome::Forfeited => "forfeited",
                }
                .to_owned()
            }),
        }
    }
}

/// Queue a withdrawal, deducting the amount from the balance.
#[utoipa::path(
    post,
    path = "/api/v1/withdrawals",
    request_body = WithdrawBody,
    responses(
        (status = 200, description = "Withdrawal queued", body = WithdrawalReceiptResponse),
        (status = 400, description = "Validation failed", body = DomainError)
    ),
    tags = ["wallet"],
    operation_id = "requestWithdrawal"
)]
#[post("/withdrawals")]
pub async fn request_withdrawal(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
    body: web::Json<WithdrawBody>,
) -> ApiResult<web::Json<WithdrawalReceiptResponse>> {
    let body = body.into_inner();
    let method: WithdrawalMethod = body
        .method
        .parse()
        .map_err(|error: crate::domain::withdrawal::ParseWithdrawalMethodError| {
            DomainError::invalid_request(error.to_string())
        })?;
    let receipt = state
        .wallet
        .request_withdrawal(WithdrawalRequestForm {
            user: auth.user().clone(),
            amount: Taka::new(body.amount),
            method,
            account_number: body.account_number,
            account_name: body.account_name,
            bank_name: body.bank_name,
            crypto_symbol: body.crypto_symbol,
        })
        .await?;
    Ok(web::Json(receipt.into()))
}

/// The caller's withdrawal history, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/withdrawals",
    responses(
        (status = 200, description = "History", body = [WithdrawalViewResponse])
    ),
    tags = ["wallet"],
    operation_id = "withdrawalHistory"
)]
#[get("/withdrawals")]
pub async fn withdrawal_history(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<WithdrawalViewResponse>>> {
    let history = state.wallet.history(auth.user()).await?;
    Ok(web::Json(
        history.into_iter().map(WithdrawalViewResponse::from).collect(),
    ))
}
