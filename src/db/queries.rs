use sqlx::{PgPool, Result};
use uuid::Uuid;

use crate::db::models::{SUBSCRIPTION_ACTIVE, SUBSCRIPTION_CANCELED, Subscription, Transaction};

// --- Transaction queries ---

pub async fn insert_transaction(pool: &PgPool, tx: &Transaction) -> Result<Transaction> {
    sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (
            id, amount, status, transaction_id, error_message, card_last4, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(tx.id)
    .bind(&tx.amount)
    .bind(&tx.status)
    .bind(&tx.transaction_id)
    .bind(&tx.error_message)
    .bind(&tx.card_last4)
    .bind(tx.created_at)
    .fetch_one(pool)
    .await
}

/// Looks up a transaction by its gateway-assigned id.
pub async fn get_transaction_by_gateway_id(
    pool: &PgPool,
    transaction_id: &str,
) -> Result<Option<Transaction>> {
    sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE transaction_id = $1")
        .bind(transaction_id)
        .fetch_optional(pool)
        .await
}

// --- Subscription queries ---

/// Finds a subscription by external id, but only while it is still active.
pub async fn find_active_subscription(
    pool: &PgPool,
    subscription_id: &str,
) -> Result<Option<Subscription>> {
    sqlx::query_as::<_, Subscription>(
        "SELECT * FROM subscriptions WHERE subscription_id = $1 AND status = $2",
    )
    .bind(subscription_id)
    .bind(SUBSCRIPTION_ACTIVE)
    .fetch_optional(pool)
    .await
}

pub async fn cancel_subscription(pool: &PgPool, id: Uuid) -> Result<()> {
    sqlx::query("UPDATE subscriptions SET status = $1, updated_at = NOW() WHERE id = $2")
        .bind(SUBSCRIPTION_CANCELED)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
