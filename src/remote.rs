//! External collaborators: the remote cart mirror, order persistence and
//! event publishing.
//!
//! Cart mirroring is write-only and best-effort. The in-memory store stays
//! authoritative; a failed save is logged and never rolls back the local
//! mutation or reaches the shopper. Order creation is the opposite: its
//! failure is surfaced so the review step can report it and retry.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::cart::CartLine;
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::order::{order_number, OrderDraft, OrderStatus};

/// Returns the mirrored cart for a user, if one has been saved.
pub async fn fetch_cart(db: &PgPool, user_id: &str) -> anyhow::Result<Option<Vec<CartLine>>> {
    let row: Option<(serde_json::Value,)> =
        sqlx::query_as("SELECT lines FROM carts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?;
    match row {
        Some((lines,)) => Ok(Some(serde_json::from_value(lines)?)),
        None => Ok(None),
    }
}

/// Mirrors the full cart to the remote store, fire-and-forget. The task
/// owns its data; the caller continues immediately.
pub fn spawn_cart_save(
    db: PgPool,
    nats: Option<async_nats::Client>,
    user_id: String,
    lines: Vec<CartLine>,
) {
    tokio::spawn(async move {
        match save_cart(&db, &user_id, &lines).await {
            Ok(()) => {
                let total_items = lines.iter().map(CartLine::total_quantity).sum();
                publish(
                    nats,
                    DomainEvent::Cart(CartEvent::Synced {
                        user_id,
                        line_count: lines.len(),
                        total_items,
                    }),
                )
                .await;
            }
            Err(err) => tracing::warn!(%user_id, error = %err, "cart mirror save failed"),
        }
    });
}

async fn save_cart(db: &PgPool, user_id: &str, lines: &[CartLine]) -> anyhow::Result<()> {
    let lines = serde_json::to_value(lines)?;
    sqlx::query(
        "INSERT INTO carts (user_id, lines, updated_at) VALUES ($1, $2, NOW()) \
         ON CONFLICT (user_id) DO UPDATE SET lines = $2, updated_at = NOW()",
    )
    .bind(user_id)
    .bind(lines)
    .execute(db)
    .await?;
    Ok(())
}

/// Order row as persisted. Line items and the shipping address keep their
/// full JSON shape, size breakdown included.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: String,
    pub customer_email: Option<String>,
    pub status: String,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub discount_code: Option<String>,
    pub shipping_address: serde_json::Value,
    pub line_items: serde_json::Value,
    pub notes: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Persists an order draft. Any failure here propagates to the caller so
/// checkout can stay at the review step.
pub async fn create_order(db: &PgPool, draft: &OrderDraft) -> anyhow::Result<OrderRow> {
    let row = sqlx::query_as::<_, OrderRow>(
        "INSERT INTO orders (id, order_number, customer_id, customer_email, status, subtotal, \
         shipping, tax, total, currency, payment_method, discount_code, shipping_address, \
         line_items, notes, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'SEK', $10, $11, $12, $13, $14, NOW(), NOW()) \
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(order_number())
    .bind(&draft.customer_id)
    .bind(&draft.customer_email)
    .bind(OrderStatus::Pending.as_str())
    .bind(draft.subtotal)
    .bind(draft.shipping)
    .bind(draft.tax)
    .bind(draft.total)
    .bind(&draft.payment_method_id)
    .bind(&draft.discount_code)
    .bind(serde_json::to_value(&draft.shipping_address)?)
    .bind(serde_json::to_value(&draft.line_items)?)
    .bind(&draft.notes)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Publishes an event if a broker is connected; failures are logged only.
pub fn spawn_publish(nats: Option<async_nats::Client>, event: DomainEvent) {
    tokio::spawn(async move { publish(nats, event).await });
}

async fn publish(nats: Option<async_nats::Client>, event: DomainEvent) {
    let Some(client) = nats else { return };
    let subject = event.subject();
    let payload = match serde_json::to_vec(&event) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(subject, error = %err, "event serialization failed");
            return;
        }
    };
    if let Err(err) = client.publish(subject, payload.into()).await {
        tracing::warn!(subject, error = %err, "event publish failed");
    }
}
