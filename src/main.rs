//! Kalmar Studio - custom-apparel storefront service

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use kalmar_studio::domain::cart::{CartLine, CartStore, NewCartItem};
use kalmar_studio::domain::checkout::{
    CheckoutAction, CheckoutState, CheckoutStep, CheckoutTotals, PaymentMethod, ShippingMethod,
};
use kalmar_studio::domain::events::{DomainEvent, OrderEvent};
use kalmar_studio::domain::order::{OrderDraft, OrderStatus};
use kalmar_studio::domain::pricing::display_price;
use kalmar_studio::remote::{self, OrderRow};

/// Per-session storefront state. Each browser session owns one cart and at
/// most one checkout in progress.
#[derive(Default)]
struct Sessions {
    carts: HashMap<String, CartStore>,
    checkouts: HashMap<String, CheckoutState>,
}

#[derive(Clone)]
struct AppState {
    db: sqlx::PgPool,
    nats: Option<async_nats::Client>,
    sessions: Arc<RwLock<Sessions>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&std::env::var("DATABASE_URL")?)
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let nats = match std::env::var("NATS_URL") {
        Ok(url) => match async_nats::connect(&url).await {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::warn!(error = %err, "NATS unavailable, events disabled");
                None
            }
        },
        Err(_) => None,
    };

    let state = AppState { db, nats, sessions: Arc::new(RwLock::new(Sessions::default())) };

    let app = Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "kalmar-studio"})) }))
        .route("/api/v1/products", get(list_products).post(create_product))
        .route("/api/v1/products/:id", get(get_product).put(update_product).delete(delete_product))
        .route("/api/v1/categories", get(list_categories).post(create_category))
        .route("/api/v1/categories/:id", get(get_category))
        .route("/api/v1/cart/:session", get(get_cart).delete(clear_cart))
        .route("/api/v1/cart/:session/items", post(add_item))
        .route("/api/v1/cart/:session/items/:product_id", axum::routing::delete(remove_item))
        .route("/api/v1/cart/:session/items/:product_id/sizes", post(add_size))
        .route("/api/v1/cart/:session/items/:product_id/sizes/:size", put(update_size_quantity).delete(remove_size))
        .route("/api/v1/cart/:session/restore", post(restore_cart))
        .route("/api/v1/checkout/options", get(checkout_options))
        .route("/api/v1/checkout/:session", get(get_checkout))
        .route("/api/v1/checkout/:session/actions", post(dispatch_checkout_action))
        .route("/api/v1/checkout/:session/submit", post(submit_order))
        .route("/api/v1/orders", get(list_orders))
        .route("/api/v1/orders/:id", get(get_order))
        .route("/api/v1/orders/:id/status", put(update_order_status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    tracing::info!("Kalmar Studio listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub category_id: Option<Uuid>,
    pub colors: Vec<String>,
    pub print_types: Vec<String>,
    pub materials: Vec<String>,
    pub sizes: Vec<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub category: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
}

async fn list_products(
    State(s): State<AppState>,
    Query(p): Query<ListParams>,
) -> Result<Json<PaginatedResponse<Product>>, (StatusCode, String)> {
    let page = p.page.unwrap_or(1).max(1);
    let per_page = p.per_page.unwrap_or(20).min(100);
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE status = 'active' \
         AND ($3::uuid IS NULL OR category_id = $3) \
         AND ($4::text IS NULL OR name ILIKE '%' || $4 || '%') \
         ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(per_page as i64)
    .bind(((page - 1) * per_page) as i64)
    .bind(p.category)
    .bind(&p.search)
    .fetch_all(&s.db)
    .await
    .map_err(internal)?;
    let total: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM products WHERE status = 'active' \
         AND ($1::uuid IS NULL OR category_id = $1) \
         AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')",
    )
    .bind(p.category)
    .bind(&p.search)
    .fetch_one(&s.db)
    .await
    .map_err(internal)?;
    Ok(Json(PaginatedResponse { data: products, total: total.0, page }))
}

async fn get_product(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, (StatusCode, String)> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&s.db)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom = "validate_price")]
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub print_types: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}

async fn create_product(
    State(s): State<AppState>,
    Json(r): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), (StatusCode, String)> {
    r.validate().map_err(unprocessable)?;
    let sku = format!("KS-{:06}", rand::random::<u32>() % 1_000_000);
    let p = sqlx::query_as::<_, Product>(
        "INSERT INTO products (id, sku, name, description, price, currency, category_id, colors, \
         print_types, materials, sizes, images, tags, status, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, 'SEK', $6, $7, $8, $9, $10, $11, $12, 'active', NOW(), NOW()) \
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&sku)
    .bind(&r.name)
    .bind(&r.description)
    .bind(r.price)
    .bind(r.category_id)
    .bind(&r.colors)
    .bind(&r.print_types)
    .bind(&r.materials)
    .bind(&r.sizes)
    .bind(&r.images)
    .bind(&r.tags)
    .fetch_one(&s.db)
    .await
    .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(p)))
}

async fn update_product(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<CreateProductRequest>,
) -> Result<Json<Product>, (StatusCode, String)> {
    r.validate().map_err(unprocessable)?;
    let p = sqlx::query_as::<_, Product>(
        "UPDATE products SET name = $2, description = $3, price = $4, category_id = $5, \
         colors = $6, print_types = $7, materials = $8, sizes = $9, images = $10, tags = $11, \
         updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&r.name)
    .bind(&r.description)
    .bind(r.price)
    .bind(r.category_id)
    .bind(&r.colors)
    .bind(&r.print_types)
    .bind(&r.materials)
    .bind(&r.sizes)
    .bind(&r.images)
    .bind(&r.tags)
    .fetch_optional(&s.db)
    .await
    .map_err(internal)?
    .ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))?;
    Ok(Json(p))
}

async fn delete_product(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    sqlx::query("UPDATE products SET status = 'archived', updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await
        .map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_categories(
    State(s): State<AppState>,
) -> Result<Json<Vec<Category>>, (StatusCode, String)> {
    let cats = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
        .fetch_all(&s.db)
        .await
        .map_err(internal)?;
    Ok(Json(cats))
}

async fn get_category(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>, (StatusCode, String)> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(&s.db)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
}

async fn create_category(
    State(s): State<AppState>,
    Json(r): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), (StatusCode, String)> {
    r.validate().map_err(unprocessable)?;
    let slug = r.name.to_lowercase().replace(' ', "-");
    let c = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (id, name, slug, description, parent_id, created_at) \
         VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&r.name)
    .bind(&slug)
    .bind(&r.description)
    .bind(r.parent_id)
    .fetch_one(&s.db)
    .await
    .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(c)))
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total_items: u32,
    pub subtotal: Decimal,
}

fn cart_view(cart: &CartStore) -> CartView {
    CartView {
        items: cart.lines().to_vec(),
        total_items: cart.total_items(),
        subtotal: display_price(cart.subtotal()),
    }
}

/// The signed-in shopper, if the frontend forwarded one. Only read here;
/// login and sessions live elsewhere.
fn current_user(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Applies one cart mutation under the session lock, refreshes the checkout
/// snapshot while the shopper is still on the cart step, and mirrors the
/// result for signed-in users without blocking the response.
fn mutate_cart<F>(state: &AppState, session: &str, user: Option<String>, mutation: F) -> CartView
where
    F: FnOnce(&mut CartStore),
{
    let (view, lines) = {
        let mut sessions = state.sessions.write().expect("sessions lock poisoned");
        let cart = sessions.carts.entry(session.to_string()).or_default();
        mutation(cart);
        let view = cart_view(cart);
        let lines = cart.lines().to_vec();
        if let Some(checkout) = sessions.checkouts.get_mut(session) {
            if checkout.accepts_cart_sync() {
                *checkout = checkout.apply(CheckoutAction::SetCartItems(lines.clone()));
            }
        }
        (view, lines)
    };
    if let Some(user) = user {
        remote::spawn_cart_save(state.db.clone(), state.nats.clone(), user, lines);
    }
    view
}

async fn get_cart(State(s): State<AppState>, Path(session): Path<String>) -> Json<CartView> {
    let sessions = s.sessions.read().expect("sessions lock poisoned");
    let view = sessions.carts.get(&session).map(cart_view).unwrap_or_else(|| cart_view(&CartStore::new()));
    Json(view)
}

async fn add_item(
    State(s): State<AppState>,
    Path(session): Path<String>,
    headers: HeaderMap,
    Json(item): Json<NewCartItem>,
) -> (StatusCode, Json<CartView>) {
    let view = mutate_cart(&s, &session, current_user(&headers), |cart| cart.add_item(item));
    (StatusCode::CREATED, Json(view))
}

async fn remove_item(
    State(s): State<AppState>,
    Path((session, product_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Json<CartView> {
    Json(mutate_cart(&s, &session, current_user(&headers), |cart| cart.remove_item(&product_id)))
}

#[derive(Debug, Deserialize)]
pub struct AddSizeRequest {
    pub size: String,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

async fn add_size(
    State(s): State<AppState>,
    Path((session, product_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(r): Json<AddSizeRequest>,
) -> Json<CartView> {
    Json(mutate_cart(&s, &session, current_user(&headers), |cart| {
        cart.add_size(&product_id, &r.size, r.quantity)
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

async fn update_size_quantity(
    State(s): State<AppState>,
    Path((session, product_id, size)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(r): Json<UpdateQuantityRequest>,
) -> Json<CartView> {
    Json(mutate_cart(&s, &session, current_user(&headers), |cart| {
        cart.update_size_quantity(&product_id, &size, r.quantity)
    }))
}

async fn remove_size(
    State(s): State<AppState>,
    Path((session, product_id, size)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Json<CartView> {
    Json(mutate_cart(&s, &session, current_user(&headers), |cart| {
        cart.remove_size(&product_id, &size)
    }))
}

async fn clear_cart(
    State(s): State<AppState>,
    Path(session): Path<String>,
    headers: HeaderMap,
) -> Json<CartView> {
    Json(mutate_cart(&s, &session, current_user(&headers), |cart| cart.clear()))
}

/// Replaces the local cart with the remote mirror after login. No merge;
/// the mirror is not written back.
async fn restore_cart(
    State(s): State<AppState>,
    Path(session): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CartView>, (StatusCode, String)> {
    let user = current_user(&headers)
        .ok_or((StatusCode::BAD_REQUEST, "x-user-id header required".to_string()))?;
    let lines = remote::fetch_cart(&s.db, &user)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "no saved cart".to_string()))?;
    let mut sessions = s.sessions.write().expect("sessions lock poisoned");
    let cart = sessions.carts.entry(session.clone()).or_default();
    cart.replace_all(lines);
    let view = cart_view(cart);
    let snapshot = cart.lines().to_vec();
    if let Some(checkout) = sessions.checkouts.get_mut(&session) {
        if checkout.accepts_cart_sync() {
            *checkout = checkout.apply(CheckoutAction::SetCartItems(snapshot));
        }
    }
    Ok(Json(view))
}

// =============================================================================
// Checkout
// =============================================================================

#[derive(Debug, Serialize)]
pub struct CheckoutView {
    #[serde(flatten)]
    pub state: CheckoutState,
    pub totals: CheckoutTotals,
}

fn checkout_view(state: &CheckoutState) -> CheckoutView {
    CheckoutView { totals: state.totals(), state: state.clone() }
}

/// Shipping and payment options presented during checkout.
async fn checkout_options() -> Json<serde_json::Value> {
    let shipping: Vec<ShippingMethod> = vec![
        ShippingMethod { id: "standard".into(), name: "Standard (3-5 days)".into(), price: Decimal::new(599, 2) },
        ShippingMethod { id: "express".into(), name: "Express (1-2 days)".into(), price: Decimal::new(1250, 2) },
    ];
    let payment: Vec<PaymentMethod> = vec![
        PaymentMethod { id: "card".into(), name: "Card".into() },
        PaymentMethod { id: "swish".into(), name: "Swish".into() },
        PaymentMethod { id: "invoice".into(), name: "Invoice".into() },
    ];
    Json(serde_json::json!({ "shipping_methods": shipping, "payment_methods": payment }))
}

/// Entering checkout creates the state on first access: everything unset,
/// step at `cart`, seeded with a snapshot of the session's cart.
async fn get_checkout(State(s): State<AppState>, Path(session): Path<String>) -> Json<CheckoutView> {
    let mut sessions = s.sessions.write().expect("sessions lock poisoned");
    let snapshot = sessions.carts.get(&session).map(|c| c.lines().to_vec()).unwrap_or_default();
    let checkout = sessions
        .checkouts
        .entry(session)
        .or_insert_with(|| CheckoutState::new().apply(CheckoutAction::SetCartItems(snapshot)));
    Json(checkout_view(checkout))
}

async fn dispatch_checkout_action(
    State(s): State<AppState>,
    Path(session): Path<String>,
    Json(action): Json<CheckoutAction>,
) -> Result<Json<CheckoutView>, (StatusCode, String)> {
    if let CheckoutAction::SetCustomer(ref customer) = action {
        customer.validate().map_err(unprocessable)?;
    }
    let mut sessions = s.sessions.write().expect("sessions lock poisoned");
    let checkout = sessions.checkouts.entry(session).or_default();
    *checkout = checkout.apply(action);
    Ok(Json(checkout_view(checkout)))
}

/// Serializes the checkout into an order and persists it. On failure the
/// state stays at review and the same call can be retried; on success the
/// order id is stored and the flow moves to confirmation.
async fn submit_order(
    State(s): State<AppState>,
    Path(session): Path<String>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<OrderRow>), (StatusCode, String)> {
    let checkout = s
        .sessions
        .read()
        .expect("sessions lock poisoned")
        .checkouts
        .get(&session)
        .cloned()
        .ok_or((StatusCode::CONFLICT, "no checkout in progress".to_string()))?;
    let draft = OrderDraft::from_checkout(&checkout).map_err(unprocessable)?;

    let row = match remote::create_order(&s.db, &draft).await {
        Ok(row) => row,
        Err(err) => {
            tracing::error!(%session, error = %err, "order creation failed");
            return Err((StatusCode::BAD_GATEWAY, "order could not be placed, please try again".to_string()));
        }
    };

    {
        let mut sessions = s.sessions.write().expect("sessions lock poisoned");
        if let Some(checkout) = sessions.checkouts.get_mut(&session) {
            checkout.order_id = Some(row.id.to_string());
            checkout.step = CheckoutStep::Confirmation;
        }
        if let Some(cart) = sessions.carts.get_mut(&session) {
            cart.clear();
        }
    }
    if let Some(user) = current_user(&headers) {
        remote::spawn_cart_save(s.db.clone(), s.nats.clone(), user, Vec::new());
    }
    remote::spawn_publish(
        s.nats.clone(),
        DomainEvent::Order(OrderEvent::Placed {
            order_id: row.id.to_string(),
            order_number: row.order_number.clone(),
            total: row.total,
        }),
    );
    Ok((StatusCode::CREATED, Json(row)))
}

// =============================================================================
// Orders (dashboard)
// =============================================================================

async fn list_orders(
    State(s): State<AppState>,
    Query(p): Query<ListParams>,
) -> Result<Json<PaginatedResponse<OrderRow>>, (StatusCode, String)> {
    let page = p.page.unwrap_or(1).max(1);
    let per_page = p.per_page.unwrap_or(20).min(100);
    let orders = sqlx::query_as::<_, OrderRow>(
        "SELECT * FROM orders ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(per_page as i64)
    .bind(((page - 1) * per_page) as i64)
    .fetch_all(&s.db)
    .await
    .map_err(internal)?;
    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&s.db)
        .await
        .map_err(internal)?;
    Ok(Json(PaginatedResponse { data: orders, total: total.0, page }))
}

async fn get_order(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderRow>, (StatusCode, String)> {
    sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(&s.db)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

async fn update_order_status(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<UpdateStatusRequest>,
) -> Result<Json<OrderRow>, (StatusCode, String)> {
    let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(&s.db)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))?;
    let current: OrderStatus = row.status.parse().map_err(internal)?;
    if !current.can_transition_to(r.status) {
        return Err((
            StatusCode::CONFLICT,
            format!("cannot move order from {} to {}", current.as_str(), r.status.as_str()),
        ));
    }
    let updated = sqlx::query_as::<_, OrderRow>(
        "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(r.status.as_str())
    .fetch_one(&s.db)
    .await
    .map_err(internal)?;
    remote::spawn_publish(
        s.nats.clone(),
        DomainEvent::Order(OrderEvent::StatusChanged {
            order_id: updated.id.to_string(),
            status: updated.status.clone(),
        }),
    );
    Ok(Json(updated))
}

// =============================================================================
// Error mapping
// =============================================================================

fn internal<E: std::fmt::Display>(err: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

fn unprocessable<E: std::fmt::Display>(err: E) -> (StatusCode, String) {
    (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
}
