//! Route definitions for the StockLedger API

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (login public, user management protected)
        .nest("/auth", auth_routes())
        // Protected routes
        .nest("/params", param_routes())
        .nest("/categories", category_routes())
        .nest("/warehouses", warehouse_routes())
        .nest("/products", product_routes())
        .nest("/lots", lot_routes())
        .nest("/transactions", transaction_routes())
        .nest("/expenses", expense_routes())
        .route(
            "/settlement",
            post(handlers::settle_period)
                .route_layer(middleware::from_fn(auth_middleware)),
        )
}

/// Authentication and user management routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .nest("/users", user_routes())
        .route(
            "/roles",
            get(handlers::list_roles).route_layer(middleware::from_fn(auth_middleware)),
        )
}

/// User management routes (protected, admin-gated in handlers)
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route("/by-login/:login", get(handlers::get_user))
        .route(
            "/:user_id",
            delete(handlers::delete_user),
        )
        .route("/:user_id/password", put(handlers::update_password))
        .route("/:user_id/role", put(handlers::update_user_role))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Accounting parameter routes (protected)
fn param_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_params).post(handlers::create_param))
        .route("/:key", get(handlers::get_param).put(handlers::update_param))
        .route("/:key/increment", post(handlers::increment_param))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Category routes (protected)
fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/:category_id",
            get(handlers::get_category).put(handlers::rename_category),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Warehouse routes (protected)
fn warehouse_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_warehouses).post(handlers::create_warehouse),
        )
        .route(
            "/:warehouse_id",
            get(handlers::get_warehouse).put(handlers::rename_warehouse),
        )
        .route(
            "/:warehouse_id/address",
            put(handlers::change_warehouse_address),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::rename_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/lots", get(handlers::get_product_lots))
        .route(
            "/:product_id/transactions",
            get(handlers::get_product_transactions)
                .delete(handlers::delete_product_transactions),
        )
        .route("/:product_id/active-lot", put(handlers::promote_lot))
        .route(
            "/:product_id/active-lot/advance",
            post(handlers::advance_active_lot),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Lot routes (protected)
fn lot_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_lot))
        .route("/:lot_id", get(handlers::get_lot))
        .route("/:lot_id/warehouse", put(handlers::move_lot_warehouse))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Transaction routes (protected)
fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_transactions).post(handlers::record_transaction),
        )
        .route("/type/:tx_type", get(handlers::list_transactions_by_type))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Expense routes (protected)
fn expense_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_expenses_in_range).post(handlers::record_expense),
        )
        .route(
            "/:expense_id",
            get(handlers::get_expense).delete(handlers::delete_expense),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}
