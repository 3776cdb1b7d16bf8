//! Customer endpoints.
//!
//! - GET /api/customers - Active customers
//! - GET /api/customers/:id - One customer
//! - GET /api/customers/document/:document - Customer by document number
//! - GET /api/customers/email/:email - Customer by email
//! - POST /api/customers - Register a customer
//! - PUT /api/customers/:id - Replace a customer's fields
//! - DELETE /api/customers/:id - Soft-delete a customer

use super::{command, execute, query};
use crate::error::AppError;
use crate::extractors::{ApiJson, ApiPath};
use crate::server::AppState;
use axum::{extract::State, http::StatusCode, Json};
use cinereservas::{Created, Customer, CustomerDraft, CustomerId, ReservationAction};

/// List active customers.
pub async fn list_customers(State(app): State<AppState>) -> Json<Vec<Customer>> {
    Json(
        app.store
            .state(|s| s.active_customers().into_iter().cloned().collect())
            .await,
    )
}

/// Get one customer.
///
/// # Errors
///
/// 404 if the customer is missing or deleted.
pub async fn get_customer(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<Json<Customer>, AppError> {
    let customer = query(&app, |s| s.customer(CustomerId::new(id)).cloned()).await?;
    Ok(Json(customer))
}

/// Find a customer by document number.
///
/// # Errors
///
/// 404 if no active customer has that document.
pub async fn customer_by_document(
    State(app): State<AppState>,
    ApiPath(document): ApiPath<String>,
) -> Result<Json<Customer>, AppError> {
    let customer = query(&app, |s| s.customer_by_document(&document).cloned()).await?;
    Ok(Json(customer))
}

/// Find a customer by email.
///
/// # Errors
///
/// 404 if no active customer has that email.
pub async fn customer_by_email(
    State(app): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> Result<Json<Customer>, AppError> {
    let customer = query(&app, |s| s.customer_by_email(&email).cloned()).await?;
    Ok(Json(customer))
}

/// Register a customer.
///
/// # Errors
///
/// 400 for invalid fields, 409 if the document or email is taken.
pub async fn create_customer(
    State(app): State<AppState>,
    ApiJson(draft): ApiJson<CustomerDraft>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let customer = command(&app, ReservationAction::RegisterCustomer { draft }, |s| {
        match s.last_created {
            Some(Created::Customer(id)) => s.customers.get(&id).cloned(),
            _ => None,
        }
    })
    .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// Replace a customer's fields.
///
/// # Errors
///
/// 404 for an unknown customer, 400 for invalid fields, 409 if the
/// document or email is taken.
pub async fn update_customer(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
    ApiJson(draft): ApiJson<CustomerDraft>,
) -> Result<Json<Customer>, AppError> {
    let customer_id = CustomerId::new(id);
    let customer = command(
        &app,
        ReservationAction::UpdateCustomer { customer_id, draft },
        |s| s.customers.get(&customer_id).cloned(),
    )
    .await?;

    Ok(Json(customer))
}

/// Soft-delete a customer.
///
/// # Errors
///
/// 404 if the customer is missing or already deleted.
pub async fn delete_customer(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<StatusCode, AppError> {
    execute(
        &app,
        ReservationAction::DeleteCustomer {
            customer_id: CustomerId::new(id),
        },
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
