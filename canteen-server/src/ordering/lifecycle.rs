//! Order Lifecycle
//!
//! Orchestrates order creation, cancellation and payment settlement.
//!
//! State machine: `Created -> {Processing, Completed, Cancelled}`,
//! `Processing -> {Completed, Cancelled}`; `Completed` and `Cancelled` are
//! terminal. Direct-pay creation starts at `Completed`, deferred-pay at
//! `Created`.
//!
//! "Items unavailable", "already cancelled" and "cancellation window
//! expired" are ordinary business outcomes, reported through the `success`
//! flag of the outcome structs below - only infrastructure, validation and
//! authorization failures surface as errors.

use rust_decimal::Decimal;
use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{
    ApplicableKind, Order, OrderCreateRequest, OrderLineItem, OrderStatus, Payment, PaymentStatus,
};
use crate::db::repository::{FoodItemRepository, OrderRepository, PaymentRepository};
use crate::ordering::availability::AvailabilityEngine;
use crate::ordering::token::TokenSequencer;
use shared::util::{now_millis, order_short_id};
use shared::{AppError, AppResult, ErrorCode};

/// Per-item availability detail, returned on partial failure so the caller
/// can show exactly which lines blocked the order
#[derive(Debug, Clone, Serialize)]
pub struct ItemAvailability {
    pub food_item_id: String,
    pub name: String,
    /// Manual availability switch on the item
    pub is_available: bool,
    /// Item-level window currently open
    pub item_window_open: bool,
    /// Category-level window currently open
    pub category_window_open: bool,
    /// All checks passed
    pub orderable: bool,
}

impl ItemAvailability {
    fn passes(&self) -> bool {
        self.orderable
    }
}

/// Result of an order creation attempt
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    /// Pickup token of the created order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// How long the customer may still cancel, in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_window_minutes: Option<i64>,
    pub items: Vec<ItemAvailability>,
}

/// Result of a cancellation attempt
#[derive(Debug, Clone, Serialize)]
pub struct CancelOrderOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}

/// Result of a payment settlement attempt
#[derive(Debug, Clone, Serialize)]
pub struct ProcessPaymentOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}

/// Order lifecycle service
#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    payments: PaymentRepository,
    food_items: FoodItemRepository,
    availability: AvailabilityEngine,
    sequencer: TokenSequencer,
    cancel_window_minutes: i64,
}

impl OrderService {
    pub fn new(db: Surreal<Db>, cancel_window_minutes: i64, token_base_offset: i64) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            payments: PaymentRepository::new(db.clone()),
            food_items: FoodItemRepository::new(db.clone()),
            availability: AvailabilityEngine::new(db.clone()),
            sequencer: TokenSequencer::new(db, token_base_offset),
            cancel_window_minutes,
        }
    }

    /// Create an order together with its payment row
    ///
    /// Every requested line is checked first (manual availability switch,
    /// item window, category window). If any line fails, nothing is
    /// persisted and the outcome carries the per-item report. Otherwise the
    /// writes run in sequence: order, pickup token, payment. A failure after
    /// the order write leaves a detectable order-without-payment (see
    /// `OrderRepository::find_missing_payment`); the token counter itself
    /// never double-issues.
    pub async fn create_order(
        &self,
        customer: RecordId,
        request: OrderCreateRequest,
    ) -> AppResult<CreateOrderOutcome> {
        if request.items.is_empty() {
            return Err(AppError::new(ErrorCode::OrderEmpty));
        }
        if request.payment_method.trim().is_empty() {
            return Err(AppError::new(ErrorCode::PaymentInvalidMethod));
        }
        for line in &request.items {
            if line.quantity <= 0 {
                return Err(AppError::validation(format!(
                    "Quantity must be positive for item {}",
                    line.food_item_id
                )));
            }
        }

        // Check every line before persisting anything
        let mut report = Vec::with_capacity(request.items.len());
        let mut line_items = Vec::with_capacity(request.items.len());
        let mut total_price = Decimal::ZERO;

        for line in &request.items {
            let item = self
                .food_items
                .find_by_id(&line.food_item_id)
                .await?
                .ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::FoodItemNotFound,
                        format!("Food item {} not found", line.food_item_id),
                    )
                })?;

            let item_id = item
                .id
                .clone()
                .ok_or_else(|| AppError::internal("Food item record missing id"))?;

            let is_available = item.is_available && item.is_active;
            let item_window_open = self
                .availability
                .is_ordering_allowed_for(ApplicableKind::FoodItem, &item_id)
                .await?;
            let category_window_open = self
                .availability
                .is_ordering_allowed_for(ApplicableKind::Category, &item.category)
                .await?;

            report.push(ItemAvailability {
                food_item_id: item_id.to_string(),
                name: item.name.clone(),
                is_available,
                item_window_open,
                category_window_open,
                orderable: is_available && item_window_open && category_window_open,
            });

            let line_total = item.price * Decimal::from(line.quantity);
            total_price += line_total;
            line_items.push(OrderLineItem {
                food_item: item_id,
                name: item.name,
                unit_price: item.price,
                quantity: line.quantity,
                line_total,
            });
        }

        if !report.iter().all(ItemAvailability::passes) {
            return Ok(CreateOrderOutcome {
                success: false,
                message: "Some items are not currently orderable".to_string(),
                order: None,
                token: None,
                cancel_window_minutes: None,
                items: report,
            });
        }

        let now = now_millis();
        let status = if request.pay_now {
            OrderStatus::Completed
        } else {
            OrderStatus::Created
        };

        let order = Order {
            id: None,
            short_id: order_short_id(),
            customer,
            items: line_items,
            total_price,
            status,
            created_at: now,
            cancelled_at: None,
            cancel_reason: None,
        };

        let created = self.orders.create(order).await?;
        let order_id = created
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Created order missing id"))?;

        let token = match self.sequencer.next_token().await {
            Ok(token) => token,
            Err(e) => {
                // The order row exists without a payment; reconciliation
                // finds it via find_missing_payment.
                tracing::error!(
                    order = %order_id,
                    short_id = %created.short_id,
                    error = %e,
                    "Token acquisition failed after order persist"
                );
                return Err(AppError::with_message(ErrorCode::CounterError, e.to_string()));
            }
        };

        let payment = Payment {
            id: None,
            order_id: order_id.clone(),
            amount: created.total_price,
            method: request.payment_method.clone(),
            status: if request.pay_now {
                PaymentStatus::Paid
            } else {
                PaymentStatus::Pending
            },
            token: token.clone(),
            payment_date: request.pay_now.then_some(now),
            created_at: now,
        };

        if let Err(e) = self.payments.create(payment).await {
            tracing::error!(
                order = %order_id,
                short_id = %created.short_id,
                token = %token,
                error = %e,
                "Payment persist failed after token assignment"
            );
            return Err(e.into());
        }

        tracing::info!(
            order = %order_id,
            short_id = %created.short_id,
            token = %token,
            total = %created.total_price,
            "Order created"
        );

        Ok(CreateOrderOutcome {
            success: true,
            message: "Order created".to_string(),
            order: Some(created),
            token: Some(token),
            cancel_window_minutes: Some(self.cancel_window_minutes),
            items: report,
        })
    }

    /// Cancel an order
    ///
    /// Idempotent on already-cancelled orders. When `requesting_user` is
    /// supplied (self-service path) the order must belong to that user; a
    /// mismatch is an authorization failure, not a not-found. Outside the
    /// cancellation window the attempt is a non-error outcome and the order
    /// is left untouched.
    pub async fn cancel_order(
        &self,
        order_id: &str,
        requesting_user: Option<&RecordId>,
        reason: Option<String>,
    ) -> AppResult<CancelOrderOutcome> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {} not found", order_id),
                )
            })?;

        if order.status == OrderStatus::Cancelled {
            return Ok(CancelOrderOutcome {
                success: false,
                message: "Order has already been cancelled".to_string(),
                order: Some(order),
            });
        }

        if let Some(user) = requesting_user
            && order.customer != *user
        {
            return Err(AppError::forbidden("You can only cancel your own orders"));
        }

        if order.status == OrderStatus::Completed {
            return Ok(CancelOrderOutcome {
                success: false,
                message: "Completed orders can no longer be cancelled".to_string(),
                order: Some(order),
            });
        }

        let now = now_millis();
        if !cancel_allowed(order.created_at, now, self.cancel_window_minutes) {
            return Ok(CancelOrderOutcome {
                success: false,
                message: format!(
                    "Cancellation window of {} minutes has expired",
                    self.cancel_window_minutes
                ),
                order: Some(order),
            });
        }

        let id = order
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Order record missing id"))?;
        let cancelled = self.orders.mark_cancelled(&id, reason, now).await?;
        self.payments.cancel_for_order(&id).await?;

        tracing::info!(order = %id, short_id = %cancelled.short_id, "Order cancelled");

        Ok(CancelOrderOutcome {
            success: true,
            message: "Order cancelled".to_string(),
            order: Some(cancelled),
        })
    }

    /// Whether an order may still be cancelled right now
    pub async fn is_cancel_allowed(&self, order_id: &str) -> AppResult<bool> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {} not found", order_id),
                )
            })?;
        Ok(cancel_allowed(
            order.created_at,
            now_millis(),
            self.cancel_window_minutes,
        ))
    }

    /// Settle an order's payment: payment -> PAID, order -> COMPLETED
    ///
    /// Independent of the cancellation window; no re-validation happens
    /// here. Cancelled orders and already-settled payments are reported as
    /// non-error outcomes.
    pub async fn process_payment(
        &self,
        order_id: &str,
        method: Option<String>,
    ) -> AppResult<ProcessPaymentOutcome> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {} not found", order_id),
                )
            })?;

        if order.status == OrderStatus::Cancelled {
            return Ok(ProcessPaymentOutcome {
                success: false,
                message: "Order has been cancelled".to_string(),
                payment: None,
                order: Some(order),
            });
        }

        let id = order
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Order record missing id"))?;

        let payment = self.payments.find_by_order(&id).await?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::PaymentNotFound,
                format!("No payment linked to order {}", order_id),
            )
        })?;

        if payment.status == PaymentStatus::Paid {
            return Ok(ProcessPaymentOutcome {
                success: false,
                message: "Payment has already been settled".to_string(),
                payment: Some(payment),
                order: Some(order),
            });
        }

        let payment_id = payment
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Payment record missing id"))?;

        let paid = self
            .payments
            .mark_paid(&payment_id, method, now_millis())
            .await?;
        let completed = self.orders.set_status(&id, OrderStatus::Completed).await?;

        tracing::info!(
            order = %id,
            short_id = %completed.short_id,
            token = %paid.token,
            "Payment settled"
        );

        Ok(ProcessPaymentOutcome {
            success: true,
            message: "Payment settled".to_string(),
            payment: Some(paid),
            order: Some(completed),
        })
    }
}

/// Whether a cancellation at `now_millis` is inside the window
///
/// The deadline itself is still allowed (`now <= created_at + window`).
pub fn cancel_allowed(created_at_millis: i64, now_millis: i64, window_minutes: i64) -> bool {
    let deadline = created_at_millis + window_minutes * 60_000;
    now_millis <= deadline
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: i64 = 60_000;

    #[test]
    fn test_cancel_allowed_inside_window() {
        let t0 = 1_700_000_000_000;
        assert!(cancel_allowed(t0, t0, 15));
        assert!(cancel_allowed(t0, t0 + 14 * MINUTE, 15));
    }

    #[test]
    fn test_cancel_allowed_at_deadline() {
        let t0 = 1_700_000_000_000;
        assert!(cancel_allowed(t0, t0 + 15 * MINUTE, 15));
        assert!(!cancel_allowed(t0, t0 + 15 * MINUTE + 1, 15));
    }

    #[test]
    fn test_cancel_rejected_after_window() {
        let t0 = 1_700_000_000_000;
        assert!(!cancel_allowed(t0, t0 + 16 * MINUTE, 15));
    }

    #[test]
    fn test_zero_window_allows_only_same_instant() {
        let t0 = 1_700_000_000_000;
        assert!(cancel_allowed(t0, t0, 0));
        assert!(!cancel_allowed(t0, t0 + 1, 0));
    }
}
