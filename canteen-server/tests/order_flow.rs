//! End-to-end ordering flow tests against an in-memory database

use futures::future::join_all;
use rust_decimal::Decimal;

use canteen_server::auth::permissions::{SEEDED_ROLES, action, resource};
use canteen_server::db::models::{
    ApplicableKind, Order, OrderCreateRequest, OrderItemRequest, OrderStatus, PaymentStatus,
    TimeframeCreate,
};
use canteen_server::db::repository::{
    CategoryRepository, FoodItemRepository, OrderRepository, PaymentRepository, RoleRepository,
    TimeframeRepository, UserRepository,
};
use canteen_server::ordering::TokenSequencer;
use canteen_server::utils::time::local_day_seconds;
use canteen_server::{Config, ServerState};
use shared::util::now_millis;
use surrealdb::RecordId;

const MINUTE_MILLIS: i64 = 60_000;

async fn test_state() -> ServerState {
    let mut config = Config::from_env();
    config.cancel_window_minutes = 15;
    config.token_base_offset = 101;
    ServerState::initialize_in_memory(&config).await
}

async fn admin_id(state: &ServerState) -> RecordId {
    UserRepository::new(state.get_db())
        .find_by_username("admin")
        .await
        .unwrap()
        .expect("bootstrap admin missing")
        .id
        .unwrap()
}

/// Seed one category with `n` food items, returning (category_id, item_ids)
async fn seed_catalog(state: &ServerState, n: usize) -> (String, Vec<String>) {
    let categories = CategoryRepository::new(state.get_db());
    let items = FoodItemRepository::new(state.get_db());

    let category = categories
        .create(canteen_server::db::models::CategoryCreate {
            name: "Mains".to_string(),
            description: None,
            sort_order: None,
        })
        .await
        .unwrap();
    let category_id = category.id.unwrap().to_string();

    let mut item_ids = Vec::new();
    for i in 0..n {
        let item = items
            .create(canteen_server::db::models::FoodItemCreate {
                name: format!("Dish {}", i + 1),
                description: None,
                price: Decimal::new(450, 2), // 4.50
                category: category_id.clone(),
                menu: None,
                is_available: Some(true),
            })
            .await
            .unwrap();
        item_ids.push(item.id.unwrap().to_string());
    }

    (category_id, item_ids)
}

fn order_request(item_ids: &[String]) -> OrderCreateRequest {
    OrderCreateRequest {
        items: item_ids
            .iter()
            .map(|id| OrderItemRequest {
                food_item_id: id.clone(),
                quantity: 2,
            })
            .collect(),
        payment_method: "card".to_string(),
        pay_now: false,
        customer_id: None,
    }
}

#[tokio::test]
async fn test_bootstrap_seeds_roles_and_admin() {
    let state = test_state().await;
    let roles = RoleRepository::new(state.get_db());

    for name in SEEDED_ROLES {
        let role = roles.find_by_name(name).await.unwrap();
        assert!(role.is_some(), "seeded role {} missing", name);
    }

    let super_admin = roles.find_by_name("super-admin").await.unwrap().unwrap();
    assert!(super_admin.is_system);
    assert!(super_admin.permissions.is_wildcard());

    // The store authorizes the wildcard role for anything
    let admin_roles = vec!["super-admin".to_string()];
    assert!(
        state
            .permissions()
            .authorize(&admin_roles, resource::ROLE, action::DELETE)
            .is_ok()
    );

    // Customer role follows its seeded matrix
    let customer_roles = vec!["customer".to_string()];
    assert!(
        state
            .permissions()
            .authorize(&customer_roles, resource::ORDER, action::CREATE)
            .is_ok()
    );
    assert!(
        state
            .permissions()
            .authorize(&customer_roles, resource::ROLE, action::READ)
            .is_err()
    );

    // Seeding is idempotent: re-running must not duplicate or fail
    canteen_server::db::bootstrap::seed(&state.get_db())
        .await
        .unwrap();
    let all = roles.find_all().await.unwrap();
    assert_eq!(all.len(), SEEDED_ROLES.len());
}

#[tokio::test]
async fn test_create_order_happy_path() {
    let state = test_state().await;
    let customer = admin_id(&state).await;
    let (_, item_ids) = seed_catalog(&state, 2).await;

    let outcome = state
        .order_service()
        .create_order(customer.clone(), order_request(&item_ids))
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.token.as_deref(), Some("102"));
    assert_eq!(outcome.cancel_window_minutes, Some(15));
    assert!(outcome.items.iter().all(|i| i.orderable));

    let order = outcome.order.unwrap();
    assert_eq!(order.status, OrderStatus::Created);
    // 2 items x qty 2 x 4.50
    assert_eq!(order.total_price, Decimal::new(1800, 2));

    // Exactly one linked pending payment carrying the token
    let payments = PaymentRepository::new(state.get_db());
    let payment = payments
        .find_by_order(order.id.as_ref().unwrap())
        .await
        .unwrap()
        .expect("payment row missing");
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.token, "102");
    assert_eq!(payment.amount, order.total_price);
    assert!(payment.payment_date.is_none());

    // Second order the same day gets the next token
    let outcome2 = state
        .order_service()
        .create_order(customer, order_request(&item_ids[..1]))
        .await
        .unwrap();
    assert_eq!(outcome2.token.as_deref(), Some("103"));
}

#[tokio::test]
async fn test_direct_pay_order_is_completed_and_paid() {
    let state = test_state().await;
    let customer = admin_id(&state).await;
    let (_, item_ids) = seed_catalog(&state, 1).await;

    let mut request = order_request(&item_ids);
    request.pay_now = true;

    let outcome = state
        .order_service()
        .create_order(customer, request)
        .await
        .unwrap();
    assert!(outcome.success);

    let order = outcome.order.unwrap();
    assert_eq!(order.status, OrderStatus::Completed);

    let payment = PaymentRepository::new(state.get_db())
        .find_by_order(order.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Paid);
    assert!(payment.payment_date.is_some());
}

#[tokio::test]
async fn test_unavailable_item_blocks_whole_order() {
    let state = test_state().await;
    let customer = admin_id(&state).await;
    let (_, item_ids) = seed_catalog(&state, 3).await;

    // Flip one item off
    let items = FoodItemRepository::new(state.get_db());
    items
        .update(
            &item_ids[1],
            canteen_server::db::models::FoodItemUpdate {
                name: None,
                description: None,
                price: None,
                category: None,
                menu: None,
                is_available: Some(false),
                is_active: None,
            },
        )
        .await
        .unwrap();

    let outcome = state
        .order_service()
        .create_order(customer, order_request(&item_ids))
        .await
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.order.is_none());
    assert!(outcome.token.is_none());
    assert_eq!(outcome.items.len(), 3);
    assert!(outcome.items[0].orderable);
    assert!(!outcome.items[1].orderable);
    assert!(!outcome.items[1].is_available);
    assert!(outcome.items[2].orderable);

    // Nothing persisted
    let orders = OrderRepository::new(state.get_db());
    assert_eq!(orders.count_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_closed_category_window_blocks_item() {
    let state = test_state().await;
    let customer = admin_id(&state).await;
    let (category_id, item_ids) = seed_catalog(&state, 1).await;

    // A one-second window two hours from now: certainly closed
    let closed_at = (local_day_seconds() + 7_200) % 86_400;
    TimeframeRepository::new(state.get_db())
        .create(TimeframeCreate {
            ordering_start_seconds: closed_at,
            ordering_end_seconds: closed_at,
            applicable_kind: ApplicableKind::Category,
            applicable_id: category_id,
            is_active: Some(true),
        })
        .await
        .unwrap();

    let outcome = state
        .order_service()
        .create_order(customer, order_request(&item_ids))
        .await
        .unwrap();

    assert!(!outcome.success);
    let detail = &outcome.items[0];
    assert!(detail.is_available);
    assert!(detail.item_window_open);
    assert!(!detail.category_window_open);
    assert!(!detail.orderable);
}

#[tokio::test]
async fn test_open_category_window_allows_item() {
    let state = test_state().await;
    let customer = admin_id(&state).await;
    let (category_id, item_ids) = seed_catalog(&state, 1).await;

    // A window from one hour ago to one hour ahead; wraps past midnight
    // near the day boundary, which the engine treats as overnight
    let now = local_day_seconds();
    TimeframeRepository::new(state.get_db())
        .create(TimeframeCreate {
            ordering_start_seconds: (now + 86_400 - 3_600) % 86_400,
            ordering_end_seconds: (now + 3_600) % 86_400,
            applicable_kind: ApplicableKind::Category,
            applicable_id: category_id,
            is_active: Some(true),
        })
        .await
        .unwrap();

    let outcome = state
        .order_service()
        .create_order(customer, order_request(&item_ids))
        .await
        .unwrap();
    assert!(outcome.success);
}

#[tokio::test]
async fn test_cancel_is_idempotent_and_cascades_to_payment() {
    let state = test_state().await;
    let customer = admin_id(&state).await;
    let (_, item_ids) = seed_catalog(&state, 1).await;

    let outcome = state
        .order_service()
        .create_order(customer.clone(), order_request(&item_ids))
        .await
        .unwrap();
    let order = outcome.order.unwrap();
    let order_id = order.id.as_ref().unwrap().to_string();

    // Self-service cancel by the owner
    let cancelled = state
        .order_service()
        .cancel_order(&order_id, Some(&customer), Some("changed my mind".into()))
        .await
        .unwrap();
    assert!(cancelled.success);
    let cancelled_order = cancelled.order.unwrap();
    assert_eq!(cancelled_order.status, OrderStatus::Cancelled);
    assert!(cancelled_order.cancelled_at.is_some());
    assert_eq!(cancelled_order.cancel_reason.as_deref(), Some("changed my mind"));

    let payment = PaymentRepository::new(state.get_db())
        .find_by_order(order.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Cancelled);

    // Second cancel: non-error outcome, state unchanged
    let again = state
        .order_service()
        .cancel_order(&order_id, Some(&customer), None)
        .await
        .unwrap();
    assert!(!again.success);
    assert!(again.message.contains("already been cancelled"));
    assert_eq!(again.order.unwrap().status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn test_cancel_by_other_customer_is_forbidden() {
    let state = test_state().await;
    let customer = admin_id(&state).await;
    let (_, item_ids) = seed_catalog(&state, 1).await;

    let outcome = state
        .order_service()
        .create_order(customer, order_request(&item_ids))
        .await
        .unwrap();
    let order_id = outcome.order.unwrap().id.unwrap().to_string();

    let stranger: RecordId = "user:stranger".parse().unwrap();
    let err = state
        .order_service()
        .cancel_order(&order_id, Some(&stranger), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, shared::ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_cancel_window_expiry() {
    let state = test_state().await;
    let customer = admin_id(&state).await;

    // Insert an order backdated 16 minutes; window is 15
    let orders = OrderRepository::new(state.get_db());
    let stale = orders
        .create(Order {
            id: None,
            short_id: "ORD-20260807-TEST01".to_string(),
            customer: customer.clone(),
            items: vec![],
            total_price: Decimal::new(450, 2),
            status: OrderStatus::Created,
            created_at: now_millis() - 16 * MINUTE_MILLIS,
            cancelled_at: None,
            cancel_reason: None,
        })
        .await
        .unwrap();
    let order_id = stale.id.unwrap().to_string();

    assert!(!state.order_service().is_cancel_allowed(&order_id).await.unwrap());

    let outcome = state
        .order_service()
        .cancel_order(&order_id, Some(&customer), None)
        .await
        .unwrap();
    assert!(!outcome.success);
    assert!(outcome.message.contains("expired"));
    assert_eq!(outcome.order.unwrap().status, OrderStatus::Created);

    // A fresh order inside the window is still cancellable
    let fresh = orders
        .create(Order {
            id: None,
            short_id: "ORD-20260807-TEST02".to_string(),
            customer: customer.clone(),
            items: vec![],
            total_price: Decimal::new(450, 2),
            status: OrderStatus::Created,
            created_at: now_millis() - 14 * MINUTE_MILLIS,
            cancelled_at: None,
            cancel_reason: None,
        })
        .await
        .unwrap();
    let fresh_id = fresh.id.unwrap().to_string();
    assert!(state.order_service().is_cancel_allowed(&fresh_id).await.unwrap());
    let outcome = state
        .order_service()
        .cancel_order(&fresh_id, Some(&customer), None)
        .await
        .unwrap();
    assert!(outcome.success);
}

#[tokio::test]
async fn test_process_payment_completes_order() {
    let state = test_state().await;
    let customer = admin_id(&state).await;
    let (_, item_ids) = seed_catalog(&state, 1).await;

    let outcome = state
        .order_service()
        .create_order(customer, order_request(&item_ids))
        .await
        .unwrap();
    let order_id = outcome.order.unwrap().id.unwrap().to_string();

    let paid = state
        .order_service()
        .process_payment(&order_id, Some("cash".into()))
        .await
        .unwrap();
    assert!(paid.success);
    let payment = paid.payment.unwrap();
    assert_eq!(payment.status, PaymentStatus::Paid);
    assert_eq!(payment.method, "cash");
    assert!(payment.payment_date.is_some());
    assert_eq!(paid.order.unwrap().status, OrderStatus::Completed);

    // Settling twice is a non-error outcome
    let again = state
        .order_service()
        .process_payment(&order_id, None)
        .await
        .unwrap();
    assert!(!again.success);
    assert!(again.message.contains("already been settled"));
}

#[tokio::test]
async fn test_concurrent_tokens_are_distinct_and_contiguous() {
    let state = test_state().await;
    let sequencer = TokenSequencer::new(state.get_db(), 101);

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let sequencer = sequencer.clone();
            tokio::spawn(async move {
                sequencer
                    .next_token_for_key("2026-08-07")
                    .await
                    .expect("token issue failed")
            })
        })
        .collect();

    let mut tokens: Vec<i64> = join_all(tasks)
        .await
        .into_iter()
        .map(|res| res.unwrap().parse().unwrap())
        .collect();
    tokens.sort_unstable();

    let expected: Vec<i64> = (102..122).collect();
    assert_eq!(tokens, expected);

    // The next day starts over at base + 1
    assert_eq!(
        sequencer.next_token_for_key("2026-08-08").await.unwrap(),
        "102"
    );
}

#[tokio::test]
async fn test_soft_delete_blocked_while_order_pending() {
    let state = test_state().await;
    let users = UserRepository::new(state.get_db());

    let customer = users
        .create(canteen_server::db::models::UserCreate {
            username: "carol".to_string(),
            password: "correct-horse-battery".to_string(),
            display_name: None,
            email: None,
            roles: vec![],
        })
        .await
        .unwrap();
    let customer_id = customer.id.unwrap();
    let customer_id_str = customer_id.to_string();

    let (_, item_ids) = seed_catalog(&state, 1).await;
    let outcome = state
        .order_service()
        .create_order(customer_id.clone(), order_request(&item_ids))
        .await
        .unwrap();
    let order_id = outcome.order.unwrap().id.unwrap().to_string();

    // Pending order blocks deletion
    let err = users.soft_delete(&customer_id_str, now_millis()).await;
    assert!(err.is_err());

    // Cancel it, then deletion goes through as a soft delete
    state
        .order_service()
        .cancel_order(&order_id, None, None)
        .await
        .unwrap();
    assert!(users.soft_delete(&customer_id_str, now_millis()).await.unwrap());

    let deleted = users.find_by_id(&customer_id_str).await.unwrap().unwrap();
    assert!(deleted.is_deleted);
    assert!(!deleted.is_active);
    assert!(deleted.deleted_at.is_some());

    // Soft-deleted users disappear from username lookups
    assert!(users.find_by_username("carol").await.unwrap().is_none());
}
