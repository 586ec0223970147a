//! Database Models

// Serde helpers
pub mod serde_helpers;

// Auth
pub mod role;
pub mod user;

// Catalog Domain
pub mod category;
pub mod food_item;
pub mod menu;

// Ordering
pub mod order;
pub mod payment;
pub mod timeframe;

// Re-exports
pub use role::{Role, RoleCreate, RoleId, RoleUpdate};
pub use user::{User, UserCreate, UserId, UserUpdate};
pub use category::{Category, CategoryCreate, CategoryId, CategoryUpdate};
pub use food_item::{FoodItem, FoodItemCreate, FoodItemId, FoodItemUpdate};
pub use menu::{Menu, MenuCreate, MenuId, MenuUpdate};
pub use order::{
    Order, OrderCancelRequest, OrderCreateRequest, OrderId, OrderItemRequest, OrderLineItem,
    OrderStatus,
};
pub use payment::{Payment, PaymentCounter, PaymentId, PaymentStatus, ProcessPaymentRequest};
pub use timeframe::{
    ApplicableKind, MAX_DAY_SECONDS, OrderTimeFrame, TimeframeCreate, TimeframeId, TimeframeUpdate,
};
