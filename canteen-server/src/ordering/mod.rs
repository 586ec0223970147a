//! 订单核心模块
//!
//! 下单业务规则的三个子系统：
//!
//! - [`availability`] - 时段可售引擎 (分类/菜单/单品的每日下单窗口)
//! - [`token`] - 取餐号发号器 (按日重置的原子递增序号)
//! - [`lifecycle`] - 订单生命周期 (创建/取消/支付结算)

pub mod availability;
pub mod lifecycle;
pub mod token;

pub use availability::AvailabilityEngine;
pub use lifecycle::{
    CancelOrderOutcome, CreateOrderOutcome, ItemAvailability, OrderService, ProcessPaymentOutcome,
};
pub use token::TokenSequencer;
