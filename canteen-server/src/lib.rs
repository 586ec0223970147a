//! Canteen Server - 食堂在线点餐后端
//!
//! # 架构概述
//!
//! 本模块是点餐后端的主入口，提供以下核心功能：
//!
//! - **订单核心** (`ordering`): 可售窗口、取餐号发号、订单生命周期
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证授权** (`auth`): JWT + Argon2 + 动态权限矩阵
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! canteen-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、权限矩阵
//! ├── db/            # 数据库层 (模型、仓储、种子数据)
//! ├── ordering/      # 可售引擎、取餐号、订单生命周期
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod ordering;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, PermissionStore};
pub use core::{Config, Server, ServerState};
pub use ordering::{AvailabilityEngine, OrderService, TokenSequencer};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional; ignore a missing file
    let _ = dotenv::dotenv();

    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(None, log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______            __
  / ____/___ _____  / /____  ___  ____
 / /   / __ `/ __ \/ __/ _ \/ _ \/ __ \
/ /___/ /_/ / / / / /_/  __/  __/ / / /
\____/\__,_/_/ /_/\__/\___/\___/_/ /_/
    "#
    );
}
