//! 认证与授权模块
//!
//! - [`jwt`] - JWT 令牌服务
//! - [`permissions`] - 动态权限矩阵与存储
//! - [`middleware`] - 认证/授权中间件
//! - [`extractor`] - CurrentUser 提取器

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{CurrentUserExt, require_auth, require_permission};
pub use permissions::{PermissionMatrix, PermissionStore};

/// 已认证用户 - 由认证中间件注入请求扩展
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID ("user:xxx")
    pub id: String,
    /// 用户名
    pub username: String,
    /// 用户持有的角色名称
    pub roles: Vec<String>,
}

impl CurrentUser {
    /// 是否持有指定角色
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            roles: claims.roles,
        }
    }
}
