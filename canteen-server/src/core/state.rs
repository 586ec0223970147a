use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{JwtService, PermissionStore};
use crate::core::Config;
use crate::db::repository::{RepoResult, RoleRepository};
use crate::db::{DbService, bootstrap};
use crate::ordering::{AvailabilityEngine, OrderService, TokenSequencer};

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是后端的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | permissions | Arc<PermissionStore> | 动态权限矩阵 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 动态权限矩阵存储
    pub permissions: Arc<PermissionStore>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/canteen.db)
    /// 3. 种子数据 (角色 + 初始管理员，幂等)
    /// 4. 权限矩阵加载
    ///
    /// # Panics
    ///
    /// 数据库或种子数据初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        // 1. Initialize DB
        let db_path = config.database_dir().join("canteen.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::from_db(config, db_service.db).await
    }

    /// 使用内存数据库初始化 (测试场景)
    pub async fn initialize_in_memory(config: &Config) -> Self {
        let db_service = DbService::new_in_memory()
            .await
            .expect("Failed to initialize in-memory database");
        Self::from_db(config, db_service.db).await
    }

    async fn from_db(config: &Config, db: Surreal<Db>) -> Self {
        // 2. Seed roles + initial admin (idempotent)
        bootstrap::seed(&db).await.expect("Failed to seed database");

        // 3. Load permission matrices into the store
        let permissions = Arc::new(PermissionStore::new());
        let matrices = RoleRepository::new(db.clone())
            .load_permission_matrices()
            .await
            .expect("Failed to load role permissions");
        permissions.replace_all(matrices);

        Self {
            config: config.clone(),
            db,
            jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
            permissions,
        }
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 获取权限存储
    pub fn permissions(&self) -> &PermissionStore {
        &self.permissions
    }

    /// 从角色表重新加载权限矩阵 (角色变更后调用)
    pub async fn reload_permissions(&self) -> RepoResult<()> {
        let matrices = RoleRepository::new(self.db.clone())
            .load_permission_matrices()
            .await?;
        self.permissions.replace_all(matrices);
        Ok(())
    }

    /// 构造订单生命周期服务
    pub fn order_service(&self) -> OrderService {
        OrderService::new(
            self.db.clone(),
            self.config.cancel_window_minutes,
            self.config.token_base_offset,
        )
    }

    /// 构造可售引擎
    pub fn availability_engine(&self) -> AvailabilityEngine {
        AvailabilityEngine::new(self.db.clone())
    }

    /// 构造取餐号发号器
    pub fn token_sequencer(&self) -> TokenSequencer {
        TokenSequencer::new(self.db.clone(), self.config.token_base_offset)
    }
}
