//! # 数据库模块
//!
//! 数据库连接、迁移和按请求的事务会话管理

use crate::config::DatabaseConfig;
use crate::error::{EvalError, Result};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbErr,
    TransactionTrait,
};
use sea_orm::sqlx::sqlite::{SqliteJournalMode, SqliteSynchronous};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

/// 数据库句柄
///
/// 首次使用时建立连接并应用迁移，之后共享同一个连接池。
#[derive(Debug)]
pub struct Storage {
    config: DatabaseConfig,
    conn: OnceCell<DatabaseConnection>,
}

impl Storage {
    /// 创建句柄，不触碰磁盘
    #[must_use]
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            conn: OnceCell::new(),
        }
    }

    /// 数据库配置
    #[must_use]
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// 获取共享连接；并发的首次调用共享同一次初始化
    pub async fn connection(&self) -> Result<&DatabaseConnection> {
        self.conn
            .get_or_try_init(|| async {
                let db = init_database(&self.config).await?;
                run_migrations(&db).await?;
                Ok::<_, EvalError>(db)
            })
            .await
    }

    /// 立即建立连接并应用迁移
    pub async fn connect(&self) -> Result<()> {
        self.connection().await.map(|_| ())
    }

    /// 开启一个事务会话；未提交即丢弃时自动回滚
    pub async fn session(&self) -> Result<DatabaseTransaction> {
        let db = self.connection().await?;
        Ok(db.begin().await?)
    }
}

/// 初始化数据库连接
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    config.ensure_database_path()?;

    let url = config.connection_url();
    info!("正在连接数据库: {}", url);

    let mut options = ConnectOptions::new(url);
    options
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .sqlx_logging(false);

    // 每个内存库连接都是独立的数据库，只能保留一个
    if config.is_memory_database() {
        options.max_connections(1).min_connections(1);
    } else {
        options.max_connections(config.max_connections);
    }

    // 并发写入时等待写锁而不是立即返回 SQLITE_BUSY
    let busy_timeout = Duration::from_secs(config.busy_timeout);
    let wal = config.sqlite_file_path().is_some();
    options.map_sqlx_sqlite_opts(move |opts| {
        let opts = opts.busy_timeout(busy_timeout).foreign_keys(true);
        if wal {
            opts.journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
        } else {
            opts
        }
    });

    let db = Database::connect(options).await.map_err(|e| {
        error!("数据库连接失败: {}", e);
        EvalError::database_with_source("数据库连接失败", e)
    })?;

    info!("数据库连接成功");
    Ok(db)
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    info!("开始运行数据库迁移...");

    let pending = ::migration::Migrator::get_pending_migrations(db).await?;
    if !pending.is_empty() {
        warn!("有 {} 个待应用的迁移", pending.len());
    }

    match ::migration::Migrator::up(db, None).await {
        Ok(()) => {
            info!("数据库迁移完成");
            Ok(())
        }
        Err(e) => {
            error!("数据库迁移失败: {}", e);
            Err(EvalError::database_with_source("数据库迁移失败", e))
        }
    }
}

/// 探测连接是否可用
pub async fn ping<C: ConnectionTrait>(db: &C) -> std::result::Result<(), DbErr> {
    db.execute_unprepared("SELECT 1").await.map(|_| ())
}
