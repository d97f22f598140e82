//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendance;
mod invitations;
mod roles;
mod schools;
mod sessions;
mod students;
mod users;

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolHubError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接指定数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite:, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    attendance::entities::{AttendanceRecord, AttendanceSession, Participant},
    auth::Session,
    events::entities::Event,
    invitations::entities::{Invitation, NewInvitation},
    roles::entities::RoleAssignment,
    schools::entities::School,
    students::{entities::Student, requests::StudentListQuery, responses::StudentListResponse},
    users::entities::{NewUser, User},
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 账号模块
    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    // 角色模块
    async fn list_user_roles(&self, user_id: i64) -> Result<Vec<RoleAssignment>> {
        self.list_user_roles_impl(user_id).await
    }

    async fn assign_role(&self, user_id: i64, role: RoleAssignment) -> Result<RoleAssignment> {
        self.assign_role_impl(user_id, role).await
    }

    // 会话模块
    async fn create_session(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session> {
        self.create_session_impl(user_id, token, expires_at).await
    }

    async fn get_session_by_token(&self, token: &str) -> Result<Option<Session>> {
        self.get_session_by_token_impl(token).await
    }

    async fn delete_session(&self, token: &str) -> Result<bool> {
        self.delete_session_impl(token).await
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
        self.delete_expired_sessions_impl(now).await
    }

    // 学校与学生模块
    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>> {
        self.get_school_by_id_impl(id).await
    }

    async fn list_schools(&self, ids: Option<Vec<i64>>) -> Result<Vec<School>> {
        self.list_schools_impl(ids).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        self.find_student_by_email_impl(email).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn archive_student(&self, id: i64) -> Result<bool> {
        self.archive_student_impl(id).await
    }

    // 活动与签到模块
    async fn get_event_by_id(&self, id: i64) -> Result<Option<Event>> {
        self.get_event_by_id_impl(id).await
    }

    async fn create_attendance_session(
        &self,
        event: &Event,
        session_code: &str,
        expires_at: DateTime<Utc>,
        created_by: i64,
    ) -> Result<AttendanceSession> {
        self.create_attendance_session_impl(event, session_code, expires_at, created_by)
            .await
    }

    async fn get_attendance_session_by_id(&self, id: i64) -> Result<Option<AttendanceSession>> {
        self.get_attendance_session_by_id_impl(id).await
    }

    async fn get_attendance_session_by_code(
        &self,
        code: &str,
    ) -> Result<Option<AttendanceSession>> {
        self.get_attendance_session_by_code_impl(code).await
    }

    async fn deactivate_attendance_session(&self, id: i64) -> Result<bool> {
        self.deactivate_attendance_session_impl(id).await
    }

    async fn find_attendance_record(
        &self,
        event_id: i64,
        participant: &Participant,
    ) -> Result<Option<AttendanceRecord>> {
        self.find_attendance_record_impl(event_id, participant)
            .await
    }

    async fn create_attendance_record(
        &self,
        session: &AttendanceSession,
        participant: &Participant,
    ) -> Result<AttendanceRecord> {
        self.create_attendance_record_impl(session, participant)
            .await
    }

    async fn list_event_attendance(&self, event_id: i64) -> Result<Vec<AttendanceRecord>> {
        self.list_event_attendance_impl(event_id).await
    }

    // 邀请模块
    async fn create_invitation(&self, invitation: NewInvitation) -> Result<Invitation> {
        self.create_invitation_impl(invitation).await
    }

    async fn get_invitation_by_token(&self, token: &str) -> Result<Option<Invitation>> {
        self.get_invitation_by_token_impl(token).await
    }

    async fn accept_invitation(
        &self,
        invitation: &Invitation,
        user: NewUser,
    ) -> Result<(User, Vec<RoleAssignment>)> {
        self.accept_invitation_impl(invitation, user).await
    }
}
