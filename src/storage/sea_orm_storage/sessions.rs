use super::SeaOrmStorage;
use crate::entity::user_sessions::{ActiveModel, Column, Entity as UserSessions};
use crate::errors::{Result, SchoolHubError};
use crate::models::auth::Session;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建会话
    pub async fn create_session_impl(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session> {
        let model = ActiveModel {
            user_id: Set(user_id),
            token: Set(token.to_string()),
            expires_at: Set(expires_at.timestamp()),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建会话失败: {e}")))?;

        Ok(result.into_session())
    }

    /// 通过令牌获取会话
    pub async fn get_session_by_token_impl(&self, token: &str) -> Result<Option<Session>> {
        let result = UserSessions::find()
            .filter(Column::Token.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询会话失败: {e}")))?;

        Ok(result.map(|m| m.into_session()))
    }

    /// 删除会话
    pub async fn delete_session_impl(&self, token: &str) -> Result<bool> {
        let result = UserSessions::delete_many()
            .filter(Column::Token.eq(token))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除会话失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 清理过期会话
    pub async fn delete_expired_sessions_impl(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = UserSessions::delete_many()
            .filter(Column::ExpiresAt.lte(now.timestamp()))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("清理过期会话失败: {e}")))?;

        Ok(result.rows_affected)
    }
}
