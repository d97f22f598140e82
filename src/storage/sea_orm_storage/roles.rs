use super::SeaOrmStorage;
use crate::entity::user_roles::{ActiveModel, Column, Entity as UserRoles};
use crate::errors::{Result, SchoolHubError};
use crate::models::roles::entities::RoleAssignment;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 获取账号全部角色
    pub async fn list_user_roles_impl(&self, user_id: i64) -> Result<Vec<RoleAssignment>> {
        let rows = UserRoles::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询角色失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|m| m.into_role_assignment())
            .collect())
    }

    /// 分配角色
    pub async fn assign_role_impl(
        &self,
        user_id: i64,
        role: RoleAssignment,
    ) -> Result<RoleAssignment> {
        Self::insert_role(&self.db, user_id, role).await
    }

    pub(super) async fn insert_role<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        role: RoleAssignment,
    ) -> Result<RoleAssignment> {
        let model = ActiveModel {
            user_id: Set(user_id),
            role: Set(role.role.to_string()),
            school_id: Set(role.school_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model.insert(conn).await.map_err(|e| match SchoolHubError::from(e) {
            SchoolHubError::Conflict(_) => SchoolHubError::conflict("Role already assigned"),
            other => SchoolHubError::database_operation(format!("分配角色失败: {other}")),
        })?;

        Ok(role)
    }
}
