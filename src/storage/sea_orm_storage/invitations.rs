use super::SeaOrmStorage;
use crate::entity::invitations::{ActiveModel, Column, Entity as Invitations};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    invitations::entities::{Invitation, NewInvitation},
    roles::entities::RoleAssignment,
    users::entities::{NewUser, User},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建邀请
    pub async fn create_invitation_impl(&self, req: NewInvitation) -> Result<Invitation> {
        let model = ActiveModel {
            token: Set(req.token),
            email: Set(req.email.trim().to_lowercase()),
            role: Set(req.role.to_string()),
            school_id: Set(req.school_id),
            invited_by: Set(Some(req.invited_by)),
            expires_at: Set(req.expires_at.timestamp()),
            used_at: Set(None),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建邀请失败: {e}")))?;

        Ok(result.into_invitation())
    }

    /// 通过令牌获取邀请
    pub async fn get_invitation_by_token_impl(&self, token: &str) -> Result<Option<Invitation>> {
        let result = Invitations::find()
            .filter(Column::Token.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询邀请失败: {e}")))?;

        Ok(result.map(|m| m.into_invitation()))
    }

    /// 接受邀请
    ///
    /// 标记已使用时附带 `used_at IS NULL` 条件，并发接受同一邀请只有一个成功。
    pub async fn accept_invitation_impl(
        &self,
        invitation: &Invitation,
        user: NewUser,
    ) -> Result<(User, Vec<RoleAssignment>)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        let marked = Invitations::update_many()
            .col_expr(Column::UsedAt, Expr::value(now))
            .filter(Column::Id.eq(invitation.id))
            .filter(Column::UsedAt.is_null())
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新邀请失败: {e}")))?;

        if marked.rows_affected == 0 {
            return Err(SchoolHubError::conflict("Invitation has already been used"));
        }

        let created = Self::insert_user(&txn, user).await?;
        let role = Self::insert_role(
            &txn,
            created.id,
            RoleAssignment::scoped(invitation.role, invitation.school_id),
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((created, vec![role]))
    }
}
