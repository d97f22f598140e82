//! 邀请实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invitations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub token: String,
    pub email: String,
    pub role: String,
    pub school_id: i64,
    pub invited_by: Option<i64>,
    pub expires_at: i64,
    pub used_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_invitation(self) -> crate::models::invitations::entities::Invitation {
        use super::ts_to_datetime;
        use crate::models::invitations::entities::Invitation;
        use crate::models::roles::entities::Role;

        Invitation {
            id: self.id,
            token: self.token,
            email: self.email,
            // 非法角色按最低权限处理
            role: self.role.parse::<Role>().unwrap_or(Role::Parent),
            school_id: self.school_id,
            invited_by: self.invited_by,
            expires_at: ts_to_datetime(self.expires_at),
            used_at: self.used_at.map(ts_to_datetime),
            created_at: ts_to_datetime(self.created_at),
        }
    }
}
