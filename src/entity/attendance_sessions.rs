//! 签到会话实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_id: i64,
    pub school_id: i64,
    #[sea_orm(unique)]
    pub session_code: String,
    pub is_active: bool,
    pub expires_at: i64,
    pub created_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id"
    )]
    Event,
    #[sea_orm(has_many = "super::event_attendance::Entity")]
    EventAttendance,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::event_attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventAttendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attendance_session(
        self,
    ) -> crate::models::attendance::entities::AttendanceSession {
        use super::ts_to_datetime;

        crate::models::attendance::entities::AttendanceSession {
            id: self.id,
            event_id: self.event_id,
            school_id: self.school_id,
            session_code: self.session_code,
            is_active: self.is_active,
            expires_at: ts_to_datetime(self.expires_at),
            created_by: self.created_by,
            created_at: ts_to_datetime(self.created_at),
        }
    }
}
