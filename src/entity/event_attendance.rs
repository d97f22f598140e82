//! 签到记录实体，(event_id, participant_key) 唯一

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "event_attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_id: i64,
    pub session_id: i64,
    pub participant_name: String,
    pub participant_email: Option<String>,
    pub student_id: Option<i64>,
    pub participant_key: String,
    pub checked_in_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id"
    )]
    Event,
    #[sea_orm(
        belongs_to = "super::attendance_sessions::Entity",
        from = "Column::SessionId",
        to = "super::attendance_sessions::Column::Id"
    )]
    AttendanceSession,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::attendance_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attendance_record(self) -> crate::models::attendance::entities::AttendanceRecord {
        use super::ts_to_datetime;

        crate::models::attendance::entities::AttendanceRecord {
            id: self.id,
            event_id: self.event_id,
            session_id: self.session_id,
            participant_name: self.participant_name,
            participant_email: self.participant_email,
            student_id: self.student_id,
            checked_in_at: ts_to_datetime(self.checked_in_at),
        }
    }
}
