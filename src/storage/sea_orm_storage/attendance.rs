use super::SeaOrmStorage;
use crate::entity::attendance_sessions::{
    ActiveModel as SessionActiveModel, Column as SessionColumn, Entity as AttendanceSessions,
};
use crate::entity::event_attendance::{
    ActiveModel as RecordActiveModel, Column as RecordColumn, Entity as EventAttendance,
};
use crate::entity::events::Entity as Events;
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    attendance::entities::{AttendanceRecord, AttendanceSession, Participant},
    events::entities::Event,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 通过 ID 获取活动
    pub async fn get_event_by_id_impl(&self, id: i64) -> Result<Option<Event>> {
        let result = Events::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询活动失败: {e}")))?;

        Ok(result.map(|m| m.into_event()))
    }

    /// 创建签到会话
    ///
    /// 同一活动只保留一个有效会话：插入前先停用其它会话。
    /// 签到码冲突时返回 `Conflict`，由调用方重新生成。
    pub async fn create_attendance_session_impl(
        &self,
        event: &Event,
        session_code: &str,
        expires_at: DateTime<Utc>,
        created_by: i64,
    ) -> Result<AttendanceSession> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        AttendanceSessions::update_many()
            .col_expr(SessionColumn::IsActive, Expr::value(false))
            .filter(SessionColumn::EventId.eq(event.id))
            .filter(SessionColumn::IsActive.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("停用旧签到会话失败: {e}")))?;

        let model = SessionActiveModel {
            event_id: Set(event.id),
            school_id: Set(event.school_id),
            session_code: Set(session_code.to_string()),
            is_active: Set(true),
            expires_at: Set(expires_at.timestamp()),
            created_by: Set(created_by),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        // 唯一约束冲突保持为 Conflict
        let result = model.insert(&txn).await.map_err(SchoolHubError::from)?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_attendance_session())
    }

    /// 通过 ID 获取签到会话
    pub async fn get_attendance_session_by_id_impl(
        &self,
        id: i64,
    ) -> Result<Option<AttendanceSession>> {
        let result = AttendanceSessions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询签到会话失败: {e}")))?;

        Ok(result.map(|m| m.into_attendance_session()))
    }

    /// 通过签到码获取签到会话
    pub async fn get_attendance_session_by_code_impl(
        &self,
        code: &str,
    ) -> Result<Option<AttendanceSession>> {
        let result = AttendanceSessions::find()
            .filter(SessionColumn::SessionCode.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询签到会话失败: {e}")))?;

        Ok(result.map(|m| m.into_attendance_session()))
    }

    /// 停用签到会话
    pub async fn deactivate_attendance_session_impl(&self, id: i64) -> Result<bool> {
        let result = AttendanceSessions::update_many()
            .col_expr(SessionColumn::IsActive, Expr::value(false))
            .filter(SessionColumn::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("停用签到会话失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 查找活动中同一参与者的签到记录
    pub async fn find_attendance_record_impl(
        &self,
        event_id: i64,
        participant: &Participant,
    ) -> Result<Option<AttendanceRecord>> {
        let result = EventAttendance::find()
            .filter(RecordColumn::EventId.eq(event_id))
            .filter(RecordColumn::ParticipantKey.eq(participant.key()))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询签到记录失败: {e}")))?;

        Ok(result.map(|m| m.into_attendance_record()))
    }

    /// 写入签到记录，重复参与者返回 `Conflict`
    pub async fn create_attendance_record_impl(
        &self,
        session: &AttendanceSession,
        participant: &Participant,
    ) -> Result<AttendanceRecord> {
        let model = RecordActiveModel {
            event_id: Set(session.event_id),
            session_id: Set(session.id),
            participant_name: Set(participant.name.clone()),
            participant_email: Set(participant.email.clone()),
            student_id: Set(participant.student_id),
            participant_key: Set(participant.key()),
            checked_in_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| match SchoolHubError::from(e) {
            SchoolHubError::Conflict(_) => {
                SchoolHubError::conflict("Attendance already recorded for this participant")
            }
            other => SchoolHubError::database_operation(format!("写入签到记录失败: {other}")),
        })?;

        Ok(result.into_attendance_record())
    }

    /// 列出活动签到记录（最新在前）
    pub async fn list_event_attendance_impl(&self, event_id: i64) -> Result<Vec<AttendanceRecord>> {
        let rows = EventAttendance::find()
            .filter(RecordColumn::EventId.eq(event_id))
            .order_by_desc(RecordColumn::CheckedInAt)
            .order_by_desc(RecordColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询签到记录失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_attendance_record()).collect())
    }
}
