use std::sync::Arc;

use chrono::{DateTime, Utc};

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 账号管理方法
    // 创建账号
    async fn create_user(&self, user: NewUser) -> Result<User>;
    // 通过ID获取账号
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取账号（不区分大小写）
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 统计账号数量
    async fn count_users(&self) -> Result<u64>;
    // 更新最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;

    /// 角色方法
    // 获取账号的全部角色
    async fn list_user_roles(&self, user_id: i64) -> Result<Vec<RoleAssignment>>;
    // 分配角色
    async fn assign_role(&self, user_id: i64, role: RoleAssignment) -> Result<RoleAssignment>;

    /// 会话方法
    // 创建会话
    async fn create_session(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session>;
    // 通过令牌获取会话
    async fn get_session_by_token(&self, token: &str) -> Result<Option<Session>>;
    // 删除会话
    async fn delete_session(&self, token: &str) -> Result<bool>;
    // 清理过期会话
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64>;

    /// 学校与学生方法
    // 通过ID获取学校
    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>>;
    // 列出学校，None 表示全部
    async fn list_schools(&self, ids: Option<Vec<i64>>) -> Result<Vec<School>>;
    // 通过ID获取学生
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    // 通过邮箱查找未归档学生
    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>>;
    // 分页列出学生
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    // 归档学生
    async fn archive_student(&self, id: i64) -> Result<bool>;

    /// 活动与签到方法
    // 通过ID获取活动
    async fn get_event_by_id(&self, id: i64) -> Result<Option<Event>>;
    // 创建签到会话，同时停用该活动的其它会话
    async fn create_attendance_session(
        &self,
        event: &Event,
        session_code: &str,
        expires_at: DateTime<Utc>,
        created_by: i64,
    ) -> Result<AttendanceSession>;
    // 通过ID获取签到会话
    async fn get_attendance_session_by_id(&self, id: i64) -> Result<Option<AttendanceSession>>;
    // 通过签到码获取签到会话
    async fn get_attendance_session_by_code(
        &self,
        code: &str,
    ) -> Result<Option<AttendanceSession>>;
    // 停用签到会话
    async fn deactivate_attendance_session(&self, id: i64) -> Result<bool>;
    // 查找活动中同一参与者的签到记录
    async fn find_attendance_record(
        &self,
        event_id: i64,
        participant: &Participant,
    ) -> Result<Option<AttendanceRecord>>;
    // 写入签到记录
    async fn create_attendance_record(
        &self,
        session: &AttendanceSession,
        participant: &Participant,
    ) -> Result<AttendanceRecord>;
    // 列出活动的签到记录
    async fn list_event_attendance(&self, event_id: i64) -> Result<Vec<AttendanceRecord>>;

    /// 邀请方法
    // 创建邀请
    async fn create_invitation(&self, invitation: NewInvitation) -> Result<Invitation>;
    // 通过令牌获取邀请
    async fn get_invitation_by_token(&self, token: &str) -> Result<Option<Invitation>>;
    // 接受邀请：创建账号、分配角色、标记已使用（同一事务）
    async fn accept_invitation(
        &self,
        invitation: &Invitation,
        user: NewUser,
    ) -> Result<(User, Vec<RoleAssignment>)>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
