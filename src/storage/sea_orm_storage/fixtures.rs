//! 测试用的基础数据

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::models::events::entities::Event;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

pub(crate) async fn seed_school(s: &SeaOrmStorage, name: &str) -> i64 {
    let now = Utc::now().timestamp();
    SchoolActiveModel {
        name: Set(name.to_string()),
        code: Set(name.to_uppercase()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&s.db)
    .await
    .unwrap()
    .id
}

pub(crate) async fn seed_class(s: &SeaOrmStorage, school_id: i64, name: &str) -> i64 {
    ClassActiveModel {
        school_id: Set(school_id),
        name: Set(name.to_string()),
        grade_level: Set(None),
        is_archived: Set(false),
        created_at: Set(Utc::now().timestamp()),
        ..Default::default()
    }
    .insert(&s.db)
    .await
    .unwrap()
    .id
}

pub(crate) async fn seed_student(
    s: &SeaOrmStorage,
    school_id: i64,
    class_id: Option<i64>,
    first: &str,
    email: Option<&str>,
    archived: bool,
) -> i64 {
    let now = Utc::now().timestamp();
    StudentActiveModel {
        school_id: Set(school_id),
        class_id: Set(class_id),
        first_name: Set(first.to_string()),
        last_name: Set("Silva".to_string()),
        email: Set(email.map(str::to_string)),
        student_number: Set(None),
        is_archived: Set(archived),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&s.db)
    .await
    .unwrap()
    .id
}

pub(crate) async fn seed_event(s: &SeaOrmStorage, school_id: i64) -> Event {
    let now = Utc::now().timestamp();
    EventActiveModel {
        school_id: Set(school_id),
        title: Set("Science fair".to_string()),
        description: Set(None),
        location: Set(None),
        starts_at: Set(now),
        ends_at: Set(None),
        created_by: Set(None),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&s.db)
    .await
    .unwrap()
    .into_event()
}

pub(crate) async fn deactivate_user(s: &SeaOrmStorage, user_id: i64) {
    Users::update_many()
        .col_expr(crate::entity::users::Column::IsActive, Expr::value(false))
        .filter(crate::entity::users::Column::Id.eq(user_id))
        .exec(&s.db)
        .await
        .unwrap();
}
