//! 基于内存 SQLite 的存储层测试

use super::SeaOrmStorage;
use super::fixtures::{seed_class, seed_event, seed_school, seed_student};
use crate::errors::SchoolHubError;
use crate::models::{
    attendance::entities::Participant,
    invitations::entities::NewInvitation,
    roles::entities::{Role, RoleAssignment},
    students::requests::StudentListQuery,
    users::entities::NewUser,
};
use crate::storage::Storage;
use chrono::{Duration, Utc};

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::connect("sqlite::memory:", 1, 5)
        .await
        .expect("in-memory sqlite")
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password_hash: "hash".to_string(),
        full_name: Some("Test User".to_string()),
    }
}

#[tokio::test]
async fn test_user_email_is_case_insensitive_and_unique() {
    let s = storage().await;
    let user = s.create_user(new_user("Teacher@School.Test")).await.unwrap();
    assert_eq!(user.email, "teacher@school.test");
    assert!(user.is_active);

    let found = s.get_user_by_email("TEACHER@school.test").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    let dup = s.create_user(new_user("teacher@school.test")).await;
    assert!(matches!(dup, Err(SchoolHubError::Conflict(_))));
    assert_eq!(s.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_session_lifecycle() {
    let s = storage().await;
    let user = s.create_user(new_user("a@school.test")).await.unwrap();

    s.create_session(user.id, "live", Utc::now() + Duration::hours(1))
        .await
        .unwrap();
    s.create_session(user.id, "stale", Utc::now() - Duration::hours(1))
        .await
        .unwrap();

    let session = s.get_session_by_token("live").await.unwrap().unwrap();
    assert_eq!(session.user_id, user.id);

    assert_eq!(s.delete_expired_sessions(Utc::now()).await.unwrap(), 1);
    assert!(s.get_session_by_token("stale").await.unwrap().is_none());

    assert!(s.delete_session("live").await.unwrap());
    assert!(!s.delete_session("live").await.unwrap());
}

#[tokio::test]
async fn test_roles_round_trip() {
    let s = storage().await;
    let school = seed_school(&s, "north").await;
    let user = s.create_user(new_user("b@school.test")).await.unwrap();

    s.assign_role(user.id, RoleAssignment::scoped(Role::SchoolAdmin, school))
        .await
        .unwrap();
    s.assign_role(user.id, RoleAssignment::scoped(Role::Teacher, school))
        .await
        .unwrap();

    let roles = s.list_user_roles(user.id).await.unwrap();
    assert_eq!(
        roles,
        vec![
            RoleAssignment::scoped(Role::SchoolAdmin, school),
            RoleAssignment::scoped(Role::Teacher, school),
        ]
    );
}

#[tokio::test]
async fn test_new_attendance_session_deactivates_previous() {
    let s = storage().await;
    let school = seed_school(&s, "north").await;
    let user = s.create_user(new_user("c@school.test")).await.unwrap();
    let event = seed_event(&s, school).await;
    let expires = Utc::now() + Duration::minutes(30);

    let first = s
        .create_attendance_session(&event, "AAAA1111", expires, user.id)
        .await
        .unwrap();
    let second = s
        .create_attendance_session(&event, "BBBB2222", expires, user.id)
        .await
        .unwrap();
    assert_eq!(second.school_id, school);

    let first = s.get_attendance_session_by_id(first.id).await.unwrap().unwrap();
    assert!(!first.is_active);
    let second = s.get_attendance_session_by_code("BBBB2222").await.unwrap().unwrap();
    assert!(second.is_active);

    let clash = s
        .create_attendance_session(&event, "BBBB2222", expires, user.id)
        .await;
    assert!(matches!(clash, Err(SchoolHubError::Conflict(_))));
    // 冲突回滚，已有会话保持有效
    assert!(
        s.get_attendance_session_by_id(second.id)
            .await
            .unwrap()
            .unwrap()
            .is_active
    );

    assert!(s.deactivate_attendance_session(second.id).await.unwrap());
    assert!(!s.deactivate_attendance_session(9999).await.unwrap());
}

#[tokio::test]
async fn test_attendance_records_are_unique_per_participant() {
    let s = storage().await;
    let school = seed_school(&s, "north").await;
    let user = s.create_user(new_user("d@school.test")).await.unwrap();
    let event = seed_event(&s, school).await;
    let session = s
        .create_attendance_session(&event, "CODE0001", Utc::now() + Duration::minutes(5), user.id)
        .await
        .unwrap();

    let ana = Participant::new("Ana", Some("Ana@School.Test"), None);
    let record = s.create_attendance_record(&session, &ana).await.unwrap();
    assert_eq!(record.participant_email.as_deref(), Some("ana@school.test"));

    let again = Participant::new("Ana L.", Some("ana@school.test"), None);
    assert!(
        s.find_attendance_record(event.id, &again)
            .await
            .unwrap()
            .is_some()
    );
    let dup = s.create_attendance_record(&session, &again).await;
    assert!(matches!(dup, Err(SchoolHubError::Conflict(_))));

    let bruno = Participant::new("Bruno", None, None);
    s.create_attendance_record(&session, &bruno).await.unwrap();

    let records = s.list_event_attendance(event.id).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_find_student_by_email_skips_archived() {
    let s = storage().await;
    let school = seed_school(&s, "north").await;
    let class = seed_class(&s, school, "5A").await;
    seed_student(&s, school, None, "Old", Some("kid@school.test"), true).await;
    let id = seed_student(&s, school, Some(class), "Kid", Some("Kid@School.test"), false).await;

    let student = s
        .find_student_by_email("kid@SCHOOL.test")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(student.id, id);
    assert_eq!(student.class_name.as_deref(), Some("5A"));

    assert!(s.archive_student(id).await.unwrap());
    assert!(s.find_student_by_email("kid@school.test").await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_students_filters_and_paginates() {
    let s = storage().await;
    let school = seed_school(&s, "north").await;
    let other = seed_school(&s, "south").await;
    let class = seed_class(&s, school, "6B").await;
    for name in ["Alice", "Bob", "Carla"] {
        seed_student(&s, school, Some(class), name, None, false).await;
    }
    seed_student(&s, school, None, "Dora", None, true).await;
    seed_student(&s, other, None, "Eve", None, false).await;

    let page = s
        .list_students_with_pagination(StudentListQuery {
            school_id: school,
            page: Some(1),
            size: Some(2),
            class_id: None,
            search: None,
            include_archived: false,
        })
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.total_pages, 2);
    assert_eq!(page.items.len(), 2);

    let with_archived = s
        .list_students_with_pagination(StudentListQuery {
            school_id: school,
            page: None,
            size: None,
            class_id: None,
            search: None,
            include_archived: true,
        })
        .await
        .unwrap();
    assert_eq!(with_archived.pagination.total, 4);

    let search = s
        .list_students_with_pagination(StudentListQuery {
            school_id: school,
            page: None,
            size: None,
            class_id: Some(class),
            search: Some("carl".to_string()),
            include_archived: false,
        })
        .await
        .unwrap();
    assert_eq!(search.items.len(), 1);
    assert_eq!(search.items[0].first_name, "Carla");
}

#[tokio::test]
async fn test_list_students_search_treats_wildcards_literally() {
    let s = storage().await;
    let school = seed_school(&s, "north").await;
    seed_student(&s, school, None, "Ana_Maria", None, false).await;
    seed_student(&s, school, None, "Anaxmo", None, false).await;

    let search = |term: &str| StudentListQuery {
        school_id: school,
        page: None,
        size: None,
        class_id: None,
        search: Some(term.to_string()),
        include_archived: false,
    };

    let plain = s.list_students_with_pagination(search("ana")).await.unwrap();
    assert_eq!(plain.pagination.total, 2);

    let underscore = s.list_students_with_pagination(search("a_m")).await.unwrap();
    assert_eq!(underscore.pagination.total, 1);
    assert_eq!(underscore.items[0].first_name, "Ana_Maria");

    let percent = s.list_students_with_pagination(search("a%o")).await.unwrap();
    assert_eq!(percent.pagination.total, 0);
}

#[tokio::test]
async fn test_list_schools_scoping() {
    let s = storage().await;
    let north = seed_school(&s, "north").await;
    seed_school(&s, "south").await;

    assert_eq!(s.list_schools(None).await.unwrap().len(), 2);
    let scoped = s.list_schools(Some(vec![north])).await.unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].id, north);
    assert!(s.list_schools(Some(vec![])).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invitation_can_only_be_accepted_once() {
    let s = storage().await;
    let school = seed_school(&s, "north").await;
    let admin = s.create_user(new_user("admin@school.test")).await.unwrap();

    s.create_invitation(NewInvitation {
        token: "invite-token".to_string(),
        email: "New.Teacher@School.test".to_string(),
        role: Role::Teacher,
        school_id: school,
        invited_by: admin.id,
        expires_at: Utc::now() + Duration::days(7),
    })
    .await
    .unwrap();

    let invitation = s
        .get_invitation_by_token("invite-token")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(invitation.email, "new.teacher@school.test");
    assert!(invitation.used_at.is_none());

    let (user, roles) = s
        .accept_invitation(&invitation, new_user(&invitation.email))
        .await
        .unwrap();
    assert_eq!(roles, vec![RoleAssignment::scoped(Role::Teacher, school)]);
    assert_eq!(s.list_user_roles(user.id).await.unwrap(), roles);

    let again = s
        .accept_invitation(&invitation, new_user("someone@school.test"))
        .await;
    assert!(matches!(again, Err(SchoolHubError::Conflict(_))));
    assert!(s.get_user_by_email("someone@school.test").await.unwrap().is_none());
}
