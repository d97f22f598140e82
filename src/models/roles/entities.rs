//! 角色与学校范围权限
//!
//! 账号的权限由若干 `(role, school_id)` 对组成，`school_id` 为空表示全局角色。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../web/src/types/generated/role.ts")]
pub enum Role {
    GlobalAdmin, // 平台管理员
    SchoolAdmin, // 学校管理员
    Teacher,     // 教师
    Staff,       // 教职工
    Student,     // 学生
    Parent,      // 家长
}

impl Role {
    pub const GLOBAL_ADMIN: &'static str = "global_admin";
    pub const SCHOOL_ADMIN: &'static str = "school_admin";
    pub const TEACHER: &'static str = "teacher";
    pub const STAFF: &'static str = "staff";
    pub const STUDENT: &'static str = "student";
    pub const PARENT: &'static str = "parent";

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::GlobalAdmin => Self::GLOBAL_ADMIN,
            Role::SchoolAdmin => Self::SCHOOL_ADMIN,
            Role::Teacher => Self::TEACHER,
            Role::Staff => Self::STAFF,
            Role::Student => Self::STUDENT,
            Role::Parent => Self::PARENT,
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Role>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid role: '{s}'. Supported roles: global_admin, school_admin, teacher, staff, student, parent"
            ))
        })
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Role::GLOBAL_ADMIN => Ok(Role::GlobalAdmin),
            Role::SCHOOL_ADMIN => Ok(Role::SchoolAdmin),
            Role::TEACHER => Ok(Role::Teacher),
            Role::STAFF => Ok(Role::Staff),
            Role::STUDENT => Ok(Role::Student),
            Role::PARENT => Ok(Role::Parent),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

// 角色分配
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/role.ts")]
pub struct RoleAssignment {
    pub role: Role,
    pub school_id: Option<i64>,
}

impl RoleAssignment {
    pub fn global(role: Role) -> Self {
        Self {
            role,
            school_id: None,
        }
    }

    pub fn scoped(role: Role, school_id: i64) -> Self {
        Self {
            role,
            school_id: Some(school_id),
        }
    }
}

/// 是否拥有平台管理员角色
pub fn is_global_admin(roles: &[RoleAssignment]) -> bool {
    roles.iter().any(|r| r.role == Role::GlobalAdmin)
}

/// 是否可以管理指定学校：平台管理员，或该校的学校管理员
pub fn can_manage_school(roles: &[RoleAssignment], school_id: i64) -> bool {
    roles.iter().any(|r| match r.role {
        Role::GlobalAdmin => true,
        Role::SchoolAdmin => r.school_id == Some(school_id),
        _ => false,
    })
}

/// 是否可以查看指定学校的数据：可管理，或拥有该校范围内的任一角色
pub fn can_view_school(roles: &[RoleAssignment], school_id: i64) -> bool {
    can_manage_school(roles, school_id) || roles.iter().any(|r| r.school_id == Some(school_id))
}

/// 角色涉及的学校 ID（去重，保持顺序）
pub fn scoped_school_ids(roles: &[RoleAssignment]) -> Vec<i64> {
    let mut ids = Vec::new();
    for id in roles.iter().filter_map(|r| r.school_id) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_admin_manages_every_school() {
        let roles = vec![RoleAssignment::global(Role::GlobalAdmin)];
        assert!(can_manage_school(&roles, 1));
        assert!(can_manage_school(&roles, 42));
        assert!(can_view_school(&roles, 42));
    }

    #[test]
    fn test_school_admin_is_scoped() {
        let roles = vec![RoleAssignment::scoped(Role::SchoolAdmin, 7)];
        assert!(can_manage_school(&roles, 7));
        assert!(!can_manage_school(&roles, 8));
    }

    #[test]
    fn test_unscoped_school_admin_manages_nothing() {
        let roles = vec![RoleAssignment::global(Role::SchoolAdmin)];
        assert!(!can_manage_school(&roles, 7));
    }

    #[test]
    fn test_teacher_can_view_but_not_manage() {
        let roles = vec![RoleAssignment::scoped(Role::Teacher, 3)];
        assert!(!can_manage_school(&roles, 3));
        assert!(can_view_school(&roles, 3));
        assert!(!can_view_school(&roles, 4));
    }

    #[test]
    fn test_mixed_roles() {
        let roles = vec![
            RoleAssignment::scoped(Role::Teacher, 1),
            RoleAssignment::scoped(Role::SchoolAdmin, 2),
            RoleAssignment::scoped(Role::Parent, 1),
        ];
        assert!(can_manage_school(&roles, 2));
        assert!(!can_manage_school(&roles, 1));
        assert!(!is_global_admin(&roles));
        assert_eq!(scoped_school_ids(&roles), vec![1, 2]);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("school_admin".parse::<Role>(), Ok(Role::SchoolAdmin));
        assert!("superuser".parse::<Role>().is_err());
        let parsed: Role = serde_json::from_str("\"global_admin\"").unwrap();
        assert_eq!(parsed, Role::GlobalAdmin);
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
        assert_eq!(Role::Teacher.to_string(), "teacher");
    }
}
