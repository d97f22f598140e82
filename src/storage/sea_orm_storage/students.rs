use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::students::{Column, Entity as Students, Model as StudentModel};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    students::{entities::Student, requests::StudentListQuery, responses::StudentListResponse},
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 批量填充班级名称
    async fn attach_class_names(&self, rows: Vec<StudentModel>) -> Result<Vec<Student>> {
        let class_ids: Vec<i64> = rows.iter().filter_map(|m| m.class_id).collect();

        let names: HashMap<i64, String> = if class_ids.is_empty() {
            HashMap::new()
        } else {
            Classes::find()
                .filter(ClassColumn::Id.is_in(class_ids))
                .all(&self.db)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("查询班级失败: {e}")))?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|m| {
                let class_name = m.class_id.and_then(|id| names.get(&id).cloned());
                m.into_student(class_name)
            })
            .collect())
    }

    /// 通过 ID 获取学生
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生失败: {e}")))?;

        match result {
            Some(model) => Ok(self.attach_class_names(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 通过邮箱查找未归档学生（不区分大小写）
    pub async fn find_student_by_email_impl(&self, email: &str) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(Column::Email))).eq(email.trim().to_lowercase()),
            )
            .filter(Column::IsArchived.eq(false))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生失败: {e}")))?;

        match result {
            Some(model) => Ok(self.attach_class_names(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 分页列出学校的学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Students::find().filter(Column::SchoolId.eq(query.school_id));

        if !query.include_archived {
            select = select.filter(Column::IsArchived.eq(false));
        }

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            // 转义后的模式需要显式声明 ESCAPE，SQLite 没有默认转义符
            let pattern = LikeExpr::new(format!("%{}%", escape_like_pattern(search.trim())))
                .escape('\\');
            select = select.filter(
                Condition::any()
                    .add(Column::FirstName.like(pattern.clone()))
                    .add(Column::LastName.like(pattern.clone()))
                    .add(Column::Email.like(pattern.clone()))
                    .add(Column::StudentNumber.like(pattern)),
            );
        }

        select = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生页数失败: {e}")))?;

        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(StudentListResponse {
            items: self.attach_class_names(rows).await?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 归档学生
    pub async fn archive_student_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Students::update_many()
            .col_expr(Column::IsArchived, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("归档学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
