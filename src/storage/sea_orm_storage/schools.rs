use super::SeaOrmStorage;
use crate::entity::schools::{Column, Entity as Schools};
use crate::errors::{Result, SchoolHubError};
use crate::models::schools::entities::School;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 通过 ID 获取学校
    pub async fn get_school_by_id_impl(&self, id: i64) -> Result<Option<School>> {
        let result = Schools::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学校失败: {e}")))?;

        Ok(result.map(|m| m.into_school()))
    }

    /// 列出学校，`ids` 为 None 时返回全部
    pub async fn list_schools_impl(&self, ids: Option<Vec<i64>>) -> Result<Vec<School>> {
        let mut select = Schools::find();

        if let Some(ids) = ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(Column::Id.is_in(ids));
        }

        let rows = select
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学校列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_school()).collect())
    }
}
