//! 用户存储操作

use super::{SeaOrmStorage, map_write_err, now_ts};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{EduMarketError, Result};
use crate::models::users::{
    entities::{User, UserStatus},
    requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    responses::UserListResponse,
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = now_ts();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            phone: Set(req.phone),
            organization: Set(req.organization),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, "Username or email already exists", "创建用户失败"))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Username.like(contains_pattern(search)))
                    .add(Column::Email.like(contains_pattern(search)))
                    .add(Column::DisplayName.like(contains_pattern(search))),
            );
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 状态筛选
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let (users, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination,
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                EduMarketError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        if let Some(display_name) = update.display_name {
            model.display_name = Set(Some(display_name));
        }

        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }

        if let Some(organization) = update.organization {
            model.organization = Set(Some(organization));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("更新用户失败: {e}")))?;

        Ok(Some(updated.into_user()))
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;

    fn new_user(username: &str, role: UserRole) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hash".to_string(),
            role,
            display_name: None,
            phone: None,
            organization: None,
        }
    }

    #[actix_web::test]
    async fn test_create_and_lookup_user() {
        let storage = SeaOrmStorage::in_memory().await;
        let user = storage
            .create_user_impl(new_user("minsu", UserRole::Business))
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Business);
        assert_eq!(user.status, UserStatus::Active);

        let by_email = storage
            .get_user_by_username_or_email_impl("minsu@example.com")
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id));
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_duplicate_username_is_conflict() {
        let storage = SeaOrmStorage::in_memory().await;
        storage
            .create_user_impl(new_user("minsu", UserRole::User))
            .await
            .unwrap();

        let err = storage
            .create_user_impl(new_user("minsu", UserRole::User))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E008");
    }

    #[actix_web::test]
    async fn test_list_users_filters_and_search() {
        let storage = SeaOrmStorage::in_memory().await;
        storage
            .create_user_impl(new_user("alpha_1", UserRole::User))
            .await
            .unwrap();
        storage
            .create_user_impl(new_user("alphax1", UserRole::Business))
            .await
            .unwrap();

        let business = storage
            .list_users_with_pagination_impl(UserListQuery {
                page: None,
                size: None,
                role: Some(UserRole::Business),
                status: None,
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(business.pagination.total, 1);

        // `_` 不应作为通配符
        let escaped = storage
            .list_users_with_pagination_impl(UserListQuery {
                page: Some(1),
                size: Some(10),
                role: None,
                status: None,
                search: Some("alpha_".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(escaped.items.len(), 1);
        assert_eq!(escaped.items[0].username, "alpha_1");
    }

    #[actix_web::test]
    async fn test_update_user_status() {
        let storage = SeaOrmStorage::in_memory().await;
        let user = storage
            .create_user_impl(new_user("jiwoo", UserRole::User))
            .await
            .unwrap();

        let updated = storage
            .update_user_impl(
                user.id,
                UpdateUserRequest {
                    status: Some(UserStatus::Suspended),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, UserStatus::Suspended);

        assert!(
            storage
                .update_user_impl(999, UpdateUserRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
