//! 课程与练习册存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::courses::{
    ActiveModel as CourseActiveModel, Column as CourseColumn, Entity as Courses,
};
use crate::entity::workbooks::{
    ActiveModel as WorkbookActiveModel, Column as WorkbookColumn, Entity as Workbooks,
};
use crate::errors::{EduMarketError, Result};
use crate::models::{
    ItemType,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    workbooks::{
        entities::Workbook,
        requests::{CreateWorkbookRequest, UpdateWorkbookRequest, WorkbookListQuery},
        responses::WorkbookListResponse,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(
        &self,
        business_id: i64,
        req: CreateCourseRequest,
    ) -> Result<Course> {
        let now = now_ts();

        let model = CourseActiveModel {
            business_id: Set(business_id),
            instructor_id: Set(req.instructor_id),
            source_material_id: Set(req.source_material_id),
            title: Set(req.title),
            description: Set(req.description),
            category: Set(req.category),
            level: Set(req.level),
            price: Set(req.price),
            discount_price: Set(req.discount_price),
            thumbnail_url: Set(req.thumbnail_url),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let mut select = Courses::find();

        if !query.include_inactive {
            select = select.filter(CourseColumn::IsActive.eq(true));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(CourseColumn::Title.like(contains_pattern(search)))
                    .add(CourseColumn::Description.like(contains_pattern(search))),
            );
        }

        if let Some(ref category) = query.category
            && !category.is_empty()
        {
            select = select.filter(CourseColumn::Category.eq(category.as_str()));
        }

        if let Some(business_id) = query.business_id {
            select = select.filter(CourseColumn::BusinessId.eq(business_id));
        }

        if let Some(instructor_id) = query.instructor_id {
            select = select.filter(CourseColumn::InstructorId.eq(instructor_id));
        }

        select = select
            .order_by_desc(CourseColumn::CreatedAt)
            .order_by_desc(CourseColumn::Id);

        let (items, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(CourseListResponse {
            items: items.into_iter().map(|m| m.into_course()).collect(),
            pagination,
        })
    }

    /// 更新课程
    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = CourseActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(category) = update.category {
            model.category = Set(Some(category));
        }
        if let Some(level) = update.level {
            model.level = Set(Some(level));
        }
        if let Some(price) = update.price {
            model.price = Set(price);
        }
        // clear_discount 优先于新的折扣价
        if update.clear_discount {
            model.discount_price = Set(None);
        } else if let Some(discount) = update.discount_price {
            model.discount_price = Set(Some(discount));
        }
        if let Some(url) = update.thumbnail_url {
            model.thumbnail_url = Set(Some(url));
        }
        if let Some(instructor_id) = update.instructor_id {
            model.instructor_id = Set(Some(instructor_id));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("更新课程失败: {e}")))?;

        Ok(Some(updated.into_course()))
    }

    /// 创建练习册
    pub async fn create_workbook_impl(
        &self,
        business_id: i64,
        req: CreateWorkbookRequest,
    ) -> Result<Workbook> {
        let now = now_ts();

        let model = WorkbookActiveModel {
            business_id: Set(business_id),
            source_material_id: Set(req.source_material_id),
            title: Set(req.title),
            description: Set(req.description),
            page_count: Set(req.page_count),
            price: Set(req.price),
            discount_price: Set(req.discount_price),
            thumbnail_url: Set(req.thumbnail_url),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("创建练习册失败: {e}")))?;

        Ok(result.into_workbook())
    }

    /// 通过 ID 获取练习册
    pub async fn get_workbook_by_id_impl(&self, id: i64) -> Result<Option<Workbook>> {
        let result = Workbooks::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询练习册失败: {e}")))?;

        Ok(result.map(|m| m.into_workbook()))
    }

    /// 分页列出练习册
    pub async fn list_workbooks_with_pagination_impl(
        &self,
        query: WorkbookListQuery,
    ) -> Result<WorkbookListResponse> {
        let mut select = Workbooks::find();

        if !query.include_inactive {
            select = select.filter(WorkbookColumn::IsActive.eq(true));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(WorkbookColumn::Title.like(contains_pattern(search)))
                    .add(WorkbookColumn::Description.like(contains_pattern(search))),
            );
        }

        if let Some(business_id) = query.business_id {
            select = select.filter(WorkbookColumn::BusinessId.eq(business_id));
        }

        select = select
            .order_by_desc(WorkbookColumn::CreatedAt)
            .order_by_desc(WorkbookColumn::Id);

        let (items, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(WorkbookListResponse {
            items: items.into_iter().map(|m| m.into_workbook()).collect(),
            pagination,
        })
    }

    /// 更新练习册
    pub async fn update_workbook_impl(
        &self,
        id: i64,
        update: UpdateWorkbookRequest,
    ) -> Result<Option<Workbook>> {
        if self.get_workbook_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = WorkbookActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(price) = update.price {
            model.price = Set(price);
        }
        if update.clear_discount {
            model.discount_price = Set(None);
        } else if let Some(discount) = update.discount_price {
            model.discount_price = Set(Some(discount));
        }
        if let Some(url) = update.thumbnail_url {
            model.thumbnail_url = Set(Some(url));
        }
        if let Some(page_count) = update.page_count {
            model.page_count = Set(Some(page_count));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("更新练习册失败: {e}")))?;

        Ok(Some(updated.into_workbook()))
    }

    /// 商家拥有的某类商品 ID（含已下架）
    pub async fn list_business_item_ids_impl(
        &self,
        business_id: i64,
        item_type: ItemType,
    ) -> Result<Vec<i64>> {
        let ids = match item_type {
            ItemType::Course => Courses::find()
                .select_only()
                .column(CourseColumn::Id)
                .filter(CourseColumn::BusinessId.eq(business_id))
                .into_tuple::<i64>()
                .all(&self.db)
                .await,
            ItemType::Workbook => Workbooks::find()
                .select_only()
                .column(WorkbookColumn::Id)
                .filter(WorkbookColumn::BusinessId.eq(business_id))
                .into_tuple::<i64>()
                .all(&self.db)
                .await,
        }
        .map_err(|e| EduMarketError::database_operation(format!("查询商家商品失败: {e}")))?;

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{seed_course, seed_user, seed_workbook};

    #[actix_web::test]
    async fn test_course_listing_hides_inactive() {
        let storage = SeaOrmStorage::in_memory().await;
        let business = seed_user(&storage, "academy", UserRole::Business).await;
        let toeic = seed_course(&storage, business.id, "TOEIC 900", 50_000).await;
        seed_course(&storage, business.id, "Grammar Basics", 30_000).await;

        storage
            .update_course_impl(
                toeic.id,
                UpdateCourseRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let public = storage
            .list_courses_with_pagination_impl(CourseListQuery::default())
            .await
            .unwrap();
        assert_eq!(public.pagination.total, 1);
        assert_eq!(public.items[0].title, "Grammar Basics");

        let all = storage
            .list_courses_with_pagination_impl(CourseListQuery {
                include_inactive: true,
                business_id: Some(business.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);
    }

    #[actix_web::test]
    async fn test_course_discount_update_and_clear() {
        let storage = SeaOrmStorage::in_memory().await;
        let business = seed_user(&storage, "academy", UserRole::Business).await;
        let course = seed_course(&storage, business.id, "Speaking", 40_000).await;

        let discounted = storage
            .update_course_impl(
                course.id,
                UpdateCourseRequest {
                    discount_price: Some(25_000),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(discounted.effective_price(), 25_000);

        let cleared = storage
            .update_course_impl(
                course.id,
                UpdateCourseRequest {
                    clear_discount: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.discount_price, None);
        assert_eq!(cleared.effective_price(), 40_000);
    }

    #[actix_web::test]
    async fn test_list_business_item_ids_by_type() {
        let storage = SeaOrmStorage::in_memory().await;
        let mine = seed_user(&storage, "academy", UserRole::Business).await;
        let other = seed_user(&storage, "another", UserRole::Business).await;
        let course = seed_course(&storage, mine.id, "Reading", 10_000).await;
        seed_course(&storage, other.id, "Listening", 10_000).await;
        let workbook = seed_workbook(&storage, mine.id, "Vocabulary 3000", 15_000).await;

        let courses = storage
            .list_business_item_ids_impl(mine.id, ItemType::Course)
            .await
            .unwrap();
        assert_eq!(courses, vec![course.id]);

        let workbooks = storage
            .list_business_item_ids_impl(mine.id, ItemType::Workbook)
            .await
            .unwrap();
        assert_eq!(workbooks, vec![workbook.id]);
    }
}
