//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod applications;
mod cart;
mod catalog;
mod chat;
mod enrollments;
mod instructors;
mod materials;
mod notices;
mod payments;
mod reviews;
mod seminars;
mod users;

use crate::config::AppConfig;
use crate::errors::{EduMarketError, Result};
use crate::models::{PaginationInfo, normalize_page};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Select,
    SqlErr,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect_url(&config.database.url, config.database.pool_size, config.database.timeout)
            .await
    }

    /// 连接指定数据库并运行迁移
    ///
    /// 测试使用 `sqlite::memory:` 且 `pool_size = 1`：每个内存连接都是独立的数据库。
    pub async fn connect_url(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");
        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EduMarketError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        // 内存库不支持 WAL，也不能让唯一的连接被回收
        let (opt, idle_timeout) = if in_memory {
            (opt.journal_mode(SqliteJournalMode::Memory), None)
        } else {
            (
                opt.journal_mode(SqliteJournalMode::Wal)
                    .pragma("mmap_size", "536870912")
                    .pragma("wal_autocheckpoint", "1000"),
                Some(Duration::from_secs(300)),
            )
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { pool_size.max(1) })
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(idle_timeout)
            .max_lifetime(if in_memory { None } else { Some(Duration::from_secs(1800)) })
            .connect_with(opt)
            .await
            .map_err(|e| EduMarketError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(pool_size.min(5))
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| EduMarketError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EduMarketError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 通用分页查询：页码至少为 1，每页 1..=100 条
    pub(crate) async fn fetch_page<E>(
        &self,
        select: Select<E>,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<(Vec<E::Model>, PaginationInfo)>
    where
        E: EntityTrait,
        E::Model: Sync,
    {
        let (page, size) = normalize_page(page, size);
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询总数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("分页查询失败: {e}")))?;
        Ok((items, PaginationInfo::new(page, size, total)))
    }

    /// 测试用：内存数据库
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Self {
        Self::connect_url("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory database should initialize")
    }
}

/// 唯一约束冲突转换为 Conflict，其余为数据库错误
pub(crate) fn map_write_err(err: DbErr, conflict_msg: &str, context: &str) -> EduMarketError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        EduMarketError::conflict(conflict_msg)
    } else {
        EduMarketError::database_operation(format!("{context}: {err}"))
    }
}

pub(crate) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 测试辅助：快速插入用户与商品
#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::{
        courses::{entities::Course, requests::CreateCourseRequest},
        users::{entities::{User, UserRole}, requests::CreateUserRequest},
        workbooks::{entities::Workbook, requests::CreateWorkbookRequest},
    };

    pub(crate) async fn seed_user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
        storage
            .create_user_impl(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "hash".to_string(),
                role,
                display_name: None,
                phone: None,
                organization: None,
            })
            .await
            .expect("seed user")
    }

    pub(crate) async fn seed_course(
        storage: &SeaOrmStorage,
        business_id: i64,
        title: &str,
        price: i64,
    ) -> Course {
        storage
            .create_course_impl(
                business_id,
                CreateCourseRequest {
                    title: title.to_string(),
                    description: None,
                    category: Some("toeic".to_string()),
                    level: None,
                    price,
                    discount_price: None,
                    thumbnail_url: None,
                    instructor_id: None,
                    source_material_id: None,
                },
            )
            .await
            .expect("seed course")
    }

    pub(crate) async fn seed_workbook(
        storage: &SeaOrmStorage,
        business_id: i64,
        title: &str,
        price: i64,
    ) -> Workbook {
        storage
            .create_workbook_impl(
                business_id,
                CreateWorkbookRequest {
                    title: title.to_string(),
                    description: None,
                    price,
                    discount_price: None,
                    thumbnail_url: None,
                    page_count: Some(120),
                    source_material_id: None,
                },
            )
            .await
            .expect("seed workbook")
    }
}

// Storage trait 实现
use crate::models::{
    ItemType, ProductRef,
    applications::{
        entities::{ApplicationStatus, SeminarApplication},
        requests::ApplicationListQuery,
        responses::ApplicationListResponse,
    },
    cart::entities::CartItem,
    chat::{
        entities::{ChatChannel, ChatMessage},
        requests::CreateChannelRequest,
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    enrollments::{
        entities::Enrollment, requests::EnrollmentListQuery, responses::EnrollmentListResponse,
    },
    instructors::{
        entities::Instructor,
        requests::{CreateInstructorRequest, InstructorListQuery, UpdateInstructorRequest},
        responses::InstructorListResponse,
    },
    materials::{
        entities::{AnalysisStatus, SourceMaterial},
        requests::{CreateMaterialRequest, MaterialListQuery},
        responses::MaterialListResponse,
    },
    notices::{
        entities::Notice,
        requests::{CreateNoticeRequest, NoticeListQuery, UpdateNoticeRequest},
        responses::NoticeListResponse,
    },
    payments::{
        entities::{Payment, PaymentStatus},
        requests::{NewPayment, PaymentListQuery},
        responses::PaymentListResponse,
    },
    reviews::{
        entities::Review,
        requests::{CreateReviewRequest, UpdateReviewRequest},
        responses::ReviewListResponse,
    },
    seminars::{
        entities::Seminar,
        requests::{NewSeminar, SeminarListQuery, UpdateSeminarRequest},
        responses::SeminarListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
    workbooks::{
        entities::Workbook,
        requests::{CreateWorkbookRequest, UpdateWorkbookRequest, WorkbookListQuery},
        responses::WorkbookListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn create_instructor(
        &self,
        business_id: i64,
        req: CreateInstructorRequest,
    ) -> Result<Instructor> {
        self.create_instructor_impl(business_id, req).await
    }

    async fn get_instructor_by_id(&self, id: i64) -> Result<Option<Instructor>> {
        self.get_instructor_by_id_impl(id).await
    }

    async fn list_instructors_with_pagination(
        &self,
        query: InstructorListQuery,
    ) -> Result<InstructorListResponse> {
        self.list_instructors_with_pagination_impl(query).await
    }

    async fn update_instructor(
        &self,
        id: i64,
        update: UpdateInstructorRequest,
    ) -> Result<Option<Instructor>> {
        self.update_instructor_impl(id, update).await
    }

    async fn create_course(&self, business_id: i64, req: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(business_id, req).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn create_workbook(
        &self,
        business_id: i64,
        req: CreateWorkbookRequest,
    ) -> Result<Workbook> {
        self.create_workbook_impl(business_id, req).await
    }

    async fn get_workbook_by_id(&self, id: i64) -> Result<Option<Workbook>> {
        self.get_workbook_by_id_impl(id).await
    }

    async fn list_workbooks_with_pagination(
        &self,
        query: WorkbookListQuery,
    ) -> Result<WorkbookListResponse> {
        self.list_workbooks_with_pagination_impl(query).await
    }

    async fn update_workbook(
        &self,
        id: i64,
        update: UpdateWorkbookRequest,
    ) -> Result<Option<Workbook>> {
        self.update_workbook_impl(id, update).await
    }

    async fn list_business_item_ids(
        &self,
        business_id: i64,
        item_type: ItemType,
    ) -> Result<Vec<i64>> {
        self.list_business_item_ids_impl(business_id, item_type).await
    }

    async fn create_seminar(&self, seminar: NewSeminar) -> Result<Seminar> {
        self.create_seminar_impl(seminar).await
    }

    async fn get_seminar_by_id(&self, id: i64) -> Result<Option<Seminar>> {
        self.get_seminar_by_id_impl(id).await
    }

    async fn list_seminars_with_pagination(
        &self,
        query: SeminarListQuery,
    ) -> Result<SeminarListResponse> {
        self.list_seminars_with_pagination_impl(query).await
    }

    async fn update_seminar(
        &self,
        id: i64,
        update: UpdateSeminarRequest,
    ) -> Result<Option<Seminar>> {
        self.update_seminar_impl(id, update).await
    }

    async fn create_application(
        &self,
        seminar_id: i64,
        user_id: i64,
        message: Option<String>,
    ) -> Result<SeminarApplication> {
        self.create_application_impl(seminar_id, user_id, message).await
    }

    async fn get_application_by_id(&self, id: i64) -> Result<Option<SeminarApplication>> {
        self.get_application_by_id_impl(id).await
    }

    async fn list_applications_with_pagination(
        &self,
        query: ApplicationListQuery,
    ) -> Result<ApplicationListResponse> {
        self.list_applications_with_pagination_impl(query).await
    }

    async fn update_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
        capacity: Option<i32>,
    ) -> Result<Option<SeminarApplication>> {
        self.update_application_status_impl(id, status, capacity).await
    }

    async fn create_notice(&self, author_id: i64, req: CreateNoticeRequest) -> Result<Notice> {
        self.create_notice_impl(author_id, req).await
    }

    async fn get_notice_by_id(&self, id: i64) -> Result<Option<Notice>> {
        self.get_notice_by_id_impl(id).await
    }

    async fn list_notices_with_pagination(
        &self,
        query: NoticeListQuery,
    ) -> Result<NoticeListResponse> {
        self.list_notices_with_pagination_impl(query).await
    }

    async fn update_notice(&self, id: i64, update: UpdateNoticeRequest) -> Result<Option<Notice>> {
        self.update_notice_impl(id, update).await
    }

    async fn create_review(&self, user_id: i64, req: CreateReviewRequest) -> Result<Review> {
        self.create_review_impl(user_id, req).await
    }

    async fn get_review_by_id(&self, id: i64) -> Result<Option<Review>> {
        self.get_review_by_id_impl(id).await
    }

    async fn list_item_reviews(
        &self,
        item: ProductRef,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<ReviewListResponse> {
        self.list_item_reviews_impl(item, page, size).await
    }

    async fn update_review(&self, id: i64, update: UpdateReviewRequest) -> Result<Option<Review>> {
        self.update_review_impl(id, update).await
    }

    async fn deactivate_review(&self, id: i64) -> Result<bool> {
        self.deactivate_review_impl(id).await
    }

    async fn list_cart_items(&self, user_id: i64) -> Result<Vec<CartItem>> {
        self.list_cart_items_impl(user_id).await
    }

    async fn add_cart_item(&self, user_id: i64, item: ProductRef) -> Result<CartItem> {
        self.add_cart_item_impl(user_id, item).await
    }

    async fn remove_cart_item(&self, user_id: i64, cart_item_id: i64) -> Result<bool> {
        self.remove_cart_item_impl(user_id, cart_item_id).await
    }

    async fn clear_cart(&self, user_id: i64) -> Result<u64> {
        self.clear_cart_impl(user_id).await
    }

    async fn create_payment(&self, payment: NewPayment) -> Result<Payment> {
        self.create_payment_impl(payment).await
    }

    async fn get_payment_by_id(&self, id: i64) -> Result<Option<Payment>> {
        self.get_payment_by_id_impl(id).await
    }

    async fn get_payment_by_order_id(&self, order_id: &str) -> Result<Option<Payment>> {
        self.get_payment_by_order_id_impl(order_id).await
    }

    async fn list_payments_with_pagination(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaymentListResponse> {
        self.list_payments_with_pagination_impl(query).await
    }

    async fn confirm_payment(
        &self,
        order_id: &str,
        method: Option<String>,
    ) -> Result<(Payment, Vec<Enrollment>)> {
        self.confirm_payment_impl(order_id, method).await
    }

    async fn transition_payment(&self, id: i64, next: PaymentStatus) -> Result<Payment> {
        self.transition_payment_impl(id, next).await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn find_enrollment(&self, user_id: i64, item: ProductRef) -> Result<Option<Enrollment>> {
        self.find_enrollment_impl(user_id, item).await
    }

    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        self.list_enrollments_with_pagination_impl(query).await
    }

    async fn update_enrollment_progress(
        &self,
        id: i64,
        progress: i32,
    ) -> Result<Option<Enrollment>> {
        self.update_enrollment_progress_impl(id, progress).await
    }

    async fn create_channel(
        &self,
        created_by: i64,
        req: CreateChannelRequest,
    ) -> Result<ChatChannel> {
        self.create_channel_impl(created_by, req).await
    }

    async fn get_channel_by_id(&self, id: i64) -> Result<Option<ChatChannel>> {
        self.get_channel_by_id_impl(id).await
    }

    async fn list_active_channels(&self) -> Result<Vec<ChatChannel>> {
        self.list_active_channels_impl().await
    }

    async fn set_channel_active(&self, id: i64, is_active: bool) -> Result<Option<ChatChannel>> {
        self.set_channel_active_impl(id, is_active).await
    }

    async fn create_chat_message(
        &self,
        channel_id: i64,
        user_id: i64,
        username: &str,
        content: &str,
    ) -> Result<ChatMessage> {
        self.create_chat_message_impl(channel_id, user_id, username, content).await
    }

    async fn list_channel_messages(
        &self,
        channel_id: i64,
        before_id: Option<i64>,
        limit: u64,
    ) -> Result<Vec<ChatMessage>> {
        self.list_channel_messages_impl(channel_id, before_id, limit).await
    }

    async fn delete_chat_messages_before(&self, cutoff: i64) -> Result<u64> {
        self.delete_chat_messages_before_impl(cutoff).await
    }

    async fn create_material(
        &self,
        owner_id: i64,
        req: CreateMaterialRequest,
    ) -> Result<SourceMaterial> {
        self.create_material_impl(owner_id, req).await
    }

    async fn get_material_by_id(&self, id: i64) -> Result<Option<SourceMaterial>> {
        self.get_material_by_id_impl(id).await
    }

    async fn list_materials_with_pagination(
        &self,
        query: MaterialListQuery,
    ) -> Result<MaterialListResponse> {
        self.list_materials_with_pagination_impl(query).await
    }

    async fn delete_material(&self, id: i64) -> Result<bool> {
        self.delete_material_impl(id).await
    }

    async fn update_material_analysis(
        &self,
        id: i64,
        status: AnalysisStatus,
        analysis_json: Option<String>,
    ) -> Result<Option<SourceMaterial>> {
        self.update_material_analysis_impl(id, status, analysis_json).await
    }

}
