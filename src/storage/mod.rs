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

use std::sync::Arc;

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 为哈希值）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 讲师管理方法
    async fn create_instructor(
        &self,
        business_id: i64,
        req: CreateInstructorRequest,
    ) -> Result<Instructor>;
    async fn get_instructor_by_id(&self, id: i64) -> Result<Option<Instructor>>;
    async fn list_instructors_with_pagination(
        &self,
        query: InstructorListQuery,
    ) -> Result<InstructorListResponse>;
    async fn update_instructor(
        &self,
        id: i64,
        update: UpdateInstructorRequest,
    ) -> Result<Option<Instructor>>;

    /// 课程管理方法
    async fn create_course(&self, business_id: i64, req: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest)
    -> Result<Option<Course>>;

    /// 练习册管理方法
    async fn create_workbook(
        &self,
        business_id: i64,
        req: CreateWorkbookRequest,
    ) -> Result<Workbook>;
    async fn get_workbook_by_id(&self, id: i64) -> Result<Option<Workbook>>;
    async fn list_workbooks_with_pagination(
        &self,
        query: WorkbookListQuery,
    ) -> Result<WorkbookListResponse>;
    async fn update_workbook(
        &self,
        id: i64,
        update: UpdateWorkbookRequest,
    ) -> Result<Option<Workbook>>;
    // 商家拥有的某类商品 ID
    async fn list_business_item_ids(&self, business_id: i64, item_type: ItemType)
    -> Result<Vec<i64>>;

    /// 研讨会管理方法
    async fn create_seminar(&self, seminar: NewSeminar) -> Result<Seminar>;
    async fn get_seminar_by_id(&self, id: i64) -> Result<Option<Seminar>>;
    async fn list_seminars_with_pagination(
        &self,
        query: SeminarListQuery,
    ) -> Result<SeminarListResponse>;
    async fn update_seminar(
        &self,
        id: i64,
        update: UpdateSeminarRequest,
    ) -> Result<Option<Seminar>>;

    /// 研讨会报名方法
    // 报名；已取消的报名会被重新激活
    async fn create_application(
        &self,
        seminar_id: i64,
        user_id: i64,
        message: Option<String>,
    ) -> Result<SeminarApplication>;
    async fn get_application_by_id(&self, id: i64) -> Result<Option<SeminarApplication>>;
    async fn list_applications_with_pagination(
        &self,
        query: ApplicationListQuery,
    ) -> Result<ApplicationListResponse>;
    // 更新报名状态；批准时在同一事务中检查名额
    async fn update_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
        capacity: Option<i32>,
    ) -> Result<Option<SeminarApplication>>;

    /// 公告管理方法
    async fn create_notice(&self, author_id: i64, req: CreateNoticeRequest) -> Result<Notice>;
    async fn get_notice_by_id(&self, id: i64) -> Result<Option<Notice>>;
    async fn list_notices_with_pagination(
        &self,
        query: NoticeListQuery,
    ) -> Result<NoticeListResponse>;
    async fn update_notice(&self, id: i64, update: UpdateNoticeRequest)
    -> Result<Option<Notice>>;

    /// 评价管理方法
    // 创建评价；软删除过的评价会被重新激活
    async fn create_review(&self, user_id: i64, req: CreateReviewRequest) -> Result<Review>;
    async fn get_review_by_id(&self, id: i64) -> Result<Option<Review>>;
    async fn list_item_reviews(
        &self,
        item: ProductRef,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<ReviewListResponse>;
    async fn update_review(&self, id: i64, update: UpdateReviewRequest)
    -> Result<Option<Review>>;
    async fn deactivate_review(&self, id: i64) -> Result<bool>;

    /// 购物车方法
    async fn list_cart_items(&self, user_id: i64) -> Result<Vec<CartItem>>;
    async fn add_cart_item(&self, user_id: i64, item: ProductRef) -> Result<CartItem>;
    async fn remove_cart_item(&self, user_id: i64, cart_item_id: i64) -> Result<bool>;
    async fn clear_cart(&self, user_id: i64) -> Result<u64>;

    /// 支付方法
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment>;
    async fn get_payment_by_id(&self, id: i64) -> Result<Option<Payment>>;
    async fn get_payment_by_order_id(&self, order_id: &str) -> Result<Option<Payment>>;
    async fn list_payments_with_pagination(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaymentListResponse>;
    // 确认支付：pending -> paid，创建选课记录并移出购物车，全部在一个事务中
    async fn confirm_payment(
        &self,
        order_id: &str,
        method: Option<String>,
    ) -> Result<(Payment, Vec<Enrollment>)>;
    // 状态迁移；退款时取消关联的选课记录
    async fn transition_payment(&self, id: i64, next: PaymentStatus) -> Result<Payment>;

    /// 选课方法
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn find_enrollment(&self, user_id: i64, item: ProductRef) -> Result<Option<Enrollment>>;
    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse>;
    // 更新学习进度，100 时标记为已完成
    async fn update_enrollment_progress(&self, id: i64, progress: i32)
    -> Result<Option<Enrollment>>;

    /// 聊天方法
    async fn create_channel(&self, created_by: i64, req: CreateChannelRequest)
    -> Result<ChatChannel>;
    async fn get_channel_by_id(&self, id: i64) -> Result<Option<ChatChannel>>;
    async fn list_active_channels(&self) -> Result<Vec<ChatChannel>>;
    async fn set_channel_active(&self, id: i64, is_active: bool) -> Result<Option<ChatChannel>>;
    async fn create_chat_message(
        &self,
        channel_id: i64,
        user_id: i64,
        username: &str,
        content: &str,
    ) -> Result<ChatMessage>;
    // 按时间正序返回最近的消息
    async fn list_channel_messages(
        &self,
        channel_id: i64,
        before_id: Option<i64>,
        limit: u64,
    ) -> Result<Vec<ChatMessage>>;
    // 删除早于 cutoff（unix 秒）的消息
    async fn delete_chat_messages_before(&self, cutoff: i64) -> Result<u64>;

    /// 资料管理方法
    async fn create_material(
        &self,
        owner_id: i64,
        req: CreateMaterialRequest,
    ) -> Result<SourceMaterial>;
    async fn get_material_by_id(&self, id: i64) -> Result<Option<SourceMaterial>>;
    async fn list_materials_with_pagination(
        &self,
        query: MaterialListQuery,
    ) -> Result<MaterialListResponse>;
    async fn delete_material(&self, id: i64) -> Result<bool>;
    async fn update_material_analysis(
        &self,
        id: i64,
        status: AnalysisStatus,
        analysis_json: Option<String>,
    ) -> Result<Option<SourceMaterial>>;
}

/// 按配置创建存储后端（连接数据库并运行迁移）
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
