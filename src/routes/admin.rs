use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::SetActiveRequest;
use crate::models::chat::requests::CreateChannelRequest;
use crate::models::courses::requests::CourseListParams;
use crate::models::notices::requests::{CreateNoticeRequest, NoticeListParams, UpdateNoticeRequest};
use crate::models::payments::requests::{PaymentListParams, UpdatePaymentStatusRequest};
use crate::models::seminars::requests::SeminarListParams;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{UpdateUserRequest, UserListParams};
use crate::models::workbooks::requests::WorkbookListParams;
use crate::services::{AdminService, PaymentService};
use crate::utils::SafeIDI64;

static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);
static PAYMENT_SERVICE: Lazy<PaymentService> = Lazy::new(PaymentService::new_lazy);

// 用户
pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn get_user(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.get_user(id.0, &req).await
}

pub async fn update_user(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateUserRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.update_user(id.0, body.into_inner(), &req).await
}

// 内容上下架
pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn set_course_active(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<SetActiveRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .set_course_active(id.0, body.into_inner(), &req)
        .await
}

pub async fn list_workbooks(
    req: HttpRequest,
    query: web::Query<WorkbookListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_workbooks(query.into_inner(), &req).await
}

pub async fn set_workbook_active(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<SetActiveRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .set_workbook_active(id.0, body.into_inner(), &req)
        .await
}

pub async fn list_seminars(
    req: HttpRequest,
    query: web::Query<SeminarListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_seminars(query.into_inner(), &req).await
}

pub async fn set_seminar_active(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<SetActiveRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .set_seminar_active(id.0, body.into_inner(), &req)
        .await
}

// 支付
pub async fn list_payments(
    req: HttpRequest,
    query: web::Query<PaymentListParams>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.list_all_payments(query.into_inner(), &req).await
}

pub async fn update_payment_status(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdatePaymentStatusRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .update_payment_status(id.0, body.into_inner(), &req)
        .await
}

// 公告
pub async fn list_notices(
    req: HttpRequest,
    query: web::Query<NoticeListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_notices(query.into_inner(), &req).await
}

pub async fn create_notice(
    req: HttpRequest,
    body: web::Json<CreateNoticeRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.create_notice(body.into_inner(), &req).await
}

pub async fn update_notice(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateNoticeRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .update_notice(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_notice(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.delete_notice(id.0, &req).await
}

// 聊天频道
pub async fn create_channel(
    req: HttpRequest,
    body: web::Json<CreateChannelRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.create_channel(body.into_inner(), &req).await
}

pub async fn deactivate_channel(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.deactivate_channel(id.0, &req).await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/users", web::get().to(list_users))
                    .route("/users/{id}", web::get().to(get_user))
                    .route("/users/{id}", web::put().to(update_user))
                    .route("/courses", web::get().to(list_courses))
                    .route("/courses/{id}/active", web::put().to(set_course_active))
                    .route("/workbooks", web::get().to(list_workbooks))
                    .route("/workbooks/{id}/active", web::put().to(set_workbook_active))
                    .route("/seminars", web::get().to(list_seminars))
                    .route("/seminars/{id}/active", web::put().to(set_seminar_active))
                    .route("/payments", web::get().to(list_payments))
                    .route("/payments/{id}/status", web::put().to(update_payment_status))
                    .route("/notices", web::get().to(list_notices))
                    .route("/notices", web::post().to(create_notice))
                    .route("/notices/{id}", web::put().to(update_notice))
                    .route("/notices/{id}", web::delete().to(delete_notice))
                    .route("/channels", web::post().to(create_channel))
                    .route("/channels/{id}", web::delete().to(deactivate_channel)),
            ),
    );
}
