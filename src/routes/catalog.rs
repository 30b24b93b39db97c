use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::courses::requests::CourseListParams;
use crate::models::instructors::requests::InstructorListParams;
use crate::models::notices::requests::NoticeListParams;
use crate::models::reviews::requests::ReviewListParams;
use crate::models::seminars::requests::SeminarListParams;
use crate::models::workbooks::requests::WorkbookListParams;
use crate::services::CatalogService;
use crate::utils::SafeIDI64;

// 公开目录，不需要登录
static CATALOG_SERVICE: Lazy<CatalogService> = Lazy::new(CatalogService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn get_course(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.get_course(id.0, &req).await
}

pub async fn list_workbooks(
    req: HttpRequest,
    query: web::Query<WorkbookListParams>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_workbooks(query.into_inner(), &req).await
}

pub async fn get_workbook(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.get_workbook(id.0, &req).await
}

pub async fn list_seminars(
    req: HttpRequest,
    query: web::Query<SeminarListParams>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_seminars(query.into_inner(), &req).await
}

pub async fn get_seminar(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.get_seminar(id.0, &req).await
}

pub async fn list_instructors(
    req: HttpRequest,
    query: web::Query<InstructorListParams>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_instructors(query.into_inner(), &req).await
}

pub async fn get_instructor(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.get_instructor(id.0, &req).await
}

pub async fn list_notices(
    req: HttpRequest,
    query: web::Query<NoticeListParams>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_notices(query.into_inner(), &req).await
}

pub async fn get_notice(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.get_notice(id.0, &req).await
}

pub async fn list_reviews(
    req: HttpRequest,
    query: web::Query<ReviewListParams>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_reviews(query.into_inner(), &req).await
}

// 配置路由；不使用 "/api/v1" scope，避免吞掉其他 /api/v1 下的 scope
pub fn configure_catalog_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/courses", web::get().to(list_courses))
        .route("/api/v1/courses/{id}", web::get().to(get_course))
        .route("/api/v1/workbooks", web::get().to(list_workbooks))
        .route("/api/v1/workbooks/{id}", web::get().to(get_workbook))
        .route("/api/v1/seminars", web::get().to(list_seminars))
        .route("/api/v1/seminars/{id}", web::get().to(get_seminar))
        .route("/api/v1/instructors", web::get().to(list_instructors))
        .route("/api/v1/instructors/{id}", web::get().to(get_instructor))
        .route("/api/v1/notices", web::get().to(list_notices))
        .route("/api/v1/notices/{id}", web::get().to(get_notice))
        .route("/api/v1/reviews", web::get().to(list_reviews));
}
