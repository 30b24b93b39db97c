use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::applications::requests::{
    ApplicationListParams, UpdateApplicationStatusRequest,
};
use crate::models::courses::requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest};
use crate::models::enrollments::requests::EnrollmentListParams;
use crate::models::instructors::requests::{
    CreateInstructorRequest, InstructorListParams, UpdateInstructorRequest,
};
use crate::models::materials::requests::{
    AnalyzeMaterialRequest, CreateMaterialRequest, MaterialListParams,
};
use crate::models::seminars::requests::{
    CreateSeminarRequest, SeminarListParams, UpdateSeminarRequest,
};
use crate::models::users::entities::UserRole;
use crate::models::workbooks::requests::{
    CreateWorkbookRequest, UpdateWorkbookRequest, WorkbookListParams,
};
use crate::services::{ApplicationService, BusinessService, MaterialService};
use crate::utils::SafeIDI64;

static BUSINESS_SERVICE: Lazy<BusinessService> = Lazy::new(BusinessService::new_lazy);
static MATERIAL_SERVICE: Lazy<MaterialService> = Lazy::new(MaterialService::new_lazy);
static APPLICATION_SERVICE: Lazy<ApplicationService> = Lazy::new(ApplicationService::new_lazy);

// 讲师
pub async fn list_instructors(
    req: HttpRequest,
    query: web::Query<InstructorListParams>,
) -> ActixResult<HttpResponse> {
    BUSINESS_SERVICE.list_instructors(query.into_inner(), &req).await
}

pub async fn create_instructor(
    req: HttpRequest,
    body: web::Json<CreateInstructorRequest>,
) -> ActixResult<HttpResponse> {
    BUSINESS_SERVICE.create_instructor(body.into_inner(), &req).await
}

pub async fn update_instructor(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateInstructorRequest>,
) -> ActixResult<HttpResponse> {
    BUSINESS_SERVICE
        .update_instructor(id.0, body.into_inner(), &req)
        .await
}

pub async fn deactivate_instructor(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    let body = UpdateInstructorRequest {
        is_active: Some(false),
        ..Default::default()
    };
    BUSINESS_SERVICE.update_instructor(id.0, body, &req).await
}

// 课程
pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    BUSINESS_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn create_course(
    req: HttpRequest,
    body: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    BUSINESS_SERVICE.create_course(body.into_inner(), &req).await
}

pub async fn update_course(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    BUSINESS_SERVICE
        .update_course(id.0, body.into_inner(), &req)
        .await
}

pub async fn deactivate_course(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    let body = UpdateCourseRequest {
        is_active: Some(false),
        ..Default::default()
    };
    BUSINESS_SERVICE.update_course(id.0, body, &req).await
}

// 练习册
pub async fn list_workbooks(
    req: HttpRequest,
    query: web::Query<WorkbookListParams>,
) -> ActixResult<HttpResponse> {
    BUSINESS_SERVICE.list_workbooks(query.into_inner(), &req).await
}

pub async fn create_workbook(
    req: HttpRequest,
    body: web::Json<CreateWorkbookRequest>,
) -> ActixResult<HttpResponse> {
    BUSINESS_SERVICE.create_workbook(body.into_inner(), &req).await
}

pub async fn update_workbook(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateWorkbookRequest>,
) -> ActixResult<HttpResponse> {
    BUSINESS_SERVICE
        .update_workbook(id.0, body.into_inner(), &req)
        .await
}

pub async fn deactivate_workbook(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    let body = UpdateWorkbookRequest {
        is_active: Some(false),
        ..Default::default()
    };
    BUSINESS_SERVICE.update_workbook(id.0, body, &req).await
}

// 研讨会
pub async fn list_seminars(
    req: HttpRequest,
    query: web::Query<SeminarListParams>,
) -> ActixResult<HttpResponse> {
    BUSINESS_SERVICE.list_seminars(query.into_inner(), &req).await
}

pub async fn create_seminar(
    req: HttpRequest,
    body: web::Json<CreateSeminarRequest>,
) -> ActixResult<HttpResponse> {
    BUSINESS_SERVICE.create_seminar(body.into_inner(), &req).await
}

pub async fn update_seminar(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateSeminarRequest>,
) -> ActixResult<HttpResponse> {
    BUSINESS_SERVICE
        .update_seminar(id.0, body.into_inner(), &req)
        .await
}

pub async fn deactivate_seminar(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    let body = UpdateSeminarRequest {
        is_active: Some(false),
        ..Default::default()
    };
    BUSINESS_SERVICE.update_seminar(id.0, body, &req).await
}

// 报名审核
pub async fn list_seminar_applications(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<ApplicationListParams>,
) -> ActixResult<HttpResponse> {
    APPLICATION_SERVICE
        .list_seminar_applications(id.0, query.into_inner(), &req)
        .await
}

pub async fn review_application(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateApplicationStatusRequest>,
) -> ActixResult<HttpResponse> {
    APPLICATION_SERVICE
        .review_application(id.0, body.into_inner(), &req)
        .await
}

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    BUSINESS_SERVICE.list_enrollments(query.into_inner(), &req).await
}

// 原始资料
pub async fn list_materials(
    req: HttpRequest,
    query: web::Query<MaterialListParams>,
) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.list_materials(query.into_inner(), &req).await
}

pub async fn create_material(
    req: HttpRequest,
    body: web::Json<CreateMaterialRequest>,
) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.create_material(body.into_inner(), &req).await
}

pub async fn get_material(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.get_material(id.0, &req).await
}

pub async fn delete_material(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.delete_material(id.0, &req).await
}

pub async fn analyze_material(
    req: HttpRequest,
    id: SafeIDI64,
    body: Option<web::Json<AnalyzeMaterialRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    MATERIAL_SERVICE.analyze_material(id.0, body, &req).await
}

// 配置路由
pub fn configure_business_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/business")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::business_roles()))
                    .service(
                        web::resource("/instructors")
                            .route(web::get().to(list_instructors))
                            .route(web::post().to(create_instructor)),
                    )
                    .service(
                        web::resource("/instructors/{id}")
                            .route(web::put().to(update_instructor))
                            .route(web::delete().to(deactivate_instructor)),
                    )
                    .service(
                        web::resource("/courses")
                            .route(web::get().to(list_courses))
                            .route(web::post().to(create_course)),
                    )
                    .service(
                        web::resource("/courses/{id}")
                            .route(web::put().to(update_course))
                            .route(web::delete().to(deactivate_course)),
                    )
                    .service(
                        web::resource("/workbooks")
                            .route(web::get().to(list_workbooks))
                            .route(web::post().to(create_workbook)),
                    )
                    .service(
                        web::resource("/workbooks/{id}")
                            .route(web::put().to(update_workbook))
                            .route(web::delete().to(deactivate_workbook)),
                    )
                    .service(
                        web::resource("/seminars")
                            .route(web::get().to(list_seminars))
                            .route(web::post().to(create_seminar)),
                    )
                    .service(
                        web::resource("/seminars/{id}")
                            .route(web::put().to(update_seminar))
                            .route(web::delete().to(deactivate_seminar)),
                    )
                    .route(
                        "/seminars/{id}/applications",
                        web::get().to(list_seminar_applications),
                    )
                    .route(
                        "/applications/{id}/status",
                        web::put().to(review_application),
                    )
                    .route("/enrollments", web::get().to(list_enrollments))
                    .service(
                        web::resource("/materials")
                            .route(web::get().to(list_materials))
                            .route(web::post().to(create_material)),
                    )
                    .service(
                        web::resource("/materials/{id}")
                            .route(web::get().to(get_material))
                            .route(web::delete().to(delete_material)),
                    )
                    .service(
                        web::resource("/materials/{id}/analysis")
                            .wrap(middlewares::RateLimit::analysis())
                            .route(web::post().to(analyze_material)),
                    ),
            ),
    );
}
