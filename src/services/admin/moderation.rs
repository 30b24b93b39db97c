use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, SetActiveRequest,
    courses::requests::{CourseListParams, CourseListQuery, UpdateCourseRequest},
    seminars::requests::{SeminarListParams, SeminarListQuery, UpdateSeminarRequest},
    workbooks::requests::{UpdateWorkbookRequest, WorkbookListParams, WorkbookListQuery},
};
use crate::services::{error_response, not_found};

fn log_toggle(request: &HttpRequest, kind: &str, id: i64, is_active: bool) {
    let admin_id = RequireJWT::extract_user_id(request).unwrap_or_default();
    tracing::info!("Admin {admin_id} set {kind} {id} active={is_active}");
}

pub async fn list_courses(
    service: &AdminService,
    query: CourseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = CourseListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
        category: query.category,
        business_id: query.business_id,
        instructor_id: query.instructor_id,
        include_inactive: true,
    };

    match storage.list_courses_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Courses retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn set_course_active(
    service: &AdminService,
    id: i64,
    body: SetActiveRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let update = UpdateCourseRequest {
        is_active: Some(body.is_active),
        ..Default::default()
    };

    match storage.update_course(id, update).await {
        Ok(Some(course)) => {
            log_toggle(request, "course", id, body.is_active);
            Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Course updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn list_workbooks(
    service: &AdminService,
    query: WorkbookListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = WorkbookListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
        business_id: query.business_id,
        include_inactive: true,
    };

    match storage.list_workbooks_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Workbooks retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn set_workbook_active(
    service: &AdminService,
    id: i64,
    body: SetActiveRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let update = UpdateWorkbookRequest {
        is_active: Some(body.is_active),
        ..Default::default()
    };

    match storage.update_workbook(id, update).await {
        Ok(Some(workbook)) => {
            log_toggle(request, "workbook", id, body.is_active);
            Ok(HttpResponse::Ok().json(ApiResponse::success(workbook, "Workbook updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::WorkbookNotFound, "Workbook not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn list_seminars(
    service: &AdminService,
    query: SeminarListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = SeminarListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        kind: query.kind,
        search: query.search,
        business_id: query.business_id,
        include_inactive: true,
    };

    match storage.list_seminars_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Seminars retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn set_seminar_active(
    service: &AdminService,
    id: i64,
    body: SetActiveRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let update = UpdateSeminarRequest {
        is_active: Some(body.is_active),
        ..Default::default()
    };

    match storage.update_seminar(id, update).await {
        Ok(Some(seminar)) => {
            log_toggle(request, "seminar", id, body.is_active);
            Ok(HttpResponse::Ok().json(ApiResponse::success(seminar, "Seminar updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::SeminarNotFound, "Seminar not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{body_json, memory_storage, request_as, seed};
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_set_course_active_toggles_visibility() {
        let storage = memory_storage().await;
        let admin = seed(&storage, "admin", UserRole::Admin).await;
        let business = seed(&storage, "academy", UserRole::Business).await;
        let course = storage
            .create_course(
                business.id,
                CreateCourseRequest {
                    title: "Debate".to_string(),
                    description: None,
                    category: None,
                    level: None,
                    price: 30_000,
                    discount_price: None,
                    thumbnail_url: None,
                    instructor_id: None,
                    source_material_id: None,
                },
            )
            .await
            .unwrap();

        let service = AdminService::with_storage(storage.clone());
        let request = request_as(&admin);

        let resp = service
            .set_course_active(course.id, SetActiveRequest { is_active: false }, &request)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["data"]["is_active"], false);
        let stored = storage.get_course_by_id(course.id).await.unwrap().unwrap();
        assert!(!stored.is_active);

        let resp = service
            .set_course_active(course.id + 100, SetActiveRequest { is_active: true }, &request)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["code"], ErrorCode::CourseNotFound as i32);
    }
}
