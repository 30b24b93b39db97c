use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BusinessService, TITLE_MAX_LENGTH, owned_material, scoped_business_id};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, validate_price,
    materials::entities::AnalysisStatus,
    seminars::{
        entities::SeminarKind,
        requests::{
            CreateSeminarRequest, NewSeminar, SeminarListParams, SeminarListQuery,
            UpdateSeminarRequest,
        },
    },
};
use crate::services::{
    bad_request, can_manage, error_response, forbidden, not_found, unauthorized,
};
use crate::utils::validate::validate_title;

fn validate_capacity(capacity: Option<i32>) -> Result<(), HttpResponse> {
    match capacity {
        Some(c) if c <= 0 => Err(bad_request(
            ErrorCode::InvalidParameter,
            "Capacity must be positive",
        )),
        _ => Ok(()),
    }
}

pub async fn list_seminars(
    service: &BusinessService,
    query: SeminarListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    let list_query = SeminarListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        kind: query.kind,
        search: query.search,
        business_id: scoped_business_id(&user, query.business_id),
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

/// analysis 类型从资料复制已完成的分析结果
pub async fn create_seminar(
    service: &BusinessService,
    body: CreateSeminarRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    if let Err(msg) = validate_title(&body.title, "Title", TITLE_MAX_LENGTH) {
        return Ok(bad_request(ErrorCode::InvalidParameter, msg));
    }
    if let Err(msg) = validate_price(body.price, None) {
        return Ok(bad_request(ErrorCode::InvalidPrice, msg));
    }
    if let Err(response) = validate_capacity(body.capacity) {
        return Ok(response);
    }

    let material = match body.source_material_id {
        Some(material_id) => match owned_material(&storage, &user, material_id).await {
            Ok(material) => Some(material),
            Err(response) => return Ok(response),
        },
        None => None,
    };

    let analysis_json = match body.kind {
        SeminarKind::Event => None,
        SeminarKind::Analysis => {
            let Some(material) = material else {
                return Ok(bad_request(
                    ErrorCode::InvalidParameter,
                    "Analysis seminars require a source material",
                ));
            };
            let analysis = match (material.analysis_status, material.analysis) {
                (AnalysisStatus::Completed, Some(analysis)) => analysis,
                (status, _) => {
                    return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                        ErrorCode::AnalysisNotReady,
                        format!("Source material analysis is {status}, not completed"),
                    )));
                }
            };
            match serde_json::to_string(&analysis) {
                Ok(json) => Some(json),
                Err(e) => {
                    tracing::error!("Failed to serialize analysis: {e}");
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            "Failed to copy analysis",
                        ),
                    ));
                }
            }
        }
    };

    let seminar = NewSeminar {
        business_id: user.id,
        kind: body.kind,
        title: body.title.trim().to_string(),
        description: body.description,
        location: body.location,
        starts_at: body.starts_at,
        capacity: body.capacity,
        price: body.price,
        source_material_id: body.source_material_id,
        analysis_json,
    };

    match storage.create_seminar(seminar).await {
        Ok(seminar) => {
            tracing::info!(
                "Seminar {} ({}) created by business {}",
                seminar.id,
                seminar.kind,
                user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(seminar, "Seminar created")))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn update_seminar(
    service: &BusinessService,
    id: i64,
    body: UpdateSeminarRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    match storage.get_seminar_by_id(id).await {
        Ok(Some(seminar)) if can_manage(&user, seminar.business_id) => {}
        Ok(Some(_)) => return Ok(forbidden("You do not own this seminar")),
        Ok(None) => return Ok(not_found(ErrorCode::SeminarNotFound, "Seminar not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    if let Some(ref title) = body.title
        && let Err(msg) = validate_title(title, "Title", TITLE_MAX_LENGTH)
    {
        return Ok(bad_request(ErrorCode::InvalidParameter, msg));
    }
    if let Some(price) = body.price
        && let Err(msg) = validate_price(price, None)
    {
        return Ok(bad_request(ErrorCode::InvalidPrice, msg));
    }
    if let Err(response) = validate_capacity(body.capacity) {
        return Ok(response);
    }

    match storage.update_seminar(id, body).await {
        Ok(Some(seminar)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            seminar,
            "Seminar updated",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::SeminarNotFound, "Seminar not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::materials::requests::CreateMaterialRequest;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{body_json, memory_storage, request_as, seed};
    use actix_web::http::StatusCode;

    const ANALYSIS: &str = r#"{"title":"Fox","summary":"A fox jumps.","sentences":[{"index":1,"text":"The fox jumps.","translation":"여우가 뛴다."}]}"#;

    fn analysis_seminar(material_id: i64) -> CreateSeminarRequest {
        CreateSeminarRequest {
            kind: SeminarKind::Analysis,
            title: "Reading the fox".to_string(),
            description: None,
            location: None,
            starts_at: None,
            capacity: None,
            price: 0,
            source_material_id: Some(material_id),
        }
    }

    #[actix_web::test]
    async fn test_analysis_seminar_requires_completed_material() {
        let storage = memory_storage().await;
        let owner = seed(&storage, "academy", UserRole::Business).await;
        let rival = seed(&storage, "rival", UserRole::Business).await;
        let material = storage
            .create_material(
                owner.id,
                CreateMaterialRequest {
                    title: "Mock exam".to_string(),
                    content_text: "The fox jumps.".to_string(),
                    file_name: None,
                    file_url: None,
                },
            )
            .await
            .unwrap();
        let service = BusinessService::with_storage(storage.clone());

        let resp = service
            .create_seminar(analysis_seminar(material.id), &request_as(&owner))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(resp).await["code"], ErrorCode::AnalysisNotReady as i32);

        storage
            .update_material_analysis(
                material.id,
                AnalysisStatus::Completed,
                Some(ANALYSIS.to_string()),
            )
            .await
            .unwrap();

        let resp = service
            .create_seminar(analysis_seminar(material.id), &request_as(&rival))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = service
            .create_seminar(analysis_seminar(material.id), &request_as(&owner))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["kind"], "analysis");
        assert_eq!(body["data"]["analysis"]["sentences"][0]["index"], 1);

        let mut missing = analysis_seminar(material.id);
        missing.source_material_id = None;
        let resp = service
            .create_seminar(missing, &request_as(&owner))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
