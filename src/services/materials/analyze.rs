use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MaterialService;
use super::prompt::{SYSTEM_PROMPT, truncate_chars, user_prompt};
use crate::config::AppConfig;
use crate::llm::LlmClient;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    materials::{
        DocumentAnalysis, parse_analysis,
        entities::AnalysisStatus,
        requests::AnalyzeMaterialRequest,
        responses::AnalysisResponse,
    },
};
use crate::services::business::owned_material;
use crate::services::{error_response, unauthorized};

/// 最后一次失败的原因
#[derive(Debug, PartialEq)]
pub(crate) enum AnalysisFailure {
    Rejected(String),
    Upstream(String),
}

impl AnalysisFailure {
    fn reason(&self) -> &str {
        match self {
            AnalysisFailure::Rejected(reason) | AnalysisFailure::Upstream(reason) => reason,
        }
    }
}

/// 调用模型直到结果通过校验；被拒绝的原因附加到下一次的提示词中
pub(crate) async fn run_analysis(
    llm: &dyn LlmClient,
    content: &str,
    max_attempts: u32,
) -> Result<(DocumentAnalysis, u32), (AnalysisFailure, u32)> {
    let max_attempts = max_attempts.max(1);
    let mut rejection: Option<String> = None;
    let mut last_failure = AnalysisFailure::Rejected("no attempt made".to_string());

    for attempt in 1..=max_attempts {
        let prompt = user_prompt(content, rejection.as_deref());
        let raw = match llm.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Analysis attempt {attempt}/{max_attempts} failed upstream: {e}");
                last_failure = AnalysisFailure::Upstream(e.message().to_string());
                continue;
            }
        };

        match parse_analysis(&raw) {
            Ok(analysis) => return Ok((analysis, attempt)),
            Err(rejected) => {
                tracing::warn!("Analysis attempt {attempt}/{max_attempts} rejected: {rejected}");
                rejection = Some(rejected.0.clone());
                last_failure = AnalysisFailure::Rejected(rejected.0);
            }
        }
    }

    Err((last_failure, max_attempts))
}

pub async fn analyze_material(
    service: &MaterialService,
    material_id: i64,
    body: AnalyzeMaterialRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    let material = match owned_material(&storage, &user, material_id).await {
        Ok(material) => material,
        Err(response) => return Ok(response),
    };

    if !body.force
        && material.analysis_status == AnalysisStatus::Completed
        && let Some(analysis) = material.analysis
    {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            AnalysisResponse {
                material_id,
                analysis,
                cached: true,
                attempts: 0,
            },
            "Analysis retrieved from cache",
        )));
    }

    if !body.force && material.analysis_status == AnalysisStatus::Pending {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AnalysisNotReady,
            "Analysis is already in progress",
        )));
    }

    let Some(llm) = service.get_llm(request) else {
        return Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
            ErrorCode::AnalysisUnavailable,
            "Document analysis is not configured",
        )));
    };

    if material.content_text.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::MaterialEmpty,
            "Source material has no text to analyze",
        )));
    }

    let config = AppConfig::get();
    let content = truncate_chars(&material.content_text, config.llm.max_input_chars);

    if let Err(e) = storage
        .update_material_analysis(material_id, AnalysisStatus::Pending, None)
        .await
    {
        return Ok(error_response(&e, ErrorCode::InternalServerError));
    }

    match run_analysis(llm.as_ref(), content, config.llm.max_attempts).await {
        Ok((analysis, attempts)) => {
            let json = match serde_json::to_string(&analysis) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize analysis: {e}");
                    mark_failed(&storage, material_id).await;
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            "Failed to store analysis",
                        ),
                    ));
                }
            };

            if let Err(e) = storage
                .update_material_analysis(material_id, AnalysisStatus::Completed, Some(json))
                .await
            {
                // 结果未能保存，不能停留在 pending
                mark_failed(&storage, material_id).await;
                return Ok(error_response(&e, ErrorCode::InternalServerError));
            }

            tracing::info!("Material {material_id} analyzed in {attempts} attempt(s)");
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AnalysisResponse {
                    material_id,
                    analysis,
                    cached: false,
                    attempts,
                },
                "Analysis completed",
            )))
        }
        Err((failure, attempts)) => {
            mark_failed(&storage, material_id).await;
            tracing::warn!(
                "Material {material_id} analysis failed after {attempts} attempt(s): {}",
                failure.reason()
            );

            let message = format!(
                "Analysis failed after {attempts} attempt(s): {}",
                failure.reason()
            );
            let response = match failure {
                AnalysisFailure::Rejected(_) => HttpResponse::UnprocessableEntity()
                    .json(ApiResponse::error_empty(ErrorCode::AnalysisFailed, message)),
                AnalysisFailure::Upstream(_) => HttpResponse::BadGateway()
                    .json(ApiResponse::error_empty(ErrorCode::AnalysisFailed, message)),
            };
            Ok(response)
        }
    }
}

async fn mark_failed(storage: &std::sync::Arc<dyn crate::storage::Storage>, material_id: i64) {
    if let Err(e) = storage
        .update_material_analysis(material_id, AnalysisStatus::Failed, None)
        .await
    {
        tracing::error!("Failed to mark material {material_id} as failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedLlm;
    use crate::models::materials::requests::CreateMaterialRequest;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{body_json, memory_storage, request_as, seed};
    use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};
    use actix_web::http::StatusCode;
    use sea_orm::ConnectionTrait;
    use std::sync::Arc;

    const VALID: &str = r#"```json
{"title":"Fox","summary":"여우 이야기","sentences":[{"index":1,"text":"The fox jumps.","translation":"여우가 뛴다.","notes":[]}],"questions":[{"question":"Who jumps?","choices":["fox","dog"],"answer":0}]}
```"#;
    const BAD_INDEX: &str = r#"{"title":"Fox","summary":"s","sentences":[{"index":2,"text":"t","translation":"x"}]}"#;
    const EXTRA_FIELD: &str = r#"{"title":"Fox","summary":"s","sentences":[],"difficulty":"easy"}"#;

    #[actix_web::test]
    async fn test_run_analysis_retries_with_reason() {
        let llm = ScriptedLlm::new([BAD_INDEX, VALID]);
        let (analysis, attempts) = run_analysis(&llm, "The fox jumps.", 3).await.unwrap();
        assert_eq!(attempts, 2);
        assert_eq!(analysis.title, "Fox");

        let prompts = llm.prompts.lock().unwrap();
        assert!(!prompts[0].contains("rejected"));
        assert!(prompts[1].contains("Previous response was rejected"));
        assert!(prompts[1].contains("expected 1"));
    }

    #[actix_web::test]
    async fn test_run_analysis_gives_up_after_max_attempts() {
        let llm = ScriptedLlm::new([BAD_INDEX, EXTRA_FIELD, BAD_INDEX, VALID]);
        let (failure, attempts) = run_analysis(&llm, "text", 3).await.unwrap_err();
        assert_eq!(attempts, 3);
        assert_eq!(llm.calls(), 3);
        assert!(matches!(failure, AnalysisFailure::Rejected(ref r) if r.contains("index")));

        let llm = ScriptedLlm::failing("overloaded");
        let (failure, _) = run_analysis(&llm, "text", 1).await.unwrap_err();
        assert_eq!(failure, AnalysisFailure::Upstream("overloaded".to_string()));
    }

    #[actix_web::test]
    async fn test_analyze_material_caches_and_marks_failures() {
        let storage = memory_storage().await;
        let owner = seed(&storage, "academy", UserRole::Business).await;
        let material = storage
            .create_material(
                owner.id,
                CreateMaterialRequest {
                    title: "Fox".to_string(),
                    content_text: "The fox jumps.".to_string(),
                    file_name: None,
                    file_url: None,
                },
            )
            .await
            .unwrap();
        let request = request_as(&owner);

        let unavailable = MaterialService::with_storage(storage.clone());
        let resp = unavailable
            .analyze_material(material.id, AnalyzeMaterialRequest::default(), &request)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let llm = Arc::new(ScriptedLlm::new([VALID]));
        let service = MaterialService::with_storage(storage.clone()).with_llm(llm.clone());
        let resp = service
            .analyze_material(material.id, AnalyzeMaterialRequest::default(), &request)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["cached"], false);
        assert_eq!(body["data"]["attempts"], 1);

        // 第二次直接返回缓存，不再调用模型
        let resp = service
            .analyze_material(material.id, AnalyzeMaterialRequest::default(), &request)
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["data"]["cached"], true);
        assert_eq!(llm.calls(), 1);

        let failing = MaterialService::with_storage(storage.clone())
            .with_llm(Arc::new(ScriptedLlm::new([BAD_INDEX, BAD_INDEX, BAD_INDEX])));
        let resp = failing
            .analyze_material(material.id, AnalyzeMaterialRequest { force: true }, &request)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(resp).await["code"], ErrorCode::AnalysisFailed as i32);

        let stored = storage.get_material_by_id(material.id).await.unwrap().unwrap();
        assert_eq!(stored.analysis_status, AnalysisStatus::Failed);
    }

    #[actix_web::test]
    async fn test_failed_result_write_leaves_material_failed() {
        let backend = SeaOrmStorage::in_memory().await;
        // 只让写入 completed 的更新失败
        backend
            .db
            .execute_unprepared(
                "CREATE TRIGGER reject_completed_analysis BEFORE UPDATE ON source_materials \
                 WHEN NEW.analysis_status = 'completed' \
                 BEGIN SELECT RAISE(ABORT, 'disk I/O error'); END",
            )
            .await
            .unwrap();
        let storage: Arc<dyn Storage> = Arc::new(backend);

        let owner = seed(&storage, "academy", UserRole::Business).await;
        let material = storage
            .create_material(
                owner.id,
                CreateMaterialRequest {
                    title: "Fox".to_string(),
                    content_text: "The fox jumps.".to_string(),
                    file_name: None,
                    file_url: None,
                },
            )
            .await
            .unwrap();

        let service = MaterialService::with_storage(storage.clone())
            .with_llm(Arc::new(ScriptedLlm::new([VALID])));
        let resp = service
            .analyze_material(
                material.id,
                AnalyzeMaterialRequest::default(),
                &request_as(&owner),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let stored = storage.get_material_by_id(material.id).await.unwrap().unwrap();
        assert_eq!(stored.analysis_status, AnalysisStatus::Failed);
        assert!(stored.analysis.is_none());
    }
}
