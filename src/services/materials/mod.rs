pub mod analyze;
pub mod manage;
mod prompt;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::llm::LlmClient;
use crate::models::materials::requests::{
    AnalyzeMaterialRequest, CreateMaterialRequest, MaterialListParams,
};
use crate::storage::Storage;

pub struct MaterialService {
    storage: Option<Arc<dyn Storage>>,
    llm: Option<Arc<dyn LlmClient>>,
}

impl MaterialService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            llm: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
            llm: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(self.storage.as_ref(), request)
    }

    /// 未配置 API key 时 app_data 中没有客户端
    pub(crate) fn get_llm(&self, request: &HttpRequest) -> Option<Arc<dyn LlmClient>> {
        if let Some(llm) = &self.llm {
            return Some(llm.clone());
        }
        request
            .app_data::<web::Data<Arc<dyn LlmClient>>>()
            .map(|data| data.get_ref().clone())
    }

    pub async fn list_materials(
        &self,
        query: MaterialListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::list_materials(self, query, request).await
    }

    pub async fn create_material(
        &self,
        body: CreateMaterialRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_material(self, body, request).await
    }

    pub async fn get_material(
        &self,
        material_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::get_material(self, material_id, request).await
    }

    pub async fn delete_material(
        &self,
        material_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::delete_material(self, material_id, request).await
    }

    pub async fn analyze_material(
        &self,
        material_id: i64,
        body: AnalyzeMaterialRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        analyze::analyze_material(self, material_id, body, request).await
    }
}
