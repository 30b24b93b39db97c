pub mod apply;
pub mod cancel;
pub mod list;
pub mod review;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::applications::requests::{
    ApplicationListParams, ApplyRequest, UpdateApplicationStatusRequest,
};
use crate::storage::Storage;

pub struct ApplicationService {
    storage: Option<Arc<dyn Storage>>,
}

impl ApplicationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    #[cfg(test)]
    pub(crate) fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(self.storage.as_ref(), request)
    }

    pub async fn apply(
        &self,
        seminar_id: i64,
        body: ApplyRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        apply::apply(self, seminar_id, body, request).await
    }

    pub async fn list_my_applications(
        &self,
        query: ApplicationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_my_applications(self, query, request).await
    }

    pub async fn cancel_application(
        &self,
        application_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        cancel::cancel_application(self, application_id, request).await
    }

    // 商家侧
    pub async fn list_seminar_applications(
        &self,
        seminar_id: i64,
        query: ApplicationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_seminar_applications(self, seminar_id, query, request).await
    }

    pub async fn review_application(
        &self,
        application_id: i64,
        body: UpdateApplicationStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        review::review_application(self, application_id, body, request).await
    }
}
