pub mod list;
pub mod progress;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::enrollments::requests::{EnrollmentListParams, UpdateProgressRequest};
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
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

    pub async fn list_my_enrollments(
        &self,
        query: EnrollmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_my_enrollments(self, query, request).await
    }

    pub async fn update_progress(
        &self,
        enrollment_id: i64,
        update: UpdateProgressRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        progress::update_progress(self, enrollment_id, update, request).await
    }
}
