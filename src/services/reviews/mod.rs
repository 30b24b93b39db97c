pub mod create;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::reviews::requests::{CreateReviewRequest, UpdateReviewRequest};
use crate::storage::Storage;

pub struct ReviewService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReviewService {
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

    pub async fn create_review(
        &self,
        review: CreateReviewRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_review(self, review, request).await
    }

    pub async fn update_review(
        &self,
        review_id: i64,
        update: UpdateReviewRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_review(self, review_id, update, request).await
    }

    pub async fn delete_review(
        &self,
        review_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::delete_review(self, review_id, request).await
    }
}
