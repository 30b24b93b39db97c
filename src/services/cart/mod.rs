pub mod add;
pub mod list;
pub mod remove;
pub mod resolve;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::cart::requests::AddCartItemRequest;
use crate::storage::Storage;

pub use resolve::{ResolvedProduct, resolve_product};

pub struct CartService {
    storage: Option<Arc<dyn Storage>>,
}

impl CartService {
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

    pub async fn list_cart(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_cart(self, request).await
    }

    pub async fn add_item(
        &self,
        item: AddCartItemRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        add::add_item(self, item, request).await
    }

    pub async fn remove_item(
        &self,
        cart_item_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        remove::remove_item(self, cart_item_id, request).await
    }

    pub async fn clear_cart(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        remove::clear_cart(self, request).await
    }
}
