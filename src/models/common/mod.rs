pub mod pagination;
pub mod product;
pub mod response;

pub use pagination::{PaginationInfo, PaginationQuery, normalize_page};
pub use product::{
    ItemType, MAX_PRICE, ProductRef, SetActiveRequest, effective_price, sum_prices, validate_price,
};
pub use response::ApiResponse;
