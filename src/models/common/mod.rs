pub mod pagination;
pub mod response;

pub use pagination::{PaginationInfo, normalize_page};
pub use response::ApiResponse;
