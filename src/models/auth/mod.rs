pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{Session, SessionRejection, SessionUser};
pub use requests::LoginRequest;
pub use responses::{LoginResponse, SessionInfoResponse};
