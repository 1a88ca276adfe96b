pub mod body;
pub mod error;
pub mod headers;
pub mod request;
pub mod response;
pub mod scope;

pub use body::BodyStream;
pub use error::{ErrorBody, HttpError};
pub use headers::{Headers, HeadersExt};
pub use request::Request;
pub use response::{Push, Response, ResponseBody};
pub use scope::{ConnectionKind, Scope, PUSH_EXTENSION};
