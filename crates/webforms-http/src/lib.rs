//! # webforms-http
//!
//! The request-side collaborators of the form layer: the [`FormRequest`]
//! contract, form-encoded data ([`QueryDict`]), sessions carrying the CSRF
//! token, named route reversal and a minimal [`HttpResponse`].

pub mod querydict;
pub mod request;
pub mod response;
pub mod routes;
pub mod session;

pub use querydict::QueryDict;
pub use request::{FormRequest, SimpleRequest, SimpleRequestBuilder};
pub use response::HttpResponse;
pub use routes::RouteTable;
pub use session::Session;

pub use http::{Method, StatusCode};
