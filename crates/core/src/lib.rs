pub mod auth;
pub mod classification;
pub mod composition;
pub mod decoding;
pub mod detection;
pub mod pipeline;
pub mod replies;
pub mod shared;
