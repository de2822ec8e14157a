//! Interceptors wrapped around every backend call.

pub mod auth;
pub mod response;
