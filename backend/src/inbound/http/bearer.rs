//! Bearer token extraction from the `Authorization` header.
//!
//! Extraction never fails: a missing or malformed header yields an empty
//! token, and the authorization gate decides what that means for the route.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::Error;

/// Optional bearer token carried by the request.
#[derive(Debug, Clone, Default)]
pub struct Bearer(Option<String>);

impl Bearer {
    /// The raw token, if one was presented.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

fn extract(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(actix_web::http::header::AUTHORIZATION)?;
    let value = header.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_owned())
}

impl FromRequest for Bearer {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self(extract(req))))
    }
}
