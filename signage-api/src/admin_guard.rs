//! Bearer-token guard for the admin API.
//!
//! ```rust,ignore
//! #[get("/1/Schedules")]
//! fn list(_admin: AdminToken) -> ... { ... }
//! ```
//!
//! The token comes from `SignageConfig::admin_token`. When none is configured
//! the admin API is closed to everyone.

use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};

use crate::services::SignageServices;

/// Proof that the request carried the configured admin token.
#[derive(Debug, Clone, Copy)]
pub struct AdminToken;

/// Compares without short-circuiting on the first differing byte.
fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

fn bearer_token<'a>(request: &'a Request<'_>) -> Option<&'a str> {
    request
        .headers()
        .get_one("Authorization")
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminToken {
    type Error = ();

    /// - `Outcome::Error(Status::Forbidden)` when no admin token is configured
    /// - `Outcome::Error(Status::Unauthorized)` when the header is missing or wrong
    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let services = match request.rocket().state::<SignageServices>() {
            Some(services) => services,
            None => return Outcome::Error((Status::InternalServerError, ())),
        };

        let Some(expected) = services.config.admin_token.as_deref() else {
            return Outcome::Error((Status::Forbidden, ()));
        };

        match bearer_token(request) {
            Some(given) if tokens_match(given.as_bytes(), expected.as_bytes()) => {
                Outcome::Success(AdminToken)
            }
            Some(_) => {
                warn!("Rejected admin request to {} with a bad token", request.uri().path());
                Outcome::Error((Status::Unauthorized, ()))
            }
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_must_match_exactly() {
        assert!(tokens_match(b"abc123", b"abc123"));
        assert!(!tokens_match(b"abc124", b"abc123"));
        assert!(!tokens_match(b"abc12", b"abc123"));
        assert!(!tokens_match(b"", b"abc123"));
    }
}
