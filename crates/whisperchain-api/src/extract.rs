//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;
use whisperchain_core::error::DomainError;
use whisperchain_core::player::Player;

use crate::error::ApiError;

/// Header carrying the authenticated player's id.
pub const PLAYER_ID_HEADER: &str = "x-player-id";
/// Header carrying the authenticated player's display name.
pub const PLAYER_NAME_HEADER: &str = "x-player-name";

/// The authenticated player, as forwarded by the identity gateway.
///
/// OAuth terminates at the gateway upstream of this service; the resolved
/// identity arrives in the `x-player-id` and `x-player-name` headers, which
/// are trusted here. Requests without a parseable player id are rejected.
#[derive(Debug, Clone)]
pub struct CurrentPlayer(pub Player);

impl<S> FromRequestParts<S> for CurrentPlayer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(PLAYER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok())
            .ok_or_else(|| {
                ApiError(DomainError::AccessDenied(
                    "request carries no player identity".into(),
                ))
            })?;
        let name = parts
            .headers
            .get(PLAYER_NAME_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("anonymous")
            .to_owned();
        Ok(Self(Player::new(id, name)))
    }
}
