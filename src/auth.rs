use actix_web::HttpRequest;
use uuid::Uuid;

use crate::errors::ApiError;

/// Identity of the acting user, forwarded by the authenticating gateway in
/// the `X-User-Id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
}

/// Extract the authenticated identity, failing with `Unauthorized` when the
/// header is missing or malformed.
pub fn require_actor(req: &HttpRequest) -> Result<Actor, ApiError> {
    extract_actor(req).ok_or(ApiError::Unauthorized)
}

/// Extract the identity if present; anonymous access is allowed.
pub fn extract_actor(req: &HttpRequest) -> Option<Actor> {
    req.headers()
        .get("X-User-Id")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(|user_id| Actor { user_id })
}

/// Ownership Guard: the acting identity must equal the record's owning
/// identity. The deny path is a generic `Forbidden`, so callers reveal
/// nothing about whether the record exists versus who owns it.
pub fn ensure_owner(actor: Actor, owner_id: Uuid) -> Result<(), ApiError> {
    if actor.user_id == owner_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn missing_header_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(require_actor(&req), Err(ApiError::Unauthorized)));
        assert!(extract_actor(&req).is_none());
    }

    #[test]
    fn malformed_header_is_unauthorized() {
        let req = TestRequest::default()
            .insert_header(("X-User-Id", "not-a-uuid"))
            .to_http_request();
        assert!(matches!(require_actor(&req), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn valid_header_yields_actor() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header(("X-User-Id", id.to_string()))
            .to_http_request();
        assert_eq!(require_actor(&req).unwrap().user_id, id);
    }

    #[test]
    fn owner_check_allows_owner_and_denies_others() {
        let owner = Uuid::new_v4();
        let actor = Actor { user_id: owner };
        assert!(ensure_owner(actor, owner).is_ok());

        let stranger = Actor { user_id: Uuid::new_v4() };
        assert!(matches!(ensure_owner(stranger, owner), Err(ApiError::Forbidden)));
    }
}
