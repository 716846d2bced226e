//! API request helpers

use axum::extract::FromRequest;
use axum::extract::Json;
use axum::extract::Request;
use axum::extract::rejection::JsonRejection;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::notes::Cursor;

use super::Error;

/// Largest page a listing can ask for
pub const MAX_PAGE_LIMIT: i32 = 100;

/// Parse a required note ID
///
/// ```rust
/// let id = "9b1deb4d-3b7d-4bad-9bdd-2b0d7b3dcb6d";
/// assert!(parse_id(id).is_ok())
/// ```
pub fn parse_id(id: &str) -> Result<Uuid, Error> {
    if id.is_empty() {
        return Err(Error::bad_request("id is required"));
    }

    Uuid::parse_str(id).map_err(|err| Error::bad_request("Invalid id").with_description(err))
}

/// Parse a required listing cursor
///
/// Either the start cursor or the ID of the last note of the previous page
pub fn parse_cursor(cursor: &str) -> Result<Cursor, Error> {
    if cursor.is_empty() {
        return Err(Error::bad_request("cursor is required"));
    }

    cursor
        .parse::<Cursor>()
        .map_err(|err| Error::bad_request("Invalid cursor").with_description(err))
}

/// Parse the size of a listing page
pub fn parse_limit(limit: i32) -> Result<u32, Error> {
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(Error::bad_request(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}"
        )));
    }

    u32::try_from(limit).map_err(Error::bad_request)
}

fn parse_json<J>(json: Result<Json<J>, JsonRejection>) -> Result<J, Error> {
    match json {
        Ok(Json(json)) => Ok(json),
        Err(err) => match err {
            JsonRejection::JsonDataError(err) => {
                Err(Error::bad_request("Data error").with_description(err))
            }
            JsonRejection::JsonSyntaxError(err) => {
                let description = std::error::Error::source(&err)
                    .map_or_else(|| err.body_text(), ToString::to_string);

                Err(Error::bad_request("JSON syntax error").with_description(description))
            }
            JsonRejection::MissingJsonContentType(_err) => Err(Error::bad_request(
                "Missing `application/json` content type",
            )),
            JsonRejection::BytesRejection(err) => {
                Err(Error::bad_request("Invalid characters in JSON").with_description(err))
            }
            err => Err(Error::bad_request("Unknown JSON error").with_description(err)),
        },
    }
}

/// Wrapper for the JSON extractor
pub struct Form<F>(pub F);

impl<S, F> FromRequest<S> for Form<F>
where
    S: Send + Sync,
    F: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = Json::<F>::from_request(req, state).await;

        parse_json(json).map(Form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(id, parse_id(&id.to_string()).unwrap());

        assert!(parse_id("").is_err());
        assert!(parse_id("not-an-id").is_err());
    }

    #[test]
    fn test_parse_cursor() {
        assert_eq!(Cursor::Start, parse_cursor("start").unwrap());

        let id = Uuid::new_v4();
        assert_eq!(Cursor::After(id), parse_cursor(&id.to_string()).unwrap());

        assert!(parse_cursor("").is_err());
        assert!(parse_cursor("beginning").is_err());
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(1, parse_limit(1).unwrap());
        assert_eq!(100, parse_limit(MAX_PAGE_LIMIT).unwrap());

        assert!(parse_limit(0).is_err());
        assert!(parse_limit(-1).is_err());
        assert!(parse_limit(MAX_PAGE_LIMIT + 1).is_err());
    }
}
