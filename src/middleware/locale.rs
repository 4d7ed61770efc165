//! Language negotiation.
//!
//! The resolved locale is attached to every request and a 1-year `language`
//! cookie is set on every response. Resolution priority:
//!
//! 1. `lang` (or `language`) query parameter
//! 2. `Accept-Language` header
//! 3. `language` cookie
//! 4. Default (`tr`)
//!
//! When the `Accept-Language` header is present but names an unsupported
//! language, the cookie is not consulted and the default wins.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request};
use axum::http::header::{ACCEPT_LANGUAGE, COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

/// Supported locales, lowercase.
pub const SUPPORTED_LANGUAGES: [&str; 6] = ["tr", "en", "de", "fr", "es", "ar"];

/// Fallback locale when nothing usable was requested.
pub const DEFAULT_LANGUAGE: &str = "tr";

const COOKIE_NAME: &str = "language";
const COOKIE_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

/// The negotiated locale, carrying the uppercase database language code.
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Locale {
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANGUAGE.to_uppercase())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Locale>().cloned().unwrap_or_default())
    }
}

fn supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code.to_lowercase().as_str())
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

fn cookie_param(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

/// Resolve the request language to a supported lowercase code.
pub fn negotiate(
    query: Option<&str>,
    accept_language: Option<&str>,
    cookies: Option<&str>,
) -> String {
    if let Some(lang) = query
        .and_then(|q| query_param(q, "lang").or_else(|| query_param(q, "language")))
        .filter(|lang| supported(lang))
    {
        return lang.to_lowercase();
    }

    if let Some(header) = accept_language {
        // "tr-TR,tr;q=0.9,en;q=0.8" -> "tr". An unsupported preference falls
        // straight through to the default, not to the cookie.
        let preferred = header
            .split(',')
            .next()
            .unwrap_or("")
            .split('-')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();
        if supported(&preferred) {
            return preferred;
        }
        return DEFAULT_LANGUAGE.to_string();
    }

    if let Some(lang) = cookies
        .and_then(|c| cookie_param(c, COOKIE_NAME))
        .filter(|lang| supported(lang))
    {
        return lang.to_lowercase();
    }

    DEFAULT_LANGUAGE.to_string()
}

/// Middleware: attach the negotiated [`Locale`] to the request and set the
/// `language` cookie on the response.
pub async fn locale_middleware(mut request: Request, next: Next) -> Response {
    let query = request.uri().query().map(str::to_string);
    let accept_language = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let cookies = request
        .headers()
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let language = negotiate(query.as_deref(), accept_language.as_deref(), cookies.as_deref());
    request
        .extensions_mut()
        .insert(Locale(language.to_uppercase()));

    let mut response = next.run(request).await;

    let cookie = format!(
        "{COOKIE_NAME}={language}; Max-Age={COOKIE_MAX_AGE_SECS}; Path=/; SameSite=Lax"
    );
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_query_param_wins() {
        assert_eq!(negotiate(Some("lang=en"), Some("de"), Some("language=fr")), "en");
        assert_eq!(negotiate(Some("page=2&lang=de"), None, None), "de");
        assert_eq!(negotiate(Some("language=es"), None, None), "es");
    }

    #[test]
    fn test_unsupported_query_falls_back_to_header() {
        assert_eq!(negotiate(Some("lang=xx"), Some("fr-FR,fr;q=0.9"), None), "fr");
    }

    #[test]
    fn test_header_parsing() {
        assert_eq!(negotiate(None, Some("tr-TR,tr;q=0.9,en;q=0.8"), None), "tr");
        assert_eq!(negotiate(None, Some("en-US"), None), "en");
    }

    #[test]
    fn test_unsupported_header_skips_cookie() {
        assert_eq!(negotiate(None, Some("ja-JP"), Some("language=en")), "tr");
    }

    #[test]
    fn test_cookie_used_without_header() {
        assert_eq!(negotiate(None, None, Some("session=x; language=ar")), "ar");
    }

    #[test]
    fn test_default() {
        assert_eq!(negotiate(None, None, None), "tr");
    }
}
