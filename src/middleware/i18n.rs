// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::dates::DateLocale;

// Extrator de idioma: decide como datas e dias da semana são exibidos
pub struct Locale(pub DateLocale);

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first() // Pega o primeiro idioma (ex: "pt-BR")
                    // "pt-BR" -> "pt", "en-US" -> "en"
                    .map(|tag| DateLocale::from_language(tag.split('-').next().unwrap_or(tag)))
            })
            .unwrap_or_default();

        Ok(Locale(locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn locale_for(header: Option<&str>) -> DateLocale {
        let mut builder = Request::builder();
        if let Some(value) = header {
            builder = builder.header(header::ACCEPT_LANGUAGE, value);
        }
        let mut parts = builder.body(()).unwrap().into_parts().0;
        Locale::from_request_parts(&mut parts, &()).await.unwrap().0
    }

    #[tokio::test]
    async fn picks_the_preferred_language() {
        assert_eq!(locale_for(Some("en-US,en;q=0.9,pt;q=0.8")).await, DateLocale::En);
        assert_eq!(locale_for(Some("pt-BR,pt;q=0.9")).await, DateLocale::PtBr);
    }

    #[tokio::test]
    async fn defaults_to_portuguese() {
        assert_eq!(locale_for(None).await, DateLocale::PtBr);
        assert_eq!(locale_for(Some("de-DE")).await, DateLocale::PtBr);
    }
}
