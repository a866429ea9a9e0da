//! Client for the remote persistence service.
//!
//! The client is configured once at start-up. Entries never travel through
//! it; it exists so the rest of the app has one place to reach the service.

use crate::config::BackendConfig;
use crate::error::{DiaryError, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Url;
use tracing::info;

#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: Url,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = Url::parse(&config.url)
            .map_err(|e| DiaryError::InvalidConfig(format!("backend url '{}': {e}", config.url)))?;
        if base_url.scheme() != "https" && base_url.scheme() != "http" {
            return Err(DiaryError::InvalidConfig(format!(
                "backend url must be http(s), got '{}'",
                base_url.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .default_headers(auth_headers(&config.publishable_key)?)
            .build()?;

        info!(url = %base_url, "backend client ready");
        Ok(BackendClient { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// REST endpoint for `table`.
    pub fn rest_url(&self, table: &str) -> Result<Url> {
        self.base_url
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| DiaryError::InvalidConfig(format!("table name '{table}': {e}")))
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

fn auth_headers(key: &str) -> Result<HeaderMap> {
    let invalid =
        |_| DiaryError::InvalidConfig("publishable key is not a valid header value".into());
    let mut apikey = HeaderValue::from_str(key).map_err(invalid)?;
    apikey.set_sensitive(true);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid)?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert("apikey", apikey);
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str, key: &str) -> BackendConfig {
        BackendConfig {
            url: url.into(),
            publishable_key: key.into(),
        }
    }

    #[test]
    fn builds_rest_urls() {
        let client = BackendClient::new(&config("https://demo.supabase.co/", "anon")).unwrap();
        assert_eq!(
            client.rest_url("entries").unwrap().as_str(),
            "https://demo.supabase.co/rest/v1/entries"
        );
    }

    #[test]
    fn headers_carry_the_key() {
        let headers = auth_headers("anon").unwrap();
        assert_eq!(headers["apikey"], "anon");
        assert_eq!(headers[AUTHORIZATION], "Bearer anon");
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn rejects_bad_config() {
        assert!(matches!(
            BackendClient::new(&config("not a url", "anon")),
            Err(DiaryError::InvalidConfig(_))
        ));
        assert!(matches!(
            BackendClient::new(&config("ftp://demo.example", "anon")),
            Err(DiaryError::InvalidConfig(_))
        ));
        assert!(matches!(
            BackendClient::new(&config("https://demo.example", "bad\nkey")),
            Err(DiaryError::InvalidConfig(_))
        ));
    }
}
