use crate::domain::{
    errors::{FetchError, FetchResult},
    logging::{LogComponent, get_logger},
};
use futures::future::LocalBoxFuture;
use gloo::net::http::Request;
use serde_json::Value;

/// Источник JSON-ответов для детальных таблиц и page actions
pub trait DataFetcher {
    fn fetch_json<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, FetchResult<Value>>;
}

/// HTTP клиент на основе gloo для WASM
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooFetcher;

impl GlooFetcher {
    pub fn new() -> Self {
        Self
    }

    /// GET запрос с парсингом JSON
    pub async fn get_json(&self, url: &str) -> FetchResult<Value> {
        get_logger().debug(LogComponent::Infrastructure("HTTP"), &format!("🌐 GET: {}", url));

        let response = Request::get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::RequestFailed(format!("{:?}", e)))?;

        if !HttpUtils::is_success_status(response.status()) {
            get_logger().error(
                LogComponent::Infrastructure("HTTP"),
                &format!("❌ HTTP error: {} - {}", response.status(), response.status_text()),
            );
            return Err(FetchError::HttpStatus(response.status()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FetchError::InvalidResponse(format!("{:?}", e)))?;

        get_logger().debug(LogComponent::Infrastructure("HTTP"), &format!("✅ GET {} parsed", url));
        Ok(body)
    }
}

impl DataFetcher for GlooFetcher {
    fn fetch_json<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, FetchResult<Value>> {
        Box::pin(self.get_json(url))
    }
}

/// Утилиты для HTTP
pub struct HttpUtils;

impl HttpUtils {
    /// Проверка статуса ответа
    pub fn is_success_status(status: u16) -> bool {
        (200..300).contains(&status)
    }

    /// Joins a relative endpoint onto the API base; absolute URLs and an
    /// empty base pass through.
    pub fn resolve_endpoint(base_url: &str, endpoint: &str) -> String {
        if base_url.is_empty() || endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!("{}/{}", base_url.trim_end_matches('/'), endpoint.trim_start_matches('/'))
    }

    /// Построение URL с параметрами, порядок параметров сохраняется
    pub fn build_url_with_params(base_url: &str, params: &[(String, String)]) -> String {
        if params.is_empty() {
            return base_url.to_string();
        }

        let query_string: String = params
            .iter()
            .map(|(key, value)| format!("{}={}", Self::url_encode(key), Self::url_encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        let separator = if base_url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", base_url, separator, query_string)
    }

    /// Кодирование URL компонента (RFC 3986 unreserved остаются как есть)
    pub fn url_encode(input: &str) -> String {
        let mut encoded = String::with_capacity(input.len());
        for byte in input.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => encoded.push(byte as char),
                _ => encoded.push_str(&format!("%{:02X}", byte)),
            }
        }
        encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_url_building_keeps_order() {
        let url = HttpUtils::build_url_with_params(
            "/api/table",
            &params(&[("protocol", "raydium"), ("pair", "USX-USDC"), ("last_window", "7d")]),
        );
        assert_eq!(url, "/api/table?protocol=raydium&pair=USX-USDC&last_window=7d");
        assert_eq!(HttpUtils::build_url_with_params("/a?x=1", &params(&[("y", "2")])), "/a?x=1&y=2");
        assert_eq!(HttpUtils::build_url_with_params("/a", &[]), "/a");
    }

    #[test]
    fn test_url_encoding() {
        assert_eq!(HttpUtils::url_encode("hello world"), "hello%20world");
        assert_eq!(HttpUtils::url_encode("a&b=c"), "a%26b%3Dc");
        assert_eq!(HttpUtils::url_encode("Write Rate"), "Write%20Rate");
        assert_eq!(HttpUtils::url_encode("Δ"), "%CE%94");
    }

    #[test]
    fn test_endpoint_resolution() {
        assert_eq!(HttpUtils::resolve_endpoint("", "/api/x"), "/api/x");
        assert_eq!(HttpUtils::resolve_endpoint("https://h/", "/api/x"), "https://h/api/x");
        assert_eq!(HttpUtils::resolve_endpoint("https://h", "https://o/api"), "https://o/api");
    }
}
