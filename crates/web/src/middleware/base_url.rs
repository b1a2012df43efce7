use axum::{extract, http::HeaderMap, middleware::Next, response::IntoResponse};
use std::sync::Arc;

/// Public address of the service as seen by the client, honouring the
/// `x-forwarded-*` headers set by a reverse proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    proto: String,
    host: String,
    prefix: String,
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

impl BaseUrl {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let proto = header(headers, "x-forwarded-proto").unwrap_or("http");
        let host = header(headers, "x-forwarded-host")
            .or_else(|| header(headers, "host"))
            .unwrap_or("localhost");
        let prefix = header(headers, "x-forwarded-prefix")
            .unwrap_or("")
            .trim_end_matches('/');

        BaseUrl {
            proto: proto.to_owned(),
            host: host.to_owned(),
            prefix: prefix.to_owned(),
        }
    }

    pub fn full_url<S: Into<String>>(&self, path: S) -> String {
        format!(
            "{}://{}{}{}",
            self.proto,
            self.host,
            self.prefix,
            path.into()
        )
    }
}

pub async fn base_url_middleware(
    mut req: extract::Request,
    next: Next,
) -> impl IntoResponse {
    let base_url = BaseUrl::from_headers(req.headers());
    req.extensions_mut().insert(Arc::new(base_url));

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn defaults_to_plain_localhost() {
        let base_url = BaseUrl::from_headers(&HeaderMap::new());
        assert_eq!(base_url.full_url("/api/ping"), "http://localhost/api/ping");
    }

    #[test]
    fn prefers_forwarded_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("10.0.0.5:8080"));
        headers.insert("x-forwarded-host", HeaderValue::from_static("fleet.example.org"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        headers.insert("x-forwarded-prefix", HeaderValue::from_static("/admin/"));

        let base_url = BaseUrl::from_headers(&headers);
        assert_eq!(
            base_url.full_url("/api/v1/routes/distance"),
            "https://fleet.example.org/admin/api/v1/routes/distance"
        );
    }

    #[test]
    fn falls_back_to_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("10.0.0.5:8080"));
        assert_eq!(
            BaseUrl::from_headers(&headers).full_url("/"),
            "http://10.0.0.5:8080/"
        );
    }
}
