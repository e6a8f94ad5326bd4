use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Security headers configuration
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Enable HSTS (HTTP Strict Transport Security)
    pub hsts_enabled: bool,
    /// HSTS max age in seconds
    pub hsts_max_age: u64,
    /// Include subdomains in HSTS
    pub hsts_include_subdomains: bool,
    /// Content Security Policy
    pub csp_policy: Option<String>,
    /// X-Frame-Options policy
    pub frame_options: FrameOptions,
    /// Referrer policy
    pub referrer_policy: ReferrerPolicy,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            hsts_enabled: true,
            hsts_max_age: 15_552_000, // 180 days
            hsts_include_subdomains: true,
            csp_policy: Some(
                "default-src 'self'; base-uri 'self'; font-src 'self' https: data:; form-action 'self'; frame-ancestors 'self'; img-src 'self' data:; object-src 'none'; script-src 'self'; script-src-attr 'none'; style-src 'self' https: 'unsafe-inline'; upgrade-insecure-requests"
                    .to_string(),
            ),
            frame_options: FrameOptions::SameOrigin,
            referrer_policy: ReferrerPolicy::NoReferrer,
        }
    }
}

/// X-Frame-Options values
#[derive(Debug, Clone, Copy)]
pub enum FrameOptions {
    Deny,
    SameOrigin,
}

impl FrameOptions {
    fn to_header_value(self) -> HeaderValue {
        match self {
            FrameOptions::Deny => HeaderValue::from_static("DENY"),
            FrameOptions::SameOrigin => HeaderValue::from_static("SAMEORIGIN"),
        }
    }
}

/// Referrer-Policy values
#[derive(Debug, Clone, Copy)]
pub enum ReferrerPolicy {
    NoReferrer,
    SameOrigin,
    StrictOrigin,
    StrictOriginWhenCrossOrigin,
}

impl ReferrerPolicy {
    fn to_header_value(self) -> HeaderValue {
        let value = match self {
            ReferrerPolicy::NoReferrer => "no-referrer",
            ReferrerPolicy::SameOrigin => "same-origin",
            ReferrerPolicy::StrictOrigin => "strict-origin",
            ReferrerPolicy::StrictOriginWhenCrossOrigin => "strict-origin-when-cross-origin",
        };
        HeaderValue::from_static(value)
    }
}

/// Security headers middleware
pub fn security_headers_middleware(
    config: SecurityConfig,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone {
    move |request: Request, next: Next| {
        let config = config.clone();
        Box::pin(async move {
            let mut response = next.run(request).await;
            apply_security_headers(response.headers_mut(), &config);
            response
        })
    }
}

/// Apply security headers to response headers
fn apply_security_headers(headers: &mut HeaderMap, config: &SecurityConfig) {
    if config.hsts_enabled {
        let mut hsts_value = format!("max-age={}", config.hsts_max_age);
        if config.hsts_include_subdomains {
            hsts_value.push_str("; includeSubDomains");
        }
        if let Ok(header_value) = HeaderValue::from_str(&hsts_value) {
            headers.insert(header::STRICT_TRANSPORT_SECURITY, header_value);
        }
    }

    if let Some(csp) = &config.csp_policy {
        if let Ok(header_value) = HeaderValue::from_str(csp) {
            headers.insert(header::CONTENT_SECURITY_POLICY, header_value);
        }
    }

    headers.insert(header::X_FRAME_OPTIONS, config.frame_options.to_header_value());
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::X_XSS_PROTECTION, HeaderValue::from_static("0"));
    headers.insert(header::REFERRER_POLICY, config.referrer_policy.to_header_value());
    headers.insert(header::X_DNS_PREFETCH_CONTROL, HeaderValue::from_static("off"));
    headers.insert("x-download-options", HeaderValue::from_static("noopen"));
    headers.insert("x-permitted-cross-domain-policies", HeaderValue::from_static("none"));
    headers.insert("cross-origin-opener-policy", HeaderValue::from_static("same-origin"));
    headers.insert("cross-origin-resource-policy", HeaderValue::from_static("same-origin"));
    headers.insert("origin-agent-cluster", HeaderValue::from_static("?1"));
}

/// Relaxed configuration for local development (no HSTS over plain HTTP)
pub fn development_security_config() -> SecurityConfig {
    SecurityConfig { hsts_enabled: false, ..Default::default() }
}

/// Strict configuration for a JSON-only API in production
pub fn production_security_config() -> SecurityConfig {
    SecurityConfig {
        hsts_enabled: true,
        hsts_max_age: 31_536_000, // 1 year
        hsts_include_subdomains: true,
        csp_policy: Some("default-src 'none'; frame-ancestors 'none'".to_string()),
        frame_options: FrameOptions::Deny,
        referrer_policy: ReferrerPolicy::NoReferrer,
    }
}
