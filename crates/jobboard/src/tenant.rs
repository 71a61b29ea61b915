use axum::http::HeaderMap;

pub const SITE_HEADER: &str = "x-frappe-site-name";

/// The tenant a request belongs to: explicit site header, then `Host`
/// without its port, then the configured default.
pub fn resolve_site(headers: &HeaderMap, default_site: Option<&str>) -> Option<String> {
    if let Some(site) = header_value(headers, SITE_HEADER) {
        return Some(site.to_string());
    }

    if let Some(host) = header_value(headers, "host") {
        let host = strip_port(host);
        if !host.is_empty() {
            return Some(host.to_string());
        }
    }

    default_site.map(str::to_string)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // [v6]:port
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}
