//! Login metadata read from request headers.
//!
//! Geo headers are set by the hosting edge (Vercel or Cloudflare) and are
//! absent in local development.

use axum::http::{HeaderMap, header::USER_AGENT};

use crate::domain::device::describe_device;
use crate::domain::types::LoginContext;

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub fn user_agent(headers: &HeaderMap) -> Option<&str> {
    header(headers, USER_AGENT.as_str())
}

/// `x-real-ip`, else the first hop of `x-forwarded-for`.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    header(headers, "x-real-ip")
        .or_else(|| {
            header(headers, "x-forwarded-for")
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(str::to_owned)
}

pub fn login_context(headers: &HeaderMap) -> LoginContext {
    LoginContext {
        device: describe_device(user_agent(headers)),
        ip: client_ip(headers),
        // Vercel percent-encodes the city name.
        city: header(headers, "x-vercel-ip-city").map(|city| {
            urlencoding::decode(city)
                .map(|c| c.into_owned())
                .unwrap_or_else(|_| city.to_owned())
        }),
        region: header(headers, "x-vercel-ip-country-region").map(str::to_owned),
        country: header(headers, "x-vercel-ip-country")
            .or_else(|| header(headers, "cf-ipcountry"))
            .map(str::to_owned),
    }
}
