use crate::error::FetchError;
use reqwest::header::{HeaderMap, HeaderValue};

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Headers sent with every page request. Without a key the map is empty and
/// requests go out unauthenticated.
pub fn get_auth_headers(api_key: Option<&str>) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    if let Some(key) = api_key {
        let mut value = HeaderValue::from_str(key)
            .map_err(|e| FetchError::Http(format!("invalid {} value: {}", API_KEY_HEADER, e)))?;
        value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, value);
    }
    Ok(headers)
}
