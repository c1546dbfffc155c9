//! OAuth 1.0a request signing (HMAC-SHA1, RFC 5849).
//!
//! Only the pieces the profile-linking handshake needs: building the
//! signature base string for a request without a body, signing it with the
//! consumer secret (and request-token secret when present), and emitting the
//! `Authorization: OAuth ...` header.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// OAuth consumer credentials. The hosted platform accepts the literal
/// `anonymous`/`anonymous` pair for unregistered consumers.
#[derive(Debug, Clone)]
pub struct Consumer {
    pub key: String,
    pub secret: String,
}

/// A token/secret pair: the request token during the handshake, the access
/// token afterwards.
#[derive(Debug, Clone)]
pub struct Token {
    pub key: String,
    pub secret: String,
}

/// Percent-encode per RFC 3986: everything except unreserved characters.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// The signature base string: method, base URL, and the sorted, encoded
/// parameter string, each component encoded and joined with `&`.
pub(crate) fn signature_base_string(
    method: &str,
    base_url: &str,
    params: &[(String, String)],
) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url),
        percent_encode(&param_string)
    )
}

pub(crate) fn hmac_sha1_signature(
    base_string: &str,
    consumer_secret: &str,
    token_secret: Option<&str>,
) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret.unwrap_or_default())
    );
    // HMAC accepts keys of any length.
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes()).expect("HMAC key");
    mac.update(base_string.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Build the `Authorization: OAuth ...` header value for a bodyless request
/// to `url`, with `extra` carrying flow parameters such as `oauth_callback`
/// or `oauth_verifier`.
pub fn authorization_header(
    method: &str,
    url: &str,
    consumer: &Consumer,
    token: Option<&Token>,
    extra: &[(&str, &str)],
) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
        .to_string();
    let nonce = Uuid::new_v4().simple().to_string();

    let mut params: Vec<(String, String)> = vec![
        ("oauth_consumer_key".into(), consumer.key.clone()),
        ("oauth_nonce".into(), nonce),
        ("oauth_signature_method".into(), "HMAC-SHA1".into()),
        ("oauth_timestamp".into(), timestamp),
        ("oauth_version".into(), "1.0".into()),
    ];
    if let Some(token) = token {
        params.push(("oauth_token".into(), token.key.clone()));
    }
    for (k, v) in extra {
        params.push(((*k).to_string(), (*v).to_string()));
    }

    let base_string = signature_base_string(method, url, &params);
    let signature =
        hmac_sha1_signature(&base_string, &consumer.secret, token.map(|t| t.secret.as_str()));
    params.push(("oauth_signature".into(), signature));

    let fields = params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {fields}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_encoding_leaves_unreserved_untouched() {
        assert_eq!(percent_encode("abcXYZ019-._~"), "abcXYZ019-._~");
    }

    #[test]
    fn percent_encoding_escapes_reserved() {
        assert_eq!(percent_encode("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(
            percent_encode("http://printer.example.com/ready"),
            "http%3A%2F%2Fprinter.example.com%2Fready"
        );
    }

    #[test]
    fn base_string_sorts_and_double_encodes_params() {
        let params = vec![
            ("oauth_nonce".to_string(), "abc".to_string()),
            ("oauth_consumer_key".to_string(), "anonymous".to_string()),
            (
                "oauth_callback".to_string(),
                "http://h/profile/verify".to_string(),
            ),
        ];
        let base = signature_base_string("get", "https://h/_ah/OAuthGetRequestToken", &params);
        assert_eq!(
            base,
            "GET&https%3A%2F%2Fh%2F_ah%2FOAuthGetRequestToken&\
             oauth_callback%3Dhttp%253A%252F%252Fh%252Fprofile%252Fverify\
             %26oauth_consumer_key%3Danonymous%26oauth_nonce%3Dabc"
        );
    }

    #[test]
    fn signature_is_base64_of_sha1_digest() {
        let sig = hmac_sha1_signature("base", "secret", None);
        let raw = BASE64.decode(sig).expect("valid base64");
        assert_eq!(raw.len(), 20);
    }

    #[test]
    fn signature_depends_on_token_secret() {
        let with = hmac_sha1_signature("base", "secret", Some("token-secret"));
        let without = hmac_sha1_signature("base", "secret", None);
        assert_ne!(with, without);
    }

    #[test]
    fn header_carries_all_oauth_fields() {
        let consumer = Consumer {
            key: "anonymous".into(),
            secret: "anonymous".into(),
        };
        let token = Token {
            key: "req-token".into(),
            secret: "req-secret".into(),
        };
        let header = authorization_header(
            "POST",
            "https://h/_ah/OAuthGetAccessToken",
            &consumer,
            Some(&token),
            &[("oauth_verifier", "verif")],
        );
        assert!(header.starts_with("OAuth "));
        for field in [
            "oauth_consumer_key=\"anonymous\"",
            "oauth_token=\"req-token\"",
            "oauth_verifier=\"verif\"",
            "oauth_signature_method=\"HMAC-SHA1\"",
            "oauth_version=\"1.0\"",
        ] {
            assert!(header.contains(field), "missing {field} in {header}");
        }
        assert!(header.contains("oauth_signature="));
        assert!(header.contains("oauth_nonce="));
        assert!(header.contains("oauth_timestamp="));
    }
}
