//! Three-legged OAuth 1.0a profile linking.
//!
//! Admin users link an external account to their profile via the provider's
//! request-token / authorize / access-token endpoints. The handshake keeps
//! exactly one piece of transient state per owner (the request-token secret,
//! in the `auth_request` table) and produces a `profile` row once the
//! access-token exchange succeeds. Failed legs are absorbed: the caller logs
//! and leaves the user unlinked; nothing is retried.

pub mod signature;

use crate::config::OAuthConfig;
use crate::entity::{auth_request, profile};
use crate::error::OAuthError;
use hyper::StatusCode;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use signature::{Consumer, Token, authorization_header, percent_encode};
use time::OffsetDateTime;

/// The provider's three handshake endpoints.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub request_token_url: String,
    pub authorize_url: String,
    pub access_token_url: String,
}

impl ProviderEndpoints {
    /// Endpoints on the host serving the current request, the hosted-platform
    /// layout: `https://{host}/_ah/OAuthGet...`.
    pub fn for_host(host: &str) -> Self {
        Self::from_base(&format!("https://{host}"))
    }

    /// Endpoints under an explicitly configured base URL.
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            request_token_url: format!("{base}/_ah/OAuthGetRequestToken"),
            authorize_url: format!("{base}/_ah/OAuthAuthorizeToken"),
            access_token_url: format!("{base}/_ah/OAuthGetAccessToken"),
        }
    }
}

/// Local development never talks to the provider; the handshake
/// short-circuits to "not linked".
pub fn is_dev_host(host: &str) -> bool {
    host.contains("localhost")
}

/// Orchestrates the handshake legs against the provider.
#[derive(Debug, Clone)]
pub struct ProfileLinker {
    http: reqwest::Client,
    consumer: Consumer,
}

impl ProfileLinker {
    pub fn new(oauth: &OAuthConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            http,
            consumer: Consumer {
                key: oauth.consumer_key.clone(),
                secret: oauth.consumer_secret.clone(),
            },
        }
    }

    /// First leg: obtain a request token, remember its secret for `owner`
    /// (upsert, last write wins), and return the authorization URL the user
    /// must visit.
    #[tracing::instrument(skip(self, db))]
    pub async fn begin_link(
        &self,
        db: &DatabaseConnection,
        endpoints: &ProviderEndpoints,
        owner: &str,
        callback: &str,
    ) -> Result<String, OAuthError> {
        let header = authorization_header(
            "GET",
            &endpoints.request_token_url,
            &self.consumer,
            None,
            &[("oauth_callback", callback)],
        );
        let response = self
            .http
            .get(&endpoints.request_token_url)
            .header(hyper::header::AUTHORIZATION, header)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Err(OAuthError::Status(response.status()));
        }

        let body = response.text().await?;
        let fields = parse_form_body(&body);
        let token =
            form_value(&fields, "oauth_token").ok_or(OAuthError::MissingField("oauth_token"))?;
        let secret = form_value(&fields, "oauth_token_secret")
            .ok_or(OAuthError::MissingField("oauth_token_secret"))?;

        let now = OffsetDateTime::now_utc();
        match auth_request::Entity::find_by_owner(db, owner).await? {
            Some(existing) => {
                let mut model: auth_request::ActiveModel = existing.into();
                model.request_secret = Set(secret.to_string());
                model.updated_at = Set(now);
                model.update(db).await?;
            }
            None => {
                let model = auth_request::ActiveModel {
                    owner: Set(owner.to_string()),
                    request_secret: Set(secret.to_string()),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model.insert(db).await?;
            }
        }

        Ok(format!(
            "{}?oauth_token={}",
            endpoints.authorize_url,
            percent_encode(token)
        ))
    }

    /// Third leg: exchange the authorized request token plus verifier for an
    /// access token and persist it as the owner's profile.
    #[tracing::instrument(skip(self, db, request_secret))]
    pub async fn complete_link(
        &self,
        db: &DatabaseConnection,
        endpoints: &ProviderEndpoints,
        owner: &str,
        oauth_token: &str,
        oauth_verifier: &str,
        request_secret: &str,
    ) -> Result<profile::Model, OAuthError> {
        let token = Token {
            key: oauth_token.to_string(),
            secret: request_secret.to_string(),
        };
        let header = authorization_header(
            "POST",
            &endpoints.access_token_url,
            &self.consumer,
            Some(&token),
            &[("oauth_verifier", oauth_verifier)],
        );
        let response = self
            .http
            .post(&endpoints.access_token_url)
            .header(hyper::header::AUTHORIZATION, header)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Err(OAuthError::Status(response.status()));
        }

        let body = response.text().await?;
        let fields = parse_form_body(&body);
        let access_token =
            form_value(&fields, "oauth_token").ok_or(OAuthError::MissingField("oauth_token"))?;
        let access_secret = form_value(&fields, "oauth_token_secret")
            .ok_or(OAuthError::MissingField("oauth_token_secret"))?;

        let model = profile::ActiveModel {
            owner: Set(owner.to_string()),
            access_token: Set(access_token.to_string()),
            access_token_secret: Set(access_secret.to_string()),
            created_at: Set(OffsetDateTime::now_utc()),
            ..Default::default()
        };
        Ok(model.insert(db).await?)
    }
}

/// Parse a `application/x-www-form-urlencoded` body into key/value pairs.
pub(crate) fn parse_form_body(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut kv = pair.splitn(2, '=');
            let key = form_decode(kv.next().unwrap_or_default());
            let value = form_decode(kv.next().unwrap_or_default());
            (key, value)
        })
        .collect()
}

fn form_value<'a>(fields: &'a [(String, String)], key: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn form_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            // Decode byte-wise; the body is provider-controlled and may not
            // be well-formed, so never slice by byte index into the &str.
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                out.push(hex_value(bytes[i + 1]) << 4 | hex_value(bytes[i + 2]));
                i += 3;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_derive_from_host() {
        let endpoints = ProviderEndpoints::for_host("status.example.com");
        assert_eq!(
            endpoints.request_token_url,
            "https://status.example.com/_ah/OAuthGetRequestToken"
        );
        assert_eq!(
            endpoints.authorize_url,
            "https://status.example.com/_ah/OAuthAuthorizeToken"
        );
        assert_eq!(
            endpoints.access_token_url,
            "https://status.example.com/_ah/OAuthGetAccessToken"
        );
    }

    #[test]
    fn endpoints_from_base_trim_trailing_slash() {
        let endpoints = ProviderEndpoints::from_base("http://127.0.0.1:9999/");
        assert_eq!(
            endpoints.access_token_url,
            "http://127.0.0.1:9999/_ah/OAuthGetAccessToken"
        );
    }

    #[test]
    fn dev_hosts_are_recognized() {
        assert!(is_dev_host("localhost:8080"));
        assert!(is_dev_host("app.localhost"));
        assert!(!is_dev_host("status.example.com"));
    }

    #[test]
    fn form_body_parsing_decodes_pairs() {
        let fields = parse_form_body("oauth_token=ab%2Fcd&oauth_token_secret=s+1&empty=");
        assert_eq!(form_value(&fields, "oauth_token"), Some("ab/cd"));
        assert_eq!(form_value(&fields, "oauth_token_secret"), Some("s 1"));
        assert_eq!(form_value(&fields, "empty"), Some(""));
        assert_eq!(form_value(&fields, "missing"), None);
    }

    #[test]
    fn malformed_percent_sequences_pass_through() {
        let fields = parse_form_body("k=%zz&v=%2");
        assert_eq!(form_value(&fields, "k"), Some("%zz"));
        assert_eq!(form_value(&fields, "v"), Some("%2"));
    }

    #[test]
    fn multibyte_characters_after_percent_pass_through() {
        let fields = parse_form_body("oauth_token=%aé&name=caf%C3%A9");
        assert_eq!(form_value(&fields, "oauth_token"), Some("%aé"));
        assert_eq!(form_value(&fields, "name"), Some("café"));
    }
}
