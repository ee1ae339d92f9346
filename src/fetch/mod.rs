use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const NOTES_PATH: &str = "note/getnotes/";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NoteRecord {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub dead_line: String,
    #[serde(default, rename = "mod")]
    pub mode: String,
}

// The note service wraps its payload as {"object": ...} where the value is
// either a single record or a list of records. Lists are the canonical shape.
#[derive(Debug, Deserialize)]
struct NoteEnvelope {
    object: EnvelopeObject,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EnvelopeObject {
    Many(Vec<NoteRecord>),
    One(NoteRecord),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid endpoint URL '{endpoint}': {source}")]
    Endpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header '{header}', expected 'Key: Value'")]
    Header { header: String },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to decode notes from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub fn notes_url(endpoint: &str) -> Result<Url, FetchError> {
    let trimmed = endpoint.trim();
    let mut base = trimmed.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let base = Url::parse(&base).map_err(|e| FetchError::Endpoint {
        endpoint: trimmed.to_string(),
        source: e,
    })?;
    base.join(NOTES_PATH).map_err(|e| FetchError::Endpoint {
        endpoint: trimmed.to_string(),
        source: e,
    })
}

pub fn build_client(
    proxy: Option<&str>,
    timeout_seconds: Option<u64>,
    follow_redirects: bool,
    header: Option<&str>,
) -> Result<reqwest::Client, FetchError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!("notefeed/", env!("CARGO_PKG_VERSION"))),
    );
    if let Some(raw) = header.filter(|h| !h.trim().is_empty()) {
        let (name, value) = parse_header(raw)?;
        headers.insert(name, value);
    }

    let redirect_policy = if follow_redirects {
        reqwest::redirect::Policy::limited(10)
    } else {
        reqwest::redirect::Policy::none()
    };

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(redirect_policy);

    if let Some(secs) = timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy_url = reqwest::Proxy::all(proxy).map_err(|e| FetchError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy_url);
    }

    builder
        .build()
        .map_err(|e| FetchError::ClientBuild { source: e })
}

fn parse_header(
    raw: &str,
) -> Result<(reqwest::header::HeaderName, reqwest::header::HeaderValue), FetchError> {
    let invalid = || FetchError::Header {
        header: raw.to_string(),
    };
    let (name, value) = raw.split_once(':').ok_or_else(invalid)?;
    let name = reqwest::header::HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|_| invalid())?;
    let value = reqwest::header::HeaderValue::from_str(value.trim()).map_err(|_| invalid())?;
    Ok((name, value))
}

// One-shot load. No retries, no caching; callers decide what a failure means.
pub async fn fetch_notes(
    client: &reqwest::Client,
    url: &Url,
) -> Result<Vec<NoteRecord>, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| FetchError::Request {
        url: url.to_string(),
        source: e,
    })?;

    let envelope: NoteEnvelope =
        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            source: e,
        })?;

    Ok(match envelope.object {
        EnvelopeObject::Many(notes) => notes,
        EnvelopeObject::One(note) => vec![note],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_url_joins_endpoint_base() {
        let url = notes_url("http://127.0.0.1:8000/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/note/getnotes/");
    }

    #[test]
    fn notes_url_tolerates_missing_trailing_slash() {
        let url = notes_url("http://example.com/app").unwrap();
        assert_eq!(url.as_str(), "http://example.com/app/note/getnotes/");
    }

    #[test]
    fn notes_url_rejects_garbage() {
        assert!(notes_url("not a url").is_err());
    }

    #[test]
    fn envelope_accepts_record_list() {
        let body = r#"{"object": [{"content": "x", "created_at": "t1", "dead_line": "t2", "mod": "m"}]}"#;
        let envelope: NoteEnvelope = serde_json::from_str(body).unwrap();
        match envelope.object {
            EnvelopeObject::Many(notes) => {
                assert_eq!(notes.len(), 1);
                assert_eq!(notes[0].content, "x");
                assert_eq!(notes[0].created_at, "t1");
                assert_eq!(notes[0].dead_line, "t2");
                assert_eq!(notes[0].mode, "m");
            }
            EnvelopeObject::One(_) => panic!("list decoded as single record"),
        }
    }

    #[test]
    fn envelope_accepts_empty_list() {
        let envelope: NoteEnvelope = serde_json::from_str(r#"{"object": []}"#).unwrap();
        match envelope.object {
            EnvelopeObject::Many(notes) => assert!(notes.is_empty()),
            EnvelopeObject::One(_) => panic!("empty list decoded as single record"),
        }
    }

    #[test]
    fn envelope_accepts_single_record() {
        let body = r#"{"object": {"content": "solo"}}"#;
        let envelope: NoteEnvelope = serde_json::from_str(body).unwrap();
        match envelope.object {
            EnvelopeObject::One(note) => {
                assert_eq!(note.content, "solo");
                assert_eq!(note.created_at, "");
            }
            EnvelopeObject::Many(_) => panic!("single record decoded as list"),
        }
    }

    #[test]
    fn envelope_rejects_missing_object_field() {
        assert!(serde_json::from_str::<NoteEnvelope>(r#"{"notes": []}"#).is_err());
    }

    #[test]
    fn header_parsing() {
        assert!(parse_header("Authorization: Bearer abc").is_ok());
        assert!(parse_header("no-colon-here").is_err());
        assert!(parse_header(": empty-name").is_err());
    }
}
