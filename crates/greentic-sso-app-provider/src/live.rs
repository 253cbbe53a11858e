use std::time::Duration;

use greentic_sso_app_core::{ApplicationPayload, RemoteApplication};
use reqwest::{
    StatusCode,
    blocking::{Client as HttpClient, RequestBuilder, Response},
};
use tracing::debug;
use url::Url;

use crate::{
    api::{ApplicationsApi, Credentials, MetadataSource},
    error::ApiError,
};

pub const DEFAULT_API_URL: &str = "https://console.jumpcloud.com/api/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const HEADER_API_KEY: &str = "x-api-key";
const HEADER_ORG_ID: &str = "x-org-id";

/// Blocking HTTP client for the `/applications` API.
pub struct LiveApplicationsClient {
    http: HttpClient,
    base_url: Url,
    credentials: Credentials,
}

impl LiveApplicationsClient {
    pub fn new(base_url: &Url, credentials: Credentials, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url = base_url.clone();
        if !base_url.path().ends_with('/') {
            base_url.set_path(&(base_url.path().to_string() + "/"));
        }
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `applications/<id>[/<suffix>]` under the base URL. The id is pushed as a
    /// single percent-encoded path segment.
    fn application_url(&self, id: &str, suffix: Option<&str>) -> Result<Url, ApiError> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(ApiError::InvalidId(id.to_string()));
        }
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            segments.pop_if_empty().push("applications").push(id);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder, org_id: &str, api_key: &str) -> RequestBuilder {
        let builder = builder.header(HEADER_API_KEY, api_key);
        if org_id.is_empty() {
            builder
        } else {
            builder.header(HEADER_ORG_ID, org_id)
        }
    }

    fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .authorized(builder, &self.credentials.org_id, &self.credentials.api_key)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .send()?;
        ensure_success(response)
    }

    fn send_json(&self, builder: RequestBuilder) -> Result<RemoteApplication, ApiError> {
        let body = self.send(builder)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl ApplicationsApi for LiveApplicationsClient {
    fn create_application(
        &self,
        payload: &ApplicationPayload,
    ) -> Result<RemoteApplication, ApiError> {
        let url = self.base_url.join("applications")?;
        debug!(%url, "creating application");
        self.send_json(self.http.post(url).json(payload))
    }

    fn get_application(&self, id: &str) -> Result<RemoteApplication, ApiError> {
        let url = self.application_url(id, None)?;
        debug!(%url, "fetching application");
        let response = self
            .authorized(
                self.http.get(url),
                &self.credentials.org_id,
                &self.credentials.api_key,
            )
            .header("Accept", "application/json")
            .send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { id: id.to_string() });
        }
        let body = ensure_success(response)?.text()?;
        // The API answers lookups of deleted applications by closing the
        // response without a body.
        if body.trim().is_empty() {
            return Err(ApiError::NotFound { id: id.to_string() });
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn update_application(
        &self,
        id: &str,
        payload: &ApplicationPayload,
    ) -> Result<RemoteApplication, ApiError> {
        let url = self.application_url(id, None)?;
        debug!(%url, "updating application");
        self.send_json(self.http.put(url).json(payload))
    }

    fn delete_application(&self, id: &str) -> Result<(), ApiError> {
        let url = self.application_url(id, None)?;
        debug!(%url, "deleting application");
        self.send(self.http.delete(url))?;
        Ok(())
    }
}

impl MetadataSource for LiveApplicationsClient {
    fn fetch_metadata_xml(
        &self,
        org_id: &str,
        application_id: &str,
        api_key: &str,
    ) -> Result<String, ApiError> {
        let url = self.application_url(application_id, Some("metadata.xml"))?;
        debug!(%url, "fetching application metadata");
        let response = self
            .authorized(self.http.get(url), org_id, api_key)
            .header("Accept", "application/xml")
            .send()?;
        Ok(ensure_success(response)?.text()?)
    }
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ApiError::status(status, extract_error_message(&body)))
}

fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message").or_else(|| value.get("error")).cloned())
        .and_then(|value| {
            if value.is_string() {
                value.as_str().map(|s| s.to_string())
            } else {
                Some(value.to_string())
            }
        })
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = Url::parse("https://console.example.com/api").unwrap();
        let client =
            LiveApplicationsClient::new(&url, Credentials::default(), DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url().as_str(), "https://console.example.com/api/");
        assert_eq!(
            client.application_url("abc", None).unwrap().as_str(),
            "https://console.example.com/api/applications/abc"
        );
    }

    #[test]
    fn application_ids_stay_inside_their_path_segment() {
        let url = Url::parse("https://console.example.com/api/").unwrap();
        let client =
            LiveApplicationsClient::new(&url, Credentials::default(), DEFAULT_TIMEOUT).unwrap();

        let traversal = client.application_url("../users", None).unwrap();
        assert_eq!(traversal.path(), "/api/applications/..%2Fusers");

        let query = client.application_url("a?b=1#frag", None).unwrap();
        assert_eq!(query.path(), "/api/applications/a%3Fb=1%23frag");
        assert_eq!(query.query(), None);
        assert_eq!(query.fragment(), None);

        let metadata = client.application_url("app-1", Some("metadata.xml")).unwrap();
        assert_eq!(
            metadata.as_str(),
            "https://console.example.com/api/applications/app-1/metadata.xml"
        );

        for id in ["", ".", ".."] {
            assert!(matches!(
                client.application_url(id, None),
                Err(ApiError::InvalidId(_))
            ));
        }
    }

    #[test]
    fn error_message_prefers_json_fields() {
        assert_eq!(extract_error_message(r#"{"message":"Unauthorized"}"#), "Unauthorized");
        assert_eq!(extract_error_message(r#"{"error":{"code":7}}"#), r#"{"code":7}"#);
        assert_eq!(extract_error_message("upstream timeout"), "upstream timeout");
    }
}
