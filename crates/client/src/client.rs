use cliplet_captions::{ClipKey, Word};
use cliplet_http::{HttpClient, Part};

use crate::error::Error;
use crate::types::{
    Clip, ClipsResponse, Identity, JobCreated, JobParams, Plan, PlansResponse, WordsResponse,
};

const FORM: &str = "application/x-www-form-urlencoded";

pub struct ApiClient<C> {
    http: C,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    /// The logged-in identity, or `None` when the session is missing or
    /// expired. Only a 401 means "not logged in"; everything else is a real
    /// failure.
    pub async fn identity(&self) -> Result<Option<Identity>, Error> {
        match self.http.get("/api/auth/me").await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) => match Error::from_http(e) {
                Error::AuthRequired(_) => Ok(None),
                other => Err(other),
            },
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, Error> {
        let body = form_body(&[("username", username), ("password", password)]);
        let bytes = self
            .http
            .post("/api/auth/login", body, FORM)
            .await
            .map_err(Error::from_http)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn signup(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Identity, Error> {
        let body = form_body(&[
            ("email", email),
            ("username", username),
            ("password", password),
        ]);
        let bytes = self
            .http
            .post("/api/auth/signup", body, FORM)
            .await
            .map_err(Error::from_http)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn logout(&self) -> Result<(), Error> {
        self.http
            .post("/api/auth/logout", Vec::new(), FORM)
            .await
            .map_err(Error::from_http)?;
        Ok(())
    }

    pub async fn plans(&self) -> Result<Vec<Plan>, Error> {
        let bytes = self
            .http
            .get("/api/billing/plans")
            .await
            .map_err(Error::from_http)?;
        let response: PlansResponse = serde_json::from_slice(&bytes)?;
        Ok(response.plans)
    }

    /// Upload a video and start clipping it. Costs one credit; a 402 comes
    /// back as [`Error::NoCredits`].
    pub async fn create_job(
        &self,
        file_name: &str,
        video: Vec<u8>,
        params: &JobParams,
    ) -> Result<JobCreated, Error> {
        let parts = vec![
            Part::file("video", file_name, video),
            Part::text("clip_len", params.clip_len.to_string()),
            Part::text("max_clips", params.max_clips.to_string()),
            Part::text("out_aspect", params.aspect.as_str()),
        ];
        let bytes = self
            .http
            .post_multipart("/api/jobs", parts)
            .await
            .map_err(Error::from_http)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn clips(&self, job_id: &str) -> Result<Vec<Clip>, Error> {
        let path = format!("/api/jobs/{job_id}/clips");
        let bytes = self.http.get(&path).await.map_err(Error::from_http)?;
        let response: ClipsResponse = serde_json::from_slice(&bytes)?;
        Ok(response.clips)
    }

    /// Word timings for one clip. The `{"words": [...]}` envelope is
    /// unwrapped here; missing or malformed timings read as 0.
    pub async fn clip_words(&self, key: &ClipKey) -> Result<Vec<Word>, Error> {
        let path = format!(
            "/api/jobs/{}/clips/{}/words",
            key.job_id, key.clip_index
        );
        let bytes = self.http.get(&path).await.map_err(Error::from_http)?;
        let response: WordsResponse = serde_json::from_slice(&bytes)?;
        Ok(response.into_words())
    }

    /// The server-rendered SRT for one clip, verbatim.
    pub async fn captions_srt(&self, key: &ClipKey) -> Result<String, Error> {
        let path = format!(
            "/api/jobs/{}/clips/{}/captions.srt",
            key.job_id, key.clip_index
        );
        let bytes = self.http.get(&path).await.map_err(Error::from_http)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Replace one clip's caption text. On success the caller is expected
    /// to reload word timings, since the edit invalidates them.
    pub async fn save_captions(&self, key: &ClipKey, srt_text: &str) -> Result<(), Error> {
        let path = format!(
            "/api/jobs/{}/clips/{}/captions",
            key.job_id, key.clip_index
        );
        let body = form_body(&[("srt_text", srt_text)]);
        self.http
            .post(&path, body, FORM)
            .await
            .map_err(Error::from_http)?;
        Ok(())
    }
}

fn form_body(fields: &[(&str, &str)]) -> Vec<u8> {
    let encoded: Vec<String> = fields
        .iter()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect();
    encoded.join("&").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_body_encodes_reserved_characters() {
        let body = form_body(&[("srt_text", "1\n00:00:00,000 --> 00:00:01,000\nhi & bye")]);
        let body = String::from_utf8(body).unwrap();
        assert!(body.starts_with("srt_text="));
        assert!(body.contains("%26"));
        assert!(!body.contains('\n'));
    }

    #[test]
    fn form_body_joins_fields_with_ampersands() {
        let body = form_body(&[("username", "ada"), ("password", "pw word")]);
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "username=ada&password=pw%20word"
        );
    }
}
