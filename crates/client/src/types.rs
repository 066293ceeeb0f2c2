use cliplet_captions::Word;

/// The logged-in account as `/api/auth/me` reports it. `None`-ness is
/// modeled at the call site: [`crate::ApiClient::identity`] turns a 401 into
/// `Ok(None)`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Identity {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub credits: i64,
    #[serde(default)]
    pub plan: String,
    #[serde(default)]
    pub billing: String,
    #[serde(default)]
    pub next_reset_at: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct PlansResponse {
    pub plans: Vec<Plan>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Plan {
    pub key: String,
    pub name: String,
    pub credits: i64,
    pub price_monthly: i64,
    #[serde(default)]
    pub price_id: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct JobCreated {
    pub job_id: String,
    pub credits: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aspect {
    Portrait,
    Square,
    Landscape,
}

impl Aspect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aspect::Portrait => "9:16",
            Aspect::Square => "1:1",
            Aspect::Landscape => "16:9",
        }
    }
}

impl std::fmt::Display for Aspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Aspect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "9:16" => Ok(Aspect::Portrait),
            "1:1" => Ok(Aspect::Square),
            "16:9" => Ok(Aspect::Landscape),
            other => Err(format!("unknown aspect {other:?}, expected 9:16, 1:1 or 16:9")),
        }
    }
}

/// Knobs for job creation. Ranges are enforced server-side (`clip_len`
/// 5-120, `max_clips` 1-50); these are the service defaults.
#[derive(Debug, Clone)]
pub struct JobParams {
    pub clip_len: u32,
    pub max_clips: u32,
    pub aspect: Aspect,
}

impl Default for JobParams {
    fn default() -> Self {
        Self {
            clip_len: 25,
            max_clips: 8,
            aspect: Aspect::Portrait,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct ClipsResponse {
    #[serde(default)]
    pub clips: Vec<Clip>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Clip {
    pub index: u32,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub thumb: String,
}

impl Clip {
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct WordsResponse {
    #[serde(default)]
    pub words: Vec<WireWord>,
}

impl WordsResponse {
    pub fn into_words(self) -> Vec<Word> {
        self.words
            .into_iter()
            .map(|w| Word::new(w.word, w.start, w.end))
            .collect()
    }
}

/// Word record as the service serves it. Timings pass through
/// [`lenient_f64`] because edited captions can leave holes or junk in the
/// numeric fields; a bad number reads as 0 rather than failing the whole
/// load.
#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct WireWord {
    #[serde(default)]
    pub word: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub start: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub end: f64,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_tolerate_missing_and_malformed_timings() {
        let json = r#"{
            "words": [
                {"word": "hi", "start": 0.0, "end": 1.0},
                {"word": "there"},
                {"word": "friend", "start": "oops", "end": null}
            ]
        }"#;
        let response: WordsResponse = serde_json::from_str(json).unwrap();
        let words = response.into_words();

        assert_eq!(words.len(), 3);
        assert_eq!(words[0].text, "hi");
        assert_eq!((words[1].start, words[1].end), (0.0, 0.0));
        assert_eq!((words[2].start, words[2].end), (0.0, 0.0));
    }

    #[test]
    fn words_envelope_may_be_absent() {
        let response: WordsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_words().is_empty());
    }

    #[test]
    fn aspect_round_trips_service_strings() {
        for s in ["9:16", "1:1", "16:9"] {
            let aspect: Aspect = s.parse().unwrap();
            assert_eq!(aspect.as_str(), s);
        }
        assert!("4:3".parse::<Aspect>().is_err());
    }

    #[test]
    fn identity_tolerates_sparse_signup_response() {
        let json = r#"{"ok": true, "email": "a@b.c", "username": "ada", "credits": 10, "plan": "free"}"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.username, "ada");
        assert_eq!(identity.billing, "");
        assert_eq!(identity.next_reset_at, None);
    }
}
