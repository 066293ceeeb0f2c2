/// The job/clip pair the preview operates against. Both ids are assigned by
/// the service and opaque here; they are set by job creation and clip
/// selection and never rolled back except by a new selection.
#[derive(Debug, Clone, Default)]
pub struct Session {
    job_id: Option<String>,
    clip_index: Option<u32>,
}

/// Snapshot of a session at the moment a load is issued. A load result is
/// committed only while its key still matches the session, which closes the
/// race where a stale in-flight load lands after a newer clip was selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipKey {
    pub job_id: String,
    pub clip_index: u32,
}

impl std::fmt::Display for ClipKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/clip {}", self.job_id, self.clip_index)
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_job(&mut self, id: impl Into<String>) {
        self.job_id = Some(id.into());
    }

    pub fn set_clip(&mut self, index: u32) {
        self.clip_index = Some(index);
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn clip_index(&self) -> Option<u32> {
        self.clip_index
    }

    pub fn key(&self) -> Option<ClipKey> {
        Some(ClipKey {
            job_id: self.job_id.clone()?,
            clip_index: self.clip_index?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_needs_both_fields() {
        let mut session = Session::new();
        assert_eq!(session.key(), None);

        session.set_job("j1");
        assert_eq!(session.key(), None);

        session.set_clip(2);
        let key = session.key().unwrap();
        assert_eq!(key.job_id, "j1");
        assert_eq!(key.clip_index, 2);
    }

    #[test]
    fn reselection_changes_the_key() {
        let mut session = Session::new();
        session.set_job("j1");
        session.set_clip(0);
        let first = session.key().unwrap();

        session.set_clip(1);
        assert_ne!(session.key().unwrap(), first);

        session.set_job("j2");
        assert_eq!(session.key().unwrap().job_id, "j2");
    }
}
