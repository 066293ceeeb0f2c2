use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no job/clip selected")]
    SessionIncomplete,
}
