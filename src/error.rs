//! Error types shared by the board core and its hosts.

use thiserror::Error;

/// Everything that can go wrong talking to the backend or parsing user input.
///
/// The board core never surfaces these to the user directly: load failures
/// degrade to an empty week and save failures are logged. Hosts (CLI, TUI
/// setup) report them and exit.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("backend responded with HTTP {status} for week {week_key}")]
    Http { week_key: String, status: u16 },

    #[error("transport error talking to backend: {0}")]
    Transport(String),

    #[error("could not decode week payload: {0}")]
    Decode(String),

    #[error("invalid week key \"{0}\": expected YYYY-MM-DD")]
    InvalidWeekKey(String),

    #[error("invalid day {0}: expected 1-7 (Monday=1)")]
    InvalidDay(usize),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BoardError>;

impl From<ureq::Error> for BoardError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => BoardError::Http {
                week_key: response
                    .get_url()
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string(),
                status,
            },
            ureq::Error::Transport(transport) => BoardError::Transport(transport.to_string()),
        }
    }
}
