use crate::{alation_api::AlationApiError, config::ConfigError};

/// Process exit codes, one per class of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Unexpected,
    Config,
    Protocol,
    Transport,
    FileSystem,
    Interrupted,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Unexpected => 1,
            ExitStatus::Config => 2,
            ExitStatus::Protocol => 3,
            ExitStatus::Transport => 4,
            ExitStatus::FileSystem => 5,
            ExitStatus::Interrupted => 130,
        }
    }

    /// Classifies an error by the first Alation or config error in its chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if cause.is::<ConfigError>() {
                return ExitStatus::Config;
            }

            if let Some(err) = cause.downcast_ref::<AlationApiError>() {
                return Self::from_api_error(err);
            }
        }

        ExitStatus::Unexpected
    }

    fn from_api_error(err: &AlationApiError) -> Self {
        match err {
            AlationApiError::EmptyReference | AlationApiError::InvalidUrl { .. } => {
                ExitStatus::Config
            }
            AlationApiError::UnexpectedStatus { .. }
            | AlationApiError::MissingLocation
            | AlationApiError::UnrecognizedRedirect { .. }
            | AlationApiError::DownloadStatus { .. } => ExitStatus::Protocol,
            AlationApiError::Http { .. } | AlationApiError::Timeout { .. } => {
                ExitStatus::Transport
            }
            AlationApiError::Io { .. } => ExitStatus::FileSystem,
        }
    }

    /// Label used when reporting a failed run.
    pub fn describe(self) -> &'static str {
        match self {
            ExitStatus::Success => "success",
            ExitStatus::Unexpected => "an unexpected error occurred",
            ExitStatus::Config => "configuration error",
            ExitStatus::Protocol => "Alation returned an unexpected response",
            ExitStatus::Transport => "a network error occurred",
            ExitStatus::FileSystem => "a file error occurred",
            ExitStatus::Interrupted => "interrupted",
        }
    }
}
