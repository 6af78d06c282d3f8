use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Decode,
    Config,
    Render,
}

#[derive(Debug)]
pub struct UiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl UiError {
    pub fn transport(err: impl std::error::Error) -> Self {
        Self {
            kind: ErrorKind::Transport,
            message: err.to_string(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Decode,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Config,
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Render,
            message: message.into(),
        }
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Transport => "transport",
            ErrorKind::Decode => "decode",
            ErrorKind::Config => "config",
            ErrorKind::Render => "render",
        };
        write!(f, "{kind} error: {}", self.message)
    }
}

impl std::error::Error for UiError {}

impl From<reqwest::Error> for UiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::transport(err)
        }
    }
}

impl From<serde_json::Error> for UiError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

impl From<url::ParseError> for UiError {
    fn from(err: url::ParseError) -> Self {
        Self::config(err.to_string())
    }
}
