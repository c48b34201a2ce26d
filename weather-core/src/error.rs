use thiserror::Error;

/// Failures that end a search attempt.
///
/// An unresolvable location is not an error; providers report it as
/// [`Lookup::NotFound`](crate::model::Lookup::NotFound).
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The request never produced a response (DNS, connect, body read).
    #[error("Request to {target} failed: {message}")]
    Network { target: &'static str, message: String },

    /// The provider answered with a non-success status.
    #[error("{target} request failed with status {status}: {body}")]
    Status {
        target: &'static str,
        status: u16,
        body: String,
    },

    /// The response body or one of its fields could not be interpreted.
    #[error("Failed to parse {target} response: {message}")]
    Parse { target: &'static str, message: String },

    /// Location access was refused or is unavailable.
    #[error("Unable to retrieve your location: {0}")]
    PermissionDenied(String),

    #[error(
        "No OpenWeather API key configured.\n\
         Hint: run `weather configure` or set OPENWEATHER_API_KEY."
    )]
    MissingApiKey,
}

impl WeatherError {
    pub(crate) fn network(target: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Network {
            target,
            message: err.to_string(),
        }
    }

    pub(crate) fn parse(target: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            target,
            message: err.to_string(),
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
