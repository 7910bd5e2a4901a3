use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while looking up weather for a city.
///
/// The variants are kept distinct so a front-end can pick its wording:
/// a rejected key, an unknown city and a generic provider failure all read
/// differently to the user.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// No API key was configured for the client.
    #[error("No API key configured for OpenWeather")]
    MissingCredential,

    /// The provider rejected the API key (HTTP 401).
    #[error("OpenWeather rejected the API key")]
    InvalidCredential,

    /// The provider could not resolve the city (HTTP 404).
    #[error("City not found: {city}")]
    CityNotFound { city: String },

    /// Any other non-success response, with the provider's own message.
    #[error("OpenWeather request failed with status {status}: {message}")]
    Provider { status: StatusCode, message: String },

    /// The response body did not have the expected shape.
    #[error("Malformed OpenWeather response: {0}")]
    MalformedResponse(String),

    /// Transport-level failure: unreachable host, timeout, broken body stream.
    #[error("Network error while contacting OpenWeather")]
    Network(#[source] reqwest::Error),

    /// Blank city name given to a search.
    #[error("City name must not be empty")]
    EmptyCity,
}

impl WeatherError {
    pub fn is_credential_error(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::InvalidCredential)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CityNotFound { .. })
    }
}
