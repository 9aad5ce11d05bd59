use derive_more::Display;

/// Root error type for the dashboard engine
#[derive(Debug, Clone, PartialEq, Display)]
pub enum AppError {
    #[display(fmt = "Payload Error: {}", _0)]
    Payload(PayloadError),
    #[display(fmt = "Fetch Error: {}", _0)]
    Fetch(FetchError),
    #[display(fmt = "Config Error: {}", _0)]
    Config(ConfigError),
    #[display(fmt = "Render Error: {}", _0)]
    Render(RenderError),
}

/// Server payload could not be interpreted at all.
///
/// Individual malformed fields never produce this: they are coerced to
/// empty/placeholder values instead.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum PayloadError {
    #[display(fmt = "payload is not an object")]
    NotAnObject,
    #[display(fmt = "payload has no kind")]
    MissingKind,
    #[display(fmt = "unknown payload kind: {}", _0)]
    UnknownKind(String),
    #[display(fmt = "invalid json: {}", _0)]
    InvalidJson(String),
}

/// Transport and envelope failures for detail-table / page-action fetches
#[derive(Debug, Clone, PartialEq, Display)]
pub enum FetchError {
    #[display(fmt = "request failed: {}", _0)]
    RequestFailed(String),
    #[display(fmt = "HTTP {}", _0)]
    HttpStatus(u16),
    #[display(fmt = "invalid response: {}", _0)]
    InvalidResponse(String),
    #[display(fmt = "unexpected envelope: {}", _0)]
    UnexpectedEnvelope(String),
}

#[derive(Debug, Clone, PartialEq, Display)]
pub enum ConfigError {
    #[display(fmt = "invalid config json: {}", _0)]
    InvalidJson(String),
    #[display(fmt = "widget {} belongs to more than one linked group", _0)]
    OverlappingGroups(String),
    #[display(fmt = "invalid parameter: {}", _0)]
    InvalidParameter(String),
}

#[derive(Debug, Clone, PartialEq, Display)]
pub enum RenderError {
    #[display(fmt = "no render target for widget {}", _0)]
    TargetMissing(String),
    #[display(fmt = "stale response for widget {}", _0)]
    StaleResponse(String),
    #[display(fmt = "host bridge failed: {}", _0)]
    Bridge(String),
    /// Widget response envelope carried no usable payload; shown verbatim.
    #[display(fmt = "{}", _0)]
    Upstream(String),
}

impl std::error::Error for AppError {}
impl std::error::Error for PayloadError {}
impl std::error::Error for FetchError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for RenderError {}

/// Error conversion utilities
impl From<PayloadError> for AppError {
    fn from(error: PayloadError) -> Self {
        AppError::Payload(error)
    }
}

impl From<FetchError> for AppError {
    fn from(error: FetchError) -> Self {
        AppError::Fetch(error)
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        AppError::Config(error)
    }
}

impl From<RenderError> for AppError {
    fn from(error: RenderError) -> Self {
        AppError::Render(error)
    }
}

impl From<serde_json::Error> for PayloadError {
    fn from(error: serde_json::Error) -> Self {
        PayloadError::InvalidJson(error.to_string())
    }
}

// Simple convenience type aliases
pub type PayloadResult<T> = Result<T, PayloadError>;
pub type FetchResult<T> = Result<T, FetchError>;
pub type AppResult<T> = Result<T, AppError>;
