use collview_core::error::CollviewError;
use collview_core::models::collection::Collection;

/// Shown when a failure carries no message of its own.
pub const DEFAULT_ERROR_MESSAGE: &str = "Failed to load collections";

/// Outcome of the viewer's fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Pending,
    Failed(String),
    Ready(Vec<Collection>),
}

impl FetchState {
    pub fn from_result(result: Result<Vec<Collection>, CollviewError>) -> Self {
        match result {
            Ok(collections) => FetchState::Ready(collections),
            Err(e) => {
                let message = e.to_string();
                if message.trim().is_empty() {
                    FetchState::Failed(DEFAULT_ERROR_MESSAGE.to_string())
                } else {
                    FetchState::Failed(message)
                }
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FetchState::Pending)
    }

    pub fn view(&self) -> View<'_> {
        match self {
            FetchState::Pending => View::Loading,
            FetchState::Failed(message) => View::Error { message },
            FetchState::Ready(collections) if collections.is_empty() => View::Empty,
            FetchState::Ready(collections) => View::Populated(collections),
        }
    }
}

/// The four mutually exclusive things the viewer can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    Loading,
    Error { message: &'a str },
    Empty,
    Populated(&'a [Collection]),
}
