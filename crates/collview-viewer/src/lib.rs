pub mod dev;
pub mod render;
pub mod services;
pub mod state;
pub mod viewer;

pub use render::RenderOptions;
pub use services::HostServices;
pub use state::{FetchState, View};
pub use viewer::CollectionViewer;
