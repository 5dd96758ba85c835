pub mod backend;
pub mod pipeline;
pub mod summary;

pub use backend::{BackendClient, PersistError, RetrieveError};
pub use pipeline::{PipelineError, Stage, SubmissionPipeline};
pub use summary::{countdown_phrase, TripSummary, WeatherCard};
