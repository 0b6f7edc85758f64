pub mod config;
pub mod countries;
pub mod error;
pub mod fetch;
pub mod output;
pub mod process;
pub mod run;
pub mod schema;

pub use config::Settings;
pub use countries::{filter_countries, AllowList};
pub use error::{PipelineError, PipelineResult};
pub use process::preprocess;
pub use run::{run, RunSummary};
