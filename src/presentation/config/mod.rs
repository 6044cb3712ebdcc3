mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseProvider, DatabaseSettings, LlmSettings, LoggingSettings, RateLimitSettings,
    ScraperSettings, ServerSettings, Settings,
};
