mod settings;

pub use settings::{GateConfig, LlmConfig, LoggingConfig, SearchConfig, Settings, WebConfig};
