//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;

use logiparse_core::{api_key_from_env, AnthropicClient, LogiConfig, Pipeline, StrategyChoice};

pub(crate) fn load_config(path: Option<&str>) -> anyhow::Result<LogiConfig> {
    Ok(match path {
        Some(path) => LogiConfig::from_file(std::path::Path::new(path))?,
        None => LogiConfig::default(),
    })
}

/// Build the pipeline, attaching a model client when credentials are
/// available. A missing API key is fatal only when the model strategy was
/// explicitly requested.
pub(crate) fn build_pipeline(
    config: &LogiConfig,
    choice: StrategyChoice,
) -> anyhow::Result<Pipeline> {
    let pipeline = Pipeline::from_config(config);

    match api_key_from_env() {
        Ok(key) => {
            let client = AnthropicClient::new(config.model.to_settings(key))?;
            Ok(pipeline.with_model_client(Box::new(client)))
        }
        Err(e) if choice == StrategyChoice::Model => Err(e.into()),
        Err(_) => Ok(pipeline),
    }
}
