use crate::config::types::{AgentConfig, Config, CrawlerConfig, OutputConfig, TaskConfig};
use crate::graph::EstimatedScore;
use crate::url::base_host;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_task_config(&config.task)?;
    validate_crawler_config(&config.crawler)?;
    validate_agent_config(&config.agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates task configuration
fn validate_task_config(config: &TaskConfig) -> Result<(), ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation("task name cannot be empty".to_string()));
    }

    base_host(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_links_to_scrape < 1 {
        return Err(ConfigError::Validation(format!(
            "max-links-to-scrape must be >= 1, got {}",
            config.max_links_to_scrape
        )));
    }

    validate_score("seed-score", config.seed_score)?;
    if let Some(min_score) = config.min_scraping_score {
        validate_score("min-scraping-score", min_score)?;
    }

    Ok(())
}

fn validate_score(field: &str, value: u8) -> Result<(), ConfigError> {
    EstimatedScore::new(value).map(|_| ()).map_err(|_| {
        ConfigError::Validation(format!(
            "{} must be between {} and {}, got {}",
            field,
            EstimatedScore::MIN,
            EstimatedScore::MAX,
            value
        ))
    })
}

/// Validates agent configuration
fn validate_agent_config(config: &AgentConfig) -> Result<(), ConfigError> {
    validate_endpoint("scrape-endpoint", &config.scrape_endpoint)?;
    validate_endpoint("validate-endpoint", &config.validate_endpoint)?;

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_endpoint(field: &str, endpoint: &str) -> Result<(), ConfigError> {
    let url = Url::parse(endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", field, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            field,
            url.scheme()
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty".to_string(),
        ));
    }

    if config.score_decimals > 10 {
        return Err(ConfigError::Validation(format!(
            "score-decimals must be <= 10, got {}",
            config.score_decimals
        )));
    }

    Ok(())
}
