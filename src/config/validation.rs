use crate::config::types::{Config, CrawlerConfig, FieldsConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on parallel crawl tasks
const MAX_CONCURRENCY: u32 = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_fields_config(&config.fields)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1s, got {}s",
            config.timeout
        )));
    }

    if let Some(path) = &config.browser_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "browser-path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates the field selection
fn validate_fields_config(config: &FieldsConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.config_path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "fields config-path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_concurrency_bounds() {
        let mut crawler = CrawlerConfig::default();

        crawler.concurrency = 0;
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.concurrency = MAX_CONCURRENCY + 1;
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.concurrency = 1;
        assert!(validate_crawler_config(&crawler).is_ok());
    }

    #[test]
    fn test_validate_timeout() {
        let crawler = CrawlerConfig {
            timeout: 0,
            ..CrawlerConfig::default()
        };
        assert!(validate_crawler_config(&crawler).is_err());
    }

    #[test]
    fn test_validate_browser_path() {
        let crawler = CrawlerConfig {
            browser_path: Some(PathBuf::new()),
            ..CrawlerConfig::default()
        };
        assert!(validate_crawler_config(&crawler).is_err());
    }

    #[test]
    fn test_validate_crawler_name() {
        let mut agent = UserAgentConfig::default();
        assert!(validate_user_agent_config(&agent).is_ok());

        agent.crawler_name = "Bad Name".to_string();
        assert!(validate_user_agent_config(&agent).is_err());

        agent.crawler_name = String::new();
        assert!(validate_user_agent_config(&agent).is_err());
    }

    #[test]
    fn test_validate_contact_url() {
        let mut agent = UserAgentConfig {
            contact_url: Some("https://example.com/bot".to_string()),
            ..UserAgentConfig::default()
        };
        assert!(validate_user_agent_config(&agent).is_ok());

        agent.contact_url = Some("not a url".to_string());
        assert!(matches!(
            validate_user_agent_config(&agent),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_user_agent_header_value() {
        let agent = UserAgentConfig {
            crawler_name: "Bot".to_string(),
            crawler_version: "2.0".to_string(),
            contact_url: Some("https://example.com".to_string()),
        };
        assert_eq!(agent.header_value(), "Bot/2.0 (+https://example.com)");
    }
}
