//! Platform API clients

mod client;
mod error;
mod fixtures;
mod traits;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::config::TuiConfig;
use crate::state::{LookupOption, LookupSource};

pub use client::RestClient;
pub use error::{ApiError, ErrorCategory};
pub use fixtures::FixtureClient;
pub use traits::ApiClientTrait;

#[cfg(test)]
pub use traits::MockApiClientTrait;

/// Shared handle used by spawned tasks
pub type SharedApi = Arc<dyn ApiClientTrait>;

/// Build the client selected by the configuration
pub fn connect(config: &TuiConfig) -> Result<SharedApi> {
    if config.fixtures_enabled() {
        tracing::warn!("using in-memory fixture data instead of the platform API");
        return Ok(Arc::new(FixtureClient::new(Duration::from_millis(400))));
    }
    let base_url = config.api_base_url();
    tracing::info!(%base_url, "using platform API");
    Ok(Arc::new(RestClient::new(&base_url, config.request_timeout())?))
}

/// Fetch the options behind a dropdown
pub async fn fetch_lookup(
    api: &dyn ApiClientTrait,
    source: LookupSource,
) -> Result<Vec<LookupOption>, ApiError> {
    match source {
        LookupSource::Courses => api.list_courses().await,
        LookupSource::Instructors => api.list_instructors().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fetch_lookup_routes_by_source() {
        let mut api = MockApiClientTrait::new();
        api.expect_list_courses()
            .times(1)
            .returning(|| Ok(vec![LookupOption::new("c-1", "Algebra")]));
        api.expect_list_instructors()
            .times(1)
            .returning(|| Err(ApiError::Network("connection refused".into())));

        let courses = tokio_test::block_on(fetch_lookup(&api, LookupSource::Courses));
        assert_eq!(courses, Ok(vec![LookupOption::new("c-1", "Algebra")]));

        let instructors = tokio_test::block_on(fetch_lookup(&api, LookupSource::Instructors));
        assert!(matches!(instructors, Err(ApiError::Network(_))));
    }

    #[test]
    fn test_connect_uses_fixtures_when_configured() {
        let config = TuiConfig {
            use_fixtures: Some(true),
            ..TuiConfig::default()
        };
        // the env var overrides the file; only check when it is unset
        if std::env::var("EDU_ADMIN_FIXTURES").is_err() {
            let api = connect(&config).unwrap();
            let students = tokio_test::block_on(api.list_students()).unwrap();
            assert_eq!(students.len(), 1);
        }
    }
}
