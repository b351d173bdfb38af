//! The factory contract every graphic-store provider implements.

use std::sync::Arc;

use async_trait::async_trait;
use store_params::{ParameterDescriptor, ParameterSet, RawParameters, ResolvedParameters};
use tracing::debug;
use url::Url;

use crate::error::StoreResult;

/// Key of the well-known username parameter.
pub const USERNAME: &str = "user";

/// Key of the well-known password parameter.
pub const PASSWORD: &str = "password";

/// Required text parameter carrying the username for authentication.
pub fn username_param() -> ParameterDescriptor {
    ParameterDescriptor::new(USERNAME).with_description("Username for authentication")
}

/// Required text parameter carrying the password for authentication.
pub fn password_param() -> ParameterDescriptor {
    ParameterDescriptor::new(PASSWORD).with_description("Password for authentication")
}

/// A connected graphic store.
pub trait GraphicStore: Send + Sync + std::fmt::Debug {
    /// Provider this store was created for.
    fn provider(&self) -> &Url;

    /// Parameters the store was created with, after lookup.
    fn parameters(&self) -> &ResolvedParameters;

    fn display_name(&self) -> &str;
}

/// Creates graphic stores for the providers it understands.
///
/// Implementations declare their accepted parameters once through
/// [`parameters_info`](Self::parameters_info); callers check input with
/// [`can_process`](Self::can_process) before creating a store.
#[async_trait]
pub trait GraphicStoreFactory: Send + Sync {
    fn display_name(&self) -> &str;

    fn description(&self) -> &str;

    /// Optional 16x16 icon for UIs.
    fn icon(&self) -> Option<Url> {
        None
    }

    /// Every parameter this factory accepts.
    fn parameters_info(&self) -> &ParameterSet;

    /// Whether this factory handles providers with the given URL scheme.
    fn accepts_scheme(&self, scheme: &str) -> bool;

    /// Whether the factory's runtime requirements are met.
    fn is_available(&self) -> bool {
        true
    }

    /// Whether `params` are enough to create a store for `provider`.
    fn can_process(&self, provider: &Url, params: &RawParameters) -> bool {
        if !self.accepts_scheme(provider.scheme()) {
            return false;
        }
        let report = self.parameters_info().validate(params);
        if !report.is_valid() {
            debug!(
                factory = %self.display_name(),
                provider = %provider,
                errors = report.errors().count(),
                "Parameters rejected"
            );
            return false;
        }
        true
    }

    /// Create (or return a previously cached) store for `provider`.
    async fn create_graphic_store(
        &self,
        provider: &Url,
        params: &RawParameters,
    ) -> StoreResult<Arc<dyn GraphicStore>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use store_params::ValueKind;

    #[test]
    fn test_well_known_params_are_required_text() {
        for (param, key) in [(username_param(), USERNAME), (password_param(), PASSWORD)] {
            assert_eq!(param.key(), key);
            assert_eq!(param.kind(), &ValueKind::Text);
            assert!(param.is_required());
            assert!(param.description().is_some());
        }
    }
}
