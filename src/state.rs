use std::{sync::Arc, time::Duration};

use crate::{
    features::{ApplicationFeatures, ConsoleFeatures, FeatureContext},
    service::{
        config::{ConfigService, ConfigServiceImpl},
        gravatar::{GravatarService, HttpGravatarService},
        profile::{HttpProfileService, ProfileService},
        session::HttpSessionService,
        templates::{EmailTemplatesService, HttpEmailTemplatesService},
    },
};

pub struct ConsoleState {
    config: Arc<dyn ConfigService>,
    gravatar: Arc<dyn GravatarService>,
    session: Arc<HttpSessionService>,
    profile: Arc<dyn ProfileService>,
    templates: Arc<dyn EmailTemplatesService>,
    features: Arc<dyn ApplicationFeatures>,
}

impl ConsoleState {
    pub fn new() -> Arc<Self> {
        Self::with_features(Arc::new(ConsoleFeatures))
    }

    /// Build the console state with a deployment-specific feature surface.
    pub fn with_features(features: Arc<dyn ApplicationFeatures>) -> Arc<Self> {
        let config: Arc<dyn ConfigService> = Arc::new(ConfigServiceImpl::new());
        let values = config.shared();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(values.request_timeout_seconds))
            .build()
            .expect("http client build failed");

        let gravatar = Arc::new(HttpGravatarService::new(client.clone(), values.clone()));
        let session = Arc::new(HttpSessionService::new(client.clone(), values.clone()));
        let profile = Arc::new(HttpProfileService::new(
            client.clone(),
            values.clone(),
            gravatar.clone(),
            session.clone(),
        ));
        let templates = Arc::new(HttpEmailTemplatesService::new(
            client,
            values,
            session.clone(),
        ));

        Arc::new(Self {
            config,
            gravatar,
            session,
            profile,
            templates,
            features,
        })
    }

    pub fn config(&self) -> &dyn ConfigService {
        self.config.as_ref()
    }

    pub fn gravatar(&self) -> &dyn GravatarService {
        self.gravatar.as_ref()
    }

    pub fn session(&self) -> &HttpSessionService {
        self.session.as_ref()
    }

    pub fn profile(&self) -> &dyn ProfileService {
        self.profile.as_ref()
    }

    pub fn templates(&self) -> Arc<dyn EmailTemplatesService> {
        self.templates.clone()
    }

    pub fn features(&self) -> &dyn ApplicationFeatures {
        self.features.as_ref()
    }

    /// Context the feature hooks evaluate against: this console's client id
    /// and the configured tenant.
    pub fn feature_context(&self) -> FeatureContext<'_> {
        let values = self.config.values();
        FeatureContext {
            client_id: &values.client_id,
            tenant_domain: &values.tenant_domain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ApplicationTab;

    #[test]
    fn feature_context_carries_configured_identifiers() {
        let state = ConsoleState::new();
        let cx = state.feature_context();
        let values = state.config().values();
        assert_eq!(cx.client_id, values.client_id);
        assert_eq!(cx.tenant_domain, values.tenant_domain);

        // The context plugs straight into the hook surface.
        assert!(state.features().show_application_share(&cx));
        assert_eq!(
            state.features().tab_override(&cx, ApplicationTab::General),
            None
        );
    }
}
