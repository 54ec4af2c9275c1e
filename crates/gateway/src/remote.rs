use log::{debug, warn};
use repvoice_domain::{GatewayError, TextGenerator};

use crate::{Provider, ProviderConfig, SendRequest};

/// [`TextGenerator`] backed by a remote HTTP endpoint.
pub struct RemoteGenerator<S> {
    sender: S,
    provider: Box<dyn Provider>,
}

impl<S: SendRequest> RemoteGenerator<S> {
    pub fn new(sender: S, config: &ProviderConfig) -> Self {
        debug!("using {} provider at {}", config.kind(), config.endpoint);
        Self {
            sender,
            provider: config.provider(),
        }
    }
}

impl<S: SendRequest> TextGenerator for RemoteGenerator<S> {
    async fn generate(&self, instructions: &str, message: &str) -> Result<String, GatewayError> {
        let request = self.provider.build_request(instructions, message);
        let response = self.sender.send_request(request).await?;

        if !response.is_success() {
            warn!("generation endpoint returned status {}", response.status);
            return Err(GatewayError::Status {
                status: response.status,
                body: response.body,
            });
        }

        self.provider.extract_text(&response.body)
    }
}
