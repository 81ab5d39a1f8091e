//! Backend selection and fallback
//!
//! The selector owns the routing decision: prefer the local backend when the
//! request asks for it and the backend is available, fall back to the remote
//! API exactly once on local failure, and record metrics for the call that
//! actually completed.

use gate_core::{BackendKind, InferenceRequest, InferenceResult};
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::Backend;
use crate::metrics::GatewayMetrics;
use crate::{GatewayError, Result};

/// Routes each request to the local or API backend
pub struct BackendSelector {
    local: Arc<dyn Backend>,
    api: Arc<dyn Backend>,
    metrics: Arc<GatewayMetrics>,
}

impl BackendSelector {
    /// Create a selector over the two backends
    pub fn new(
        local: Arc<dyn Backend>,
        api: Arc<dyn Backend>,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self {
            local,
            api,
            metrics,
        }
    }

    /// Serve one request, applying the local-first fallback policy
    ///
    /// On success exactly one of the per-backend counters increments, and the
    /// total and cumulative-time counters increment once, even when the local
    /// attempt failed and the API served the call.
    pub async fn generate(&self, request: &InferenceRequest) -> Result<InferenceResult> {
        let result = if request.use_local && self.local.is_available() {
            match self.local.generate(request).await {
                Ok(result) => {
                    info!("Served request with local backend");
                    result
                }
                Err(e) => {
                    // One fallback attempt, no retry loop; the local failure
                    // surfaces only through this log line.
                    warn!("Local inference failed, falling back to API: {}", e);
                    self.api.generate(request).await.map_err(|e| {
                        GatewayError::ServiceUnavailable(format!(
                            "all inference backends failed: {}",
                            e
                        ))
                    })?
                }
            }
        } else {
            let result = self.api.generate(request).await.map_err(|e| {
                GatewayError::ServiceUnavailable(format!("API inference failed: {}", e))
            })?;
            info!("Served request with API backend");
            result
        };

        match result.backend {
            BackendKind::Local => self.metrics.record_local(result.elapsed_ms),
            BackendKind::Api => self.metrics.record_api(result.elapsed_ms),
        }

        Ok(result)
    }

    /// Metrics shared with the HTTP surface
    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        self.metrics.clone()
    }
}
