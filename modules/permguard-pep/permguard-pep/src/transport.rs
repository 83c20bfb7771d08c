//! Transport seam between the client facade and the PDP.
//!
//! [`GrpcTransport`] talks to a real PDP over tonic; tests and embedders can
//! supply any other [`PdpTransport`].

use std::time::Duration;

use async_trait::async_trait;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tracing::Instrument;

use permguard_pep_sdk::{TransportError, TransportErrorKind};

use crate::config::PdpClientConfig;
use crate::wire::{
    AUTHORIZATION_CHECK_PATH, AuthorizationCheckRequest, AuthorizationCheckResponse, SERVICE_NAME,
};

/// A session able to carry one authorization check at a time per call.
#[async_trait]
pub trait PdpTransport: Send + Sync {
    /// Send one request and wait for the PDP reply.
    ///
    /// # Errors
    ///
    /// Any failure to deliver the request or receive a reply.
    async fn authorization_check(
        &self,
        request: AuthorizationCheckRequest,
    ) -> Result<AuthorizationCheckResponse, TransportError>;
}

fn duration_to_u64_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Map a gRPC status onto the transport error taxonomy.
#[must_use]
pub fn status_to_error(status: tonic::Status) -> TransportError {
    let kind = match status.code() {
        tonic::Code::Unavailable => TransportErrorKind::Unavailable,
        tonic::Code::DeadlineExceeded => TransportErrorKind::DeadlineExceeded,
        tonic::Code::Cancelled => TransportErrorKind::Cancelled,
        _ => TransportErrorKind::Protocol,
    };
    TransportError::new(kind, status.message().to_owned()).with_source(status)
}

/// gRPC transport over a tonic [`Channel`].
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    inner: tonic::client::Grpc<Channel>,
}

impl GrpcTransport {
    /// Wrap an already established channel.
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    /// Connect to the PDP described by `config`, retrying the connection
    /// with linear backoff up to `connect_retries` times.
    ///
    /// # Errors
    ///
    /// [`TransportErrorKind::Connect`] if the endpoint is invalid or every
    /// attempt failed.
    pub async fn connect(config: &PdpClientConfig) -> Result<Self, TransportError> {
        let uri = config.endpoint_uri();
        let endpoint = build_endpoint(&uri, config)?;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let span = tracing::debug_span!("pdp_connect", uri = %uri, attempt);

            match endpoint.connect().instrument(span).await {
                Ok(channel) => {
                    tracing::info!(
                        uri = %uri,
                        attempt,
                        connect_timeout_ms = duration_to_u64_ms(config.connect_timeout),
                        rpc_timeout_ms = duration_to_u64_ms(config.rpc_timeout),
                        "connected to policy decision point"
                    );
                    return Ok(Self::new(channel));
                }
                Err(e) if attempt <= config.connect_retries => {
                    let backoff = backoff_delay(config, attempt);
                    tracing::warn!(
                        uri = %uri,
                        attempt,
                        max_retries = config.connect_retries,
                        error = %e,
                        backoff_ms = duration_to_u64_ms(backoff),
                        "PDP connection failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    tracing::error!(
                        uri = %uri,
                        attempt,
                        error = %e,
                        "PDP connection failed after all retries"
                    );
                    return Err(TransportError::new(
                        TransportErrorKind::Connect,
                        format!("failed to connect to {uri} after {attempt} attempts"),
                    )
                    .with_source(e));
                }
            }
        }
    }
}

/// Linear backoff before retry `attempt`, capped at `max_backoff`.
fn backoff_delay(config: &PdpClientConfig, attempt: u32) -> Duration {
    config
        .base_backoff
        .checked_mul(attempt)
        .unwrap_or(config.max_backoff)
        .min(config.max_backoff)
}

/// Build the tonic endpoint with timeouts, keepalive and optional TLS.
fn build_endpoint(uri: &str, config: &PdpClientConfig) -> Result<Endpoint, TransportError> {
    let connect_error = |e: tonic::transport::Error| {
        TransportError::new(
            TransportErrorKind::Connect,
            format!("invalid PDP endpoint {uri}"),
        )
        .with_source(e)
    };

    let mut endpoint = Endpoint::from_shared(uri.to_owned())
        .map_err(connect_error)?
        .connect_timeout(config.connect_timeout)
        .timeout(config.rpc_timeout)
        .tcp_keepalive(Some(Duration::from_secs(30)))
        .http2_keep_alive_interval(Duration::from_secs(30))
        .keep_alive_timeout(Duration::from_secs(10))
        .keep_alive_while_idle(true);

    if config.use_tls {
        endpoint = endpoint
            .tls_config(
                ClientTlsConfig::new()
                    .domain_name(config.host.clone())
                    .with_native_roots(),
            )
            .map_err(connect_error)?;
    }

    Ok(endpoint)
}

#[async_trait]
impl PdpTransport for GrpcTransport {
    async fn authorization_check(
        &self,
        request: AuthorizationCheckRequest,
    ) -> Result<AuthorizationCheckResponse, TransportError> {
        let mut grpc = self.inner.clone();
        grpc.ready().await.map_err(|e| {
            let e: tonic::codegen::StdError = e.into();
            TransportError::new(
                TransportErrorKind::Unavailable,
                format!("service was not ready: {e}"),
            )
            .with_source(e)
        })?;

        let mut request = tonic::Request::new(request);
        request
            .extensions_mut()
            .insert(tonic::GrpcMethod::new(SERVICE_NAME, "AuthorizationCheck"));

        grpc.unary(
            request,
            PathAndQuery::from_static(AUTHORIZATION_CHECK_PATH),
            tonic_prost::ProstCodec::default(),
        )
        .await
        .map(tonic::Response::into_inner)
        .map_err(status_to_error)
    }
}
