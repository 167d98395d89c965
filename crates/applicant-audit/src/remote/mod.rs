//! Client side of the economic-validation service.
//!
//! The transport is deliberately thin: one framed request, one framed
//! response, a per-call deadline from configuration. Transport failures,
//! application-level rejections, and malformed frames are distinct failure
//! kinds so that no outage can masquerade as a clean verdict.

pub mod wire;

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::EconConfig;
pub use wire::{ValidationRequest, ValidationVerdict};

/// Capability to obtain per-attribute verdicts for an applicant.
pub trait RemoteValidator: Send + Sync {
    fn validate(
        &self,
        request: ValidationRequest,
    ) -> impl Future<Output = Result<ValidationVerdict, RemoteValidationError>> + Send;
}

/// Failure kinds of a remote validation call. None of these is ever folded
/// into a business verdict; the aggregator degrades instead.
#[derive(Debug, thiserror::Error)]
pub enum RemoteValidationError {
    #[error("validation service unreachable: {0}")]
    Unavailable(#[from] io::Error),
    #[error("validation service sent a malformed response: {0}")]
    Malformed(#[from] wire::WireError),
    #[error("validation service rejected the request (status {0:#04x})")]
    Rejected(u8),
}

/// TCP client for the validation service speaking the frozen v1 protocol.
#[derive(Debug, Clone)]
pub struct EconClient {
    endpoint: String,
    timeout: Duration,
}

impl EconClient {
    pub fn new(config: &EconConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            timeout: config.timeout,
        }
    }

    async fn exchange(&self, frame: Vec<u8>) -> Result<Vec<u8>, RemoteValidationError> {
        let mut stream = TcpStream::connect(&self.endpoint).await?;
        stream.write_all(&frame).await?;

        let mut len_bytes = [0u8; 4];
        stream.read_exact(&mut len_bytes).await?;
        let len = u32::from_be_bytes(len_bytes) as usize;
        if len > wire::MAX_FRAME_LEN {
            return Err(wire::WireError::Oversized { len }.into());
        }

        let mut body = vec![0u8; len];
        stream.read_exact(&mut body).await?;
        Ok(body)
    }
}

impl RemoteValidator for EconClient {
    fn validate(
        &self,
        request: ValidationRequest,
    ) -> impl Future<Output = Result<ValidationVerdict, RemoteValidationError>> + Send {
        async move {
            let frame = wire::encode_request(&request);
            let body = tokio::time::timeout(self.timeout, self.exchange(frame))
                .await
                .map_err(|_| {
                    RemoteValidationError::Unavailable(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("no response within {:?}", self.timeout),
                    ))
                })??;

            let (status, verdict) = wire::decode_response(&body)?;
            if status != wire::STATUS_OK {
                return Err(RemoteValidationError::Rejected(status));
            }
            Ok(verdict)
        }
    }
}
