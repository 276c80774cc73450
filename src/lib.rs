//! MacLock post-auth hook: one JSON request in, one JSON response out.

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use maclock_core::config::AppConfig;
use maclock_core::types::auth::{PostAuthRequest, PostAuthResponse};
use maclock_service::Host;

/// Read a post-auth request from `input`, run it, and write the response
/// as one JSON line to `output`.
pub async fn run_hook<R, W>(
    config: AppConfig,
    mut input: R,
    mut output: W,
) -> anyhow::Result<PostAuthResponse>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut raw = String::new();
    input
        .read_to_string(&mut raw)
        .await
        .context("reading post-auth request")?;
    let request: PostAuthRequest =
        serde_json::from_str(&raw).context("parsing post-auth request")?;

    let host = Host::build(config).await.context("initializing host")?;
    host.start().await;

    let result = host.post_auth.post_auth(request).await;
    host.shutdown().await;
    let response = result.context("running post-auth")?;

    let mut encoded = serde_json::to_vec(&response).context("encoding post-auth response")?;
    encoded.push(b'\n');
    output
        .write_all(&encoded)
        .await
        .context("writing post-auth response")?;
    output.flush().await.context("writing post-auth response")?;

    Ok(response)
}
