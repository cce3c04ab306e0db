use url::Url;
use uuid::Uuid;

use crate::domain::entities::streams::OutputUrl;

/// Identity a load balancer checks before proxying an official output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackCredentials<'a> {
    pub subscriber_id: Uuid,
    pub password_hash: &'a str,
    pub device_id: Uuid,
}

/// Rewrites an HTTP(S) output into the load-balancer form
/// `http://{lb_host}/{subscriber}/{password}/{device}/{stream}/{output}/{basename}`.
///
/// Any other scheme, or a URI that does not parse, is returned unchanged.
pub fn secure_output_url(
    lb_host: &str,
    credentials: &PlaybackCredentials<'_>,
    stream_id: Uuid,
    output: &OutputUrl,
) -> String {
    let Ok(url) = Url::parse(&output.uri) else {
        return output.uri.clone();
    };
    if !matches!(url.scheme(), "http" | "https") {
        return output.uri.clone();
    }

    let basename = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    format!(
        "http://{}/{}/{}/{}/{}/{}/{}",
        lb_host,
        credentials.subscriber_id,
        credentials.password_hash,
        credentials.device_id,
        stream_id,
        output.id,
        basename
    )
}
