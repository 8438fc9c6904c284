use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use std::convert::Infallible;
use std::net::SocketAddr;

#[derive(Clone, Debug)]
pub struct ClientIp(pub Option<String>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(value) = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|it| it.to_str().ok())
        {
            return Ok(ClientIp(Some(
                value
                    .split(',')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
            )));
        }
        if let Some(value) = parts
            .headers
            .get("x-real-ip")
            .and_then(|it| it.to_str().ok())
        {
            return Ok(ClientIp(Some(value.to_string())));
        }
        if let Ok(ConnectInfo(addr)) =
            ConnectInfo::<SocketAddr>::from_request_parts(parts, state).await
        {
            return Ok(ClientIp(Some(addr.ip().to_string())));
        }

        Ok(ClientIp(None))
    }
}
