//! Raw calls against the OAuth token endpoint, plus the consent URL builder.

use reqwest::Url;
use tubelens_core::OAuthConfig;

use crate::client::{decode_json, error_detail, YoutubeClient};
use crate::error::{is_transient_status, FetchStage, YoutubeError};
use crate::types::{ChannelListResponse, TokenGrant};

/// Builds the consent-screen URL the user is sent to.
///
/// Always requests offline access with a forced consent prompt so that the
/// grant carries a refresh token even for a previously authorized account.
///
/// # Errors
///
/// Returns [`YoutubeError::InvalidBaseUrl`] if `config.auth_url` is not a
/// valid URL.
pub fn authorize_url(
    config: &OAuthConfig,
    redirect_uri: Option<&str>,
    state: Option<&str>,
) -> Result<Url, YoutubeError> {
    let mut url = Url::parse(&config.auth_url).map_err(|e| YoutubeError::InvalidBaseUrl {
        url: config.auth_url.clone(),
        reason: e.to_string(),
    })?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("client_id", &config.client_id);
        pairs.append_pair("redirect_uri", redirect_uri.unwrap_or(&config.redirect_uri));
        pairs.append_pair("response_type", "code");
        pairs.append_pair("scope", &config.scope_param());
        pairs.append_pair("access_type", "offline");
        pairs.append_pair("prompt", "consent");
        if let Some(state) = state {
            pairs.append_pair("state", state);
        }
    }
    Ok(url)
}

/// Which grant a token-endpoint call was for. Decides how a rejection is
/// classified.
#[derive(Debug, Clone, Copy)]
enum Grant {
    AuthorizationCode,
    RefreshToken,
}

impl YoutubeClient {
    /// Trades an authorization code for a token grant.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::AuthExchangeFailed`] if the endpoint answers non-2xx.
    /// - [`YoutubeError::Http`] on network failure.
    /// - [`YoutubeError::Deserialize`] if the grant body is malformed.
    pub async fn exchange_code(
        &self,
        config: &OAuthConfig,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenGrant, YoutubeError> {
        let form = [
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];
        self.post_token_form(&form, Grant::AuthorizationCode).await
    }

    /// Mints a new access token from a stored refresh token.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::RefreshRejected`] if the endpoint answers 4xx other
    ///   than 429.
    /// - [`YoutubeError::UpstreamFetchFailed`] with [`FetchStage::TokenRefresh`]
    ///   on 429 or 5xx.
    /// - [`YoutubeError::Http`] on network failure.
    /// - [`YoutubeError::Deserialize`] if the grant body is malformed.
    pub async fn refresh_access_token(
        &self,
        config: &OAuthConfig,
        refresh_token: &str,
    ) -> Result<TokenGrant, YoutubeError> {
        let form = [
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("grant_type", "refresh_token"),
        ];
        self.post_token_form(&form, Grant::RefreshToken).await
    }

    /// Resolves the channel id owned by the account behind `access_token`.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::UpstreamFetchFailed`] with
    ///   [`FetchStage::ChannelLookup`] on a non-2xx response.
    /// - [`YoutubeError::NoChannelFound`] if the account has no channel.
    pub async fn owned_channel_id(&self, access_token: &str) -> Result<String, YoutubeError> {
        let url = self.data_url("channels", &[("part", "id"), ("mine", "true")]);
        let response: ChannelListResponse = self
            .get_json(&url, access_token, FetchStage::ChannelLookup)
            .await?;

        response
            .items
            .into_iter()
            .next()
            .map(|item| item.id)
            .ok_or(YoutubeError::NoChannelFound)
    }

    async fn post_token_form(
        &self,
        form: &[(&str, &str)],
        grant: Grant,
    ) -> Result<TokenGrant, YoutubeError> {
        let response = self
            .http()
            .post(self.token_url().clone())
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response).await;
            let status = status.as_u16();
            tracing::warn!(?grant, status, %detail, "token endpoint rejected grant");
            return Err(match grant {
                Grant::AuthorizationCode => YoutubeError::AuthExchangeFailed { status, detail },
                Grant::RefreshToken if is_transient_status(status) => {
                    YoutubeError::UpstreamFetchFailed {
                        stage: FetchStage::TokenRefresh,
                        status,
                        detail,
                    }
                }
                Grant::RefreshToken => YoutubeError::RefreshRejected { status, detail },
            });
        }

        decode_json(response, "token grant").await
    }
}
