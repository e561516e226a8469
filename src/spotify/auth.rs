use reqwest::{StatusCode, Url};

use crate::{
    debug,
    error::{Error, Result},
    types::{SpotifyConfig, TokenErrorResponse, TokenResponse},
};

use super::{Endpoints, SpotifyClient};

impl SpotifyClient {
    /// Makes sure `cred` carries an access token.
    ///
    /// A stored access token is reused as is; nothing is sent. Otherwise the
    /// one-time authorization code is exchanged for a token pair
    /// (`grant_type=authorization_code`) and both tokens are written back
    /// into `cred`.
    ///
    /// # Errors
    ///
    /// `Error::Auth` when no authorization code is stored, when the token
    /// request does not get through, or when its body is not a token pair.
    pub fn ensure_token(&self, cred: &mut SpotifyConfig) -> Result<()> {
        if !cred.access_token.is_empty() {
            debug!("Reusing stored access token");
            return Ok(());
        }

        if cred.authorization_code.is_empty() {
            return Err(Error::auth(
                "no access token stored and no authorization code to mint one. Run spotstatus authorize",
            ));
        }

        debug!("No access token stored, minting one from the authorization code");
        let token = self.request_token(
            cred,
            &[
                ("grant_type", "authorization_code"),
                ("code", cred.authorization_code.as_str()),
                ("redirect_uri", self.endpoints.redirect_uri.as_str()),
            ],
        )?;

        cred.access_token = token.access_token;
        cred.refresh_token = token.refresh_token.unwrap_or_default();
        Ok(())
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// The access token is always overwritten. The refresh token is only
    /// replaced when the reply carries a new, non-empty one; providers leave it
    /// out while the old one stays valid.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SpotifyClient::ensure_token`], plus a missing
    /// refresh token.
    pub fn refresh(&self, cred: &mut SpotifyConfig) -> Result<()> {
        if cred.refresh_token.is_empty() {
            return Err(Error::auth("no refresh token stored. Run spotstatus authorize"));
        }

        let token = self.request_token(
            cred,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", cred.refresh_token.as_str()),
            ],
        )?;
        debug!("Refreshed access token");

        cred.access_token = token.access_token;
        if let Some(refresh_token) = token.refresh_token.filter(|t| !t.is_empty()) {
            cred.refresh_token = refresh_token;
            debug!("Provider rotated the refresh token");
        }
        Ok(())
    }

    fn request_token(&self, cred: &SpotifyConfig, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .http
            .post(&self.endpoints.token_url)
            .basic_auth(&cred.client_id, Some(&cred.client_secret))
            .form(form)
            .send()
            .map_err(|e| Error::auth(format!("token request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::auth(format!("cannot read token response: {e}")))?;

        parse_token_response(status, &body)
    }
}

impl Endpoints {
    /// Builds the authorization page URL a user visits to grant access.
    ///
    /// `state` is echoed back on the redirect and must be checked by whoever
    /// receives the code.
    pub fn authorize_url(&self, client_id: &str, state: &str) -> Result<String> {
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", client_id),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| Error::config(format!("invalid authorization URL: {e}")))?;
        Ok(url.into())
    }
}

/// Decodes a token endpoint reply.
///
/// A non-2xx status is an `Error::Auth` whatever the body holds; when the
/// provider sent an OAuth error body, its code and description end up in the
/// message. A 2xx body without a non-empty access token is rejected too.
pub fn parse_token_response(status: StatusCode, body: &str) -> Result<TokenResponse> {
    if !status.is_success() {
        return Err(match serde_json::from_str::<TokenErrorResponse>(body) {
            Ok(rejection) => Error::auth(format!(
                "token endpoint rejected the request ({status}): {}{}",
                rejection.error,
                rejection
                    .error_description
                    .map(|d| format!(" ({d})"))
                    .unwrap_or_default()
            )),
            Err(_) => Error::auth(format!("token endpoint answered {status}")),
        });
    }

    match serde_json::from_str::<TokenResponse>(body) {
        Ok(token) if !token.access_token.is_empty() => Ok(token),
        Ok(_) => Err(Error::auth(format!(
            "token endpoint returned an empty access token ({status})"
        ))),
        Err(err) => Err(Error::auth(format!(
            "cannot decode token response ({status}): {err}"
        ))),
    }
}
