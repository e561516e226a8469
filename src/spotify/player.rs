use reqwest::StatusCode;

use crate::{
    debug,
    error::{Error, Result},
    types::{CurrentlyPlayingResponse, NowPlaying, SpotifyConfig},
    warning,
};

use super::SpotifyClient;

/// How a currently-playing status code is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 200: the body names the track.
    Playing,
    /// 204: nothing is playing.
    NotPlaying,
    /// 401: the access token was rejected.
    Unauthorized,
    /// Anything else.
    Unrecognized,
}

pub fn classify(status: StatusCode) -> Disposition {
    match status {
        StatusCode::OK => Disposition::Playing,
        StatusCode::NO_CONTENT => Disposition::NotPlaying,
        StatusCode::UNAUTHORIZED => Disposition::Unauthorized,
        _ => Disposition::Unrecognized,
    }
}

/// Outcome reported for a status `classify` does not recognize.
///
/// Rate limits and server errors currently end up as "not playing". They are
/// logged apart from a confirmed 204.
pub fn unrecognized_status(status: StatusCode) -> Result<NowPlaying> {
    warning!(
        "Currently-playing endpoint answered {}; reporting not playing",
        status
    );
    Ok(NowPlaying::NotPlaying)
}

enum Fetched {
    Done(NowPlaying),
    Unauthorized,
}

impl SpotifyClient {
    /// Returns the track currently playing for the owner of `cred`.
    ///
    /// Mints a token first when none is stored. A 401 triggers exactly one
    /// refresh and one retry; a second 401 is an `Error::Auth` rather than
    /// another refresh. `cred` keeps any minted or refreshed tokens, so the
    /// caller can persist them.
    ///
    /// # Example
    ///
    /// ```
    /// let spotify = SpotifyClient::from_env()?;
    /// match spotify.get_now_playing(&mut config.spotify)? {
    ///     NowPlaying::Playing { title, artist } => println!("{title} by {artist}"),
    ///     NowPlaying::NotPlaying => println!("silence"),
    /// }
    /// ```
    pub fn get_now_playing(&self, cred: &mut SpotifyConfig) -> Result<NowPlaying> {
        self.ensure_token(cred)?;

        match self.fetch_currently_playing(&cred.access_token)? {
            Fetched::Done(now_playing) => Ok(now_playing),
            Fetched::Unauthorized => {
                debug!("Access token rejected, refreshing and retrying once");
                self.refresh(cred)?;

                match self.fetch_currently_playing(&cred.access_token)? {
                    Fetched::Done(now_playing) => Ok(now_playing),
                    Fetched::Unauthorized => Err(Error::auth(
                        "currently-playing endpoint rejected the refreshed access token",
                    )),
                }
            }
        }
    }

    fn fetch_currently_playing(&self, token: &str) -> Result<Fetched> {
        let response = self
            .http
            .get(self.endpoints.currently_playing_url())
            .bearer_auth(token)
            .send()?;

        let status = response.status();
        debug!("Currently-playing endpoint answered {}", status);

        match classify(status) {
            Disposition::Playing => {
                let body = response.text()?;
                parse_currently_playing(&body).map(Fetched::Done)
            }
            Disposition::NotPlaying => Ok(Fetched::Done(NowPlaying::NotPlaying)),
            Disposition::Unauthorized => Ok(Fetched::Unauthorized),
            Disposition::Unrecognized => unrecognized_status(status).map(Fetched::Done),
        }
    }
}

/// Decodes a 200 currently-playing body into track title and first artist.
///
/// # Errors
///
/// `Error::Decode` when the body is not JSON, has no `item`, or the item
/// lists no artist.
pub fn parse_currently_playing(body: &str) -> Result<NowPlaying> {
    let response: CurrentlyPlayingResponse =
        serde_json::from_str(body).map_err(|e| Error::decode(e.to_string()))?;

    let item = response
        .item
        .ok_or_else(|| Error::decode("response has no item"))?;
    let artist = item
        .artists
        .into_iter()
        .next()
        .ok_or_else(|| Error::decode("item lists no artist"))?;

    Ok(NowPlaying::Playing {
        title: item.name,
        artist: artist.name,
    })
}
