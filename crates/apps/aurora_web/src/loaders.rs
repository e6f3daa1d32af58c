//! Network loaders for the globe's assets.
//!
//! Each loader runs as a future spawned off the frame path and delivers one
//! outcome through a [`Completer`]; the view drains it at the next frame.

use std::future::Future;

use formats::texture::{EquirectTexture, TextureError};
use gloo_net::http::Request;
use gpu::uniforms::TextureSlot;
use layers::borders::{BoundarySource, FetchError};
use layers::surface::SurfaceTextures;
use runtime::lifecycle::Completer;
use tracing::{debug, error, info};

use crate::config::TextureUrls;

pub type TextureOutcome = Result<SurfaceTextures, TextureLoadError>;

#[derive(Debug, Clone, PartialEq)]
pub enum TextureLoadError {
    Fetch { slot: TextureSlot, error: FetchError },
    Decode { slot: TextureSlot, error: TextureError },
}

impl std::fmt::Display for TextureLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureLoadError::Fetch { slot, error } => {
                write!(f, "{slot:?} texture fetch failed: {error}")
            }
            TextureLoadError::Decode { slot, error } => {
                write!(f, "{slot:?} texture could not be decoded: {error}")
            }
        }
    }
}

impl std::error::Error for TextureLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureLoadError::Fetch { error, .. } => Some(error),
            TextureLoadError::Decode { error, .. } => Some(error),
        }
    }
}

/// Fetches binary assets by URL.
pub trait BinarySource {
    fn fetch_bytes(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>>;
}

async fn fetch_texture<S: BinarySource>(
    source: &S,
    slot: TextureSlot,
    url: &str,
) -> Result<EquirectTexture, TextureLoadError> {
    let bytes = source
        .fetch_bytes(url)
        .await
        .map_err(|error| TextureLoadError::Fetch { slot, error })?;
    let texture =
        EquirectTexture::decode(&bytes).map_err(|error| TextureLoadError::Decode { slot, error })?;
    debug!(
        ?slot,
        width = texture.width(),
        height = texture.height(),
        "texture decoded"
    );
    Ok(texture)
}

/// Fetches and decodes all three surface textures. The first failure aborts
/// the load.
pub async fn fetch_surface_textures<S: BinarySource>(
    source: &S,
    urls: &TextureUrls,
) -> TextureOutcome {
    Ok(SurfaceTextures {
        day: fetch_texture(source, TextureSlot::Day, &urls.day).await?,
        water: fetch_texture(source, TextureSlot::Water, &urls.water).await?,
        night: fetch_texture(source, TextureSlot::Night, &urls.night).await?,
    })
}

/// Loads the surface textures and delivers the outcome. Returns `false` if
/// the view was torn down first.
pub async fn load_textures<S: BinarySource>(
    source: &S,
    urls: &TextureUrls,
    completer: Completer<TextureOutcome>,
) -> bool {
    if completer.is_cancelled() {
        debug!("texture load skipped; view already torn down");
        return false;
    }
    let outcome = fetch_surface_textures(source, urls).await;
    match &outcome {
        Ok(_) => info!("surface textures ready"),
        Err(e) => error!(error = %e, "surface textures unavailable"),
    }
    completer.complete(outcome)
}

/// Browser `fetch` through gloo-net.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpClient;

impl HttpClient {
    async fn get(&self, url: &str) -> Result<gloo_net::http::Response, FetchError> {
        let resp = Request::get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        if !resp.ok() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status(),
            });
        }
        Ok(resp)
    }
}

impl BinarySource for HttpClient {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.get(url)
            .await?
            .binary()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))
    }
}

/// The border dataset at a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpBoundarySource {
    client: HttpClient,
    url: String,
}

impl HttpBoundarySource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: HttpClient,
            url: url.into(),
        }
    }
}

impl BoundarySource for HttpBoundarySource {
    async fn fetch(&self) -> Result<String, FetchError> {
        self.client
            .get(&self.url)
            .await?
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{BinarySource, TextureLoadError, TextureOutcome, load_textures};
    use crate::config::TextureUrls;
    use formats::texture::TextureError;
    use gpu::uniforms::TextureSlot;
    use layers::borders::FetchError;
    use runtime::lifecycle::handoff;
    use std::collections::HashMap;
    use std::io::Cursor;

    struct MapSource(HashMap<String, Vec<u8>>);

    impl BinarySource for MapSource {
        async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.0.get(url).cloned().ok_or(FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn urls() -> TextureUrls {
        TextureUrls {
            day: "day.png".into(),
            water: "water.png".into(),
            night: "night.png".into(),
        }
    }

    #[test]
    fn loads_all_three_textures() {
        let source = MapSource(HashMap::from([
            ("day.png".to_string(), png(4, 2)),
            ("water.png".to_string(), png(4, 2)),
            ("night.png".to_string(), png(8, 4)),
        ]));
        let (completer, pending) = handoff::<TextureOutcome>("textures");
        assert!(pollster::block_on(load_textures(&source, &urls(), completer)));
        let textures = pending.take().unwrap().unwrap();
        assert_eq!(textures.night.width(), 8);
        assert_eq!(textures.day.height(), 2);
    }

    #[test]
    fn first_failure_names_the_slot() {
        let source = MapSource(HashMap::from([
            ("day.png".to_string(), png(4, 2)),
            ("water.png".to_string(), b"not an image".to_vec()),
        ]));
        let (completer, pending) = handoff::<TextureOutcome>("textures");
        pollster::block_on(load_textures(&source, &urls(), completer));
        match pending.take().unwrap() {
            Err(TextureLoadError::Decode {
                slot: TextureSlot::Water,
                error: TextureError::Decode(_),
            }) => {}
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn torn_down_view_skips_the_load() {
        let source = MapSource(HashMap::new());
        let (completer, pending) = handoff::<TextureOutcome>("textures");
        drop(pending);
        assert!(!pollster::block_on(load_textures(&source, &urls(), completer)));
    }
}
