//! Seasonal background music.
//!
//! [`AudioController`] owns at most one [`PlaybackHandle`] at a time and never
//! lets an error escape: every failure is logged and the user gets silence.

use crate::config::TrackTable;
use crate::season::Season;
use async_trait::async_trait;
use futures::StreamExt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fixed playback volume for background tracks.
pub const MUSIC_VOLUME: f32 = 0.3;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to fetch track {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("track {url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("audio device error: {0}")]
    Device(String),

    #[error("no track is loaded")]
    NotLoaded,
}

/// How playback should behave relative to the rest of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackPolicy {
    pub plays_in_silent_mode: bool,
    pub stays_active_in_background: bool,
    pub ducks_other_audio: bool,
}

impl Default for PlaybackPolicy {
    fn default() -> Self {
        PlaybackPolicy {
            plays_in_silent_mode: true,
            stays_active_in_background: true,
            ducks_other_audio: true,
        }
    }
}

/// The device side of playback: applies the session policy and loads tracks.
#[async_trait]
pub trait PlaybackBackend: Send + Sync {
    async fn configure(&self, policy: PlaybackPolicy) -> Result<(), AudioError>;

    async fn load(&self, url: &str) -> Result<Box<dyn PlaybackHandle>, AudioError>;
}

/// One loaded track.
#[async_trait]
pub trait PlaybackHandle: Send {
    async fn set_looping(&mut self, looping: bool) -> Result<(), AudioError>;
    async fn set_volume(&mut self, volume: f32) -> Result<(), AudioError>;
    async fn play(&mut self) -> Result<(), AudioError>;
    async fn pause(&mut self) -> Result<(), AudioError>;
    async fn stop(&mut self) -> Result<(), AudioError>;
    async fn unload(&mut self) -> Result<(), AudioError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioState {
    Uninitialized,
    Ready,
    Playing,
    Stopped,
}

pub struct AudioController {
    backend: Box<dyn PlaybackBackend>,
    tracks: TrackTable,
    handle: Option<Box<dyn PlaybackHandle>>,
    state: AudioState,
    season: Option<Season>,
}

impl AudioController {
    pub fn new(backend: Box<dyn PlaybackBackend>, tracks: TrackTable) -> Self {
        AudioController {
            backend,
            tracks,
            handle: None,
            state: AudioState::Uninitialized,
            season: None,
        }
    }

    pub fn state(&self) -> AudioState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == AudioState::Playing
    }

    /// Season of the currently loaded track, if any.
    pub fn loaded_season(&self) -> Option<Season> {
        self.handle.as_ref().and(self.season)
    }

    pub async fn initialize(&mut self) {
        if let Err(e) = self.backend.configure(PlaybackPolicy::default()).await {
            warn!(error = %e, "could not apply playback policy, continuing without it");
        }
        if self.state == AudioState::Uninitialized {
            self.state = AudioState::Ready;
        }
    }

    pub async fn play_seasonal_music(&mut self, season: Season) {
        if self.state == AudioState::Uninitialized {
            warn!(%season, "audio controller is not initialized, ignoring play request");
            return;
        }

        if let Some(mut old) = self.handle.take() {
            if let Err(e) = old.unload().await {
                warn!(error = %e, "failed to unload previous track");
                self.handle = Some(old);
                return;
            }
            // The old track is gone; whatever happens next, nothing is loaded.
            self.state = AudioState::Ready;
            self.season = None;
        }

        let url = self.tracks.url_for(season).to_string();
        match self.start_track(&url).await {
            Ok(handle) => {
                info!(%season, %url, "playing seasonal music");
                self.handle = Some(handle);
                self.season = Some(season);
                self.state = AudioState::Playing;
            }
            Err(e) => warn!(%season, error = %e, "error playing seasonal music"),
        }
    }

    async fn start_track(&self, url: &str) -> Result<Box<dyn PlaybackHandle>, AudioError> {
        let mut handle = self.backend.load(url).await?;
        let started = async {
            handle.set_looping(true).await?;
            handle.set_volume(MUSIC_VOLUME).await?;
            handle.play().await
        }
        .await;
        if let Err(e) = started {
            if let Err(unload_err) = handle.unload().await {
                debug!(error = %unload_err, "failed to release half-started track");
            }
            return Err(e);
        }
        Ok(handle)
    }

    pub async fn stop_music(&mut self) {
        if self.state != AudioState::Playing {
            return;
        }
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        match handle.stop().await {
            Ok(()) => self.state = AudioState::Stopped,
            Err(e) => warn!(error = %e, "error stopping music"),
        }
    }

    /// Pauses a playing track or resumes a stopped one.
    pub async fn toggle_music(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        let result = match self.state {
            AudioState::Playing => handle.pause().await.map(|_| AudioState::Stopped),
            AudioState::Stopped => handle.play().await.map(|_| AudioState::Playing),
            _ => return,
        };
        match result {
            Ok(next) => self.state = next,
            Err(e) => warn!(error = %e, "error toggling music"),
        }
    }

    pub async fn cleanup(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            if let Err(e) = handle.unload().await {
                warn!(error = %e, "error cleaning up audio");
                self.handle = Some(handle);
                return;
            }
        }
        self.season = None;
        self.state = AudioState::Uninitialized;
    }
}

/// Fetches tracks over HTTP and keeps them in memory.
///
/// Decoding and device output sit behind the platform's audio stack; this
/// backend owns the network side and the transport state of the handle.
pub struct HttpStreamBackend {
    client: reqwest::Client,
}

impl HttpStreamBackend {
    pub fn new(client: reqwest::Client) -> Self {
        HttpStreamBackend { client }
    }
}

#[async_trait]
impl PlaybackBackend for HttpStreamBackend {
    async fn configure(&self, policy: PlaybackPolicy) -> Result<(), AudioError> {
        debug!(?policy, "playback policy applied");
        Ok(())
    }

    async fn load(&self, url: &str) -> Result<Box<dyn PlaybackHandle>, AudioError> {
        let fetch_err = |source| AudioError::Fetch {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(fetch_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AudioError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut data = Vec::new();
        let mut stream = Box::pin(response.bytes_stream());
        while let Some(chunk) = stream.next().await {
            data.extend_from_slice(&chunk.map_err(fetch_err)?);
        }
        debug!(url, bytes = data.len(), "track buffered");

        Ok(Box::new(BufferedTrack {
            data: Some(data),
            looping: false,
            volume: 1.0,
            playing: false,
        }))
    }
}

struct BufferedTrack {
    data: Option<Vec<u8>>,
    looping: bool,
    volume: f32,
    playing: bool,
}

impl BufferedTrack {
    fn loaded(&self) -> Result<(), AudioError> {
        self.data.as_ref().map(|_| ()).ok_or(AudioError::NotLoaded)
    }
}

#[async_trait]
impl PlaybackHandle for BufferedTrack {
    async fn set_looping(&mut self, looping: bool) -> Result<(), AudioError> {
        self.loaded()?;
        self.looping = looping;
        Ok(())
    }

    async fn set_volume(&mut self, volume: f32) -> Result<(), AudioError> {
        self.loaded()?;
        if !(0.0..=1.0).contains(&volume) {
            return Err(AudioError::Device(format!("volume {volume} out of range")));
        }
        self.volume = volume;
        Ok(())
    }

    async fn play(&mut self) -> Result<(), AudioError> {
        self.loaded()?;
        self.playing = true;
        debug!(looping = self.looping, volume = self.volume, "track started");
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), AudioError> {
        self.loaded()?;
        self.playing = false;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), AudioError> {
        self.pause().await
    }

    async fn unload(&mut self) -> Result<(), AudioError> {
        self.playing = false;
        self.data = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Script {
        calls: Vec<String>,
        fail_configure: bool,
        fail_load: bool,
        fail_stop: bool,
        fail_unload: bool,
    }

    #[derive(Clone, Default)]
    struct MockBackend(Arc<Mutex<Script>>);

    impl MockBackend {
        fn calls(&self) -> Vec<String> {
            self.0.lock().unwrap().calls.clone()
        }

        fn record(&self, call: String) {
            self.0.lock().unwrap().calls.push(call);
        }
    }

    struct MockHandle {
        url: String,
        backend: MockBackend,
    }

    #[async_trait]
    impl PlaybackBackend for MockBackend {
        async fn configure(&self, _policy: PlaybackPolicy) -> Result<(), AudioError> {
            self.record("configure".into());
            if self.0.lock().unwrap().fail_configure {
                return Err(AudioError::Device("no session".into()));
            }
            Ok(())
        }

        async fn load(&self, url: &str) -> Result<Box<dyn PlaybackHandle>, AudioError> {
            self.record(format!("load {url}"));
            if self.0.lock().unwrap().fail_load {
                return Err(AudioError::Status {
                    url: url.into(),
                    status: 404,
                });
            }
            Ok(Box::new(MockHandle {
                url: url.to_string(),
                backend: self.clone(),
            }))
        }
    }

    #[async_trait]
    impl PlaybackHandle for MockHandle {
        async fn set_looping(&mut self, looping: bool) -> Result<(), AudioError> {
            self.backend.record(format!("looping {looping}"));
            Ok(())
        }

        async fn set_volume(&mut self, volume: f32) -> Result<(), AudioError> {
            self.backend.record(format!("volume {volume}"));
            Ok(())
        }

        async fn play(&mut self) -> Result<(), AudioError> {
            self.backend.record(format!("play {}", self.url));
            Ok(())
        }

        async fn pause(&mut self) -> Result<(), AudioError> {
            self.backend.record(format!("pause {}", self.url));
            Ok(())
        }

        async fn stop(&mut self) -> Result<(), AudioError> {
            self.backend.record(format!("stop {}", self.url));
            if self.backend.0.lock().unwrap().fail_stop {
                return Err(AudioError::Device("stuck".into()));
            }
            Ok(())
        }

        async fn unload(&mut self) -> Result<(), AudioError> {
            self.backend.record(format!("unload {}", self.url));
            if self.backend.0.lock().unwrap().fail_unload {
                return Err(AudioError::Device("busy".into()));
            }
            Ok(())
        }
    }

    fn tracks() -> TrackTable {
        TrackTable {
            spring: "spring.mp3".into(),
            summer: "summer.mp3".into(),
            autumn: "autumn.mp3".into(),
            winter: "winter.mp3".into(),
        }
    }

    fn controller() -> (AudioController, MockBackend) {
        let backend = MockBackend::default();
        (
            AudioController::new(Box::new(backend.clone()), tracks()),
            backend,
        )
    }

    #[tokio::test]
    async fn initialize_moves_to_ready() {
        let (mut audio, backend) = controller();
        assert_eq!(audio.state(), AudioState::Uninitialized);
        audio.initialize().await;
        assert_eq!(audio.state(), AudioState::Ready);
        assert_eq!(backend.calls(), vec!["configure"]);
    }

    #[tokio::test]
    async fn failed_initialize_still_usable() {
        let (mut audio, backend) = controller();
        backend.0.lock().unwrap().fail_configure = true;
        audio.initialize().await;
        assert_eq!(audio.state(), AudioState::Ready);
        audio.play_seasonal_music(Season::Spring).await;
        assert!(audio.is_playing());
    }

    #[tokio::test]
    async fn play_loads_loops_and_sets_volume() {
        let (mut audio, backend) = controller();
        audio.initialize().await;
        audio.play_seasonal_music(Season::Autumn).await;
        assert_eq!(audio.state(), AudioState::Playing);
        assert_eq!(audio.loaded_season(), Some(Season::Autumn));
        assert_eq!(
            backend.calls(),
            vec![
                "configure",
                "load autumn.mp3",
                "looping true",
                "volume 0.3",
                "play autumn.mp3"
            ]
        );
    }

    #[tokio::test]
    async fn switching_season_unloads_old_track_first() {
        let (mut audio, backend) = controller();
        audio.initialize().await;
        audio.play_seasonal_music(Season::Winter).await;
        audio.play_seasonal_music(Season::Summer).await;
        let calls = backend.calls();
        let unload = calls.iter().position(|c| c == "unload winter.mp3").unwrap();
        let load = calls.iter().position(|c| c == "load summer.mp3").unwrap();
        assert!(unload < load);
        assert_eq!(audio.loaded_season(), Some(Season::Summer));
    }

    #[tokio::test]
    async fn play_before_initialize_is_ignored() {
        let (mut audio, backend) = controller();
        audio.play_seasonal_music(Season::Spring).await;
        assert_eq!(audio.state(), AudioState::Uninitialized);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn load_failure_is_swallowed() {
        let (mut audio, backend) = controller();
        audio.initialize().await;
        backend.0.lock().unwrap().fail_load = true;
        audio.play_seasonal_music(Season::Spring).await;
        assert_eq!(audio.state(), AudioState::Ready);
        assert_eq!(audio.loaded_season(), None);
    }

    #[tokio::test]
    async fn unload_failure_keeps_current_track() {
        let (mut audio, backend) = controller();
        audio.initialize().await;
        audio.play_seasonal_music(Season::Spring).await;
        backend.0.lock().unwrap().fail_unload = true;
        audio.play_seasonal_music(Season::Summer).await;
        assert_eq!(audio.state(), AudioState::Playing);
        assert_eq!(audio.loaded_season(), Some(Season::Spring));
    }

    #[tokio::test]
    async fn stop_only_when_playing() {
        let (mut audio, backend) = controller();
        audio.initialize().await;
        audio.stop_music().await;
        assert_eq!(audio.state(), AudioState::Ready);

        audio.play_seasonal_music(Season::Spring).await;
        audio.stop_music().await;
        assert_eq!(audio.state(), AudioState::Stopped);
        audio.stop_music().await;
        let stops = backend.calls().iter().filter(|c| c.starts_with("stop")).count();
        assert_eq!(stops, 1);
    }

    #[tokio::test]
    async fn stop_failure_keeps_playing_state() {
        let (mut audio, backend) = controller();
        audio.initialize().await;
        audio.play_seasonal_music(Season::Spring).await;
        backend.0.lock().unwrap().fail_stop = true;
        audio.stop_music().await;
        assert_eq!(audio.state(), AudioState::Playing);
    }

    #[tokio::test]
    async fn stopped_can_play_again() {
        let (mut audio, _backend) = controller();
        audio.initialize().await;
        audio.play_seasonal_music(Season::Spring).await;
        audio.stop_music().await;
        audio.play_seasonal_music(Season::Spring).await;
        assert_eq!(audio.state(), AudioState::Playing);
    }

    #[tokio::test]
    async fn toggle_pauses_and_resumes() {
        let (mut audio, backend) = controller();
        audio.initialize().await;
        audio.toggle_music().await;
        assert_eq!(audio.state(), AudioState::Ready);

        audio.play_seasonal_music(Season::Winter).await;
        audio.toggle_music().await;
        assert_eq!(audio.state(), AudioState::Stopped);
        audio.toggle_music().await;
        assert_eq!(audio.state(), AudioState::Playing);
        assert!(backend.calls().contains(&"pause winter.mp3".to_string()));
    }

    #[tokio::test]
    async fn cleanup_releases_handle() {
        let (mut audio, backend) = controller();
        audio.initialize().await;
        audio.play_seasonal_music(Season::Autumn).await;
        audio.cleanup().await;
        assert_eq!(audio.state(), AudioState::Uninitialized);
        assert_eq!(audio.loaded_season(), None);
        assert_eq!(backend.calls().last().unwrap(), "unload autumn.mp3");
    }

    #[tokio::test]
    async fn cleanup_failure_keeps_track_loaded() {
        let (mut audio, backend) = controller();
        audio.initialize().await;
        audio.play_seasonal_music(Season::Autumn).await;
        backend.0.lock().unwrap().fail_unload = true;
        audio.cleanup().await;
        assert_eq!(audio.state(), AudioState::Playing);
        assert_eq!(audio.loaded_season(), Some(Season::Autumn));

        backend.0.lock().unwrap().fail_unload = false;
        audio.cleanup().await;
        assert_eq!(audio.state(), AudioState::Uninitialized);
        assert_eq!(audio.loaded_season(), None);
    }

    #[tokio::test]
    async fn buffered_track_rejects_use_after_unload() {
        let mut track = BufferedTrack {
            data: Some(vec![0; 4]),
            looping: false,
            volume: 1.0,
            playing: false,
        };
        track.set_volume(MUSIC_VOLUME).await.unwrap();
        track.play().await.unwrap();
        assert!(track.playing);
        track.unload().await.unwrap();
        assert!(matches!(track.play().await, Err(AudioError::NotLoaded)));
        assert!(track.set_volume(2.0).await.is_err());
    }
}
