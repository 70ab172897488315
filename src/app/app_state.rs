//! AppState module for the gallery viewer.
//!
//! This module defines the [`AppState`] struct, which holds everything a running
//! gallery session needs: the navigation controller, the placed artworks and
//! frame timing.

use hilbert_gallery::config::GalleryConfig;
use hilbert_gallery::error::Result;
use hilbert_gallery::gallery::{CachedImageSource, FsImageSource, PlacementManager, scan_directory};
use hilbert_gallery::game::{NavEvent, NavigationController};
use hilbert_gallery::map::MapModel;
use hilbert_gallery::math::Vec2;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use winit::window::{CursorGrabMode, Window};

/// Holds all state required for a running gallery session.
pub struct AppState {
    /// Walks the visitor through the map.
    pub navigation: NavigationController,
    /// The artworks hung on the map's walls.
    pub placements: PlacementManager,
    /// When the previous frame was ticked.
    pub last_frame: Instant,
}

impl AppState {
    /// Generates the gallery and hangs every image found in `art_dir`.
    ///
    /// # Arguments
    /// - `config`: Validated gallery tunables.
    /// - `art_dir`: Directory scanned for artworks.
    /// - `window`: The application window, used for the initial viewport size.
    pub fn new(config: &GalleryConfig, art_dir: &Path, window: &Window) -> Result<Self> {
        config.validate()?;
        let map = Arc::new(MapModel::generate(&config.map)?);

        let mut navigation =
            NavigationController::new(map.clone(), config.navigation.clone(), config.camera)?;
        let size = window.inner_size();
        navigation.resize(size.width, size.height);

        let mut placements = PlacementManager::new(map, config.placement.clone())?;
        let items = scan_directory(art_dir)?;
        let source = CachedImageSource::new(FsImageSource::new(art_dir));
        pollster::block_on(placements.initialize(items, &source));
        placements.set_click_handler(|item| match &item.description {
            Some(description) => log::info!("Inspecting \"{}\": {}", item.display_title(), description),
            None => log::info!("Inspecting \"{}\"", item.display_title()),
        });

        Ok(Self {
            navigation,
            placements,
            last_frame: Instant::now(),
        })
    }

    /// Advances navigation by the wall-clock time since the last frame and
    /// refreshes artwork visibility.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.navigation.update(dt);
        let player = self.navigation.player();
        self.placements.update_visibility(
            player.plan_position(),
            player.view.yaw,
            self.navigation.camera().fov_x(),
        );

        for event in self.navigation.drain_events() {
            match event {
                NavEvent::Moved { .. } | NavEvent::Looked { .. } => log::trace!("{event:?}"),
                _ => log::debug!("{event:?}"),
            }
        }
    }

    /// The pixel at the center of the viewport.
    pub fn screen_center(window: &Window) -> Vec2 {
        let size = window.inner_size();
        Vec2::new(size.width as f32 / 2.0, size.height as f32 / 2.0)
    }

    /// Locks or releases the cursor to match the controller's pointer lock.
    pub fn triage_mouse(&mut self, window: &Window) {
        if self.navigation.pointer_locked() {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                log::warn!("Failed to grab cursor: {e}");
                self.navigation.set_pointer_locked(false);
                return;
            }
            window.set_cursor_visible(false);
        } else {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                log::warn!("Failed to release cursor: {e}");
            }
            window.set_cursor_visible(true);
        }
    }

    /// Window title summarizing the session.
    pub fn title(&self) -> String {
        let position = self.navigation.player().plan_position();
        format!(
            "Hilbert Gallery - {}/{} artworks in view - ({:.1}, {:.1})",
            self.placements.visible().count(),
            self.placements.len(),
            position.x(),
            position.y()
        )
    }

    /// Tears down navigation and placements.
    pub fn dispose(&mut self) {
        self.navigation.dispose();
        self.placements.dispose();
    }
}
