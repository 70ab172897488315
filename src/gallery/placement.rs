//! Hanging artworks on placement slots and deciding which are on screen.
//!
//! # Placement
//!
//! Items are paired with the map's placement slots in list order. Each frame
//! is scaled from its image's aspect ratio so that it fits the slot and the
//! wall height, hung with its top edge at a fixed height, and pushed off the
//! wall along the slot's inward normal by half the frame depth plus a small
//! gap.
//!
//! # Culling
//!
//! Because the slot list is locality ordered, artworks near the visitor sit
//! near the visitor's area index in the list. Only a window of the list
//! around that index is considered, and each artwork in it is tested against
//! three planes: its own facing plane and the two edges of the horizontal
//! field of view.

use crate::config::PlacementConfig;
use crate::error::Result;
use crate::gallery::image_source::{ImageHandle, ImageSource, LoadedImage};
use crate::gallery::item::GalleryItem;
use crate::game::NavigationController;
use crate::map::{MapModel, Segment};
use crate::math::{Mat4, Ray, Vec2, Vec3};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Height of the top edge of every frame.
const HANG_HEIGHT: f32 = 2.1;
/// Largest half-height a frame may take.
const MAX_HALF_HEIGHT: f32 = 2.0 / 1.2;
/// Canvas offset in front of the frame box.
const CANVAS_OFFSET: f32 = 0.001;

/// Index of an artwork in the placement manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtworkId(pub usize);

/// Shared flag telling in-flight loads whether their manager is still alive.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn kill(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// An item hung on a slot. Only `visible` changes after placement.
#[derive(Debug, Clone)]
pub struct PlacedArtwork {
    pub id: ArtworkId,
    pub item: GalleryItem,
    pub slot: Segment,
    /// Frame box transform: unit cube scaled to width, height and frame depth.
    pub model: Mat4,
    /// Canvas quad transform: unit square inset inside the frame.
    pub canvas_model: Mat4,
    pub center: Vec3,
    /// Plan direction the artwork faces.
    pub normal: Vec2,
    pub width: f32,
    pub height: f32,
    /// Slot heading, `atan2(dy, dx)`.
    pub angle: f32,
    /// Plan extent of the frame along the wall, used for culling.
    pub visible_segment: [Vec2; 2],
    pub visible: bool,
    pub image: ImageHandle,
}

impl PlacedArtwork {
    /// Lays out `item` on `slot` for an image of the given aspect ratio.
    pub fn new(
        id: ArtworkId,
        item: GalleryItem,
        slot: Segment,
        image: LoadedImage,
        config: &PlacementConfig,
    ) -> Self {
        let aspect = image.aspect();
        let length = slot.length();
        let scale = (4.5 / (3.0 + aspect))
            .min(length / aspect / 2.2)
            .min(MAX_HALF_HEIGHT);
        let width = 2.0 * scale * aspect;
        let height = 2.0 * scale;

        let along = slot.direction().normalize();
        let normal = slot.inward_normal();
        let mid = slot.midpoint();
        let plan = mid + normal * (config.frame_depth / 2.0 + config.wall_gap);
        let center = plan.at_height(HANG_HEIGHT - scale);
        let angle = slot.angle();

        let rotation = Mat4::rotation_y(-angle);
        let model = Mat4::translation(center.x(), center.y(), center.z())
            .multiply(&rotation)
            .multiply(&Mat4::scaling(width, height, config.frame_depth));
        let canvas = plan + normal * (config.frame_depth / 2.0 + CANVAS_OFFSET);
        let canvas_model = Mat4::translation(canvas.x(), center.y(), canvas.y())
            .multiply(&rotation)
            .multiply(&Mat4::scaling(
                width * config.canvas_inset,
                height * config.canvas_inset,
                1.0,
            ));

        Self {
            id,
            item,
            slot,
            model,
            canvas_model,
            center,
            normal,
            width,
            height,
            angle,
            visible_segment: [mid - along * (width / 2.0), mid + along * (width / 2.0)],
            visible: true,
            image: image.handle,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.image, ImageHandle::Placeholder)
    }

    /// Whether some of the artwork can be seen from `position` looking along `yaw`.
    ///
    /// `half_fov` is half the horizontal field of view, margin included.
    pub fn in_view(&self, position: Vec2, yaw: f32, half_fov: f32) -> bool {
        let heading = (-yaw.cos()).atan2(-yaw.sin());
        let left = heading + half_fov;
        let right = heading - half_fov;
        let planes = [
            Vec2::new(self.angle.sin(), -self.angle.cos()),
            Vec2::new(left.sin(), -left.cos()),
            Vec2::new(-right.sin(), right.cos()),
        ];
        let [a, b] = self.visible_segment;
        let (to_a, to_b) = (a - position, b - position);
        !planes
            .iter()
            .any(|n| n.dot(&to_a) < 0.0 && n.dot(&to_b) < 0.0)
    }

    /// Distance along `ray` to the front of the frame, if the ray hits it.
    pub fn hit_distance(&self, ray: &Ray) -> Option<f32> {
        let normal = Vec3::new(self.normal.x(), 0.0, self.normal.y());
        let facing = normal.dot(&ray.direction);
        if facing == 0.0 {
            return None;
        }
        let distance = normal.dot(&(self.center - ray.origin)) / facing;
        if !(distance > 0.0) {
            return None;
        }
        let offset = ray.at(distance) - self.center;
        let along = self.slot.direction().normalize();
        let u = offset.plan().dot(&along);
        (u.abs() <= self.width / 2.0 && offset.y().abs() <= self.height / 2.0).then_some(distance)
    }
}

type ClickHandler = Box<dyn FnMut(&GalleryItem)>;

pub struct PlacementManager {
    map: Arc<MapModel>,
    config: PlacementConfig,
    artworks: Vec<PlacedArtwork>,
    click_handler: Option<ClickHandler>,
    liveness: Liveness,
}

impl PlacementManager {
    pub fn new(map: Arc<MapModel>, config: PlacementConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            map,
            config,
            artworks: Vec::new(),
            click_handler: None,
            liveness: Liveness::new(),
        })
    }

    /// Loads each item's image and hangs it on the next free slot.
    ///
    /// A failed load hangs a square placeholder instead. Items beyond the
    /// last slot are dropped. If the manager is disposed while a load is in
    /// flight, nothing more is placed. Returns the number of artworks placed.
    pub async fn initialize<S: ImageSource>(&mut self, items: Vec<GalleryItem>, source: &S) -> usize {
        if !self.liveness.is_alive() {
            return 0;
        }
        self.artworks.clear();

        let slots = self.map.placements();
        if items.len() > slots.len() {
            log::debug!(
                "Dropping {} items: only {} placement slots",
                items.len() - slots.len(),
                slots.len()
            );
        }

        for (item, slot) in items.into_iter().zip(slots.iter().copied()) {
            let loaded = source.load(&item.image).await;
            if !self.liveness.is_alive() {
                log::debug!("Placement abandoned after disposal");
                return self.artworks.len();
            }
            let image = loaded.unwrap_or_else(|e| {
                log::warn!("Failed to load artwork {} ({}): {}", item.id, item.image, e);
                LoadedImage::placeholder()
            });
            let id = ArtworkId(self.artworks.len());
            self.artworks
                .push(PlacedArtwork::new(id, item, slot, image, &self.config));
        }

        log::info!("Placed {} artworks", self.artworks.len());
        self.artworks.len()
    }

    /// Recomputes visibility for a visitor at `position` looking along `yaw`
    /// with horizontal field of view `fov_x`.
    ///
    /// Does nothing when the position is away from every slot.
    pub fn update_visibility(&mut self, position: Vec2, yaw: f32, fov_x: f32) {
        let Some(index) = self.map.grid().area_index(position) else {
            return;
        };
        let window = index.saturating_sub(self.config.render_window)..index + self.config.render_window;
        let half_fov = fov_x / 2.0 + self.config.fov_margin;
        for artwork in &mut self.artworks {
            artwork.visible =
                window.contains(&artwork.id.0) && artwork.in_view(position, yaw, half_fov);
        }
    }

    /// Registers the callback run when an artwork is inspected.
    pub fn set_click_handler(&mut self, handler: impl FnMut(&GalleryItem) + 'static) {
        self.click_handler = Some(Box::new(handler));
    }

    /// Finds the nearest visible artwork along `ray` and reports it to the
    /// click handler.
    pub fn inspect(&mut self, ray: &Ray) -> Option<ArtworkId> {
        let (_, id) = self
            .artworks
            .iter()
            .filter(|artwork| artwork.visible)
            .filter_map(|artwork| artwork.hit_distance(ray).map(|d| (d, artwork.id)))
            .min_by(|a, b| a.0.total_cmp(&b.0))?;

        let item = &self.artworks[id.0].item;
        log::debug!("Inspecting {} ({})", item.id, item.display_title());
        if let Some(handler) = self.click_handler.as_mut() {
            handler(item);
        }
        Some(id)
    }

    /// Inspects whatever lies under `pixel` in the navigation camera.
    pub fn inspect_at_screen(&mut self, navigation: &NavigationController, pixel: Vec2) -> Option<ArtworkId> {
        let ray = navigation.screen_ray(pixel)?;
        self.inspect(&ray)
    }

    pub fn artworks(&self) -> &[PlacedArtwork] {
        &self.artworks
    }

    pub fn get(&self, id: ArtworkId) -> Option<&PlacedArtwork> {
        self.artworks.get(id.0)
    }

    pub fn visible(&self) -> impl Iterator<Item = &PlacedArtwork> {
        self.artworks.iter().filter(|artwork| artwork.visible)
    }

    pub fn len(&self) -> usize {
        self.artworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artworks.is_empty()
    }

    /// Handle that a host can use to cancel loads from elsewhere.
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    /// Drops every artwork and the click handler, and stops pending loads.
    pub fn dispose(&mut self) {
        self.liveness.kill();
        self.artworks.clear();
        self.click_handler = None;
        log::info!("Placements disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CameraConfig, MapConfig, NavigationConfig};
    use crate::error::GalleryError;
    use std::cell::{Cell, RefCell};
    use std::f32::consts::FRAC_PI_2;
    use std::rc::Rc;

    /// Serves images whose size is encoded in the reference, e.g. `"40x20"`.
    /// Anything else fails to load.
    #[derive(Default)]
    struct SizedSource {
        loads: Cell<usize>,
        kill_after: Option<(usize, Liveness)>,
    }

    impl ImageSource for SizedSource {
        async fn load(&self, reference: &str) -> Result<LoadedImage> {
            self.loads.set(self.loads.get() + 1);
            if let Some((n, liveness)) = &self.kill_after {
                if self.loads.get() >= *n {
                    liveness.kill();
                }
            }
            let size = reference
                .split_once('x')
                .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)));
            match size {
                Some((w, h)) => Ok(LoadedImage::from_image(image::DynamicImage::new_rgb8(w, h))),
                None => Err(GalleryError::Io(std::io::ErrorKind::NotFound.into())),
            }
        }
    }

    fn map() -> Arc<MapModel> {
        let config = MapConfig {
            order: 3,
            removal: 0.0,
            seed: Some(1),
            ..MapConfig::default()
        };
        Arc::new(MapModel::generate(&config).unwrap())
    }

    fn items(n: usize) -> Vec<GalleryItem> {
        (0..n)
            .map(|i| GalleryItem::new(format!("item-{i}"), "30x30"))
            .collect()
    }

    fn manager(n: usize) -> PlacementManager {
        let mut manager = PlacementManager::new(map(), PlacementConfig::default()).unwrap();
        pollster::block_on(manager.initialize(items(n), &SizedSource::default()));
        manager
    }

    fn slot() -> Segment {
        Segment::new(Vec2::new(0.0, 0.0), Vec2::new(8.0, 0.0))
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    /// Tests frame sizes for square and wide images.
    #[test]
    fn test_sizing() {
        let config = PlacementConfig::default();
        let item = GalleryItem::new("a", "a.png");
        let square = PlacedArtwork::new(
            ArtworkId(0),
            item.clone(),
            slot(),
            LoadedImage::placeholder(),
            &config,
        );
        assert!(close(square.width, 2.25));
        assert!(close(square.height, 2.25));
        assert!(close(square.center.y(), 2.1 - 1.125));

        let wide = LoadedImage::from_image(image::DynamicImage::new_rgb8(40, 20));
        let wide = PlacedArtwork::new(ArtworkId(1), item, slot(), wide, &config);
        assert!(close(wide.width, 3.6));
        assert!(close(wide.height, 1.8));
    }

    /// Tests that frames on short slots are narrowed to fit.
    #[test]
    fn test_sizing_short_slot() {
        let short = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0));
        let art = PlacedArtwork::new(
            ArtworkId(0),
            GalleryItem::new("a", "a.png"),
            short,
            LoadedImage::placeholder(),
            &PlacementConfig::default(),
        );
        assert!(art.width < short.length());
        assert!(close(art.width, 4.0 / 2.2));
    }

    /// Tests that the frame faces into the room and stands off the wall.
    #[test]
    fn test_orientation() {
        let config = PlacementConfig::default();
        let art = PlacedArtwork::new(
            ArtworkId(0),
            GalleryItem::new("a", "a.png"),
            slot(),
            LoadedImage::placeholder(),
            &config,
        );
        assert_eq!(art.normal, Vec2::new(0.0, 1.0));
        assert!(close(art.center.z(), 0.055));

        let front = art.model.transform_point(Vec3::new(0.0, 0.0, 0.5));
        assert!(close(front.z(), 0.105), "{front:?}");
        let right = art.model.transform_point(Vec3::new(0.5, 0.0, 0.0));
        assert!(close(right.x(), 4.0 + art.width / 2.0), "{right:?}");

        let [a, b] = art.visible_segment;
        assert!(close(a.x(), 4.0 - art.width / 2.0));
        assert!(close(b.x(), 4.0 + art.width / 2.0));
    }

    /// Tests the facing and frustum planes on a lone artwork.
    #[test]
    fn test_in_view() {
        let art = PlacedArtwork::new(
            ArtworkId(0),
            GalleryItem::new("a", "a.png"),
            slot(),
            LoadedImage::placeholder(),
            &PlacementConfig::default(),
        );
        let half_fov = CameraConfig::default().fov_x() / 2.0;
        // Facing the wall from the room.
        assert!(art.in_view(Vec2::new(4.0, 5.0), 0.0, half_fov));
        // Looking away from it.
        assert!(!art.in_view(Vec2::new(4.0, 5.0), std::f32::consts::PI, half_fov));
        // Behind the wall, looking at its back.
        assert!(!art.in_view(Vec2::new(4.0, -5.0), std::f32::consts::PI, half_fov));
    }

    /// Tests the ray hit on the front of a frame and a miss beside it.
    #[test]
    fn test_hit_distance() {
        let art = PlacedArtwork::new(
            ArtworkId(0),
            GalleryItem::new("a", "a.png"),
            slot(),
            LoadedImage::placeholder(),
            &PlacementConfig::default(),
        );
        let at_center = Ray::new(Vec3::new(4.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let d = art.hit_distance(&at_center).unwrap();
        assert!(close(d, 5.0 - 0.055));
        let beside = Ray::new(Vec3::new(7.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(art.hit_distance(&beside), None);
        let away = Ray::new(Vec3::new(4.0, 1.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(art.hit_distance(&away), None);
    }

    /// Tests that items pair with slots in order and extras are dropped.
    #[test]
    fn test_initialize_pairs_in_order() {
        let map = map();
        let slots = map.placements().len();
        let mut manager = PlacementManager::new(map.clone(), PlacementConfig::default()).unwrap();
        let placed = pollster::block_on(manager.initialize(items(slots + 5), &SizedSource::default()));
        assert_eq!(placed, slots);
        assert_eq!(manager.len(), slots);
        for (artwork, slot) in manager.artworks().iter().zip(map.placements()) {
            assert_eq!(artwork.slot, *slot);
        }
        assert_eq!(manager.artworks()[3].id, ArtworkId(3));
    }

    /// Tests that a failed load still hangs a square placeholder.
    #[test]
    fn test_failed_load_uses_placeholder() {
        let mut manager = PlacementManager::new(map(), PlacementConfig::default()).unwrap();
        let items = vec![
            GalleryItem::new("ok", "40x20"),
            GalleryItem::new("broken", "missing.png"),
        ];
        pollster::block_on(manager.initialize(items, &SizedSource::default()));
        assert_eq!(manager.len(), 2);
        assert!(!manager.artworks()[0].is_placeholder());
        assert!(manager.artworks()[1].is_placeholder());
        assert!(close(manager.artworks()[1].width, manager.artworks()[1].height));
    }

    /// Tests that disposal during a load stops placement.
    #[test]
    fn test_dispose_during_load() {
        let mut manager = PlacementManager::new(map(), PlacementConfig::default()).unwrap();
        let source = SizedSource {
            kill_after: Some((2, manager.liveness())),
            ..SizedSource::default()
        };
        let placed = pollster::block_on(manager.initialize(items(5), &source));
        assert_eq!(placed, 1);
        assert_eq!(source.loads.get(), 2);
        assert_eq!(pollster::block_on(manager.initialize(items(5), &source)), 0);
    }

    /// Tests visibility from the first room, facing and turned away from
    /// the first slot.
    #[test]
    fn test_visibility_symmetry() {
        let mut manager = manager(3);
        let fov_x = CameraConfig::default().fov_x();
        manager.update_visibility(Vec2::new(4.0, 4.0), FRAC_PI_2, fov_x);
        assert!(manager.artworks()[0].visible);
        manager.update_visibility(Vec2::new(4.0, 4.0), -FRAC_PI_2, fov_x);
        assert!(!manager.artworks()[0].visible);
    }

    /// Tests that artworks outside the list window are hidden.
    #[test]
    fn test_visibility_window() {
        let mut manager = manager(30);
        assert_eq!(manager.len(), 30);
        let spawn = manager.map.spawn();
        let fov_x = CameraConfig::default().fov_x();
        manager.update_visibility(spawn.position, spawn.yaw, fov_x);
        assert!(manager.artworks()[20..].iter().all(|a| !a.visible));
        assert!(manager.artworks()[0].visible);
    }

    /// Tests that positions away from every slot leave visibility alone.
    #[test]
    fn test_visibility_out_of_bounds() {
        let mut manager = manager(3);
        let fov_x = CameraConfig::default().fov_x();
        manager.update_visibility(Vec2::new(4.0, 4.0), -FRAC_PI_2, fov_x);
        manager.update_visibility(Vec2::new(-100.0, -100.0), FRAC_PI_2, fov_x);
        assert!(!manager.artworks()[0].visible);
    }

    /// Tests that inspecting from the spawn pose reports the first artwork.
    #[test]
    fn test_inspect_at_screen() {
        let mut manager = manager(3);
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let sink = clicked.clone();
        manager.set_click_handler(move |item| sink.borrow_mut().push(item.id.clone()));

        let mut nav = NavigationController::new(
            manager.map.clone(),
            NavigationConfig::default(),
            CameraConfig::default(),
        )
        .unwrap();
        nav.resize(1600, 900);
        let id = manager.inspect_at_screen(&nav, Vec2::new(800.0, 450.0));
        assert_eq!(id, Some(ArtworkId(0)));
        assert_eq!(clicked.borrow().as_slice(), ["item-0".to_string()]);

        let sky = Ray::new(Vec3::new(6.0, 1.7, 4.0), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(manager.inspect(&sky), None);
        assert_eq!(clicked.borrow().len(), 1);
    }

    /// Tests that disposal drops artworks and the handler.
    #[test]
    fn test_dispose() {
        let mut manager = manager(3);
        manager.set_click_handler(|_| panic!("handler survived disposal"));
        manager.dispose();
        assert!(manager.is_empty());
        let ray = Ray::new(Vec3::new(6.0, 1.7, 4.125), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(manager.inspect(&ray), None);
    }
}
