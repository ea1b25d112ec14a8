//! Falling items: spawn, gravity/bounce integration, drag and z-order

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::{BinKind, Catalog};
use super::particles::ParticlePool;
use crate::consts::*;
use crate::{Rect, Viewport};

/// Unique id of an item on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// Sound cue raised by item physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemSound {
    /// First hard impact
    Drop,
    /// Grass rustle on impact
    Bounce,
    /// Softer impact after the first bounce
    BounceDrop,
}

impl ItemSound {
    const ALL: [ItemSound; 3] = [ItemSound::Drop, ItemSound::Bounce, ItemSound::BounceDrop];

    const fn bit(self) -> u8 {
        match self {
            ItemSound::Drop => 1,
            ItemSound::Bounce => 2,
            ItemSound::BounceDrop => 4,
        }
    }
}

/// Tiny bit set of [`ItemSound`]s
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoundSet(u8);

impl SoundSet {
    #[inline]
    pub fn insert(&mut self, sound: ItemSound) {
        self.0 |= sound.bit();
    }

    #[inline]
    pub fn contains(&self, sound: ItemSound) -> bool {
        self.0 & sound.bit() != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = ItemSound> {
        ItemSound::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

/// What happened to an item during one physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// Still airborne (or not falling at all)
    Airborne,
    /// Hit the ground for the first time and bounced
    FirstImpact,
    /// Hit the ground again and bounced
    Rebound,
    /// Came to rest this frame
    Rest,
}

#[derive(Debug, Clone)]
pub struct FallingItem {
    pub id: ItemId,
    /// Index into the [`Catalog`]
    pub archetype: usize,
    pub kind: BinKind,
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    pub gravity: f32,
    /// Resting point; `pos.y` never passes `target.y` while falling
    pub target: Vec2,
    pub size: Vec2,
    /// Hit radius (half the larger side)
    pub radius: f32,
    pub z: u32,
    pub is_falling: bool,
    pub has_bounced: bool,
    pending: SoundSet,
    emitted: SoundSet,
}

impl FallingItem {
    /// Queue a sound cue unless this item already raised it
    fn emit(&mut self, sound: ItemSound) {
        if !self.emitted.contains(sound) {
            self.emitted.insert(sound);
            self.pending.insert(sound);
        }
    }

    /// Take the queued sound cues
    pub fn take_sounds(&mut self) -> SoundSet {
        std::mem::take(&mut self.pending)
    }

    /// One frame of gravity, ground bounce and wall clamping
    pub fn advance(&mut self, canvas_width: f32) -> Landing {
        if !self.is_falling {
            return Landing::Airborne;
        }

        self.vel.y += self.gravity;
        self.pos += self.vel;

        let mut landing = Landing::Airborne;
        if self.pos.y >= self.target.y {
            self.pos.y = self.target.y;

            if self.vel.y > BOUNCE_THRESHOLD {
                if self.has_bounced {
                    self.emit(ItemSound::BounceDrop);
                    landing = Landing::Rebound;
                } else {
                    self.emit(ItemSound::Drop);
                    landing = Landing::FirstImpact;
                }
                self.emit(ItemSound::Bounce);
                self.vel.y = -self.vel.y * BOUNCE_DAMPING;
                self.has_bounced = true;
            } else {
                self.vel = Vec2::ZERO;
                self.is_falling = false;
                landing = Landing::Rest;
            }
        }

        let half_w = self.size.x / 2.0;
        if self.pos.x - half_w < WALL_MARGIN {
            self.pos.x = WALL_MARGIN + half_w;
            self.vel.x = self.vel.x.abs() * WALL_DAMPING;
        } else if self.pos.x + half_w > canvas_width - WALL_MARGIN {
            self.pos.x = canvas_width - WALL_MARGIN - half_w;
            self.vel.x = -self.vel.x.abs() * WALL_DAMPING;
        }

        landing
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance(point) <= self.radius
    }
}

/// All live items plus the landing dust they kick up
#[derive(Debug, Clone)]
pub struct ItemField {
    /// Sorted by ascending z
    items: Vec<FallingItem>,
    max_items: usize,
    next_id: u32,
    next_z: u32,
    spawn_band: Rect,
    viewport: Viewport,
    particles: ParticlePool,
}

impl ItemField {
    pub fn new(viewport: Viewport, max_items: usize) -> Self {
        Self {
            items: Vec::new(),
            max_items,
            next_id: 1,
            next_z: 0,
            spawn_band: viewport.spawn_band(),
            viewport,
            particles: ParticlePool::default(),
        }
    }

    pub fn set_max_items(&mut self, max_items: usize) {
        self.max_items = max_items;
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_items
    }

    /// Drop a random archetype from above the spawn band.
    ///
    /// Returns `None` without touching the field when it is at capacity.
    pub fn spawn<R: Rng>(&mut self, catalog: &Catalog, rng: &mut R) -> Option<ItemId> {
        if self.is_full() || catalog.is_empty() {
            return None;
        }

        let archetype = rng.random_range(0..catalog.len());
        let kind = catalog.get(archetype)?.kind;
        let size = catalog.size(archetype);
        let band = self.spawn_band;

        let free_w = (band.w - size.x).max(0.0);
        let free_h = (band.h - size.y).max(0.0);
        let start_x = band.x + rng.random::<f32>() * free_w;
        let target = Vec2::new(
            band.x + rng.random::<f32>() * free_w + size.x / 2.0,
            band.y + rng.random::<f32>() * free_h + size.y / 2.0,
        );
        let vel = Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(2.0..4.0));

        let id = ItemId(self.next_id);
        self.next_id += 1;
        let z = self.next_z;
        self.next_z += 1;

        self.items.push(FallingItem {
            id,
            archetype,
            kind,
            pos: Vec2::new(start_x, SPAWN_Y),
            vel,
            gravity: ITEM_GRAVITY,
            target,
            size,
            radius: size.x.max(size.y) / 2.0,
            z,
            is_falling: true,
            has_bounced: false,
            pending: SoundSet::default(),
            emitted: SoundSet::default(),
        });
        Some(id)
    }

    /// Advance physics and particles by one frame
    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        let width = self.viewport.width;
        for item in &mut self.items {
            if item.advance(width) == Landing::FirstImpact {
                self.particles.burst(item.pos, LANDING_PARTICLES, rng);
            }
        }
        self.particles.update();
    }

    /// Collect and clear every queued sound cue
    pub fn drain_sounds(&mut self) -> Vec<(ItemId, ItemSound)> {
        let mut out = Vec::new();
        for item in &mut self.items {
            let id = item.id;
            out.extend(item.take_sounds().iter().map(|s| (id, s)));
        }
        out
    }

    pub fn get(&self, id: ItemId) -> Option<&FallingItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut FallingItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn remove(&mut self, id: ItemId) -> Option<FallingItem> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(idx))
    }

    /// Topmost item under `point`
    pub fn item_at(&self, point: Vec2) -> Option<ItemId> {
        self.items
            .iter()
            .rev()
            .find(|i| i.contains(point))
            .map(|i| i.id)
    }

    /// Raise an item above all others
    pub fn bring_to_front(&mut self, id: ItemId) {
        let top = self.items.iter().map(|i| i.z).max().unwrap_or(0);
        if let Some(item) = self.get_mut(id) {
            item.z = top + 1;
            self.next_z = self.next_z.max(top + 2);
        }
        self.items.sort_by_key(|i| i.z);
    }

    /// Stop an item falling so it follows the pointer
    pub fn pick_up(&mut self, id: ItemId) {
        if let Some(item) = self.get_mut(id) {
            item.is_falling = false;
        }
        self.bring_to_front(id);
    }

    /// Move a dragged item, keeping it inside the canvas by its radius
    pub fn drag_to(&mut self, id: ItemId, pos: Vec2) {
        let (w, h) = (self.viewport.width, self.viewport.height);
        if let Some(item) = self.get_mut(id) {
            let r = item.radius;
            item.pos = Vec2::new(pos.x.clamp(r, (w - r).max(r)), pos.y.clamp(r, (h - r).max(r)));
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.particles.clear();
    }

    /// Items in draw order (bottom first)
    pub fn iter(&self) -> impl Iterator<Item = &FallingItem> {
        self.items.iter()
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn test_item(pos: Vec2, vel: Vec2, target_y: f32) -> FallingItem {
        FallingItem {
            id: ItemId(1),
            archetype: 0,
            kind: BinKind::Blue,
            pos,
            vel,
            gravity: ITEM_GRAVITY,
            target: Vec2::new(pos.x, target_y),
            size: Vec2::splat(40.0),
            radius: 20.0,
            z: 0,
            is_falling: true,
            has_bounced: false,
            pending: SoundSet::default(),
            emitted: SoundSet::default(),
        }
    }

    #[test]
    fn spawn_respects_capacity_without_mutation() {
        let catalog = Catalog::standard();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut field = ItemField::new(Viewport::default(), 3);
        for _ in 0..3 {
            assert!(field.spawn(&catalog, &mut rng).is_some());
        }
        let before: Vec<ItemId> = field.iter().map(|i| i.id).collect();
        assert!(field.spawn(&catalog, &mut rng).is_none());
        let after: Vec<ItemId> = field.iter().map(|i| i.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn spawned_items_start_above_screen_inside_band() {
        let catalog = Catalog::standard();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut field = ItemField::new(Viewport::default(), 20);
        let band = Viewport::default().spawn_band();
        for _ in 0..20 {
            field.spawn(&catalog, &mut rng);
        }
        for item in field.iter() {
            assert_eq!(item.pos.y, SPAWN_Y);
            assert!(item.target.x >= band.x && item.target.x <= band.right());
            assert!(item.target.y >= band.y && item.target.y <= band.bottom());
            assert!((-2.0..2.0).contains(&item.vel.x));
            assert!((2.0..4.0).contains(&item.vel.y));
        }
    }

    #[test]
    fn first_impact_emits_drop_and_bounce_once() {
        let mut item = test_item(Vec2::new(400.0, 0.0), Vec2::new(0.0, 3.0), 100.0);
        let mut first = None;
        for _ in 0..200 {
            if item.advance(960.0) == Landing::FirstImpact {
                first = Some(item.take_sounds());
                break;
            }
        }
        let sounds = first.unwrap();
        assert!(sounds.contains(ItemSound::Drop));
        assert!(sounds.contains(ItemSound::Bounce));
        assert!(!sounds.contains(ItemSound::BounceDrop));

        let mut later = SoundSet::default();
        while item.is_falling {
            item.advance(960.0);
            for s in item.take_sounds().iter() {
                later.insert(s);
            }
        }
        assert!(!later.contains(ItemSound::Drop));
        assert!(!later.contains(ItemSound::Bounce));
    }

    #[test]
    fn item_comes_to_rest_at_target() {
        let mut item = test_item(Vec2::new(400.0, -50.0), Vec2::new(1.0, 3.5), 450.0);
        let mut frames = 0;
        while item.is_falling && frames < 10_000 {
            item.advance(960.0);
            frames += 1;
        }
        assert!(!item.is_falling);
        assert_eq!(item.pos.y, 450.0);
        assert_eq!(item.vel, Vec2::ZERO);
    }

    #[test]
    fn walls_reflect_and_damp() {
        let mut item = test_item(Vec2::new(25.0, 0.0), Vec2::new(-4.0, 0.0), 500.0);
        item.advance(960.0);
        assert_eq!(item.pos.x, WALL_MARGIN + 20.0);
        assert_eq!(item.vel.x, 2.0);

        let mut item = test_item(Vec2::new(935.0, 0.0), Vec2::new(4.0, 0.0), 500.0);
        item.advance(960.0);
        assert_eq!(item.pos.x, 960.0 - WALL_MARGIN - 20.0);
        assert_eq!(item.vel.x, -2.0);
    }

    #[test]
    fn landing_kicks_up_dust() {
        let catalog = Catalog::standard();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut field = ItemField::new(Viewport::default(), 1);
        field.spawn(&catalog, &mut rng);
        let mut sounds = Vec::new();
        for _ in 0..400 {
            field.update(&mut rng);
            sounds.extend(field.drain_sounds());
            if !field.particles().is_empty() {
                break;
            }
        }
        assert!(!field.particles().is_empty());
        assert!(sounds.iter().any(|(_, s)| *s == ItemSound::Drop));
    }

    #[test]
    fn hit_test_prefers_topmost_and_bring_to_front() {
        let catalog = Catalog::standard();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut field = ItemField::new(Viewport::default(), 5);
        let a = field.spawn(&catalog, &mut rng).unwrap();
        let b = field.spawn(&catalog, &mut rng).unwrap();
        let p = Vec2::new(300.0, 300.0);
        field.get_mut(a).unwrap().pos = p;
        field.get_mut(b).unwrap().pos = p;
        assert_eq!(field.item_at(p), Some(b));
        field.bring_to_front(a);
        assert_eq!(field.item_at(p), Some(a));
        assert_eq!(field.iter().last().map(|i| i.id), Some(a));
    }

    #[test]
    fn drag_is_clamped_by_radius() {
        let catalog = Catalog::standard();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut field = ItemField::new(Viewport::default(), 5);
        let id = field.spawn(&catalog, &mut rng).unwrap();
        field.pick_up(id);
        field.drag_to(id, Vec2::new(-100.0, 5000.0));
        let item = field.get(id).unwrap();
        assert!(!item.is_falling);
        assert_eq!(item.pos.x, item.radius);
        assert_eq!(item.pos.y, CANVAS_HEIGHT - item.radius);
    }

    proptest! {
        #[test]
        fn never_below_target_and_bounces_are_bounded(
            vx in -2.0f32..2.0,
            vy in 2.0f32..4.0,
            x in 100.0f32..800.0,
            target_y in 390.0f32..510.0,
        ) {
            let mut item = test_item(Vec2::new(x, SPAWN_Y), Vec2::new(vx, vy), target_y);
            let mut bounces = 0;
            let mut frames = 0;
            while item.is_falling && frames < 5_000 {
                match item.advance(CANVAS_WIDTH) {
                    Landing::FirstImpact | Landing::Rebound => bounces += 1,
                    _ => {}
                }
                prop_assert!(item.pos.y <= item.target.y);
                prop_assert!(item.pos.x >= WALL_MARGIN && item.pos.x <= CANVAS_WIDTH - WALL_MARGIN);
                frames += 1;
            }
            prop_assert!(!item.is_falling);
            prop_assert!(bounces <= 4);
        }
    }
}
