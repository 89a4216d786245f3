//! Entity variants
//!
//! Every simulated object is a `Body` (position, per-tick velocity, size)
//! plus the state its kind needs. The set of kinds is closed, so drawing and
//! collision code dispatch with a `match` on `EntityRef`.

use std::fmt;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::{Field, GameEvent};
use crate::consts::*;

/// Position, velocity and size shared by all entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    /// Top-left corner
    pub pos: IVec2,
    /// Displacement applied each tick
    pub dir: IVec2,
    pub size: IVec2,
}

impl Body {
    pub const fn new(pos: IVec2, dir: IVec2, size: IVec2) -> Self {
        Self { pos, dir, size }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn advance(&mut self) {
        self.pos += self.dir;
    }

    /// Advance, then point velocity back into the field on any axis that left it.
    ///
    /// The sign is set rather than negated, so a body that is still outside
    /// after one step keeps heading inward instead of jittering.
    pub fn advance_bouncing(&mut self, field: &Field) {
        self.advance();
        let max = field.max_pos(self.size);

        if self.pos.x < 0 {
            self.dir.x = self.dir.x.abs();
        } else if self.pos.x > max.x {
            self.dir.x = -self.dir.x.abs();
        }

        if self.pos.y < 0 {
            self.dir.y = self.dir.y.abs();
        } else if self.pos.y > max.y {
            self.dir.y = -self.dir.y.abs();
        }
    }
}

/// Entity kinds, used for log lines and audio routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Star,
    StarDust,
    Ufo,
    Asteroid,
    Bullet,
    Ship,
    AidKit,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Star => "star",
            Self::StarDust => "star dust",
            Self::Ufo => "UFO",
            Self::Asteroid => "asteroid",
            Self::Bullet => "bullet",
            Self::Ship => "ship",
            Self::AidKit => "aid kit",
        };
        f.write_str(name)
    }
}

// === Background ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    Star,
    StarDust,
    Ufo,
}

/// Collision-exempt scenery that scrolls and wraps at the field edges
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub body: Body,
}

impl Decoration {
    /// Star scrolling left at `speed`
    pub fn star(pos: IVec2, speed: i32) -> Self {
        Self {
            kind: DecorationKind::Star,
            body: Body::new(pos, IVec2::new(-speed, 0), STAR_SIZE),
        }
    }

    /// Star dust mote scrolling left at `speed`
    pub fn star_dust(pos: IVec2, speed: i32) -> Self {
        Self {
            kind: DecorationKind::StarDust,
            body: Body::new(pos, IVec2::new(-speed, 0), STAR_DUST_SIZE),
        }
    }

    /// UFO drifting right
    pub fn ufo(pos: IVec2) -> Self {
        Self {
            kind: DecorationKind::Ufo,
            body: Body::new(pos, IVec2::new(UFO_SPEED, 0), UFO_SIZE),
        }
    }

    pub fn update(&mut self, field: &Field, rng: &mut impl Rng) {
        self.body.advance();
        match self.kind {
            DecorationKind::Star | DecorationKind::StarDust => {
                // Fully past the left edge: re-enter from the right
                if self.body.pos.x + self.body.size.x < 0 {
                    self.body.pos.x = field.width;
                }
            }
            DecorationKind::Ufo => {
                if self.body.pos.x > field.width {
                    self.body.pos.x = -self.body.size.x;
                    self.body.pos.y = field.random_y(rng, self.body.size);
                }
            }
        }
    }
}

// === Asteroid ===

/// Which asteroid artwork is used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsteroidTint {
    Red,
    Blue,
}

/// Asteroid lifecycle: `Alive -> Exploding(1..=3) -> Blown`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionStage {
    Alive,
    /// Explosion animation frame (1-based)
    Exploding(u8),
    /// Terminal: ready to be removed from the live list
    Blown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub id: u32,
    pub body: Body,
    pub radius: i32,
    /// Damage dealt to the ship on impact. Zeroed once the explosion starts.
    pub power: i32,
    pub tint: AsteroidTint,
    pub stage: ExplosionStage,
}

/// Impact power of an asteroid of the given radius (radius 5..=49 gives 1..=9)
pub fn power_for_radius(radius: i32) -> i32 {
    (radius / 5).max(1)
}

/// Leftward speed of an asteroid of the given radius
pub fn speed_for_radius(radius: i32) -> i32 {
    1 + radius / 10
}

impl Asteroid {
    /// Power is derived from the radius
    pub fn new(id: u32, body: Body, radius: i32, tint: AsteroidTint) -> Self {
        Self {
            id,
            body,
            radius,
            power: power_for_radius(radius),
            tint,
            stage: ExplosionStage::Alive,
        }
    }

    /// Override the impact power
    pub fn with_power(mut self, power: i32) -> Self {
        self.power = power;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.stage == ExplosionStage::Alive
    }

    pub fn is_blown(&self) -> bool {
        self.stage == ExplosionStage::Blown
    }

    /// Power already consumed by a hit
    pub fn is_spent(&self) -> bool {
        self.power == 0
    }

    /// Begin the explosion. Returns false (and changes nothing) unless alive.
    pub fn start_explosion(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.stage = ExplosionStage::Exploding(1);
        self.power = 0;
        true
    }

    /// Advance one tick. Returns `AsteroidDestroyed` on the tick it becomes blown.
    pub fn update(&mut self, field: &Field) -> Option<GameEvent> {
        match self.stage {
            ExplosionStage::Alive => {
                self.body.advance_bouncing(field);
                None
            }
            ExplosionStage::Exploding(frame) if frame < EXPLOSION_FRAMES => {
                self.stage = ExplosionStage::Exploding(frame + 1);
                None
            }
            ExplosionStage::Exploding(_) => {
                self.stage = ExplosionStage::Blown;
                Some(GameEvent::AsteroidDestroyed {
                    id: self.id,
                    description: self.describe(),
                })
            }
            ExplosionStage::Blown => None,
        }
    }

    pub fn describe(&self) -> String {
        let colour = match self.tint {
            AsteroidTint::Red => "red",
            AsteroidTint::Blue => "blue",
        };
        format!("{colour} asteroid #{}", self.id)
    }
}

// === Bullet ===

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub id: u32,
    pub body: Body,
}

impl Bullet {
    /// Bullet leaving the gun at `muzzle`, flying right
    pub fn new(id: u32, muzzle: IVec2) -> Self {
        Self {
            id,
            body: Body::new(muzzle, IVec2::new(BULLET_SPEED, 0), BULLET_SIZE),
        }
    }

    pub fn update(&mut self) {
        self.body.advance();
    }

    /// Past the right edge (bullets only fly right)
    pub fn is_off_field(&self, field: &Field) -> bool {
        self.body.pos.x > field.width
    }
}

// === Ship ===

#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub body: Body,
    /// Remaining energy. May go negative; death is decided by the game loop.
    pub energy: i32,
}

impl Ship {
    /// Ship at the left edge, vertically centred
    pub fn new(field: &Field) -> Self {
        let y = ((field.height - SHIP_SIZE.y) / 2).max(0);
        Self {
            body: Body::new(
                IVec2::new(SHIP_START_X, y),
                IVec2::new(0, SHIP_STEP),
                SHIP_SIZE,
            ),
            energy: SHIP_MAX_ENERGY,
        }
    }

    /// Ship motion is input-driven only
    pub fn update(&mut self) {}

    pub fn move_up(&mut self, field: &Field) {
        let y = self.body.pos.y - self.body.dir.y;
        self.body.pos.y = y.clamp(0, field.max_pos(self.body.size).y);
    }

    pub fn move_down(&mut self, field: &Field) {
        let y = self.body.pos.y + self.body.dir.y;
        self.body.pos.y = y.clamp(0, field.max_pos(self.body.size).y);
    }

    /// Where new bullets appear
    pub fn muzzle(&self) -> IVec2 {
        self.body.pos + MUZZLE_OFFSET
    }

    /// Take damage. No-op for zero.
    pub fn energy_low(&mut self, amount: i32) -> Option<GameEvent> {
        if amount == 0 {
            return None;
        }
        self.energy -= amount;
        Some(GameEvent::ShipDamaged {
            amount,
            energy: self.energy,
        })
    }

    /// Repair, capped at full energy. No-op for zero.
    pub fn energy_high(&mut self, amount: i32) -> Option<GameEvent> {
        if amount == 0 {
            return None;
        }
        self.energy = (self.energy + amount).min(SHIP_MAX_ENERGY);
        Some(GameEvent::ShipHealed {
            amount,
            energy: self.energy,
        })
    }

    pub fn is_destroyed(&self) -> bool {
        self.energy <= 0
    }

    pub fn die(&self) -> GameEvent {
        GameEvent::ShipDestroyed {
            energy: self.energy,
        }
    }

    pub fn describe(&self) -> String {
        format!("ship (energy {})", self.energy)
    }
}

// === Aid kit ===

/// Heal pickup that bounces around the field
#[derive(Debug, Clone, PartialEq)]
pub struct AidKit {
    pub id: u32,
    pub body: Body,
    pub power: i32,
}

impl AidKit {
    pub fn new(id: u32, pos: IVec2, dir: IVec2) -> Self {
        Self {
            id,
            body: Body::new(pos, dir, AID_KIT_SIZE),
            power: AID_KIT_POWER,
        }
    }

    pub fn update(&mut self, field: &Field) {
        self.body.advance_bouncing(field);
    }
}

// === Borrowed view ===

/// Read-only view over any entity, in draw order when produced by
/// `GameState::entities`
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Star(&'a Body),
    StarDust(&'a Body),
    Ufo(&'a Body),
    Asteroid(&'a Asteroid),
    Bullet(&'a Bullet),
    Ship(&'a Ship),
    AidKit(&'a AidKit),
}

impl<'a> From<&'a Decoration> for EntityRef<'a> {
    fn from(decoration: &'a Decoration) -> Self {
        match decoration.kind {
            DecorationKind::Star => Self::Star(&decoration.body),
            DecorationKind::StarDust => Self::StarDust(&decoration.body),
            DecorationKind::Ufo => Self::Ufo(&decoration.body),
        }
    }
}

impl<'a> EntityRef<'a> {
    pub fn body(&self) -> &'a Body {
        match *self {
            Self::Star(body) | Self::StarDust(body) | Self::Ufo(body) => body,
            Self::Asteroid(a) => &a.body,
            Self::Bullet(b) => &b.body,
            Self::Ship(s) => &s.body,
            Self::AidKit(k) => &k.body,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body().rect()
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Star(_) => EntityKind::Star,
            Self::StarDust(_) => EntityKind::StarDust,
            Self::Ufo(_) => EntityKind::Ufo,
            Self::Asteroid(_) => EntityKind::Asteroid,
            Self::Bullet(_) => EntityKind::Bullet,
            Self::Ship(_) => EntityKind::Ship,
            Self::AidKit(_) => EntityKind::AidKit,
        }
    }

    /// Asteroid whose power was consumed by an earlier hit
    pub fn is_spent(&self) -> bool {
        matches!(self, Self::Asteroid(a) if a.is_spent())
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Asteroid(a) => a.describe(),
            Self::Bullet(b) => format!("bullet #{}", b.id),
            Self::Ship(s) => s.describe(),
            Self::AidKit(k) => format!("aid kit #{}", k.id),
            other => other.kind().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field() -> Field {
        Field::new(800, 600).unwrap()
    }

    fn asteroid_at(pos: IVec2, dir: IVec2) -> Asteroid {
        Asteroid::new(1, Body::new(pos, dir, IVec2::new(20, 20)), 20, AsteroidTint::Red)
    }

    #[test]
    fn test_power_derives_from_radius() {
        assert_eq!(power_for_radius(ASTEROID_MIN_RADIUS), 1);
        assert_eq!(power_for_radius(ASTEROID_MAX_RADIUS - 1), 9);
        assert_eq!(asteroid_at(IVec2::ZERO, IVec2::ZERO).power, 4);
    }

    #[test]
    fn test_asteroid_moves_while_alive() {
        let mut a = asteroid_at(IVec2::new(100, 100), IVec2::new(-3, 2));
        assert!(a.update(&field()).is_none());
        assert_eq!(a.body.pos, IVec2::new(97, 102));
    }

    #[test]
    fn test_asteroid_bounces_off_left_edge() {
        let mut a = asteroid_at(IVec2::new(2, 100), IVec2::new(-5, 0));
        a.update(&field());
        assert_eq!(a.body.pos.x, -3);
        assert_eq!(a.body.dir.x, 5);
        a.update(&field());
        assert_eq!(a.body.pos.x, 2);
    }

    #[test]
    fn test_asteroid_bounces_off_bottom_and_right_edges() {
        let f = field();
        let mut a = asteroid_at(IVec2::new(778, 578), IVec2::new(4, 4));
        a.update(&f);
        assert!(a.body.dir.x < 0);
        assert!(a.body.dir.y < 0);
    }

    #[test]
    fn test_explosion_takes_three_frames() {
        let mut a = asteroid_at(IVec2::new(100, 100), IVec2::new(-3, 0));
        assert!(a.start_explosion());
        assert_eq!(a.stage, ExplosionStage::Exploding(1));
        assert_eq!(a.power, 0);

        let pos = a.body.pos;
        assert!(a.update(&field()).is_none());
        assert_eq!(a.stage, ExplosionStage::Exploding(2));
        assert!(a.update(&field()).is_none());
        assert_eq!(a.stage, ExplosionStage::Exploding(3));

        let event = a.update(&field());
        assert!(matches!(event, Some(GameEvent::AsteroidDestroyed { id: 1, .. })));
        assert!(a.is_blown());
        // Exploding asteroids hold still
        assert_eq!(a.body.pos, pos);

        // Blown is terminal and silent
        assert!(a.update(&field()).is_none());
        assert!(a.is_blown());
    }

    #[test]
    fn test_second_start_explosion_is_ignored() {
        let mut a = asteroid_at(IVec2::new(100, 100), IVec2::ZERO);
        assert!(a.start_explosion());
        a.update(&field());
        assert!(!a.start_explosion());
        assert_eq!(a.stage, ExplosionStage::Exploding(2));

        let mut destroyed = 0;
        for _ in 0..10 {
            if a.update(&field()).is_some() {
                destroyed += 1;
            }
            a.start_explosion();
        }
        assert_eq!(destroyed, 1);
    }

    #[test]
    fn test_ship_energy_high_clamps() {
        let mut ship = Ship::new(&field());
        ship.energy = 90;
        let event = ship.energy_high(20);
        assert_eq!(ship.energy, SHIP_MAX_ENERGY);
        assert_eq!(
            event,
            Some(GameEvent::ShipHealed {
                amount: 20,
                energy: 100
            })
        );
    }

    #[test]
    fn test_ship_energy_low_can_go_negative() {
        let mut ship = Ship::new(&field());
        ship.energy = 5;
        ship.energy_low(9);
        assert_eq!(ship.energy, -4);
        assert!(ship.is_destroyed());
    }

    #[test]
    fn test_ship_zero_energy_change_is_silent() {
        let mut ship = Ship::new(&field());
        assert!(ship.energy_low(0).is_none());
        assert!(ship.energy_high(0).is_none());
        assert_eq!(ship.energy, SHIP_MAX_ENERGY);
    }

    #[test]
    fn test_ship_moves_are_clamped() {
        let f = field();
        let mut ship = Ship::new(&f);
        for _ in 0..500 {
            ship.move_up(&f);
        }
        assert_eq!(ship.body.pos.y, 0);
        for _ in 0..500 {
            ship.move_down(&f);
        }
        assert_eq!(ship.body.pos.y, f.height - SHIP_SIZE.y);
    }

    #[test]
    fn test_ship_update_is_noop() {
        let mut ship = Ship::new(&field());
        let before = ship.clone();
        ship.update();
        assert_eq!(ship, before);
    }

    #[test]
    fn test_bullet_leaves_right_edge() {
        let f = field();
        let mut bullet = Bullet::new(1, IVec2::new(795, 100));
        assert!(!bullet.is_off_field(&f));
        bullet.update();
        assert!(bullet.is_off_field(&f));
    }

    #[test]
    fn test_star_wraps_to_right_edge() {
        let f = field();
        let mut rng = Pcg32::seed_from_u64(0);
        let mut star = Decoration::star(IVec2::new(-10, 50), 10);
        star.update(&f, &mut rng);
        assert_eq!(star.body.pos.x, f.width);
        assert_eq!(star.body.pos.y, 50);
    }

    #[test]
    fn test_ufo_wraps_to_left_edge() {
        let f = field();
        let mut rng = Pcg32::seed_from_u64(0);
        let mut ufo = Decoration::ufo(IVec2::new(f.width - 2, 50));
        ufo.update(&f, &mut rng);
        assert_eq!(ufo.body.pos.x, -UFO_SIZE.x);
        assert!((0..=f.height - UFO_SIZE.y).contains(&ufo.body.pos.y));
    }

    #[test]
    fn test_describe_names_entities() {
        let f = field();
        let ship = Ship::new(&f);
        assert_eq!(EntityRef::Ship(&ship).describe(), "ship (energy 100)");
        let a = asteroid_at(IVec2::ZERO, IVec2::ZERO);
        assert_eq!(EntityRef::Asteroid(&a).describe(), "red asteroid #1");
        let star = Decoration::star(IVec2::ZERO, 1);
        assert_eq!(EntityRef::from(&star).describe(), "star");
    }

    proptest! {
        #[test]
        fn prop_asteroid_bounce_stays_bounded(
            x in 0i32..780,
            y in 0i32..580,
            dx in -49i32..50,
            dy in -49i32..50,
            radius in ASTEROID_MIN_RADIUS..ASTEROID_MAX_RADIUS,
        ) {
            let f = field();
            let size = IVec2::splat(radius);
            let start = IVec2::new(x, y).min(f.max_pos(size));
            let body = Body::new(start, IVec2::new(dx, dy), size);
            let mut asteroid = Asteroid::new(1, body, radius, AsteroidTint::Blue);
            let max = f.max_pos(asteroid.body.size);
            for _ in 0..300 {
                let before = asteroid.body;
                prop_assert_eq!(asteroid.update(&f), None);
                prop_assert!(asteroid.is_alive());
                let next = before.pos + before.dir;
                if next.x < 0 || next.x > max.x {
                    prop_assert_eq!(asteroid.body.dir.x.signum(), -before.dir.x.signum());
                }
                if next.y < 0 || next.y > max.y {
                    prop_assert_eq!(asteroid.body.dir.y.signum(), -before.dir.y.signum());
                }
                prop_assert!(asteroid.body.pos.x >= -dx.abs() && asteroid.body.pos.x <= max.x + dx.abs());
                prop_assert!(asteroid.body.pos.y >= -dy.abs() && asteroid.body.pos.y <= max.y + dy.abs());
            }
        }

        #[test]
        fn prop_bounce_stays_bounded(
            x in 0i32..780,
            y in 0i32..580,
            dx in -49i32..50,
            dy in -49i32..50,
        ) {
            let f = field();
            let mut kit = AidKit::new(1, IVec2::new(x, y), IVec2::new(dx, dy));
            let max = f.max_pos(kit.body.size);
            for _ in 0..300 {
                let before = kit.body;
                kit.update(&f);
                let next = before.pos + before.dir;
                if next.x < 0 || next.x > max.x {
                    prop_assert_eq!(kit.body.dir.x.signum(), -before.dir.x.signum());
                }
                if next.y < 0 || next.y > max.y {
                    prop_assert_eq!(kit.body.dir.y.signum(), -before.dir.y.signum());
                }
                prop_assert!(kit.body.pos.x >= -dx.abs() && kit.body.pos.x <= max.x + dx.abs());
                prop_assert!(kit.body.pos.y >= -dy.abs() && kit.body.pos.y <= max.y + dy.abs());
            }
        }
    }
}
