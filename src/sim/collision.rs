//! Collision detection for axis-aligned bounding boxes
//!
//! Every entity collides through its bounding rectangle. Rectangles never
//! rotate, so a plain interval overlap test on each axis is enough.

use glam::IVec2;

use super::entity::EntityRef;
use super::state::GameEvent;

/// Axis-aligned rectangle in field pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: IVec2, size: IVec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// True iff the rectangles share a region of nonzero area.
    ///
    /// Rectangles that only touch along an edge or a corner do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        !(self.right() <= other.left()
            || self.left() >= other.right()
            || self.bottom() <= other.top()
            || self.top() >= other.bottom())
    }
}

/// Result of a collision check
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Whether the bounding rectangles overlap
    pub hit: bool,
    /// Collision notification, if one should be raised
    pub event: Option<GameEvent>,
}

impl Contact {
    pub fn miss() -> Self {
        Self {
            hit: false,
            event: None,
        }
    }
}

/// Check two entities for overlap.
///
/// A hit raises a `Collision` event unless either party is an asteroid whose
/// power has already been consumed. Such an asteroid is still solid while its
/// explosion plays out, but it must not produce a second damage or score
/// notification.
pub fn detect(a: EntityRef<'_>, b: EntityRef<'_>) -> Contact {
    if !a.rect().intersects(&b.rect()) {
        return Contact::miss();
    }

    let event = if a.is_spent() || b.is_spent() {
        None
    } else {
        Some(GameEvent::Collision {
            first: a.describe(),
            second: b.describe(),
        })
    };

    Contact { hit: true, event }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Asteroid, AsteroidTint, Body, Bullet};
    use proptest::prelude::*;

    #[test]
    fn test_overlapping_rects_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_shared_edge_is_not_a_collision() {
        let a = Rect::new(0, 0, 10, 10);
        // Right edge of a == left edge of b
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));

        // Bottom edge of a == top edge of c
        let c = Rect::new(0, 10, 10, 10);
        assert!(!a.intersects(&c));

        // Corner touch only
        let d = Rect::new(10, 10, 5, 5);
        assert!(!a.intersects(&d));
    }

    #[test]
    fn test_one_pixel_overlap_is_a_collision() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(9, 9, 10, 10);
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_contained_rect_intersects() {
        let outer = Rect::new(0, 0, 100, 100);
        let inner = Rect::new(40, 40, 4, 1);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn test_empty_rect_never_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 0, 3);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_detect_raises_collision_event() {
        let bullet = Bullet::new(1, IVec2::new(10, 10));
        let asteroid = Asteroid::new(
            2,
            Body::new(IVec2::new(8, 5), IVec2::ZERO, IVec2::new(20, 20)),
            20,
            AsteroidTint::Red,
        );
        let contact = detect(EntityRef::Bullet(&bullet), EntityRef::Asteroid(&asteroid));
        assert!(contact.hit);
        assert!(matches!(contact.event, Some(GameEvent::Collision { .. })));
    }

    #[test]
    fn test_detect_suppresses_event_for_spent_asteroid() {
        let bullet = Bullet::new(1, IVec2::new(10, 10));
        let mut asteroid = Asteroid::new(
            2,
            Body::new(IVec2::new(8, 5), IVec2::ZERO, IVec2::new(20, 20)),
            20,
            AsteroidTint::Blue,
        );
        assert!(asteroid.start_explosion());

        let contact = detect(EntityRef::Bullet(&bullet), EntityRef::Asteroid(&asteroid));
        assert!(contact.hit);
        assert!(contact.event.is_none());

        let reversed = detect(EntityRef::Asteroid(&asteroid), EntityRef::Bullet(&bullet));
        assert!(reversed.hit);
        assert!(reversed.event.is_none());
    }

    #[test]
    fn test_detect_miss() {
        let bullet = Bullet::new(1, IVec2::new(500, 10));
        let asteroid = Asteroid::new(
            2,
            Body::new(IVec2::new(8, 5), IVec2::ZERO, IVec2::new(20, 20)),
            20,
            AsteroidTint::Red,
        );
        assert_eq!(
            detect(EntityRef::Bullet(&bullet), EntityRef::Asteroid(&asteroid)),
            Contact::miss()
        );
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-50i32..50, -50i32..50, 0i32..40, 0i32..40).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_intersects_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }

        #[test]
        fn prop_intersects_iff_positive_overlap(a in rect_strategy(), b in rect_strategy()) {
            let overlap_w = a.right().min(b.right()) - a.left().max(b.left());
            let overlap_h = a.bottom().min(b.bottom()) - a.top().max(b.top());
            let positive = overlap_w > 0 && overlap_h > 0 && !a.is_empty() && !b.is_empty();
            prop_assert_eq!(a.intersects(&b), positive);
        }
    }
}
