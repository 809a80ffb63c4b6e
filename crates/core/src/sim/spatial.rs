//! Circle-collider queries over the entity arena. Dead entities do not collide.

use super::World;
use crate::types::{EntityId, LayerMask, Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub entity: EntityId,
    pub distance: f32,
    pub point: Vec2,
}

/// Distance along a unit `direction` to the first point inside the circle, if within `max_distance`.
pub(crate) fn ray_circle_distance(
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    center: Vec2,
    radius: f32,
) -> Option<f32> {
    let to_center = center - origin;
    let radius_sq = radius * radius;
    if to_center.length_squared() <= radius_sq {
        return Some(0.0);
    }
    let along = to_center.dot(direction);
    if along < 0.0 {
        return None;
    }
    let closest_sq = to_center.length_squared() - along * along;
    if closest_sq > radius_sq {
        return None;
    }
    let distance = along - (radius_sq - closest_sq).sqrt();
    (distance <= max_distance).then_some(distance)
}

impl World {
    /// Nearest live entity on `mask` hit by the ray, skipping `ignore`.
    pub fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        range: f32,
        mask: LayerMask,
        ignore: Option<EntityId>,
    ) -> Option<RayHit> {
        self.sweep(origin, direction, range, 0.0, mask, ignore)
    }

    /// Like [`World::raycast`] but for a moving circle of `thickness` radius.
    pub(crate) fn sweep(
        &self,
        origin: Vec2,
        direction: Vec2,
        range: f32,
        thickness: f32,
        mask: LayerMask,
        ignore: Option<EntityId>,
    ) -> Option<RayHit> {
        let direction = direction.normalized()?;
        self.entities
            .iter()
            .filter(|(id, entity)| {
                Some(*id) != ignore && mask.contains(entity.layer) && !entity.is_dead()
            })
            .filter_map(|(id, entity)| {
                let distance = ray_circle_distance(
                    origin,
                    direction,
                    range,
                    entity.position,
                    entity.radius + thickness,
                )?;
                Some(RayHit { entity: id, distance, point: origin + direction * distance })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Every live entity on `mask` whose collider overlaps the circle, in arena order.
    pub fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, entity)| mask.contains(entity.layer) && !entity.is_dead())
            .filter(|(_, entity)| {
                let reach = radius + entity.radius;
                (entity.position - center).length_squared() <= reach * reach
            })
            .map(|(id, _)| id)
            .collect()
    }
}
