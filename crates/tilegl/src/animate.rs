//! Hover interpolator for the light-glow tile.
//!
//! Every tick moves each animated scalar a fixed fraction of its remaining
//! distance toward the target, an exponential approach that never quite
//! arrives. Convergence is a function of tick count, not wall time. The
//! animator reports itself `active` only while the rig is measurably away
//! from its target, so the host stops scheduling frames once the motion
//! settles and resumes on the next pointer transition.

use crate::params::LightRig;

/// Fraction of the remaining distance covered per tick.
pub const EASE_RATE: f32 = 0.05;
/// Below this per-component distance the rig counts as settled.
const SETTLE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone)]
pub struct HoverAnimator {
    current: LightRig,
    resting: LightRig,
    hover: LightRig,
    hovering: bool,
}

impl HoverAnimator {
    pub fn new(resting: LightRig, hover: LightRig) -> Self {
        Self {
            current: resting,
            resting,
            hover,
            hovering: false,
        }
    }

    /// Current rig values to feed the uniforms.
    pub fn current(&self) -> &LightRig {
        &self.current
    }

    pub fn hovering(&self) -> bool {
        self.hovering
    }

    /// Pointer entered the trigger element; ease toward the hover rig.
    pub fn pointer_enter(&mut self) {
        self.hovering = true;
    }

    /// Pointer left; ease back toward the resting rig.
    pub fn pointer_leave(&mut self) {
        self.hovering = false;
    }

    fn target(&self) -> &LightRig {
        if self.hovering {
            &self.hover
        } else {
            &self.resting
        }
    }

    /// True while the rig still needs per-frame ticks.
    pub fn active(&self) -> bool {
        !settled(&self.current, self.target())
    }

    /// Advances every animated value one step toward its target and reports
    /// whether anything moved. At the fixed point this is a no-op, so
    /// re-invoking it there leaves the rig bit-for-bit unchanged.
    pub fn tick(&mut self) -> bool {
        let target = *self.target();
        if settled(&self.current, &target) {
            return false;
        }
        for (light, goal) in self.current.lights.iter_mut().zip(target.lights) {
            for axis in 0..2 {
                light.position[axis] += (goal.position[axis] - light.position[axis]) * EASE_RATE;
            }
            for channel in 0..3 {
                light.color[channel] += (goal.color[channel] - light.color[channel]) * EASE_RATE;
            }
            light.intensity += (goal.intensity - light.intensity) * EASE_RATE;
        }
        true
    }
}

fn settled(current: &LightRig, target: &LightRig) -> bool {
    current
        .lights
        .iter()
        .zip(&target.lights)
        .all(|(light, goal)| {
            light
                .position
                .iter()
                .zip(goal.position)
                .all(|(a, b)| (a - b).abs() < SETTLE_EPSILON)
                && light
                    .color
                    .iter()
                    .zip(goal.color)
                    .all(|(a, b)| (a - b).abs() < SETTLE_EPSILON)
                && (light.intensity - goal.intensity).abs() < SETTLE_EPSILON
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::LightRig;

    fn animator() -> HoverAnimator {
        HoverAnimator::new(LightRig::resting(), LightRig::hover())
    }

    #[test]
    fn idle_at_rest_until_pointer_enters() {
        let mut animator = animator();
        assert!(!animator.active());
        assert!(!animator.tick());
        assert_eq!(animator.current(), &LightRig::resting());

        animator.pointer_enter();
        assert!(animator.active());
        assert!(animator.tick());
    }

    #[test]
    fn tick_is_idempotent_at_the_fixed_point() {
        let mut animator = animator();
        animator.pointer_enter();
        // Exponential approach: drive until the rig settles.
        let mut ticks = 0;
        while animator.tick() {
            ticks += 1;
            assert!(ticks < 10_000, "animator failed to settle");
        }
        let settled_rig = *animator.current();
        assert!(!animator.active());
        animator.tick();
        assert_eq!(animator.current(), &settled_rig);
    }

    #[test]
    fn converges_toward_hover_then_back() {
        let mut animator = animator();
        animator.pointer_enter();
        for _ in 0..400 {
            animator.tick();
        }
        let hover = LightRig::hover();
        let light = animator.current().lights[0];
        assert!((light.position[0] - hover.lights[0].position[0]).abs() < 1e-3);

        animator.pointer_leave();
        assert!(animator.active());
        for _ in 0..400 {
            animator.tick();
        }
        let resting = LightRig::resting();
        let light = animator.current().lights[0];
        assert!((light.position[0] - resting.lights[0].position[0]).abs() < 1e-3);
    }

    #[test]
    fn single_tick_moves_five_percent() {
        let mut animator = animator();
        animator.pointer_enter();
        let before = animator.current().lights[0].position[0];
        let goal = LightRig::hover().lights[0].position[0];
        animator.tick();
        let after = animator.current().lights[0].position[0];
        assert!((after - (before + (goal - before) * EASE_RATE)).abs() < 1e-7);
    }

    #[test]
    fn retargeting_mid_flight_does_not_snap() {
        let mut animator = animator();
        animator.pointer_enter();
        for _ in 0..10 {
            animator.tick();
        }
        let mid = animator.current().lights[0].position[0];
        animator.pointer_leave();
        animator.tick();
        let next = animator.current().lights[0].position[0];
        // One tick after retargeting only moves 5% back, no jump.
        assert!((next - mid).abs() < (mid - LightRig::resting().lights[0].position[0]).abs());
    }
}
