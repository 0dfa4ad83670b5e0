//! Player locomotion, weapon state and health regeneration.

use std::{f32::consts::FRAC_1_SQRT_2, time::Duration};

use gridfire_core::{
    normalize_angle, GridMap, MovementIntent, PlayerSnapshot, WeaponDescriptor, WorldPoint,
};

use crate::config::PlayerConfig;

#[derive(Clone, Debug)]
pub(crate) struct Player {
    position: WorldPoint,
    angle: f32,
    health: i32,
    max_health: i32,
    shot: bool,
    reloading: bool,
    reload_frame: usize,
    reload_clock: Duration,
    regen_clock: Duration,
}

impl Player {
    pub(crate) fn new(config: &PlayerConfig) -> Self {
        Self {
            position: config.start,
            angle: normalize_angle(config.angle),
            health: config.max_health,
            max_health: config.max_health,
            shot: false,
            reloading: false,
            reload_frame: 0,
            reload_clock: Duration::ZERO,
            regen_clock: Duration::ZERO,
        }
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            angle: self.angle,
            health: self.health,
            max_health: self.max_health,
            shot_pending: self.shot,
            reloading: self.reloading,
        }
    }

    pub(crate) fn shot_pending(&self) -> bool {
        self.shot
    }

    /// Applies translation with per-axis wall probes, then rotation.
    ///
    /// Returns the previous position when the position or heading changed.
    pub(crate) fn apply_movement(
        &mut self,
        intent: &MovementIntent,
        config: &PlayerConfig,
        grid: &GridMap,
    ) -> Option<WorldPoint> {
        let dt_ms = intent.dt.as_secs_f32() * 1_000.0;
        if dt_ms <= 0.0 {
            return None;
        }

        let from = self.position;
        let previous_angle = self.angle;

        let forward = intent.forward.clamp(-1.0, 1.0);
        let strafe = intent.strafe.clamp(-1.0, 1.0);
        let speed = config.speed * dt_ms;
        let (sin, cos) = self.angle.sin_cos();
        let mut dx = forward * speed * cos - strafe * speed * sin;
        let mut dy = forward * speed * sin + strafe * speed * cos;
        if forward != 0.0 && strafe != 0.0 {
            dx *= FRAC_1_SQRT_2;
            dy *= FRAC_1_SQRT_2;
        }

        let scale = config.size_scale / dt_ms;
        let probe_x = WorldPoint::new(self.position.x() + dx * scale, self.position.y());
        if !grid.is_wall(probe_x.cell()) {
            self.position = self.position.translated(dx, 0.0);
        }
        let probe_y = WorldPoint::new(self.position.x(), self.position.y() + dy * scale);
        if !grid.is_wall(probe_y.cell()) {
            self.position = self.position.translated(0.0, dy);
        }

        let turn = intent.turn.clamp(-1.0, 1.0) * config.rotation_speed * dt_ms;
        let look = intent
            .look_delta
            .clamp(-config.max_look_delta, config.max_look_delta)
            * config.look_sensitivity
            * dt_ms;
        self.angle = normalize_angle(self.angle + turn + look);

        if self.position != from || self.angle != previous_angle {
            Some(from)
        } else {
            None
        }
    }

    pub(crate) fn angle(&self) -> f32 {
        self.angle
    }

    pub(crate) fn position(&self) -> WorldPoint {
        self.position
    }

    /// Arms a shot unless one is pending or the weapon is reloading.
    pub(crate) fn try_fire(&mut self) -> bool {
        if self.shot || self.reloading {
            return false;
        }
        self.shot = true;
        self.reloading = true;
        self.reload_frame = 0;
        self.reload_clock = Duration::ZERO;
        true
    }

    pub(crate) fn clear_shot(&mut self) {
        self.shot = false;
    }

    /// Steps the reload animation and reports whether reloading just finished.
    pub(crate) fn advance_reload(&mut self, dt: Duration, weapon: &WeaponDescriptor) -> bool {
        if !self.reloading {
            return false;
        }

        self.reload_clock = self.reload_clock.saturating_add(dt);
        if self.reload_clock <= weapon.frame_time() {
            return false;
        }
        self.reload_clock = Duration::ZERO;
        self.reload_frame += 1;
        if self.reload_frame < weapon.reload_frames {
            return false;
        }

        self.reloading = false;
        self.reload_frame = 0;
        true
    }

    /// Returns the new health when a regeneration point was granted.
    pub(crate) fn regenerate(&mut self, dt: Duration, delay: Duration) -> Option<i32> {
        self.regen_clock = self.regen_clock.saturating_add(dt);
        if self.regen_clock <= delay {
            return None;
        }
        self.regen_clock = Duration::ZERO;
        if self.health >= self.max_health {
            return None;
        }
        self.health += 1;
        Some(self.health)
    }

    pub(crate) fn take_damage(&mut self, amount: i32) -> i32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }
}
