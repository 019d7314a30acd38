//! Solar position model and observer surface placement.
//!
//! Pure functions of observer latitude/longitude (degrees), time of day
//! (hours) and the observed body's world position. Axial tilt, seasons and
//! the body's orbital position are not modelled.

use std::f32::consts::{FRAC_PI_3, TAU};
use glam::Vec3;

/// Distance from the observer placement to the look target.
pub const LOOK_DISTANCE: f32 = 100.0;

/// Observer parameters for ground-observer mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverParams {
    /// Degrees, clamped to [-90, 90].
    pub latitude: f32,
    /// Degrees, clamped to [-180, 180].
    pub longitude: f32,
    /// Hours, wrapped into [0, 24).
    pub time_of_day: f32,
    pub cycle_enabled: bool,
    /// Hours of day advanced per second of simulated clock.
    pub cycle_speed: f32,
}

impl Default for ObserverParams {
    fn default() -> Self {
        Self {
            latitude: 45.0,
            longitude: 0.0,
            time_of_day: 0.0,
            cycle_enabled: true,
            cycle_speed: 0.1,
        }
    }
}

impl ObserverParams {
    pub fn set_latitude(&mut self, degrees: f32) {
        if degrees.is_finite() {
            self.latitude = degrees.clamp(-90.0, 90.0);
        }
    }

    pub fn set_longitude(&mut self, degrees: f32) {
        if degrees.is_finite() {
            self.longitude = degrees.clamp(-180.0, 180.0);
        }
    }

    pub fn set_time_of_day(&mut self, hours: f32) {
        if hours.is_finite() {
            self.time_of_day = wrap_hours(hours);
        }
    }

    pub fn set_cycle_speed(&mut self, speed: f32, max: f32) {
        if speed.is_finite() {
            self.cycle_speed = speed.clamp(0.0, max);
        }
    }

    /// Advance the clock by `cycle_speed * frame_delta` hours, wrapping at 24.
    pub fn advance_clock(&mut self, frame_delta: f32) {
        self.time_of_day = wrap_hours(self.time_of_day + self.cycle_speed * frame_delta);
    }
}

/// Wrap hours into [0, 24).
pub fn wrap_hours(hours: f32) -> f32 {
    let wrapped = hours.rem_euclid(24.0);
    // rem_euclid can round up to exactly 24.0 for tiny negative inputs
    if wrapped >= 24.0 { 0.0 } else { wrapped }
}

/// Rotation of the day: 0 at time 0, 2π at time 24.
pub fn hour_angle(time_of_day: f32) -> f32 {
    time_of_day / 24.0 * TAU
}

/// Local solar time in hours, shifted half a day so hour angle 0 is noon.
pub fn local_time(hour_angle: f32) -> f32 {
    (hour_angle / TAU * 24.0 + 12.0).rem_euclid(24.0)
}

/// Star elevation and azimuth in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarAngles {
    pub elevation: f32,
    pub azimuth: f32,
}

/// Linear elevation ramp: π/3 at local noon, 0 twelve hours away.
pub fn solar_angles(time_of_day: f32) -> SolarAngles {
    let ha = hour_angle(time_of_day);
    let hours_from_midday = (local_time(ha) - 12.0).abs();
    SolarAngles {
        elevation: FRAC_PI_3 * (1.0 - hours_from_midday / 12.0),
        azimuth: ha,
    }
}

/// Simulated star position around the observed body.
pub fn star_position(observed_world: Vec3, time_of_day: f32, star_distance: f32) -> Vec3 {
    let SolarAngles { elevation, azimuth } = solar_angles(time_of_day);
    observed_world
        + star_distance
            * Vec3::new(
                elevation.cos() * azimuth.sin(),
                elevation.sin(),
                elevation.cos() * azimuth.cos(),
            )
}

/// Observer point in the body's local frame (translation only).
pub fn observer_local_position(params: &ObserverParams, radius: f32, offset: Vec3) -> Vec3 {
    let lat = params.latitude.to_radians();
    let long = params.longitude.to_radians();
    let spin = long + hour_angle(params.time_of_day);
    Vec3::new(
        lat.cos() * spin.cos() * (radius + offset.x),
        lat.sin() * (radius + offset.y),
        lat.cos() * spin.sin() * (radius + offset.z),
    )
}

/// Where the observer camera goes and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverPlacement {
    pub position: Vec3,
    pub target: Vec3,
}

/// Place the observer on the body surface, looking toward the star if known,
/// else outward along the local radial direction.
pub fn place_observer(
    params: &ObserverParams,
    body_world: Vec3,
    radius: f32,
    offset: Vec3,
    star: Option<Vec3>,
) -> ObserverPlacement {
    let position = body_world + observer_local_position(params, radius, offset);
    let direction = star
        .map(|s| (s - position).normalize_or_zero())
        .filter(|d| *d != Vec3::ZERO)
        .unwrap_or_else(|| (position - body_world).normalize_or_zero());
    ObserverPlacement {
        position,
        target: position + direction * LOOK_DISTANCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn elevation_is_max_at_time_zero() {
        let angles = solar_angles(0.0);
        assert_eq!(angles.elevation, FRAC_PI_3);
        assert_eq!(angles.azimuth, 0.0);
    }

    #[test]
    fn elevation_is_zero_twelve_hours_from_noon() {
        assert!(solar_angles(12.0).elevation.abs() < EPS);
    }

    #[test]
    fn elevation_ramps_linearly() {
        assert!((solar_angles(6.0).elevation - FRAC_PI_3 * 0.5).abs() < EPS);
        assert!((solar_angles(18.0).elevation - FRAC_PI_3 * 0.5).abs() < EPS);
        for i in 0..48 {
            let e = solar_angles(i as f32 * 0.5).elevation;
            assert!((-EPS..=FRAC_PI_3 + EPS).contains(&e));
        }
    }

    #[test]
    fn local_time_is_shifted_half_a_day() {
        assert!((local_time(0.0) - 12.0).abs() < EPS);
        assert!((local_time(std::f32::consts::PI)).abs() < EPS);
    }

    #[test]
    fn star_sits_at_fixed_distance() {
        let body = Vec3::new(50.0, 0.0, 0.0);
        for t in [0.0, 3.0, 7.5, 12.0, 23.9] {
            let star = star_position(body, t, 300.0);
            assert!((star.distance(body) - 300.0).abs() < 1e-2);
        }
        let noon = star_position(body, 0.0, 300.0);
        assert!(noon.abs_diff_eq(
            body + 300.0 * Vec3::new(0.0, FRAC_PI_3.sin(), FRAC_PI_3.cos()),
            1e-3
        ));
    }

    #[test]
    fn observer_at_45_degrees_on_body_at_50() {
        let params = ObserverParams {
            latitude: 45.0,
            longitude: 0.0,
            time_of_day: 0.0,
            ..Default::default()
        };
        let offset = Vec3::new(0.2, 0.1, 0.2);
        let local = observer_local_position(&params, 2.0, offset);
        assert!(local.abs_diff_eq(Vec3::new(1.5556349, 1.4849242, 0.0), EPS), "{:?}", local);

        let placement = place_observer(&params, Vec3::new(50.0, 0.0, 0.0), 2.0, offset, None);
        assert!(placement
            .position
            .abs_diff_eq(Vec3::new(51.5556349, 1.4849242, 0.0), 1e-4));
    }

    #[test]
    fn placement_looks_at_star_when_known() {
        let params = ObserverParams::default();
        let body = Vec3::new(50.0, 0.0, 0.0);
        let star = star_position(body, params.time_of_day, 300.0);
        let p = place_observer(&params, body, 2.0, Vec3::ZERO, Some(star));
        let look = (p.target - p.position).normalize();
        let to_star = (star - p.position).normalize();
        assert!(look.abs_diff_eq(to_star, EPS));
        assert!((p.target.distance(p.position) - LOOK_DISTANCE).abs() < 1e-3);
    }

    #[test]
    fn placement_looks_outward_without_star() {
        let params = ObserverParams::default();
        let body = Vec3::new(0.0, 0.0, 80.0);
        let p = place_observer(&params, body, 7.0, Vec3::ZERO, None);
        let look = (p.target - p.position).normalize();
        let radial = (p.position - body).normalize();
        assert!(look.abs_diff_eq(radial, EPS));
    }

    #[test]
    fn setters_clamp_and_wrap() {
        let mut params = ObserverParams::default();
        params.set_latitude(120.0);
        params.set_longitude(-400.0);
        params.set_time_of_day(-1.0);
        params.set_cycle_speed(10.0, 2.0);
        assert_eq!(params.latitude, 90.0);
        assert_eq!(params.longitude, -180.0);
        assert!((params.time_of_day - 23.0).abs() < EPS);
        assert_eq!(params.cycle_speed, 2.0);
        params.set_latitude(f32::NAN);
        assert_eq!(params.latitude, 90.0);
    }

    #[test]
    fn clock_wraps_at_24() {
        let mut params = ObserverParams {
            time_of_day: 23.999,
            cycle_speed: 1.0,
            ..Default::default()
        };
        params.advance_clock(0.016);
        assert!(params.time_of_day < 1.0);
        assert!(params.time_of_day >= 0.0);
    }
}
