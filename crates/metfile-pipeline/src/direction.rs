//! Wind speed and direction from horizontal velocity components.

/// The value of pi used by the GRAL tools when converting to degrees.
const GRAL_PI: f64 = 3.14;

/// Horizontal wind speed.
pub fn wind_speed(u: f32, v: f32) -> f32 {
    (u * u + v * v).sqrt()
}

/// Meteorological wind direction (the direction the wind blows from), in
/// whole degrees.
///
/// The angle is taken from `atan(u / v)`, not `atan2`, rounded half-to-even
/// to an integer and then mapped by quadrant. `v == 0` starts from 90
/// degrees. The quadrant tests run in this order and are mutually
/// exclusive:
///
/// | condition | direction |
/// |-----------|-----------|
/// | v > 0, u <= 0 | 180 - a |
/// | v >= 0, u > 0 | 180 + a |
/// | v < 0, u >= 0 | 360 - a |
/// | otherwise | a |
pub fn wind_direction(u: f32, v: f32) -> f32 {
    let base = if v == 0.0 {
        90.0
    } else {
        let degrees = f64::from(u / v).atan().abs() * 180.0 / GRAL_PI;
        degrees.round_ties_even() as f32
    };

    if v > 0.0 && u <= 0.0 {
        180.0 - base
    } else if v >= 0.0 && u > 0.0 {
        180.0 + base
    } else if v < 0.0 && u >= 0.0 {
        360.0 - base
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_southerly_flow_is_180() {
        // wind blowing towards north comes from the south
        assert_eq!(wind_direction(0.0, 1.0), 180.0);
    }

    #[test]
    fn test_easterly_component_is_270() {
        // v == 0 starts at 90, u > 0 adds 180
        assert_eq!(wind_direction(1.0, 0.0), 270.0);
    }

    #[test]
    fn test_westward_flow_with_zero_v() {
        assert_eq!(wind_direction(-1.0, 0.0), 90.0);
    }

    #[test]
    fn test_calm_is_90() {
        assert_eq!(wind_direction(0.0, 0.0), 90.0);
    }

    #[test]
    fn test_northerly_flow() {
        assert_eq!(wind_direction(0.0, -1.0), 360.0);
    }

    #[test]
    fn test_quadrants() {
        // 45 degrees with pi = 3.14 -> 45.07 -> 45
        assert_eq!(wind_direction(1.0, 1.0), 225.0);
        assert_eq!(wind_direction(-1.0, 1.0), 135.0);
        assert_eq!(wind_direction(1.0, -1.0), 315.0);
        assert_eq!(wind_direction(-1.0, -1.0), 45.0);
    }

    #[test]
    fn test_direction_is_whole_degrees() {
        let direction = wind_direction(0.3, 1.7);
        assert_eq!(direction.fract(), 0.0);
        // atan(0.176) -> 10.01 with pi = 3.14
        assert_eq!(direction, 190.0);
    }

    #[test]
    fn test_speed() {
        assert_eq!(wind_speed(3.0, 4.0), 5.0);
        assert_eq!(wind_speed(0.0, 0.0), 0.0);
    }
}
