use nalgebra::{Unit, Vector3};
use num_traits::Float;

const ALPHA_BIT_MASK: u32 = 255 << 24;

/// Packs an rgb color with channels in [0, 1] into 0RGB form for windowed
/// display.
pub fn to_argb_u32(rgb: Vector3<f64>) -> u32 {
    let r = (rgb.x * 255.0) as u32;
    let g = (rgb.y * 255.0) as u32;
    let b = (rgb.z * 255.0) as u32;
    ALPHA_BIT_MASK | r << 16 | g << 8 | b
}

pub fn remap_value<F: Float>(num: F, domain: (F, F), range: (F, F)) -> F {
    assert!(domain.0 < domain.1, "domain values must be of the form (min, max) - range values can be swapped for this behavior");

    (num - domain.0) * (range.1 - range.0) / (domain.1 - domain.0) + range.0
}

/// Mirror reflection of an incident direction about a surface normal. The
/// result keeps the incident vector's length.
pub fn reflect(incident: &Vector3<f64>, normal: &Unit<Vector3<f64>>) -> Vector3<f64> {
    incident - 2.0 * incident.dot(normal) * normal.into_inner()
}

#[cfg(test)]
mod test {
    use super::*;

    #[allow(clippy::shadow_unrelated)]
    #[test]
    fn it_converts_color_vecs_to_u32() {
        let color = ALPHA_BIT_MASK;
        assert_eq!(to_argb_u32(Vector3::from([0.0, 0.0, 0.0])), color);
        let color = ALPHA_BIT_MASK | 255 << 16 | 255 << 8 | 255;
        assert_eq!(to_argb_u32(Vector3::from([1.0, 1.0, 1.0])), color);
        let color = ALPHA_BIT_MASK | 255;
        assert_eq!(to_argb_u32(Vector3::from([0.0, 0.0, 1.0])), color);
        let color = ALPHA_BIT_MASK | 255 << 16 | 255;
        assert_eq!(to_argb_u32(Vector3::from([1.0, 0.0, 1.0])), color);
    }

    #[test]
    fn it_maps_numbers() {
        assert_eq!(remap_value(1.0, (0.0, 1.0), (0.0, 5.0)), 5.0);
        assert_eq!(remap_value(0.5, (0.0, 1.0), (0.0, 5.0)), 2.5);
        assert_eq!(remap_value(0.0, (0.0, 4.0), (-1.0, 1.0)), -1.0);
        assert_eq!(remap_value(2.0, (0.0, 4.0), (-1.0, 1.0)), 0.0);
        assert_eq!(remap_value(-1.0, (0.0, 1.0), (0.0, 10.0)), -10.0);
        assert_eq!(remap_value(2.0, (0.0, 1.0), (0.0, 10.0)), 20.0);
    }

    #[test]
    fn it_reflects_directions() {
        let normal = Unit::new_normalize(Vector3::new(0.0, 0.0, 1.0));

        assert_eq!(
            reflect(&Vector3::new(1.0, 0.0, -1.0), &normal),
            Vector3::new(1.0, 0.0, 1.0)
        );
        assert_eq!(
            reflect(&Vector3::new(0.0, 0.0, -2.0), &normal),
            Vector3::new(0.0, 0.0, 2.0)
        );
    }
}
