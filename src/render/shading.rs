//! Flat lighting and exponential fog.

use image::Rgb;

use crate::vec3::Point3;

/// A single positional light, in eye coordinates.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Light {
    pub position: Point3,
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Point3::new(2.0, 0.0, 5.0),
            ambient: 0.0,
            diffuse: 1.0,
            specular: 1.0,
        }
    }
}

/// Reflectance of every surface. Ambient and diffuse scale the face color,
/// specular is white.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Material {
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: 0.7,
            diffuse: 0.8,
            specular: 1.0,
            shininess: 100.0,
        }
    }
}

/// Lit color of a face.
///
/// `normal` need not be unit length; `point` is the shaded position and the
/// eye sits at the origin.
pub fn shade(color: Rgb<u8>, normal: Point3, point: Point3, light: &Light, material: &Material) -> [f64; 3] {
    let n = normal.unit();
    let l = (light.position - point).unit();
    let v = point.inverse().unit();

    let lambert = n.dot(&l).max(0.0);
    let diffuse = light.ambient * material.ambient + light.diffuse * material.diffuse * lambert;
    let specular = if lambert > 0.0 {
        let h = (l + v).unit();
        light.specular * material.specular * n.dot(&h).max(0.0).powf(material.shininess)
    } else {
        0.0
    };

    let mut out = [0.0; 3];
    for (c, &channel) in out.iter_mut().zip(color.0.iter()) {
        *c = (f64::from(channel) / 255.0 * diffuse + specular).min(1.0);
    }
    out
}

/// Blends `lit` toward `fog` by `exp(-density * distance)`.
pub fn fog(lit: [f64; 3], fog: Rgb<u8>, density: f64, distance: f64) -> Rgb<u8> {
    let f = (-density * distance).exp().max(0.0).min(1.0);

    let mut out = [0u8; 3];
    for ((c, &l), &g) in out.iter_mut().zip(lit.iter()).zip(fog.0.iter()) {
        let value = f * l + (1.0 - f) * f64::from(g) / 255.0;
        *c = (value * 255.0).round().max(0.0).min(255.0) as u8;
    }
    Rgb(out)
}

#[test]
fn facing_light_is_lit() {
    let light = Light {
        position: Point3::new(0.0, 0.0, 0.0),
        ..Light::default()
    };
    let material = Material {
        specular: 0.0,
        ..Material::default()
    };

    let lit = shade(Rgb([255, 0, 0]), Point3::new(0.0, 0.0, 4.0), Point3::new(0.0, 0.0, -5.0), &light, &material);
    assert!((lit[0] - 0.8).abs() < 1e-9);
    assert_eq!(0.0, lit[1]);
}

#[test]
fn facing_away_gets_only_ambient() {
    let light = Light {
        position: Point3::new(0.0, 0.0, 0.0),
        ambient: 0.5,
        ..Light::default()
    };
    let material = Material::default();

    let lit = shade(Rgb([255, 255, 255]), Point3::new(0.0, 0.0, -1.0), Point3::new(0.0, 0.0, -5.0), &light, &material);
    assert!((lit[0] - 0.35).abs() < 1e-9);
}

#[test]
fn zero_normal_does_not_poison_color() {
    let lit = shade(Rgb([255, 255, 255]), Point3::default(), Point3::new(0.0, 0.0, -5.0), &Light::default(), &Material::default());
    assert!(lit.iter().all(|c| c.is_finite()));
}

#[test]
fn fog_fades_with_distance() {
    let white = [1.0; 3];
    let black = Rgb([0, 0, 0]);

    assert_eq!(Rgb([255, 255, 255]), fog(white, black, 0.05, 0.0));
    assert_eq!(Rgb([0, 0, 0]), fog(white, black, 0.05, 1e6));

    let near = fog(white, black, 0.05, 10.0);
    let far = fog(white, black, 0.05, 20.0);
    assert!(near[0] > far[0]);
}
