use foundation::color::Rgb;
use foundation::geo::GeoPosition;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: GeoPosition,
}

/// Scene lighting handed to the rendering engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightingEffect {
    pub ambient: AmbientLight,
    pub point_lights: Vec<PointLight>,
}

impl Default for LightingEffect {
    /// White ambient light plus two white point lights over western Europe.
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: Rgb::WHITE,
                intensity: 1.0,
            },
            point_lights: vec![
                PointLight {
                    color: Rgb::WHITE,
                    intensity: 0.8,
                    position: GeoPosition::new(-0.144528, 49.739968, 80000.0),
                },
                PointLight {
                    color: Rgb::WHITE,
                    intensity: 0.8,
                    position: GeoPosition::new(-3.807751, 54.104682, 8000.0),
                },
            ],
        }
    }
}

/// Surface material for extruded geometry.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub ambient: f32,
    pub diffuse: f32,
    pub shininess: f32,
    pub specular_color: Rgb,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: 0.64,
            diffuse: 0.6,
            shininess: 32.0,
            specular_color: Rgb::new(51, 51, 51),
        }
    }
}
