mod common;
mod point;
mod spectrum;
mod vector;

pub use common::{FloatValueType, Maxi, Mini, ValueType};
pub use point::{point3, Point3};
pub use spectrum::Spectrum;
pub use vector::{vec2, vec3, Vec2, Vec3};
