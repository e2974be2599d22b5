use approx::{AbsDiffEq, RelativeEq};
use std::ops::{Add, AddAssign, Sub};

use super::{
    common::{FloatValueType, ValueType},
    vector::Vec3,
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Points.html

/// Generic three-component position
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Point3<T>
where
    T: ValueType,
{
    /// The x component of the point
    pub x: T,
    /// The y component of the point
    pub y: T,
    /// The z component of the point
    pub z: T,
}

/// Shorthand constructor for `Point3`
pub fn point3<T>(x: T, y: T, z: T) -> Point3<T>
where
    T: ValueType,
{
    Point3::new(x, y, z)
}

impl<T> Point3<T>
where
    T: ValueType,
{
    /// Constructs a new point.
    ///
    /// Has a debug assert that checks for NaNs.
    pub fn new(x: T, y: T, z: T) -> Self {
        let p = Self { x, y, z };
        debug_assert!(!p.has_nans());
        p
    }

    /// Constructs a point of zeros.
    pub fn zeros() -> Self {
        Self {
            x: T::zero(),
            y: T::zero(),
            z: T::zero(),
        }
    }

    /// Returns `true` if any component is NaN.
    pub fn has_nans(&self) -> bool {
        // Cast to f64 since it is currently the largest floating point type
        self.x.to_f64().unwrap_or(f64::NAN).is_nan()
            || self.y.to_f64().unwrap_or(f64::NAN).is_nan()
            || self.z.to_f64().unwrap_or(f64::NAN).is_nan()
    }

    /// Returns the component-wise minimum of the two points.
    pub fn min(&self, other: Self) -> Self {
        Self {
            x: self.x.mini(other.x),
            y: self.y.mini(other.y),
            z: self.z.mini(other.z),
        }
    }

    /// Returns the component-wise maximum of the two points.
    pub fn max(&self, other: Self) -> Self {
        Self {
            x: self.x.maxi(other.x),
            y: self.y.maxi(other.y),
            z: self.z.maxi(other.z),
        }
    }
}

impl<T> Point3<T>
where
    T: FloatValueType,
{
    /// Returns the distance to the other point.
    pub fn dist(&self, other: Self) -> T {
        (*self - other).len()
    }

    /// Returns the squared distance to the other point.
    pub fn dist_sqr(&self, other: Self) -> T {
        (*self - other).len_sqr()
    }
}

impl<T> Add<Vec3<T>> for Point3<T>
where
    T: ValueType,
{
    type Output = Self;

    fn add(self, other: Vec3<T>) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl<T> AddAssign<Vec3<T>> for Point3<T>
where
    T: ValueType,
{
    fn add_assign(&mut self, other: Vec3<T>) {
        self.x = self.x + other.x;
        self.y = self.y + other.y;
        self.z = self.z + other.z;
    }
}

impl<T> Sub for Point3<T>
where
    T: ValueType,
{
    type Output = Vec3<T>;

    fn sub(self, other: Self) -> Vec3<T> {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl<T> Sub<Vec3<T>> for Point3<T>
where
    T: ValueType,
{
    type Output = Self;

    fn sub(self, other: Vec3<T>) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl<T> AbsDiffEq for Point3<T>
where
    T: ValueType + AbsDiffEq,
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        T::abs_diff_eq(&self.x, &other.x, epsilon)
            && T::abs_diff_eq(&self.y, &other.y, epsilon)
            && T::abs_diff_eq(&self.z, &other.z, epsilon)
    }
}

impl<T> RelativeEq for Point3<T>
where
    T: ValueType + RelativeEq,
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        T::relative_eq(&self.x, &other.x, epsilon, max_relative)
            && T::relative_eq(&self.y, &other.y, epsilon, max_relative)
            && T::relative_eq(&self.z, &other.z, epsilon, max_relative)
    }
}
