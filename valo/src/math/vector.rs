use approx::{AbsDiffEq, RelativeEq};
use num::traits::Signed;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::common::{FloatValueType, ValueType};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Vectors.html

/// Generic two-component vector
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Vec2<T>
where
    T: ValueType,
{
    /// The x component of the vector
    pub x: T,
    /// The y component of the vector
    pub y: T,
}

/// Generic three-component vector
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Vec3<T>
where
    T: ValueType,
{
    /// The x component of the vector
    pub x: T,
    /// The y component of the vector
    pub y: T,
    /// The z component of the vector
    pub z: T,
}

/// Shorthand constructor for `Vec2`
pub fn vec2<T>(x: T, y: T) -> Vec2<T>
where
    T: ValueType,
{
    Vec2::new(x, y)
}

/// Shorthand constructor for `Vec3`
pub fn vec3<T>(x: T, y: T, z: T) -> Vec3<T>
where
    T: ValueType,
{
    Vec3::new(x, y, z)
}

macro_rules! impl_vec_ops {
    ( $vec:ident { $( $c:ident ),+ } ) => {
        impl<T> Add for $vec<T>
        where
            T: ValueType,
        {
            type Output = Self;

            fn add(self, other: Self) -> Self {
                Self {
                    $( $c: self.$c + other.$c, )*
                }
            }
        }

        impl<T> Sub for $vec<T>
        where
            T: ValueType,
        {
            type Output = Self;

            fn sub(self, other: Self) -> Self {
                Self {
                    $( $c: self.$c - other.$c, )*
                }
            }
        }

        impl<T> AddAssign for $vec<T>
        where
            T: ValueType,
        {
            fn add_assign(&mut self, other: Self) {
                $( self.$c = self.$c + other.$c; )*
            }
        }

        impl<T> SubAssign for $vec<T>
        where
            T: ValueType,
        {
            fn sub_assign(&mut self, other: Self) {
                $( self.$c = self.$c - other.$c; )*
            }
        }

        impl<T> Mul<T> for $vec<T>
        where
            T: ValueType,
        {
            type Output = Self;

            fn mul(self, scalar: T) -> Self {
                Self {
                    $( $c: self.$c * scalar, )*
                }
            }
        }

        impl<T> MulAssign<T> for $vec<T>
        where
            T: ValueType,
        {
            fn mul_assign(&mut self, scalar: T) {
                $( self.$c = self.$c * scalar; )*
            }
        }

        impl<T> Div<T> for $vec<T>
        where
            T: ValueType,
        {
            type Output = Self;

            fn div(self, scalar: T) -> Self {
                Self {
                    $( $c: self.$c / scalar, )*
                }
            }
        }

        impl<T> DivAssign<T> for $vec<T>
        where
            T: ValueType,
        {
            fn div_assign(&mut self, scalar: T) {
                $( self.$c = self.$c / scalar; )*
            }
        }

        impl<T> Neg for $vec<T>
        where
            T: ValueType + Signed,
        {
            type Output = Self;

            fn neg(self) -> Self {
                Self {
                    $( $c: -self.$c, )*
                }
            }
        }

        impl<T> AbsDiffEq for $vec<T>
        where
            T: ValueType + AbsDiffEq,
            T::Epsilon: Copy,
        {
            type Epsilon = T::Epsilon;

            fn default_epsilon() -> Self::Epsilon {
                T::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
                $( T::abs_diff_eq(&self.$c, &other.$c, epsilon) )&&*
            }
        }

        impl<T> RelativeEq for $vec<T>
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
                $( T::relative_eq(&self.$c, &other.$c, epsilon, max_relative) )&&*
            }
        }
    }
}
impl_vec_ops!(Vec2 { x, y });
impl_vec_ops!(Vec3 { x, y, z });

impl<T> Vec2<T>
where
    T: ValueType,
{
    /// Constructs a new vector.
    ///
    /// Has a debug assert that checks for NaNs.
    pub fn new(x: T, y: T) -> Self {
        let v = Self { x, y };
        debug_assert!(!v.has_nans());
        v
    }

    /// Constructs a vector of zeros.
    pub fn zeros() -> Self {
        Self {
            x: T::zero(),
            y: T::zero(),
        }
    }

    /// Constructs a vector of ones.
    pub fn ones() -> Self {
        Self {
            x: T::one(),
            y: T::one(),
        }
    }

    /// Returns `true` if any component is NaN.
    pub fn has_nans(&self) -> bool {
        // Cast to f64 since it is currently the largest floating point type
        self.x.to_f64().unwrap_or(f64::NAN).is_nan() || self.y.to_f64().unwrap_or(f64::NAN).is_nan()
    }
}

impl<T> Vec3<T>
where
    T: ValueType,
{
    /// Constructs a new vector.
    ///
    /// Has a debug assert that checks for NaNs.
    pub fn new(x: T, y: T, z: T) -> Self {
        let v = Self { x, y, z };
        debug_assert!(!v.has_nans());
        v
    }

    /// Constructs a vector of zeros.
    pub fn zeros() -> Self {
        Self {
            x: T::zero(),
            y: T::zero(),
            z: T::zero(),
        }
    }

    /// Constructs a vector of ones.
    pub fn ones() -> Self {
        Self {
            x: T::one(),
            y: T::one(),
            z: T::one(),
        }
    }

    /// Returns `true` if any component is NaN.
    pub fn has_nans(&self) -> bool {
        // Cast to f64 since it is currently the largest floating point type
        self.x.to_f64().unwrap_or(f64::NAN).is_nan()
            || self.y.to_f64().unwrap_or(f64::NAN).is_nan()
            || self.z.to_f64().unwrap_or(f64::NAN).is_nan()
    }

    /// Returns the dot product of the two vectors.
    pub fn dot(&self, other: Self) -> T {
        debug_assert!(!self.has_nans());
        debug_assert!(!other.has_nans());

        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the vector's squared length.
    pub fn len_sqr(&self) -> T {
        self.dot(*self)
    }

    /// Returns the component-wise minimum of the two vectors.
    pub fn min(&self, other: Self) -> Self {
        Self {
            x: self.x.mini(other.x),
            y: self.y.mini(other.y),
            z: self.z.mini(other.z),
        }
    }

    /// Returns the component-wise maximum of the two vectors.
    pub fn max(&self, other: Self) -> Self {
        Self {
            x: self.x.maxi(other.x),
            y: self.y.maxi(other.y),
            z: self.z.maxi(other.z),
        }
    }
}

impl<T> Vec3<T>
where
    T: FloatValueType,
{
    /// Returns the vector's length.
    pub fn len(&self) -> T {
        self.len_sqr().sqrt()
    }

    /// Returns the normalized vector.
    pub fn normalized(&self) -> Self {
        *self / self.len()
    }

    /// Returns the cross product of the two vectors.
    //
    // Always uses `f64` internally to avoid errors on "catastrophic cancellation".
    // http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Vectors.html#DotandCrossProduct
    pub fn cross(&self, other: Self) -> Self {
        debug_assert!(!self.has_nans());
        debug_assert!(!other.has_nans());

        let v1x = self.x.to_f64().unwrap_or(f64::NAN);
        let v1y = self.y.to_f64().unwrap_or(f64::NAN);
        let v1z = self.z.to_f64().unwrap_or(f64::NAN);
        let v2x = other.x.to_f64().unwrap_or(f64::NAN);
        let v2y = other.y.to_f64().unwrap_or(f64::NAN);
        let v2z = other.z.to_f64().unwrap_or(f64::NAN);
        Self {
            x: T::from((v1y * v2z) - (v1z * v2y)).unwrap(),
            y: T::from((v1z * v2x) - (v1x * v2z)).unwrap(),
            z: T::from((v1x * v2y) - (v1y * v2x)).unwrap(),
        }
    }
}
