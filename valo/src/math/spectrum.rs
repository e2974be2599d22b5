use approx::{AbsDiffEq, RelativeEq};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign};

use super::common::{FloatValueType, ValueType};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Color_and_Radiometry/Spectral_Representation

/// A spectral power distribution stored as RGB
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spectrum<T>
where
    T: ValueType,
{
    /// The r component of the spd
    pub r: T,
    /// The g component of the spd
    pub g: T,
    /// The b component of the spd
    pub b: T,
}

impl<T> Spectrum<T>
where
    T: ValueType,
{
    /// Constructs a new spectrum.
    ///
    /// Has a debug assert that checks for NaNs.
    pub fn new(r: T, g: T, b: T) -> Self {
        let s = Self { r, g, b };
        debug_assert!(!s.has_nans());
        s
    }

    /// Constructs a spectrum of zeros.
    pub fn zeros() -> Self {
        Self {
            r: T::zero(),
            g: T::zero(),
            b: T::zero(),
        }
    }

    /// Constructs a spectrum of ones.
    pub fn ones() -> Self {
        Self {
            r: T::one(),
            g: T::one(),
            b: T::one(),
        }
    }

    /// Returns `true` if any component is NaN.
    pub fn has_nans(&self) -> bool {
        // Cast to f64 since it is currently the largest floating point type
        self.r.to_f64().unwrap_or(f64::NAN).is_nan()
            || self.g.to_f64().unwrap_or(f64::NAN).is_nan()
            || self.b.to_f64().unwrap_or(f64::NAN).is_nan()
    }

    /// Returns `true` if all components are zero.
    pub fn is_black(&self) -> bool {
        self.r == T::zero() && self.g == T::zero() && self.b == T::zero()
    }

    /// Returns the value of the maximum component.
    pub fn max_comp(&self) -> T {
        self.r.maxi(self.g.maxi(self.b))
    }
}

impl<T> Spectrum<T>
where
    T: FloatValueType,
{
    /// Returns `true` if all components are finite, i.e. not NaN and not infinite.
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Returns the spectrum with negative components clamped to zero.
    pub fn max_zero(&self) -> Self {
        Self {
            r: self.r.maxi(T::zero()),
            g: self.g.maxi(T::zero()),
            b: self.b.maxi(T::zero()),
        }
    }
}

impl<T> Add for Spectrum<T>
where
    T: ValueType,
{
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl<T> AddAssign for Spectrum<T>
where
    T: ValueType,
{
    fn add_assign(&mut self, other: Self) {
        self.r = self.r + other.r;
        self.g = self.g + other.g;
        self.b = self.b + other.b;
    }
}

impl<T> Mul<T> for Spectrum<T>
where
    T: ValueType,
{
    type Output = Self;

    fn mul(self, scalar: T) -> Self {
        Self {
            r: self.r * scalar,
            g: self.g * scalar,
            b: self.b * scalar,
        }
    }
}

impl<T> MulAssign<T> for Spectrum<T>
where
    T: ValueType,
{
    fn mul_assign(&mut self, scalar: T) {
        self.r = self.r * scalar;
        self.g = self.g * scalar;
        self.b = self.b * scalar;
    }
}

// Component-wise product, e.g. filtering radiance through an albedo
impl<T> Mul for Spectrum<T>
where
    T: ValueType,
{
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
        }
    }
}

impl<T> Div<T> for Spectrum<T>
where
    T: ValueType,
{
    type Output = Self;

    fn div(self, scalar: T) -> Self {
        Self {
            r: self.r / scalar,
            g: self.g / scalar,
            b: self.b / scalar,
        }
    }
}

impl<T> AbsDiffEq for Spectrum<T>
where
    T: ValueType + AbsDiffEq,
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        T::abs_diff_eq(&self.r, &other.r, epsilon)
            && T::abs_diff_eq(&self.g, &other.g, epsilon)
            && T::abs_diff_eq(&self.b, &other.b, epsilon)
    }
}

impl<T> RelativeEq for Spectrum<T>
where
    T: ValueType + RelativeEq,
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        T::relative_eq(&self.r, &other.r, epsilon, max_relative)
            && T::relative_eq(&self.g, &other.g, epsilon, max_relative)
            && T::relative_eq(&self.b, &other.b, epsilon, max_relative)
    }
}
