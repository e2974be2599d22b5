#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use approx::assert_abs_diff_eq;

    use valo::capture::CubeCapture;
    use valo::math::{vec3, Spectrum};
    use valo::sh::{ShBasis, COEFF_COUNT};

    #[test]
    fn uniform_environment_projects_to_the_constant_band() {
        let mut capture = CubeCapture::new(16);
        capture.fill(Spectrum::ones());

        let basis = ShBasis::project(&capture);

        // l00 integrates to 2*sqrt(pi) for unit radiance, higher bands cancel
        let c00 = 2.0 * PI.sqrt();
        assert_abs_diff_eq!(basis.coeffs[0], Spectrum::ones() * c00, epsilon = 1e-2);
        for coeff in &basis.coeffs[1..] {
            assert_abs_diff_eq!(*coeff, Spectrum::zeros(), epsilon = 1e-2);
        }
    }

    #[test]
    fn uniform_environment_reconstructs_everywhere() {
        let mut capture = CubeCapture::new(16);
        capture.fill(Spectrum::ones() * 0.5);

        let basis = ShBasis::project(&capture);

        for dir in [
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
            vec3(0.0, 0.0, -1.0),
            vec3(1.0, 1.0, 1.0).normalized(),
        ] {
            assert_abs_diff_eq!(
                basis.radiance(dir),
                Spectrum::ones() * 0.5,
                epsilon = 1e-2
            );
        }
    }

    #[test]
    fn uniform_environment_irradiance_is_pi() {
        let mut capture = CubeCapture::new(16);
        capture.fill(Spectrum::ones());

        let basis = ShBasis::project(&capture);
        assert_abs_diff_eq!(
            basis.irradiance(vec3(0.0, 1.0, 0.0)),
            Spectrum::ones() * PI,
            epsilon = 5e-2
        );
    }

    #[test]
    fn accumulation_order_does_not_matter() {
        let mut red = ShBasis::zeros();
        red.coeffs[0] = Spectrum::new(1.0, 0.0, 0.0);
        let mut blue = ShBasis::zeros();
        blue.coeffs[0] = Spectrum::new(0.0, 0.0, 2.0);
        blue.coeffs[3] = Spectrum::ones();

        let mut forward = ShBasis::zeros();
        forward.accumulate(&red, 0.25);
        forward.accumulate(&blue, 0.5);

        let mut reverse = ShBasis::zeros();
        reverse.accumulate(&blue, 0.5);
        reverse.accumulate(&red, 0.25);

        for i in 0..COEFF_COUNT {
            assert_abs_diff_eq!(forward.coeffs[i], reverse.coeffs[i], epsilon = 1e-6);
        }
    }
}
