use crate::tracking::precision::{
    CmplxMP, DOUBLE_PRECISION, PrecisionConfig, PrecisionError, ensure_at_precision_d,
    ensure_at_uniform_precision, precision_of_vec,
};
use nalgebra::DVector;
use num_complex::Complex64;
//___________________________________TESTS____________________________________

mod tests {
    use super::*;

    fn mp(re: f64, im: f64, precision: u32) -> CmplxMP {
        CmplxMP::from_c64(Complex64::new(re, im), precision)
    }

    #[test]
    fn test_default_config() {
        let config = PrecisionConfig::default();
        assert_eq!(config.lowest_multiple_precision, 20);
        assert_eq!(config.precision_increment, 10);
    }

    #[test]
    fn test_set_precision_keeps_value_verbatim() {
        let mut z = mp(1.25, -0.5, 20);
        z.set_precision(50);
        assert_eq!(z.precision(), 50);
        assert_eq!(z.to_c64(), Complex64::new(1.25, -0.5));
        // demotion succeeds too
        z.set_precision(20);
        assert_eq!(z.precision(), 20);
    }

    #[test]
    fn test_arithmetic_round_trips_through_c64() {
        let a = Complex64::new(1.5, -2.0);
        let b = Complex64::new(-0.25, 0.75);
        let a_mp = CmplxMP::from_c64(a, 30);
        let b_mp = CmplxMP::from_c64(b, 30);

        let cases = [
            (a_mp + b_mp, a + b),
            (a_mp - b_mp, a - b),
            (a_mp * b_mp, a * b),
            (a_mp / b_mp, a / b),
            (-a_mp, -a),
        ];
        for (got, expected) in cases.iter() {
            let got = got.to_c64();
            approx::assert_relative_eq!(got.re, expected.re, max_relative = 1e-13);
            approx::assert_relative_eq!(got.im, expected.im, max_relative = 1e-13);
        }
    }

    #[test]
    fn test_transcendental_functions_match_double() {
        let z = Complex64::new(0.8, -1.3);
        let z_mp = CmplxMP::from_c64(z, 30);

        let cases = [
            (z_mp.exp(), z.exp()),
            (z_mp.ln(), z.ln()),
            (z_mp.sqrt(), z.sqrt()),
            (z_mp.powi(5), z.powi(5)),
            (z_mp.powi(-3), z.powi(-3)),
            (
                z_mp.pow(&mp(0.5, 0.25, 30)),
                z.powc(Complex64::new(0.5, 0.25)),
            ),
        ];
        for (got, expected) in cases.iter() {
            let got = got.to_c64();
            approx::assert_relative_eq!(got.re, expected.re, max_relative = 1e-12);
            approx::assert_relative_eq!(got.im, expected.im, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_norm_and_arg_cover_the_left_half_plane() {
        let z = mp(-3.0, 4.0, 20);
        approx::assert_relative_eq!(z.norm().to_f64(), 5.0, max_relative = 1e-13);
        approx::assert_relative_eq!(
            z.arg().to_f64(),
            Complex64::new(-3.0, 4.0).arg(),
            max_relative = 1e-13
        );

        let w = mp(-3.0, -4.0, 20);
        approx::assert_relative_eq!(
            w.arg().to_f64(),
            Complex64::new(-3.0, -4.0).arg(),
            max_relative = 1e-13
        );
    }

    #[test]
    fn test_ensure_at_precision_d_admits_only_the_native_precision() {
        let value = Complex64::new(1.0, 0.0);
        assert!(ensure_at_precision_d(&value, DOUBLE_PRECISION).is_ok());
        assert_eq!(
            ensure_at_precision_d(&value, 20),
            Err(PrecisionError::NonNativeDoublePrecision { requested: 20 })
        );
    }

    #[test]
    fn test_ensure_at_uniform_precision_raises_to_the_maximum() {
        let mut sample = DVector::from_vec(vec![mp(1.0, 0.0, 20), mp(2.0, 0.0, 40)]);
        let mut time = mp(0.5, 0.0, 30);
        let precision = ensure_at_uniform_precision(&mut sample, &mut time);
        assert_eq!(precision, 40);
        assert_eq!(time.precision(), 40);
        assert_eq!(precision_of_vec(&sample), 40);
    }

    #[test]
    #[should_panic(expected = "share one precision")]
    fn test_precision_of_vec_rejects_mixed_precisions() {
        let sample = DVector::from_vec(vec![mp(1.0, 0.0, 20), mp(2.0, 0.0, 30)]);
        let _ = precision_of_vec(&sample);
    }
}
