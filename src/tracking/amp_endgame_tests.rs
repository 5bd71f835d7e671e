use crate::tracking::amp_endgame::{AmpEndgame, SuccessCode, Tracker};
use crate::tracking::precision::{CmplxMP, DOUBLE_PRECISION};
use nalgebra::DVector;
use num_complex::Complex64;
//___________________________________TESTS____________________________________

mod tests {
    use super::*;

    /// Tracker whose refine outcomes follow a fixed script; records the
    /// precision active at every refine call.
    struct ScriptedTracker {
        script: Vec<SuccessCode>,
        next: usize,
        precision: u32,
        refine_precisions: Vec<u32>,
    }

    impl ScriptedTracker {
        fn new(script: Vec<SuccessCode>) -> Self {
            ScriptedTracker {
                script,
                next: 0,
                precision: DOUBLE_PRECISION,
                refine_precisions: Vec::new(),
            }
        }

        fn next_code(&mut self) -> SuccessCode {
            let code = self.script[self.next];
            self.next += 1;
            code
        }
    }

    impl Tracker for ScriptedTracker {
        fn refine_d(
            &mut self,
            refined: &mut DVector<Complex64>,
            sample: &DVector<Complex64>,
            _time: &Complex64,
            _tolerance: f64,
            _max_iterations: u32,
        ) -> SuccessCode {
            self.refine_precisions.push(self.precision);
            *refined = sample.clone();
            self.next_code()
        }

        fn refine_mp(
            &mut self,
            refined: &mut DVector<CmplxMP>,
            sample: &DVector<CmplxMP>,
            _time: &CmplxMP,
            _tolerance: f64,
            _max_iterations: u32,
        ) -> SuccessCode {
            self.refine_precisions.push(self.precision);
            *refined = sample.clone();
            self.next_code()
        }

        fn change_precision(&mut self, precision: u32) {
            self.precision = precision;
        }

        fn precision(&self) -> u32 {
            self.precision
        }
    }

    fn mp_sample(precision: u32) -> (DVector<CmplxMP>, CmplxMP) {
        let sample = DVector::from_vec(vec![
            CmplxMP::from_c64(Complex64::new(1.25, -0.5), precision),
            CmplxMP::from_c64(Complex64::new(-2.0, 0.75), precision),
        ]);
        let time = CmplxMP::from_c64(Complex64::new(0.01, 0.0), precision);
        (sample, time)
    }

    #[test]
    fn test_mp_success_without_escalation() {
        let mut endgame = AmpEndgame::new(ScriptedTracker::new(vec![SuccessCode::Success]));
        let (sample, time) = mp_sample(30);
        let (code, refined) = endgame.refine_sample_mp(&sample, &time);

        assert_eq!(code, SuccessCode::Success);
        assert_eq!(endgame.tracker.refine_precisions, vec![30]);
        assert_eq!(endgame.tracker.precision(), 30);
        assert!(refined.iter().all(|z| z.precision() == 30));
    }

    #[test]
    fn test_mp_escalation_restores_precision_on_success() {
        let mut endgame = AmpEndgame::new(ScriptedTracker::new(vec![
            SuccessCode::HigherPrecisionNecessary,
            SuccessCode::Success,
        ]));
        let (sample, time) = mp_sample(30);
        let (code, refined) = endgame.refine_sample_mp(&sample, &time);

        assert_eq!(code, SuccessCode::Success);
        // first try at 30, retry at max(30, 20) + 10
        assert_eq!(endgame.tracker.refine_precisions, vec![30, 40]);
        assert_eq!(endgame.tracker.precision(), 30);
        assert!(refined.iter().all(|z| z.precision() == 30));
    }

    #[test]
    fn test_mp_escalation_restores_precision_on_failure() {
        let mut endgame = AmpEndgame::new(ScriptedTracker::new(vec![
            SuccessCode::FailedToConverge,
            SuccessCode::FailedToConverge,
        ]));
        let (sample, time) = mp_sample(30);
        let (code, refined) = endgame.refine_sample_mp(&sample, &time);

        // the escalated attempt's failure is returned unmasked
        assert_eq!(code, SuccessCode::FailedToConverge);
        assert_eq!(endgame.tracker.precision(), 30);
        assert!(refined.iter().all(|z| z.precision() == 30));
    }

    #[test]
    fn test_mp_escalates_at_most_once() {
        let mut endgame = AmpEndgame::new(ScriptedTracker::new(vec![
            SuccessCode::HigherPrecisionNecessary,
            SuccessCode::HigherPrecisionNecessary,
        ]));
        let (sample, time) = mp_sample(50);
        let (code, _) = endgame.refine_sample_mp(&sample, &time);

        assert_eq!(code, SuccessCode::HigherPrecisionNecessary);
        // entry 50, single escalation to max(50, 20) + 10, no third attempt
        assert_eq!(endgame.tracker.refine_precisions, vec![50, 60]);
        assert_eq!(endgame.tracker.precision(), 50);
    }

    #[test]
    fn test_mp_terminal_failure_is_not_escalated() {
        let mut endgame =
            AmpEndgame::new(ScriptedTracker::new(vec![SuccessCode::Failure]));
        let (sample, time) = mp_sample(30);
        let (code, _) = endgame.refine_sample_mp(&sample, &time);

        assert_eq!(code, SuccessCode::Failure);
        assert_eq!(endgame.tracker.refine_precisions, vec![30]);
    }

    #[test]
    #[should_panic(expected = "agree on precision")]
    fn test_mp_precision_mismatch_is_contract_violation() {
        let mut endgame = AmpEndgame::new(ScriptedTracker::new(vec![SuccessCode::Success]));
        let (sample, _) = mp_sample(30);
        let time = CmplxMP::from_c64(Complex64::new(0.01, 0.0), 40);
        let _ = endgame.refine_sample_mp(&sample, &time);
    }

    #[test]
    fn test_double_success_without_escalation() {
        let mut endgame = AmpEndgame::new(ScriptedTracker::new(vec![SuccessCode::Success]));
        let sample = DVector::from_vec(vec![Complex64::new(1.0, 0.0)]);
        let time = Complex64::new(0.1, 0.0);
        let (code, _) = endgame.refine_sample_d(&sample, &time);

        assert_eq!(code, SuccessCode::Success);
        assert_eq!(endgame.tracker.refine_precisions, vec![DOUBLE_PRECISION]);
        assert_eq!(endgame.tracker.precision(), DOUBLE_PRECISION);
    }

    #[test]
    fn test_double_escalation_jumps_to_lowest_multiple_tier() {
        let mut endgame = AmpEndgame::new(ScriptedTracker::new(vec![
            SuccessCode::HigherPrecisionNecessary,
            SuccessCode::Success,
        ]));
        let sample = DVector::from_vec(vec![
            Complex64::new(1.0, -0.25),
            Complex64::new(0.5, 0.5),
        ]);
        let time = Complex64::new(0.1, 0.0);
        let (code, refined) = endgame.refine_sample_d(&sample, &time);

        assert_eq!(code, SuccessCode::Success);
        // the double regime cannot increment within itself
        assert_eq!(
            endgame.tracker.refine_precisions,
            vec![DOUBLE_PRECISION, 20]
        );
        assert_eq!(endgame.tracker.precision(), DOUBLE_PRECISION);
        // the promoted values round-trip back to the input sample
        for (got, expected) in refined.iter().zip(sample.iter()) {
            approx::assert_relative_eq!(got.re, expected.re, max_relative = 1e-12);
            approx::assert_relative_eq!(got.im, expected.im, max_relative = 1e-12);
        }
    }
}
