//! # Adaptive-Precision Refinement Module
//!
//! The endgame-side precision management protocol. Near a path's endpoint the
//! engine repeatedly asks the numeric tracker to bring an approximate sample
//! back to tolerance; when the tracker reports that it cannot (insufficient
//! precision or failed convergence), the protocol escalates the working
//! precision ONCE, retries, and then restores the precision that was active
//! on entry - on every exit path, success or failure. Restoration is defined
//! to always succeed (lowering precision cannot fail) and never masks the
//! escalated attempt's status code.
//!
//! ## Main Structures and Methods
//!
//! ### `Tracker` Trait
//! The seam to the external numeric tracker: `refine_d` / `refine_mp` bring a
//! sample to tolerance within a Newton budget, `change_precision` retunes the
//! tracker's internal arithmetic.
//!
//! ### `AmpEndgame` Struct
//! Owns a tracker plus the endgame and precision settings;
//! `refine_sample_d` / `refine_sample_mp` implement the protocol.
//!
//! ## Protocol
//! 1. refine at the entry precision with tolerance
//!    `final_tolerance * sample_point_refinement_factor`
//! 2. on success return immediately
//! 3. on `HigherPrecisionNecessary` or `FailedToConverge` escalate: the
//!    double path jumps straight to the lowest multiple tier; the multiple
//!    path goes to `max(entry, lowest_multiple) + increment`; values are
//!    promoted verbatim, never re-tracked
//! 4. retry once, restore the entry precision, demote the result, and return
//!    the retry's status unmasked

use crate::tracking::precision::{
    self, CmplxMP, DOUBLE_PRECISION, PrecisionConfig, ensure_vec_at_precision_mp,
};
use log::debug;
use nalgebra::DVector;
use num_complex::Complex64;

/// Status of a tracker operation. A result code consumed by the escalation
/// protocol, not an error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessCode {
    Success,
    HigherPrecisionNecessary,
    FailedToConverge,
    MinStepSizeReached,
    Failure,
}

impl SuccessCode {
    /// Codes the protocol answers with one precision escalation.
    pub fn warrants_escalation(&self) -> bool {
        matches!(
            self,
            SuccessCode::HigherPrecisionNecessary | SuccessCode::FailedToConverge
        )
    }
}

/// Seam to the external numeric tracker.
///
/// `change_precision` retunes the tracker's internal arithmetic; lowering the
/// precision is defined to always succeed.
pub trait Tracker {
    fn refine_d(
        &mut self,
        refined: &mut DVector<Complex64>,
        sample: &DVector<Complex64>,
        time: &Complex64,
        tolerance: f64,
        max_iterations: u32,
    ) -> SuccessCode;

    fn refine_mp(
        &mut self,
        refined: &mut DVector<CmplxMP>,
        sample: &DVector<CmplxMP>,
        time: &CmplxMP,
        tolerance: f64,
        max_iterations: u32,
    ) -> SuccessCode;

    fn change_precision(&mut self, precision: u32);

    fn precision(&self) -> u32;
}

/// Endgame refinement knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndgameSettings {
    /// tolerance the endgame ultimately certifies endpoints to
    pub final_tolerance: f64,
    /// samples are refined to `final_tolerance * this`
    pub sample_point_refinement_factor: f64,
    /// Newton budget handed to the tracker per refinement attempt
    pub max_num_newton_iterations: u32,
}

impl Default for EndgameSettings {
    fn default() -> Self {
        EndgameSettings {
            final_tolerance: 1e-11,
            sample_point_refinement_factor: 1e-2,
            max_num_newton_iterations: 15,
        }
    }
}

/// The adaptive-precision endgame refinement driver.
pub struct AmpEndgame<T: Tracker> {
    pub tracker: T,
    pub settings: EndgameSettings,
    pub precision_config: PrecisionConfig,
}

impl<T: Tracker> AmpEndgame<T> {
    pub fn new(tracker: T) -> Self {
        AmpEndgame {
            tracker,
            settings: EndgameSettings::default(),
            precision_config: PrecisionConfig::default(),
        }
    }

    pub fn with_settings(
        tracker: T,
        settings: EndgameSettings,
        precision_config: PrecisionConfig,
    ) -> Self {
        AmpEndgame {
            tracker,
            settings,
            precision_config,
        }
    }

    fn refinement_tolerance(&self) -> f64 {
        self.settings.final_tolerance * self.settings.sample_point_refinement_factor
    }

    /// Refines a double-precision sample, escalating to the lowest multiple
    /// tier when the double attempt cannot reach tolerance.
    ///
    /// The double regime has no room to increment within itself, so the one
    /// permitted escalation jumps straight to
    /// `lowest_multiple_precision`. The tracker is back at
    /// `DOUBLE_PRECISION` when this returns, and the result is demoted to a
    /// double vector on every exit path.
    pub fn refine_sample_d(
        &mut self,
        sample: &DVector<Complex64>,
        time: &Complex64,
    ) -> (SuccessCode, DVector<Complex64>) {
        let tolerance = self.refinement_tolerance();
        self.tracker.change_precision(DOUBLE_PRECISION);

        let mut refined = sample.clone();
        let code = self.tracker.refine_d(
            &mut refined,
            sample,
            time,
            tolerance,
            self.settings.max_num_newton_iterations,
        );
        if !code.warrants_escalation() {
            return (code, refined);
        }

        let higher_precision = self.precision_config.lowest_multiple_precision;
        debug!(
            "double refinement returned {:?}, escalating to precision {}",
            code, higher_precision
        );

        let sample_higher: DVector<CmplxMP> =
            sample.map(|z| CmplxMP::from_c64(z, higher_precision));
        let time_higher = CmplxMP::from_c64(*time, higher_precision);
        self.tracker.change_precision(higher_precision);

        let mut refined_higher = sample_higher.clone();
        let retry_code = self.tracker.refine_mp(
            &mut refined_higher,
            &sample_higher,
            &time_higher,
            tolerance,
            self.settings.max_num_newton_iterations,
        );

        // the entry regime comes back regardless of the retry's outcome
        self.tracker.change_precision(DOUBLE_PRECISION);
        debug!(
            "escalated refinement returned {:?}, precision restored to {}",
            retry_code, DOUBLE_PRECISION
        );
        (retry_code, refined_higher.map(|z| z.to_c64()))
    }

    /// Refines a multiple-precision sample, escalating one increment above
    /// the entry precision when the first attempt cannot reach tolerance.
    ///
    /// The tracker is back at the entry precision when this returns, and the
    /// result is demoted to that precision on every exit path. The status of
    /// the escalated attempt is returned unmasked.
    ///
    /// # Panics
    /// When the sample coordinates and the time value disagree on precision.
    pub fn refine_sample_mp(
        &mut self,
        sample: &DVector<CmplxMP>,
        time: &CmplxMP,
    ) -> (SuccessCode, DVector<CmplxMP>) {
        let entry_precision = precision::precision_of_vec(sample);
        assert_eq!(
            entry_precision,
            time.precision(),
            "sample and time must agree on precision at refinement entry"
        );

        let tolerance = self.refinement_tolerance();
        self.tracker.change_precision(entry_precision);

        let mut refined = sample.clone();
        let code = self.tracker.refine_mp(
            &mut refined,
            sample,
            time,
            tolerance,
            self.settings.max_num_newton_iterations,
        );
        if !code.warrants_escalation() {
            return (code, refined);
        }

        let higher_precision = entry_precision
            .max(self.precision_config.lowest_multiple_precision)
            + self.precision_config.precision_increment;
        debug!(
            "refinement at precision {} returned {:?}, escalating to {}",
            entry_precision, code, higher_precision
        );

        let mut sample_higher = sample.clone();
        ensure_vec_at_precision_mp(&mut sample_higher, higher_precision);
        let time_higher = time.at_precision(higher_precision);
        self.tracker.change_precision(higher_precision);

        let mut refined_higher = sample_higher.clone();
        let retry_code = self.tracker.refine_mp(
            &mut refined_higher,
            &sample_higher,
            &time_higher,
            tolerance,
            self.settings.max_num_newton_iterations,
        );

        self.tracker.change_precision(entry_precision);
        ensure_vec_at_precision_mp(&mut refined_higher, entry_precision);
        debug!(
            "escalated refinement returned {:?}, precision restored to {}",
            retry_code, entry_precision
        );
        (retry_code, refined_higher)
    }
}
