// the collection of utility functions: console logging setup and the
// finite-difference helpers used to validate symbolic derivatives

use log::LevelFilter;
use num_complex::Complex64;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

/// Initializes console logging at the given level.
///
/// Safe to call more than once; a second initialization is silently ignored.
pub fn init_console_logging(loglevel: &str) {
    let log_option = match loglevel {
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => panic!("loglevel must be debug, info, warn or error"),
    };
    let _ = CombinedLogger::init(vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    let mut values = Vec::with_capacity(num_values);
    let step = (end - start) / (num_values as f64 - 1.0);

    for i in 0..num_values {
        let value = start + (i as f64 * step);
        values.push(value);
    }

    values
}

/// Central-difference derivative of a complex function of one complex
/// argument, stepped along the real axis.
pub fn numerical_derivative<F>(f: F, x_values: Vec<Complex64>, h: f64) -> Vec<Complex64>
where
    F: Fn(Complex64) -> Complex64,
{
    let step = Complex64::new(h, 0.0);
    let mut derivatives = Vec::with_capacity(x_values.len());

    for &x in &x_values {
        let f_x_plus_h = f(x + step);
        let f_x_minus_h = f(x - step);
        let derivative = (f_x_plus_h - f_x_minus_h) / (2.0 * step);
        derivatives.push(derivative);
    }

    derivatives
}

/// Central-difference partial derivatives of a complex function of several
/// complex arguments, one per argument position.
pub fn numerical_derivative_multi<F>(
    f: F,
    x_values: Vec<Complex64>,
    h: f64,
) -> Vec<Complex64>
where
    F: Fn(Vec<Complex64>) -> Complex64,
{
    let step = Complex64::new(h, 0.0);
    let mut derivatives = Vec::with_capacity(x_values.len());
    for i in 0..x_values.len() {
        let mut x_plus_h = x_values.clone();
        let mut x_minus_h = x_values.clone();

        x_plus_h[i] += step;
        x_minus_h[i] -= step;

        let f_x_plus_h = f(x_plus_h);
        let f_x_minus_h = f(x_minus_h);

        let derivative = (f_x_plus_h - f_x_minus_h) / (2.0 * step);
        derivatives.push(derivative);
    }

    derivatives
}
