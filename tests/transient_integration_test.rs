//! Integration tests for transient analysis of reactive circuits.

use amspice::analysis::{self, TranResult};
use amspice::parser;
use amspice::solver::{GaussJordanSolver, NewtonParams};
use approx::assert_abs_diff_eq;

/// Helper: parse + transient solve
fn tran_solve(netlist: &str) -> TranResult {
    let netlist = parser::parse(netlist).expect("parse failed");
    let params = NewtonParams {
        seed: Some(42),
        ..Default::default()
    };
    analysis::transient::run(&netlist, &GaussJordanSolver::new(), &params, None)
        .expect("transient analysis failed")
}

/// Find the waveform for an output column by label.
fn find_column(result: &TranResult, label: &str) -> Vec<f64> {
    result
        .column(label)
        .unwrap_or_else(|| panic!("column {} not found", label))
}

/// Largest deviation between a waveform and `expected(t)`.
fn max_error(result: &TranResult, label: &str, expected: impl Fn(f64) -> f64) -> f64 {
    result
        .times()
        .iter()
        .zip(find_column(result, label))
        .map(|(&t, v)| (v - expected(t)).abs())
        .fold(0.0, f64::max)
}

fn rc_netlist(order: u32) -> String {
    format!(
        "\
rc step
V1 1 0 DC 10
R1 1 2 1e3
C1 2 0 1e-6 IC=0
.TRAN 5e-3 1e-4 ADMO{order} 10 UIC
"
    )
}

#[test]
fn test_rc_charging() {
    // tau = 1 ms. With UIC the initial condition is imposed one sub-step
    // before t=0 and each sample is recorded after its last sub-step, so
    // sample k sits one full step after t_k on the analytic curve.
    let tau = 1e-3;
    let step = 1e-4;
    for order in 1..=4 {
        let result = tran_solve(&rc_netlist(order));
        assert_eq!(result.samples.len(), 51);
        let err = max_error(&result, "2", |t| 10.0 * (1.0 - (-(t + step) / tau).exp()));
        assert!(err < 0.05, "order {order}: max error {err}");

        let last = *find_column(&result, "2").last().unwrap();
        assert_abs_diff_eq!(last, 9.94, epsilon = 0.01);
    }
}

#[test]
fn test_rc_source_current_matches_resistor() {
    let result = tran_solve(&rc_netlist(2));
    let v2 = find_column(&result, "2");
    let j = find_column(&result, "jV1");
    for (v, i) in v2.iter().zip(&j) {
        // Source current flows out of the + terminal, hence negative.
        assert_abs_diff_eq!(*i, -(10.0 - v) / 1e3, epsilon = 1e-9);
    }
}

#[test]
fn test_rl_current_rise() {
    // L/R = 1 ms, final current 10 mA.
    for order in 1..=4 {
        let result = tran_solve(&format!(
            "\
rl step
V1 1 0 DC 10
R1 1 2 1e3
L1 2 0 1 IC=0
.TRAN 5e-3 1e-4 ADMO{order} 10 UIC
"
        ));
        assert_eq!(result.labels, vec!["1", "2", "jV1", "jL1"]);
        let err = max_error(&result, "jL1", |t| 1e-2 * (1.0 - (-(t + 1e-4) / 1e-3).exp()));
        assert!(err < 5e-5, "order {order}: max error {err}");
        let err = max_error(&result, "2", |t| 10.0 * (-(t + 1e-4) / 1e-3).exp());
        assert!(err < 0.05, "order {order}: max error {err}");
    }
}

/// RC low-pass driven by a 1 kHz sine from rest; returns the worst deviation
/// from the exact response.
fn sine_rc_error(order: u32) -> f64 {
    let result = tran_solve(&format!(
        "\
sine rc
V1 1 0 SIN 0 1 1e3 0 0 0 100
R1 1 2 1e3
C1 2 0 1e-6
.TRAN 3e-3 1e-4 ADMO{order} 10 UIC
"
    ));
    let tau = 1e-3;
    let w = 2.0 * std::f64::consts::PI * 1e3;
    let wt = w * tau;
    let exact = |t: f64| {
        ((w * t).sin() - wt * (w * t).cos() + wt * (-t / tau).exp()) / (1.0 + wt * wt)
    };
    // Recorded after the last of 10 sub-steps of 1e-5.
    max_error(&result, "2", |t| exact(t + 9e-6))
}

#[test]
fn test_higher_orders_are_more_accurate() {
    let errors: Vec<f64> = (1..=4).map(sine_rc_error).collect();
    assert!(errors[0] < 1e-2, "order 1: {}", errors[0]);
    assert!(errors[1] < 2e-4, "order 2: {}", errors[1]);
    assert!(errors[1] * 10.0 < errors[0], "errors: {errors:?}");
    assert!(errors[2] < errors[1], "errors: {errors:?}");
    assert!(errors[3] < 1e-4, "order 4: {}", errors[3]);
}

#[test]
fn test_capacitor_initial_voltage_discharge() {
    let result = tran_solve(
        "\
rc discharge
C1 1 0 1e-6 IC=5
R1 1 0 1e3
.TRAN 3e-3 1e-4 ADMO1 10 UIC
",
    );
    let err = max_error(&result, "1", |t| 5.0 * (-(t + 1e-4) / 1e-3).exp());
    assert!(err < 0.02, "max error {err}");
}

#[test]
fn test_inductor_initial_current_decay() {
    let result = tran_solve(
        "\
rl decay
L1 1 0 1 IC=0.01
R1 1 0 1e3
.TRAN 3e-3 1e-4 ADMO2 10 UIC
",
    );
    let err = max_error(&result, "jL1", |t| 0.01 * (-(t + 1e-4) / 1e-3).exp());
    assert!(err < 1e-5, "max error {err}");
}

#[test]
fn test_initial_conditions_ignored_without_uic() {
    let result = tran_solve(
        "\
no uic
C1 1 0 1e-6 IC=5
R1 1 0 1e3
.TRAN 1e-3 1e-4 ADMO1 10
",
    );
    for v in find_column(&result, "1") {
        assert_abs_diff_eq!(v, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn test_pulse_source_levels() {
    let result = tran_solve(
        "\
pulse
V1 1 0 PULSE 0 1 1e-3 0 0 2e-3 10e-3 1
R1 1 0 1e3
.TRAN 4e-3 5e-4 ADMO1 1
",
    );
    let v = find_column(&result, "1");
    assert_abs_diff_eq!(v[1], 0.0, epsilon = 1e-12);
    for k in 3..=5 {
        assert_abs_diff_eq!(v[k], 1.0, epsilon = 1e-12);
    }
    assert_abs_diff_eq!(v[7], 0.0, epsilon = 1e-12);
}

#[test]
fn test_invalid_integration_order() {
    for order in [5, 300] {
        let netlist = parser::parse(&rc_netlist(order)).unwrap();
        let err = analysis::transient::run(
            &netlist,
            &GaussJordanSolver::new(),
            &NewtonParams::default(),
            None,
        )
        .unwrap_err();
        assert!(
            matches!(err, amspice::error::AmspiceError::InvalidIntegrationMethod(o) if o == order),
            "got: {err}"
        );
    }
}
