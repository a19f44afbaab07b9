use approx::assert_relative_eq;
use cashflow_xirr::cashflow::{load_cashflows, load_series};
use cashflow_xirr::xirr::{Bracket, ResidualEvaluator, SolverConfig, SolverObserver, Termination, XirrSolver};
use cashflow_xirr::{xirr, xnpv, CashFlow};
use chrono::{Duration, NaiveDate};
use std::path::Path;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// -100 on 2019-01-01 followed by `amount` one 365-day year later
fn one_year(amount: f64) -> Vec<CashFlow> {
    let start = date(2019, 1, 1);
    vec![
        CashFlow::new(start, -100.0),
        CashFlow::new(start + Duration::days(365), amount),
    ]
}

#[test]
fn one_year_two_flow_rates() {
    let cases = [
        (200.0, 100.0),
        (100.0, 0.0),
        (112.0, 12.0),
        (50.0, -50.0),
        (0.0, -100.0),
        (-50.0, -150.0),
    ];

    for (amount, expected) in cases {
        let got = xirr(&one_year(amount)).unwrap();
        assert_eq!(got, expected, "amount {}", amount);
    }
}

#[test]
fn eleven_day_hold() {
    let flows = vec![
        CashFlow::new(date(2019, 1, 1), -100.0),
        CashFlow::new(date(2019, 1, 12), 101.0),
    ];
    assert_eq!(xirr(&flows).unwrap(), 39.12);
}

#[test]
fn converged_rates_satisfy_the_residual() {
    let config = SolverConfig::default();
    let solver = XirrSolver::new(config.clone());
    let series = vec![
        one_year(200.0),
        one_year(112.0),
        one_year(50.0),
        vec![
            CashFlow::new(date(2019, 1, 1), -1000.0),
            CashFlow::new(date(2019, 4, 1), -500.0),
            CashFlow::new(date(2019, 10, 1), 300.0),
            CashFlow::new(date(2020, 6, 30), 1400.0),
        ],
    ];

    for flows in &series {
        let solution = solver.solve(flows).unwrap();
        assert_eq!(solution.termination, Termination::Converged);

        let evaluator = ResidualEvaluator::new(flows, config.tolerance);
        let residual = evaluator.evaluate(solution.rate);
        assert!(residual.abs() < config.tolerance, "residual {}", residual);
        assert_relative_eq!(residual, solution.residual);
    }
}

#[test]
fn repeated_solves_are_identical() {
    let flows = vec![
        CashFlow::new(date(2019, 6, 1), -100.0),
        CashFlow::new(date(2019, 1, 1), -50.0),
        CashFlow::new(date(2020, 6, 1), 170.0),
    ];
    let solver = XirrSolver::default();

    let first = solver.solve(&flows).unwrap();
    for _ in 0..5 {
        assert_eq!(solver.solve(&flows).unwrap(), first);
    }
}

#[test]
fn sign_follows_growth() {
    assert!(xirr(&one_year(130.0)).unwrap() > 0.0);
    assert!(xirr(&one_year(75.0)).unwrap() < 0.0);

    let loss = vec![
        CashFlow::new(date(2019, 1, 1), -1000.0),
        CashFlow::new(date(2019, 7, 2), 900.0),
    ];
    assert!(xirr(&loss).unwrap() < 0.0);
}

#[test]
fn non_finite_samples_never_leak() {
    // Fractional exponents make every rate below -100% NaN and -100% itself infinite
    let flows = vec![
        CashFlow::new(date(2019, 1, 1), -100.0),
        CashFlow::new(date(2019, 3, 3), 0.0),
        CashFlow::new(date(2019, 8, 17), 104.0),
    ];
    let solution = XirrSolver::default().solve(&flows).unwrap();

    assert!(solution.rate.is_finite());
    assert!(solution.rate_pct.is_finite());
    assert!(solution.rate > -1.0);
}

#[test]
fn xnpv_vanishes_at_converged_rate() {
    let flows = one_year(112.0);
    let solution = XirrSolver::default().solve(&flows).unwrap();
    assert!(xnpv(&flows, solution.rate).abs() < 1e-3);
    assert_relative_eq!(xnpv(&flows, 0.0), 12.0, epsilon = 1e-12);
}

#[test]
fn narrower_bracket_still_finds_root() {
    let config = SolverConfig::default().with_rate_bounds(-50.0, 50.0);
    let solution = XirrSolver::new(config).solve(&one_year(112.0)).unwrap();
    assert_eq!(solution.rate_pct, 12.0);
}

#[test]
fn sample_file_batch() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample_cashflows.csv");
    let series = load_series(&path).expect("Failed to load sample cash flows");
    let results = XirrSolver::default().solve_batch(&series);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].id, "doubling");
    assert_eq!(results[0].result.as_ref().unwrap().rate_pct, 100.0);
    assert_eq!(results[1].id, "short-hold");
    assert_eq!(results[1].result.as_ref().unwrap().rate_pct, 39.12);

    // Semi-annual 3% coupons at par: a little above 6% annually
    let bond = results[2].result.as_ref().unwrap();
    assert!(bond.rate_pct > 5.9 && bond.rate_pct < 6.2, "bond {}", bond.rate_pct);
}

/// Keeps the bracket of the most recent pass
#[derive(Default)]
struct LastBracket {
    bracket: Option<Bracket>,
    terminated: Option<Termination>,
}

impl SolverObserver for LastBracket {
    fn on_pass_start(&mut self, _iteration: usize, bracket: Bracket, _steps: usize) {
        self.bracket = Some(bracket);
    }

    fn on_terminate(&mut self, termination: Termination, _rate: f64) {
        self.terminated = Some(termination);
    }
}

#[test]
fn zero_amount_stagnates_near_minus_one_hundred() {
    let solution = XirrSolver::default().solve(&one_year(0.0)).unwrap();

    assert_eq!(solution.termination, Termination::Stagnated);
    assert!(!solution.is_converged());
    assert_eq!(solution.rate_pct, -100.0);
}

#[test]
fn outflows_only_end_as_estimate() {
    let start = date(2019, 1, 1);
    let flows = vec![
        CashFlow::new(start, -100.0),
        CashFlow::new(start + Duration::days(200), -50.0),
    ];
    let solver = XirrSolver::default();
    let mut observer = LastBracket::default();
    let solution = solver.solve_with_observer(&flows, &mut observer).unwrap();

    assert_eq!(solution.termination, Termination::Estimated);
    assert_eq!(observer.terminated, Some(Termination::Estimated));
    assert!(!solution.is_converged());

    // No root exists: the residual stays large, only the bracket collapsed
    let last = observer.bracket.expect("at least one pass");
    assert!(last.span() < solver.config().tolerance, "span {}", last.span());
    assert_relative_eq!(solution.rate, last.midpoint());
    assert!(solution.residual.abs() > solver.config().tolerance);
}

#[test]
fn converged_solution_reports_converged() {
    let solver = XirrSolver::new(SolverConfig::default().with_tolerance(1e-6));
    assert_eq!(solver.config().tolerance, 1e-6);

    let solution = solver.solve(&one_year(112.0)).unwrap();
    assert!(solution.is_converged());
    assert!(solution.residual.abs() < 1e-6);
    assert_eq!(solution.rate_pct, 12.0);
}

#[test]
fn sample_file_as_single_series() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample_cashflows.csv");
    let flows = load_cashflows(&path).expect("Failed to load sample cash flows");

    // Series column is ignored; every row lands in one series
    assert_eq!(flows.len(), 9);
    assert_eq!(flows[0].date, date(2019, 1, 1));
    assert_eq!(flows[4].date, date(2018, 3, 15));

    let evaluator = ResidualEvaluator::new(&flows, 1e-4);
    let years = evaluator.year_fractions();
    assert_eq!(years.len(), flows.len());
    assert_eq!(years[0], 0.0);
    assert_eq!(years[1], 1.0);
    assert!(years[4] < 0.0);
}
