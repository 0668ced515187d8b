//! End-to-end tests: declarations and requirements down to a decoded model.

mod common;

use common::{projected_models, Dpll};
use paramsat_kit::{
    Assignment, Declarations, DimacsCnf, Error, ExternalSolver, Formula, IntegerFamily,
    PConstraint, PExpression, Parameter, ParameterList, QuantifiedAtom, QuantifiedInteger,
    RequirementsList, SolverConfig,
};

fn index_range(name: &str, min: i64, max: i64) -> ParameterList {
    ParameterList::new(vec![Parameter::new(name, min, max)]).expect("valid parameter list")
}

/// A required boolean comes back true.
#[test]
fn test_required_bool_is_true() {
    let mut decls = Declarations::new();
    let x = decls.declare_bool("x").expect("declare x");
    let mut reqs = RequirementsList::new(decls);
    reqs.add(x.clone().into()).expect("add requirement");

    match reqs.solve(&Dpll).expect("solve should not error") {
        Some(solution) if solution.is_satisfiable() => {
            let state = reqs.state(solution).expect("satisfiable state");
            assert!(state.query_atom(&x));
        }
        other => panic!("Expected SAT, got {:?}", other),
    }
}

/// A restricted range with a lower bound keeps exactly the admissible values.
#[test]
fn test_restricted_range_values() {
    let mut decls = Declarations::new();
    let y = PExpression::param("y");
    let not_three = PConstraint::not_equal(y, PExpression::constant(3));
    let y = decls
        .declare_restricted_range("y", 1, 5, &not_three)
        .expect("declare y");
    let mut reqs = RequirementsList::new(decls);
    reqs.add(Formula::geq(y.clone(), 4i64).expect("comparison"))
        .expect("add requirement");

    let cnf = DimacsCnf::from_collection(&reqs.build().expect("build"));
    let thresholds: Vec<_> = y.values().skip(1).collect();
    assert_eq!(thresholds, vec![2, 4, 5]);
    let project: Vec<u32> = thresholds
        .iter()
        .map(|&v| y.geq_atom(v).variable().index())
        .collect();

    let mut values: Vec<i64> = projected_models(&cnf, &project)
        .iter()
        .map(|model| {
            // Thresholds are monotone, so the value is the highest one set.
            thresholds
                .iter()
                .zip(model)
                .filter(|(_, lit)| **lit > 0)
                .map(|(&v, _)| v)
                .max()
                .unwrap_or(1)
        })
        .collect();
    values.sort_unstable();
    assert_eq!(values, vec![4, 5]);
}

/// A restriction no value satisfies fails when the variable is declared.
#[test]
fn test_empty_restriction_rejected() {
    let mut decls = Declarations::new();
    let y = PExpression::param("y");
    let never = PConstraint::or(
        PConstraint::less(y.clone(), PExpression::constant(0)),
        PConstraint::greater(y, PExpression::constant(12)),
    );
    let result = decls.declare_restricted_range("y", 1, 5, &never);
    assert!(matches!(result, Err(Error::InvalidModel(_))));
}

/// Contradictory requirements are reported unsatisfiable.
#[test]
fn test_contradiction_is_unsat() {
    let mut decls = Declarations::new();
    let x = decls.declare_bool("x").expect("declare x");
    let mut reqs = RequirementsList::new(decls);
    reqs.add(Formula::and(vec![x.clone().into(), (!&x).into()]))
        .expect("add requirement");

    let solution = reqs
        .solve(&Dpll)
        .expect("solve should not error")
        .expect("DPLL always decides");
    assert!(!solution.is_satisfiable());
    assert!(reqs.state(solution).is_err());
}

/// A solver that cannot be started leaves the problem undecided.
#[test]
fn test_missing_solver_is_undecided() {
    let mut decls = Declarations::new();
    let x = decls.declare_bool("x").expect("declare x");
    let mut reqs = RequirementsList::new(decls);
    reqs.add(x.into()).expect("add requirement");

    let solver = ExternalSolver::new(SolverConfig {
        command: "paramsat-no-such-solver".to_string(),
        ..SolverConfig::default()
    });
    assert!(reqs.solve(&solver).expect("solve should not error").is_none());
    // The problem text is still available for inspection.
    let cnf = DimacsCnf::parse(reqs.cnf_text().expect("cnf kept")).expect("parse");
    assert_eq!(cnf.clauses.len(), 2);
}

/// `b[0] ∧ ∀ i ∈ [0, 2]: b[i] → b[i+1]` forces the whole family true.
#[test]
fn test_forall_chain() {
    let mut decls = Declarations::new();
    let b = decls
        .declare_bool_family("b", index_range("i", 0, 3))
        .expect("declare b");
    let i = PExpression::param("i");
    let chain = Formula::forall(
        index_range("i", 0, 2),
        Formula::implies(
            QuantifiedAtom::member(&b, vec![i.clone()]).into(),
            QuantifiedAtom::member(&b, vec![PExpression::sum(i, PExpression::constant(1))]).into(),
        ),
    );
    let mut reqs = RequirementsList::new(decls);
    reqs.add(QuantifiedAtom::member(&b, vec![PExpression::constant(0)]).into())
        .expect("add base");
    reqs.add(chain).expect("add chain");

    let solution = match reqs.solve(&Dpll).expect("solve should not error") {
        Some(solution) if solution.is_satisfiable() => solution,
        other => panic!("Expected SAT, got {:?}", other),
    };
    let state = reqs.state(solution).expect("satisfiable state");
    for k in 0..=3 {
        let member = state
            .query_bool_member(&b, &[PExpression::constant(k)], &Assignment::new())
            .expect("query member");
        assert!(member, "b[{k}] should be true");
    }
    // Outside the family reads as false.
    let outside = state
        .query_bool_member(&b, &[PExpression::constant(9)], &Assignment::new())
        .expect("query outside");
    assert!(!outside);
}

/// An existential over a family with all but one member excluded picks it.
#[test]
fn test_exists_picks_remaining_member() {
    let mut decls = Declarations::new();
    let b = decls
        .declare_bool_family("b", index_range("i", 0, 3))
        .expect("declare b");
    let i = PExpression::param("i");
    let member = || QuantifiedAtom::member(&b, vec![PExpression::param("i")]);
    let mut reqs = RequirementsList::new(decls);
    reqs.add(Formula::exists(index_range("i", 0, 3), member().into()))
        .expect("add exists");
    reqs.add(Formula::forall(
        index_range("i", 0, 3),
        Formula::implies(
            Formula::condition(PConstraint::not_equal(i, PExpression::constant(2))),
            member().negate().into(),
        ),
    ))
    .expect("add exclusions");

    let solution = reqs
        .solve(&Dpll)
        .expect("solve should not error")
        .expect("DPLL always decides");
    let state = reqs.state(solution).expect("satisfiable state");
    let picked: Vec<i64> = (0..=3)
        .filter(|&k| {
            state
                .query_bool_member(&b, &[PExpression::constant(k)], &Assignment::new())
                .expect("query member")
        })
        .collect();
    assert_eq!(picked, vec![2]);
}

/// `Σ_{i ∈ [0, 3]} x[i] = 2` with `x[0] ≥ 1` over 0/1 members has three
/// distinct solutions.
#[test]
fn test_quantified_sum_models() {
    let mut decls = Declarations::new();
    let x = decls
        .declare_range_family(
            "x",
            index_range("i", 0, 3),
            PExpression::constant(0),
            PExpression::constant(1),
            None,
        )
        .expect("declare x");
    let family = IntegerFamily::from(x.clone());
    let sum = QuantifiedInteger::sum(
        index_range("i", 0, 3),
        QuantifiedInteger::member(&family, vec![PExpression::param("i")]),
    );
    let first = QuantifiedInteger::member(&family, vec![PExpression::constant(0)]);

    let mut reqs = RequirementsList::new(decls);
    reqs.add(Formula::eq(sum, 2i64).expect("comparison"))
        .expect("add sum");
    reqs.add(Formula::geq(first, 1i64).expect("comparison"))
        .expect("add first");

    let cnf = DimacsCnf::from_collection(&reqs.build().expect("build"));
    let project: Vec<u32> = (0..=3)
        .map(|k| {
            x.query_var(&[k])
                .expect("member exists")
                .geq_atom(1)
                .variable()
                .index()
        })
        .collect();
    let models = projected_models(&cnf, &project);
    assert_eq!(models.len(), 3);
    for model in &models {
        assert!(model[0] > 0, "x[0] must be 1 in {:?}", model);
        assert_eq!(model.iter().filter(|&&lit| lit > 0).count(), 2);
    }

    let solution = reqs
        .solve(&Dpll)
        .expect("solve should not error")
        .expect("DPLL always decides");
    let state = reqs.state(solution).expect("satisfiable state");
    let total: i64 = (0..=3)
        .map(|k| {
            state
                .query_member(&family, &[PExpression::constant(k)], &Assignment::new())
                .expect("query member")
        })
        .sum();
    assert_eq!(total, 2);
}
