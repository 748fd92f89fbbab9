#[cfg(test)]
#[path = "../../tests/unit/solver/backend_test.rs"]
mod backend_test;

use crate::utils::compare_floats;
use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Variable};

/// An identifier of a column managed by an LP backend.
pub type VarId = usize;

/// An identifier of a row managed by an LP backend.
pub type RowId = usize;

/// Specifies a kind of an LP column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VariableKind {
    /// A continuous variable.
    Continuous,
    /// A general integer variable.
    Integer,
    /// A zero-one variable.
    Binary,
}

/// Specifies the outcome of an LP solve.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LpStatus {
    /// An optimal solution was found.
    Optimal,
    /// The constraints admit no solution.
    Infeasible,
    /// The objective is unbounded from below.
    Unbounded,
    /// The backend ran into numerical trouble.
    NumericalFailure,
}

/// An adapter to an external linear programming solver.
///
/// The formulation pushes columns and rows through this trait, invokes
/// [`LpBackend::solve`] and reads variable values back. Rows may be added
/// after a solve to tighten the model before the next one. Implementations
/// own the native solver handle and must release it on every exit path.
pub trait LpBackend {
    /// Adds a column with the given kind, bounds and objective coefficient.
    fn add_column(&mut self, kind: VariableKind, lower: f64, upper: f64, objective: f64) -> VarId;

    /// Adds a row constraining the weighted sum of columns to `[lower, upper]`.
    fn add_row(&mut self, lower: f64, upper: f64, coefficients: &[(VarId, f64)]) -> RowId;

    /// Solves the current model.
    fn solve(&mut self) -> LpStatus;

    /// Returns the value of the column in the last solved model.
    fn value(&self, var: VarId) -> f64;

    /// Returns the objective value of the last solved model.
    fn objective_value(&self) -> f64;
}

const INTEGRALITY_EPSILON: f64 = 1e-5;

/// A mixed integer backend over the pure rust `minilp` simplex solver.
///
/// Every solve rebuilds the relaxation from the stored columns and rows and
/// then runs a depth first branch and bound on the fractional integer
/// columns: each branch splits on the most fractional column, explores the
/// closest integer side first and prunes on the incumbent objective.
#[derive(Default)]
pub struct SimplexBackend {
    columns: Vec<Column>,
    rows: Vec<Row>,
    values: Vec<f64>,
    objective: f64,
}

struct Column {
    kind: VariableKind,
    lower: f64,
    upper: f64,
    objective: f64,
}

struct Row {
    lower: f64,
    upper: f64,
    coefficients: Vec<(VarId, f64)>,
}

impl SimplexBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn build_relaxation(&self) -> (minilp::Problem, Vec<Variable>) {
        let mut problem = minilp::Problem::new(OptimizationDirection::Minimize);

        let variables = self
            .columns
            .iter()
            .map(|column| problem.add_var(column.objective, (column.lower, column.upper)))
            .collect::<Vec<_>>();

        for row in self.rows.iter() {
            let expression = || {
                let mut expression = LinearExpr::empty();
                row.coefficients.iter().for_each(|&(var, coefficient)| expression.add(variables[var], coefficient));
                expression
            };

            if (row.lower - row.upper).abs() < INTEGRALITY_EPSILON {
                problem.add_constraint(expression(), ComparisonOp::Eq, row.lower);
            } else {
                if row.lower.is_finite() {
                    problem.add_constraint(expression(), ComparisonOp::Ge, row.lower);
                }
                if row.upper.is_finite() {
                    problem.add_constraint(expression(), ComparisonOp::Le, row.upper);
                }
            }
        }

        (problem, variables)
    }

    /// Returns the most fractional integer column of the solution, if any.
    fn choose_branch_column(&self, solution: &minilp::Solution, variables: &[Variable]) -> Option<(usize, f64)> {
        let divergence = |value: f64| (value - value.round()).abs();

        self.columns
            .iter()
            .enumerate()
            .filter(|&(_, column)| column.kind != VariableKind::Continuous)
            .map(|(index, _)| (index, solution[variables[index]]))
            .filter(|&(_, value)| divergence(value) > INTEGRALITY_EPSILON)
            .max_by(|&(_, left), &(_, right)| compare_floats(divergence(left), divergence(right)))
    }

    fn snapshot(&mut self, solution: &minilp::Solution, variables: &[Variable]) {
        self.values = variables.iter().map(|&variable| solution[variable]).collect();
        self.objective = solution.objective();
    }
}

enum Branch {
    Floor(f64),
    Ceil(f64),
}

struct Step {
    start: minilp::Solution,
    column: usize,
    branches: [Branch; 2],
    next_branch: usize,
}

impl Step {
    fn new(start: minilp::Solution, column: usize, value: f64) -> Self {
        // explore the closest integer side first to reach good incumbents early
        let (floor, ceil) = (Branch::Floor(value.floor()), Branch::Ceil(value.ceil()));
        let branches = if value - value.floor() < 0.5 { [floor, ceil] } else { [ceil, floor] };

        Self { start, column, branches, next_branch: 0 }
    }
}

impl LpBackend for SimplexBackend {
    fn add_column(&mut self, kind: VariableKind, lower: f64, upper: f64, objective: f64) -> VarId {
        assert!(lower <= upper, "column bounds are inverted");

        self.columns.push(Column { kind, lower, upper, objective });
        self.columns.len() - 1
    }

    fn add_row(&mut self, lower: f64, upper: f64, coefficients: &[(VarId, f64)]) -> RowId {
        assert!(coefficients.iter().all(|&(var, _)| var < self.columns.len()), "row refers to an unknown column");

        self.rows.push(Row { lower, upper, coefficients: coefficients.to_vec() });
        self.rows.len() - 1
    }

    fn solve(&mut self) -> LpStatus {
        self.values.clear();
        self.objective = 0.;

        if self.columns.is_empty() {
            return LpStatus::Optimal;
        }

        let (problem, variables) = self.build_relaxation();
        let relaxed = match problem.solve() {
            Ok(solution) => solution,
            Err(minilp::Error::Infeasible) => return LpStatus::Infeasible,
            Err(minilp::Error::Unbounded) => return LpStatus::Unbounded,
        };

        let Some((column, value)) = self.choose_branch_column(&relaxed, &variables) else {
            self.snapshot(&relaxed, &variables);
            return LpStatus::Optimal;
        };

        let mut incumbent: Option<(f64, minilp::Solution)> = None;
        let mut stack = vec![Step::new(relaxed, column, value)];

        while let Some(step) = stack.last_mut() {
            if step.next_branch == step.branches.len() {
                stack.pop();
                continue;
            }

            let branch = &step.branches[step.next_branch];
            step.next_branch += 1;

            let variable = variables[step.column];
            let mut expression = LinearExpr::empty();
            expression.add(variable, 1.);
            let branched = match branch {
                Branch::Floor(bound) => step.start.clone().add_constraint(expression, ComparisonOp::Le, *bound),
                Branch::Ceil(bound) => step.start.clone().add_constraint(expression, ComparisonOp::Ge, *bound),
            };

            // an infeasible branch is simply abandoned
            let Ok(solution) = branched else { continue };

            let objective = solution.objective();
            if incumbent.as_ref().is_some_and(|(best, _)| objective > *best) {
                continue;
            }

            match self.choose_branch_column(&solution, &variables) {
                Some((column, value)) => stack.push(Step::new(solution, column, value)),
                None => {
                    if incumbent.as_ref().is_none_or(|(best, _)| objective < *best) {
                        incumbent = Some((objective, solution));
                    }
                }
            }
        }

        match incumbent {
            Some((_, solution)) => {
                self.snapshot(&solution, &variables);
                LpStatus::Optimal
            }
            None => LpStatus::Infeasible,
        }
    }

    fn value(&self, var: VarId) -> f64 {
        self.values.get(var).copied().unwrap_or(0.)
    }

    fn objective_value(&self) -> f64 {
        self.objective
    }
}
