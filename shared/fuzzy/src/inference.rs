//! Mamdani inference: min conjunction, max aggregation and centroid
//! defuzzification over a sampled output universe.

use crate::rule::RuleBase;
use crate::variable::{Role, Variable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What to do when no rule fires for the given inputs.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Re-evaluate one universe step below and above every input and average
    /// the probes that fire. Fails only if neither probe fires.
    #[default]
    Probe,
    /// Fail immediately.
    Reject,
}

#[derive(thiserror::Error, Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum InferenceError {
    #[error("missing input {0:?}")]
    MissingInput(String),
    #[error("input {name:?} is not finite ({value})")]
    NonFiniteInput { name: String, value: f64 },
    #[error("no rule for output {output:?} fired")]
    NoRuleFired { output: String },
}

/// Transient state of one inference run.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Inference {
    pub output: String,
    /// Inputs after clamping to their universes.
    pub inputs: Vec<(String, f64)>,
    /// Firing strength per rule, in rule base order.
    pub firing: Vec<f64>,
    /// Clip level per output label, in definition order.
    pub activation: Vec<(String, f64)>,
    /// Aggregated output membership curve as `(x, degree)` points. For a
    /// probed result this is built from the strongest activation of each
    /// label across the probes, so its centroid need not equal `crisp`,
    /// which averages the probe centroids.
    pub aggregated: Vec<(f64, f64)>,
    pub crisp: f64,
    /// Set when the degenerate-case probe produced the result.
    pub probed: bool,
}

struct CompiledRule {
    // (input index, set index)
    clauses: Vec<(usize, usize)>,
    consequent: usize,
}

struct Pass {
    firing: Vec<f64>,
    activation: Vec<f64>,
    aggregated: Vec<(f64, f64)>,
    crisp: Option<f64>,
}

/// Inference engine for a single output variable.
pub struct Engine {
    inputs: Vec<Variable>,
    output: Variable,
    rule_base: RuleBase,
    rules: Vec<CompiledRule>,
    grid: Vec<f64>,
    samples: Vec<Vec<f64>>,
    policy: DegeneratePolicy,
}

impl Engine {
    /// Compiles `rule_base` against the available input variables. Only the
    /// variables the rules reference become inputs of the engine.
    pub fn new(
        variables: &[Variable],
        output: &Variable,
        rule_base: &RuleBase,
        policy: DegeneratePolicy,
    ) -> anyhow::Result<Engine> {
        output.validate()?;
        if output.role != Role::Consequent {
            anyhow::bail!("Output variable {:?} is not a consequent", output.name);
        }
        if rule_base.output != output.name {
            anyhow::bail!(
                "Rule base targets {:?} but the output variable is {:?}",
                rule_base.output,
                output.name
            );
        }
        if rule_base.is_empty() {
            anyhow::bail!("Rule base for {:?} is empty", output.name);
        }

        let mut inputs = vec![];
        for name in rule_base.inputs() {
            let variable = match variables.iter().find(|v| v.name == name) {
                Some(v) => v,
                None => anyhow::bail!(
                    "Rule for {:?} references unknown variable {:?}",
                    output.name,
                    name
                ),
            };
            if variable.role != Role::Antecedent {
                anyhow::bail!("Variable {:?} is not an antecedent", name);
            }
            variable.validate()?;
            inputs.push(variable.clone());
        }

        let mut rules = vec![];
        for (i, rule) in rule_base.rules.iter().enumerate() {
            if rule.when.is_empty() {
                anyhow::bail!("Rule {} for {:?} has no clauses", i, output.name);
            }
            let mut clauses = vec![];
            for clause in rule.when.iter() {
                let input = match inputs.iter().position(|v| v.name == clause.variable) {
                    Some(input) => input,
                    None => anyhow::bail!("Unknown variable {:?}", clause.variable),
                };
                let set = match inputs[input].set_index(&clause.label) {
                    Some(set) => set,
                    None => anyhow::bail!(
                        "Rule {:?} references unknown label {:?} of {:?}",
                        rule.to_string(),
                        clause.label,
                        clause.variable
                    ),
                };
                clauses.push((input, set));
            }
            let consequent = match output.set_index(&rule.then) {
                Some(set) => set,
                None => anyhow::bail!(
                    "Rule {:?} concludes unknown label {:?} of {:?}",
                    rule.to_string(),
                    rule.then,
                    output.name
                ),
            };
            rules.push(CompiledRule {
                clauses,
                consequent,
            });
        }

        Ok(Engine {
            inputs,
            grid: output.universe.points(),
            samples: output.sample(),
            output: output.clone(),
            rule_base: rule_base.clone(),
            rules,
            policy,
        })
    }

    pub fn inputs(&self) -> &[Variable] {
        &self.inputs
    }

    pub fn output(&self) -> &Variable {
        &self.output
    }

    pub fn rule_base(&self) -> &RuleBase {
        &self.rule_base
    }

    pub fn policy(&self) -> DegeneratePolicy {
        self.policy
    }

    pub fn infer(&self, inputs: &BTreeMap<String, f64>) -> Result<Inference, InferenceError> {
        let mut values = Vec::with_capacity(self.inputs.len());
        for variable in self.inputs.iter() {
            let value = *inputs
                .get(&variable.name)
                .ok_or_else(|| InferenceError::MissingInput(variable.name.clone()))?;
            if !value.is_finite() {
                return Err(InferenceError::NonFiniteInput {
                    name: variable.name.clone(),
                    value,
                });
            }
            values.push(variable.universe.clamp(value));
        }

        let pass = self.run(&values);
        if let Some(crisp) = pass.crisp {
            return Ok(self.finish(&values, pass, crisp, false));
        }

        match self.policy {
            DegeneratePolicy::Reject => Err(self.no_rule_fired()),
            DegeneratePolicy::Probe => self.probe(&values),
        }
    }

    fn probe(&self, values: &[f64]) -> Result<Inference, InferenceError> {
        let passes: Vec<Pass> = [-1.0, 1.0]
            .iter()
            .map(|direction| {
                let shifted: Vec<f64> = self
                    .inputs
                    .iter()
                    .zip(values)
                    .map(|(v, &x)| v.universe.clamp(x + direction * v.universe.step))
                    .collect();
                self.run(&shifted)
            })
            .filter(|pass| pass.crisp.is_some())
            .collect();
        if passes.is_empty() {
            return Err(self.no_rule_fired());
        }

        let crisp = passes.iter().filter_map(|p| p.crisp).sum::<f64>() / passes.len() as f64;
        log::debug!(
            "No rule for {:?} fired at {:?}, probed {} neighbours: {}",
            self.output.name,
            values,
            passes.len(),
            crisp
        );
        let firing = elementwise_max(passes.iter().map(|p| p.firing.as_slice()));
        let activation = elementwise_max(passes.iter().map(|p| p.activation.as_slice()));
        let aggregated = self.aggregate(&activation);
        let pass = Pass {
            firing,
            activation,
            aggregated,
            crisp: Some(crisp),
        };
        Ok(self.finish(values, pass, crisp, true))
    }

    fn no_rule_fired(&self) -> InferenceError {
        InferenceError::NoRuleFired {
            output: self.output.name.clone(),
        }
    }

    fn finish(&self, values: &[f64], pass: Pass, crisp: f64, probed: bool) -> Inference {
        Inference {
            output: self.output.name.clone(),
            inputs: self
                .inputs
                .iter()
                .zip(values)
                .map(|(v, &x)| (v.name.clone(), x))
                .collect(),
            firing: pass.firing,
            activation: self
                .output
                .labels()
                .zip(pass.activation)
                .map(|(label, level)| (label.to_string(), level))
                .collect(),
            aggregated: pass.aggregated,
            crisp: self.output.universe.clamp(crisp),
            probed,
        }
    }

    fn run(&self, values: &[f64]) -> Pass {
        let firing: Vec<f64> = self
            .rules
            .iter()
            .map(|rule| {
                rule.clauses
                    .iter()
                    .map(|&(input, set)| self.inputs[input].sets[set].shape.degree(values[input]))
                    .fold(1.0, f64::min)
            })
            .collect();

        let mut activation = vec![0.0; self.output.sets.len()];
        for (rule, &strength) in self.rules.iter().zip(firing.iter()) {
            activation[rule.consequent] = f64::max(activation[rule.consequent], strength);
        }

        let aggregated = self.aggregate(&activation);
        let crisp = centroid(&aggregated);
        Pass {
            firing,
            activation,
            aggregated,
            crisp,
        }
    }

    /// Pointwise max of every output set clipped at its activation. The
    /// sampled universe is refined with the points where a set crosses its
    /// clip level so the curve keeps the exact clipped shape.
    fn aggregate(&self, activation: &[f64]) -> Vec<(f64, f64)> {
        let mut xs = self.grid.clone();
        for (set, &level) in activation.iter().enumerate() {
            if level <= 0.0 || level >= 1.0 {
                continue;
            }
            let ys = &self.samples[set];
            for i in 1..self.grid.len() {
                let (y0, y1) = (ys[i - 1], ys[i]);
                if (y0 - level) * (y1 - level) < 0.0 {
                    let (x0, x1) = (self.grid[i - 1], self.grid[i]);
                    xs.push(x0 + (level - y0) / (y1 - y0) * (x1 - x0));
                }
            }
        }
        xs.sort_by(|a, b| a.total_cmp(b));
        xs.dedup();

        xs.into_iter()
            .map(|x| {
                let mut degree: f64 = 0.0;
                for (set, &level) in activation.iter().enumerate() {
                    if level > 0.0 {
                        degree = degree.max(self.sampled_degree(set, x).min(level));
                    }
                }
                (x, degree)
            })
            .collect()
    }

    fn sampled_degree(&self, set: usize, x: f64) -> f64 {
        let ys = &self.samples[set];
        let universe = &self.output.universe;
        let last = (ys.len() - 1) as f64;
        let position = ((x - universe.min) / universe.step).clamp(0.0, last);
        let i = (position.floor() as usize).min(ys.len() - 2);
        let t = position - i as f64;
        ys[i] + (ys[i + 1] - ys[i]) * t
    }
}

/// Centroid of a piecewise-linear curve, integrating each segment exactly as
/// a trapezoid. `None` when the curve encloses no area.
pub fn centroid(curve: &[(f64, f64)]) -> Option<f64> {
    let mut area = 0.0;
    let mut moment = 0.0;
    for segment in curve.windows(2) {
        let ((x1, y1), (x2, y2)) = (segment[0], segment[1]);
        let width = x2 - x1;
        if width <= 0.0 || y1 + y2 <= 0.0 {
            continue;
        }
        let a = 0.5 * width * (y1 + y2);
        let center = x1 + width * (y1 + 2.0 * y2) / (3.0 * (y1 + y2));
        area += a;
        moment += a * center;
    }
    if area > 0.0 {
        Some(moment / area)
    } else {
        None
    }
}

fn elementwise_max<'a>(rows: impl Iterator<Item = &'a [f64]>) -> Vec<f64> {
    let mut result: Vec<f64> = vec![];
    for row in rows {
        if result.is_empty() {
            result = row.to_vec();
        } else {
            for (r, &x) in result.iter_mut().zip(row) {
                *r = r.max(x);
            }
        }
    }
    result
}
