use crate::membership::Shape;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Discretized numeric domain of a variable.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Universe {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Universe {
    pub fn new(min: f64, max: f64, step: f64) -> Universe {
        Universe { min, max, step }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || !self.step.is_finite() {
            anyhow::bail!("Universe {:?} is not finite", self);
        }
        if self.min >= self.max {
            anyhow::bail!("Universe {:?} is empty", self);
        }
        if self.step <= 0.0 {
            anyhow::bail!("Universe {:?} has a non-positive step", self);
        }
        if self.step > self.max - self.min {
            anyhow::bail!("Universe {:?} is coarser than its range", self);
        }
        let steps = (self.max - self.min) / self.step;
        if (steps - steps.round()).abs() > 1e-6 * steps.max(1.0) {
            anyhow::bail!("Universe {:?} range is not a whole number of steps", self);
        }
        Ok(())
    }

    pub fn num_points(&self) -> usize {
        ((self.max - self.min) / self.step).round() as usize + 1
    }

    pub fn points(&self) -> Vec<f64> {
        (0..self.num_points())
            .map(|i| (self.min + i as f64 * self.step).min(self.max))
            .collect()
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Antecedent,
    Consequent,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct FuzzySet {
    pub label: String,
    pub shape: Shape,
}

/// A universe plus its labelled fuzzy sets.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub role: Role,
    pub universe: Universe,
    pub sets: Vec<FuzzySet>,
}

impl Variable {
    pub fn antecedent(name: &str, universe: Universe) -> Variable {
        Variable {
            name: name.to_string(),
            role: Role::Antecedent,
            universe,
            sets: vec![],
        }
    }

    pub fn consequent(name: &str, universe: Universe) -> Variable {
        Variable {
            name: name.to_string(),
            role: Role::Consequent,
            universe,
            sets: vec![],
        }
    }

    pub fn define_set(&mut self, label: &str, shape: Shape) -> anyhow::Result<()> {
        if self.set_index(label).is_some() {
            anyhow::bail!("Duplicate label {:?} in variable {:?}", label, self.name);
        }
        shape
            .validate()
            .with_context(|| format!("Set {:?} of variable {:?}", label, self.name))?;
        self.sets.push(FuzzySet {
            label: label.to_string(),
            shape,
        });
        Ok(())
    }

    /// Builder form of [`Variable::define_set`].
    pub fn with_set(mut self, label: &str, shape: Shape) -> anyhow::Result<Variable> {
        self.define_set(label, shape)?;
        Ok(self)
    }

    /// Checks a variable that may have been deserialized without going
    /// through `define_set`.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.universe
            .validate()
            .with_context(|| format!("Variable {:?}", self.name))?;
        if self.sets.is_empty() {
            anyhow::bail!("Variable {:?} has no sets", self.name);
        }
        for (i, set) in self.sets.iter().enumerate() {
            if self.sets[..i].iter().any(|other| other.label == set.label) {
                anyhow::bail!("Duplicate label {:?} in variable {:?}", set.label, self.name);
            }
            set.shape
                .validate()
                .with_context(|| format!("Set {:?} of variable {:?}", set.label, self.name))?;
        }
        Ok(())
    }

    pub fn set_index(&self, label: &str) -> Option<usize> {
        self.sets.iter().position(|set| set.label == label)
    }

    pub fn set(&self, label: &str) -> Option<&FuzzySet> {
        self.sets.iter().find(|set| set.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|set| set.label.as_str())
    }

    /// Degree of `x` (clamped to the universe) in the set named `label`.
    pub fn membership_of(&self, label: &str, x: f64) -> Option<f64> {
        self.set(label)
            .map(|set| set.shape.degree(self.universe.clamp(x)))
    }

    pub fn memberships(&self, x: f64) -> Vec<(String, f64)> {
        let x = self.universe.clamp(x);
        self.sets
            .iter()
            .map(|set| (set.label.clone(), set.shape.degree(x)))
            .collect()
    }

    /// Samples every set over the universe, one row per set.
    pub fn sample(&self) -> Vec<Vec<f64>> {
        let points = self.universe.points();
        self.sets
            .iter()
            .map(|set| points.iter().map(|&x| set.shape.degree(x)).collect())
            .collect()
    }
}
