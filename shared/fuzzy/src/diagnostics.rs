use crate::controller::{Command, Controller, Evaluation, Sample};
use crate::inference::Inference;
use crate::report;
use crate::variable::{FuzzySet, Role, Universe, Variable};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct VariableSnapshot {
    pub name: String,
    pub role: Role,
    pub universe: Universe,
    pub sets: Vec<FuzzySet>,
    /// Sensor reading for inputs, defuzzified value for outputs.
    pub value: f64,
    /// Membership degree per label for inputs, clip level for outputs.
    pub degrees: Vec<(String, f64)>,
    /// Aggregated output curve, empty for inputs.
    pub aggregated: Vec<(f64, f64)>,
}

impl VariableSnapshot {
    fn input(variable: &Variable, value: f64) -> VariableSnapshot {
        VariableSnapshot {
            name: variable.name.clone(),
            role: variable.role,
            universe: variable.universe,
            sets: variable.sets.clone(),
            value,
            degrees: variable.memberships(value),
            aggregated: vec![],
        }
    }

    fn output(variable: &Variable, inference: &Inference) -> VariableSnapshot {
        VariableSnapshot {
            name: variable.name.clone(),
            role: variable.role,
            universe: variable.universe,
            sets: variable.sets.clone(),
            value: inference.crisp,
            degrees: inference.activation.clone(),
            aggregated: inference.aggregated.clone(),
        }
    }

    pub fn degree(&self, label: &str) -> Option<f64> {
        self.degrees
            .iter()
            .find(|(l, _)| l == label)
            .map(|&(_, degree)| degree)
    }
}

/// Membership state of every variable for one evaluation.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct MembershipSnapshot {
    pub variables: Vec<VariableSnapshot>,
    pub probed: bool,
}

impl MembershipSnapshot {
    pub fn capture(controller: &Controller, evaluation: &Evaluation) -> MembershipSnapshot {
        let config = controller.config();
        let mut variables: Vec<VariableSnapshot> = config
            .inputs
            .iter()
            .filter_map(|v| {
                evaluation
                    .sample
                    .get(&v.name)
                    .map(|value| VariableSnapshot::input(v, value))
            })
            .collect();
        variables.push(VariableSnapshot::output(&config.turn, &evaluation.turn));
        variables.push(VariableSnapshot::output(&config.speed, &evaluation.speed));
        MembershipSnapshot {
            variables,
            probed: evaluation.turn.probed || evaluation.speed.probed,
        }
    }

    pub fn variable(&self, name: &str) -> Option<&VariableSnapshot> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &VariableSnapshot> {
        self.variables.iter().filter(|v| v.role == Role::Antecedent)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &VariableSnapshot> {
        self.variables.iter().filter(|v| v.role == Role::Consequent)
    }
}

/// Receives evaluations on demand. Sinks must not influence control.
pub trait DiagnosticSink {
    fn emit(
        &mut self,
        sample: &Sample,
        command: &Command,
        snapshot: &MembershipSnapshot,
    ) -> anyhow::Result<()>;
}

pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _: &Sample, _: &Command, _: &MembershipSnapshot) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Record {
    pub sample: Sample,
    pub command: Command,
    pub snapshot: MembershipSnapshot,
}

/// Keeps every emitted record in memory.
#[derive(Default)]
pub struct MemorySink {
    pub records: Vec<Record>,
}

impl MemorySink {
    pub fn new() -> Self {
        Default::default()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(
        &mut self,
        sample: &Sample,
        command: &Command,
        snapshot: &MembershipSnapshot,
    ) -> anyhow::Result<()> {
        self.records.push(Record {
            sample: *sample,
            command: *command,
            snapshot: snapshot.clone(),
        });
        Ok(())
    }
}

pub const REPORT_FILE: &str = "fuzzy_report.txt";

/// Writes a text report and one SVG plot per variable into a directory,
/// overwriting the previous emission.
pub struct ReportSink {
    dir: PathBuf,
}

impl ReportSink {
    pub fn new(dir: &Path) -> ReportSink {
        ReportSink {
            dir: dir.to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn plot_path(&self, variable: &str) -> PathBuf {
        self.dir.join(format!("{variable}.svg"))
    }
}

impl DiagnosticSink for ReportSink {
    fn emit(
        &mut self,
        sample: &Sample,
        command: &Command,
        snapshot: &MembershipSnapshot,
    ) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create report directory {:?}", self.dir))?;

        let path = self.dir.join(REPORT_FILE);
        std::fs::write(&path, report::render_text(sample, command, snapshot))
            .with_context(|| format!("Failed to write {:?}", path))?;

        for variable in snapshot.variables.iter() {
            let path = self.plot_path(&variable.name);
            std::fs::write(&path, report::render_svg(variable))
                .with_context(|| format!("Failed to write {:?}", path))?;
        }

        log::debug!("Report written to {:?}", self.dir);
        Ok(())
    }
}
