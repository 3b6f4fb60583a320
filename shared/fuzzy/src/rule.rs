use serde::{Deserialize, Serialize};
use std::fmt;

/// Selects one fuzzy set of one input variable.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Clause {
    pub variable: String,
    pub label: String,
}

impl Clause {
    pub fn new(variable: &str, label: &str) -> Clause {
        Clause {
            variable: variable.to_string(),
            label: label.to_string(),
        }
    }
}

/// Conjunction of clauses implying one label of the output variable.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Rule {
    pub when: Vec<Clause>,
    pub then: String,
}

impl Rule {
    pub fn new(when: Vec<Clause>, then: &str) -> Rule {
        Rule {
            when,
            then: then.to_string(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IF ")?;
        for (i, clause) in self.when.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{} IS {}", clause.variable, clause.label)?;
        }
        write!(f, " THEN {}", self.then)
    }
}

/// Ordered rules for a single output variable.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct RuleBase {
    pub output: String,
    pub rules: Vec<Rule>,
}

impl RuleBase {
    pub fn new(output: &str, rules: Vec<Rule>) -> RuleBase {
        RuleBase {
            output: output.to_string(),
            rules,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Names of the input variables referenced by any rule, in first-use order.
    pub fn inputs(&self) -> Vec<String> {
        let mut names: Vec<String> = vec![];
        for clause in self.rules.iter().flat_map(|rule| rule.when.iter()) {
            if !names.contains(&clause.variable) {
                names.push(clause.variable.clone());
            }
        }
        names
    }
}
