//! Typed filter-graph construction.
//!
//! Filters and stages are assembled as data and only serialized to ffmpeg's
//! textual syntax by [`FilterGraph::render`], which validates the label
//! wiring first. Every option value goes through
//! [`escape::filter_value`](crate::escape::filter_value).
//!
//! ```
//! use vt_av::filter::{Filter, FilterGraph};
//!
//! let mut graph = FilterGraph::new();
//! graph
//!     .stage(["1:v"], [Filter::new("scale").arg(64).arg(-1)], "scaled")
//!     .stage(["0:v", "scaled"], [Filter::new("overlay").arg(10).arg(10)], "out");
//!
//! assert_eq!(
//!     graph.render().unwrap(),
//!     "[1:v]scale=64:-1[scaled];[0:v][scaled]overlay=10:10[out]"
//! );
//! ```

use std::collections::HashSet;
use std::fmt;

use vt_core::{Error, Result};

use crate::escape::filter_value;

/// One option of a filter: positional (`64`) or named (`aa=0.5`).
#[derive(Debug, Clone, PartialEq)]
enum FilterArg {
    Positional(String),
    Named(&'static str, String),
}

/// A single filter such as `scale=64:-1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    name: &'static str,
    args: Vec<FilterArg>,
}

impl Filter {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            args: Vec::new(),
        }
    }

    /// Append a positional option.
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.args.push(FilterArg::Positional(value.to_string()));
        self
    }

    /// Append a `key=value` option.
    pub fn named(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.args.push(FilterArg::Named(key, value.to_string()));
        self
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            f.write_str(if i == 0 { "=" } else { ":" })?;
            match arg {
                FilterArg::Positional(v) => write!(f, "{}", filter_value(v))?,
                FilterArg::Named(k, v) => write!(f, "{k}={}", filter_value(v))?,
            }
        }
        Ok(())
    }
}

/// A stage: input labels feeding a chain of filters into one output label.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStage {
    inputs: Vec<String>,
    chain: Vec<Filter>,
    output: String,
}

/// An ordered list of stages terminating in a single output label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGraph {
    stages: Vec<FilterStage>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn stage<I, S, C>(&mut self, inputs: I, chain: C, output: &str) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        C: IntoIterator<Item = Filter>,
    {
        self.stages.push(FilterStage {
            inputs: inputs.into_iter().map(Into::into).collect(),
            chain: chain.into_iter().collect(),
            output: output.to_string(),
        });
        self
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Label produced by the last stage, consumed by `-map`.
    pub fn terminal_label(&self) -> Option<&str> {
        self.stages.last().map(|s| s.output.as_str())
    }

    /// Check the label wiring.
    ///
    /// Every input must be a primary stream (`N:v`, `N:a`) or the output of
    /// an earlier stage; output labels must be unique, well formed, and not
    /// collide with primary stream names; every stage needs at least one
    /// filter.
    pub fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(Error::Validation("filter graph has no stages".into()));
        }

        let mut produced: HashSet<&str> = HashSet::new();
        for (i, stage) in self.stages.iter().enumerate() {
            if stage.chain.is_empty() {
                return Err(Error::Validation(format!("stage {i} has no filters")));
            }
            if stage.inputs.is_empty() {
                return Err(Error::Validation(format!("stage {i} has no inputs")));
            }
            for input in &stage.inputs {
                if !is_primary_stream(input) && !produced.contains(input.as_str()) {
                    return Err(Error::Validation(format!(
                        "stage {i} consumes unknown label [{input}]"
                    )));
                }
            }
            if !is_valid_label(&stage.output) || is_primary_stream(&stage.output) {
                return Err(Error::Validation(format!(
                    "stage {i} has invalid output label [{}]",
                    stage.output
                )));
            }
            if !produced.insert(stage.output.as_str()) {
                return Err(Error::Validation(format!(
                    "label [{}] is produced twice",
                    stage.output
                )));
            }
        }
        Ok(())
    }

    /// Validate and serialize to ffmpeg's `-filter_complex` syntax.
    pub fn render(&self) -> Result<String> {
        self.validate()?;

        let rendered = self
            .stages
            .iter()
            .map(|stage| {
                let inputs: String = stage.inputs.iter().map(|l| format!("[{l}]")).collect();
                let chain = stage
                    .chain
                    .iter()
                    .map(Filter::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{inputs}{chain}[{}]", stage.output)
            })
            .collect::<Vec<_>>()
            .join(";");
        Ok(rendered)
    }
}

/// `N:v` / `N:a` stream specifiers of the command's inputs.
fn is_primary_stream(label: &str) -> bool {
    match label.split_once(':') {
        Some((index, kind)) => {
            !index.is_empty()
                && index.bytes().all(|b| b.is_ascii_digit())
                && matches!(kind, "v" | "a")
        }
        None => false,
    }
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
