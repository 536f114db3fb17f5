//! Throughput evaluation of the entrypoint graph of a [Context].
use crate::EvalConfig;
use dfeval_ir::{self as ir, Context, Id};
use dfeval_opt::{
    analysis::{AsapResult, AsapScheduler},
    passes::SdfTransformer,
};
use dfeval_utils::{Error, EvalResult};
use std::{fmt, str::FromStr};

/// Strategy used to compute the duration of one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThroughputMethod {
    /// Self-timed ASAP simulation of the SDF graph itself.
    #[default]
    Asap,
    /// Expand the graph into its single-rate equivalent, then simulate it.
    SingleRate,
}

impl ThroughputMethod {
    /// Names of hierarchical evaluation strategies this engine does not
    /// provide.
    const UNSUPPORTED: [&'static str; 4] =
        ["sr", "esr", "hperiodic", "classic"];
}

impl FromStr for ThroughputMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asap" | "sdf" => Ok(ThroughputMethod::Asap),
            "single-rate" | "single_rate" | "srsdf" => {
                Ok(ThroughputMethod::SingleRate)
            }
            other if Self::UNSUPPORTED.iter().any(|m| *m == other) => {
                Err(Error::unsupported(format!(
                    "throughput method `{s}' is not provided by this engine"
                )))
            }
            _ => Err(Error::misc(format!("Unknown throughput method: '{s}'"))),
        }
    }
}

impl fmt::Display for ThroughputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThroughputMethod::Asap => write!(f, "asap"),
            ThroughputMethod::SingleRate => write!(f, "single-rate"),
        }
    }
}

/// Result of [evaluate].
#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputReport {
    /// Name of the evaluated graph.
    pub graph: Id,
    pub method: ThroughputMethod,
    /// Duration of one iteration.
    pub iteration_duration: f64,
    /// Iterations per time unit, `1 / iteration_duration`.
    pub throughput: f64,
    /// False if the simulation deadlocked before completing an iteration.
    pub live: bool,
}

impl ThroughputReport {
    fn new(graph: Id, method: ThroughputMethod, result: AsapResult) -> Self {
        ThroughputReport {
            graph,
            method,
            iteration_duration: result.iteration_duration,
            throughput: result.throughput(),
            live: result.live,
        }
    }
}

/// Evaluate the throughput of the entrypoint graph of `ctx` with the method
/// selected by `config`. Actor durations must already be set, see
/// [TimingTable::apply](crate::TimingTable::apply).
pub fn evaluate(
    ctx: &Context,
    config: &EvalConfig,
) -> EvalResult<ThroughputReport> {
    if config.validate {
        ir::validate_context(ctx)?;
    }
    let graph = ctx.top();
    let result = match config.method {
        ThroughputMethod::Asap => AsapScheduler::schedule(graph)?,
        ThroughputMethod::SingleRate => {
            let srsdf = SdfTransformer::to_srsdf(graph)?;
            AsapScheduler::schedule(&srsdf)?
        }
    };
    let report = ThroughputReport::new(graph.name, config.method, result);
    if report.live {
        log::info!(
            "{} ({}): throughput value = {}",
            report.graph,
            report.method,
            report.throughput
        );
    } else {
        log::warn!(
            "{} ({}): not live, partial iteration took {}",
            report.graph,
            report.method,
            report.iteration_duration
        );
    }
    Ok(report)
}
