//! Configuration of a throughput evaluation.
use crate::ThroughputMethod;
use argh::FromArgs;
use bon::Builder;
use dfeval_ir::Actor;
use dfeval_utils::{Error, EvalResult};

/// Duration given to atomic actors that have no timing entry.
pub const DEFAULT_TIMING: f64 = 100.0;

/// Configuration struct controlling [evaluate](crate::evaluate) and
/// [TimingTable::apply](crate::TimingTable::apply).
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct EvalConfig {
    /// method used to compute the iteration duration
    #[builder(default)]
    pub method: ThroughputMethod,
    /// duration of atomic actors missing from the timing table
    #[builder(default = DEFAULT_TIMING)]
    pub default_timing: f64,
    /// duration of hierarchical actors
    #[builder(default = Actor::HIERARCHICAL_DURATION)]
    pub hierarchical_timing: f64,
    /// duration of interface actors
    #[builder(default = Actor::INTERFACE_DURATION)]
    pub interface_timing: f64,
    /// check the whole hierarchy before evaluating
    #[builder(default = true)]
    pub validate: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig::builder().build()
    }
}

#[derive(FromArgs, Debug, PartialEq)]
/// Parameters of a throughput evaluation task.
pub struct ThroughputOpts {
    /// evaluation method (asap | single-rate). default = asap
    #[argh(option, short = 'm', default = "ThroughputMethod::Asap")]
    pub method: ThroughputMethod,

    /// duration of atomic actors missing from the timing table
    #[argh(option, default = "DEFAULT_TIMING")]
    pub default_timing: f64,

    /// duration of hierarchical actors
    #[argh(option, default = "Actor::HIERARCHICAL_DURATION")]
    pub hierarchical_timing: f64,

    /// duration of interface actors
    #[argh(option, default = "Actor::INTERFACE_DURATION")]
    pub interface_timing: f64,

    /// skip the well-formedness checks of the hierarchy
    #[argh(switch, long = "no-validate")]
    pub skip_validation: bool,

    /// logging level
    #[argh(option, long = "log", default = "log::LevelFilter::Warn")]
    pub log_level: log::LevelFilter,
}

impl ThroughputOpts {
    /// Parse the parameters handed over by the surrounding workflow, e.g.
    /// `["--method", "single-rate", "--default-timing", "10"]`.
    pub fn from_parameters(params: &[&str]) -> EvalResult<Self> {
        ThroughputOpts::from_args(&["dfeval"], params)
            .map_err(|exit| Error::misc(exit.output.trim_end()))
    }

    /// Install the stderr logger at the level given by `--log`.
    pub fn init_logging(&self) {
        crate::init_logging(self.log_level);
    }

    pub fn config(&self) -> EvalConfig {
        EvalConfig::builder()
            .method(self.method)
            .default_timing(self.default_timing)
            .hierarchical_timing(self.hierarchical_timing)
            .interface_timing(self.interface_timing)
            .validate(!self.skip_validation)
            .build()
    }
}
