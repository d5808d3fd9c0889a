//! CLI arguments for rate negotiation.

use clap::Args;
use serde::{Deserialize, Serialize};
use vertex_blob_primitives::PaymentRate;

use crate::{
    AcceptAllStrategy, ConfiguredStrategy, FixedRateStrategy,
    constants::DEFAULT_MIN_BLOB_DATA_PAYMENT_RATE,
};

/// Which negotiation policy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Accept offers at or above the minimum rate.
    #[default]
    Fixed,
    /// Accept every offer.
    AcceptAll,
}

/// Rate negotiation CLI arguments.
#[derive(Debug, Args, Clone, Serialize, Deserialize)]
#[command(next_help_heading = "Blob Negotiation")]
#[serde(default)]
pub struct StrategyArgs {
    /// Negotiation policy
    #[arg(long = "blob.strategy", value_enum, default_value_t = StrategyKind::Fixed)]
    pub strategy: StrategyKind,

    /// Minimum accepted rate per megabyte
    #[arg(long = "blob.min-rate", default_value_t = DEFAULT_MIN_BLOB_DATA_PAYMENT_RATE)]
    pub min_rate: f64,
}

impl Default for StrategyArgs {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            min_rate: DEFAULT_MIN_BLOB_DATA_PAYMENT_RATE,
        }
    }
}

impl StrategyArgs {
    /// Validate argument combinations.
    pub fn validate(&self) -> Result<(), String> {
        if !self.min_rate.is_finite() || self.min_rate < 0.0 {
            return Err(format!(
                "min-rate must be a non-negative number, got {}",
                self.min_rate
            ));
        }
        if self.strategy == StrategyKind::AcceptAll
            && self.min_rate != DEFAULT_MIN_BLOB_DATA_PAYMENT_RATE
        {
            return Err("min-rate has no effect with the 'accept-all' strategy".to_string());
        }
        Ok(())
    }

    /// Build the configured strategy.
    pub fn build(&self) -> ConfiguredStrategy {
        match self.strategy {
            StrategyKind::Fixed => {
                ConfiguredStrategy::Fixed(FixedRateStrategy::new(PaymentRate::new(self.min_rate)))
            }
            StrategyKind::AcceptAll => ConfiguredStrategy::AcceptAll(AcceptAllStrategy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        strategy: StrategyArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["test"]);
        assert_eq!(cli.strategy.strategy, StrategyKind::Fixed);
        assert_eq!(cli.strategy.min_rate, DEFAULT_MIN_BLOB_DATA_PAYMENT_RATE);
        assert!(cli.strategy.validate().is_ok());
    }

    #[test]
    fn test_parse_min_rate() {
        let cli = Cli::parse_from(["test", "--blob.min-rate", "0.5"]);
        assert_eq!(cli.strategy.min_rate, 0.5);
        match cli.strategy.build() {
            ConfiguredStrategy::Fixed(s) => assert_eq!(s.min_rate(), PaymentRate::new(0.5)),
            other => panic!("expected fixed strategy, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_negative_rate() {
        let args = StrategyArgs {
            min_rate: -1.0,
            ..Default::default()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_min_rate_with_accept_all() {
        let args = StrategyArgs {
            strategy: StrategyKind::AcceptAll,
            min_rate: 2.0,
        };
        assert!(args.validate().is_err());
    }
}
