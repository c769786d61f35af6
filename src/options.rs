use super::*;

#[derive(Clone, Default, Debug, Parser)]
pub struct Options {
  #[arg(long, help = "Load configuration from <CONFIG>.")]
  pub(crate) config: Option<PathBuf>,
  #[arg(
    long,
    help = "Reject payments below <DUST_THRESHOLD> sats. [default: 546]"
  )]
  pub(crate) dust_threshold: Option<u64>,
  #[arg(
    long,
    help = "Never resolve a fee rate below <MIN_FEE_RATE> sat/vB. [default: 1]"
  )]
  pub(crate) min_fee_rate: Option<FeeRate>,
  #[arg(
    long,
    help = "Warn about manual fee rates of <MAX_FEE_RATE> sat/vB or more. [default: 2000]"
  )]
  pub(crate) max_fee_rate: Option<FeeRate>,
  #[arg(long, short, help = "Specify output format. [default: json]")]
  pub(crate) format: Option<OutputFormat>,
}
