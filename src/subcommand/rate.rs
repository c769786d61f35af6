use super::*;

#[derive(Debug, Parser)]
pub(crate) struct Rate {
  #[arg(help = "Load wallet snapshot from <SNAPSHOT>.")]
  snapshot: PathBuf,
  #[arg(long, help = "Confirm within <TARGET> blocks.")]
  target: u16,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub target: u16,
  pub fee_rate: FeeRate,
  pub tier: FeeTier,
  pub spend_all_fee: u64,
}

impl Rate {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let calculator = Snapshot::load(&self.snapshot)?.calculator(settings.protocol());

    let fee_rate = calculator.rate_for_target(self.target);

    Ok(Some(Box::new(Output {
      target: self.target,
      fee_rate,
      tier: calculator.tier(fee_rate),
      spend_all_fee: calculator.minimum_fee_for_target(self.target).to_sat(),
    })))
  }
}
