use super::*;

#[derive(Debug, Parser)]
pub(crate) struct CheckRate {
  #[arg(help = "Load wallet snapshot from <SNAPSHOT>.")]
  snapshot: PathBuf,
  #[arg(long, help = "Send <AMOUNT> sats.")]
  amount: u64,
  #[arg(long, help = "Check <FEE_RATE> sat/vB.")]
  fee_rate: FeeRate,
  #[arg(long, value_enum, default_value_t, help = "Treat payment as <DEBT_TYPE>.")]
  debt_type: DebtType,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub fee_rate: FeeRate,
  pub warning: FeeWarning,
  pub tier: FeeTier,
  pub next_highest_block: Option<u16>,
  pub maximum_fee_rate: Option<FeeRate>,
}

impl CheckRate {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let calculator = Snapshot::load(&self.snapshot)?.calculator(settings.protocol());

    let amount = Amount::from_sat(self.amount);

    let warning = FeeOrchestrator::new(&calculator).check_rate(
      amount,
      self.fee_rate,
      self.debt_type,
      settings.max_fee_rate(),
    )?;

    Ok(Some(Box::new(Output {
      fee_rate: self.fee_rate,
      warning,
      tier: calculator.tier(self.fee_rate),
      next_highest_block: calculator.next_highest_block(self.fee_rate),
      maximum_fee_rate: calculator.maximum_fee_rate_possible(amount, self.debt_type),
    })))
  }
}
