use super::*;

#[derive(Debug, Parser)]
#[command(group(
  clap::ArgGroup::new("rate")
    .required(true)
    .args(&["target", "fee_rate"]),
))]
pub(crate) struct Fee {
  #[arg(help = "Load wallet snapshot from <SNAPSHOT>.")]
  snapshot: PathBuf,
  #[arg(long, help = "Send <AMOUNT> sats.")]
  amount: u64,
  #[arg(long, help = "Confirm within <TARGET> blocks.")]
  target: Option<u16>,
  #[arg(long, help = "Pay <FEE_RATE> sat/vB.")]
  fee_rate: Option<FeeRate>,
  #[arg(long, value_enum, default_value_t, help = "Treat payment as <DEBT_TYPE>.")]
  debt_type: DebtType,
  #[arg(long, help = "Deduct fee from amount.")]
  take_fee_from_amount: bool,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub amount: u64,
  pub fee: Option<u64>,
  pub fee_rate: FeeRate,
  pub tier: FeeTier,
  pub needs_change: bool,
  pub valid: bool,
  pub outpoints: Option<Vec<OutPoint>>,
}

impl Fee {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let rate = match (self.target, self.fee_rate) {
      (_, Some(fee_rate)) => RateChoice::Rate(fee_rate),
      (Some(target), None) => RateChoice::Target(target),
      (None, None) => bail!("either --target or --fee-rate is required"),
    };

    let calculator = Snapshot::load(&self.snapshot)?.calculator(settings.protocol());

    let decision = FeeOrchestrator::new(&calculator).decide(FeeRequest {
      amount: Amount::from_sat(self.amount),
      rate,
      debt_type: self.debt_type,
      take_fee_from_amount: self.take_fee_from_amount,
    })?;

    let fee = decision.fee();

    let outpoints = if decision.spends_all {
      calculator.outpoints()
    } else {
      fee
        .and_then(|fee| decision.amount.checked_add(fee))
        .and_then(|total| calculator.selected_outpoints(total))
    };

    Ok(Some(Box::new(Output {
      amount: decision.amount.to_sat(),
      fee: fee.map(Amount::to_sat),
      fee_rate: decision.rate,
      tier: calculator.tier(decision.rate),
      needs_change: decision.state == FeeState::NeedsChange,
      valid: decision.is_valid,
      outpoints,
    })))
  }
}
