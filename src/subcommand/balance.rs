use super::*;

#[derive(Debug, Parser)]
pub(crate) struct Balance {
  #[arg(help = "Load wallet snapshot from <SNAPSHOT>.")]
  snapshot: PathBuf,
  #[arg(long, value_enum, default_value_t, help = "Treat payment as <DEBT_TYPE>.")]
  debt_type: DebtType,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub total: u64,
  pub usable: u64,
  pub expected_debt: u64,
  pub utxos: usize,
  pub minimum_fee: u64,
  pub minimum_fee_rate: FeeRate,
  pub valid_at_operation_hid: Option<u64>,
  pub outpoints: Option<Vec<OutPoint>>,
}

impl Balance {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let calculator = Snapshot::load(&self.snapshot)?.calculator(settings.protocol());

    let next_transaction_size = calculator.next_transaction_size();

    Ok(Some(Box::new(Output {
      total: calculator.total_balance().to_sat(),
      usable: calculator.usable_balance(self.debt_type).to_sat(),
      expected_debt: next_transaction_size.expected_debt().to_sat(),
      utxos: next_transaction_size.size_progression().len(),
      minimum_fee: calculator.minimum_fee().to_sat(),
      minimum_fee_rate: calculator.minimum_fee_rate(),
      valid_at_operation_hid: next_transaction_size.valid_at_operation_hid(),
      outpoints: calculator.outpoints(),
    })))
  }
}
