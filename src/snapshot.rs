use super::*;

/// Everything the calculator needs, as exported by the wallet: the UTXO
/// size progression and the fee rates at the time.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
  pub next_transaction_size: NextTransactionSize,
  #[serde(default)]
  pub fee_window: FeeWindow,
}

impl Snapshot {
  /// Loads a snapshot. Files ending in `.json` are parsed as JSON, anything
  /// else as YAML.
  pub fn load(path: &Path) -> SnafuResult<Self> {
    let file = File::open(path).snafu_context(error::Io { path })?;

    let snapshot: Self = if path.extension().is_some_and(|extension| extension == "json") {
      serde_json::from_reader(BufReader::new(file))
        .snafu_context(error::SnapshotJson { path })?
    } else {
      serde_yaml::from_reader(file).snafu_context(error::SnapshotParse { path })?
    };

    log::info!(
      "Loaded snapshot `{}` with {} UTXOs and {} fee targets",
      path.display(),
      snapshot.next_transaction_size.size_progression().len(),
      snapshot.fee_window.targeted_fees.len(),
    );

    Ok(snapshot)
  }

  pub fn calculator(self, protocol: Protocol) -> FeeCalculator {
    FeeCalculator::new(self.fee_window, self.next_transaction_size, protocol)
  }
}
