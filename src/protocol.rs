use super::*;

/// Protocol-wide constants the calculator is parameterized over.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Protocol {
  /// Payments below this amount are rejected outright.
  #[serde(with = "bitcoin::amount::serde::as_sat")]
  pub dust: Amount,
  /// No resolved rate is ever lower than this.
  pub min_fee_rate: FeeRate,
}

impl Protocol {
  /// Three times the 182 byte cost of spending a legacy output.
  pub const DUST: Amount = Amount::from_sat(3 * 182);
  pub const MIN_FEE_RATE: FeeRate = FeeRate::from_sat_per_vb(1);
}

impl Default for Protocol {
  fn default() -> Self {
    Self {
      dust: Self::DUST,
      min_fee_rate: Self::MIN_FEE_RATE,
    }
  }
}
