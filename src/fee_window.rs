use super::*;

/// Which preset a fee rate corresponds to, as reported to analytics.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum FeeTier {
  #[display("fast")]
  Fast,
  #[display("medium")]
  Medium,
  #[display("slow")]
  Slow,
  #[display("custom")]
  Custom,
}

/// Network fee rates by confirmation target, in blocks.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeeWindow {
  pub targeted_fees: BTreeMap<u16, FeeRate>,
  #[serde(default = "FeeWindow::default_fast_conf_target")]
  pub fast_conf_target: u16,
  #[serde(default = "FeeWindow::default_medium_conf_target")]
  pub medium_conf_target: u16,
  #[serde(default = "FeeWindow::default_slow_conf_target")]
  pub slow_conf_target: u16,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_mempool_fee_rate: Option<FeeRate>,
}

impl Default for FeeWindow {
  fn default() -> Self {
    Self {
      targeted_fees: BTreeMap::new(),
      fast_conf_target: Self::default_fast_conf_target(),
      medium_conf_target: Self::default_medium_conf_target(),
      slow_conf_target: Self::default_slow_conf_target(),
      min_mempool_fee_rate: None,
    }
  }
}

impl FeeWindow {
  fn default_fast_conf_target() -> u16 {
    1
  }

  fn default_medium_conf_target() -> u16 {
    43
  }

  fn default_slow_conf_target() -> u16 {
    90
  }

  pub fn new(targeted_fees: impl IntoIterator<Item = (u16, FeeRate)>) -> Self {
    Self {
      targeted_fees: targeted_fees.into_iter().collect(),
      ..default()
    }
  }

  /// The cheapest known rate that still hits `confirmation_target`.
  ///
  /// Rates are never interpolated: a target without an entry uses the
  /// closest lower target, and when there is none, the lowest target in the
  /// table. An empty table yields `min_fee_rate`, which is also the floor for
  /// every result.
  pub fn rate_for_target(&self, confirmation_target: u16, min_fee_rate: FeeRate) -> FeeRate {
    self
      .targeted_fees
      .range(..=confirmation_target)
      .next_back()
      .or_else(|| self.targeted_fees.iter().next())
      .map(|(_, rate)| *rate)
      .unwrap_or(min_fee_rate)
      .max(min_fee_rate)
  }

  /// Rate for the slowest target in the table.
  pub fn slowest_rate(&self) -> Option<FeeRate> {
    self
      .targeted_fees
      .last_key_value()
      .map(|(_, rate)| *rate)
  }

  /// Fastest confirmation target whose rate does not exceed `rate`.
  pub fn next_highest_block(&self, rate: FeeRate) -> Option<u16> {
    self
      .targeted_fees
      .iter()
      .find(|(_, target_rate)| **target_rate <= rate)
      .map(|(target, _)| *target)
  }

  pub fn tier(&self, rate: FeeRate, min_fee_rate: FeeRate) -> FeeTier {
    [
      (self.fast_conf_target, FeeTier::Fast),
      (self.medium_conf_target, FeeTier::Medium),
      (self.slow_conf_target, FeeTier::Slow),
    ]
    .into_iter()
    .find(|(target, _)| self.rate_for_target(*target, min_fee_rate) == rate)
    .map(|(_, tier)| tier)
    .unwrap_or(FeeTier::Custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn exact_target() {
    let window = targeted_fees();
    assert_eq!(window.rate_for_target(1, MIN), rate("10"));
    assert_eq!(window.rate_for_target(2, MIN), rate("3"));
    assert_eq!(window.rate_for_target(15, MIN), rate("1.5"));
  }

  #[test]
  fn missing_target_uses_closest_lower_target() {
    let window = targeted_fees();
    assert_eq!(window.rate_for_target(6, MIN), rate("2.25"));
    assert_eq!(window.rate_for_target(14, MIN), rate("2.25"));
    assert_eq!(window.rate_for_target(1_000, MIN), rate("1.5"));
  }

  #[test]
  fn target_below_table_uses_lowest_target() {
    let window = FeeWindow::new([(3, rate("4")), (6, rate("2"))]);
    assert_eq!(window.rate_for_target(0, MIN), rate("4"));
    assert_eq!(window.rate_for_target(2, MIN), rate("4"));
  }

  #[test]
  fn empty_table_uses_minimum() {
    assert_eq!(FeeWindow::default().rate_for_target(1, MIN), MIN);
  }

  #[test]
  fn rates_never_go_below_minimum() {
    let window = FeeWindow::new([(1, rate("0.5"))]);
    assert_eq!(window.rate_for_target(1, MIN), MIN);
    assert_eq!(window.rate_for_target(1, FeeRate::ZERO), rate("0.5"));
  }

  #[test]
  fn slowest_rate() {
    assert_eq!(targeted_fees().slowest_rate(), Some(rate("1.5")));
    assert_eq!(FeeWindow::default().slowest_rate(), None);
  }

  #[test]
  fn next_highest_block() {
    let window = targeted_fees();
    assert_eq!(window.next_highest_block(rate("100")), Some(1));
    assert_eq!(window.next_highest_block(rate("10")), Some(1));
    assert_eq!(window.next_highest_block(rate("9.99")), Some(2));
    assert_eq!(window.next_highest_block(rate("2.5")), Some(5));
    assert_eq!(window.next_highest_block(rate("1.5")), Some(15));
    assert_eq!(window.next_highest_block(rate("1")), None);
  }

  #[test]
  fn tier() {
    let window = FeeWindow {
      fast_conf_target: 1,
      medium_conf_target: 5,
      slow_conf_target: 20,
      ..targeted_fees()
    };

    assert_eq!(window.tier(rate("10"), MIN), FeeTier::Fast);
    assert_eq!(window.tier(rate("2.25"), MIN), FeeTier::Medium);
    assert_eq!(window.tier(rate("1.5"), MIN), FeeTier::Slow);
    assert_eq!(window.tier(rate("3"), MIN), FeeTier::Custom);
    assert_eq!(FeeTier::Medium.to_string(), "medium");
  }

  #[test]
  fn deserialize() {
    let window = serde_yaml::from_str::<FeeWindow>(
      "
targeted_fees:
  1: 10
  2: '3'
  5: 2.25
slow_conf_target: 5
min_mempool_fee_rate: 1.5
",
    )
    .unwrap();

    pretty_assert_eq!(
      window,
      FeeWindow {
        targeted_fees: [(1, rate("10")), (2, rate("3")), (5, rate("2.25"))].into(),
        fast_conf_target: 1,
        medium_conf_target: 43,
        slow_conf_target: 5,
        min_mempool_fee_rate: Some(rate("1.5")),
      }
    );
  }

  #[test]
  fn deserialize_json_keys() {
    assert_eq!(
      serde_json::from_str::<FeeWindow>(r#"{ "targeted_fees": { "1": 400, "90": "8" } }"#)
        .unwrap()
        .targeted_fees,
      BTreeMap::from([(1, rate("400")), (90, rate("8"))]),
    );
  }
}
