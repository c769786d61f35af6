use super::*;

/// How a payment relates to funds lent by, or owed to, a Lightning swap
/// counterparty.
#[derive(
  Debug,
  PartialEq,
  Eq,
  Clone,
  Copy,
  Default,
  Hash,
  Serialize,
  Deserialize,
  ValueEnum,
  derive_more::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DebtType {
  /// An ordinary on-chain spend.
  #[default]
  #[display("none")]
  None,
  /// The counterparty advances the funds. Nothing moves on-chain yet, so
  /// there is no on-chain fee.
  #[display("lend")]
  Lend,
  /// The payment also settles previously lent funds on-chain, so the
  /// expected debt is not available to pay with.
  #[display("collect")]
  Collect,
}
