use super::*;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UtxoStatus {
  /// Entries recorded before the status was tracked deserialize as
  /// confirmed.
  #[default]
  Confirmed,
  Unconfirmed,
}

/// One bracket of the size progression: what a transaction would weigh if it
/// spent every UTXO up to and including this one.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct SizeForAmount {
  #[serde(rename = "amount_in_satoshis", with = "bitcoin::amount::serde::as_sat")]
  pub amount: Amount,
  pub size_in_weight_units: u64,
  #[serde(
    default,
    deserialize_with = "deserialize_outpoint",
    skip_serializing_if = "Option::is_none"
  )]
  pub outpoint: Option<OutPoint>,
  #[serde(default)]
  pub utxo_status: UtxoStatus,
}

impl SizeForAmount {
  pub fn weight(&self) -> Weight {
    Weight::from_wu(self.size_in_weight_units)
  }
}

/// An empty outpoint is as good as a missing one.
fn deserialize_outpoint<'de, D>(deserializer: D) -> Result<Option<OutPoint>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<String>::deserialize(deserializer)? {
    Some(outpoint) if !outpoint.is_empty() => outpoint
      .parse()
      .map(Some)
      .map_err(serde::de::Error::custom),
    Some(_) | None => Ok(None),
  }
}

/// A snapshot of the wallet's UTXO set as seen by the fee calculator.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawNextTransactionSize")]
pub struct NextTransactionSize {
  size_progression: Vec<SizeForAmount>,
  valid_at_operation_hid: Option<u64>,
  #[serde(with = "bitcoin::amount::serde::as_sat")]
  expected_debt: Amount,
}

impl NextTransactionSize {
  pub fn new(
    size_progression: Vec<SizeForAmount>,
    valid_at_operation_hid: Option<u64>,
    expected_debt: Amount,
  ) -> Result<Self, ProgressionError> {
    for (index, pair) in size_progression.windows(2).enumerate() {
      if pair[1].amount <= pair[0].amount {
        return Err(ProgressionError::NotIncreasing {
          index: index + 1,
          amount: pair[1].amount,
          previous: pair[0].amount,
        });
      }
    }

    Ok(Self {
      size_progression,
      valid_at_operation_hid,
      expected_debt,
    })
  }

  pub fn size_progression(&self) -> &[SizeForAmount] {
    &self.size_progression
  }

  pub fn valid_at_operation_hid(&self) -> Option<u64> {
    self.valid_at_operation_hid
  }

  pub fn expected_debt(&self) -> Amount {
    self.expected_debt
  }

  /// Sum of every UTXO in the progression.
  pub fn utxo_balance(&self) -> Amount {
    self
      .size_progression
      .last()
      .map(|size| size.amount)
      .unwrap_or(Amount::ZERO)
  }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNextTransactionSize {
  size_progression: Vec<SizeForAmount>,
  #[serde(default)]
  valid_at_operation_hid: Option<u64>,
  #[serde(default)]
  expected_debt: i64,
}

impl TryFrom<RawNextTransactionSize> for NextTransactionSize {
  type Error = ProgressionError;

  fn try_from(raw: RawNextTransactionSize) -> Result<Self, Self::Error> {
    let expected_debt = match u64::try_from(raw.expected_debt) {
      Ok(debt) => Amount::from_sat(debt),
      Err(_) => {
        log::warn!("Ignoring negative expected debt of {} sat", raw.expected_debt);
        Amount::ZERO
      }
    };

    Self::new(
      raw.size_progression,
      raw.valid_at_operation_hid,
      expected_debt,
    )
  }
}
