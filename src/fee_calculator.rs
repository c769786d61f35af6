use super::*;

/// The fee a payment would pay, and whether the wallet can actually afford
/// it. An `Invalid` result still carries a fee, so callers can show what
/// the payment would have cost, but must never build a transaction with it.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeeResult {
  Valid {
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    fee: Amount,
    rate: FeeRate,
  },
  Invalid {
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    fee: Amount,
    rate: FeeRate,
  },
}

impl FeeResult {
  pub fn fee(self) -> Amount {
    match self {
      Self::Valid { fee, .. } | Self::Invalid { fee, .. } => fee,
    }
  }

  pub fn rate(self) -> FeeRate {
    match self {
      Self::Valid { rate, .. } | Self::Invalid { rate, .. } => rate,
    }
  }

  pub fn is_valid(self) -> bool {
    matches!(self, Self::Valid { .. })
  }
}

/// Prices payments against one snapshot of the wallet's UTXOs and the
/// network's fee rates. Calculators are immutable; a new snapshot means a
/// new calculator.
#[derive(Debug, Clone)]
pub struct FeeCalculator {
  fee_window: FeeWindow,
  next_transaction_size: NextTransactionSize,
  protocol: Protocol,
}

impl FeeCalculator {
  pub fn new(
    fee_window: FeeWindow,
    next_transaction_size: NextTransactionSize,
    protocol: Protocol,
  ) -> Self {
    Self {
      fee_window,
      next_transaction_size,
      protocol,
    }
  }

  pub fn fee_window(&self) -> &FeeWindow {
    &self.fee_window
  }

  pub fn next_transaction_size(&self) -> &NextTransactionSize {
    &self.next_transaction_size
  }

  pub fn protocol(&self) -> Protocol {
    self.protocol
  }

  fn progression(&self) -> &[SizeForAmount] {
    self.next_transaction_size.size_progression()
  }

  /// Sum of every UTXO, ignoring debt.
  pub fn total_balance(&self) -> Amount {
    self.next_transaction_size.utxo_balance()
  }

  /// What a payment of the given debt type can spend, fee included.
  pub fn usable_balance(&self, debt_type: DebtType) -> Amount {
    let total = self.total_balance();

    match debt_type {
      DebtType::None | DebtType::Lend => total,
      DebtType::Collect => total
        .checked_sub(self.next_transaction_size.expected_debt())
        .unwrap_or(Amount::ZERO),
    }
  }

  pub fn rate_for_target(&self, confirmation_target: u16) -> FeeRate {
    self
      .fee_window
      .rate_for_target(confirmation_target, self.protocol.min_fee_rate)
  }

  pub fn tier(&self, rate: FeeRate) -> FeeTier {
    self.fee_window.tier(rate, self.protocol.min_fee_rate)
  }

  /// Every outpoint in the progression, in order. `None` if any entry lacks
  /// one, since a partial list cannot be spent.
  pub fn outpoints(&self) -> Option<Vec<OutPoint>> {
    self
      .progression()
      .iter()
      .map(|size| size.outpoint)
      .collect()
  }

  /// Outpoints of the smallest bracket covering `amount_with_fee`.
  pub fn selected_outpoints(&self, amount_with_fee: Amount) -> Option<Vec<OutPoint>> {
    let end = self
      .progression()
      .iter()
      .position(|size| size.amount >= amount_with_fee)?;

    self.progression()[..=end]
      .iter()
      .map(|size| size.outpoint)
      .collect()
  }

  pub fn fee_for(
    &self,
    amount: Amount,
    confirmation_target: u16,
    debt_type: DebtType,
  ) -> Result<FeeResult, FeeError> {
    self.fee_for_rate(amount, self.rate_for_target(confirmation_target), debt_type)
  }

  pub fn fee_for_rate(
    &self,
    amount: Amount,
    rate: FeeRate,
    debt_type: DebtType,
  ) -> Result<FeeResult, FeeError> {
    if amount < self.protocol.dust {
      return Err(FeeError::AmountTooSmall {
        amount,
        dust: self.protocol.dust,
      });
    }

    let available = self.usable_balance(debt_type);

    let insufficient = FeeError::InsufficientBalance { amount, available };

    let Some(last) = self.progression().last() else {
      return Err(insufficient);
    };

    if amount > available {
      return Err(insufficient);
    }

    match debt_type {
      DebtType::Lend => {
        return Ok(FeeResult::Valid {
          fee: Amount::ZERO,
          rate: FeeRate::ZERO,
        })
      }
      DebtType::None | DebtType::Collect => {}
    }

    if amount == available {
      let fee = Self::fee_for_weight(rate, last.weight());

      return Ok(if self.leaves_payable_remainder(available, fee) {
        FeeResult::Valid { fee, rate }
      } else {
        FeeResult::Invalid { fee, rate }
      });
    }

    for size in self
      .progression()
      .iter()
      .skip_while(|size| size.amount < amount)
    {
      let fee = Self::fee_for_weight(rate, size.weight());

      let Some(total) = amount.checked_add(fee) else {
        return Err(insufficient);
      };

      // the extra input needed to cover the fee may push the payment into
      // the next bracket
      if total > size.amount {
        continue;
      }

      return Ok(if total <= available {
        FeeResult::Valid { fee, rate }
      } else {
        FeeResult::Invalid { fee, rate }
      });
    }

    Err(insufficient)
  }

  /// Fees too large to represent saturate, and so can never be paid.
  fn fee_for_weight(rate: FeeRate, weight: Weight) -> Amount {
    rate.fee_wu(weight).unwrap_or(Amount::MAX)
  }

  fn leaves_payable_remainder(&self, available: Amount, fee: Amount) -> bool {
    available
      .checked_sub(fee)
      .is_some_and(|remainder| remainder > self.protocol.dust)
  }

  /// Payments of the whole usable balance have their fee taken from the
  /// amount.
  pub fn should_take_fee_from_amount(&self, amount: Amount, debt_type: DebtType) -> bool {
    amount == self.usable_balance(debt_type)
  }

  /// Fee for a transaction spending every UTXO. `None` when there is nothing
  /// to spend.
  pub fn spend_all_fee(&self, rate: FeeRate, debt_type: DebtType) -> Option<Amount> {
    let last = self.progression().last()?;

    Some(match debt_type {
      DebtType::Lend => Amount::ZERO,
      DebtType::None | DebtType::Collect => Self::fee_for_weight(rate, last.weight()),
    })
  }

  /// Rate for the slowest confirmation target on offer.
  pub fn minimum_fee_rate(&self) -> FeeRate {
    self
      .fee_window
      .slowest_rate()
      .unwrap_or(self.protocol.min_fee_rate)
      .max(self.protocol.min_fee_rate)
  }

  /// Cheapest fee for spending every UTXO, zero for an empty wallet.
  pub fn minimum_fee(&self) -> Amount {
    self
      .spend_all_fee(self.minimum_fee_rate(), DebtType::None)
      .unwrap_or(Amount::ZERO)
  }

  pub fn minimum_fee_for_target(&self, confirmation_target: u16) -> Amount {
    self
      .spend_all_fee(self.rate_for_target(confirmation_target), DebtType::None)
      .unwrap_or(Amount::ZERO)
  }

  /// Whether `amount` can be sent at all, at the cheapest rate on offer.
  pub fn is_amount_payable(&self, amount: Amount, debt_type: DebtType) -> bool {
    let fee = match debt_type {
      DebtType::Lend => Amount::ZERO,
      DebtType::None | DebtType::Collect => self.minimum_fee(),
    };

    amount
      .checked_add(fee)
      .is_some_and(|total| total <= self.usable_balance(debt_type))
  }

  /// Highest rate at which spending every UTXO still delivers `amount`.
  pub fn maximum_fee_rate_possible(&self, amount: Amount, debt_type: DebtType) -> Option<FeeRate> {
    let last = self.progression().last()?;

    let rest = self.usable_balance(debt_type).checked_sub(amount)?;

    let vsize = last.weight().to_vbytes_ceil();

    if vsize == 0 {
      return None;
    }

    let sat_per_kvb = u128::from(rest.to_sat()) * 1000 / u128::from(vsize);

    u64::try_from(sat_per_kvb)
      .ok()
      .map(FeeRate::from_sat_per_kvb)
  }

  pub fn next_highest_block(&self, rate: FeeRate) -> Option<u16> {
    self.fee_window.next_highest_block(rate)
  }
}
