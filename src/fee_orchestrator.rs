use super::*;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateChoice {
  /// Resolve the rate from the fee window.
  Target(u16),
  /// Use a manually entered rate as is.
  Rate(FeeRate),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct FeeRequest {
  pub amount: Amount,
  pub rate: RateChoice,
  pub debt_type: DebtType,
  pub take_fee_from_amount: bool,
}

impl FeeRequest {
  pub fn new(amount: Amount, rate: RateChoice) -> Self {
    Self {
      amount,
      rate,
      debt_type: DebtType::None,
      take_fee_from_amount: false,
    }
  }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeState {
  FinalFee(#[serde(with = "bitcoin::amount::serde::as_sat")] Amount),
  /// Whatever the fee, spending everything would leave a dust output.
  NeedsChange,
}

/// What a payment will actually send and pay.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct FeeDecision {
  #[serde(with = "bitcoin::amount::serde::as_sat")]
  pub amount: Amount,
  pub rate: FeeRate,
  pub state: FeeState,
  pub is_valid: bool,
  /// The fee was priced on the last bracket, so funding the payment takes
  /// every UTXO.
  pub spends_all: bool,
}

impl FeeDecision {
  pub fn fee(&self) -> Option<Amount> {
    match self.state {
      FeeState::FinalFee(fee) => Some(fee),
      FeeState::NeedsChange => None,
    }
  }
}

/// Verdict on a manually entered fee rate, most severe first.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum FeeWarning {
  #[display("too high")]
  TooHigh,
  #[display("below mempool minimum")]
  BelowMempoolMinimum,
  #[display("too low")]
  TooLow,
  #[display("insufficient funds")]
  InsufficientFunds,
  #[display("very low")]
  VeryLow,
  #[display("none")]
  None,
}

pub struct FeeOrchestrator<'a> {
  calculator: &'a FeeCalculator,
}

impl<'a> FeeOrchestrator<'a> {
  pub fn new(calculator: &'a FeeCalculator) -> Self {
    Self { calculator }
  }

  fn resolve_rate(&self, choice: RateChoice) -> FeeRate {
    match choice {
      RateChoice::Target(confirmation_target) => {
        self.calculator.rate_for_target(confirmation_target)
      }
      RateChoice::Rate(rate) => rate,
    }
  }

  pub fn decide(&self, request: FeeRequest) -> Result<FeeDecision, FeeError> {
    let FeeRequest {
      amount,
      debt_type,
      take_fee_from_amount,
      ..
    } = request;

    let rate = self.resolve_rate(request.rate);

    if take_fee_from_amount
      || self
        .calculator
        .should_take_fee_from_amount(amount, debt_type)
    {
      return self.take_fee_from_amount(amount, rate, debt_type);
    }

    match self.calculator.fee_for_rate(amount, rate, debt_type) {
      Ok(result) => Ok(FeeDecision {
        amount,
        rate: result.rate(),
        state: FeeState::FinalFee(result.fee()),
        is_valid: result.is_valid(),
        spends_all: false,
      }),
      Err(err @ FeeError::InsufficientBalance { available, .. }) if amount <= available => {
        // the amount is there, but not the fee on top of it
        let fee = self
          .calculator
          .spend_all_fee(rate, debt_type)
          .ok_or(err)?;

        Ok(FeeDecision {
          amount,
          rate,
          state: FeeState::FinalFee(fee),
          is_valid: false,
          spends_all: true,
        })
      }
      Err(err) => Err(err),
    }
  }

  fn take_fee_from_amount(
    &self,
    amount: Amount,
    rate: FeeRate,
    debt_type: DebtType,
  ) -> Result<FeeDecision, FeeError> {
    let dust = self.calculator.protocol().dust;

    if amount < dust {
      return Err(FeeError::AmountTooSmall { amount, dust });
    }

    let available = self.calculator.usable_balance(debt_type);

    let insufficient = FeeError::InsufficientBalance { amount, available };

    if amount > available {
      return Err(insufficient);
    }

    let rate = match debt_type {
      DebtType::Lend => FeeRate::ZERO,
      DebtType::None | DebtType::Collect => rate,
    };

    let fee = self
      .calculator
      .spend_all_fee(rate, debt_type)
      .ok_or(insufficient)?;

    Ok(
      match available
        .checked_sub(fee)
        .filter(|remainder| *remainder > dust)
      {
        Some(remainder) => FeeDecision {
          amount: remainder,
          rate,
          state: FeeState::FinalFee(fee),
          is_valid: true,
          spends_all: true,
        },
        None => FeeDecision {
          amount,
          rate,
          state: FeeState::NeedsChange,
          is_valid: false,
          spends_all: true,
        },
      },
    )
  }

  pub fn check_rate(
    &self,
    amount: Amount,
    rate: FeeRate,
    debt_type: DebtType,
    max_fee_rate: FeeRate,
  ) -> Result<FeeWarning, FeeError> {
    if rate >= max_fee_rate {
      return Ok(FeeWarning::TooHigh);
    }

    let min_fee_rate = self.calculator.protocol().min_fee_rate;

    if let Some(mempool) = self.calculator.fee_window().min_mempool_fee_rate {
      if mempool > min_fee_rate && rate < mempool {
        return Ok(FeeWarning::BelowMempoolMinimum);
      }
    }

    if rate < min_fee_rate {
      return Ok(FeeWarning::TooLow);
    }

    let decision = self.decide(FeeRequest {
      debt_type,
      ..FeeRequest::new(amount, RateChoice::Rate(rate))
    })?;

    if !decision.is_valid {
      return Ok(FeeWarning::InsufficientFunds);
    }

    let slow_rate = self
      .calculator
      .rate_for_target(self.calculator.fee_window().slow_conf_target);

    if rate < slow_rate {
      return Ok(FeeWarning::VeryLow);
    }

    Ok(FeeWarning::None)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn decide(calculator: &FeeCalculator, amount: u64, rate: RateChoice) -> Result<FeeDecision, FeeError> {
    FeeOrchestrator::new(calculator).decide(FeeRequest::new(sat(amount), rate))
  }

  #[test]
  fn fee_paid_on_top_of_amount() {
    assert_eq!(
      decide(&calculator(&[(1_000, 100), (2_000, 200)]), 999, RateChoice::Target(2)),
      Ok(FeeDecision {
        amount: sat(999),
        rate: rate("3"),
        state: FeeState::FinalFee(sat(150)),
        is_valid: true,
        spends_all: false,
      })
    );
  }

  #[test]
  fn explicit_rate() {
    let decision = decide(
      &calculator(&[(1_000, 100), (2_000, 200)]),
      600,
      RateChoice::Rate(rate("4.2")),
    )
    .unwrap();

    assert_eq!(decision.rate, rate("4.2"));
    assert_eq!(decision.fee(), Some(sat(105)));
  }

  #[test]
  fn sending_everything_takes_fee_from_amount() {
    let calculator = calculator(&[(12_345, 400)]);

    let decision = decide(&calculator, 12_345, RateChoice::Target(1)).unwrap();

    assert_eq!(
      decision,
      FeeDecision {
        amount: sat(11_345),
        rate: rate("10"),
        state: FeeState::FinalFee(sat(1_000)),
        is_valid: true,
        spends_all: true,
      }
    );

    assert_eq!(
      decision.amount + decision.fee().unwrap(),
      calculator.usable_balance(DebtType::None)
    );
  }

  #[test]
  fn requested_take_fee_from_amount() {
    let calculator = calculator(&[(1_000, 100), (2_000, 200)]);

    assert_eq!(
      FeeOrchestrator::new(&calculator).decide(FeeRequest {
        take_fee_from_amount: true,
        ..FeeRequest::new(sat(1_500), RateChoice::Target(2))
      }),
      Ok(FeeDecision {
        amount: sat(1_850),
        rate: rate("3"),
        state: FeeState::FinalFee(sat(150)),
        is_valid: true,
        spends_all: true,
      })
    );
  }

  #[test]
  fn dust_remainder_needs_change() {
    assert_eq!(
      decide(&calculator(&[(560, 840)]), 560, RateChoice::Target(1)),
      Ok(FeeDecision {
        amount: sat(560),
        rate: rate("10"),
        state: FeeState::NeedsChange,
        is_valid: false,
        spends_all: true,
      })
    );
  }

  #[test]
  fn fee_that_does_not_fit_is_shown_as_invalid() {
    assert_eq!(
      decide(&calculator(&[(10_000, 90), (20_000, 100)]), 19_900, RateChoice::Target(1)),
      Ok(FeeDecision {
        amount: sat(19_900),
        rate: rate("10"),
        state: FeeState::FinalFee(sat(250)),
        is_valid: false,
        spends_all: true,
      })
    );
  }

  #[test]
  fn errors_are_passed_through() {
    let calculator = calculator(&[(10_000, 90)]);

    assert_eq!(
      decide(&calculator, 545, RateChoice::Target(1)),
      Err(FeeError::AmountTooSmall {
        amount: sat(545),
        dust: sat(546),
      })
    );

    assert_eq!(
      decide(&calculator, 10_001, RateChoice::Target(1)),
      Err(FeeError::InsufficientBalance {
        amount: sat(10_001),
        available: sat(10_000),
      })
    );

    assert_matches!(
      FeeOrchestrator::new(&calculator).decide(FeeRequest {
        take_fee_from_amount: true,
        ..FeeRequest::new(sat(10_001), RateChoice::Target(1))
      }),
      Err(FeeError::InsufficientBalance { .. })
    );
  }

  #[test]
  fn lend_sends_everything_for_free() {
    let calculator = calculator(&[(10_000, 90)]);

    assert_eq!(
      FeeOrchestrator::new(&calculator).decide(FeeRequest {
        debt_type: DebtType::Lend,
        ..FeeRequest::new(sat(10_000), RateChoice::Target(1))
      }),
      Ok(FeeDecision {
        amount: sat(10_000),
        rate: FeeRate::ZERO,
        state: FeeState::FinalFee(Amount::ZERO),
        is_valid: true,
        spends_all: true,
      })
    );
  }

  #[test]
  fn collect_takes_fee_from_balance_net_of_debt() {
    let calculator = calculator_with_debt(&[(9_000, 90), (12_000, 100)], 1_000);

    assert_eq!(
      FeeOrchestrator::new(&calculator).decide(FeeRequest {
        debt_type: DebtType::Collect,
        ..FeeRequest::new(sat(11_000), RateChoice::Target(15))
      }),
      Ok(FeeDecision {
        amount: sat(10_962),
        rate: rate("1.5"),
        state: FeeState::FinalFee(sat(38)),
        is_valid: true,
        spends_all: true,
      })
    );
  }

  #[test]
  fn collect_spend_all_is_priced_on_every_utxo() {
    let calculator = calculator_with_debt(&[(9_000, 90), (12_000, 100)], 3_500);

    let decision = FeeOrchestrator::new(&calculator)
      .decide(FeeRequest {
        debt_type: DebtType::Collect,
        ..FeeRequest::new(sat(8_500), RateChoice::Target(1))
      })
      .unwrap();

    assert_eq!(decision.fee(), Some(sat(250)));
    assert_eq!(decision.amount, sat(8_250));
    assert!(decision.spends_all);
  }

  #[test]
  fn decision_serialization() {
    assert_eq!(
      serde_json::to_string(&FeeDecision {
        amount: sat(999),
        rate: rate("3"),
        state: FeeState::FinalFee(sat(150)),
        is_valid: true,
        spends_all: false,
      })
      .unwrap(),
      r#"{"amount":999,"rate":"3","state":{"final_fee":150},"is_valid":true,"spends_all":false}"#
    );

    assert_eq!(
      serde_json::to_string(&FeeState::NeedsChange).unwrap(),
      r#""needs_change""#
    );
  }

  #[test]
  fn check_rate() {
    let calculator = calculator(&[
      (103_456, 110),
      (20_345_678, 230),
      (303_456_789, 340),
      (703_456_789, 580),
    ]);

    let orchestrator = FeeOrchestrator::new(&calculator);

    let check = |amount, fee_rate| {
      orchestrator.check_rate(sat(amount), rate(fee_rate), DebtType::None, rate("2000"))
    };

    assert_eq!(check(1_000, "2000"), Ok(FeeWarning::TooHigh));
    assert_eq!(check(1_000, "0.5"), Ok(FeeWarning::TooLow));
    assert_eq!(check(703_456_000, "10"), Ok(FeeWarning::InsufficientFunds));
    assert_eq!(check(1_000, "1.2"), Ok(FeeWarning::VeryLow));
    assert_eq!(check(1_000, "1.5"), Ok(FeeWarning::None));
    assert_eq!(check(1_000, "5"), Ok(FeeWarning::None));
    assert_matches!(check(1, "5"), Err(FeeError::AmountTooSmall { .. }));
  }

  #[test]
  fn check_rate_against_mempool_minimum() {
    let calculator = FeeCalculator::new(
      FeeWindow {
        min_mempool_fee_rate: Some(rate("2")),
        ..targeted_fees()
      },
      nts(&[(10_000, 90)]),
      Protocol::default(),
    );

    let orchestrator = FeeOrchestrator::new(&calculator);

    assert_eq!(
      orchestrator.check_rate(sat(1_000), rate("1.5"), DebtType::None, rate("2000")),
      Ok(FeeWarning::BelowMempoolMinimum)
    );

    assert_eq!(
      orchestrator.check_rate(sat(1_000), rate("0.5"), DebtType::None, rate("2000")),
      Ok(FeeWarning::BelowMempoolMinimum)
    );

    assert_eq!(
      orchestrator.check_rate(sat(1_000), rate("2"), DebtType::None, rate("2000")),
      Ok(FeeWarning::None)
    );
  }
}
