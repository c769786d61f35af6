use super::*;

/// A fee rate in satoshis per virtual byte.
///
/// Rates are kept as an integer number of thousandths of a satoshi per
/// virtual byte, so rates like `12.15` and `0.5` multiply out exactly and
/// fees are rounded up exactly once.
#[derive(
  Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default, Hash, SerializeDisplay,
)]
pub struct FeeRate(u64);

impl FeeRate {
  const SCALE: u64 = 1000;
  const DECIMALS: usize = 3;

  pub const ZERO: Self = Self(0);

  pub const fn from_sat_per_vb(sat_per_vb: u64) -> Self {
    Self(sat_per_vb.saturating_mul(Self::SCALE))
  }

  pub const fn from_sat_per_kvb(sat_per_kvb: u64) -> Self {
    Self(sat_per_kvb)
  }

  /// One satoshi per weight unit is four satoshis per virtual byte.
  pub fn from_sat_per_kwu(sat_per_kwu: u64) -> Option<Self> {
    sat_per_kwu.checked_mul(4).map(Self)
  }

  pub fn sat_per_kvb(self) -> u64 {
    self.0
  }

  /// Fee for a transaction of `vsize` virtual bytes, rounded up to the next
  /// whole satoshi. `None` if the fee does not fit in an amount.
  pub fn fee(self, vsize: u64) -> Option<Amount> {
    let sats = (u128::from(self.0) * u128::from(vsize)).div_ceil(u128::from(Self::SCALE));
    u64::try_from(sats).ok().map(Amount::from_sat)
  }

  /// Fee for a transaction of the given weight. The weight is first rounded
  /// up to whole virtual bytes.
  pub fn fee_wu(self, weight: Weight) -> Option<Amount> {
    self.fee(weight.to_vbytes_ceil())
  }
}

impl Display for FeeRate {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let integer = self.0 / Self::SCALE;
    let mut fraction = self.0 % Self::SCALE;

    write!(f, "{integer}")?;

    if fraction > 0 {
      let mut width = Self::DECIMALS;

      while fraction % 10 == 0 {
        fraction /= 10;
        width -= 1;
      }

      write!(f, ".{fraction:0>width$}")?;
    }

    Ok(())
  }
}

impl FromStr for FeeRate {
  type Err = Error;

  /// Parses a decimal rate. Digits past the third decimal place round the
  /// rate up to the next thousandth, so a parsed rate never undercharges.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (integer, fraction) = s.split_once('.').unwrap_or((s, ""));

    ensure!(
      !integer.is_empty() || !fraction.is_empty(),
      "empty fee rate"
    );

    ensure!(
      integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()),
      "invalid fee rate `{s}`"
    );

    let integer = if integer.is_empty() {
      0
    } else {
      integer.parse::<u64>()?
    };

    let (kept, rest) = fraction.split_at(fraction.len().min(Self::DECIMALS));

    let fraction = if kept.is_empty() {
      0
    } else {
      format!("{kept:0<width$}", width = Self::DECIMALS).parse::<u64>()?
    };

    let round_up = u64::from(rest.bytes().any(|b| b != b'0'));

    integer
      .checked_mul(Self::SCALE)
      .and_then(|integer| integer.checked_add(fraction))
      .and_then(|rate| rate.checked_add(round_up))
      .map(Self)
      .ok_or_else(|| anyhow!("fee rate `{s}` out of range"))
  }
}

impl TryFrom<f64> for FeeRate {
  type Error = Error;

  fn try_from(rate: f64) -> Result<Self, Self::Error> {
    if rate.is_sign_negative() | rate.is_nan() | rate.is_infinite() {
      bail!("invalid fee rate: {rate}")
    }

    rate.to_string().parse()
  }
}

impl<'de> Deserialize<'de> for FeeRate {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
      Integer(u64),
      Float(f64),
      Text(String),
    }

    match Repr::deserialize(deserializer)? {
      Repr::Integer(sat_per_vb) => sat_per_vb
        .checked_mul(Self::SCALE)
        .map(Self)
        .ok_or_else(|| anyhow!("fee rate `{sat_per_vb}` out of range")),
      Repr::Float(rate) => Self::try_from(rate),
      Repr::Text(text) => text.parse(),
    }
    .map_err(serde::de::Error::custom)
  }
}
