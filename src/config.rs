use super::*;

#[derive(Deserialize, Default, PartialEq, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
  pub(crate) dust_threshold: Option<u64>,
  pub(crate) min_fee_rate: Option<FeeRate>,
  pub(crate) max_fee_rate: Option<FeeRate>,
}
