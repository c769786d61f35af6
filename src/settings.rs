use super::*;

/// Options resolved against the environment and the config file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
  protocol: Protocol,
  max_fee_rate: FeeRate,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      protocol: Protocol::default(),
      max_fee_rate: Self::MAX_FEE_RATE,
    }
  }
}

impl Settings {
  pub const MAX_FEE_RATE: FeeRate = FeeRate::from_sat_per_vb(2_000);

  pub fn load(options: &Options) -> Result<Self> {
    let config: Config = match &options.config {
      Some(path) => {
        log::debug!("Loading configuration from `{}`", path.display());
        serde_yaml::from_reader(
          File::open(path).with_context(|| format!("failed to open config `{}`", path.display()))?,
        )
        .with_context(|| format!("failed to parse config `{}`", path.display()))?
      }
      None => default(),
    };

    let dust = Self::setting_typed(
      options.dust_threshold,
      Some("DUST_THRESHOLD"),
      config.dust_threshold,
      Protocol::DUST.to_sat(),
    )?;

    let min_fee_rate = Self::setting_typed(
      options.min_fee_rate,
      Some("MIN_FEE_RATE"),
      config.min_fee_rate,
      Protocol::MIN_FEE_RATE,
    )?;

    let max_fee_rate = Self::setting_typed(
      options.max_fee_rate,
      Some("MAX_FEE_RATE"),
      config.max_fee_rate,
      Self::MAX_FEE_RATE,
    )?;

    ensure!(
      min_fee_rate < max_fee_rate,
      "minimum fee rate of {min_fee_rate} sat/vB must be below maximum fee rate of {max_fee_rate} sat/vB",
    );

    let settings = Self {
      protocol: Protocol {
        dust: Amount::from_sat(dust),
        min_fee_rate,
      },
      max_fee_rate,
    };

    log::info!(
      "Using dust threshold of {dust} sat and fee rates between {min_fee_rate} and {max_fee_rate} sat/vB"
    );

    Ok(settings)
  }

  pub fn protocol(&self) -> Protocol {
    self.protocol
  }

  pub fn max_fee_rate(&self) -> FeeRate {
    self.max_fee_rate
  }

  fn setting_typed<T>(
    arg_value: Option<T>,
    env_key: Option<&str>,
    config_value: Option<T>,
    default_value: T,
  ) -> Result<T>
  where
    T: FromStr,
    Error: From<T::Err>,
  {
    if let Some(arg_value) = arg_value {
      return Ok(arg_value);
    }

    if let Some(env_key) = env_key {
      let key = format!("FEE_ENGINE_{env_key}");
      match env::var(&key) {
        Ok(env_value) => {
          return env_value
            .parse::<T>()
            .map_err(Error::from)
            .with_context(|| anyhow!("failed to parse {key}"))
        }
        Err(err @ env::VarError::NotUnicode(_)) => return Err(err.into()),
        Err(env::VarError::NotPresent) => {}
      }
    }

    if let Some(config_value) = config_value {
      return Ok(config_value);
    }

    Ok(default_value)
  }
}
