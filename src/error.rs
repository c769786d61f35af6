use super::*;

/// Reasons a payment cannot be priced. Everything else the calculator runs
/// into, like gaps in the rate table or an amount that spills into the next
/// bracket, is resolved internally.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Snafu)]
#[snafu(context(suffix(false)), visibility(pub(crate)))]
pub enum FeeError {
  #[snafu(display(
    "amount of {} sat is below the dust threshold of {} sat",
    amount.to_sat(),
    dust.to_sat()
  ))]
  AmountTooSmall { amount: Amount, dust: Amount },
  #[snafu(display(
    "insufficient balance to send {} sat: {} sat available",
    amount.to_sat(),
    available.to_sat()
  ))]
  InsufficientBalance { amount: Amount, available: Amount },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Snafu)]
#[snafu(context(suffix(false)), visibility(pub(crate)))]
pub enum ProgressionError {
  #[snafu(display(
    "size progression must be strictly increasing: entry {index} has {} sat after {} sat",
    amount.to_sat(),
    previous.to_sat()
  ))]
  NotIncreasing {
    index: usize,
    amount: Amount,
    previous: Amount,
  },
}

#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)), visibility(pub(crate)))]
pub enum SnafuError {
  #[snafu(display("{err}"))]
  Anyhow { err: anyhow::Error },
  #[snafu(display("I/O error at `{}`", path.display()))]
  Io {
    backtrace: Backtrace,
    path: PathBuf,
    source: io::Error,
  },
  #[snafu(display("failed to parse snapshot `{}`", path.display()))]
  SnapshotParse {
    backtrace: Backtrace,
    path: PathBuf,
    source: serde_yaml::Error,
  },
  #[snafu(display("failed to parse snapshot `{}`", path.display()))]
  SnapshotJson {
    backtrace: Backtrace,
    path: PathBuf,
    source: serde_json::Error,
  },
}

impl From<Error> for SnafuError {
  fn from(err: Error) -> SnafuError {
    Self::Anyhow { err }
  }
}

/// Gives access to `snafu::ResultExt::context`, which is otherwise shadowed
/// by `anyhow::Context::context`.
pub(crate) trait ResultExt<T, E>: Sized {
  fn snafu_context<C, E2>(self, context: C) -> Result<T, E2>
  where
    C: snafu::IntoError<E2, Source = E>,
    E2: std::error::Error + snafu::ErrorCompat;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E> {
  fn snafu_context<C, E2>(self, context: C) -> Result<T, E2>
  where
    C: snafu::IntoError<E2, Source = E>,
    E2: std::error::Error + snafu::ErrorCompat,
  {
    use snafu::ResultExt;
    self.context(context)
  }
}
