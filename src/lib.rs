#![allow(clippy::result_large_err)]
#![deny(
  clippy::cast_lossless,
  clippy::cast_possible_truncation,
  clippy::cast_possible_wrap,
  clippy::cast_sign_loss
)]

//! Decides whether an on-chain payment is affordable, and at what fee, from
//! a wallet's next-transaction-size progression and a table of fee rates by
//! confirmation target.

use {
  self::{
    arguments::Arguments,
    config::Config,
    error::{ResultExt, SnafuError},
    options::Options,
    subcommand::{OutputFormat, Subcommand},
  },
  anyhow::{anyhow, bail, ensure, Context, Error},
  bitcoin::{Amount, OutPoint, Weight},
  clap::{Parser, ValueEnum},
  serde::{Deserialize, Deserializer, Serialize},
  serde_with::SerializeDisplay,
  snafu::{Backtrace, ErrorCompat, Snafu},
  std::{
    backtrace::BacktraceStatus,
    collections::BTreeMap,
    env,
    fmt::{self, Display, Formatter},
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
    process,
    str::FromStr,
  },
};

pub use self::{
  debt_type::DebtType,
  error::{FeeError, ProgressionError},
  fee_calculator::{FeeCalculator, FeeResult},
  fee_orchestrator::{FeeDecision, FeeOrchestrator, FeeRequest, FeeState, FeeWarning, RateChoice},
  fee_rate::FeeRate,
  fee_window::{FeeTier, FeeWindow},
  next_transaction_size::{NextTransactionSize, SizeForAmount, UtxoStatus},
  protocol::Protocol,
  settings::Settings,
  snapshot::Snapshot,
};


#[cfg(test)]
use self::test::*;

mod arguments;
mod config;
mod debt_type;
mod error;
mod fee_calculator;
mod fee_orchestrator;
mod fee_rate;
mod fee_window;
mod next_transaction_size;
pub mod options;
mod protocol;
pub mod settings;
mod snapshot;
pub mod subcommand;

type Result<T = (), E = Error> = std::result::Result<T, E>;
type SnafuResult<T = (), E = SnafuError> = std::result::Result<T, E>;

fn default<T: Default>() -> T {
  Default::default()
}

pub fn main() {
  env_logger::init();

  let args = Arguments::parse();

  let format = args.options.format;

  match args.run() {
    Err(err) => {
      eprintln!("error: {err}");

      if let SnafuError::Anyhow { err } = err {
        for (i, err) in err.chain().skip(1).enumerate() {
          if i == 0 {
            eprintln!();
            eprintln!("because:");
          }

          eprintln!("- {err}");
        }

        if env::var_os("RUST_BACKTRACE")
          .map(|val| val == "1")
          .unwrap_or_default()
        {
          eprintln!("{}", err.backtrace());
        }
      } else {
        for (i, err) in err.iter_chain().skip(1).enumerate() {
          if i == 0 {
            eprintln!();
            eprintln!("because:");
          }

          eprintln!("- {err}");
        }

        if let Some(backtrace) = err.backtrace() {
          if backtrace.status() == BacktraceStatus::Captured {
            eprintln!("backtrace:");
            eprintln!("{backtrace}");
          }
        }
      }

      process::exit(1);
    }
    Ok(output) => {
      if let Some(output) = output {
        output.print(format.unwrap_or_default());
      }
    }
  }
}
