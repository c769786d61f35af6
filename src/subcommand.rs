use super::*;

pub mod balance;
pub mod check_rate;
pub mod fee;
pub mod rate;

#[derive(Debug, Parser)]
pub(crate) enum Subcommand {
  #[command(about = "Show total and usable balance")]
  Balance(balance::Balance),
  #[command(about = "Check a manually entered fee rate")]
  CheckRate(check_rate::CheckRate),
  #[command(about = "Calculate the fee for a payment")]
  Fee(fee::Fee),
  #[command(about = "Resolve the fee rate for a confirmation target")]
  Rate(rate::Rate),
}

impl Subcommand {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    match self {
      Self::Balance(balance) => balance.run(settings),
      Self::CheckRate(check_rate) => check_rate.run(settings),
      Self::Fee(fee) => fee.run(settings),
      Self::Rate(rate) => rate.run(settings),
    }
  }
}

#[derive(Debug, PartialEq, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Json,
  Yaml,
  Minify,
}

pub trait Output: Send {
  fn print(&self, format: OutputFormat);
}

impl<T> Output for T
where
  T: Serialize + Send,
{
  fn print(&self, format: OutputFormat) {
    match format {
      OutputFormat::Json => serde_json::to_writer_pretty(io::stdout(), self).ok(),
      OutputFormat::Yaml => serde_yaml::to_writer(io::stdout(), self).ok(),
      OutputFormat::Minify => serde_json::to_writer(io::stdout(), self).ok(),
    };
    println!();
  }
}

pub(crate) type SubcommandResult = Result<Option<Box<dyn Output>>>;
