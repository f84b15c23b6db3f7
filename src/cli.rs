//! Command-line arguments of the gateway binary.
//!
//! Positional arguments keep the historical order
//! `[cmc-api-key] [spd-port] [spd-password] [listen-port]`; any value given
//! on the command line overrides the configuration file.

use clap::Parser;
use std::path::PathBuf;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "scp-app-api")]
#[command(about = "ScPrime app API gateway", long_about = None)]
pub struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// CoinMarketCap API key.
    pub cmc_api_key: Option<String>,

    /// spd API port.
    pub spd_port: Option<u16>,

    /// spd API password.
    pub spd_password: Option<String>,

    /// Port the gateway listens on.
    pub listen_port: Option<u16>,

    /// getgeoapi key for the USD exchange-rate table.
    #[arg(long)]
    pub rates_api_key: Option<String>,
}

impl Cli {
    /// Overlay command-line values onto a loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(key) = &self.cmc_api_key {
            config.quotes.cmc_api_key = Some(key.clone());
        }
        if let Some(port) = self.spd_port {
            config.daemon.port = port;
        }
        if let Some(password) = &self.spd_password {
            config.daemon.password = password.clone();
        }
        if let Some(port) = self.listen_port {
            config.listener.set_port(port);
        }
        if let Some(key) = &self.rates_api_key {
            config.quotes.rates_api_key = Some(key.clone());
        }
    }
}
