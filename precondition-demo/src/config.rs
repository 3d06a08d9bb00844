use std::net::{IpAddr, SocketAddr};

use envconfig::Envconfig;
use precondition::pagination::Limits;

#[derive(Debug, Clone, Envconfig)]
pub struct Config {
    #[envconfig(from = "HTTP_HOST", default = "0.0.0.0")]
    pub http_host: IpAddr,

    #[envconfig(from = "HTTP_PORT", default = "3000")]
    pub http_port: u16,

    /// Fallback filter directive, used when `RUST_LOG` is not set.
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,

    #[envconfig(from = "PAGE_DEFAULT_LIMIT", default = "50")]
    pub page_default_limit: usize,

    #[envconfig(from = "PAGE_MAX_LIMIT", default = "100")]
    pub page_max_limit: usize,

    #[envconfig(from = "EMISSIONS_COUNT", default = "10000")]
    pub emissions_count: u64,

    #[envconfig(from = "EMISSIONS_SEED", default = "42")]
    pub emissions_seed: u64,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        (self.http_host, self.http_port).into()
    }

    pub fn limits(&self) -> Limits {
        Limits {
            default: self.page_default_limit,
            max: self.page_max_limit,
        }
    }
}
