use std::time::Duration;

use anyhow::Context;
use url::Url;

use crate::retry::ReloadPolicy;

/// Application configuration, validated from the CLI surface.
pub struct Config {
    pub catalog: Url,
    pub token: Option<String>,
    pub check_authentication: bool,
    pub resume: bool,
    pub recurse: bool,
    pub page_size: usize,
    pub timeout: Duration,
    pub reload_policy: ReloadPolicy,
}

impl Config {
    pub fn from_cli(cli: crate::cli::Cli) -> anyhow::Result<Self> {
        let catalog: Url = cli
            .catalog
            .parse()
            .with_context(|| format!("'{}' is not a valid catalog URL", cli.catalog))?;
        if !matches!(catalog.scheme(), "http" | "https") {
            anyhow::bail!("catalog URL must be http or https, got '{}'", catalog.scheme());
        }
        if cli.page_size == 0 {
            anyhow::bail!("--page-size must be at least 1");
        }

        Ok(Self {
            catalog,
            token: cli.token,
            check_authentication: !cli.no_auth_check,
            resume: cli.resume,
            recurse: cli.recurse,
            page_size: cli.page_size,
            timeout: Duration::from_secs(cli.timeout),
            reload_policy: ReloadPolicy {
                max_reloads: cli.max_reloads,
                base_delay_secs: cli.reload_delay,
                max_delay_secs: 60,
            },
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("catalog", &self.catalog.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("resume", &self.resume)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}
