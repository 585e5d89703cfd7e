use async_trait::async_trait;
use hickory_resolver::{
    config::{ResolverConfig, ResolverOpts},
    TokioAsyncResolver,
};

use crate::{configuration::EnrichmentSettings, domain::StepOutcome};

#[async_trait]
pub trait MxLookup: Send + Sync {
    /// Mail exchange hosts for `domain`.
    async fn mail_exchanges(&self, domain: &str) -> StepOutcome<Vec<String>>;
}

pub struct DnsMxLookup {
    resolver: TokioAsyncResolver,
}

impl DnsMxLookup {
    pub fn new(settings: &EnrichmentSettings) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = settings.mx_timeout();
        opts.attempts = 1;

        let resolver = match hickory_resolver::system_conf::read_system_conf() {
            Ok((config, _)) => TokioAsyncResolver::tokio(config, opts),
            Err(e) => {
                log::warn!(
                    "Could not read system DNS config, using public resolvers: {:?}",
                    e
                );
                TokioAsyncResolver::tokio(ResolverConfig::default(), opts)
            }
        };

        DnsMxLookup { resolver }
    }
}

#[async_trait]
impl MxLookup for DnsMxLookup {
    async fn mail_exchanges(&self, domain: &str) -> StepOutcome<Vec<String>> {
        match self.resolver.mx_lookup(domain).await {
            Ok(lookup) => {
                let exchanges: Vec<String> = lookup
                    .iter()
                    .map(|mx| mx.exchange().to_string().trim_end_matches('.').to_string())
                    .collect();
                match exchanges.is_empty() {
                    true => StepOutcome::Empty,
                    false => StepOutcome::Found(exchanges),
                }
            }
            Err(e) => {
                log::warn!("MX lookup failed for {}: {}", domain, e);
                StepOutcome::failed(e)
            }
        }
    }
}

/// True iff at least one MX record exists. Lookup errors count as false.
pub async fn has_mail_exchange(lookup: &dyn MxLookup, domain: &str) -> bool {
    match lookup.mail_exchanges(domain).await {
        StepOutcome::Found(exchanges) => {
            log::debug!("{} receives mail via {:?}", domain, exchanges);
            true
        }
        StepOutcome::Empty | StepOutcome::Failed(_) => false,
    }
}
