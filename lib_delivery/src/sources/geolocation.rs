//! # IP Geolocation
//!
//! Four free lookup services, tried in order by a [`FallbackChain`]:
//! ipapi.co, ipinfo.io, ip-api.com and finally the Cloudflare trace endpoint,
//! which answers plain `key=value` text and practically never fails.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::delivery::{FallbackChain, Provider};
use crate::error::{DeliveryError, DeliveryResult};
use crate::model::GeoLocation;
use crate::retrieve::ApiClient;

/// A geolocation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoService {
    /// `https://ipapi.co/json/`
    IpApiCo,
    /// `https://ipinfo.io/json`
    IpInfo,
    /// `https://ip-api.com/json/`
    IpApiCom,
    /// `https://www.cloudflare.com/cdn-cgi/trace`
    CloudflareTrace,
}

impl GeoService {
    /// Services in fallback order.
    pub const ALL: [GeoService; 4] = [
        GeoService::IpApiCo,
        GeoService::IpInfo,
        GeoService::IpApiCom,
        GeoService::CloudflareTrace,
    ];

    /// Provider name.
    pub fn name(&self) -> &'static str {
        match self {
            GeoService::IpApiCo => "ipapi.co",
            GeoService::IpInfo => "ipinfo.io",
            GeoService::IpApiCom => "ip-api.com",
            GeoService::CloudflareTrace => "cloudflare-trace",
        }
    }

    fn base_url(&self) -> &'static str {
        match self {
            GeoService::IpApiCo => "https://ipapi.co/",
            GeoService::IpInfo => "https://ipinfo.io/",
            GeoService::IpApiCom => "https://ip-api.com/",
            GeoService::CloudflareTrace => "https://www.cloudflare.com/",
        }
    }

    fn path(&self) -> &'static str {
        match self {
            GeoService::IpApiCo => "json/",
            GeoService::IpInfo => "json",
            GeoService::IpApiCom => "json/",
            GeoService::CloudflareTrace => "cdn-cgi/trace",
        }
    }

    fn query(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            GeoService::IpApiCom => &[("fields", "query,country,countryCode")],
            _ => &[],
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpApiCoBody {
    ip: Option<String>,
    country_name: Option<String>,
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IpInfoBody {
    ip: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiComBody {
    query: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
}

/// Parses a Cloudflare trace body (`ip=…\nloc=AE\n…`).
///
/// The trace only knows the ISO code, so it doubles as the country name.
pub fn parse_trace(text: &str) -> GeoLocation {
    let mut ip = None;
    let mut loc = None;
    for line in text.lines() {
        match line.trim().split_once('=') {
            Some(("ip", value)) => ip = Some(value.to_string()),
            Some(("loc", value)) => loc = Some(value.to_string()),
            _ => {}
        }
    }
    GeoLocation {
        ip: ip.unwrap_or_else(|| "unknown".to_string()),
        country: loc.clone().unwrap_or_else(|| "unknown".to_string()),
        country_code: loc.unwrap_or_default(),
        source: String::new(),
    }
}

/// One geolocation service as a provider.
pub struct GeoProvider {
    service: GeoService,
    client: ApiClient,
}

impl GeoProvider {
    /// Builds the provider with its own HTTP client.
    pub fn new(service: GeoService, timeout: Duration) -> anyhow::Result<Self> {
        let client = ApiClient::with_options(service.base_url(), None, 0, timeout)?;
        Ok(Self { service, client })
    }

    async fn lookup(&self) -> DeliveryResult<GeoLocation> {
        let path = self.service.path();
        let query = self.service.query();
        let location = match self.service {
            GeoService::IpApiCo => {
                let body: IpApiCoBody = self.client.get_json(path, query).await?;
                GeoLocation {
                    ip: body.ip.unwrap_or_default(),
                    country: body.country_name.unwrap_or_default(),
                    country_code: body.country_code.unwrap_or_default(),
                    source: String::new(),
                }
            }
            GeoService::IpInfo => {
                let body: IpInfoBody = self.client.get_json(path, query).await?;
                let country = body.country.unwrap_or_default();
                GeoLocation {
                    ip: body.ip.unwrap_or_default(),
                    country_code: country.clone(),
                    country,
                    source: String::new(),
                }
            }
            GeoService::IpApiCom => {
                let body: IpApiComBody = self.client.get_json(path, query).await?;
                GeoLocation {
                    ip: body.query.unwrap_or_default(),
                    country: body.country.unwrap_or_default(),
                    country_code: body.country_code.unwrap_or_default(),
                    source: String::new(),
                }
            }
            GeoService::CloudflareTrace => parse_trace(&self.client.get_text(path).await?),
        };
        Ok(location)
    }
}

#[async_trait]
impl Provider<GeoLocation> for GeoProvider {
    fn name(&self) -> &str {
        self.service.name()
    }

    async fn fetch(&self) -> DeliveryResult<Vec<GeoLocation>> {
        let location = self.lookup().await?;
        if location.ip.trim().is_empty() {
            return Err(DeliveryError::provider(self.service.name(), "no IP in response"));
        }
        Ok(vec![location])
    }
}

/// The four services chained in fallback order, each called once.
pub fn geo_chain(timeout: Duration) -> anyhow::Result<FallbackChain<GeoLocation>> {
    GeoService::ALL
        .into_iter()
        .try_fold(FallbackChain::new("geolocation"), |chain, service| {
            let provider: Arc<dyn Provider<GeoLocation>> = Arc::new(GeoProvider::new(service, timeout)?);
            Ok(chain.then(provider))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_lines_are_parsed() {
        let trace = "fl=123f\nh=www.cloudflare.com\nip=203.0.113.7\nts=1700000000\nloc=AE\ntls=TLSv1.3\n";
        let location = parse_trace(trace);
        assert_eq!(location.ip, "203.0.113.7");
        assert_eq!(location.country, "AE");
        assert_eq!(location.country_code, "AE");
    }

    #[test]
    fn empty_trace_is_unknown() {
        let location = parse_trace("");
        assert_eq!(location.ip, "unknown");
        assert_eq!(location.country, "unknown");
        assert_eq!(location.country_code, "");
    }

    #[test]
    fn chain_keeps_service_order() {
        let chain = geo_chain(Duration::from_secs(5)).unwrap();
        assert_eq!(chain.provider_names(), ["ipapi.co", "ipinfo.io", "ip-api.com", "cloudflare-trace"]);
    }

    #[test]
    fn response_bodies_deserialize() {
        let body: IpApiComBody =
            serde_json::from_str(r#"{"query":"198.51.100.1","country":"United Arab Emirates","countryCode":"AE"}"#).unwrap();
        assert_eq!(body.query.as_deref(), Some("198.51.100.1"));
        assert_eq!(body.country_code.as_deref(), Some("AE"));
    }
}
