use crate::config::ScanConfig;
use crate::constants::BUILTIN_OUI;
use ::oui::OuiDatabase;
use async_trait::async_trait;
use eui48::MacAddress;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// MAC vendor resolution: persisted cache, bundled OUI table, optional
/// remote API, tried in that order. Lookups never fail; every miss is an
/// absent vendor.
pub mod oui {
    use super::*;

    /// Static OUI table, loaded lazily on first lookup
    static STATIC_DB: OnceCell<Arc<OuiDatabase>> = OnceCell::new();

    /// Last-resort vendor source consulted over the network.
    /// Implementations bound their own latency; any error is a miss.
    #[async_trait]
    pub trait RemoteVendorLookup: Send + Sync {
        async fn lookup(&self, mac: &str) -> Option<String>;
    }

    /// Client for the macvendors.com lookup endpoint.
    pub struct MacVendorsApi {
        client: reqwest::Client,
    }

    impl MacVendorsApi {
        pub fn new(timeout: Duration) -> Option<Self> {
            let client = reqwest::Client::builder().timeout(timeout).build().ok()?;
            Some(Self { client })
        }
    }

    #[async_trait]
    impl RemoteVendorLookup for MacVendorsApi {
        async fn lookup(&self, mac: &str) -> Option<String> {
            let url = format!("https://api.macvendors.com/{}", mac);
            let response = self.client.get(&url).send().await.ok()?;
            if !response.status().is_success() {
                return None;
            }
            let body = response.text().await.ok()?;
            let name = body.trim();
            // the endpoint reports unknown prefixes as a JSON error body
            if name.is_empty() || name.starts_with('{') {
                return None;
            }
            Some(name.to_string())
        }
    }

    /// Prefix-to-vendor map persisted between runs as JSON.
    #[derive(Debug)]
    pub struct VendorCache {
        map: HashMap<String, String>,
        path: Option<PathBuf>,
        dirty: bool,
    }

    impl VendorCache {
        /// Empty cache that will persist to `path` when saved.
        pub fn empty(path: Option<PathBuf>) -> Self {
            Self {
                map: HashMap::new(),
                path,
                dirty: false,
            }
        }

        /// Load the cache from `path`. A missing or unreadable file yields
        /// an empty cache; a sweep never fails over its cache.
        pub fn open(path: Option<PathBuf>) -> Self {
            let mut cache = Self::empty(path);
            let Some(path) = cache.path.clone() else {
                return cache;
            };
            let data = match std::fs::read_to_string(&path) {
                Ok(data) => data,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return cache,
                Err(e) => {
                    log::warn!("cannot read vendor cache {}: {}", path.display(), e);
                    return cache;
                }
            };
            match serde_json::from_str::<HashMap<String, String>>(&data) {
                Ok(map) => {
                    log::debug!(
                        "loaded {} vendor cache entries from {}",
                        map.len(),
                        path.display()
                    );
                    cache.map = map;
                }
                Err(e) => {
                    log::warn!("ignoring corrupt vendor cache {}: {}", path.display(), e)
                }
            }
            cache
        }

        pub fn get(&self, prefix: &str) -> Option<String> {
            self.map.get(prefix).cloned()
        }

        /// Record a resolved prefix. Keys are expected in normalized form.
        pub fn insert(&mut self, prefix: &str, vendor: &str) {
            self.map.insert(prefix.to_string(), vendor.to_string());
            self.dirty = true;
        }

        pub fn len(&self) -> usize {
            self.map.len()
        }

        pub fn is_empty(&self) -> bool {
            self.map.is_empty()
        }

        /// Write the cache back if it changed. Failures are logged and
        /// swallowed; cache persistence never aborts a sweep.
        pub fn save(&mut self) {
            if !self.dirty {
                return;
            }
            let Some(path) = self.path.clone() else {
                return;
            };
            if let Some(parent) = path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    log::warn!("cannot create cache directory {}: {}", parent.display(), e);
                    return;
                }
            }
            let json = match serde_json::to_string_pretty(&self.map) {
                Ok(json) => json,
                Err(e) => {
                    log::warn!("cannot serialize vendor cache: {}", e);
                    return;
                }
            };
            match std::fs::write(&path, json) {
                Ok(()) => {
                    log::debug!("saved {} vendor cache entries to {}", self.map.len(), path.display());
                    self.dirty = false;
                }
                Err(e) => log::warn!("cannot save vendor cache {}: {}", path.display(), e),
            }
        }
    }

    /// Shared three-tier vendor resolver handed to probe workers.
    #[derive(Clone)]
    pub struct VendorResolver {
        cache: Arc<Mutex<VendorCache>>,
        remote: Option<Arc<dyn RemoteVendorLookup>>,
    }

    impl VendorResolver {
        /// Resolver with the default per-user cache location and, unless
        /// running offline, the macvendors.com fallback.
        pub fn open(config: &ScanConfig) -> Self {
            let remote: Option<Arc<dyn RemoteVendorLookup>> = if config.offline {
                None
            } else {
                MacVendorsApi::new(Duration::from_millis(config.vendor_api_timeout_ms))
                    .map(|api| Arc::new(api) as Arc<dyn RemoteVendorLookup>)
            };
            Self {
                cache: Arc::new(Mutex::new(VendorCache::open(default_cache_path()))),
                remote,
            }
        }

        /// Resolver over a caller-supplied cache and remote source.
        pub fn with_parts(
            cache: VendorCache,
            remote: Option<Arc<dyn RemoteVendorLookup>>,
        ) -> Self {
            Self {
                cache: Arc::new(Mutex::new(cache)),
                remote,
            }
        }

        /// Resolve a MAC address to a vendor name. Cache and static tiers
        /// answer under the lock; the remote tier runs without holding it
        /// so one slow lookup cannot stall other workers.
        pub async fn resolve(&self, mac: &str) -> Option<String> {
            let prefix = normalize_prefix(mac)?;
            {
                let mut cache = self.cache.lock().await;
                if let Some(vendor) = cache.get(&prefix) {
                    return Some(vendor);
                }
                if let Some(vendor) = static_lookup(&prefix) {
                    cache.insert(&prefix, &vendor);
                    return Some(vendor);
                }
            }
            let remote = self.remote.as_ref()?;
            let vendor = remote.lookup(&prefix_to_mac(&prefix)).await?;
            self.cache.lock().await.insert(&prefix, &vendor);
            Some(vendor)
        }

        /// Write the cache back to disk, best-effort.
        pub async fn persist(&self) {
            self.cache.lock().await.save();
        }

        pub async fn entry_count(&self) -> usize {
            self.cache.lock().await.len()
        }
    }

    /// Normalize a MAC address to its six-digit OUI prefix: separators
    /// stripped, uppercased. Anything without six leading hex digits is
    /// malformed and unresolvable.
    pub fn normalize_prefix(mac: &str) -> Option<String> {
        let cleaned: String = mac
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.' | ' '))
            .collect();
        if cleaned.len() < 6 || !cleaned.chars().take(6).all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(cleaned[..6].to_ascii_uppercase())
    }

    /// Default per-user cache file location.
    pub fn default_cache_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("lansweep").join("oui-cache.json"))
    }

    /// Optional operator-installed override table next to the cache file.
    fn manuf_override_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("lansweep").join("manuf.txt"))
    }

    /// Query the static OUI tier. Takes any MAC form; input without six
    /// leading hex digits is a miss.
    pub fn static_lookup(prefix: &str) -> Option<String> {
        let prefix = normalize_prefix(prefix)?;
        let mac_addr = MacAddress::parse_str(&prefix_to_mac(&prefix)).ok()?;
        let entry = static_db().query_by_mac(&mac_addr).ok().flatten()?;
        let name = entry
            .name_long
            .clone()
            .unwrap_or_else(|| entry.name_short.clone());
        (!name.is_empty()).then_some(name)
    }

    /// Parse a manuf-format table from disk. Unreadable or invalid files
    /// are warned about and skipped.
    pub fn load_manuf_override(path: &Path) -> Option<OuiDatabase> {
        match OuiDatabase::new_from_file(path) {
            Ok(db) => Some(db),
            Err(e) => {
                log::warn!("ignoring invalid vendor override {}: {}", path.display(), e);
                None
            }
        }
    }

    fn static_db() -> &'static Arc<OuiDatabase> {
        STATIC_DB.get_or_init(|| {
            let override_db = manuf_override_path()
                .filter(|p| p.exists())
                .and_then(|p| {
                    let db = load_manuf_override(&p);
                    if db.is_some() {
                        log::info!("using vendor override table {}", p.display());
                    }
                    db
                });
            Arc::new(override_db.unwrap_or_else(|| {
                OuiDatabase::new_from_str(BUILTIN_OUI).expect("built-in OUI table is valid")
            }))
        })
    }

    fn prefix_to_mac(prefix: &str) -> String {
        format!(
            "{}:{}:{}:00:00:00",
            &prefix[0..2],
            &prefix[2..4],
            &prefix[4..6]
        )
    }
}
