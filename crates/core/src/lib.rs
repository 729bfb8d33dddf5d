pub mod catalog;
pub mod domain;
pub mod engine;
pub mod info;
pub mod quotes;

pub mod config {
    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub catalog_path: Option<String>,
        pub quote_provider_base_url: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                catalog_path: non_empty_var("NESTEGG_CATALOG_PATH"),
                quote_provider_base_url: non_empty_var("QUOTE_PROVIDER_BASE_URL"),
            })
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }
}
