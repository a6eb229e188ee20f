use crate::config::SiteSettings;
use crate::presentation::views::{BrandView, FooterView, LayoutChrome, PageMetaView};

/// Builds the page chrome (brand, footer, default meta) from site settings.
#[derive(Clone)]
pub struct ChromeService {
    site: SiteSettings,
}

impl ChromeService {
    pub fn new(site: SiteSettings) -> Self {
        Self { site }
    }

    pub fn site(&self) -> &SiteSettings {
        &self.site
    }

    pub fn load(&self) -> LayoutChrome {
        LayoutChrome {
            brand: BrandView {
                title: self.site.name.clone(),
                href: "/".to_string(),
            },
            footer: FooterView {
                copy: format!("© {}", self.site.name),
            },
            meta: PageMetaView {
                title: self.site.name.clone(),
                description: self.site.description.clone(),
                canonical: self.site.url.to_string(),
            },
        }
    }

    /// Absolute URL for `path` on the public site. Falls back to the site root.
    pub fn canonical_url(&self, path: &str) -> String {
        self.site
            .url
            .join(path.trim_start_matches('/'))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| self.site.url.to_string())
    }
}
