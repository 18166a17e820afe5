#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub identifier: String,
}

/// Turns a chosen identifier into at most one navigation per mount.
#[derive(Debug, Default)]
pub struct NavigationCommitter {
    navigating: bool,
}

impl NavigationCommitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_navigating(&self) -> bool {
        self.navigating
    }

    pub fn commit(&mut self, identifier: &str) -> Option<NavigationRequest> {
        if self.navigating {
            log::debug!("ignoring commit of {identifier:?}: already navigating");
            return None;
        }
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }
        self.navigating = true;
        Some(NavigationRequest {
            identifier: identifier.to_string(),
        })
    }
}

/// Performs the page transition. Fire-and-forget from the combobox's side.
pub trait Navigator {
    fn go_to(&mut self, identifier: &str);
}

pub struct PlayerPageNavigator {
    site_url: String,
    destination: Option<String>,
}

impl PlayerPageNavigator {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            destination: None,
        }
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }
}

impl Navigator for PlayerPageNavigator {
    fn go_to(&mut self, identifier: &str) {
        let href = player_page_href(self.site_url.as_str(), identifier);
        log::info!("navigating to {href}");
        self.destination = Some(href);
    }
}

pub fn player_page_href(site_url: &str, slug: &str) -> String {
    format!(
        "{}/players/{}",
        site_url.trim_end_matches('/'),
        urlencoding::encode(slug)
    )
}
