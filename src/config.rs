use std::net::{Ipv4Addr, SocketAddr};

/// Settings for the treemap viewer.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Address the HTTP server binds to.
    pub addr: SocketAddr,
    /// Shown as the page title, usually the dump's path.
    pub title: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            title: "allocations".to_string(),
        }
    }
}

impl ViewerConfig {
    #[must_use]
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
