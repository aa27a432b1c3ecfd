//! Adapters for AI chat sites
//!
//! On a supported site the expansion target is the site's prompt input even
//! when it isn't focused, and the site's send control can be clicked after
//! inserting. Each site lists selectors in priority order; the first one
//! matching anything in the document wins.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::dom::{Document, NodeId, Selector};

pub trait SiteAdapter: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this adapter handles pages on `hostname`
    fn matches(&self, hostname: &str) -> bool;

    fn input_selectors(&self) -> &[Selector];

    fn send_selectors(&self) -> &[Selector];

    /// The site's prompt input
    fn find_input_element(&self, doc: &Document) -> Option<NodeId> {
        first_match(doc, self.input_selectors())
    }

    /// The site's send button
    fn find_send_control(&self, doc: &Document) -> Option<NodeId> {
        first_match(doc, self.send_selectors())
    }
}

fn first_match(doc: &Document, selectors: &[Selector]) -> Option<NodeId> {
    selectors
        .iter()
        .find_map(|selector| doc.query_selector(selector))
}

struct SiteTable {
    hostname: Regex,
    input: Vec<Selector>,
    send: Vec<Selector>,
}

impl SiteTable {
    fn new(hostname: &str, input: &[&str], send: &[&str]) -> Self {
        let parse = |selectors: &[&str]| -> Vec<Selector> {
            selectors
                .iter()
                .map(|selector| Selector::parse(selector).expect("Invalid selector"))
                .collect()
        };
        SiteTable {
            hostname: Regex::new(hostname).expect("Invalid regex"),
            input: parse(input),
            send: parse(send),
        }
    }
}

static CHATGPT: LazyLock<SiteTable> = LazyLock::new(|| {
    SiteTable::new(
        r"chat\.openai\.com|chatgpt\.com",
        &["textarea", "div[contenteditable='true']"],
        &["button[data-testid='send-button']", "button[aria-label='Send']"],
    )
});

static CLAUDE: LazyLock<SiteTable> = LazyLock::new(|| {
    SiteTable::new(
        r"claude\.ai",
        &["div[contenteditable='true']", "textarea"],
        &["button[aria-label='Send']", "button[type='submit']"],
    )
});

static PERPLEXITY: LazyLock<SiteTable> = LazyLock::new(|| {
    SiteTable::new(
        r"perplexity\.ai",
        &["textarea", "div[contenteditable='true']"],
        &["button[aria-label='Submit']", "button[type='submit']"],
    )
});

static GEMINI: LazyLock<SiteTable> = LazyLock::new(|| {
    SiteTable::new(
        r"gemini\.google\.com",
        &["textarea", "div[contenteditable='true']"],
        &["button[aria-label='Send']", "button[type='submit']"],
    )
});

/// Built-in AI chat sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiSite {
    ChatGpt,
    Claude,
    Perplexity,
    Gemini,
}

impl AiSite {
    /// Lookup order
    pub const ALL: [AiSite; 4] = [
        AiSite::ChatGpt,
        AiSite::Claude,
        AiSite::Perplexity,
        AiSite::Gemini,
    ];

    fn table(self) -> &'static SiteTable {
        match self {
            AiSite::ChatGpt => &*CHATGPT,
            AiSite::Claude => &*CLAUDE,
            AiSite::Perplexity => &*PERPLEXITY,
            AiSite::Gemini => &*GEMINI,
        }
    }
}

impl SiteAdapter for AiSite {
    fn name(&self) -> &str {
        match self {
            AiSite::ChatGpt => "ChatGPT",
            AiSite::Claude => "Claude",
            AiSite::Perplexity => "Perplexity",
            AiSite::Gemini => "Gemini",
        }
    }

    fn matches(&self, hostname: &str) -> bool {
        self.table().hostname.is_match(hostname)
    }

    fn input_selectors(&self) -> &[Selector] {
        &self.table().input
    }

    fn send_selectors(&self) -> &[Selector] {
        &self.table().send
    }
}

/// Ordered set of site adapters; the first match wins
pub struct SiteRegistry {
    adapters: Vec<Box<dyn SiteAdapter>>,
}

impl SiteRegistry {
    pub fn empty() -> Self {
        SiteRegistry {
            adapters: Vec::new(),
        }
    }

    /// Registry with every built-in site
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for site in AiSite::ALL {
            registry.register(Box::new(site));
        }
        registry
    }

    pub fn register(&mut self, adapter: Box<dyn SiteAdapter>) {
        self.adapters.push(adapter);
    }

    pub fn adapter_for(&self, hostname: &str) -> Option<&dyn SiteAdapter> {
        let adapter = self
            .adapters
            .iter()
            .find(|adapter| adapter.matches(hostname))
            .map(|adapter| adapter.as_ref());
        if let Some(adapter) = adapter {
            debug!(hostname, site = adapter.name(), "Matched site adapter");
        }
        adapter
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for SiteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.adapters.iter().map(|adapter| adapter.name()))
            .finish()
    }
}
