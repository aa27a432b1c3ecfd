//! Expansion driver for a page
//!
//! Picks the target element, looks up the shortcut, hands the template to
//! the [`Inserter`] and optionally submits the prompt on AI chat sites.
//! Hosts reach it through [`TriggerMessage`]s or typed key events.

use tracing::{debug, info, instrument};

use crate::config::{Settings, SettingsContext};
use crate::dom::NodeId;
use crate::error::{ExpandError, InsertError, ResultExt};
use crate::inserter::{self, EditableHandle, Inserter};
use crate::messages::{Response, TriggerMessage};
use crate::page::Page;
use crate::shortcuts::find_by_name;
use crate::sites::{SiteAdapter, SiteRegistry};
use crate::storage::ShortcutSource;
use crate::template::ClipboardReader;
use crate::toast_manager::Notifier;

/// Keys that trigger auto-expansion once released
const AUTO_EXPAND_KEYS: [&str; 2] = [" ", "Enter"];

pub struct Expander<'a> {
    source: &'a dyn ShortcutSource,
    clipboard: &'a dyn ClipboardReader,
    sites: SiteRegistry,
    settings: SettingsContext,
}

impl<'a> Expander<'a> {
    pub fn new(source: &'a dyn ShortcutSource, clipboard: &'a dyn ClipboardReader) -> Self {
        Expander {
            source,
            clipboard,
            sites: SiteRegistry::builtin(),
            settings: SettingsContext::new(),
        }
    }

    pub fn with_sites(mut self, sites: SiteRegistry) -> Self {
        self.sites = sites;
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = SettingsContext::with_settings(settings);
        self
    }

    /// Settings cache, for storage-change notifications
    pub fn settings_context(&mut self) -> &mut SettingsContext {
        &mut self.settings
    }

    fn site(&self, page: &Page) -> Option<&dyn SiteAdapter> {
        self.sites.adapter_for(&page.location.hostname)
    }

    /// The element an expansion would write into.
    ///
    /// On AI chat sites the prompt input wins even when unfocused; elsewhere
    /// the focused element if it accepts text.
    pub fn active_target(&self, page: &Page) -> Option<NodeId> {
        if let Some(input) = self
            .site(page)
            .and_then(|site| site.find_input_element(&page.document))
        {
            return Some(input);
        }
        page.focused()
            .filter(|&node| page.is_editable_element(node))
    }

    /// Answer a trigger message
    #[instrument(skip(self, page))]
    pub fn handle(&mut self, page: &mut Page, message: &TriggerMessage) -> Response {
        let result = match message {
            TriggerMessage::Ping => return Response::success(),
            TriggerMessage::ExpandShortcode { .. } | TriggerMessage::AutoExpand => {
                self.expand_shortcut(page, None, message.allows_trailing_whitespace())
            }
            TriggerMessage::InsertShortcut { name } => {
                self.expand_shortcut(page, Some(name.as_str()), message.allows_trailing_whitespace())
            }
        };
        if let Err(e) = &result {
            debug!(error = %e, "Expansion failed");
        }
        Response::from(result)
    }

    /// Expand into the active target.
    ///
    /// With `name`, that shortcut is inserted at the caret. Without it, the
    /// `#token` before the caret picks the shortcut and is replaced.
    #[instrument(skip(self, page))]
    pub fn expand_shortcut(
        &mut self,
        page: &mut Page,
        name: Option<&str>,
        allow_trailing_whitespace: bool,
    ) -> Result<(), ExpandError> {
        let settings = *self.settings.ensure_loaded(self.source)?;
        let target = self
            .active_target(page)
            .ok_or(ExpandError::NoEditableTarget)?;
        if settings.auto_focus_target && page.focused() != Some(target) {
            page.focus(target);
        }

        let shortcuts = self.source.shortcut_list()?;
        let shortcut = match name {
            Some(name) => find_by_name(&shortcuts, name)
                .ok_or_else(|| ExpandError::NamedShortcutNotFound(name.to_string()))?,
            None => {
                let handle = EditableHandle::classify(&page.document, target)?;
                let token = inserter::token_at_caret(page, handle, allow_trailing_whitespace)
                    .ok_or(InsertError::NoTokenFound)?;
                find_by_name(&shortcuts, &token.token).ok_or(ExpandError::ShortcutNotFound)?
            }
        };

        let mut inserter = Inserter::new(page, self.clipboard);
        match name {
            Some(_) => inserter.insert_at_cursor(target, &shortcut.template)?,
            None => inserter.insert(target, &shortcut.template, allow_trailing_whitespace)?,
        }
        info!(shortcut = %shortcut.name, "Shortcut expanded");

        if settings.auto_send {
            if let Some(send) = self
                .site(page)
                .and_then(|site| site.find_send_control(&page.document))
            {
                page.click(send);
            }
        }
        Ok(())
    }

    /// Auto-expand after a typed space or enter.
    ///
    /// Returns whether an expansion was attempted. Failures other than a
    /// missing token are passed to `notifier`.
    pub fn on_key_up(&mut self, page: &mut Page, key: &str, notifier: &mut dyn Notifier) -> bool {
        let Some(auto_expand) = self
            .settings
            .ensure_loaded(self.source)
            .map(|settings| settings.auto_expand_on_space)
            .warn_on_err()
        else {
            return false;
        };
        if !auto_expand || !AUTO_EXPAND_KEYS.contains(&key) {
            return false;
        }
        let Some(target) = self.active_target(page) else {
            return false;
        };
        if page.focused() != Some(target) {
            return false;
        }

        if let Err(e) = self.expand_shortcut(page, None, true) {
            if e.is_benign() {
                debug!("No shortcode before caret");
            } else {
                notifier.notify(&e.user_message(), e.severity());
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "expander_tests.rs"]
mod tests;
