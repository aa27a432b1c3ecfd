//! Editing and searching a shortcut list.
//!
//! Lists are plain `Vec<Shortcut>` values; callers persist them through
//! storage after each edit. Names are unique within a list.

use tracing::debug;

use super::types::Shortcut;
use crate::config::PREVIEW_MAX_CHARS;
use crate::error::ShortcutValidationError;

/// Canonical form of a user-typed name: trimmed, lowercase, one leading `#`.
///
/// ```
/// use prompt_hash::shortcuts::normalize_name;
///
/// assert_eq!(normalize_name("  Summarise "), "#summarise");
/// assert_eq!(normalize_name("##Ask"), "#ask");
/// assert_eq!(normalize_name(""), "#");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    format!("#{}", lowered.trim_start_matches('#'))
}

/// Exact name lookup
pub fn find_by_name<'a>(shortcuts: &'a [Shortcut], name: &str) -> Option<&'a Shortcut> {
    shortcuts.iter().find(|shortcut| shortcut.name == name)
}

/// Case-insensitive search over names, templates, and tags.
/// A blank query matches everything.
pub fn filter_shortcuts<'a>(shortcuts: &'a [Shortcut], query: &str) -> Vec<&'a Shortcut> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return shortcuts.iter().collect();
    }
    shortcuts
        .iter()
        .filter(|shortcut| {
            shortcut.name.to_lowercase().contains(&query)
                || shortcut.template.to_lowercase().contains(&query)
                || shortcut.tags.join(" ").to_lowercase().contains(&query)
        })
        .collect()
}

/// First line of a template, cut to the preview width
pub fn preview_text(template: &str) -> String {
    template
        .split('\n')
        .next()
        .unwrap_or_default()
        .chars()
        .take(PREVIEW_MAX_CHARS)
        .collect()
}

/// Comma-separated tag input to a tag list
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Unvalidated shortcut fields from an edit form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutDraft {
    pub name: String,
    pub template: String,
    pub tags: Vec<String>,
}

/// Save `draft` into `shortcuts`.
///
/// `editing` is the name of the shortcut being edited; when the draft renames
/// it, the original entry is removed. A shortcut already stored under the new
/// name is replaced in place and keeps its favorite flag.
pub fn upsert_shortcut(
    shortcuts: &mut Vec<Shortcut>,
    draft: ShortcutDraft,
    editing: Option<&str>,
) -> Result<Shortcut, ShortcutValidationError> {
    let name = normalize_name(&draft.name);
    if name == "#" {
        return Err(ShortcutValidationError::InvalidName);
    }
    let template = draft.template.trim();
    if template.is_empty() {
        return Err(ShortcutValidationError::EmptyTemplate);
    }

    let favorite = find_by_name(shortcuts, &name).is_some_and(|existing| existing.favorite);
    let saved = Shortcut {
        name,
        template: template.to_string(),
        tags: draft.tags,
        favorite,
    };

    if let Some(original) = editing.filter(|original| *original != saved.name) {
        shortcuts.retain(|shortcut| shortcut.name != original);
    }

    match shortcuts.iter().position(|shortcut| shortcut.name == saved.name) {
        Some(index) => shortcuts[index] = saved.clone(),
        None => shortcuts.push(saved.clone()),
    }
    debug!(name = %saved.name, total = shortcuts.len(), "Shortcut saved");
    Ok(saved)
}

/// Remove by name; returns whether anything was removed
pub fn remove_shortcut(shortcuts: &mut Vec<Shortcut>, name: &str) -> bool {
    let before = shortcuts.len();
    shortcuts.retain(|shortcut| shortcut.name != name);
    shortcuts.len() != before
}

/// Flip the favorite flag; returns the new value
pub fn toggle_favorite(shortcuts: &mut [Shortcut], name: &str) -> Option<bool> {
    let shortcut = shortcuts.iter_mut().find(|shortcut| shortcut.name == name)?;
    shortcut.favorite = !shortcut.favorite;
    Some(shortcut.favorite)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Vec<Shortcut> {
        vec![
            Shortcut::new("#ask", "Ask about {selection}").with_tags(&["Research"]),
            Shortcut::new("#fix", "Fix this code\nSecond line").favorite(true),
        ]
    }

    fn draft(name: &str, template: &str) -> ShortcutDraft {
        ShortcutDraft {
            name: name.to_string(),
            template: template.to_string(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn find_is_exact() {
        let list = library();
        assert!(find_by_name(&list, "#ask").is_some());
        assert!(find_by_name(&list, "#As").is_none());
        assert!(find_by_name(&list, "ask").is_none());
    }

    #[test]
    fn filter_matches_name_template_and_tags() {
        let list = library();
        assert_eq!(filter_shortcuts(&list, "").len(), 2);
        assert_eq!(filter_shortcuts(&list, "  FIX ")[0].name, "#fix");
        assert_eq!(filter_shortcuts(&list, "selection")[0].name, "#ask");
        assert_eq!(filter_shortcuts(&list, "research")[0].name, "#ask");
        assert!(filter_shortcuts(&list, "nothing").is_empty());
    }

    #[test]
    fn preview_is_first_line_capped() {
        assert_eq!(preview_text("Fix this code\nSecond line"), "Fix this code");
        let long = "x".repeat(200);
        assert_eq!(preview_text(&long).chars().count(), PREVIEW_MAX_CHARS);
        assert_eq!(preview_text(""), "");
    }

    #[test]
    fn tags_are_split_and_trimmed() {
        assert_eq!(parse_tags(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn upsert_validates_input() {
        let mut list = library();
        assert_eq!(
            upsert_shortcut(&mut list, draft(" # ", "t"), None),
            Err(ShortcutValidationError::InvalidName)
        );
        assert_eq!(
            upsert_shortcut(&mut list, draft("#new", "  \n "), None),
            Err(ShortcutValidationError::EmptyTemplate)
        );
        assert_eq!(list, library());
    }

    #[test]
    fn upsert_adds_normalized_trimmed_shortcut() {
        let mut list = library();
        let saved = upsert_shortcut(&mut list, draft("New", "  body  "), None).unwrap();
        assert_eq!(saved.name, "#new");
        assert_eq!(saved.template, "body");
        assert!(!saved.favorite);
        assert_eq!(list.last(), Some(&saved));
    }

    #[test]
    fn upsert_replaces_in_place_and_keeps_favorite() {
        let mut list = library();
        let saved = upsert_shortcut(&mut list, draft("#fix", "Fixed"), Some("#fix")).unwrap();
        assert!(saved.favorite);
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].template, "Fixed");
    }

    #[test]
    fn upsert_rename_removes_original() {
        let mut list = library();
        upsert_shortcut(&mut list, draft("#question", "Ask"), Some("#ask")).unwrap();
        assert!(find_by_name(&list, "#ask").is_none());
        assert!(find_by_name(&list, "#question").is_some());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn remove_and_toggle() {
        let mut list = library();
        assert_eq!(toggle_favorite(&mut list, "#ask"), Some(true));
        assert_eq!(toggle_favorite(&mut list, "#ask"), Some(false));
        assert_eq!(toggle_favorite(&mut list, "#missing"), None);
        assert!(remove_shortcut(&mut list, "#ask"));
        assert!(!remove_shortcut(&mut list, "#ask"));
        assert_eq!(list.len(), 1);
    }
}
