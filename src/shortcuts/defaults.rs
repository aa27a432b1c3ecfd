//! The library seeded on first run

use super::types::Shortcut;

/// (name, template, tag, favorite)
const DEFAULT_LIBRARY: &[(&str, &str, &str, bool)] = &[
    (
        "#investigate",
        "Investigate the topic below thoroughly. Provide sources, key findings, and open questions.\n\nTopic: {selection}{cursor}",
        "research",
        true,
    ),
    (
        "#deconstruct",
        "Deconstruct the following claim into assumptions, evidence, and potential flaws.\n\nClaim: {selection}{cursor}",
        "analysis",
        false,
    ),
    (
        "#summarise",
        "Summarise the following in 5 bullet points. Include key takeaways.\n\nText: {selection}{cursor}",
        "summary",
        false,
    ),
    (
        "#counter",
        "Provide the strongest counter-argument to the following position.\n\nPosition: {selection}{cursor}",
        "debate",
        false,
    ),
    (
        "#execute",
        "Turn this into a concrete action plan with steps, owners, and timelines.\n\nGoal: {selection}{cursor}",
        "planning",
        false,
    ),
    (
        "#premortem",
        "Run a premortem. Assume the project failed and list the likely causes and mitigations.\n\nProject: {selection}{cursor}",
        "risk",
        false,
    ),
    (
        "#simplify",
        "Simplify the following explanation for a beginner audience.\n\nText: {selection}{cursor}",
        "rewrite",
        false,
    ),
    (
        "#brainstorm",
        "Brainstorm 10 creative ideas for the following prompt.\n\nPrompt: {selection}{cursor}",
        "ideation",
        false,
    ),
    (
        "#rewrite",
        "Rewrite the following text in a clearer, more concise style.\n\nText: {selection}{cursor}",
        "rewrite",
        false,
    ),
    (
        "#critique",
        "Critique the following output for accuracy, clarity, and completeness.\n\nOutput: {selection}{cursor}",
        "review",
        false,
    ),
];

/// A fresh copy of the default shortcut library
pub fn default_shortcuts() -> Vec<Shortcut> {
    DEFAULT_LIBRARY
        .iter()
        .map(|(name, template, tag, favorite)| {
            Shortcut::new(name, template)
                .with_tags(&[*tag])
                .favorite(*favorite)
        })
        .collect()
}
