//! Emoji glyphs for skill listings
//!
//! Pure presentation lookup; nothing in ranking depends on it.

/// Glyph used when nothing matches
pub const DEFAULT_GLYPH: &str = "🧩";

const NAME_GLYPHS: &[(&str, &str)] = &[
    ("commit", "🌿"),
    ("git-commit", "🌿"),
    ("review-pr", "🌿"),
    ("pr", "🌿"),
    ("git-pr", "🌿"),
    ("branch", "🌿"),
    ("explain", "💻"),
    ("code", "💻"),
    ("refactor", "🔧"),
    ("format", "📄"),
    ("lint", "📄"),
    ("test", "🧪"),
    ("fix", "🐛"),
    ("debug", "🐛"),
    ("docs", "📚"),
    ("readme", "📝"),
    ("markdown", "📝"),
    ("build", "🏗️"),
    ("deploy", "🚀"),
    ("install", "📦"),
    ("package", "📦"),
    ("pdf", "📄"),
    ("image", "🖼️"),
    ("video", "🎬"),
    ("file", "📄"),
    ("database", "🗄️"),
    ("sql", "🗄️"),
    ("schema", "📊"),
    ("ai", "✨"),
    ("claude", "🧠"),
    ("gpt", "🧠"),
    ("tool", "🛠️"),
    ("settings", "⚙️"),
    ("config", "⚙️"),
];

const KEYWORD_GLYPHS: &[(&[&str], &str)] = &[
    (&["git"], "🌿"),
    (&["test"], "🧪"),
    (&["bug", "fix"], "🐛"),
    (&["code", "dev"], "💻"),
    (&["doc", "read"], "📝"),
    (&["build", "compile"], "🏗️"),
    (&["deploy", "ship"], "🚀"),
    (&["ai", "smart"], "✨"),
    (&["setting", "config"], "⚙️"),
];

/// Glyph for a skill name: exact entry, then containment either way,
/// then keyword families, then [`DEFAULT_GLYPH`]
pub fn glyph_for(name: &str) -> &'static str {
    let normalized = name.trim().trim_start_matches('/').to_lowercase();
    if normalized.is_empty() {
        return DEFAULT_GLYPH;
    }

    if let Some((_, glyph)) = NAME_GLYPHS.iter().find(|(key, _)| *key == normalized) {
        return *glyph;
    }

    if let Some((_, glyph)) = NAME_GLYPHS
        .iter()
        .find(|(key, _)| normalized.contains(key) || key.contains(normalized.as_str()))
    {
        return *glyph;
    }

    KEYWORD_GLYPHS
        .iter()
        .find(|(words, _)| words.iter().any(|w| normalized.contains(w)))
        .map_or(DEFAULT_GLYPH, |(_, glyph)| *glyph)
}

/// Glyph for a skill category
pub fn category_glyph(category: Option<&str>) -> &'static str {
    match category.map(str::to_lowercase).as_deref() {
        Some("git") => "🌿",
        Some("code") => "💻",
        Some("testing") => "🧪",
        Some("debugging") => "🐛",
        Some("documentation") => "📚",
        Some("database") => "🗄️",
        Some("build") => "🏗️",
        Some("ai") => "🧠",
        Some("tools") => "🛠️",
        _ => DEFAULT_GLYPH,
    }
}
