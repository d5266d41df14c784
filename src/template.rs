//! Delimiter templates.
//!
//! Start and end delimiters are plain strings with `{placeholder}`
//! markers. Four placeholders are recognized; anything else is left
//! verbatim, so delimiter text can contain braces.

/// Default start delimiter. The splitter only recognizes this shape, so
/// documents combined with custom templates do not split back.
pub const DEFAULT_START_TEMPLATE: &str =
    "/* ==== START {index}/{totalFiles} - {filename} ({path}) ==== */";

/// Default end delimiter.
pub const DEFAULT_END_TEMPLATE: &str = "/* ==== END - {filename} ==== */";

/// Values substituted into a delimiter template for one file.
#[derive(Debug, Clone, Copy)]
pub struct DelimiterContext<'a> {
    pub filename: &'a str,
    pub path: &'a str,
    /// 1-based position of the file in the combined output.
    pub index: usize,
    pub total_files: usize,
}

/// Substitute the placeholders of `template` for one file. Every
/// occurrence of a placeholder is replaced.
pub fn render(template: &str, ctx: &DelimiterContext<'_>) -> String {
    template
        .replace("{filename}", ctx.filename)
        .replace("{path}", ctx.path)
        .replace("{index}", &ctx.index.to_string())
        .replace("{totalFiles}", &ctx.total_files.to_string())
}

/// A named start/end template pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplatePreset {
    pub name: &'static str,
    pub start: &'static str,
    pub end: &'static str,
}

/// Built-in delimiter presets. The first one is the default pair.
pub const PRESETS: &[TemplatePreset] = &[
    TemplatePreset {
        name: "Default (Block)",
        start: DEFAULT_START_TEMPLATE,
        end: DEFAULT_END_TEMPLATE,
    },
    TemplatePreset {
        name: "Simple (Line)",
        start: "// --- Start: {filename} ({path}) ---",
        end: "// --- End: {filename} ---",
    },
    TemplatePreset {
        name: "Boxed (Block)",
        start: "/******************** START: {filename} ********************/",
        end: "/********************* END: {filename} *********************/",
    },
    TemplatePreset {
        name: "Minimal (Line)",
        start: "// {filename}",
        end: "// end {filename}",
    },
    TemplatePreset {
        name: "HTML Style",
        start: "<!-- START: {filename} ({path}) -->",
        end: "<!-- END: {filename} -->",
    },
    TemplatePreset {
        name: "Python/Shell Style",
        start: "# START: {filename} ({path})",
        end: "# END: {filename}",
    },
];

/// Look up a preset by name, case-insensitively.
pub fn preset_by_name(name: &str) -> Option<&'static TemplatePreset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
