//! Dialect configuration: the capability record gating syntax features.

/// The set of syntactic features a dialect permits.
///
/// This record is the sole authority on what the parser accepts. The
/// presets cover the common dialects; a caller may also assemble a custom
/// mix by hand, since every field is public.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxContext {
    /// A comma directly before `}` or `]`.
    pub trailing_commas: bool,
    /// `// …` and `/* … */` comments.
    pub comments: bool,
    /// A leading `+` on numbers.
    pub plus_signs: bool,
    /// Whitespace between a sign and its operand.
    pub spaced_signs: bool,
    /// Numbers written `.5` or `5.`.
    pub leading_or_trailing_decimal_points: bool,
    /// The `Infinity` identifier as a value.
    pub infinities: bool,
    /// The `NaN` identifier as a value.
    pub nans: bool,
    /// Numbers beyond RFC 8259: hex/octal/binary, leading zeros, numeric
    /// separators, and non-finite magnitudes.
    pub invalid_json_numbers: bool,
    /// Strings continued across lines with a `\` line continuation.
    pub multiline_strings: bool,
    /// Unquoted (identifier) property names.
    pub unquote_properties: bool,
    /// Single-quoted strings.
    pub single_quotes: bool,
    /// Number literals as property names.
    pub number_properties: bool,
    /// The `undefined` identifier as a value.
    pub undefined_keywords: bool,
    /// Array elisions (`[1, , 3]`).
    pub sparse_arrays: bool,
    /// Regular expression literals.
    pub regexp_literals: bool,
    /// Template literals (without substitutions).
    pub template_literals: bool,
    /// Bigint literals (`123n`).
    pub bigint_literals: bool,
}

impl SyntaxContext {
    /// Strict JSON: nothing beyond RFC 8259.
    pub const JSON: Self = Self {
        trailing_commas: false,
        comments: false,
        plus_signs: false,
        spaced_signs: false,
        leading_or_trailing_decimal_points: false,
        infinities: false,
        nans: false,
        invalid_json_numbers: false,
        multiline_strings: false,
        unquote_properties: false,
        single_quotes: false,
        number_properties: false,
        undefined_keywords: false,
        sparse_arrays: false,
        regexp_literals: false,
        template_literals: false,
        bigint_literals: false,
    };

    /// JSON with comments and trailing commas.
    pub const JSONC: Self = Self {
        trailing_commas: true,
        comments: true,
        ..Self::JSON
    };

    /// JSON5 (<https://json5.org>).
    pub const JSON5: Self = Self {
        trailing_commas: true,
        comments: true,
        plus_signs: true,
        spaced_signs: true,
        leading_or_trailing_decimal_points: true,
        infinities: true,
        nans: true,
        invalid_json_numbers: true,
        multiline_strings: true,
        unquote_properties: true,
        single_quotes: true,
        ..Self::JSON
    };

    /// The permissive default: every feature, including computed
    /// (arithmetic) expression forms.
    pub const SUPERSET: Self = Self {
        number_properties: true,
        undefined_keywords: true,
        sparse_arrays: true,
        regexp_literals: true,
        template_literals: true,
        bigint_literals: true,
        ..Self::JSON5
    };

    /// Resolve a dialect tag, ASCII-case-insensitively.
    ///
    /// Unknown or missing tags yield [`SyntaxContext::SUPERSET`].
    pub fn for_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(t) if t.eq_ignore_ascii_case("json") => Self::JSON,
            Some(t) if t.eq_ignore_ascii_case("jsonc") => Self::JSONC,
            Some(t) if t.eq_ignore_ascii_case("json5") => Self::JSON5,
            _ => Self::SUPERSET,
        }
    }

    /// Computed expression forms (binary arithmetic) are admitted only by
    /// the full superset.
    pub fn allows_computed_forms(&self) -> bool {
        *self == Self::SUPERSET
    }
}

impl Default for SyntaxContext {
    fn default() -> Self {
        Self::SUPERSET
    }
}
