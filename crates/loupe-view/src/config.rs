use serde::{Deserialize, Serialize};

/// Numeric alternate-representation display toggles.
///
/// All default to off and can be flipped independently at runtime. When
/// several are enabled, the alternates are appended in a fixed order:
/// unsigned, hex, char.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatConfig {
    /// Append the unsigned interpretation of negative byte values.
    pub show_unsigned: bool,
    /// Append a width-masked hexadecimal rendering of primitive values.
    pub show_hex: bool,
    /// Append the printable-character rendering of primitive values that
    /// fit in a UTF-16 code unit.
    pub show_char: bool,
}
