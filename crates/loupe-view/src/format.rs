use loupe_jdi::{DebugValue, DebugVariable, FieldInfo, ValueKind, NO_EXPLICIT_RETURN_VALUE, UNKNOWN};

use crate::config::FormatConfig;

/// Renders one `(name, value)` pair into display text.
///
/// The formatter is stateless apart from its [`FormatConfig`]; it knows
/// nothing about tree position or expansion. Missing pieces (names, values,
/// declaring types) degrade to placeholders or omissions — formatting a
/// variable never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueFormatter {
    config: FormatConfig,
}

impl ValueFormatter {
    pub fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> FormatConfig {
        self.config
    }

    pub fn set_config(&mut self, config: FormatConfig) {
        self.config = config;
    }

    /// Display text for a variable: name, shadowing disambiguation, and the
    /// formatted value.
    pub fn format_variable(&self, var: &DebugVariable) -> String {
        let mut buffer = String::new();
        buffer.push_str(var.name.as_deref().unwrap_or(UNKNOWN));

        // Fields shadowed through inheritance show up more than once on the
        // receiving type; qualify them with the declaring type.
        if let (Some(name), Some(field)) = (var.name.as_deref(), var.field.as_ref()) {
            if field_name_is_duplicate(name, field) {
                if let Some(declaring) = field.declaring_type.as_deref() {
                    buffer.push_str(" (");
                    buffer.push_str(declaring.trim());
                    buffer.push(')');
                }
            }
        }

        let value_text = match &var.value {
            Some(value) => self.format_value(value),
            None => UNKNOWN.to_string(),
        };

        // No equals sign for empty values (void-typed array partitions).
        if !value_text.is_empty() {
            buffer.push_str(" = ");
            buffer.push_str(&value_text);
        }
        buffer
    }

    /// Display text for a bare value: optional type-name prefix (with the
    /// array length spliced into the first `[]`), the raw text with string
    /// quoting, and the enabled numeric alternate representations.
    pub fn format_value(&self, value: &DebugValue) -> String {
        let text = if value.signature == "V" {
            NO_EXPLICIT_RETURN_VALUE
        } else {
            value.text.as_str()
        };

        let mut buffer = String::new();
        if value.signature == UNKNOWN {
            buffer.push_str(UNKNOWN);
        } else if value.is_composite()
            && !value.is_string()
            && !value.type_name.is_empty()
            && !matches!(value.kind, ValueKind::ReferenceList | ValueKind::AllInstances)
        {
            // Instances and reference lists read better without their type.
            let type_name = value.type_name.trim();
            match value.array_length {
                Some(length) => buffer.push_str(&splice_array_length(type_name, length)),
                None => buffer.push_str(type_name),
            }
            buffer.push(' ');
        }

        if value.is_string() {
            buffer.push('"');
            buffer.push_str(text);
            buffer.push('"');
        } else {
            buffer.push_str(text);
        }

        if self.config.show_unsigned {
            append_alternate(&mut buffer, unsigned_text(value));
        }
        if self.config.show_hex {
            append_alternate(&mut buffer, hex_text(value));
        }
        if self.config.show_char {
            append_alternate(&mut buffer, char_text(value));
        }

        buffer.trim().to_string()
    }
}

fn append_alternate(buffer: &mut String, alternate: Option<String>) {
    if let Some(alternate) = alternate {
        buffer.push_str(" [");
        buffer.push_str(&alternate);
        buffer.push(']');
    }
}

/// Whether the field name occurs more than once on the receiving type.
fn field_name_is_duplicate(name: &str, field: &FieldInfo) -> bool {
    field
        .receiver_field_names
        .iter()
        .filter(|candidate| candidate.as_str() == name)
        .count()
        > 1
}

/// Insert the array length between the first `[]` pair of a type name:
/// `int[]` with length 3 becomes `int[3]`.
fn splice_array_length(type_name: &str, length: usize) -> String {
    match type_name.find("[]") {
        Some(bracket) => {
            let mut adjusted = String::with_capacity(type_name.len() + 4);
            adjusted.push_str(&type_name[..bracket + 1]);
            adjusted.push_str(&length.to_string());
            adjusted.push_str(&type_name[bracket + 1..]);
            adjusted
        }
        None => type_name.to_string(),
    }
}

/// Unsigned rendering, meaningful only for negative byte values.
fn unsigned_text(value: &DebugValue) -> Option<String> {
    match value.primitive_signature()? {
        'B' => {
            let byte = value.text.parse::<i64>().ok()?;
            if byte < 0 {
                Some((byte & 0xFF).to_string())
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Hexadecimal rendering masked to the primitive type's bit width; chars
/// render as a `\uXXXX` escape of their UTF-16 code unit.
fn hex_text(value: &DebugValue) -> Option<String> {
    let code = value.primitive_signature()?;
    if code == 'C' {
        let unit = value.text.chars().next()? as u32;
        return Some(format!("\\u{unit:04x}"));
    }
    let parsed = value.text.parse::<i64>().ok()?;
    let masked = match code {
        'B' => parsed as u64 & 0xFF,
        'S' => parsed as u64 & 0xFFFF,
        'I' => parsed as u64 & 0xFFFF_FFFF,
        'J' => parsed as u64,
        _ => return None,
    };
    Some(format!("0x{masked:x}"))
}

/// Printable-character rendering of an integral value, valid only when the
/// width-masked value fits in a UTF-16 code unit.
fn char_text(value: &DebugValue) -> Option<String> {
    let code = value.primitive_signature()?;
    let parsed = value.text.parse::<i64>().ok()?;
    let masked = match code {
        'B' => parsed & 0xFF,
        'S' => parsed & 0xFFFF,
        'I' => parsed & 0xFFFF_FFFF,
        'J' => parsed,
        _ => return None,
    };
    if !(0..=0xFFFF).contains(&masked) {
        return None;
    }
    let ch = char::from_u32(masked as u32)?;
    if ch.is_control() {
        let caret = char::from_u32(masked as u32 + 64)?;
        let mut text = format!("^{caret}");
        if let Some(mnemonic) = control_mnemonic(masked as u32) {
            text.push_str(" (");
            text.push_str(mnemonic);
            text.push(')');
        }
        Some(text)
    } else {
        Some(ch.to_string())
    }
}

fn control_mnemonic(code: u32) -> Option<&'static str> {
    Some(match code {
        0 => "NUL",
        8 => "BS",
        9 => "TAB",
        10 => "LF",
        13 => "CR",
        21 => "NL",
        27 => "ESC",
        127 => "DEL",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use loupe_jdi::{DebugValue, DebugVariable, FieldInfo, ValueKind, UNKNOWN};

    use super::ValueFormatter;
    use crate::config::FormatConfig;

    fn plain() -> ValueFormatter {
        ValueFormatter::default()
    }

    fn with(config: FormatConfig) -> ValueFormatter {
        ValueFormatter::new(config)
    }

    fn string_value(text: &str) -> DebugValue {
        DebugValue {
            kind: ValueKind::Str,
            signature: "Ljava/lang/String;".to_string(),
            type_name: "java.lang.String".to_string(),
            text: text.to_string(),
            id: Some(99),
            array_length: None,
            has_children: true,
        }
    }

    fn int_array(type_name: &str, length: usize) -> DebugValue {
        DebugValue {
            kind: ValueKind::Array,
            signature: "[I".to_string(),
            type_name: type_name.to_string(),
            text: String::new(),
            id: Some(50),
            array_length: Some(length),
            has_children: true,
        }
    }

    #[test]
    fn plain_local_variable() {
        let var = DebugVariable::new("count", DebugValue::primitive("I", "3"));
        assert_eq!(plain().format_variable(&var), "count = 3");
    }

    #[test]
    fn unresolvable_name_gets_placeholder() {
        let mut var = DebugVariable::new("count", DebugValue::primitive("I", "3"));
        var.name = None;
        assert_eq!(plain().format_variable(&var), "<unknown> = 3");
    }

    #[test]
    fn unreadable_value_gets_placeholder() {
        let mut var = DebugVariable::new("count", DebugValue::primitive("I", "3"));
        var.value = None;
        assert_eq!(plain().format_variable(&var), "count = <unknown>");
    }

    #[test]
    fn empty_value_omits_equals_sign() {
        let var = DebugVariable::new("a[0..9]", DebugValue::primitive("", ""));
        assert_eq!(plain().format_variable(&var), "a[0..9]");
    }

    #[test]
    fn void_signature_has_fixed_text() {
        let value = DebugValue::primitive("V", "");
        assert_eq!(plain().format_value(&value), "no explicit return value");
    }

    #[test]
    fn unknown_signature_sentinel_is_displayed() {
        let value = DebugValue::primitive(UNKNOWN, "");
        assert_eq!(plain().format_value(&value), UNKNOWN);
    }

    #[test]
    fn strings_are_quoted_without_type_name() {
        assert_eq!(plain().format_value(&string_value("hi")), "\"hi\"");
        assert_eq!(plain().format_value(&string_value("")), "\"\"");
    }

    #[test]
    fn objects_are_prefixed_with_their_type() {
        let value = DebugValue::object(1, "java.lang.Object", "instance");
        assert_eq!(plain().format_value(&value), "java.lang.Object instance");
    }

    #[test]
    fn pseudo_collections_suppress_the_type_prefix() {
        let value = DebugValue {
            kind: ValueKind::ReferenceList,
            ..DebugValue::object(2, "demo.Holder", "3 references")
        };
        assert_eq!(plain().format_value(&value), "3 references");
    }

    #[test]
    fn array_length_is_spliced_into_the_type_name() {
        assert_eq!(plain().format_value(&int_array("int[]", 3)), "int[3]");
        assert_eq!(plain().format_value(&int_array("long[][]", 2)), "long[2][]");
    }

    #[test]
    fn unsigned_applies_to_negative_bytes_only() {
        let config = FormatConfig {
            show_unsigned: true,
            ..FormatConfig::default()
        };
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("B", "-1")),
            "-1 [255]"
        );
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("B", "5")),
            "5"
        );
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("I", "-1")),
            "-1"
        );
    }

    #[test]
    fn hex_is_masked_to_the_type_width() {
        let config = FormatConfig {
            show_hex: true,
            ..FormatConfig::default()
        };
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("B", "-1")),
            "-1 [0xff]"
        );
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("S", "-1")),
            "-1 [0xffff]"
        );
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("I", "-1")),
            "-1 [0xffffffff]"
        );
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("J", "-1")),
            "-1 [0xffffffffffffffff]"
        );
    }

    #[test]
    fn hex_renders_chars_as_utf16_escapes() {
        let config = FormatConfig {
            show_hex: true,
            ..FormatConfig::default()
        };
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("C", "a")),
            "a [\\u0061]"
        );
    }

    #[test]
    fn char_display_names_common_control_characters() {
        let config = FormatConfig {
            show_char: true,
            ..FormatConfig::default()
        };
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("I", "10")),
            "10 [^J (LF)]"
        );
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("I", "65")),
            "65 [A]"
        );
    }

    #[test]
    fn char_display_requires_a_16_bit_value() {
        let config = FormatConfig {
            show_char: true,
            ..FormatConfig::default()
        };
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("I", "70000")),
            "70000"
        );
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("J", "-1")),
            "-1"
        );
        // Bytes are masked to 8 bits first, so -1 is still in range.
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("B", "-1")),
            "-1 [\u{ff}]"
        );
    }

    #[test]
    fn alternates_keep_a_fixed_order() {
        let config = FormatConfig {
            show_unsigned: true,
            show_hex: true,
            show_char: true,
        };
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("B", "-1")),
            "-1 [255] [0xff] [\u{ff}]"
        );
    }

    #[test]
    fn alternates_skip_unparseable_text() {
        let config = FormatConfig {
            show_unsigned: true,
            show_hex: true,
            show_char: true,
        };
        assert_eq!(
            with(config).format_value(&DebugValue::primitive("I", "not a number")),
            "not a number"
        );
    }

    #[test]
    fn shadowed_fields_are_qualified_with_the_declaring_type() {
        let mut var = DebugVariable::new("x", DebugValue::primitive("I", "3"));
        var.field = Some(FieldInfo {
            declaring_type: Some("demo.Base".to_string()),
            receiver_field_names: vec!["x".to_string(), "x".to_string(), "y".to_string()],
        });
        assert_eq!(plain().format_variable(&var), "x (demo.Base) = 3");
    }

    #[test]
    fn unshadowed_fields_stay_unqualified() {
        let mut var = DebugVariable::new("x", DebugValue::primitive("I", "3"));
        var.field = Some(FieldInfo {
            declaring_type: Some("demo.Base".to_string()),
            receiver_field_names: vec!["x".to_string(), "y".to_string()],
        });
        assert_eq!(plain().format_variable(&var), "x = 3");
    }

    #[test]
    fn missing_declaring_type_omits_the_qualifier() {
        let mut var = DebugVariable::new("x", DebugValue::primitive("I", "3"));
        var.field = Some(FieldInfo {
            declaring_type: None,
            receiver_field_names: vec!["x".to_string(), "x".to_string()],
        });
        assert_eq!(plain().format_variable(&var), "x = 3");
    }
}
