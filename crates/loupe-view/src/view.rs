use std::collections::HashMap;

use loupe_jdi::{DebugValue, DebugVariable, ThreadId, ValueId, ValueSource};
use parking_lot::Mutex;
use tracing::debug;

use crate::config::FormatConfig;
use crate::format::ValueFormatter;

/// Marker for lines whose value can be expanded further.
pub const EXPANDABLE_SYMBOL: &str = "\u{25b8} ";
/// Marker for leaf lines.
pub const LEAF_SYMBOL: &str = "\u{2022} ";
/// One unit of tree indentation.
pub const INDENT: &str = "  ";

const ROOT_DEPTH: usize = 0;

/// A value currently rendered as expandable, together with the depth it was
/// rendered at. Children materialize at `depth + 1`.
#[derive(Clone, Debug)]
struct ExpandableEntry {
    value: DebugValue,
    depth: usize,
}

/// Materializes one level of a paused thread's variable tree at a time and
/// renders it as depth-encoded text lines.
///
/// Only the directly visible first level plus explicitly expanded nodes are
/// ever fetched, which bounds memory and latency against object graphs that
/// may be enormous or cyclic. All mutable state (the source handle, the
/// formatter, and the expansion cache) lives behind a single mutex; every
/// public operation is one lock scope, so an `expand` can never observe a
/// partially cleared cache from a racing `snapshot` or `reset`.
pub struct VariableView<S> {
    inner: Mutex<Inner<S>>,
}

struct Inner<S> {
    source: S,
    formatter: ValueFormatter,
    expandable: HashMap<ValueId, ExpandableEntry>,
}

impl<S: ValueSource> VariableView<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, FormatConfig::default())
    }

    pub fn with_config(source: S, config: FormatConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                source,
                formatter: ValueFormatter::new(config),
                expandable: HashMap::new(),
            }),
        }
    }

    /// Renders the top stack frame of `thread`, replacing any previously
    /// materialized state.
    ///
    /// A fresh pause invalidates every previously issued expansion
    /// identity. Frames without variable information (native methods) and
    /// backend failures produce an empty result, not an error.
    pub fn snapshot(&self, thread: ThreadId) -> Vec<String> {
        let mut inner = self.inner.lock();
        inner.expandable.clear();

        let vars = match inner.source.top_frame_variables(thread) {
            Ok(Some(vars)) => vars,
            Ok(None) => {
                debug!(thread, "no variable information for top frame");
                return Vec::new();
            }
            Err(err) => {
                debug!(thread, error = %err, "unable to get frame variables");
                return Vec::new();
            }
        };

        let mut lines = Vec::new();
        inner.render(&vars, &mut lines, ROOT_DEPTH);
        lines
    }

    /// Renders the children of a previously materialized expandable value.
    ///
    /// Expansion is single-shot: the identity is consumed whether or not
    /// the child fetch succeeds, and `None` is returned for identities that
    /// are unknown, already consumed, or invalidated by a newer snapshot.
    pub fn expand(&self, id: ValueId) -> Option<Vec<String>> {
        let mut inner = self.inner.lock();
        let entry = match inner.expandable.remove(&id) {
            Some(entry) => entry,
            None => {
                debug!(id, "no expandable value with this id");
                return None;
            }
        };

        let mut lines = Vec::new();
        match inner.source.children(&entry.value) {
            Ok(children) => inner.render(&children, &mut lines, entry.depth + 1),
            Err(err) => {
                debug!(id, error = %err, "unable to get child variables");
            }
        }
        Some(lines)
    }

    /// Discards all cached expansion state.
    pub fn reset(&self) {
        self.inner.lock().expandable.clear();
    }

    pub fn config(&self) -> FormatConfig {
        self.inner.lock().formatter.config()
    }

    pub fn set_config(&self, config: FormatConfig) {
        self.inner.lock().formatter.set_config(config);
    }

    pub fn set_show_unsigned(&self, on: bool) {
        self.update_config(|config| config.show_unsigned = on);
    }

    pub fn set_show_hex(&self, on: bool) {
        self.update_config(|config| config.show_hex = on);
    }

    pub fn set_show_char(&self, on: bool) {
        self.update_config(|config| config.show_char = on);
    }

    fn update_config(&self, apply: impl FnOnce(&mut FormatConfig)) {
        let mut inner = self.inner.lock();
        let mut config = inner.formatter.config();
        apply(&mut config);
        inner.formatter.set_config(config);
    }
}

impl<S> Inner<S> {
    /// Formats one level of variables, registering every expandable value
    /// and appending its fold placeholder line.
    fn render(&mut self, vars: &[DebugVariable], lines: &mut Vec<String>, depth: usize) {
        for var in vars {
            if var.synthetic || ignore_final_primitive(var) {
                continue;
            }

            let leaf = is_leaf(var);
            let mut line = indentation(depth, leaf);
            line.push_str(&self.formatter.format_variable(var));
            lines.push(line);

            if leaf {
                continue;
            }
            // is_leaf guarantees a composite value with an identity here.
            if let Some(value) = var.value.as_ref() {
                if let Some(id) = value.id {
                    self.expandable.insert(
                        id,
                        ExpandableEntry {
                            value: value.clone(),
                            depth,
                        },
                    );
                    // A fold-aware renderer needs to see a child line before
                    // the node is actually expanded.
                    lines.push(indentation(depth + 1, true));
                }
            }
        }
    }
}

/// A variable is a leaf unless its value is a composite that reports
/// children and carries an identity. Strings are forced to leaves; their
/// textual form already conveys their content.
fn is_leaf(var: &DebugVariable) -> bool {
    let Some(value) = &var.value else { return true };
    if value.is_string() {
        return true;
    }
    !(value.is_composite() && value.has_children && value.id.is_some())
}

/// Final primitives are noise during inspection; final composites still
/// hold expandable state worth showing.
fn ignore_final_primitive(var: &DebugVariable) -> bool {
    if !var.is_final {
        return false;
    }
    match &var.value {
        Some(value) => !value.is_composite(),
        None => true,
    }
}

/// Indentation prefix encoding depth and leaf/expandable state.
fn indentation(depth: usize, leaf: bool) -> String {
    let symbol = if leaf { LEAF_SYMBOL } else { EXPANDABLE_SYMBOL };
    if depth == ROOT_DEPTH {
        return symbol.to_string();
    }
    let mut prefix = INDENT.repeat(depth);
    prefix.push_str(symbol);
    prefix
}
