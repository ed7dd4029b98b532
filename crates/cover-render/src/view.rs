//! Virtual view tree and keyed diff.
//!
//! Renderers build a [`ViewNode`] tree from the document; [`diff`] turns
//! two trees into a list of [`Patch`]es that the browser host applies to
//! the live elements. Children are matched by key (the element id), so an
//! unchanged document yields no patches and focus, caret, and in-flight
//! gesture state on the live elements survive a render.
//!
//! Child indices in patches count element children only. A node's `text`
//! is its leading text node.

use serde::Serialize;
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewNode {
    pub key: String,
    pub tag: &'static str,
    pub classes: SmallVec<[String; 2]>,
    pub styles: BTreeMap<String, String>,
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub children: Vec<ViewNode>,
}

impl ViewNode {
    pub fn new(key: impl Into<String>, tag: &'static str) -> Self {
        Self {
            key: key.into(),
            tag,
            classes: SmallVec::new(),
            styles: BTreeMap::new(),
            attrs: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn div(key: impl Into<String>) -> Self {
        Self::new(key, "div")
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn style(mut self, name: &str, value: impl Into<String>) -> Self {
        self.styles.insert(name.to_string(), value.into());
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Depth-first search by key.
    pub fn find(&self, key: &str) -> Option<&ViewNode> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(key))
    }
}

/// One edit to the live element tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Patch {
    /// Create `node` (and its subtree) as element child `index` of `parent`.
    Insert {
        parent: String,
        index: usize,
        node: ViewNode,
    },
    Remove {
        key: String,
    },
    /// Move an existing child of `parent` to element index `index`.
    Move {
        parent: String,
        key: String,
        index: usize,
    },
    /// Swap the element for a freshly built one (tag changed).
    Replace {
        key: String,
        node: ViewNode,
    },
    SetClasses {
        key: String,
        classes: Vec<String>,
    },
    SetStyle {
        key: String,
        name: String,
        value: String,
    },
    RemoveStyle {
        key: String,
        name: String,
    },
    SetAttr {
        key: String,
        name: String,
        value: String,
    },
    RemoveAttr {
        key: String,
        name: String,
    },
    SetText {
        key: String,
        text: Option<String>,
    },
}

/// Compute the patches that turn `old` into `new`.
pub fn diff(old: &ViewNode, new: &ViewNode) -> Vec<Patch> {
    let mut patches = Vec::new();
    diff_node(old, new, &mut patches);
    patches
}

fn diff_node(old: &ViewNode, new: &ViewNode, out: &mut Vec<Patch>) {
    if old.key != new.key || old.tag != new.tag {
        out.push(Patch::Replace {
            key: old.key.clone(),
            node: new.clone(),
        });
        return;
    }

    let key = &new.key;

    if old.classes != new.classes {
        out.push(Patch::SetClasses {
            key: key.clone(),
            classes: new.classes.to_vec(),
        });
    }

    for (name, value) in &new.styles {
        if old.styles.get(name) != Some(value) {
            out.push(Patch::SetStyle {
                key: key.clone(),
                name: name.clone(),
                value: value.clone(),
            });
        }
    }
    for name in old.styles.keys().filter(|n| !new.styles.contains_key(*n)) {
        out.push(Patch::RemoveStyle {
            key: key.clone(),
            name: name.clone(),
        });
    }

    for (name, value) in &new.attrs {
        if old.attrs.get(name) != Some(value) {
            out.push(Patch::SetAttr {
                key: key.clone(),
                name: name.clone(),
                value: value.clone(),
            });
        }
    }
    for name in old.attrs.keys().filter(|n| !new.attrs.contains_key(*n)) {
        out.push(Patch::RemoveAttr {
            key: key.clone(),
            name: name.clone(),
        });
    }

    if old.text != new.text {
        out.push(Patch::SetText {
            key: key.clone(),
            text: new.text.clone(),
        });
    }

    diff_children(key, &old.children, &new.children, out);
}

fn diff_children(parent: &str, old: &[ViewNode], new: &[ViewNode], out: &mut Vec<Patch>) {
    let new_keys: HashSet<&str> = new.iter().map(|n| n.key.as_str()).collect();

    // Live order of element children as patches are applied.
    let mut live: Vec<&str> = Vec::with_capacity(old.len().max(new.len()));
    for child in old {
        if new_keys.contains(child.key.as_str()) {
            live.push(&child.key);
        } else {
            out.push(Patch::Remove {
                key: child.key.clone(),
            });
        }
    }

    for (index, child) in new.iter().enumerate() {
        match old.iter().find(|o| o.key == child.key) {
            Some(prev) => {
                if live.get(index) != Some(&child.key.as_str()) {
                    if let Some(pos) = live.iter().position(|k| *k == child.key) {
                        live.remove(pos);
                    }
                    live.insert(index.min(live.len()), &child.key);
                    out.push(Patch::Move {
                        parent: parent.to_string(),
                        key: child.key.clone(),
                        index,
                    });
                }
                diff_node(prev, child, out);
            }
            None => {
                live.insert(index.min(live.len()), &child.key);
                out.push(Patch::Insert {
                    parent: parent.to_string(),
                    index,
                    node: child.clone(),
                });
            }
        }
    }
}
