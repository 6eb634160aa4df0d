//! The emitted stylesheet.

use std::fmt::{self, Write as _};

use serde::Serialize;

use super::rule::{AtCondition, Declaration, Rule};
use crate::registry::Layer;

/// The output of a compilation pass: rules per layer, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stylesheet {
    base: Vec<Rule>,
    components: Vec<Rule>,
    utilities: Vec<Rule>,
}

impl Stylesheet {
    pub(crate) fn new(base: Vec<Rule>, components: Vec<Rule>, utilities: Vec<Rule>) -> Self {
        Self {
            base,
            components,
            utilities,
        }
    }

    /// Returns the rules of one layer.
    pub fn layer(&self, layer: Layer) -> &[Rule] {
        match layer {
            Layer::Base => &self.base,
            Layer::Components => &self.components,
            Layer::Utilities => &self.utilities,
        }
    }

    /// Iterates over every rule: base, then components, then utilities.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.base
            .iter()
            .chain(self.components.iter())
            .chain(self.utilities.iter())
    }

    /// Total number of rules.
    pub fn len(&self) -> usize {
        self.base.len() + self.components.len() + self.utilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the rules as a tree of top-level rules and at-rule blocks.
    ///
    /// Consecutive rules sharing their outer conditions are grouped into one
    /// block. The body of a selectorless at-rule such as `@font-face` always
    /// gets a block of its own.
    pub fn nodes(&self) -> Vec<Node> {
        let mut nodes = Vec::new();
        for rule in self.rules() {
            insert(&mut nodes, &rule.conditions, rule);
        }
        nodes
    }

    /// Renders the stylesheet as CSS text.
    ///
    /// ```rust
    /// use tailor::{compile, ConfigLayer, Plugin};
    /// use serde_json::json;
    ///
    /// let plugin = Plugin::new("hidden", |api| {
    ///     api.add_utilities(&json!({".hidden": {"display": "none"}}), ())?;
    ///     Ok(())
    /// });
    /// let sheet = compile(ConfigLayer::new(), [plugin])?;
    /// assert_eq!(sheet.to_css(), ".hidden {\n  display: none;\n}\n");
    /// # Ok::<(), tailor::CompileError>(())
    /// ```
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes().iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            node.render(f, 0)?;
        }
        Ok(())
    }
}

/// A rendered unit of the stylesheet tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// `selector { declarations }`
    Rule {
        selector: String,
        declarations: Vec<Declaration>,
    },
    /// `@condition { declarations children }`
    Block {
        condition: AtCondition,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        declarations: Vec<Declaration>,
        children: Vec<Node>,
    },
}

impl Node {
    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            Node::Rule {
                selector,
                declarations,
            } => {
                writeln!(f, "{}{} {{", indent, selector)?;
                for decl in declarations {
                    writeln!(f, "{}  {}", indent, decl)?;
                }
                writeln!(f, "{}}}", indent)
            }
            Node::Block {
                condition,
                declarations,
                children,
            } => {
                writeln!(f, "{}{} {{", indent, condition)?;
                for decl in declarations {
                    writeln!(f, "{}  {}", indent, decl)?;
                }
                for child in children {
                    child.render(f, depth + 1)?;
                }
                writeln!(f, "{}}}", indent)
            }
        }
    }
}

fn insert(nodes: &mut Vec<Node>, conditions: &[AtCondition], rule: &Rule) {
    let Some((condition, rest)) = conditions.split_first() else {
        // A rule with neither selector nor conditions has nothing to attach to.
        if let Some(selector) = &rule.selector {
            nodes.push(Node::Rule {
                selector: selector.clone(),
                declarations: rule.declarations.clone(),
            });
        }
        return;
    };

    let body_here = rest.is_empty() && rule.selector.is_none();
    let reuse = !body_here
        && matches!(
            nodes.last(),
            Some(Node::Block { condition: last, declarations, .. })
                if last == condition && declarations.is_empty()
        );
    if !reuse {
        nodes.push(Node::Block {
            condition: condition.clone(),
            declarations: Vec::new(),
            children: Vec::new(),
        });
    }

    if let Some(Node::Block {
        declarations,
        children,
        ..
    }) = nodes.last_mut()
    {
        if body_here {
            declarations.extend(rule.declarations.iter().cloned());
        } else {
            insert(children, rest, rule);
        }
    }
}
