//! Resource schema registry
//!
//! Each resource and data source type declares a static table of attributes.
//! The [`FieldClass`] of an attribute decides whether the reconciler copies it
//! into outgoing payloads or only ever reads it back; the `sticky` and
//! `force_new` flags drive [`ResourceSchema::plan`].
//!
//! ```rust
//! use mailtrap_core::schema::{AttributeSchema, AttributeType, ResourceSchema};
//!
//! static WIDGET: ResourceSchema = ResourceSchema {
//!     type_name: "example_widget",
//!     description: "Widget resource",
//!     attributes: &[
//!         AttributeSchema::computed("id", AttributeType::Int64, "Widget identifier").sticky(),
//!         AttributeSchema::required("name", AttributeType::String, "Widget name").force_new(),
//!     ],
//! };
//!
//! assert!(WIDGET.attribute("name").is_some_and(|a| a.force_new));
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::attributes::AttributeMap;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::Result;

/// Value type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// 64-bit integer
    Int64,
    /// String
    String,
    /// Boolean
    Bool,
    /// Ordered list of integers
    Int64List,
    /// Ordered list of strings
    StringList,
    /// Nested object
    Object,
    /// Ordered list of nested objects
    ObjectList,
}

impl AttributeType {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Int64 => value.is_i64(),
            Self::String => value.is_string(),
            Self::Bool => value.is_boolean(),
            Self::Int64List => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_i64)),
            Self::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Self::Object => value.is_object(),
            Self::ObjectList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_object)),
        }
    }
}

/// Who owns an attribute's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldClass {
    /// Must be supplied; part of the create payload
    Required,
    /// May be supplied; null when absent
    Optional,
    /// May be supplied; server-assigned and adopted into state when absent
    OptionalComputed,
    /// Server-assigned only
    Computed,
}

impl FieldClass {
    /// User-authoritative attribute
    pub fn is_input(self) -> bool {
        !matches!(self, Self::Computed)
    }

    /// Server may assign the value
    pub fn is_computed(self) -> bool {
        matches!(self, Self::OptionalComputed | Self::Computed)
    }
}

/// One attribute of a schema
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AttributeSchema {
    /// Attribute name
    pub name: &'static str,
    /// Value type
    #[serde(rename = "type")]
    pub kind: AttributeType,
    /// Ownership class
    pub class: FieldClass,
    /// Reuse the last known value on every plan
    pub sticky: bool,
    /// A change requires destroy + recreate
    pub force_new: bool,
    /// Value must not be displayed
    pub sensitive: bool,
    /// Inclusive (min, max) character length for strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<(usize, usize)>,
    /// Human-readable description
    pub description: &'static str,
}

impl AttributeSchema {
    const fn new(
        name: &'static str,
        kind: AttributeType,
        class: FieldClass,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            class,
            sticky: false,
            force_new: false,
            sensitive: false,
            length: None,
            description,
        }
    }

    /// Required input
    pub const fn required(name: &'static str, kind: AttributeType, description: &'static str) -> Self {
        Self::new(name, kind, FieldClass::Required, description)
    }

    /// Optional input
    pub const fn optional(name: &'static str, kind: AttributeType, description: &'static str) -> Self {
        Self::new(name, kind, FieldClass::Optional, description)
    }

    /// Optional input the server fills in when absent
    pub const fn optional_computed(
        name: &'static str,
        kind: AttributeType,
        description: &'static str,
    ) -> Self {
        Self::new(name, kind, FieldClass::OptionalComputed, description)
    }

    /// Server-computed attribute
    pub const fn computed(name: &'static str, kind: AttributeType, description: &'static str) -> Self {
        Self::new(name, kind, FieldClass::Computed, description)
    }

    /// Keep the prior value on every plan
    pub const fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    /// Changing the value replaces the resource
    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Mark as sensitive
    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Constrain string length
    pub const fn length(mut self, min: usize, max: usize) -> Self {
        self.length = Some((min, max));
        self
    }
}

/// Static schema of one resource or data source type
#[derive(Debug, Serialize)]
pub struct ResourceSchema {
    /// Type name, e.g. `mailtrap_project`
    pub type_name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Attribute table
    pub attributes: &'static [AttributeSchema],
}

/// What applying a plan will do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    /// Resource does not exist yet
    Create,
    /// Nothing to do
    NoOp,
    /// In-place update
    Update,
    /// Destroy and recreate
    Replace,
}

/// Result of planning a declared configuration against prior state
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    /// Planned action
    pub action: PlanAction,
    /// Planned state; absent keys are known only after apply
    pub planned: AttributeMap,
    /// Replacement-triggering attributes that changed
    pub requires_replace: Vec<&'static str>,
}

impl ResourceSchema {
    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Names of user-authoritative attributes
    pub fn inputs(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes
            .iter()
            .filter(|a| a.class.is_input())
            .map(|a| a.name)
    }

    /// Check a declared configuration against the schema
    ///
    /// Every required attribute must be present and non-null.
    pub fn validate_config(&self, config: &AttributeMap) -> Diagnostics {
        self.check_config(config, true)
    }

    /// Check a configuration whose absent attributes are still unknown
    ///
    /// Same checks as [`validate_config`](Self::validate_config), except that
    /// a required attribute missing from `config` is accepted.
    pub fn validate_planned(&self, config: &AttributeMap) -> Diagnostics {
        self.check_config(config, false)
    }

    fn check_config(&self, config: &AttributeMap, require_present: bool) -> Diagnostics {
        let mut diags = Diagnostics::new();

        for key in config.keys() {
            if self.attribute(key).is_none() {
                diags.push(
                    Diagnostic::error(
                        "Unsupported argument",
                        format!("An argument named {key:?} is not expected for {}", self.type_name),
                    )
                    .at(key.clone()),
                );
            }
        }

        for attr in self.attributes {
            let Some(value) = config.get(attr.name) else {
                if require_present && attr.class == FieldClass::Required {
                    diags.push(
                        Diagnostic::error(
                            "Missing required argument",
                            format!(
                                "The argument {:?} is required, but no definition was found",
                                attr.name
                            ),
                        )
                        .at(attr.name),
                    );
                }
                continue;
            };

            if attr.class == FieldClass::Computed {
                diags.push(
                    Diagnostic::error(
                        "Invalid Configuration for Read-Only Attribute",
                        format!("{} is computed by the remote service and cannot be set", attr.name),
                    )
                    .at(attr.name),
                );
                continue;
            }

            if value.is_null() {
                if attr.class == FieldClass::Required {
                    diags.push(
                        Diagnostic::error(
                            "Missing required argument",
                            format!("The argument {:?} is required and cannot be null", attr.name),
                        )
                        .at(attr.name),
                    );
                }
                continue;
            }

            if !attr.kind.accepts(value) {
                diags.push(
                    Diagnostic::error(
                        "Incorrect attribute value type",
                        format!("{} must be of type {:?}, got {value}", attr.name, attr.kind),
                    )
                    .at(attr.name),
                );
                continue;
            }

            if let (Some((min, max)), Some(s)) = (attr.length, value.as_str()) {
                let len = s.chars().count();
                if len < min || len > max {
                    diags.push(
                        Diagnostic::error(
                            "Invalid Attribute Value Length",
                            format!(
                                "{} must be between {min} and {max} characters, got {len}",
                                attr.name
                            ),
                        )
                        .at(attr.name),
                    );
                }
            }
        }

        diags
    }

    /// Plan a declared configuration against the prior state
    pub fn plan(&self, prior: Option<&AttributeMap>, config: &AttributeMap) -> Result<Plan> {
        self.validate_planned(config).into_result()?;

        let Some(prior) = prior else {
            return Ok(Plan {
                action: PlanAction::Create,
                planned: self.create_plan(config),
                requires_replace: Vec::new(),
            });
        };

        let mut planned = AttributeMap::new();
        let mut changed = false;
        let mut requires_replace = Vec::new();

        for attr in self.attributes {
            let declared = config.get(attr.name).filter(|v| !v.is_null());
            let before = prior.get(attr.name);

            let value = match (attr.class, declared) {
                (FieldClass::Required, _) => config.get(attr.name).or(before).cloned(),
                (FieldClass::Optional, _) => {
                    Some(config.get(attr.name).cloned().unwrap_or(Value::Null))
                }
                (FieldClass::OptionalComputed, Some(v)) => Some(v.clone()),
                (FieldClass::OptionalComputed | FieldClass::Computed, _) => before.cloned(),
            };

            let user_owned = match attr.class {
                FieldClass::Required => config.contains_key(attr.name),
                FieldClass::Optional => true,
                FieldClass::OptionalComputed => declared.is_some(),
                FieldClass::Computed => false,
            };

            if user_owned && value.as_ref() != before {
                changed = true;
                if attr.force_new && declared.is_some() {
                    requires_replace.push(attr.name);
                }
            }

            if let Some(v) = value {
                planned.insert(attr.name.to_string(), v);
            }
        }

        if !requires_replace.is_empty() {
            tracing::debug!(
                "{} requires replacement due to: {}",
                self.type_name,
                requires_replace.join(", ")
            );
            return Ok(Plan {
                action: PlanAction::Replace,
                planned: self.create_plan(config),
                requires_replace,
            });
        }

        if !changed {
            return Ok(Plan {
                action: PlanAction::NoOp,
                planned,
                requires_replace,
            });
        }

        // Server-computed values that are not sticky may change with the update
        for attr in self.attributes {
            let declared = config.get(attr.name).is_some_and(|v| !v.is_null());
            if attr.class.is_computed() && !attr.sticky && !declared {
                planned.remove(attr.name);
            }
        }

        Ok(Plan {
            action: PlanAction::Update,
            planned,
            requires_replace,
        })
    }

    fn create_plan(&self, config: &AttributeMap) -> AttributeMap {
        let mut planned = AttributeMap::new();
        for attr in self.attributes {
            let declared = config.get(attr.name);
            let value = match attr.class {
                FieldClass::Computed => None,
                FieldClass::OptionalComputed => declared.filter(|v| !v.is_null()).cloned(),
                FieldClass::Optional => Some(declared.cloned().unwrap_or(Value::Null)),
                FieldClass::Required => declared.cloned(),
            };
            if let Some(v) = value {
                planned.insert(attr.name.to_string(), v);
            }
        }
        planned
    }
}
