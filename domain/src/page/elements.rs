//! Owned element model of a rendered page
//!
//! Only the parts of the document the bridge consumes are modelled: forms
//! with their controls, links and buttons carrying `tool-name`. Cloning a
//! [`FormElement`] is the equivalent of `cloneNode(true)`: executors mutate
//! the clone and never the element held by the registered tool.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// Attribute marking an element as a tool.
pub const TOOL_NAME_ATTR: &str = "tool-name";
/// Attribute carrying the tool description.
pub const TOOL_DESCRIPTION_ATTR: &str = "tool-description";

/// Input types a browser recognizes; anything else degrades to `text`.
const KNOWN_INPUT_TYPES: &[&str] = &[
    "text",
    "search",
    "tel",
    "url",
    "email",
    "password",
    "date",
    "month",
    "week",
    "time",
    "datetime-local",
    "number",
    "range",
    "color",
    "checkbox",
    "radio",
    "file",
    "submit",
    "image",
    "reset",
    "button",
    "hidden",
];

/// Input types that never contribute to a form data set.
const NON_DATA_INPUT_TYPES: &[&str] = &["submit", "image", "reset", "button", "file"];

/// Normalize an input `type` attribute the way the DOM `type` property does.
pub fn normalize_input_type(raw: Option<&str>) -> String {
    let lowered = raw.map(|t| t.trim().to_ascii_lowercase()).unwrap_or_default();
    if KNOWN_INPUT_TYPES.contains(&lowered.as_str()) {
        lowered
    } else {
        "text".to_string()
    }
}

/// Element tag of a form control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlTag {
    Input,
    Textarea,
    Select,
}

/// One `<option>` of a select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            selected: false,
        }
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

/// An `input`, `textarea` or `select` inside a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormControl {
    pub tag: ControlTag,
    /// Type as the DOM reports it: the normalized input type,
    /// `textarea`, `select-one` or `select-multiple`.
    pub control_type: String,
    pub name: Option<String>,
    pub value: String,
    pub checked: bool,
    pub required: bool,
    pub disabled: bool,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    /// All remaining attributes (notably `tool-param-*`).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl FormControl {
    /// An `<input>` of the given raw type.
    pub fn input(input_type: &str) -> Self {
        Self::with_tag(ControlTag::Input, normalize_input_type(Some(input_type)))
    }

    pub fn textarea() -> Self {
        Self::with_tag(ControlTag::Textarea, "textarea".to_string())
    }

    pub fn select(options: Vec<SelectOption>) -> Self {
        let mut control = Self::with_tag(ControlTag::Select, "select-one".to_string());
        control.options = options;
        control
    }

    fn with_tag(tag: ControlTag, control_type: String) -> Self {
        Self {
            tag,
            control_type,
            name: None,
            value: String::new(),
            checked: false,
            required: false,
            disabled: false,
            options: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        if self.tag == ControlTag::Select {
            self.control_type = "select-multiple".to_string();
        }
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }

    /// Name usable for addressing, i.e. present and non-empty.
    pub fn field_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn is_hidden(&self) -> bool {
        self.control_type == "hidden"
    }

    pub fn is_checkbox(&self) -> bool {
        self.control_type == "checkbox"
    }

    pub fn is_radio(&self) -> bool {
        self.control_type == "radio"
    }

    pub fn is_number(&self) -> bool {
        self.control_type == "number"
    }

    pub fn is_select(&self) -> bool {
        self.tag == ControlTag::Select
    }

    pub fn is_multiple(&self) -> bool {
        self.control_type == "select-multiple"
    }

    /// Whether this control is exposed as a tool parameter:
    /// not hidden and addressable by name.
    pub fn is_parameter(&self) -> bool {
        !self.is_hidden() && self.field_name().is_some()
    }

    /// Current value as the DOM `value` property reports it.
    ///
    /// For a single select with no explicit selection this is the first
    /// option, matching browser defaults.
    pub fn current_value(&self) -> String {
        if !self.is_select() {
            return self.value.clone();
        }
        self.options
            .iter()
            .find(|o| o.selected)
            .or_else(|| {
                if self.is_multiple() {
                    None
                } else {
                    self.options.first()
                }
            })
            .map(|o| o.value.clone())
            .unwrap_or_default()
    }

    /// Entries this control contributes to a form data set.
    fn data_entries(&self) -> Vec<(String, String)> {
        let Some(name) = self.field_name() else {
            return Vec::new();
        };
        if self.disabled || NON_DATA_INPUT_TYPES.contains(&self.control_type.as_str()) {
            return Vec::new();
        }
        if self.is_checkbox() || self.is_radio() {
            if !self.checked {
                return Vec::new();
            }
            let value = if self.value.is_empty() {
                "on".to_string()
            } else {
                self.value.clone()
            };
            return vec![(name.to_string(), value)];
        }
        if self.is_multiple() {
            return self
                .options
                .iter()
                .filter(|o| o.selected)
                .map(|o| (name.to_string(), o.value.clone()))
                .collect();
        }
        if self.is_select() && self.options.is_empty() {
            return Vec::new();
        }
        vec![(name.to_string(), self.current_value())]
    }
}

/// HTTP method a form submits with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormMethod {
    #[default]
    Get,
    Post,
}

impl FormMethod {
    /// Parse the `method` attribute; anything unrecognized is GET.
    pub fn from_attr(raw: Option<&str>) -> Self {
        match raw.map(|m| m.trim().to_ascii_lowercase()).as_deref() {
            Some("post") => FormMethod::Post,
            _ => FormMethod::Get,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormMethod::Get => "GET",
            FormMethod::Post => "POST",
        }
    }
}

/// A `<form>` and its controls in document order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormElement {
    pub tool_name: Option<String>,
    pub tool_description: Option<String>,
    /// Raw `action` attribute; empty or absent submits to the document URL.
    pub action: Option<String>,
    pub method: FormMethod,
    pub target: Option<String>,
    pub controls: Vec<FormControl>,
}

impl FormElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self.tool_description = Some(description.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_method(mut self, method: FormMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_control(mut self, control: FormControl) -> Self {
        self.controls.push(control);
        self
    }

    /// Controls exposed as tool parameters, in document order.
    pub fn parameter_controls(&self) -> impl Iterator<Item = &FormControl> {
        self.controls.iter().filter(|c| c.is_parameter())
    }

    /// Locate the control addressed by `name` for value assignment.
    ///
    /// Visible controls win over hidden ones sharing the name, so the
    /// `hidden value="0"` + checkbox idiom assigns to the checkbox.
    pub fn control_named_mut(&mut self, name: &str) -> Option<&mut FormControl> {
        let index = self
            .controls
            .iter()
            .position(|c| c.field_name() == Some(name) && !c.is_hidden())
            .or_else(|| {
                self.controls
                    .iter()
                    .position(|c| c.field_name() == Some(name))
            })?;
        self.controls.get_mut(index)
    }

    pub fn control_named(&self, name: &str) -> Option<&FormControl> {
        self.controls
            .iter()
            .find(|c| c.field_name() == Some(name) && !c.is_hidden())
            .or_else(|| self.controls.iter().find(|c| c.field_name() == Some(name)))
    }

    /// The form data set a browser would submit, in document order.
    pub fn form_data(&self) -> Vec<(String, String)> {
        self.controls.iter().flat_map(|c| c.data_entries()).collect()
    }

    /// Absolute submission URL, resolved against the document URL.
    pub fn submission_url(&self, document_url: &Url) -> Result<Url, url::ParseError> {
        match self.action.as_deref().map(str::trim) {
            Some(action) if !action.is_empty() => document_url.join(action),
            _ => Ok(document_url.clone()),
        }
    }
}

/// An `<a>` element carrying `tool-name`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LinkElement {
    pub tool_name: Option<String>,
    pub tool_description: Option<String>,
    pub href: Option<String>,
}

impl LinkElement {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }

    pub fn with_tool(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self.tool_description = Some(description.into());
        self
    }

    /// Absolute link target. A missing `href` points at the document itself.
    pub fn target_url(&self, document_url: &Url) -> Result<Url, url::ParseError> {
        match self.href.as_deref().map(str::trim) {
            Some(href) if !href.is_empty() => document_url.join(href),
            _ => Ok(document_url.clone()),
        }
    }
}

/// A `<button>` carrying `tool-name`, with its owning form if any.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ButtonElement {
    pub tool_name: Option<String>,
    pub tool_description: Option<String>,
    pub text: String,
    pub form: Option<FormElement>,
}

impl ButtonElement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_tool(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self.tool_description = Some(description.into());
        self
    }

    pub fn in_form(mut self, form: FormElement) -> Self {
        self.form = Some(form);
        self
    }
}

/// Any element carrying `tool-name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "element", rename_all = "lowercase")]
pub enum AnnotatedElement {
    Form(FormElement),
    Link(LinkElement),
    Button(ButtonElement),
}

impl AnnotatedElement {
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            AnnotatedElement::Form(f) => f.tool_name.as_deref(),
            AnnotatedElement::Link(l) => l.tool_name.as_deref(),
            AnnotatedElement::Button(b) => b.tool_name.as_deref(),
        }
    }

    pub fn tool_description(&self) -> &str {
        match self {
            AnnotatedElement::Form(f) => f.tool_description.as_deref(),
            AnnotatedElement::Link(l) => l.tool_description.as_deref(),
            AnnotatedElement::Button(b) => b.tool_description.as_deref(),
        }
        .unwrap_or_default()
    }

    pub fn tag_name(&self) -> &'static str {
        match self {
            AnnotatedElement::Form(_) => "form",
            AnnotatedElement::Link(_) => "a",
            AnnotatedElement::Button(_) => "button",
        }
    }
}

/// A parsed page: its URL and annotated elements in registration order
/// (forms, then links, then buttons).
#[derive(Debug, Clone, PartialEq)]
pub struct PageDocument {
    pub url: Url,
    pub elements: Vec<AnnotatedElement>,
}

impl PageDocument {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: AnnotatedElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn forms(&self) -> impl Iterator<Item = &FormElement> {
        self.elements.iter().filter_map(|e| match e {
            AnnotatedElement::Form(f) => Some(f),
            _ => None,
        })
    }
}
