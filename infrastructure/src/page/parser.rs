//! HTML document parser
//!
//! [`DocumentParserPort`] over `scraper`: builds the owned page model
//! from server-rendered HTML and reads agent payloads out of response
//! documents.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use toolbridge_application::ports::document_parser::DocumentParserPort;
use toolbridge_domain::page::{
    AgentPayload, AnnotatedElement, ButtonElement, FormControl, FormElement, FormMethod,
    LinkElement, PageDocument, PayloadError, SelectOption,
};
use toolbridge_domain::page::elements::{TOOL_DESCRIPTION_ATTR, TOOL_NAME_ATTR};
use url::Url;

static FORM_TOOLS: LazyLock<Selector> = LazyLock::new(|| selector("form[tool-name]"));
static LINK_TOOLS: LazyLock<Selector> = LazyLock::new(|| selector("a[tool-name]"));
static BUTTON_TOOLS: LazyLock<Selector> = LazyLock::new(|| selector("button[tool-name]"));
static CONTROLS: LazyLock<Selector> = LazyLock::new(|| selector("input, textarea, select"));
static OPTIONS: LazyLock<Selector> = LazyLock::new(|| selector("option"));
static WITH_ID: LazyLock<Selector> = LazyLock::new(|| selector("[id]"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Parses pages with `scraper` (html5ever).
#[derive(Debug, Default, Clone, Copy)]
pub struct ScraperDocumentParser;

impl ScraperDocumentParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParserPort for ScraperDocumentParser {
    fn parse_document(&self, url: &Url, html: &str) -> PageDocument {
        let document = Html::parse_document(html);

        let forms = document
            .select(&FORM_TOOLS)
            .map(|e| AnnotatedElement::Form(form_element(e)));
        let links = document
            .select(&LINK_TOOLS)
            .map(|e| AnnotatedElement::Link(link_element(e)));
        let buttons = document
            .select(&BUTTON_TOOLS)
            .map(|e| AnnotatedElement::Button(button_element(e)));

        forms
            .chain(links)
            .chain(buttons)
            .fold(PageDocument::new(url.clone()), PageDocument::with_element)
    }

    /// Each inserted node comes first, then the forms, links and buttons
    /// inside it, grouped like [`parse_document`](Self::parse_document).
    fn parse_fragment(&self, html: &str) -> Vec<AnnotatedElement> {
        let fragment = Html::parse_fragment(html);
        let mut elements = Vec::new();
        for node in fragment.root_element().children().filter_map(ElementRef::wrap) {
            elements.extend(annotated(node));
            elements.extend(
                node.select(&FORM_TOOLS)
                    .map(|e| AnnotatedElement::Form(form_element(e))),
            );
            elements.extend(
                node.select(&LINK_TOOLS)
                    .map(|e| AnnotatedElement::Link(link_element(e))),
            );
            elements.extend(
                node.select(&BUTTON_TOOLS)
                    .map(|e| AnnotatedElement::Button(button_element(e))),
            );
        }
        elements
    }

    fn extract_payload(
        &self,
        html: &str,
        element_id: &str,
    ) -> Result<Option<AgentPayload>, PayloadError> {
        let document = Html::parse_document(html);
        let Some(element) = document
            .select(&WITH_ID)
            .find(|e| e.value().id() == Some(element_id))
        else {
            return Ok(None);
        };
        let text: String = element.text().collect();
        AgentPayload::parse(&text).map(Some)
    }
}

/// The annotated element `element` stands for, if it is one.
fn annotated(element: ElementRef<'_>) -> Option<AnnotatedElement> {
    element.value().attr(TOOL_NAME_ATTR)?;
    match element.value().name() {
        "form" => Some(AnnotatedElement::Form(form_element(element))),
        "a" => Some(AnnotatedElement::Link(link_element(element))),
        "button" => Some(AnnotatedElement::Button(button_element(element))),
        _ => None,
    }
}

fn form_element(element: ElementRef<'_>) -> FormElement {
    let value = element.value();
    FormElement {
        tool_name: value.attr(TOOL_NAME_ATTR).map(str::to_string),
        tool_description: value.attr(TOOL_DESCRIPTION_ATTR).map(str::to_string),
        action: value.attr("action").map(str::to_string),
        method: FormMethod::from_attr(value.attr("method")),
        target: value.attr("target").map(str::to_string),
        controls: element.select(&CONTROLS).map(form_control).collect(),
    }
}

fn form_control(element: ElementRef<'_>) -> FormControl {
    let value = element.value();
    let mut control = match value.name() {
        "textarea" => FormControl::textarea().with_value(element.text().collect::<String>()),
        "select" => {
            let options = element.select(&OPTIONS).map(select_option).collect();
            let select = FormControl::select(options);
            if value.attr("multiple").is_some() {
                select.multiple()
            } else {
                select
            }
        }
        _ => FormControl::input(value.attr("type").unwrap_or("text"))
            .with_value(value.attr("value").unwrap_or_default()),
    };

    control.name = value.attr("name").map(str::to_string);
    control.checked = value.attr("checked").is_some();
    control.required = value.attr("required").is_some();
    control.disabled = value.attr("disabled").is_some();
    control.attributes = value
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    control
}

/// An option's value falls back to its whitespace-collapsed text.
fn select_option(element: ElementRef<'_>) -> SelectOption {
    let value = element
        .value()
        .attr("value")
        .map(str::to_string)
        .unwrap_or_else(|| collapse_whitespace(element));
    let option = SelectOption::new(value);
    if element.value().attr("selected").is_some() {
        option.selected()
    } else {
        option
    }
}

fn link_element(element: ElementRef<'_>) -> LinkElement {
    let value = element.value();
    LinkElement {
        tool_name: value.attr(TOOL_NAME_ATTR).map(str::to_string),
        tool_description: value.attr(TOOL_DESCRIPTION_ATTR).map(str::to_string),
        href: value.attr("href").map(str::to_string),
    }
}

fn button_element(element: ElementRef<'_>) -> ButtonElement {
    let value = element.value();
    let form = element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "form")
        .map(form_element);
    ButtonElement {
        tool_name: value.attr(TOOL_NAME_ATTR).map(str::to_string),
        tool_description: value.attr(TOOL_DESCRIPTION_ATTR).map(str::to_string),
        text: collapse_whitespace(element),
        form,
    }
}

fn collapse_whitespace(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
