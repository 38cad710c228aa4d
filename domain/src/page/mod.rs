//! Page module
//!
//! The document side of the bridge: the owned element model that the
//! scanner produces, the agent payload that endpoints embed in their
//! responses, and the URL augmentation applied to out-of-band requests.

pub mod elements;
pub mod payload;
pub mod request;

pub use elements::{
    AnnotatedElement, ButtonElement, ControlTag, FormControl, FormElement, FormMethod,
    LinkElement, PageDocument, SelectOption,
};
pub use payload::{AGENT_RESPONSE_ID, AgentPayload, FollowUp, PayloadError};
pub use request::{AGENT_PARAM, TOOL_HEADER, mark_agent_request, same_origin, set_query_param};
