//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod execute_button;
pub mod execute_form;
pub mod execute_link;
pub mod invoke_tool;
pub mod navigation;
pub mod observe_mutations;
pub mod register_tools;
pub mod scan_page;
