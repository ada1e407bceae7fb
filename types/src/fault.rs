//! Render faults and the records derived from them.
//!
//! A [`RenderFault`] is raised by a component while it draws. Boundaries turn it
//! into a [`FaultRecord`] for their own state and a [`FaultPayload`] for the
//! fault reporter; neither is ever propagated as an error past the boundary.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// How a fault left the component that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultOrigin {
    /// The component returned `Err`.
    Error,
    /// The component panicked and the panic was caught.
    Panic,
}

/// Names of the components that were rendering when a fault was raised,
/// innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStack(Vec<String>);

impl ComponentStack {
    #[must_use]
    pub fn new(innermost_first: Vec<String>) -> Self {
        Self(innermost_first)
    }

    /// Builds a stack from names recorded outermost first, as a render pass
    /// pushes them.
    #[must_use]
    pub fn from_render_order<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut frames: Vec<String> = names.into_iter().map(Into::into).collect();
        frames.reverse();
        Self(frames)
    }

    /// The component that raised the fault.
    #[must_use]
    pub fn innermost(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    #[must_use]
    pub fn frames(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds enclosing components (outermost first) above the current frames.
    pub fn extend_outward<I, S>(&mut self, outer_render_order: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut outer: Vec<String> = outer_render_order.into_iter().map(Into::into).collect();
        outer.reverse();
        self.0.extend(outer);
    }
}

impl fmt::Display for ComponentStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, name) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write!(f, "    in {name}")?;
        }
        Ok(())
    }
}

/// A fault raised by a component while rendering.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RenderFault {
    message: String,
    #[source]
    cause: Option<BoxedCause>,
    origin: FaultOrigin,
    component_stack: Option<ComponentStack>,
}

impl RenderFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
            origin: FaultOrigin::Error,
            component_stack: None,
        }
    }

    pub fn with_cause<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: Into<BoxedCause>,
    {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
            origin: FaultOrigin::Error,
            component_stack: None,
        }
    }

    /// Converts a caught panic payload into a fault.
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        Self {
            message: panic_payload_to_string(payload),
            cause: None,
            origin: FaultOrigin::Panic,
            component_stack: None,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    #[must_use]
    pub fn origin(&self) -> FaultOrigin {
        self.origin
    }

    #[must_use]
    pub fn component_stack(&self) -> Option<&ComponentStack> {
        self.component_stack.as_ref()
    }

    /// Stamps the stack unless an inner frame already did.
    pub fn attach_stack(&mut self, stack: ComponentStack) {
        if self.component_stack.is_none() {
            self.component_stack = Some(stack);
        }
    }

    #[must_use]
    pub fn payload(&self) -> FaultPayload {
        FaultPayload {
            message: self.message.clone(),
        }
    }

    #[must_use]
    pub fn record(&self) -> FaultRecord {
        FaultRecord {
            error_message: self.message.clone(),
            error_context: self
                .component_stack
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

fn panic_payload_to_string(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Structured payload forwarded to the fault reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultPayload {
    pub message: String,
}

/// What a boundary remembers about the fault that tripped it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultRecord {
    pub error_message: String,
    /// Component stack, one `in <Name>` line per component, innermost first.
    pub error_context: String,
}
