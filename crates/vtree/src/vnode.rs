use crate::widget::{Thunk, Widget};
use std::sync::Arc;

/// Ordered property list for an element. Order is meaningful and duplicates
/// are the producer's responsibility; appliers must not dedupe.
pub type PropList = Vec<(Arc<str>, Option<String>)>;

/// Immutable description of what a live tree node should look like.
///
/// Never mutated by the reconciler; only read.
#[derive(Clone, Debug)]
pub enum VNode {
    Element(VElement),
    Text(String),
    Widget(Arc<dyn Widget>),
    Thunk(Arc<dyn Thunk>),
}

#[derive(Clone, Debug)]
pub struct VElement {
    pub name: Arc<str>,
    pub properties: PropList,
    pub children: Vec<VNode>,
}

impl VNode {
    pub fn element(
        name: impl Into<Arc<str>>,
        properties: PropList,
        children: Vec<VNode>,
    ) -> Self {
        Self::Element(VElement {
            name: name.into(),
            properties,
            children,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn is_widget(&self) -> bool {
        matches!(self, Self::Widget(_))
    }

    /// Property list for elements; empty for every other variant.
    pub fn properties(&self) -> &[(Arc<str>, Option<String>)] {
        match self {
            Self::Element(element) => &element.properties,
            _ => &[],
        }
    }
}
