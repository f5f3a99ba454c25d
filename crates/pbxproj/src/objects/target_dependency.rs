use super::fields::Fields;
use super::{Node, ObjectKind};
use crate::error::Result;
use crate::plist::{CommentedString, Fragment, PlistValue};
use crate::reference::Reference;
use crate::encoder::EncodeContext;

/// `PBXTargetDependency`: an edge from a target to a target it depends on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetDependency {
    pub name: Option<String>,
    pub target: Option<Reference>,
    pub target_proxy: Option<Reference>,
}

impl Node for TargetDependency {
    const KIND: ObjectKind = ObjectKind::TargetDependency;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            name: fields.string("name")?,
            target: fields.reference("target")?,
            target_proxy: fields.reference("targetProxy")?,
        })
    }

    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        fragment.set_opt("name", self.name.as_ref());
        if let Some(target) = &self.target {
            let name = objects.target(target).map(|t| t.name.as_str());
            fragment.set("target", PlistValue::commented(target.as_str(), name));
        }
        if let Some(proxy) = &self.target_proxy {
            fragment.set(
                "targetProxy",
                PlistValue::commented(proxy.as_str(), Some(ObjectKind::ContainerItemProxy.isa())),
            );
        }
        (
            CommentedString::with_comment(reference.as_str(), Some(Self::KIND.isa())),
            fragment.into_value(),
        )
    }
}
