use super::fields::Fields;
use super::{Node, ObjectKind, SourceTree};
use crate::error::Result;
use crate::plist::{CommentedString, Fragment, PlistValue};
use crate::reference::Reference;
use crate::encoder::EncodeContext;

/// `PBXReferenceProxy`: a product of a target in a referenced project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceProxy {
    pub file_type: Option<String>,
    pub path: Option<String>,
    pub remote_ref: Option<Reference>,
    pub source_tree: Option<SourceTree>,
}

impl Node for ReferenceProxy {
    const KIND: ObjectKind = ObjectKind::ReferenceProxy;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            file_type: fields.string("fileType")?,
            path: fields.string("path")?,
            remote_ref: fields.reference("remoteRef")?,
            source_tree: fields.string("sourceTree")?.map(|s| SourceTree::parse(&s)),
        })
    }

    fn encode(&self, _objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        fragment.set_opt("fileType", self.file_type.as_ref());
        fragment.set_opt("path", self.path.as_ref());
        if let Some(remote) = &self.remote_ref {
            fragment.set(
                "remoteRef",
                PlistValue::commented(remote.as_str(), Some(ObjectKind::ContainerItemProxy.isa())),
            );
        }
        fragment.set_opt("sourceTree", self.source_tree.as_ref());
        (
            CommentedString::with_comment(reference.as_str(), self.path.as_deref()),
            fragment.into_value(),
        )
    }
}
