use super::fields::Fields;
use super::{FileElement, Node, ObjectKind, SourceTree};
use crate::error::Result;
use crate::plist::{CommentedString, Fragment, PlistValue};
use crate::reference::Reference;
use crate::encoder::EncodeContext;
use std::path::Path;

fn children_value(objects: &EncodeContext<'_>, children: &[Reference]) -> PlistValue {
    PlistValue::Array(
        children
            .iter()
            .map(|child| PlistValue::commented(child.as_str(), objects.file_name(child)))
            .collect(),
    )
}

/// `PBXGroup`: a folder in the project navigator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub element: FileElement,
    pub children: Vec<Reference>,
}

impl Group {
    /// Empty group relative to its parent
    pub fn new(name: Option<String>, path: Option<String>) -> Self {
        Self {
            element: FileElement::new(SourceTree::Group, path, name),
            children: Vec::new(),
        }
    }
}

impl Node for Group {
    const KIND: ObjectKind = ObjectKind::Group;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            element: FileElement::decode(fields)?,
            children: fields.references("children")?,
        })
    }

    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        self.element.write(&mut fragment);
        fragment.set("children", children_value(objects, &self.children));
        (
            CommentedString::with_comment(reference.as_str(), self.element.display_name()),
            fragment.into_value(),
        )
    }
}

/// `PBXVariantGroup`: localized variants of one resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantGroup {
    pub element: FileElement,
    pub children: Vec<Reference>,
}

impl Node for VariantGroup {
    const KIND: ObjectKind = ObjectKind::VariantGroup;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            element: FileElement::decode(fields)?,
            children: fields.references("children")?,
        })
    }

    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        self.element.write(&mut fragment);
        fragment.set("children", children_value(objects, &self.children));
        (
            CommentedString::with_comment(reference.as_str(), self.element.name.as_deref()),
            fragment.into_value(),
        )
    }
}

/// `XCVersionGroup`: versioned bundle such as a Core Data model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionGroup {
    pub element: FileElement,
    pub children: Vec<Reference>,
    pub current_version: Option<Reference>,
    pub version_group_type: Option<String>,
}

impl Node for VersionGroup {
    const KIND: ObjectKind = ObjectKind::VersionGroup;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            element: FileElement::decode(fields)?,
            children: fields.references("children")?,
            current_version: fields.reference("currentVersion")?,
            version_group_type: fields.string("versionGroupType")?,
        })
    }

    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        self.element.write(&mut fragment);
        fragment.set("children", children_value(objects, &self.children));
        if let Some(current) = &self.current_version {
            fragment.set(
                "currentVersion",
                PlistValue::commented(current.as_str(), objects.file_name(current)),
            );
        }
        fragment.set_opt("versionGroupType", self.version_group_type.as_ref());
        let comment = self
            .element
            .path
            .as_deref()
            .and_then(|p| Path::new(p).file_name())
            .map(|name| name.to_string_lossy().into_owned());
        (
            CommentedString::with_comment(reference.as_str(), comment),
            fragment.into_value(),
        )
    }
}
