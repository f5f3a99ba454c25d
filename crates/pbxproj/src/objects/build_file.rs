use super::fields::Fields;
use super::{Node, ObjectKind};
use crate::error::Result;
use crate::plist::{CommentedString, Dictionary, Fragment, PlistValue};
use crate::reference::Reference;
use crate::encoder::EncodeContext;

/// `PBXBuildFile`: membership of a file (or package product) in a build phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildFile {
    pub file_ref: Option<Reference>,
    pub product_ref: Option<Reference>,
    pub settings: Option<Dictionary>,
}

impl BuildFile {
    pub fn new(file_ref: Reference) -> Self {
        Self {
            file_ref: Some(file_ref),
            ..Default::default()
        }
    }
}

impl Node for BuildFile {
    const KIND: ObjectKind = ObjectKind::BuildFile;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            file_ref: fields.reference("fileRef")?,
            product_ref: fields.reference("productRef")?,
            settings: fields.dictionary("settings")?,
        })
    }

    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        if let Some(file_ref) = &self.file_ref {
            fragment.set(
                "fileRef",
                PlistValue::commented(file_ref.as_str(), objects.file_name(file_ref)),
            );
        }
        if let Some(product_ref) = &self.product_ref {
            fragment.set(
                "productRef",
                PlistValue::commented(product_ref.as_str(), objects.product_name(product_ref)),
            );
        }
        if let Some(settings) = &self.settings {
            fragment.set("settings", PlistValue::from(settings));
        }
        (
            CommentedString::with_comment(reference.as_str(), objects.build_file_comment(reference)),
            fragment.into_value(),
        )
    }
}
