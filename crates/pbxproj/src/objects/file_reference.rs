use super::fields::Fields;
use super::{FileElement, Node, Number, ObjectKind};
use crate::error::Result;
use crate::plist::{CommentedString, Fragment, PlistValue};
use crate::reference::Reference;
use crate::encoder::EncodeContext;
use std::path::Path;

/// `PBXFileReference`: a file or folder on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReference {
    pub element: FileElement,
    pub file_encoding: Option<Number>,
    pub explicit_file_type: Option<String>,
    pub last_known_file_type: Option<String>,
    pub line_ending: Option<Number>,
    pub xc_language_specification_identifier: Option<String>,
}

impl FileReference {
    pub fn new(element: FileElement) -> Self {
        Self {
            element,
            ..Default::default()
        }
    }
}

impl Node for FileReference {
    const KIND: ObjectKind = ObjectKind::FileReference;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            element: FileElement::decode(fields)?,
            file_encoding: fields.number("fileEncoding")?,
            explicit_file_type: fields.string("explicitFileType")?,
            last_known_file_type: fields.string("lastKnownFileType")?,
            line_ending: fields.number("lineEnding")?,
            xc_language_specification_identifier: fields
                .string("xcLanguageSpecificationIdentifier")?,
        })
    }

    fn encode(&self, _objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        self.element.write(&mut fragment);
        fragment.set_opt("fileEncoding", self.file_encoding.as_ref());
        fragment.set_opt("explicitFileType", self.explicit_file_type.as_ref());
        fragment.set_opt("lastKnownFileType", self.last_known_file_type.as_ref());
        fragment.set_opt("lineEnding", self.line_ending.as_ref());
        fragment.set_opt(
            "xcLanguageSpecificationIdentifier",
            self.xc_language_specification_identifier.as_ref(),
        );
        (
            CommentedString::with_comment(reference.as_str(), self.element.display_name()),
            fragment.into_value(),
        )
    }
}

/// File extension to Xcode file type identifier
const FILE_TYPES: &[(&str, &str)] = &[
    ("a", "archive.ar"),
    ("apns", "text"),
    ("app", "wrapper.application"),
    ("appex", "wrapper.app-extension"),
    ("bundle", "wrapper.plug-in"),
    ("c", "sourcecode.c.c"),
    ("cpp", "sourcecode.cpp.cpp"),
    ("dylib", "compiled.mach-o.dylib"),
    ("entitlements", "text.plist.entitlements"),
    ("framework", "wrapper.framework"),
    ("gif", "image.gif"),
    ("gpx", "text.xml"),
    ("h", "sourcecode.c.h"),
    ("jpeg", "image.jpeg"),
    ("jpg", "image.jpeg"),
    ("json", "text.json"),
    ("m", "sourcecode.c.objc"),
    ("markdown", "text"),
    ("mdimporter", "wrapper.cfbundle"),
    ("mm", "sourcecode.cpp.objcpp"),
    ("mov", "video.quicktime"),
    ("mp3", "audio.mp3"),
    ("octest", "wrapper.cfbundle"),
    ("pch", "sourcecode.c.h"),
    ("plist", "text.plist.xml"),
    ("png", "image.png"),
    ("sh", "text.script.sh"),
    ("sks", "file.sks"),
    ("storyboard", "file.storyboard"),
    ("strings", "text.plist.strings"),
    ("stringsdict", "text.plist.strings"),
    ("swift", "sourcecode.swift"),
    ("txt", "text"),
    ("xcassets", "folder.assetcatalog"),
    ("xcconfig", "text.xcconfig"),
    ("xcdatamodel", "wrapper.xcdatamodel"),
    ("xcframework", "wrapper.xcframework"),
    ("xcodeproj", "wrapper.pb-project"),
    ("xctest", "wrapper.cfbundle"),
    ("xib", "file.xib"),
    ("zip", "archive.zip"),
];

/// File type Xcode records for a path, inferred from its extension
pub fn last_known_file_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?;
    FILE_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, file_type)| *file_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Objects;

    #[test]
    fn test_file_types_from_extension() {
        assert_eq!(last_known_file_type(Path::new("a/main.swift")), Some("sourcecode.swift"));
        assert_eq!(last_known_file_type(Path::new("Info.plist")), Some("text.plist.xml"));
        assert_eq!(
            last_known_file_type(Path::new("Assets.xcassets")),
            Some("folder.assetcatalog")
        );
        assert_eq!(last_known_file_type(Path::new("README")), None);
        assert_eq!(last_known_file_type(Path::new("x.unknown")), None);
    }

    #[test]
    fn test_table_is_sorted() {
        assert!(FILE_TYPES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_comment_prefers_name() {
        let file = FileReference::new(FileElement::new(
            super::super::SourceTree::Group,
            Some("Sources/main.swift".into()),
            Some("main.swift".into()),
        ));
        let (key, _) = file.encode(&EncodeContext::new(&Objects::default()), &Reference::from("FR_1"));
        assert_eq!(key.comment.as_deref(), Some("main.swift"));
    }
}
