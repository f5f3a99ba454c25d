//! Swift package references and the products targets use from them

use super::fields::Fields;
use super::{Node, ObjectKind};
use crate::error::{ProjError, Result};
use crate::plist::{CommentedString, Dictionary, Fragment, PlistValue, Value};
use crate::reference::Reference;
use crate::encoder::EncodeContext;

/// Version rule of a remote package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequirement {
    UpToNextMajorVersion(String),
    UpToNextMinorVersion(String),
    Range { from: String, to: String },
    Exact(String),
    Branch(String),
    Revision(String),
}

impl VersionRequirement {
    fn decode(dict: &Dictionary) -> Result<Self> {
        let get = |key: &'static str| -> Result<String> {
            dict.get(key)
                .and_then(Value::as_string)
                .ok_or_else(|| ProjError::MissingField {
                    isa: "XCRemoteSwiftPackageReference.requirement".to_string(),
                    field: key,
                })
        };
        match get("kind")?.as_str() {
            "upToNextMajorVersion" => Ok(Self::UpToNextMajorVersion(get("minimumVersion")?)),
            "upToNextMinorVersion" => Ok(Self::UpToNextMinorVersion(get("minimumVersion")?)),
            "versionRange" => Ok(Self::Range {
                from: get("minimumVersion")?,
                to: get("maximumVersion")?,
            }),
            "exactVersion" => Ok(Self::Exact(get("version")?)),
            "branch" => Ok(Self::Branch(get("branch")?)),
            "revision" => Ok(Self::Revision(get("revision")?)),
            _ => Err(ProjError::InvalidValue {
                field: "XCRemoteSwiftPackageReference.requirement.kind".to_string(),
                expected: "a known version requirement kind",
            }),
        }
    }

    fn to_plist(&self) -> PlistValue {
        let entries: Vec<(&str, &str)> = match self {
            Self::UpToNextMajorVersion(v) => {
                vec![("kind", "upToNextMajorVersion"), ("minimumVersion", v.as_str())]
            }
            Self::UpToNextMinorVersion(v) => {
                vec![("kind", "upToNextMinorVersion"), ("minimumVersion", v.as_str())]
            }
            Self::Range { from, to } => vec![
                ("kind", "versionRange"),
                ("minimumVersion", from.as_str()),
                ("maximumVersion", to.as_str()),
            ],
            Self::Exact(v) => vec![("kind", "exactVersion"), ("version", v.as_str())],
            Self::Branch(b) => vec![("kind", "branch"), ("branch", b.as_str())],
            Self::Revision(r) => vec![("kind", "revision"), ("revision", r.as_str())],
        };
        PlistValue::Dictionary(
            entries
                .into_iter()
                .map(|(k, v)| (CommentedString::new(k), PlistValue::string(v)))
                .collect(),
        )
    }
}

/// `XCRemoteSwiftPackageReference`: a package fetched from a repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSwiftPackageReference {
    pub repository_url: Option<String>,
    pub requirement: Option<VersionRequirement>,
}

impl RemoteSwiftPackageReference {
    /// Last path component of the repository URL without `.git`
    pub fn name(&self) -> Option<String> {
        let url = self.repository_url.as_deref()?;
        let last = url.trim_end_matches('/').rsplit('/').next()?;
        Some(last.trim_end_matches(".git").to_string())
    }
}

impl Node for RemoteSwiftPackageReference {
    const KIND: ObjectKind = ObjectKind::RemoteSwiftPackageReference;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            repository_url: fields.string("repositoryURL")?,
            requirement: fields
                .dictionary("requirement")?
                .map(|dict| VersionRequirement::decode(&dict))
                .transpose()?,
        })
    }

    fn encode(&self, _objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        fragment.set_opt("repositoryURL", self.repository_url.as_ref());
        if let Some(requirement) = &self.requirement {
            fragment.set("requirement", requirement.to_plist());
        }
        let comment = format!("{} \"{}\"", Self::KIND.isa(), self.name().unwrap_or_default());
        (
            CommentedString::with_comment(reference.as_str(), Some(comment)),
            fragment.into_value(),
        )
    }
}

/// `XCSwiftPackageProductDependency`: a package product linked by a target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwiftPackageProductDependency {
    pub product_name: String,
    pub package: Option<Reference>,
}

impl Node for SwiftPackageProductDependency {
    const KIND: ObjectKind = ObjectKind::SwiftPackageProductDependency;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            product_name: fields.required_string("productName")?,
            package: fields.reference("package")?,
        })
    }

    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        if let Some(package) = &self.package {
            fragment.set(
                "package",
                PlistValue::commented(package.as_str(), objects.package_comment(package)),
            );
        }
        fragment.set_str("productName", self.product_name.as_str());
        (
            CommentedString::with_comment(reference.as_str(), Some(self.product_name.as_str())),
            fragment.into_value(),
        )
    }
}
